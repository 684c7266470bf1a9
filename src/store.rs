use std::collections::HashSet;

use serde::Deserialize;
use snafu::ensure;

use crate::util::{self, Error, DuplicateNameSnafu, EmptyCiphertextSnafu, TooFewCiphertextsSnafu};

/// Textual encoding the ciphertexts are supplied in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    #[default]
    Hex,
    Base64,
}

impl Encoding {
    pub fn decode(self, name: &str, input: &str) -> Result<Vec<u8>, Error> {
        match self {
            Encoding::Hex    => util::decode_hex(name, input),
            Encoding::Base64 => util::decode_base64(name, input),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ciphertext {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// The decoded ciphertexts of one investigation, in input order.
#[derive(Debug, Clone)]
pub struct CiphertextStore {
    ciphertexts: Vec<Ciphertext>,
}

impl CiphertextStore {
    /// Decodes every `(name, text)` entry. Fails on the first malformed entry,
    /// on empty ciphertexts, on repeated names and when fewer than two entries
    /// are given.
    pub fn load<'a, I>(entries: I, encoding: Encoding) -> Result<Self, Error>
    where I: IntoIterator<Item = (&'a str, &'a str)> {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut ciphertexts = Vec::new();
        for (name, text) in entries {
            ensure!(seen.insert(name), DuplicateNameSnafu { name });
            let bytes = encoding.decode(name, text)?;
            ensure!(!bytes.is_empty(), EmptyCiphertextSnafu { name });
            ciphertexts.push(Ciphertext { name: name.to_string(), bytes });
        }
        ensure!(ciphertexts.len() >= 2, TooFewCiphertextsSnafu { count: ciphertexts.len() });
        Ok(Self { ciphertexts })
    }

    pub fn len(&self) -> usize {
        self.ciphertexts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ciphertexts.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&Ciphertext> {
        self.ciphertexts.get(idx)
    }

    pub fn by_name(&self, name: &str) -> Option<&Ciphertext> {
        self.ciphertexts.iter().find(|c| c.name == name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Ciphertext> {
        self.ciphertexts.iter()
    }
}

#[test]
fn test_load_ciphertext_store() {
    let store = CiphertextStore::load([("C1", "414243"), ("C2", "4142"), ("C3", "00ff")], Encoding::Hex).unwrap();
    assert_eq!(3, store.len());
    assert_eq!(b"ABC".to_vec(), store.get(0).unwrap().bytes);
    assert_eq!(vec![0x00, 0xff], store.by_name("C3").unwrap().bytes);
    assert_eq!(None, store.get(3));
    let names: Vec<&str> = store.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(vec!["C1", "C2", "C3"], names);
}

#[test]
fn test_load_base64_ciphertext_store() {
    let store = CiphertextStore::load([("a", "QUJD"), ("b", "AAAA")], Encoding::Base64).unwrap();
    assert_eq!(b"ABC".to_vec(), store.by_name("a").unwrap().bytes);
    assert_eq!(vec![0u8; 3], store.by_name("b").unwrap().bytes);
}

#[test]
fn test_load_rejects_bad_input() {
    let too_few = CiphertextStore::load([("C1", "414243")], Encoding::Hex);
    assert!(matches!(too_few, Err(Error::TooFewCiphertexts { count: 1 })));

    let malformed = CiphertextStore::load([("C1", "414243"), ("C2", "41424")], Encoding::Hex);
    assert!(matches!(malformed, Err(Error::HexDecode { ref name, .. }) if name == "C2"));

    let empty = CiphertextStore::load([("C1", "414243"), ("C2", "")], Encoding::Hex);
    assert!(matches!(empty, Err(Error::EmptyCiphertext { ref name }) if name == "C2"));

    let duplicate = CiphertextStore::load([("C1", "41"), ("C1", "42")], Encoding::Hex);
    assert!(matches!(duplicate, Err(Error::DuplicateName { ref name }) if name == "C1"));
}
