use std::path::PathBuf;

use base64::{Engine as _, engine::general_purpose};
use snafu::{ResultExt, Snafu};

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(display("ciphertext {name} is not valid hex: {source}"))]
    HexDecode { name: String, source: hex::FromHexError },

    #[snafu(display("ciphertext {name} is not valid base64: {source}"))]
    Base64Decode { name: String, source: base64::DecodeError },

    #[snafu(display("ciphertext {name} decodes to zero bytes"))]
    EmptyCiphertext { name: String },

    #[snafu(display("need at least two ciphertexts, got {count}"))]
    TooFewCiphertexts { count: usize },

    #[snafu(display("ciphertext name {name} is used more than once"))]
    DuplicateName { name: String },

    #[snafu(display("crib must not be empty"))]
    InvalidCrib {},

    #[snafu(display("unable to read {}: {source}", path.display()))]
    ReadInput { path: PathBuf, source: std::io::Error },

    #[snafu(display("unable to parse {}: {source}", path.display()))]
    ParseInput { path: PathBuf, source: serde_json::Error },

    #[snafu(display("unable to create output directory {}: {source}", path.display()))]
    CreateOutputDir { path: PathBuf, source: std::io::Error },

    #[snafu(display("unable to write {}: {source}", path.display()))]
    WriteArtifact { path: PathBuf, source: std::io::Error },
}

pub fn decode_hex(name: &str, input: &str) -> Result<Vec<u8>, Error> {
    hex::decode(input.trim())
        .context(HexDecodeSnafu { name })
}

#[test]
fn test_decode_hex() {
    let result = decode_hex("C1", "49276d20").unwrap();
    assert_eq!(result, b"I'm ".to_vec());

    // Surrounding whitespace from hand-edited input files is tolerated
    let result_2 = decode_hex("C1", "  414243\n").unwrap();
    assert_eq!(result_2, b"ABC".to_vec());
}

#[test]
fn test_decode_hex_rejects_malformed_input() {
    let odd = decode_hex("C1", "abc");
    assert!(matches!(odd, Err(Error::HexDecode { source: hex::FromHexError::OddLength, .. })));

    let bad_char = decode_hex("C2", "zz00");
    assert!(matches!(bad_char, Err(Error::HexDecode { source: hex::FromHexError::InvalidHexCharacter { c: 'z', index: 0 }, .. })));
    assert_eq!(
        bad_char.unwrap_err().to_string(),
        "ciphertext C2 is not valid hex: Invalid character 'z' at position 0",
    );
}

pub fn decode_base64(name: &str, input: &str) -> Result<Vec<u8>, Error> {
    let joined: String = input.split_whitespace().collect();
    general_purpose::STANDARD
        .decode(joined)
        .context(Base64DecodeSnafu { name })
}

#[test]
fn test_decode_base64() {
    let case = "SSdtIGtp\nbGxpbmc=";
    let expected = b"I'm killing".to_vec();
    assert_eq!(expected, decode_base64("C1", case).unwrap());
    assert!(matches!(decode_base64("C1", "!!!!"), Err(Error::Base64Decode { .. })));
}

#[cfg(test)]
pub(crate) fn generate_random_bytes(n: usize) -> Vec<u8> {
    use rand::RngCore;
    let mut data = vec![0u8; n];
    rand::thread_rng().fill_bytes(&mut data);
    data
}
