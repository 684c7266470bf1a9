use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use snafu::ResultExt;

use crate::store::{CiphertextStore, Encoding};
use crate::util::{Error, ParseInputSnafu, ReadInputSnafu};

const REFERENCE_SCENARIO: &str = include_str!("../data/reference.json");

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CiphertextEntry {
    #[serde(default)]
    pub name: Option<String>,
    pub data: String,
}

/// A crib is written either as a bare string or as an object carrying a
/// designated artifact name.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum CribEntry {
    Text(String),
    Designated {
        text: String,
        #[serde(default)]
        artifact: Option<String>,
    },
}

impl CribEntry {
    pub fn text(&self) -> &str {
        match self {
            CribEntry::Text(text)               => text,
            CribEntry::Designated { text, .. }  => text,
        }
    }

    pub fn artifact(&self) -> Option<&str> {
        match self {
            CribEntry::Text(_)                      => None,
            CribEntry::Designated { artifact, .. }  => artifact.as_deref(),
        }
    }
}

/// One investigation: the ciphertexts suspected of sharing a key stream, the
/// cribs to drag across them and where the reports go.
#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub encoding: Encoding,

    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    #[serde(default = "default_artifact_name_length")]
    pub artifact_name_length: usize,

    pub ciphertexts: Vec<CiphertextEntry>,

    #[serde(default)]
    pub cribs: Vec<CribEntry>,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("results")
}

fn default_artifact_name_length() -> usize {
    64
}

impl Scenario {
    /// The investigation the tool was written for: three 256 byte ciphertexts
    /// and the cribs that uncovered them.
    pub fn reference() -> Result<Self, Error> {
        Self::from_json(Path::new("data/reference.json"), REFERENCE_SCENARIO)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .context(ReadInputSnafu { path })?;
        Self::from_json(path, &content)
    }

    fn from_json(path: &Path, content: &str) -> Result<Self, Error> {
        serde_json::from_str(content)
            .context(ParseInputSnafu { path })
    }

    pub fn push_crib(&mut self, text: impl Into<String>) {
        self.cribs.push(CribEntry::Text(text.into()));
    }

    // Unnamed ciphertexts are called C1, C2, ... after their position
    pub fn ciphertext_names(&self) -> Vec<String> {
        self.ciphertexts
            .iter()
            .enumerate()
            .map(|(idx, entry)| entry.name.clone().unwrap_or_else(|| format!("C{}", idx + 1)))
            .collect()
    }

    pub fn load_store(&self) -> Result<CiphertextStore, Error> {
        let names = self.ciphertext_names();
        let entries = names.iter()
            .map(String::as_str)
            .zip(self.ciphertexts.iter().map(|entry| entry.data.as_str()));
        CiphertextStore::load(entries, self.encoding)
    }
}

#[test]
fn test_parse_scenario() {
    let content = r#"{
        "ciphertexts": [
            { "data": "414243" },
            { "name": "intercept", "data": "000102" }
        ],
        "cribs": [" the ", { "text": "ABC", "artifact": "PLAINTEXT_1" }, { "text": "ing " }]
    }"#;
    let scenario = Scenario::from_json(Path::new("inline.json"), content).unwrap();
    assert_eq!(Encoding::Hex, scenario.encoding);
    assert_eq!(PathBuf::from("results"), scenario.output_dir);
    assert_eq!(64, scenario.artifact_name_length);
    assert_eq!(vec!["C1".to_string(), "intercept".to_string()], scenario.ciphertext_names());

    let cribs: Vec<(&str, Option<&str>)> = scenario.cribs
        .iter()
        .map(|c| (c.text(), c.artifact()))
        .collect();
    assert_eq!(vec![(" the ", None), ("ABC", Some("PLAINTEXT_1")), ("ing ", None)], cribs);

    let store = scenario.load_store().unwrap();
    assert_eq!(b"ABC".to_vec(), store.by_name("C1").unwrap().bytes);
}

#[test]
fn test_parse_scenario_errors() {
    let missing = Scenario::from_json(Path::new("inline.json"), r#"{ "cribs": [] }"#);
    assert!(matches!(missing, Err(Error::ParseInput { .. })));

    let bad_encoding = Scenario::from_json(Path::new("inline.json"), r#"{ "encoding": "rot13", "ciphertexts": [] }"#);
    assert!(matches!(bad_encoding, Err(Error::ParseInput { .. })));

    let unreadable = Scenario::load_from_file("/nonexistent/scenario.json");
    assert!(matches!(unreadable, Err(Error::ReadInput { .. })));
}

#[test]
fn test_reference_scenario() {
    let scenario = Scenario::reference().unwrap();
    let store = scenario.load_store().unwrap();
    assert_eq!(3, store.len());
    assert!(store.iter().all(|c| c.bytes.len() == 256));
    assert_eq!(Some("PLAINTEXT_1"), scenario.cribs.iter().find_map(|c| c.artifact()));
    assert!(scenario.cribs.iter().all(|c| !c.text().is_empty()));
}
