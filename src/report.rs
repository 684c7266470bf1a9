use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use snafu::ResultExt;

use crate::crypto::xor::attack::Match;
use crate::util::{Error, WriteArtifactSnafu};

pub const ARTIFACT_EXTENSION: &str = "txt";

/// The matches one crib produced against one combination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub label: String,
    pub matches: Vec<Match>,
}

pub fn render_section(section: &Section) -> String {
    let header = format!("==================== Results for {}: ====================\n", section.label);
    let lines: String = section.matches
        .iter()
        .map(|m| format!("Position {}: {}\n", m.offset, m.text))
        .collect();
    header + &lines
}

// Sections are separated by a single blank line; empty sections keep their header
pub fn render_report(sections: &[Section]) -> String {
    sections.iter()
        .map(render_section)
        .collect::<Vec<String>>()
        .join("\n")
}

#[cfg(test)]
fn m(offset: usize, text: &str) -> Match {
    Match { offset, text: text.to_string() }
}

#[test]
fn test_render_report() {
    let sections = vec![
        Section { label: "C1_XOR_C2".to_string(), matches: vec![m(0, "Yes,"), m(17, "a cat")] },
        Section { label: "C1_XOR_C3".to_string(), matches: vec![] },
        Section { label: "C2_XOR_C3".to_string(), matches: vec![m(3, " ~")] },
    ];
    let expected = "\
==================== Results for C1_XOR_C2: ====================
Position 0: Yes,
Position 17: a cat

==================== Results for C1_XOR_C3: ====================

==================== Results for C2_XOR_C3: ====================
Position 3:  ~
";
    assert_eq!(expected, render_report(&sections));
}

#[test]
fn test_render_report_all_empty() {
    let sections = vec![
        Section { label: "a_XOR_b".to_string(), matches: vec![] },
        Section { label: "a_XOR_c".to_string(), matches: vec![] },
    ];
    let expected = "==================== Results for a_XOR_b: ====================\n\n\
                    ==================== Results for a_XOR_c: ====================\n";
    assert_eq!(expected, render_report(&sections));
}

fn sanitize(name: &str, max_len: usize) -> String {
    name.trim()
        .chars()
        .filter_map(|c| {
            if c.is_whitespace() {
                Some('_')
            } else if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                Some(c)
            } else {
                None
            }
        })
        .take(max_len)
        .collect()
}

/// Name for a crib with no designated artifact: its trimmed text with inner
/// whitespace as `_`, other punctuation dropped, cut to `max_len` characters.
pub fn derive_artifact_name(crib: &str, max_len: usize) -> String {
    sanitize(crib, max_len)
}

#[test]
fn test_derive_artifact_name() {
    assert_eq!("the", derive_artifact_name(" the ", 64));
    assert_eq!("Who_made_the_world", derive_artifact_name(" Who made the world?", 64));
    assert_eq!("cant_be", derive_artifact_name(" can't be", 64));
    assert_eq!("said_Sam_And", derive_artifact_name("said Sam, \"And we shouldn't", 12));
    assert_eq!("", derive_artifact_name(" ?! ", 64));
    assert_eq!("a_b", derive_artifact_name("a\tb\n", 64));
    assert_eq!("etc", derive_artifact_name("../etc", 64));
}

// Designated names win; the rest are derived from the crib text. The first
// crib to claim a name keeps it and later ones get `_2`, `_3`, ...
pub fn assign_artifact_names<'a, I>(cribs: I, max_len: usize) -> Vec<String>
where I: IntoIterator<Item = (&'a str, Option<&'a str>)> {
    let mut used: HashSet<String> = HashSet::new();
    cribs.into_iter()
        .enumerate()
        .map(|(idx, (text, designated))| {
            let base = match designated {
                Some(name) => sanitize(name, usize::MAX),
                None       => derive_artifact_name(text, max_len),
            };
            let base = if base.is_empty() { format!("crib_{}", idx + 1) } else { base };
            let mut name = base.clone();
            let mut n = 1;
            while used.contains(&name) {
                n += 1;
                name = format!("{}_{}", base, n);
            }
            used.insert(name.clone());
            name
        })
        .collect()
}

#[test]
fn test_assign_artifact_names() {
    let cribs = [
        (" Who made the world?", None),
        ("Who made the world?", None),
        ("\"Yes, that's so,\" said Sam", Some("PLAINTEXT_1")),
        ("???", None),
        ("Who made the world", None),
        ("ing ", None),
    ];
    let names = assign_artifact_names(cribs, 64);
    assert_eq!(
        vec!["Who_made_the_world", "Who_made_the_world_2", "PLAINTEXT_1", "crib_4", "Who_made_the_world_3", "ing"],
        names,
    );
}

pub fn artifact_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{}.{}", name, ARTIFACT_EXTENSION))
}

pub fn write_artifact(dir: &Path, name: &str, contents: &str) -> Result<PathBuf, Error> {
    let path = artifact_path(dir, name);
    fs::write(&path, contents)
        .context(WriteArtifactSnafu { path: path.clone() })?;
    Ok(path)
}

#[test]
fn test_write_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_artifact(dir.path(), "ing", "hello\n").unwrap();
    assert_eq!(dir.path().join("ing.txt"), path);
    assert_eq!("hello\n", fs::read_to_string(&path).unwrap());

    let missing = dir.path().join("does-not-exist");
    let result = write_artifact(&missing, "ing", "hello\n");
    assert!(matches!(result, Err(Error::WriteArtifact { .. })));
}
