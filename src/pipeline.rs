use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use snafu::ResultExt;

use crate::crypto::xor::attack::crib_drag;
use crate::crypto::xor::{pairwise_combinations, Combination};
use crate::report::{assign_artifact_names, render_report, write_artifact, Section};
use crate::scenario::Scenario;
use crate::util::{CreateOutputDirSnafu, Error};

/// A crib together with the artifact its report is written to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedCrib {
    pub index: usize,
    pub text: String,
    pub artifact: String,
}

#[derive(Debug)]
pub enum CribOutcome {
    Written(PathBuf),
    Skipped(Error),
    Failed(Error),
}

#[derive(Debug)]
pub struct RunSummary {
    pub outcomes: Vec<(PlannedCrib, CribOutcome)>,
}

impl RunSummary {
    pub fn written(&self) -> impl Iterator<Item = &Path> {
        self.outcomes.iter().filter_map(|(_, outcome)| match outcome {
            CribOutcome::Written(path) => Some(path.as_path()),
            _                          => None,
        })
    }

    pub fn skipped(&self) -> impl Iterator<Item = (&PlannedCrib, &Error)> {
        self.outcomes.iter().filter_map(|(crib, outcome)| match outcome {
            CribOutcome::Skipped(e) => Some((crib, e)),
            _                       => None,
        })
    }

    pub fn failed(&self) -> impl Iterator<Item = (&PlannedCrib, &Error)> {
        self.outcomes.iter().filter_map(|(crib, outcome)| match outcome {
            CribOutcome::Failed(e) => Some((crib, e)),
            _                      => None,
        })
    }

    pub fn is_success(&self) -> bool {
        self.failed().next().is_none()
    }
}

// Drags one crib over every combination, keeping combination order
pub fn drag_crib(combinations: &[Combination], crib: &[u8]) -> Result<Vec<Section>, Error> {
    combinations.iter()
        .map(|combination| {
            let matches = crib_drag(&combination.bytes, crib)?;
            tracing::debug!(combination = %combination.label(), matches = matches.len(), "dragged crib");
            Ok(Section { label: combination.label(), matches })
        })
        .collect()
}

/// Everything one run needs, decoded and combined up front so that input
/// errors surface before any report is produced.
#[derive(Debug, Clone)]
pub struct Pipeline {
    combinations: Vec<Combination>,
    cribs: Vec<PlannedCrib>,
    output_dir: PathBuf,
}

impl Pipeline {
    pub fn from_scenario(scenario: &Scenario) -> Result<Self, Error> {
        let store = scenario.load_store()?;
        let combinations = pairwise_combinations(&store);
        let names = assign_artifact_names(
            scenario.cribs.iter().map(|c| (c.text(), c.artifact())),
            scenario.artifact_name_length,
        );
        let cribs = scenario.cribs
            .iter()
            .zip(names)
            .enumerate()
            .map(|(index, (crib, artifact))| PlannedCrib { index, text: crib.text().to_string(), artifact })
            .collect();
        tracing::debug!(ciphertexts = store.len(), combinations = combinations.len(), "loaded scenario");
        Ok(Self {
            combinations,
            cribs,
            output_dir: scenario.output_dir.clone(),
        })
    }

    pub fn combinations(&self) -> &[Combination] {
        &self.combinations
    }

    pub fn cribs(&self) -> &[PlannedCrib] {
        &self.cribs
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn report(&self, crib: &PlannedCrib) -> Result<String, Error> {
        let sections = drag_crib(&self.combinations, crib.text.as_bytes())?;
        Ok(render_report(&sections))
    }

    fn process(&self, crib: &PlannedCrib) -> CribOutcome {
        tracing::info!(crib = %crib.text, artifact = %crib.artifact, "performing crib-dragging attack");
        let report = match self.report(crib) {
            Ok(report) => report,
            Err(e) => {
                tracing::warn!(crib = crib.index + 1, "skipping crib: {}", e);
                return CribOutcome::Skipped(e);
            }
        };
        match write_artifact(&self.output_dir, &crib.artifact, &report) {
            Ok(path) => CribOutcome::Written(path),
            Err(e) => {
                tracing::error!("{}", e);
                CribOutcome::Failed(e)
            }
        }
    }

    /// Writes one report per crib. Only failing to create the output
    /// directory is fatal; a crib that cannot be dragged or written is recorded
    /// in the summary and the remaining cribs still run.
    pub fn run(&self) -> Result<RunSummary, Error> {
        fs::create_dir_all(&self.output_dir)
            .context(CreateOutputDirSnafu { path: &self.output_dir })?;
        let outcomes = self.cribs
            .par_iter()
            .map(|crib| (crib.clone(), self.process(crib)))
            .collect();
        Ok(RunSummary { outcomes })
    }
}

#[cfg(test)]
use crate::crypto::xor::attack::Match;

#[cfg(test)]
fn scenario_in(dir: &Path, cribs: &[&str]) -> Scenario {
    let mut scenario: Scenario = serde_json::from_str(r#"{
        "ciphertexts": [
            { "data": "414243" },
            { "data": "414243" },
            { "data": "010203ff" }
        ]
    }"#).unwrap();
    scenario.output_dir = dir.to_path_buf();
    for crib in cribs {
        scenario.push_crib(*crib);
    }
    scenario
}

#[test]
fn test_drag_crib() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = Pipeline::from_scenario(&scenario_in(dir.path(), &["ABC"])).unwrap();
    let sections = drag_crib(pipeline.combinations(), b"ABC").unwrap();
    let labels: Vec<&str> = sections.iter().map(|s| s.label.as_str()).collect();
    assert_eq!(vec!["C1_XOR_C2", "C1_XOR_C3", "C2_XOR_C3"], labels);
    assert_eq!(vec![Match { offset: 0, text: "ABC".to_string() }], sections[0].matches);
    // "ABC" ^ "@@@" = 0x01 0x02 0x03, not printable
    assert!(sections[1].matches.is_empty());
    assert_eq!(sections[1], Section { label: "C1_XOR_C3".to_string(), matches: vec![] });
}

#[test]
fn test_run_writes_one_artifact_per_crib() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("results");
    let pipeline = Pipeline::from_scenario(&scenario_in(&output, &["ABC", " ", "ab"])).unwrap();
    let summary = pipeline.run().unwrap();
    assert!(summary.is_success());

    let written: Vec<PathBuf> = summary.written().map(Path::to_path_buf).collect();
    assert_eq!(vec![output.join("ABC.txt"), output.join("crib_2.txt"), output.join("ab.txt")], written);

    // 'a' ^ 0x40 = '!' and 'b' ^ 0x40 = '"'
    let report = fs::read_to_string(output.join("ab.txt")).unwrap();
    let expected = "\
==================== Results for C1_XOR_C2: ====================
Position 0: ab
Position 1: ab

==================== Results for C1_XOR_C3: ====================
Position 0: !\"
Position 1: !\"

==================== Results for C2_XOR_C3: ====================
Position 0: !\"
Position 1: !\"
";
    assert_eq!(expected, report);
}

#[test]
fn test_run_skips_empty_crib() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = Pipeline::from_scenario(&scenario_in(dir.path(), &["", "ABC"])).unwrap();
    let summary = pipeline.run().unwrap();
    assert!(summary.is_success());

    let skipped: Vec<usize> = summary.skipped().map(|(crib, _)| crib.index).collect();
    assert_eq!(vec![0], skipped);
    assert!(summary.skipped().all(|(_, e)| matches!(e, Error::InvalidCrib { .. })));
    assert!(!dir.path().join("crib_1.txt").exists());
    assert_eq!(1, summary.written().count());
}

#[test]
fn test_run_is_deterministic() {
    let first = tempfile::tempdir().unwrap();
    let second = tempfile::tempdir().unwrap();
    let cribs = ["ABC", "B", " the "];
    for dir in [first.path(), second.path()] {
        Pipeline::from_scenario(&scenario_in(dir, &cribs)).unwrap().run().unwrap();
    }
    for name in ["ABC.txt", "B.txt", "the.txt"] {
        assert_eq!(
            fs::read(first.path().join(name)).unwrap(),
            fs::read(second.path().join(name)).unwrap(),
        );
    }
}

#[test]
fn test_run_fails_when_output_dir_cannot_be_created() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("file");
    fs::write(&blocker, b"not a directory").unwrap();
    let pipeline = Pipeline::from_scenario(&scenario_in(&blocker.join("results"), &["ABC"])).unwrap();
    assert!(matches!(pipeline.run(), Err(Error::CreateOutputDir { .. })));
}

#[test]
fn test_reference_plaintext_recovers_printable_text() {
    let scenario = Scenario::reference().unwrap();
    let pipeline = Pipeline::from_scenario(&scenario).unwrap();
    let known = pipeline.cribs()
        .iter()
        .find(|c| c.artifact == "PLAINTEXT_1")
        .unwrap();
    let sections = drag_crib(pipeline.combinations(), known.text.as_bytes()).unwrap();
    // The second plaintext carries a UTF-8 em dash, so only the third surfaces
    assert!(sections[0].matches.is_empty());
    assert_eq!(1, sections[1].matches.len());
    assert_eq!(0, sections[1].matches[0].offset);
    assert!(sections[1].matches[0].text.starts_with("I cannot help with breaking encryption"));
    assert_eq!(known.text.len(), sections[1].matches[0].text.len());
    assert!(sections[2].matches.is_empty());
}
