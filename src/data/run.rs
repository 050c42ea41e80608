use super::read_instance;
use crate::core::Matcher;
use anyhow::anyhow;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result};

/// Report of running a directory of samples.
#[derive(Debug, Deserialize, Serialize)]
pub struct Report {
    matcher: String,
    entries: Vec<ReportEntry>,
}

impl Report {
    /// Create a new report.
    fn new(matcher: String) -> Self {
        let entries = Vec::new();
        Self { matcher, entries }
    }

    /// Get the matcher name.
    #[must_use]
    pub fn matcher_name(&self) -> &str {
        &self.matcher
    }

    /// Get the entries.
    #[must_use]
    pub fn entries(&self) -> &[ReportEntry] {
        &self.entries
    }
}

impl Display for Report {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        writeln!(f, "Matcher: {}", self.matcher)?;
        for entry in &self.entries {
            writeln!(f, "{entry}")?;
        }
        writeln!(f, "-------------------")
    }
}

/// Report of running a single sample.
#[non_exhaustive]
#[derive(Debug, Deserialize, Serialize)]
pub struct ReportEntry {
    pub name: String,
    pub pairs: usize,
    pub time: f64,
}

impl Display for ReportEntry {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "{}: {} pairs in {:.3} sec", self.name, self.pairs, self.time)
    }
}

/// Run all samples in the `samples` directory and print the report.
///
/// # Arguments
/// - `valid` is true, check that the matching sizes are correct.
/// - `matcher` is the matcher to run.
///
/// # Errors
/// - If a file cannot be read.
/// - If no samples are found.
///
/// # Panics
/// - If a matching is invalid.
/// - If a matching size is incorrect and `valid` is true.
pub fn samples(valid: bool, matcher: &mut dyn Matcher) -> anyhow::Result<()> {
    run("samples", valid, matcher).and_then(|report| {
        if report.entries.is_empty() {
            Err(anyhow!("No samples found"))
        } else {
            println!("{report}");
            Ok(())
        }
    })
}

/// Run all samples in the `dir` directory. Filenames carry the vertex count
/// and the expected number of matched pairs as `vertices_pairs_index`;
/// instances exceeding the matcher's vertex limit are skipped.
///
/// # Arguments
/// - `valid` is true, check that the matching sizes are correct.
/// - `matcher` is the matcher to run.
///
/// # Errors
/// - If a file cannot be read.
///
/// # Panics
/// - If a matching is invalid.
/// - If a matching size is incorrect and `valid` is true. Only exact
///   matchers are held to the expected size.
pub fn run(dir: &str, valid: bool, matcher: &mut dyn Matcher) -> anyhow::Result<Report> {
    let mut report = Report::new(matcher.name().into());

    for file in std::fs::read_dir(dir)? {
        let file = file?;
        let (name, vertices, expected) = parse_filename(&file.file_name())?;

        if vertices <= matcher.maximum_vertices() {
            let instance = read_instance(&file.path())?;

            let time = std::time::Instant::now();
            let matching = matcher.matching(&instance);
            let time = time.elapsed().as_secs_f64();

            assert!(matching.verify(), "Invalid matching created for {name}");

            let pairs = matching.pairs();
            if valid && matcher.exact() {
                assert_eq!(pairs, expected, "Wrong matching size for {name}");
            }

            report.entries.push(ReportEntry { name, pairs, time });
        }
    }

    Ok(report)
}

fn parse_filename(filename: &std::ffi::OsString) -> anyhow::Result<(String, usize, usize)> {
    static NAME_ERR: &str = "Cannot read filename";

    let name = filename.to_str().ok_or_else(|| anyhow!(NAME_ERR))?;
    let mut parts = name.split('.');
    let mut parts = parts.next().ok_or_else(|| anyhow!(NAME_ERR))?.split('_');
    let vertices = parts.next().ok_or_else(|| anyhow!(NAME_ERR))?.parse()?;
    let pairs = parts.next().ok_or_else(|| anyhow!(NAME_ERR))?.parse()?;
    let _: usize = parts.next().ok_or_else(|| anyhow!(NAME_ERR))?.parse()?;
    Ok((name.into(), vertices, pairs))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_filename() -> anyhow::Result<()> {
        let filename = "10_5_0.in".into();
        let (name, vertices, pairs) = parse_filename(&filename)?;
        assert_eq!(name, "10_5_0.in");
        assert_eq!(vertices, 10);
        assert_eq!(pairs, 5);

        let filename = "6_3_0.json".into();
        let (name, vertices, pairs) = parse_filename(&filename)?;
        assert_eq!(name, "6_3_0.json");
        assert_eq!(vertices, 6);
        assert_eq!(pairs, 3);
        Ok(())
    }

    #[test]
    fn test_parse_filename_errors() {
        assert!(parse_filename(&"".into()).is_err());
        assert!(parse_filename(&".in".into()).is_err());
        assert!(parse_filename(&"10.in".into()).is_err());
        assert!(parse_filename(&"10_5.in".into()).is_err());
        assert!(parse_filename(&"10_5a_0.in".into()).is_err());
        assert!(parse_filename(&"1a0_5_0.in".into()).is_err());
        assert!(parse_filename(&"10_5_0a2.in".into()).is_err());
    }
}
