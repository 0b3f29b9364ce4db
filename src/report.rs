use std::collections::HashSet;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use itertools::Itertools;

use crate::args::OutputFormat;
use crate::error::PipelineError;

/// Line-per-hostname artifact, sorted for reproducible diffs.
pub fn write_lines<'a, I>(path: &Path, hosts: I) -> Result<(), PipelineError>
where
    I: IntoIterator<Item = &'a String>,
{
    let mut file = File::create(path)?;
    for host in hosts.into_iter().sorted() {
        writeln!(file, "{}", host)?;
    }
    Ok(())
}

/// Final export of the collected candidate set in the operator's chosen
/// format. The JSON form is an ordered list of strings.
pub fn write_candidates(
    path: &Path,
    hosts: &HashSet<String>,
    format: OutputFormat,
) -> Result<(), PipelineError> {
    match format {
        OutputFormat::Txt => write_lines(path, hosts),
        OutputFormat::Json => {
            let ordered: Vec<&String> = hosts.iter().sorted().collect();
            std::fs::write(path, serde_json::to_string_pretty(&ordered)?)?;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> HashSet<String> {
        ["b.example.com", "a.example.com", "c.example.com"]
            .into_iter()
            .map(String::from)
            .collect()
    }

    #[test]
    fn lines_are_sorted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("subs.txt");
        write_lines(&path, &sample()).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "a.example.com\nb.example.com\nc.example.com\n");
    }

    #[test]
    fn json_export_is_an_ordered_list() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("subs.json");
        write_candidates(&path, &sample(), OutputFormat::Json).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let parsed: Vec<String> = serde_json::from_str(&contents).unwrap();
        assert_eq!(
            parsed,
            vec!["a.example.com", "b.example.com", "c.example.com"]
        );
    }
}
