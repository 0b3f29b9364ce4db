use std::collections::HashSet;

use crate::constants::{HOSTNAME_REGEX, PORT_SUFFIX_REGEX};

/// Reduces raw source output to hostname-shaped strings: one trailing
/// `:port` stripped, the longest hostname-shaped substring extracted,
/// exact dedup. Input casing is preserved.
pub fn normalize<I>(lines: I) -> HashSet<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut cleaned = HashSet::new();
    for line in lines {
        let line = line.as_ref().trim();
        if line.is_empty() {
            continue;
        }
        let stripped = PORT_SUFFIX_REGEX.replace(line, "");
        if let Some(host) = HOSTNAME_REGEX
            .find_iter(&stripped)
            .max_by_key(|m| m.as_str().len())
        {
            cleaned.insert(host.as_str().to_string());
        }
    }
    cleaned
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_ports_and_discards_noise() {
        let cleaned = normalize(["foo.example.com:8080", "BAD_LINE", "bar.example.com"]);
        let expected: HashSet<String> = ["foo.example.com", "bar.example.com"]
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(cleaned, expected);
    }

    #[test]
    fn extracts_host_from_url_shaped_lines() {
        let cleaned = normalize(["https://x.example.com/path?q=1"]);
        assert!(cleaned.contains("x.example.com"));
        assert_eq!(cleaned.len(), 1);
    }

    #[test]
    fn is_idempotent() {
        let first = normalize(["foo.example.com:443", "api.dev.example.org", "junk"]);
        let second = normalize(&first);
        assert_eq!(first, second);
    }

    #[test]
    fn preserves_casing() {
        let cleaned = normalize(["FOO.Example.COM"]);
        assert!(cleaned.contains("FOO.Example.COM"));
    }

    #[test]
    fn empty_input_yields_empty_set() {
        let cleaned = normalize(Vec::<String>::new());
        assert!(cleaned.is_empty());
    }

    #[test]
    fn rejects_numeric_final_label() {
        let cleaned = normalize(["a.b.c3", "10.0.0.1"]);
        assert!(cleaned.is_empty());
    }
}
