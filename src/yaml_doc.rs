//! Multi-document YAML helpers shared by the configuration editors.
//!
//! Configurations are free-form mappings; histogramming configurations may be
//! a stream of several documents separated by `---`.

use regex::Regex;
use serde::Deserialize;

/// Parse a text buffer as a stream of YAML documents.
pub fn parse_documents(text: &str) -> Result<Vec<serde_yaml::Value>, serde_yaml::Error> {
    let mut docs = Vec::new();
    for de in serde_yaml::Deserializer::from_str(text) {
        docs.push(serde_yaml::Value::deserialize(de)?);
    }
    Ok(docs)
}

/// Serialize documents back to block-style YAML, key order as given,
/// documents separated by `---`.
pub fn format_documents(docs: &[serde_yaml::Value]) -> Result<String, serde_yaml::Error> {
    let mut out = String::new();
    for (i, doc) in docs.iter().enumerate() {
        if i > 0 {
            out.push_str("---\n");
        }
        out.push_str(&serde_yaml::to_string(doc)?);
    }
    Ok(out)
}

/// Best-effort line number (1-based) for a parse error. Prefers the parser's
/// structured location, falls back to a `line N` fragment in the message.
/// Errors carrying neither leave no line marked.
pub fn error_line(err: &serde_yaml::Error) -> Option<usize> {
    if let Some(location) = err.location() {
        return Some(location.line());
    }
    line_from_message(&err.to_string())
}

pub fn line_from_message(message: &str) -> Option<usize> {
    let re = Regex::new(r"line (\d+)").ok()?;
    re.captures(message)?.get(1)?.as_str().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_multipart_streams() {
        let text = "a: 1\nb: two\n---\nc: [1, 2, 3]\n";
        let docs = parse_documents(text).unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0]["a"], serde_yaml::Value::from(1));
        assert_eq!(docs[1]["c"].as_sequence().unwrap().len(), 3);
    }

    #[test]
    fn format_preserves_key_order_and_separators() {
        let docs = parse_documents("zulu: 1\nalpha: 2\n---\nmike: 3\n").unwrap();
        let text = format_documents(&docs).unwrap();
        let zulu = text.find("zulu").unwrap();
        let alpha = text.find("alpha").unwrap();
        assert!(zulu < alpha, "insertion order should survive a round-trip");
        assert!(text.contains("---\n"));
    }

    #[test]
    fn round_trip_is_semantically_equal() {
        let original = "nbins: 100\ndataRange: [0.0, .inf]\ncsvargs:\n  sep: ';'\n";
        let docs = parse_documents(original).unwrap();
        let reparsed = parse_documents(&format_documents(&docs).unwrap()).unwrap();
        assert_eq!(docs, reparsed);
    }

    #[test]
    fn error_line_comes_from_parser_location() {
        let err = parse_documents("ok: 1\nbroken: [1, 2\n").unwrap_err();
        assert!(error_line(&err).is_some());
    }

    #[test]
    fn line_fragment_fallback() {
        assert_eq!(line_from_message("mapping values at line 7 column 3"), Some(7));
        assert_eq!(line_from_message("no location here"), None);
    }

    #[test]
    fn valid_after_invalid() {
        assert!(parse_documents("key: [").is_err());
        assert!(parse_documents("key: value\n").is_ok());
    }
}
