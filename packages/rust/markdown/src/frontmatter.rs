//! Front-matter block detection, structured parsing, and line-scan fallback.

use std::sync::LazyLock;

use regex::Regex;
use serde_yaml::{Mapping, Value};

use docgather_shared::{DocGatherError, Result};

/// Opening and closing delimiter of a front-matter block.
const DELIMITER: &str = "---";

/// Split `content` into its leading front-matter block and the rest.
///
/// The block must open on the first non-blank line. Returns `None` for the
/// block when there is no opening delimiter or it is never closed.
pub(crate) fn split(content: &str) -> (Option<&str>, &str) {
    let mut lines = content.split_inclusive('\n');
    let mut offset = 0;

    let opening = loop {
        let Some(line) = lines.next() else {
            return (None, content);
        };
        offset += line.len();
        if !line.trim().is_empty() {
            break line;
        }
    };
    if opening.trim_end() != DELIMITER || !opening.ends_with('\n') {
        return (None, content);
    }

    let block_start = offset;
    for line in lines {
        if line.trim_end() == DELIMITER {
            let block = &content[block_start..offset];
            let rest = &content[offset + line.len()..];
            return (Some(block), rest);
        }
        offset += line.len();
    }

    (None, content)
}

/// Parse a front-matter block as a YAML mapping.
pub(crate) fn parse_block(block: &str) -> Result<Mapping> {
    if block.trim().is_empty() {
        return Ok(Mapping::new());
    }

    match serde_yaml::from_str::<Value>(block) {
        Ok(Value::Mapping(map)) => Ok(map),
        Ok(Value::Null) => Ok(Mapping::new()),
        Ok(_) => Err(DocGatherError::parse("front matter is not a key-value mapping")),
        Err(e) => Err(DocGatherError::parse(format!("invalid front matter: {e}"))),
    }
}

/// Read a scalar field from a parsed mapping as a string.
pub(crate) fn scalar_field(map: &Mapping, key: &str) -> Option<String> {
    match map.get(key)? {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Find the first line of `content` that reads `<key>: value`.
pub(crate) fn scan_field(content: &str, key: &str) -> Option<String> {
    static TITLE_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(?m)^[ \t]*title:[ \t]*(.*)$").expect("valid regex"));
    static DESCRIPTION_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"(?m)^[ \t]*description:[ \t]*(.*)$").expect("valid regex")
    });

    let re = match key {
        "title" => &*TITLE_RE,
        "description" => &*DESCRIPTION_RE,
        _ => return None,
    };

    re.captures(content)
        .map(|caps| unquote(caps[1].trim()).to_string())
}

/// Strip one pair of matching surrounding quotes.
fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_finds_leading_block() {
        let input = "---\ntitle: Intro\n---\n\n# Intro\n";
        let (block, rest) = split(input);
        assert_eq!(block, Some("title: Intro\n"));
        assert_eq!(rest, "\n# Intro\n");
    }

    #[test]
    fn split_skips_leading_blank_lines() {
        let input = "\n  \n---\ntitle: Billing\n---\n# Billing\n";
        let (block, rest) = split(input);
        assert_eq!(block, Some("title: Billing\n"));
        assert_eq!(rest, "# Billing\n");
    }

    #[test]
    fn split_ignores_block_not_at_start() {
        let input = "# Heading\n\n---\ntitle: x\n---\n";
        let (block, rest) = split(input);
        assert!(block.is_none());
        assert_eq!(rest, input);
    }

    #[test]
    fn split_unclosed_block_is_body() {
        let input = "---\ntitle: Intro\n\nno closing line";
        let (block, rest) = split(input);
        assert!(block.is_none());
        assert_eq!(rest, input);
    }

    #[test]
    fn split_handles_crlf_and_eof_delimiter() {
        let input = "---\r\ntitle: Win\r\n---";
        let (block, rest) = split(input);
        assert_eq!(block, Some("title: Win\r\n"));
        assert_eq!(rest, "");
    }

    #[test]
    fn parse_block_reads_mapping() {
        let map = parse_block("title: \"Quoted: value\"\norder: 3\n").expect("parse");
        assert_eq!(scalar_field(&map, "title").as_deref(), Some("Quoted: value"));
        assert_eq!(scalar_field(&map, "order").as_deref(), Some("3"));
        assert!(scalar_field(&map, "description").is_none());
    }

    #[test]
    fn parse_block_rejects_non_mapping() {
        assert!(parse_block("- a\n- b\n").is_err());
        assert!(parse_block("title: [unclosed\n").is_err());
    }

    #[test]
    fn scan_field_takes_first_line_match() {
        let input = "intro\ndescription: first\ndescription: second\n";
        assert_eq!(scan_field(input, "description").as_deref(), Some("first"));
    }

    #[test]
    fn scan_field_does_not_match_inside_words() {
        let input = "subtitle: nope\n  title: 'Yes'\n";
        assert_eq!(scan_field(input, "title").as_deref(), Some("Yes"));
    }

    #[test]
    fn scan_field_does_not_cross_lines() {
        let input = "title:\nnext line\n";
        assert_eq!(scan_field(input, "title").as_deref(), Some(""));
    }
}
