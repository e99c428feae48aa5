#![deny(missing_docs)]

//! # Path Templates
//!
//! Splits a path template such as `/pets/{petId}/photos` into literal text and
//! `{name}` placeholders.

use crate::error::{AppError, AppResult};
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([^{}/]+)\}").expect("Invalid placeholder regex"));

/// A piece of a path template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplatePart {
    /// Fixed text.
    Literal(String),
    /// A `{name}` placeholder.
    Placeholder(String),
}

/// Parses a path template, rejecting a placeholder that appears twice.
pub fn parse_template(path: &str) -> AppResult<Vec<TemplatePart>> {
    let mut parts = Vec::new();
    let mut seen = HashSet::new();
    let mut last = 0;

    for cap in PLACEHOLDER_RE.captures_iter(path) {
        let (Some(whole), Some(name)) = (cap.get(0), cap.get(1)) else {
            continue;
        };
        if whole.start() > last {
            parts.push(TemplatePart::Literal(path[last..whole.start()].to_string()));
        }
        let name = name.as_str().to_string();
        if !seen.insert(name.clone()) {
            return Err(AppError::Parse {
                location: path.to_string(),
                message: format!("path template contains duplicate path parameter '{}'", name),
            });
        }
        parts.push(TemplatePart::Placeholder(name));
        last = whole.end();
    }
    if last < path.len() {
        parts.push(TemplatePart::Literal(path[last..].to_string()));
    }
    Ok(parts)
}

/// Placeholder names in template order.
pub fn placeholders(parts: &[TemplatePart]) -> Vec<&str> {
    parts
        .iter()
        .filter_map(|p| match p {
            TemplatePart::Placeholder(name) => Some(name.as_str()),
            TemplatePart::Literal(_) => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_template() {
        let parts = parse_template("/pets/{petId}/photos/{photoId}.png").unwrap();
        assert_eq!(
            parts,
            vec![
                TemplatePart::Literal("/pets/".into()),
                TemplatePart::Placeholder("petId".into()),
                TemplatePart::Literal("/photos/".into()),
                TemplatePart::Placeholder("photoId".into()),
                TemplatePart::Literal(".png".into()),
            ]
        );
        assert_eq!(placeholders(&parts), vec!["petId", "photoId"]);
    }

    #[test]
    fn test_no_placeholders() {
        assert_eq!(
            parse_template("/pets").unwrap(),
            vec![TemplatePart::Literal("/pets".into())]
        );
    }

    #[test]
    fn test_braces_spanning_segments_are_literal() {
        assert_eq!(
            parse_template("/a/{b/c}").unwrap(),
            vec![TemplatePart::Literal("/a/{b/c}".into())]
        );
        assert!(PLACEHOLDER_RE.is_match("/{id}"));
    }

    #[test]
    fn test_duplicate_placeholder_rejected() {
        assert!(parse_template("/a/{id}/b/{id}").is_err());
    }
}
