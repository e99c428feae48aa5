#![deny(missing_docs)]

//! # JSON Pointers
//!
//! Reference paths used as the identity of every schema node and as the
//! source location attached to errors.
//!
//! These utilities never fetch external documents: a `$ref` is either a
//! fragment-only pointer into the current document or it is unresolvable.

use crate::error::{AppError, AppResult};
use percent_encoding::percent_decode_str;
use serde::{Serialize, Serializer};
use serde_json::Value as JsonValue;
use std::fmt;

/// A parsed JSON Pointer (RFC 6901) into the loaded document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JsonPointer {
    segments: Vec<String>,
}

impl JsonPointer {
    /// The pointer to the document root.
    pub fn root() -> Self {
        Self::default()
    }

    /// Builds a pointer from unescaped segments.
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    /// Parses `#/a/b`, `/a/b` or `#`.
    ///
    /// Fails when the string names another document (`other.yaml#/a`) or is not a pointer.
    pub fn parse(reference: &str) -> AppResult<Self> {
        let pointer = match reference.split_once('#') {
            Some(("", fragment)) => fragment,
            None if reference.starts_with('/') => reference,
            _ => {
                return Err(AppError::General(format!(
                    "reference '{}' points outside the loaded document",
                    reference
                )))
            }
        };
        if pointer.is_empty() {
            return Ok(Self::root());
        }
        if !pointer.starts_with('/') {
            return Err(AppError::General(format!(
                "reference '{}' is not a JSON pointer",
                reference
            )));
        }
        Ok(Self {
            segments: pointer[1..].split('/').map(decode_pointer_segment).collect(),
        })
    }

    /// Returns a new pointer with one more segment.
    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment.into());
        Self { segments }
    }

    /// Returns the unescaped segments.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Returns the last segment, if any.
    pub fn last(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// Returns true for the document root.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Walks a JSON value following this pointer.
    pub fn lookup<'a>(&self, root: &'a JsonValue) -> Option<&'a JsonValue> {
        self.segments
            .iter()
            .try_fold(root, |node, segment| match node {
                JsonValue::Object(map) => map.get(segment),
                JsonValue::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
                _ => None,
            })
    }
}

impl fmt::Display for JsonPointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#")?;
        for segment in &self.segments {
            write!(f, "/{}", encode_pointer_segment(segment))?;
        }
        Ok(())
    }
}

impl Serialize for JsonPointer {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

/// Decodes a JSON Pointer segment (handles percent-encoding, `~1` and `~0`).
pub(crate) fn decode_pointer_segment(segment: &str) -> String {
    let decoded = percent_decode_str(segment).decode_utf8_lossy();
    decoded.replace("~1", "/").replace("~0", "~")
}

fn encode_pointer_segment(segment: &str) -> String {
    segment.replace('~', "~0").replace('/', "~1")
}
