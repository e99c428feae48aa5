#![deny(missing_docs)]

//! # Naming Utilities
//!
//! Helper functions for deriving identifier-safe class and function names from
//! schema names, reference paths, URL paths and Operation IDs, plus the
//! registries that keep every derived name unique within a document.

use crate::error::{AppError, AppResult};
use crate::oas::models::HttpMethod;
use crate::oas::pointer::JsonPointer;
use heck::{ToSnakeCase, ToUpperCamelCase};
use std::collections::{HashMap, HashSet};

/// Words that cannot be used as identifiers in the generated code.
pub const RESERVED_WORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global", "if",
    "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return", "self",
    "try", "while", "with", "yield",
];

/// Reference-path segments that carry structure rather than meaning.
const STRUCTURAL_SEGMENTS: &[&str] = &[
    "definitions",
    "components",
    "schemas",
    "properties",
    "paths",
    "responses",
    "requestBodies",
    "requestBody",
    "parameters",
    "schema",
    "allOf",
];

/// Normalises raw names into identifiers.
#[derive(Debug, Clone)]
pub struct Identifiers {
    reserved: HashSet<String>,
}

impl Default for Identifiers {
    fn default() -> Self {
        Self::new(&[])
    }
}

impl Identifiers {
    /// Built-in reserved words plus `extra`.
    pub fn new(extra: &[String]) -> Self {
        let reserved = RESERVED_WORDS
            .iter()
            .map(|w| w.to_string())
            .chain(extra.iter().cloned())
            .collect();
        Self { reserved }
    }

    /// snake_case identifier (attributes, parameters, functions).
    pub fn snake(&self, raw: &str) -> String {
        self.sanitize(&raw.to_snake_case())
    }

    /// UpperCamelCase class name: `raw` in UpperCamelCase followed by `suffix`.
    pub fn class_name(&self, raw: &str, suffix: &str) -> String {
        self.sanitize(&format!("{}{}", raw.to_upper_camel_case(), suffix))
    }

    /// Replaces disallowed characters, prefixes a leading digit with `_` and
    /// suffixes reserved words with `_`.
    pub fn sanitize(&self, candidate: &str) -> String {
        let mut ident: String = candidate
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
            .collect();
        if ident.is_empty() {
            ident.push('_');
        }
        if ident.starts_with(|c: char| c.is_ascii_digit()) {
            ident.insert(0, '_');
        }
        if self.reserved.contains(&ident) {
            ident.push('_');
        }
        ident
    }
}

/// Derives a handler name from the HTTP Method and URL path when `operationId` is missing.
///
/// e.g. `GET /users/{id}` -> `get_users_id`
pub fn derive_handler_name(method: HttpMethod, path: &str) -> String {
    let slug = path.to_snake_case();
    let slug = if slug.is_empty() { "root".to_string() } else { slug };
    format!("{}_{}", method.as_str().to_lowercase(), slug)
}

/// UpperCamelCase base for an endpoint class: `/pets/{petId}` -> `PetsPetId`.
pub fn path_class_base(path: &str) -> String {
    let base = path.to_upper_camel_case();
    if base.is_empty() {
        "Root".to_string()
    } else {
        base
    }
}

/// Name for an anonymous schema, built from the meaningful segments of its reference path.
///
/// e.g. `#/paths/~1pets~1{petId}/get/responses/200/schema` -> `PetsPetIdGet200`
pub fn synthesized_schema_name(pointer: &JsonPointer) -> String {
    let mut name = String::new();
    let mut segments = pointer.segments().iter();
    while let Some(segment) = segments.next() {
        match segment.as_str() {
            "content" => {
                // the media type that follows
                segments.next();
            }
            "items" => name.push_str("Item"),
            s if STRUCTURAL_SEGMENTS.contains(&s) => {}
            s => name.push_str(&s.to_upper_camel_case()),
        }
    }
    if name.is_empty() {
        "Anonymous".to_string()
    } else {
        name
    }
}

/// Which namespace a registry guards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameKind {
    /// Generated classes (serializers and endpoints).
    Class,
    /// Generated functions.
    Function,
}

/// Names already handed out in one namespace, with the location that claimed each.
#[derive(Debug, Clone)]
pub struct NameRegistry {
    kind: NameKind,
    claimed: HashMap<String, JsonPointer>,
}

impl NameRegistry {
    /// An empty namespace.
    pub fn new(kind: NameKind) -> Self {
        Self {
            kind,
            claimed: HashMap::new(),
        }
    }

    /// Claims `name` for `at`, failing if another location already holds it.
    pub fn claim(&mut self, name: String, at: &JsonPointer) -> AppResult<String> {
        if let Some(first) = self.claimed.get(&name) {
            let (first, second) = (first.clone(), at.clone());
            return Err(match self.kind {
                NameKind::Class => AppError::DuplicateClassName { name, first, second },
                NameKind::Function => AppError::DuplicateFunctionName { name, first, second },
            });
        }
        self.claimed.insert(name.clone(), at.clone());
        Ok(name)
    }

    /// Claims `<base><suffix>`, inserting a numeric disambiguator before the
    /// suffix until the name is free (`PetOwner2Serializer`).
    pub fn claim_unique(
        &mut self,
        idents: &Identifiers,
        base: &str,
        suffix: &str,
        at: &JsonPointer,
    ) -> String {
        let mut n = 1usize;
        loop {
            let candidate = if n == 1 {
                idents.sanitize(&format!("{}{}", base, suffix))
            } else {
                idents.sanitize(&format!("{}{}{}", base, n, suffix))
            };
            if !self.claimed.contains_key(&candidate) {
                self.claimed.insert(candidate.clone(), at.clone());
                return candidate;
            }
            n += 1;
        }
    }

    /// Returns true when `name` is taken.
    pub fn contains(&self, name: &str) -> bool {
        self.claimed.contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snake_case_conversion() {
        let idents = Identifiers::default();
        assert_eq!(idents.snake("userId"), "user_id");
        assert_eq!(idents.snake("id"), "id");
        assert_eq!(idents.snake("camelCaseTemp"), "camel_case_temp");
        assert_eq!(idents.snake("GetUsers"), "get_users");
        assert_eq!(idents.snake("X-Request-ID"), "x_request_id");
    }

    #[test]
    fn test_reserved_and_leading_digit() {
        let idents = Identifiers::default();
        assert_eq!(idents.snake("class"), "class_");
        assert_eq!(idents.snake("from"), "from_");
        assert_eq!(idents.snake("self"), "self_");
        assert_eq!(idents.sanitize("2fa"), "_2fa");
        assert_eq!(idents.class_name("none", ""), "None_");
        assert_eq!(idents.class_name("user", "Serializer"), "UserSerializer");
    }

    #[test]
    fn test_extra_reserved_words() {
        let idents = Identifiers::new(&["type".to_string()]);
        assert_eq!(idents.snake("type"), "type_");
        assert_eq!(Identifiers::default().snake("type"), "type");
    }

    #[test]
    fn test_derive_handler_name() {
        assert_eq!(derive_handler_name(HttpMethod::Get, "/users"), "get_users");
        assert_eq!(
            derive_handler_name(HttpMethod::Post, "/users/{id}/activate"),
            "post_users_id_activate"
        );
        assert_eq!(derive_handler_name(HttpMethod::Get, "/"), "get_root");
    }

    #[test]
    fn test_path_class_base() {
        assert_eq!(path_class_base("/pets/{petId}"), "PetsPetId");
        assert_eq!(path_class_base("/pet-store/items"), "PetStoreItems");
        assert_eq!(path_class_base("/"), "Root");
    }

    #[test]
    fn test_synthesized_schema_names() {
        let p = JsonPointer::parse("#/paths/~1pets~1{petId}/get/responses/200/schema").unwrap();
        assert_eq!(synthesized_schema_name(&p), "PetsPetIdGet200");
        let p = JsonPointer::parse("#/definitions/Pet/properties/owner").unwrap();
        assert_eq!(synthesized_schema_name(&p), "PetOwner");
        let p = JsonPointer::parse(
            "#/paths/~1pets/post/requestBody/content/application~1json/schema/items",
        )
        .unwrap();
        assert_eq!(synthesized_schema_name(&p), "PetsPostItem");
    }

    #[test]
    fn test_claim_reports_both_locations() {
        let mut names = NameRegistry::new(NameKind::Class);
        let first = JsonPointer::parse("#/definitions/User").unwrap();
        let second = JsonPointer::parse("#/definitions/user").unwrap();
        names.claim("UserSerializer".into(), &first).unwrap();
        match names.claim("UserSerializer".into(), &second).unwrap_err() {
            AppError::DuplicateClassName { name, first: a, second: b } => {
                assert_eq!(name, "UserSerializer");
                assert_eq!(a, first);
                assert_eq!(b, second);
            }
            other => panic!("unexpected {other}"),
        }
    }

    #[test]
    fn test_claim_unique_inserts_disambiguator_before_suffix() {
        let idents = Identifiers::default();
        let mut names = NameRegistry::new(NameKind::Class);
        let at = JsonPointer::root();
        assert_eq!(names.claim_unique(&idents, "PetOwner", "Serializer", &at), "PetOwnerSerializer");
        assert_eq!(names.claim_unique(&idents, "PetOwner", "Serializer", &at), "PetOwner2Serializer");
        assert_eq!(names.claim_unique(&idents, "PetOwner", "Serializer", &at), "PetOwner3Serializer");
        assert!(names.contains("PetOwner2Serializer"));
    }
}
