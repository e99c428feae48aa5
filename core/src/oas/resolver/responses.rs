#![deny(missing_docs)]

//! # Response Selection
//!
//! Picks the success response whose schema decides an operation's
//! `serializer_descriptor`.

use crate::oas::paths::ResponseEntry;

/// Selects `200` if declared, else the lowest `2xx` code, with the `2XX`
/// range key ranking after every concrete code.
pub fn select_success_response(responses: &[ResponseEntry]) -> Option<&ResponseEntry> {
    if let Some(ok) = responses.iter().find(|r| r.status == "200") {
        return Some(ok);
    }
    responses
        .iter()
        .filter_map(|r| success_rank(&r.status).map(|rank| (rank, r)))
        .min_by_key(|(rank, _)| *rank)
        .map(|(_, r)| r)
}

fn success_rank(status: &str) -> Option<u16> {
    if status.eq_ignore_ascii_case("2xx") {
        return Some(300);
    }
    status
        .parse::<u16>()
        .ok()
        .filter(|code| (200..300).contains(code))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oas::pointer::JsonPointer;

    fn responses(codes: &[&str]) -> Vec<ResponseEntry> {
        codes
            .iter()
            .map(|code| ResponseEntry {
                status: code.to_string(),
                pointer: JsonPointer::from_segments(["responses", *code]),
                media_type: None,
                schema: None,
            })
            .collect()
    }

    fn selected(codes: &[&str]) -> Option<String> {
        let list = responses(codes);
        select_success_response(&list).map(|r| r.status.clone())
    }

    #[test]
    fn test_200_wins() {
        assert_eq!(selected(&["201", "default", "200"]).as_deref(), Some("200"));
    }

    #[test]
    fn test_lowest_2xx() {
        assert_eq!(selected(&["204", "201", "404"]).as_deref(), Some("201"));
        assert_eq!(selected(&["2XX", "202"]).as_deref(), Some("202"));
        assert_eq!(selected(&["2XX", "default"]).as_deref(), Some("2XX"));
    }

    #[test]
    fn test_no_success() {
        assert_eq!(selected(&["default", "404"]), None);
        assert_eq!(selected(&[]), None);
    }
}
