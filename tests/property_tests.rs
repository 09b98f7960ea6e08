//! Property-based tests for input parsing.
//!
//! These tests use proptest to verify invariants hold across
//! randomly generated inputs.

use proptest::prelude::*;

use gitutil::auth::extract_code;
use gitutil::core::types::{PathSet, Resolution};

/// Strategy for query values: no separators, never empty.
fn query_value() -> impl Strategy<Value = String> {
    "[A-Za-z0-9_.%-]{1,40}"
}

/// Strategy for parameter names other than `code`.
fn other_name() -> impl Strategy<Value = String> {
    "[a-z_]{1,12}".prop_filter("must not look like code", |name| !name.starts_with("code"))
}

proptest! {
    #[test]
    fn code_is_found_at_any_position(
        code in query_value(),
        before in prop::collection::vec((other_name(), query_value()), 0..4),
        after in prop::collection::vec((other_name(), query_value()), 0..4),
    ) {
        let mut params: Vec<String> = before.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
        params.push(format!("code={}", code));
        params.extend(after.iter().map(|(k, v)| format!("{}={}", k, v)));
        let query = params.join("&");

        prop_assert_eq!(extract_code(&query), Some(code.as_str()));
    }

    #[test]
    fn no_code_param_means_none(
        params in prop::collection::vec((other_name(), query_value()), 0..6),
    ) {
        let query = params
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&");

        prop_assert_eq!(extract_code(&query), None);
    }

    #[test]
    fn extracted_code_never_contains_separators(query in ".{0,80}") {
        if let Some(code) = extract_code(&query) {
            prop_assert!(!code.is_empty());
            prop_assert!(!code.contains('&'));
            prop_assert!(!code.contains('='));
        }
    }

    #[test]
    fn path_set_entries_are_trimmed_and_non_empty(
        entries in prop::collection::vec("[ ]{0,2}[a-z/.]{0,8}[ ]{0,2}", 1..8),
    ) {
        let input = entries.join(",");
        let expected: std::collections::BTreeSet<String> = entries
            .iter()
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty())
            .collect();

        match PathSet::parse(&input) {
            Ok(set) => {
                prop_assert!(!expected.is_empty());
                prop_assert_eq!(set.len(), expected.len());
                for path in set.iter() {
                    prop_assert!(expected.contains(path));
                    prop_assert_eq!(path, path.trim());
                }
            }
            Err(_) => prop_assert!(expected.is_empty()),
        }
    }

    #[test]
    fn only_one_to_three_are_choices(n in -10i64..10) {
        let parsed = Resolution::parse_input(&n.to_string());
        prop_assert_eq!(parsed.is_ok(), (1..=3).contains(&n));
    }
}
