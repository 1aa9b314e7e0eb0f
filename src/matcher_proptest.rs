//! Property-based tests for exclusion pattern matching.
//!
//! These tests use proptest to generate random inputs and verify that
//! invariants hold for all possible inputs.

#[cfg(test)]
mod proptest_tests {
    use crate::matcher::is_excluded;
    use proptest::prelude::*;

    proptest! {
        /// Property: matching is deterministic (same inputs = same answer)
        #[test]
        fn matching_is_deterministic(
            candidate in "[a-zA-Z0-9_./\\\\]{1,30}",
            pattern in "[a-zA-Z0-9_./\\\\]{1,20}",
        ) {
            let patterns = vec![pattern];
            let result1 = is_excluded(&candidate, &patterns);
            let result2 = is_excluded(&candidate, &patterns);
            prop_assert_eq!(result1, result2);
        }

        /// Property: matching is case-insensitive in both directions
        #[test]
        fn matching_is_case_insensitive(name in "[a-zA-Z]{1,20}") {
            let lower = vec![name.to_lowercase()];
            let upper = vec![name.to_uppercase()];
            prop_assert!(is_excluded(&name, &lower));
            prop_assert!(is_excluded(&name, &upper));
            prop_assert!(is_excluded(&name.to_uppercase(), &lower));
            prop_assert!(is_excluded(&name.to_lowercase(), &upper));
        }

        /// Property: separator style never changes the answer
        #[test]
        fn matching_is_separator_invariant(
            a in "[a-zA-Z0-9]{1,10}",
            b in "[a-zA-Z0-9]{1,10}",
        ) {
            let forward = format!("{}/{}", a, b);
            let backward = format!("{}\\{}", a, b);
            let patterns = vec![forward.clone()];
            prop_assert_eq!(
                is_excluded(&forward, &patterns),
                is_excluded(&backward, &patterns)
            );
            prop_assert!(is_excluded(&backward, &patterns));
        }

        /// Property: any candidate matches its own exact name
        #[test]
        fn candidate_matches_itself(name in "[a-zA-Z0-9_.]{1,20}") {
            let patterns = vec![name.clone()];
            prop_assert!(is_excluded(&name, &patterns));
        }

        /// Property: a pattern equal to the candidate's basename always matches,
        /// no matter how deep the candidate path is
        #[test]
        fn basename_pattern_matches_at_any_depth(
            dirs in proptest::collection::vec("[a-zA-Z0-9]{1,8}", 0..4),
            name in "[a-zA-Z0-9_.]{1,12}",
        ) {
            let mut segments = dirs;
            segments.push(name.clone());
            let candidate = segments.join("/");
            prop_assert!(is_excluded(&candidate, &[name]));
        }

        /// Property: blank patterns never cause a match
        #[test]
        fn blank_patterns_never_match(candidate in "[a-zA-Z0-9_.]{1,20}") {
            let patterns = vec!["".to_string(), "   ".to_string()];
            prop_assert!(!is_excluded(&candidate, &patterns));
        }
    }
}
