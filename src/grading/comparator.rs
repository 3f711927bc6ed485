//! Line-by-line output comparison

use crate::{constants::MISSING_LINE, models::TestVerdict};

/// Lines that are not blank after trimming, kept as written
fn non_blank_lines(output: &str) -> Vec<&str> {
    output
        .split('\n')
        .filter(|line| !line.trim().is_empty())
        .collect()
}

/// Compare program output against the expected output.
///
/// Blank lines are dropped on both sides, then lines are paired by position.
/// A side that runs out of lines contributes the literal `"null"`. Pairs must
/// match exactly: no whitespace, case or numeric tolerance.
pub fn compare_outputs(actual: &str, expected: &str) -> Vec<TestVerdict> {
    let actual_lines = non_blank_lines(actual);
    let expected_lines = non_blank_lines(expected);
    let total = actual_lines.len().max(expected_lines.len());

    (0..total)
        .map(|index| {
            let actual_line = actual_lines.get(index).copied().unwrap_or(MISSING_LINE);
            let expected_line = expected_lines.get(index).copied().unwrap_or(MISSING_LINE);

            TestVerdict {
                index,
                expected_line: expected_line.to_string(),
                actual_line: actual_line.to_string(),
                passed: actual_line == expected_line,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_lines_are_ignored() {
        let verdicts = compare_outputs("5\n\n7", "5\n7");

        assert_eq!(verdicts.len(), 2);
        assert!(verdicts.iter().all(|v| v.passed));
    }

    #[test]
    fn test_whitespace_only_lines_are_blank() {
        let verdicts = compare_outputs("1\n   \n\t\n2\n", "1\n2");

        assert_eq!(verdicts.len(), 2);
        assert!(verdicts.iter().all(|v| v.passed));
    }

    #[test]
    fn test_missing_lines_compare_against_null() {
        let verdicts = compare_outputs("1", "1\n2\n3");

        assert_eq!(verdicts.len(), 3);
        assert!(verdicts[0].passed);
        assert_eq!(verdicts[1].actual_line, "null");
        assert_eq!(verdicts[1].expected_line, "2");
        assert!(!verdicts[1].passed);
        assert!(!verdicts[2].passed);
    }

    #[test]
    fn test_extra_actual_lines_fail() {
        let verdicts = compare_outputs("1\n2", "1");

        assert_eq!(verdicts.len(), 2);
        assert_eq!(verdicts[1].expected_line, "null");
        assert!(!verdicts[1].passed);
    }

    #[test]
    fn test_literal_null_output_matches_missing_line() {
        // The sentinel is a plain string, so printing "null" matches an absent line
        let verdicts = compare_outputs("1\nnull", "1");

        assert!(verdicts[1].passed);
    }

    #[test]
    fn test_comparison_is_exact() {
        let verdicts = compare_outputs("Hello \nYES\n1.0", "Hello\nyes\n1");

        assert_eq!(verdicts.len(), 3);
        assert!(verdicts.iter().all(|v| !v.passed));
    }

    #[test]
    fn test_order_is_preserved() {
        let verdicts = compare_outputs("a\nx\nc", "a\nb\nc");

        let indexes: Vec<usize> = verdicts.iter().map(|v| v.index).collect();
        assert_eq!(indexes, vec![0, 1, 2]);
        assert_eq!(
            verdicts.iter().map(|v| v.passed).collect::<Vec<_>>(),
            vec![true, false, true]
        );
    }

    #[test]
    fn test_both_empty() {
        assert!(compare_outputs("", "").is_empty());
        assert!(compare_outputs("\n \n", "\n").is_empty());
    }

    #[test]
    fn test_carriage_returns_are_kept() {
        // Only `\n` splits lines; a trailing `\r` is part of the line text
        let verdicts = compare_outputs("1\r\n2\r\n", "1\n2");

        assert_eq!(verdicts.len(), 2);
        assert!(!verdicts[0].passed);
    }
}
