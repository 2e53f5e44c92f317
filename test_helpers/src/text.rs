//! Shared text normalisation helpers for behavioural test suites.

/// Strips one layer of matching single or double quotes from a value.
#[must_use]
pub fn unquote(value: &str) -> &str {
    let trimmed = value.trim();
    if let Some(stripped) = trimmed.strip_prefix('"').and_then(|v| v.strip_suffix('"')) {
        return stripped;
    }
    if let Some(stripped) = trimmed
        .strip_prefix('\'')
        .and_then(|v| v.strip_suffix('\''))
    {
        return stripped;
    }
    trimmed
}

/// Normalises a scalar placeholder by trimming and unquoting one outer layer.
#[must_use]
pub fn normalize_scalar(value: &str) -> String {
    unquote(value).trim().to_owned()
}

/// Returns `true` when some line of `source`, ignoring indentation, equals
/// `expected`.
#[must_use]
pub fn has_line(source: &str, expected: &str) -> bool {
    let wanted = expected.trim();
    source.lines().any(|line| line.trim() == wanted)
}

/// Number of lines of `source` that contain `needle`.
#[must_use]
pub fn count_lines_containing(source: &str, needle: &str) -> usize {
    source.lines().filter(|line| line.contains(needle)).count()
}

#[cfg(test)]
mod tests {
    use super::{count_lines_containing, has_line, normalize_scalar, unquote};

    #[test]
    fn unquote_removes_single_outer_quotes() {
        assert_eq!(unquote("'value'"), "value");
        assert_eq!(unquote("\"value\""), "value");
    }

    #[test]
    fn normalize_scalar_trims_whitespace() {
        assert_eq!(normalize_scalar("  'value'  "), "value");
    }

    #[test]
    fn has_line_ignores_indentation() {
        let source = "class A\n{\n    public A()\n}\n";
        assert!(has_line(source, "public A()"));
        assert!(!has_line(source, "public B()"));
    }

    #[test]
    fn count_lines_containing_counts_each_line_once() {
        assert_eq!(count_lines_containing("_x _x\n_y\n_x\n", "_x"), 2);
    }
}
