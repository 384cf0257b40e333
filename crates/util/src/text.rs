/// Strip whitespace and non-printable characters from both ends of a spreadsheet cell.
///
/// Spreadsheets exported by instruments often contain trailing tabs, non-breaking spaces or
/// control characters which must not take part in name comparisons.
pub fn strip_cell(value: &str) -> &str {
    value.trim_matches(|c: char| c.is_whitespace() || c.is_control() || is_invisible(c))
}

fn is_invisible(c: char) -> bool {
    matches!(c, '\u{200B}'..='\u{200D}' | '\u{2060}' | '\u{FEFF}')
}

/// Format a numeric cell as text, integral values are rendered without a fractional part.
pub fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

#[cfg(test)]
mod text_tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("GENE1", "GENE1")]
    #[case("  GENE1\t", "GENE1")]
    #[case("\u{00A0}GENE 1\u{00A0}", "GENE 1")]
    #[case("\u{FEFF}GENE1\u{0007}", "GENE1")]
    #[case(" \t\r\n", "")]
    #[case("inner  spaces kept", "inner  spaces kept")]
    fn strip(#[case] value: &str, #[case] expected: &str) {
        assert_eq!(strip_cell(value), expected);
    }

    #[rstest]
    #[case(1.0, "1")]
    #[case(-3.0, "-3")]
    #[case(0.25, "0.25")]
    #[case(12345.5, "12345.5")]
    fn numbers(#[case] value: f64, #[case] expected: &str) {
        assert_eq!(format_number(value), expected);
    }
}
