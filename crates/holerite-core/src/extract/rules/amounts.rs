//! Amount normalization for Brazilian-formatted numbers.

/// Normalize a Brazilian-formatted number (e.g. "1.234,56" -> "1234.56").
///
/// Every `.` (thousands separator) is removed, then every `,` (decimal
/// separator) becomes `.`. The result is not checked: malformed tokens go
/// through the same substitutions and come back as-is otherwise.
pub fn normalize_value(raw: &str) -> String {
    raw.replace('.', "").replace(',', ".")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_value() {
        assert_eq!(normalize_value("1.234,56"), "1234.56");
        assert_eq!(normalize_value("50,00"), "50.00");
        assert_eq!(normalize_value("0,00"), "0.00");
        assert_eq!(normalize_value("12.345.678,90"), "12345678.90");
    }

    #[test]
    fn test_normalize_value_passes_through() {
        assert_eq!(normalize_value("1500"), "1500");
        assert_eq!(normalize_value(""), "");
        assert_eq!(normalize_value("abc"), "abc");
        // Malformed tokens are not rejected
        assert_eq!(normalize_value("1,2,3"), "1.2.3");
        assert_eq!(normalize_value("..,"), ".");
    }
}
