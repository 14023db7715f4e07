//! Token-level coercion of CSV cells into typed values.

/// Turn a cell into a number, or `None` when it can't be read as one.
///
/// Thousands separators are stripped first. A token that still isn't a plain number
/// contributes its first numeric substring ("1,234 $" -> 1234.0, "12.5E" -> 12.5).
/// Blank cells and markers like "N/A", "..", "x" or "F" come back as missing, never zero.
pub fn coerce_numeric(token: &str) -> Option<f64> {
    let stripped: String = token.trim().chars().filter(|c| *c != ',').collect();
    if stripped.is_empty() {
        return None;
    }
    if let Ok(value) = stripped.parse::<f64>()
        && value.is_finite()
    {
        return Some(value);
    }
    first_numeric_substring(&stripped)
}

fn first_numeric_substring(text: &str) -> Option<f64> {
    let bytes = text.as_bytes();
    let start = bytes.iter().position(|b| b.is_ascii_digit())?;

    let mut end = start;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    // Optional fractional part, only if a digit follows the point
    if end + 1 < bytes.len() && bytes[end] == b'.' && bytes[end + 1].is_ascii_digit() {
        end += 1;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
    }

    let begin = if start > 0 && bytes[start - 1] == b'-' {
        start - 1
    } else {
        start
    };
    text[begin..end].parse::<f64>().ok()
}

/// Whole, non-negative count (bed/bath numbers). Accepts "3", "3.0", " 3 ".
pub fn coerce_count(token: &str) -> Option<u32> {
    let value = coerce_numeric(token)?;
    if value < 0.0 || value.fract() != 0.0 || value > u32::MAX as f64 {
        return None;
    }
    Some(value as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_and_separated_numbers() {
        assert_eq!(coerce_numeric("42"), Some(42.0));
        assert_eq!(coerce_numeric(" 1,234.50 "), Some(1234.5));
        assert_eq!(coerce_numeric("-3.25"), Some(-3.25));
        assert_eq!(coerce_numeric("1,250,000"), Some(1_250_000.0));
    }

    #[test]
    fn test_mixed_tokens_extract_first_number() {
        assert_eq!(coerce_numeric("1,034.17E"), Some(1034.17));
        assert_eq!(coerce_numeric("$ 950"), Some(950.0));
        assert_eq!(coerce_numeric("approx -12 units"), Some(-12.0));
        assert_eq!(coerce_numeric("7."), Some(7.0));
    }

    #[test]
    fn test_missing_markers() {
        for token in ["", "   ", "N/A", "..", "x", "F", "NaN", "inf", "-"] {
            assert_eq!(coerce_numeric(token), None, "token {:?}", token);
        }
    }

    #[test]
    fn test_coerce_count() {
        assert_eq!(coerce_count("3"), Some(3));
        assert_eq!(coerce_count("3.0"), Some(3));
        assert_eq!(coerce_count("2.5"), None);
        assert_eq!(coerce_count("-1"), None);
        assert_eq!(coerce_count("studio"), None);
    }
}
