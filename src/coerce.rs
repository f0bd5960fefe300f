//! Best-effort numeric parsing for scraped text.
//!
//! Both helpers return `None` for missing input, non-numeric text and values
//! that do not fit. Thousands separators are not handled here; callers strip
//! them first when the source format uses them.

pub fn safe_int(value: Option<&str>) -> Option<i64> {
    value?.trim().parse::<i64>().ok()
}

/// Non-finite results count as failures because they cannot be written as
/// JSON numbers.
pub fn safe_float(value: Option<&str>) -> Option<f64> {
    value?
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn safe_int_parses_plain_integers() {
        assert_eq!(safe_int(Some("12345")), Some(12345));
        assert_eq!(safe_int(Some(" 42 ")), Some(42));
        assert_eq!(safe_int(Some("-7")), Some(-7));
    }

    #[test]
    fn safe_int_rejects_garbage() {
        assert_eq!(safe_int(None), None);
        assert_eq!(safe_int(Some("")), None);
        assert_eq!(safe_int(Some("abc")), None);
        assert_eq!(safe_int(Some("12.5")), None);
        assert_eq!(safe_int(Some("99999999999999999999999")), None);
    }

    #[test]
    fn safe_float_parses_and_rejects() {
        assert_eq!(safe_float(Some("45.3")), Some(45.3));
        assert_eq!(safe_float(Some("7")), Some(7.0));
        assert_eq!(safe_float(Some("abc")), None);
        assert_eq!(safe_float(None), None);
        assert_eq!(safe_float(Some("NaN")), None);
        assert_eq!(safe_float(Some("inf")), None);
    }
}
