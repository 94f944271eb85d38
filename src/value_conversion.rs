use chrono::{Datelike, NaiveDate};

/// Trims a raw field and returns it only if something is left.
pub fn non_empty(field: &str) -> Option<&str> {
    let trimmed = field.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

/// Lenient float parse: blank, malformed and non-finite values are absent.
pub fn parse_float(field: &str) -> Option<f64> {
    let value = non_empty(field)?.parse::<f64>().ok()?;
    value.is_finite().then_some(value)
}

/// Lenient integer parse.
///
/// Exports frequently carry integer identifiers in float notation
/// (`7960979.0`, `1e3`), so the value goes through `f64` and is truncated
/// toward zero. Anything outside the `i64` range is absent.
pub fn parse_int(field: &str) -> Option<i64> {
    let value = parse_float(field)?.trunc();
    // i64::MAX is not representable as f64; 2^63 is the first value out of range.
    if value >= -(2f64.powi(63)) && value < 2f64.powi(63) {
        Some(value as i64)
    } else {
        None
    }
}

/// Normalizes a date or ISO timestamp to canonical `YYYY-MM-DD`.
///
/// Everything after the first `T` is discarded. The remainder must be three
/// dash-separated integers forming a real calendar date in years 1 to 9999;
/// padding in the input does not matter.
pub fn normalize_date(field: &str) -> Option<String> {
    let trimmed = non_empty(field)?;
    let date_part = match trimmed.split_once('T') {
        Some((date, _time)) => date,
        None => trimmed,
    };

    let mut parts = date_part.splitn(3, '-');
    let year: i32 = parts.next()?.trim().parse().ok()?;
    let month: u32 = parts.next()?.trim().parse().ok()?;
    let day: u32 = parts.next()?.trim().parse().ok()?;

    if !(1..=9999).contains(&year) {
        return None;
    }
    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    Some(format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        date.month(),
        date.day()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty("  Urtica dioica "), Some("Urtica dioica"));
        assert_eq!(non_empty("   "), None);
        assert_eq!(non_empty(""), None);
    }

    #[test]
    fn test_parse_float() {
        assert_eq!(parse_float(" 40.6936 "), Some(40.6936));
        assert_eq!(parse_float("-89.5890"), Some(-89.589));
        assert_eq!(parse_float("north"), None);
        assert_eq!(parse_float(""), None);
        assert_eq!(parse_float("NaN"), None);
        assert_eq!(parse_float("inf"), None);
    }

    #[test]
    fn test_parse_int_accepts_float_notation() {
        assert_eq!(parse_int("7960979"), Some(7960979));
        assert_eq!(parse_int("7960979.0"), Some(7960979));
        assert_eq!(parse_int("1e3"), Some(1000));
        assert_eq!(parse_int("12.9"), Some(12));
        assert_eq!(parse_int("-12.9"), Some(-12));
    }

    #[test]
    fn test_parse_int_rejects_garbage() {
        assert_eq!(parse_int("abc"), None);
        assert_eq!(parse_int(""), None);
        assert_eq!(parse_int("nan"), None);
        assert_eq!(parse_int("1e30"), None);
    }

    #[test]
    fn test_normalize_date_pads_components() {
        assert_eq!(normalize_date("2021-6-1"), Some("2021-06-01".to_string()));
        assert_eq!(normalize_date("0999-01-01"), Some("0999-01-01".to_string()));
        assert_eq!(normalize_date("999-1-1"), Some("0999-01-01".to_string()));
    }

    #[test]
    fn test_normalize_date_strips_time() {
        assert_eq!(
            normalize_date("2020-05-17T14:03:00Z"),
            Some("2020-05-17".to_string())
        );
        assert_eq!(normalize_date(" 2020-05-17T "), Some("2020-05-17".to_string()));
    }

    #[test]
    fn test_normalize_date_rejects_invalid() {
        assert_eq!(normalize_date(""), None);
        assert_eq!(normalize_date("2021-02-30"), None);
        assert_eq!(normalize_date("2021-13-01"), None);
        assert_eq!(normalize_date("2021-06"), None);
        assert_eq!(normalize_date("2021/06/01"), None);
        assert_eq!(normalize_date("2020-01-01/2020-12-31"), None);
        assert_eq!(normalize_date("0000-01-01"), None);
        assert_eq!(normalize_date("T2020-01-01"), None);
    }

    #[test]
    fn test_normalize_date_is_idempotent() {
        for raw in ["2021-6-1", "2020-05-17T14:03:00Z", "1999-12-31", "0042-2-28"] {
            let once = normalize_date(raw).unwrap();
            assert_eq!(normalize_date(&once).as_deref(), Some(once.as_str()));
        }
    }
}
