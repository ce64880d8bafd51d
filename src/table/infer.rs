// src/table/infer.rs

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use super::DType;

/// Timestamp layouts the Indego exports have used across years.
const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y/%m/%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Parse a timestamp cell into millis since the epoch, naive wall-clock.
pub fn parse_timestamp_millis(s: &str) -> Option<i64> {
    let s = s.trim();
    for fmt in TIMESTAMP_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.and_utc().timestamp_millis());
        }
    }
    // bare dates load as midnight
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN).and_utc().timestamp_millis())
}

pub fn parse_int(s: &str) -> Option<i64> {
    s.trim().parse().ok()
}

pub fn parse_float(s: &str) -> Option<f64> {
    s.trim().parse().ok()
}

/// Infer a column dtype from its raw cells: `Int64` if every present cell
/// parses as an integer, else `Float64`, else `TimestampMs`, else `Utf8`.
/// A column with no present cells falls back to `Utf8`.
pub fn infer_dtype(values: &[Option<String>]) -> DType {
    let mut saw_value = false;
    let mut int_ok = true;
    let mut float_ok = true;
    let mut ts_ok = true;

    for v in values.iter().flatten() {
        saw_value = true;
        if int_ok && parse_int(v).is_none() {
            int_ok = false;
        }
        if float_ok && parse_float(v).is_none() {
            float_ok = false;
        }
        if ts_ok && parse_timestamp_millis(v).is_none() {
            ts_ok = false;
        }
        if !int_ok && !float_ok && !ts_ok {
            return DType::Utf8;
        }
    }

    if !saw_value {
        DType::Utf8
    } else if int_ok {
        DType::Int64
    } else if float_ok {
        DType::Float64
    } else if ts_ok {
        DType::TimestampMs
    } else {
        DType::Utf8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(vals: &[Option<&str>]) -> Vec<Option<String>> {
        vals.iter().map(|v| v.map(str::to_string)).collect()
    }

    fn millis(y: i32, mo: u32, d: u32, h: u32, mi: u32, se: u32) -> i64 {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, se)
            .unwrap()
            .and_utc()
            .timestamp_millis()
    }

    #[test]
    fn parses_every_known_timestamp_layout() {
        let expected = millis(2016, 7, 1, 0, 6, 0);
        assert_eq!(parse_timestamp_millis("2016-07-01 00:06:00"), Some(expected));
        assert_eq!(parse_timestamp_millis("2016/07/01 00:06:00"), Some(expected));
        assert_eq!(parse_timestamp_millis("7/1/2016 0:06:00"), Some(expected));
        assert_eq!(parse_timestamp_millis("7/1/2016 0:06"), Some(expected));
        assert_eq!(
            parse_timestamp_millis("2016-07-01"),
            Some(millis(2016, 7, 1, 0, 0, 0))
        );
    }

    #[test]
    fn rejects_non_timestamps() {
        assert_eq!(parse_timestamp_millis("Station 3004"), None);
        assert_eq!(parse_timestamp_millis("19104-1234"), None);
        assert_eq!(parse_timestamp_millis(""), None);
    }

    #[test]
    fn integer_columns_infer_int64() {
        assert_eq!(infer_dtype(&cells(&[Some("1"), Some("-2"), Some("+3")])), DType::Int64);
        // nulls do not disturb the inference
        assert_eq!(infer_dtype(&cells(&[Some("1"), None, Some("3")])), DType::Int64);
        // numeric parsing tolerates surrounding whitespace
        assert_eq!(infer_dtype(&cells(&[Some(" 42 ")])), DType::Int64);
    }

    #[test]
    fn mixed_numerics_widen_to_float64() {
        assert_eq!(infer_dtype(&cells(&[Some("1"), Some("2.5")])), DType::Float64);
        assert_eq!(infer_dtype(&cells(&[Some("6.5"), Some("1e3")])), DType::Float64);
    }

    #[test]
    fn timestamp_columns_infer_timestamp() {
        assert_eq!(
            infer_dtype(&cells(&[Some("2016-07-01 00:06:00"), None, Some("7/1/2016 1:30")])),
            DType::TimestampMs
        );
    }

    #[test]
    fn anything_else_is_text() {
        assert_eq!(infer_dtype(&cells(&[Some("Indego30"), Some("Walk-up")])), DType::Utf8);
        assert_eq!(
            infer_dtype(&cells(&[Some("2016-07-01 00:06:00"), Some("oops")])),
            DType::Utf8
        );
        assert_eq!(infer_dtype(&cells(&[Some("1"), Some("one")])), DType::Utf8);
    }

    #[test]
    fn value_free_columns_fall_back_to_text() {
        assert_eq!(infer_dtype(&cells(&[])), DType::Utf8);
        assert_eq!(infer_dtype(&cells(&[None, None])), DType::Utf8);
    }
}
