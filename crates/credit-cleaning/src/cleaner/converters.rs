//! Type conversions: district numbers, currency amounts and benefit dates.
//!
//! All three are strict. A single value that cannot be converted aborts the
//! conversion; nothing is silently nulled or skipped.

use crate::error::{CleaningError, Result};
use crate::table::RequestTable;
use crate::utils::{is_numeric_dtype, series, text_values};
use chrono::{Datelike, Local, NaiveDate, NaiveDateTime, NaiveTime};
use once_cell::sync::Lazy;
use polars::prelude::*;
use regex::Regex;
use tracing::debug;

/// Three numeric date parts separated by `/`, `-` or `.`.
static NUMERIC_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{1,4})[/.\-](\d{1,2})[/.\-](\d{1,4})$").expect("Invalid regex: numeric date")
});

/// Characters stripped from currency amounts before parsing.
static CURRENCY_SYMBOLS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[$,]").expect("Invalid regex: currency symbols"));

const TIME_FORMATS: [&str; 5] = [
    "%H:%M:%S%.f",
    "%H:%M:%S",
    "%H:%M",
    "%I:%M:%S %p",
    "%I:%M %p",
];

const TEXTUAL_DATE_FORMATS: [&str; 7] = [
    "%d %B %Y",
    "%d %b %Y",
    "%d-%B-%Y",
    "%d-%b-%Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%B %d %Y",
];

// =============================================================================
// Scalar conversions
// =============================================================================

/// Parse a float-like string and truncate it toward zero.
///
/// `"16.0"` gives 16, `"8.9"` gives 8 and `"-2.7"` gives -2. Values that are
/// not finite numbers or fall outside the `i64` range give `None`.
pub fn truncate_to_int(value: &str) -> Option<i64> {
    let parsed = value.trim().parse::<f64>().ok()?;
    if !parsed.is_finite() {
        return None;
    }
    let truncated = parsed.trunc();
    if truncated < i64::MIN as f64 || truncated >= i64::MAX as f64 {
        return None;
    }
    Some(truncated as i64)
}

/// Strip `$` and `,`, trim, then truncate like [`truncate_to_int`].
///
/// `"$1,200.50"` gives 1200.
pub fn currency_to_int(value: &str) -> Option<i64> {
    let stripped = CURRENCY_SYMBOLS.replace_all(value, "");
    truncate_to_int(stripped.trim())
}

/// Parse a date or date-time written in any of the accepted formats,
/// reading ambiguous numeric dates day first.
///
/// Numeric dates with a four-digit leading part are year-month-day. All
/// other numeric dates are day-month-year; when that reading is not a real
/// calendar date the month-day-year reading is tried. One- and two-digit
/// years land in the century window around the current year (see
/// [`expand_short_year`]). A 24-hour or AM/PM time may follow after a space
/// or `T`.
pub fn parse_day_first(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Some(date) = parse_textual_date(value) {
        return date.and_hms_opt(0, 0, 0);
    }

    let (date_part, time_part) = match value.find([' ', 'T']) {
        Some(pos) => (&value[..pos], Some(value[pos + 1..].trim())),
        None => (value, None),
    };

    let date = parse_numeric_date(date_part)?;
    let time = match time_part {
        Some(text) => parse_time(text)?,
        None => NaiveTime::MIN,
    };
    Some(date.and_time(time))
}

fn parse_numeric_date(text: &str) -> Option<NaiveDate> {
    let caps = NUMERIC_DATE.captures(text)?;
    let first = &caps[1];
    let second: u32 = caps[2].parse().ok()?;
    let third = &caps[3];

    if first.len() == 4 {
        let year: i32 = first.parse().ok()?;
        let day: u32 = third.parse().ok()?;
        return NaiveDate::from_ymd_opt(year, second, day);
    }
    if first.len() > 2 {
        return None;
    }

    let leading: u32 = first.parse().ok()?;
    let year = expand_year(third)?;
    NaiveDate::from_ymd_opt(year, second, leading)
        .or_else(|| NaiveDate::from_ymd_opt(year, leading, second))
}

fn expand_year(text: &str) -> Option<i32> {
    let year: i32 = text.parse().ok()?;
    match text.len() {
        1 | 2 => Some(expand_short_year(year, Local::now().year())),
        4 => Some(year),
        _ => None,
    }
}

/// Place a year written without its century within 50 years of
/// `current_year`.
///
/// In 2026, `75` is 2075 and `76` is 1976.
pub fn expand_short_year(year: i32, current_year: i32) -> i32 {
    let expanded = year + current_year / 100 * 100;
    if expanded >= current_year + 50 {
        expanded - 100
    } else if expanded < current_year - 50 {
        expanded + 100
    } else {
        expanded
    }
}

fn parse_time(text: &str) -> Option<NaiveTime> {
    TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(text, fmt).ok())
}

fn parse_textual_date(text: &str) -> Option<NaiveDate> {
    if !text.chars().any(char::is_alphabetic) {
        return None;
    }
    TEXTUAL_DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
}

// =============================================================================
// Column conversions
// =============================================================================

/// Convert a float-like district column to integers by truncation and tag
/// it categorical.
///
/// Columns that are already numeric are cast to `Int64`, which truncates
/// floats the same way.
pub fn normalize_district(table: &RequestTable, column: &str) -> Result<RequestTable> {
    let source = series(table.frame(), column)?;

    let converted = if is_numeric_dtype(source.dtype()) {
        source.cast(&DataType::Int64)?
    } else {
        let values = text_values(table.frame(), column, "Int64")?;
        let mut result_vec: Vec<Option<i64>> = Vec::with_capacity(values.len());
        for opt_val in values.into_iter() {
            match opt_val {
                Some(val) => result_vec.push(Some(truncate_to_int(val).ok_or_else(|| {
                    CleaningError::TypeConversionFailed {
                        column: column.to_string(),
                        target_type: "Int64".to_string(),
                        reason: format!("'{}' is not a finite number", val),
                    }
                })?)),
                None => result_vec.push(None),
            }
        }
        Series::new(column.into(), result_vec)
    };

    debug!("Converted '{}' to integer districts", column);
    Ok(table
        .with_replaced_column(converted)?
        .tagged_categorical(column))
}

/// Convert a currency column such as `"$1,200.50"` to whole amounts.
pub fn normalize_currency(table: &RequestTable, column: &str) -> Result<RequestTable> {
    let values = text_values(table.frame(), column, "Int64")?;
    let mut result_vec: Vec<Option<i64>> = Vec::with_capacity(values.len());

    for opt_val in values.into_iter() {
        match opt_val {
            Some(val) => {
                let amount =
                    currency_to_int(val).ok_or_else(|| CleaningError::TypeConversionFailed {
                        column: column.to_string(),
                        target_type: "Int64".to_string(),
                        reason: format!("'{}' is not a currency amount", val),
                    })?;
                result_vec.push(Some(amount));
            }
            None => result_vec.push(None),
        }
    }

    debug!("Converted '{}' from currency text to integers", column);
    table.with_replaced_column(Series::new(column.into(), result_vec))
}

/// Parse a date column with [`parse_day_first`] into a millisecond datetime
/// column.
///
/// The first value that cannot be parsed aborts the conversion with
/// [`CleaningError::DateParseFailed`].
pub fn normalize_benefit_date(table: &RequestTable, column: &str) -> Result<RequestTable> {
    let values = text_values(table.frame(), column, "Datetime")?;
    let mut timestamps: Vec<Option<i64>> = Vec::with_capacity(values.len());

    for (row, opt_val) in values.into_iter().enumerate() {
        match opt_val {
            Some(val) => {
                let parsed = parse_day_first(val).ok_or_else(|| CleaningError::DateParseFailed {
                    column: column.to_string(),
                    row,
                    id: row_identifier(table, row),
                    value: val.to_string(),
                })?;
                timestamps.push(Some(parsed.and_utc().timestamp_millis()));
            }
            None => timestamps.push(None),
        }
    }

    let timestamp_series = Series::new(column.into(), timestamps);
    let datetimes = timestamp_series.cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?;

    debug!("Parsed '{}' as day-first dates", column);
    table.with_replaced_column(datetimes)
}

/// Text of the row identifier at `row`, empty when it is null.
fn row_identifier(table: &RequestTable, row: usize) -> String {
    let Ok(index) = series(table.frame(), table.index_column()) else {
        return String::new();
    };
    index
        .cast(&DataType::String)
        .ok()
        .and_then(|ids| ids.str().ok().and_then(|ids| ids.get(row)).map(str::to_string))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn table(column: &str, values: &[Option<&str>]) -> RequestTable {
        let ids: Vec<String> = (0..values.len()).map(|i| i.to_string()).collect();
        let frame = DataFrame::new(vec![
            Series::new("row_id".into(), ids).into(),
            Series::new(column.into(), values).into(),
        ])
        .unwrap();
        RequestTable::new(frame).unwrap()
    }

    fn ints(table: &RequestTable, column: &str) -> Vec<Option<i64>> {
        let series = table.frame().column(column).unwrap().as_materialized_series();
        series.i64().unwrap().into_iter().collect()
    }

    // ========================================================================
    // Scalar conversions
    // ========================================================================

    #[test]
    fn test_truncate_to_int() {
        assert_eq!(truncate_to_int("16.0"), Some(16));
        assert_eq!(truncate_to_int("8.9"), Some(8));
        assert_eq!(truncate_to_int(" 4 "), Some(4));
        assert_eq!(truncate_to_int("-2.7"), Some(-2));
        assert_eq!(truncate_to_int("abc"), None);
        assert_eq!(truncate_to_int("nan"), None);
        assert_eq!(truncate_to_int("inf"), None);
        assert_eq!(truncate_to_int(""), None);
    }

    #[test]
    fn test_currency_to_int() {
        assert_eq!(currency_to_int("$1,200.50"), Some(1200));
        assert_eq!(currency_to_int("$ 3,500,000.00"), Some(3_500_000));
        assert_eq!(currency_to_int("850000.99"), Some(850_000));
        assert_eq!(currency_to_int("$$1,0,0"), Some(100));
        assert_eq!(currency_to_int("USD 100"), None);
        assert_eq!(currency_to_int("$"), None);
    }

    #[test]
    fn test_parse_day_first_scenario() {
        assert_eq!(parse_day_first("05/03/2021"), Some(ymd(2021, 3, 5)));
        assert_eq!(parse_day_first("5/3/2021"), Some(ymd(2021, 3, 5)));
        assert_eq!(parse_day_first("05-03-2021"), Some(ymd(2021, 3, 5)));
        assert_eq!(parse_day_first("05.03.2021"), Some(ymd(2021, 3, 5)));
    }

    #[test]
    fn test_parse_year_first() {
        assert_eq!(parse_day_first("2021-03-05"), Some(ymd(2021, 3, 5)));
        assert_eq!(parse_day_first("2019/06/22"), Some(ymd(2019, 6, 22)));
    }

    #[test]
    fn test_parse_falls_back_to_month_first() {
        assert_eq!(parse_day_first("03/25/2020"), Some(ymd(2020, 3, 25)));
    }

    #[test]
    fn test_parse_short_years() {
        assert_eq!(parse_day_first("05/03/21"), Some(ymd(2021, 3, 5)));
        assert_eq!(parse_day_first("5/3/1"), Some(ymd(2001, 3, 5)));
    }

    #[test]
    fn test_expand_short_year_window() {
        assert_eq!(expand_short_year(69, 2026), 2069);
        assert_eq!(expand_short_year(75, 2026), 2075);
        assert_eq!(expand_short_year(76, 2026), 1976);
        assert_eq!(expand_short_year(1, 2026), 2001);
        assert_eq!(expand_short_year(99, 2026), 1999);
        assert_eq!(expand_short_year(10, 2080), 2110);
        assert_eq!(expand_short_year(40, 2080), 2040);
    }

    #[test]
    fn test_parse_with_time() {
        let expected = NaiveDate::from_ymd_opt(2021, 3, 5)
            .unwrap()
            .and_hms_opt(14, 30, 0)
            .unwrap();
        assert_eq!(parse_day_first("05/03/2021 14:30"), Some(expected));
        assert_eq!(parse_day_first("2021-03-05T14:30:00"), Some(expected));
        assert_eq!(parse_day_first("2021-03-05 14:30:00.000"), Some(expected));
        assert_eq!(parse_day_first("05/03/2021 2:30 PM"), Some(expected));
        assert_eq!(parse_day_first("05/03/2021 02:30:00 pm"), Some(expected));
        assert_eq!(
            parse_day_first("05/03/2021 12:15 AM"),
            NaiveDate::from_ymd_opt(2021, 3, 5).unwrap().and_hms_opt(0, 15, 0)
        );
    }

    #[test]
    fn test_parse_textual_months() {
        assert_eq!(parse_day_first("5 March 2021"), Some(ymd(2021, 3, 5)));
        assert_eq!(parse_day_first("5 Mar 2021"), Some(ymd(2021, 3, 5)));
        assert_eq!(parse_day_first("March 5, 2021"), Some(ymd(2021, 3, 5)));
        assert_eq!(parse_day_first("5-Mar-2021"), Some(ymd(2021, 3, 5)));
        assert_eq!(parse_day_first("05-March-2021"), Some(ymd(2021, 3, 5)));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_day_first(""), None);
        assert_eq!(parse_day_first("not a date"), None);
        assert_eq!(parse_day_first("31/31/2021"), None);
        assert_eq!(parse_day_first("05/03/2021 25:99"), None);
        assert_eq!(parse_day_first("123/03/2021"), None);
    }

    // ========================================================================
    // Column conversions
    // ========================================================================

    #[test]
    fn test_normalize_district() {
        let raw = table("comuna_ciudadano", &[Some("16.0"), Some("8.9"), Some("4")]);
        let cleaned = normalize_district(&raw, "comuna_ciudadano").unwrap();

        assert_eq!(ints(&cleaned, "comuna_ciudadano"), vec![Some(16), Some(8), Some(4)]);
        assert!(cleaned.is_categorical("comuna_ciudadano"));
    }

    #[test]
    fn test_normalize_district_from_floats() {
        let frame = df!(
            "row_id" => &["0", "1"],
            "comuna_ciudadano" => &[16.0f64, 8.9]
        )
        .unwrap();
        let raw = RequestTable::new(frame).unwrap();
        let cleaned = normalize_district(&raw, "comuna_ciudadano").unwrap();
        assert_eq!(ints(&cleaned, "comuna_ciudadano"), vec![Some(16), Some(8)]);
    }

    #[test]
    fn test_normalize_district_rejects_text() {
        let raw = table("comuna_ciudadano", &[Some("16.0"), Some("Robledo")]);
        let err = normalize_district(&raw, "comuna_ciudadano").unwrap_err();
        assert_eq!(err.error_code(), "TYPE_CONVERSION_FAILED");
        assert!(err.to_string().contains("Robledo"));
    }

    #[test]
    fn test_normalize_currency() {
        let raw = table(
            "monto_del_credito",
            &[Some("$1,200.50"), Some("$ 3,500,000.00"), None],
        );
        let cleaned = normalize_currency(&raw, "monto_del_credito").unwrap();

        assert_eq!(
            ints(&cleaned, "monto_del_credito"),
            vec![Some(1200), Some(3_500_000), None]
        );
        assert!(!cleaned.is_categorical("monto_del_credito"));
        let dtype = cleaned.frame().column("monto_del_credito").unwrap().dtype().clone();
        assert_eq!(dtype, DataType::Int64);
    }

    #[test]
    fn test_normalize_currency_rejects_text() {
        let raw = table("monto_del_credito", &[Some("mil pesos")]);
        let err = normalize_currency(&raw, "monto_del_credito").unwrap_err();
        assert_eq!(err.error_code(), "TYPE_CONVERSION_FAILED");
    }

    #[test]
    fn test_normalize_benefit_date() {
        let raw = table(
            "fecha_de_beneficio",
            &[Some("05/03/2021"), Some("2019/06/22"), None],
        );
        let cleaned = normalize_benefit_date(&raw, "fecha_de_beneficio").unwrap();

        let column = cleaned.frame().column("fecha_de_beneficio").unwrap();
        assert!(matches!(column.dtype(), DataType::Datetime(_, _)));

        let millis: Vec<Option<i64>> = column
            .as_materialized_series()
            .cast(&DataType::Int64)
            .unwrap()
            .i64()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(
            millis,
            vec![
                Some(ymd(2021, 3, 5).and_utc().timestamp_millis()),
                Some(ymd(2019, 6, 22).and_utc().timestamp_millis()),
                None
            ]
        );
    }

    #[test]
    fn test_benefit_date_error_reports_source_id() {
        let frame = df!(
            "row_id" => &[10i64, 42],
            "fecha_de_beneficio" => &["05/03/2021", "31/31/2021"]
        )
        .unwrap();
        let raw = RequestTable::new(frame).unwrap();
        let err = normalize_benefit_date(&raw, "fecha_de_beneficio").unwrap_err();

        match err {
            CleaningError::DateParseFailed { row, id, .. } => {
                assert_eq!(row, 1);
                assert_eq!(id, "42");
            }
            other => panic!("Expected DateParseFailed, got {other:?}"),
        }
    }

    #[test]
    fn test_normalize_benefit_date_is_fatal_on_bad_value() {
        let raw = table(
            "fecha_de_beneficio",
            &[Some("05/03/2021"), Some("ayer"), Some("06/03/2021")],
        );
        let err = normalize_benefit_date(&raw, "fecha_de_beneficio").unwrap_err();

        match err {
            CleaningError::DateParseFailed {
                column,
                row,
                id,
                value,
            } => {
                assert_eq!(column, "fecha_de_beneficio");
                assert_eq!(row, 1);
                assert_eq!(id, "1");
                assert_eq!(value, "ayer");
            }
            other => panic!("Expected DateParseFailed, got {other:?}"),
        }
    }
}
