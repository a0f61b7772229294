//! Date parsing and conversion between chrono dates and polars `Date` columns

use anyhow::Result;
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use polars::prelude::*;

/// Days from 0001-01-01 (CE) to the Unix epoch, used by polars `Date` storage
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y"];

const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S"];

/// Parse a date cell leniently. Anything that is not a recognizable date
/// yields `None` instead of an error.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Some(date);
        }
    }

    for format in DATETIME_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(datetime.date());
        }
    }

    DateTime::parse_from_rfc3339(trimmed)
        .ok()
        .map(|datetime| datetime.date_naive())
}

/// Convert a date into the day count polars stores for `DataType::Date`
pub fn to_epoch_days(date: NaiveDate) -> i32 {
    date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE
}

/// Inverse of [`to_epoch_days`]
pub fn from_epoch_days(days: i32) -> Option<NaiveDate> {
    NaiveDate::from_num_days_from_ce_opt(days.checked_add(UNIX_EPOCH_DAYS_FROM_CE)?)
}

/// Re-type a column as polars `Date`, parsing its textual form cell by cell.
///
/// Columns that are already `Date` are returned unchanged. Cells that fail to
/// parse become null.
pub fn parse_date_column(column: &Column) -> Result<Column> {
    if column.dtype() == &DataType::Date {
        return Ok(column.clone());
    }

    let text = column.cast(&DataType::String)?;
    let days: Vec<Option<i32>> = text
        .str()?
        .iter()
        .map(|cell| cell.and_then(parse_date).map(to_epoch_days))
        .collect();

    let parsed = Column::new(column.name().clone(), days).cast(&DataType::Date)?;
    Ok(parsed)
}

/// Read a `Date` column back as chrono dates (nulls preserved)
pub fn date_values(df: &DataFrame, name: &str) -> Result<Vec<Option<NaiveDate>>> {
    let days = df.column(name)?.cast(&DataType::Int32)?;
    let values = days
        .i32()?
        .into_iter()
        .map(|d| d.and_then(from_epoch_days))
        .collect();
    Ok(values)
}
