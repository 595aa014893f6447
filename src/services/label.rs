// src/services/label.rs

//! Drawing period labels.
//!
//! Feed titles name a two-month period in the Minguo calendar, e.g.
//! `101年09月、10` for September and October 2012. The parsed range is
//! half-open: it ends on the first day of the month after the last month.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::error::{AppError, Result};
use crate::models::DateRange;

/// Minguo year 1 is 1912.
pub const ERA_OFFSET: i32 = 1911;

static SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("年|月、").expect("separator pattern is valid"));

/// Parse a period label into a `[start, end)` date range.
pub fn parse_label(label: &str) -> Result<DateRange> {
    let trimmed = label.trim();
    let parts: Vec<&str> = SEPARATORS.split(trimmed).collect();

    let [year, start_month, end_month] = parts.as_slice() else {
        return Err(AppError::label(
            label,
            format!("expected year, start month and end month, found {} part(s)", parts.len()),
        ));
    };

    let era_year: i32 = decimal(label, "year", year)?;
    let year = era_year
        .checked_add(ERA_OFFSET)
        .ok_or_else(|| AppError::label(label, format!("year {era_year} is out of range")))?;
    let start_month = month(label, "start month", start_month)?;
    let end_month = month(label, "end month", end_month)?;

    // start is valid, so the year is far below i32::MAX
    let start = first_of_month(label, year, start_month)?;
    let end = if end_month == 12 {
        first_of_month(label, year + 1, 1)?
    } else {
        first_of_month(label, year, end_month + 1)?
    };

    Ok(DateRange { start, end })
}

/// Parse ASCII digits as base 10, so `09` is nine.
fn decimal<T>(label: &str, field: &str, text: &str) -> Result<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    let text = text.trim();
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AppError::label(label, format!("{field} '{text}' is not a number")));
    }
    text.parse()
        .map_err(|e| AppError::label(label, format!("{field} '{text}': {e}")))
}

fn month(label: &str, field: &str, text: &str) -> Result<u32> {
    let value: u32 = decimal(label, field, text)?;
    if !(1..=12).contains(&value) {
        return Err(AppError::label(label, format!("{field} {value} is out of range")));
    }
    Ok(value)
}

fn first_of_month(label: &str, year: i32, month: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| AppError::label(label, format!("invalid date {year}-{month:02}-01")))
}
