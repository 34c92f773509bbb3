//! `duration`, `date` and `datetime`.
//!
//! Formatting patterns are strftime patterns (`%Y-%m-%d`).

use std::fmt::Write as _;

use chrono::{Datelike, TimeZone};
use chrono_tz::Tz;
use jan_ir::DurationUnit;
use jan_values::{
    invalid_argument, temporal_out_of_range, CallArgs, DispatchTable, EvalError, EvalResult,
    PackedDateTime, Value,
};

const DEFAULT_DATETIME: &str = "%Y-%m-%d %H:%M:%S";
const ZONED_DATETIME: &str = "%Y-%m-%d %H:%M:%S %Z";
const TIME_OF_DAY: &str = "%H:%M:%S";

pub(super) fn install_duration(table: &mut DispatchTable) {
    table
        .property("seconds", |d| in_unit(d, DurationUnit::Seconds))
        .property("minutes", |d| in_unit(d, DurationUnit::Minutes))
        .property("hours", |d| in_unit(d, DurationUnit::Hours))
        .property("days", |d| in_unit(d, DurationUnit::Days))
        .property("weeks", |d| in_unit(d, DurationUnit::Weeks));
}

pub(super) fn install_date(table: &mut DispatchTable) {
    table
        .property("year", |d| date_part(d, DatePart::Year))
        .property("month", |d| date_part(d, DatePart::Month))
        .property("day", |d| date_part(d, DatePart::Day));
}

pub(super) fn install_datetime(table: &mut DispatchTable) {
    table
        .property("epoch", |dt| epoch_of(dt).map(Value::int))
        .method("year", year)
        .method("kw", calendar_week)
        .method("toEpoch", to_epoch)
        .method("date", date)
        .method("time", time)
        .method("string", string)
        .method("format", format)
        .method("formatAtTimezone", format_at_timezone);
}

/// A duration's length in `unit`, truncated toward zero.
fn in_unit(duration: &Value, unit: DurationUnit) -> Result<Value, EvalError> {
    match duration {
        Value::Duration(d) => Ok(Value::int(d.in_unit(unit))),
        other => Ok(other.clone()),
    }
}

#[derive(Copy, Clone)]
enum DatePart {
    Year,
    Month,
    Day,
}

fn date_part(value: &Value, part: DatePart) -> Result<Value, EvalError> {
    let date = match value {
        Value::Date(d) => *d,
        Value::DateTime(dt) => dt.date(),
        other => return Ok(other.clone()),
    };
    Ok(Value::int(match part {
        DatePart::Year => date.year(),
        DatePart::Month => i64::from(date.month()),
        DatePart::Day => i64::from(date.day()),
    }))
}

fn datetime(value: &Value) -> Result<PackedDateTime, EvalError> {
    match value {
        Value::DateTime(dt) => Ok(*dt),
        _ => Err(temporal_out_of_range()),
    }
}

/// Seconds since 1970-01-01 00:00:00, reading the datetime as UTC.
fn epoch_of(value: &Value) -> Result<i64, EvalError> {
    datetime(value)?.epoch_seconds().ok_or_else(temporal_out_of_range)
}

fn formatted(value: &Value, function: &str, pattern: &str) -> EvalResult {
    let text = datetime(value)?
        .format(pattern)
        .ok_or_else(|| invalid_argument(function, format!("invalid format pattern '{pattern}'")))?;
    Ok(Value::string(text))
}

fn to_epoch(dt: &Value, args: &mut CallArgs<'_>) -> EvalResult {
    args.require(0)?;
    Ok(Value::int(epoch_of(dt)?))
}

fn date(dt: &Value, args: &mut CallArgs<'_>) -> EvalResult {
    args.require(0)?;
    Ok(Value::date(datetime(dt)?.date()))
}

fn time(dt: &Value, args: &mut CallArgs<'_>) -> EvalResult {
    args.require(0)?;
    formatted(dt, args.function(), TIME_OF_DAY)
}

/// `string()` in the default layout, `string(pattern)` like `format`.
fn string(dt: &Value, args: &mut CallArgs<'_>) -> EvalResult {
    args.require_between(0, 1)?;
    let pattern = args.get_optional_str(0)?.unwrap_or(DEFAULT_DATETIME);
    formatted(dt, args.function(), pattern)
}

fn format(dt: &Value, args: &mut CallArgs<'_>) -> EvalResult {
    args.require(1)?;
    formatted(dt, args.function(), args.get_str(0)?)
}

fn year(dt: &Value, args: &mut CallArgs<'_>) -> EvalResult {
    args.require(0)?;
    Ok(date_part(dt, DatePart::Year)?)
}

/// ISO 8601 week of the year, two digits (`"01"` to `"53"`).
fn calendar_week(dt: &Value, args: &mut CallArgs<'_>) -> EvalResult {
    args.require(0)?;
    let date = datetime(dt)?.to_naive().ok_or_else(temporal_out_of_range)?;
    Ok(Value::string(format!("{:02}", date.iso_week().week())))
}

/// The wall-clock time placed in the named IANA zone, so `%Z` and `%z`
/// name it. The time itself is not converted.
fn format_at_timezone(dt: &Value, args: &mut CallArgs<'_>) -> EvalResult {
    args.require_between(1, 2)?;
    let name = args.get_str(0)?;
    let zone: Tz = name
        .parse()
        .map_err(|_| invalid_argument(args.function(), format!("unknown time zone '{name}'")))?;
    let pattern = args.get_optional_str(1)?.unwrap_or(ZONED_DATETIME);
    let local = datetime(dt)?.to_naive().ok_or_else(temporal_out_of_range)?;
    let zoned = zone
        .from_local_datetime(&local)
        .earliest()
        .ok_or_else(|| invalid_argument(args.function(), format!("{local} does not exist in {name}")))?;
    let mut out = String::new();
    write!(out, "{}", zoned.format(pattern))
        .map_err(|_| invalid_argument(args.function(), format!("invalid format pattern '{pattern}'")))?;
    Ok(Value::string(out))
}
