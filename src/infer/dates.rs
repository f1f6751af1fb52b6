use hifitime::{Epoch, UNIX_REF_EPOCH, Unit};
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_while_m_n},
    character::complete::{alpha1, char, one_of, space1},
    combinator::{eof, map, map_opt, map_res, opt},
    sequence::preceded,
};

/// Days between the Excel 1900 date system origin (1899-12-30) and 1970-01-01.
const EXCEL_UNIX_OFFSET_DAYS: f64 = 25569.0;
const MILLISECONDS_PER_DAY: f64 = 86_400_000.0;

const MONTH_NAMES: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// Calendar date as (year, month, day).
type CalendarDate = (i32, u8, u8);

/// Time of day, with the UTC offset in minutes.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct ClockTime {
    hour: u8,
    minute: u8,
    second: u8,
    millisecond: u32,
    offset_minutes: i32,
}

fn is_digit(c: char) -> bool {
    c.is_ascii_digit()
}

fn day_or_month(data: &str) -> IResult<&str, u8> {
    map_res(take_while_m_n(1, 2, is_digit), |s: &str| s.parse::<u8>()).parse(data)
}

fn two_digits(data: &str) -> IResult<&str, u8> {
    map_res(take_while_m_n(2, 2, is_digit), |s: &str| s.parse::<u8>()).parse(data)
}

fn year(data: &str) -> IResult<&str, i32> {
    map_res(take_while_m_n(4, 4, is_digit), |s: &str| s.parse::<i32>()).parse(data)
}

/// `DD/MM/YYYY` or `DD-MM-YYYY`.
fn day_first(data: &str) -> IResult<&str, CalendarDate> {
    alt((
        map(
            (day_or_month, char('/'), day_or_month, char('/'), year),
            |(day, _, month, _, year)| (year, month, day),
        ),
        map(
            (day_or_month, char('-'), day_or_month, char('-'), year),
            |(day, _, month, _, year)| (year, month, day),
        ),
    ))
    .parse(data)
}

/// `YYYY-MM-DD` or `YYYY/MM/DD`.
fn year_first(data: &str) -> IResult<&str, CalendarDate> {
    alt((
        map(
            (year, char('-'), day_or_month, char('-'), day_or_month),
            |(year, _, month, _, day)| (year, month, day),
        ),
        map(
            (year, char('/'), day_or_month, char('/'), day_or_month),
            |(year, _, month, _, day)| (year, month, day),
        ),
    ))
    .parse(data)
}

fn month_number(word: &str) -> Option<u8> {
    let word = word.to_ascii_lowercase();
    MONTH_NAMES
        .iter()
        .position(|name| {
            *name == word
                || (word.len() == 3 && name.starts_with(word.as_str()))
                || (word == "sept" && *name == "september")
        })
        .and_then(|index| u8::try_from(index + 1).ok())
}

/// English month, full (`January`) or abbreviated (`Jan`, `Jan.`, `Sept`).
fn month_name(data: &str) -> IResult<&str, u8> {
    map((map_opt(alpha1, month_number), opt(char('.'))), |(month, _)| month).parse(data)
}

/// `Jan 15, 2025`, `January 15 2025`, `15 January 2025` or `15-Jan-2025`.
fn named_month(data: &str) -> IResult<&str, CalendarDate> {
    alt((
        map(
            (month_name, space1, day_or_month, opt(char(',')), space1, year),
            |(month, _, day, _, _, year)| (year, month, day),
        ),
        map(
            (
                day_or_month,
                alt((space1, tag("-"))),
                month_name,
                opt(char(',')),
                alt((space1, tag("-"))),
                year,
            ),
            |(day, _, month, _, _, year)| (year, month, day),
        ),
    ))
    .parse(data)
}

/// Fraction of a second, truncated to milliseconds.
fn milliseconds(data: &str) -> IResult<&str, u32> {
    map_res(take_while_m_n(1, 9, is_digit), |digits: &str| {
        format!("{:0<3}", &digits[..digits.len().min(3)]).parse::<u32>()
    })
    .parse(data)
}

/// `Z`, `+HH:MM`, `-HHMM` or `+HH`, in minutes east of UTC.
fn utc_offset(data: &str) -> IResult<&str, i32> {
    alt((
        map(char('Z'), |_| 0),
        map(
            (one_of("+-"), two_digits, opt(preceded(opt(char(':')), two_digits))),
            |(sign, hours, minutes)| {
                let total = i32::from(hours) * 60 + i32::from(minutes.unwrap_or(0));
                if sign == '-' { -total } else { total }
            },
        ),
    ))
    .parse(data)
}

/// `HH:MM`, with optional seconds, milliseconds and UTC offset.
fn clock_time(data: &str) -> IResult<&str, ClockTime> {
    map(
        (
            day_or_month,
            char(':'),
            two_digits,
            opt(preceded(char(':'), two_digits)),
            opt(preceded(char('.'), milliseconds)),
            opt(preceded(opt(char(' ')), utc_offset)),
        ),
        |(hour, _, minute, second, millisecond, offset)| ClockTime {
            hour,
            minute,
            second: second.unwrap_or(0),
            millisecond: millisecond.unwrap_or(0),
            offset_minutes: offset.unwrap_or(0),
        },
    )
    .parse(data)
}

/// A date in any accepted shape, optionally followed by a time of day
/// after a space or a `T`.
fn date_time(data: &str) -> IResult<&str, (CalendarDate, Option<ClockTime>)> {
    map(
        (
            alt((day_first, year_first, named_month)),
            opt(preceded(alt((space1, tag("T"))), clock_time)),
            eof,
        ),
        |(date, time, _)| (date, time),
    )
    .parse(data)
}

/// Recognises the literal shapes `D/D/YYYY`, `YYYY-D-D` and `D-D-YYYY`.
///
/// Only the shape is checked, `31/02/2025` matches.
pub fn matches_date_pattern(data: &str) -> bool {
    let slashed = (
        day_or_month,
        char('/'),
        day_or_month,
        char('/'),
        year,
        eof,
    )
        .parse(data)
        .is_ok();
    let dashed_year_first = (
        year,
        char('-'),
        day_or_month,
        char('-'),
        day_or_month,
        eof,
    )
        .parse(data)
        .is_ok();
    let dashed_day_first = (
        day_or_month,
        char('-'),
        day_or_month,
        char('-'),
        year,
        eof,
    )
        .parse(data)
        .is_ok();
    slashed || dashed_year_first || dashed_day_first
}

fn to_epoch((year, month, day): CalendarDate, time: Option<ClockTime>) -> Option<Epoch> {
    let time = time.unwrap_or_default();
    let mut epoch = Epoch::maybe_from_gregorian_utc(
        year,
        month,
        day,
        time.hour,
        time.minute,
        time.second,
        time.millisecond.checked_mul(1_000_000)?,
    )
    .ok()?;
    // Local time minus its offset gives UTC
    if time.offset_minutes != 0 {
        epoch -= Unit::Minute * i64::from(time.offset_minutes);
    }
    Some(epoch)
}

fn convert_iso8601_datetime(dt: iso8601::DateTime) -> Option<Epoch> {
    let iso8601::DateTime { date, time } = dt;
    let iso8601::Date::YMD { year, month, day } = date else {
        return None;
    };
    let iso8601::Time {
        hour,
        minute,
        second,
        millisecond,
        tz_offset_hours,
        tz_offset_minutes,
    } = time;
    let mut epoch = Epoch::maybe_from_gregorian_utc(
        year,
        u8::try_from(month).ok()?,
        u8::try_from(day).ok()?,
        u8::try_from(hour).ok()?,
        u8::try_from(minute).ok()?,
        u8::try_from(second).ok()?,
        millisecond.checked_mul(1_000_000)?,
    )
    .ok()?;

    // Local time minus its offset gives UTC
    if tz_offset_hours != 0 {
        epoch -= Unit::Hour * tz_offset_hours as i64;
    }
    if tz_offset_minutes != 0 {
        epoch -= Unit::Minute * tz_offset_minutes as i64;
    }
    Some(epoch)
}

fn parse_iso8601_datetime(data: &str) -> Option<Epoch> {
    match iso8601::parsers::parse_datetime(data.as_bytes()) {
        Ok((remaining, dt)) if remaining.is_empty() => convert_iso8601_datetime(dt),
        _ => None,
    }
}

/// General date parser used by detection and coercion.
///
/// Accepts day-first `DD/MM/YYYY` and `DD-MM-YYYY`, year-first `YYYY-MM-DD`
/// and `YYYY/MM/DD`, and English month names (`Jan 15, 2025`,
/// `15 January 2025`). Any of them may carry a time of day after a space or
/// a `T`, with optional seconds, milliseconds and UTC offset. Other ISO 8601
/// datetimes go through the iso8601 parser. Calendar dates are validated,
/// so `30/02/2025` is rejected instead of rolling over into March.
pub fn parse_date(data: &str) -> Option<Epoch> {
    let data = data.trim();
    if data.is_empty() {
        return None;
    }
    if let Ok((_, (date, time))) = date_time(data) {
        return to_epoch(date, time);
    }
    parse_iso8601_datetime(data)
}

/// Formats an epoch as `YYYY-MM-DDTHH:MM:SS.mmmZ`.
pub fn to_iso_timestamp(epoch: &Epoch) -> String {
    let (year, month, day, hour, minute, second, nanos) = epoch.to_gregorian_utc();
    format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}.{:03}Z",
        year,
        month,
        day,
        hour,
        minute,
        second,
        nanos / 1_000_000
    )
}

/// Converts an Excel serial date (1900 date system) to an epoch, rounded
/// to the millisecond.
pub fn excel_serial_to_epoch(serial: f64) -> Option<Epoch> {
    if !serial.is_finite() {
        return None;
    }
    let unix_milliseconds = ((serial - EXCEL_UNIX_OFFSET_DAYS) * MILLISECONDS_PER_DAY).round();
    if unix_milliseconds.abs() > i64::MAX as f64 {
        return None;
    }
    Some(Epoch::from_utc_duration(
        UNIX_REF_EPOCH.to_utc_duration() + (unix_milliseconds as i64) * Unit::Millisecond,
    ))
}

/// Renders an Excel serial date the way a spreadsheet displays it:
/// `YYYY-MM-DD` for whole days, `YYYY-MM-DDTHH:MM:SS` otherwise.
pub fn excel_serial_to_iso(serial: f64) -> Option<String> {
    let epoch = excel_serial_to_epoch(serial)?;
    let (year, month, day, hour, minute, second, _) = epoch.to_gregorian_utc();
    if hour == 0 && minute == 0 && second == 0 {
        Some(format!("{:04}-{:02}-{:02}", year, month, day))
    } else {
        Some(format!(
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}",
            year, month, day, hour, minute, second
        ))
    }
}
