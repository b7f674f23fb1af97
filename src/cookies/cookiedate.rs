//! Expires attribute date parsing.
//!
//! Values with an explicit zone (RFC 3339, RFC 2822 with a numeric
//! offset) are parsed with `time`'s well-known parsers first. Everything
//! else goes through the RFC 6265 section 5.1.1 cookie-date algorithm,
//! which accepts the RFC 1123, RFC 850 and asctime shapes servers actually
//! send (weekday names are ignored). Date-only and space-separated ISO
//! forms are a last resort and are read as UTC, midnight when no time is given.

use crate::base::timestamp::Timestamp;
use time::format_description::well_known::{Rfc2822, Rfc3339};
use time::macros::format_description;
use time::{Date, Month, OffsetDateTime, PrimitiveDateTime, Time};

const MONTHS: [(&str, Month); 12] = [
    ("jan", Month::January),
    ("feb", Month::February),
    ("mar", Month::March),
    ("apr", Month::April),
    ("may", Month::May),
    ("jun", Month::June),
    ("jul", Month::July),
    ("aug", Month::August),
    ("sep", Month::September),
    ("oct", Month::October),
    ("nov", Month::November),
    ("dec", Month::December),
];

/// Shape check applied before parsing: the value must not start with `-`
/// and must contain whitespace or `-` after its first character.
///
/// Rejects bare numbers and single words ("0", "never", "-1") that lenient
/// date parsers would otherwise turn into surprising instants.
pub fn looks_like_date(value: &str) -> bool {
    let mut chars = value.chars();
    match chars.next() {
        None | Some('-') => false,
        Some(_) => chars.any(|c| c.is_whitespace() || c == '-'),
    }
}

/// Parse an Expires value. Returns `None` when the value is not a date.
pub fn parse_cookie_date(value: &str) -> Option<Timestamp> {
    if !looks_like_date(value) {
        return None;
    }

    let trimmed = value.trim();
    OffsetDateTime::parse(trimmed, &Rfc3339)
        .ok()
        .or_else(|| OffsetDateTime::parse(trimmed, &Rfc2822).ok())
        .or_else(|| parse_rfc6265_date(trimmed))
        .or_else(|| parse_loose_date(trimmed))
        .map(Timestamp::from_datetime)
}

/// Drop a leading "Tue, " style weekday.
fn strip_weekday(value: &str) -> &str {
    match value.split_once(',') {
        Some((weekday, rest)) if weekday.chars().all(|c| c.is_ascii_alphabetic()) => rest.trim_start(),
        _ => value,
    }
}

fn parse_loose_date(value: &str) -> Option<OffsetDateTime> {
    let value = strip_weekday(value);

    PrimitiveDateTime::parse(
        value,
        format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
    )
    .ok()
    .or_else(|| {
        Date::parse(value, format_description!("[year]-[month]-[day]"))
            .ok()
            .map(Date::midnight)
    })
    .or_else(|| {
        Date::parse(
            value,
            format_description!("[month repr:short] [day padding:none], [year]"),
        )
        .ok()
        .map(Date::midnight)
    })
    .or_else(|| {
        Date::parse(value, format_description!("[day] [month repr:short] [year]"))
            .ok()
            .map(Date::midnight)
    })
    .map(PrimitiveDateTime::assume_utc)
}

fn is_delimiter(c: char) -> bool {
    matches!(c, '\x09' | '\x20'..='\x2F' | '\x3B'..='\x40' | '\x5B'..='\x60' | '\x7B'..='\x7E')
}

/// Split off the leading ASCII digits.
fn split_digits(s: &str) -> (&str, &str) {
    let end = s.bytes().position(|b| !b.is_ascii_digit()).unwrap_or(s.len());
    s.split_at(end)
}

/// `min..=max` digits followed by end of token or a non-digit.
fn leading_number(token: &str, min: usize, max: usize) -> Option<u32> {
    let (digits, _) = split_digits(token);
    if digits.len() < min || digits.len() > max {
        return None;
    }
    digits.parse().ok()
}

/// hms-time = time-field ":" time-field ":" time-field, each 1*2DIGIT.
fn parse_time(token: &str) -> Option<(u32, u32, u32)> {
    let mut rest = token;
    let mut fields = [0u32; 3];

    for (i, field) in fields.iter_mut().enumerate() {
        let (digits, tail) = split_digits(rest);
        if digits.is_empty() || digits.len() > 2 {
            return None;
        }
        *field = digits.parse().ok()?;
        rest = tail;

        if i < 2 {
            rest = rest.strip_prefix(':')?;
        }
    }

    Some((fields[0], fields[1], fields[2]))
}

fn parse_month(token: &str) -> Option<Month> {
    let prefix = token.get(..3)?.to_ascii_lowercase();
    MONTHS
        .iter()
        .find(|(name, _)| *name == prefix)
        .map(|(_, month)| *month)
}

fn parse_rfc6265_date(value: &str) -> Option<OffsetDateTime> {
    let mut time = None;
    let mut day = None;
    let mut month = None;
    let mut year = None;

    for token in value.split(is_delimiter).filter(|t| !t.is_empty()) {
        if time.is_none() {
            if let Some(hms) = parse_time(token) {
                time = Some(hms);
                continue;
            }
        }
        if day.is_none() {
            if let Some(d) = leading_number(token, 1, 2) {
                day = Some(d);
                continue;
            }
        }
        if month.is_none() {
            if let Some(m) = parse_month(token) {
                month = Some(m);
                continue;
            }
        }
        if year.is_none() {
            if let Some(y) = leading_number(token, 2, 4) {
                year = Some(y);
            }
        }
    }

    let (hour, minute, second) = time?;
    let day = day?;
    let month = month?;
    let year = match year? {
        y @ 70..=99 => y + 1900,
        y @ 0..=69 => y + 2000,
        y => y,
    };

    if !(1..=31).contains(&day) || year < 1601 || hour > 23 || minute > 59 || second > 59 {
        return None;
    }

    let date = Date::from_calendar_date(i32::try_from(year).ok()?, month, u8::try_from(day).ok()?).ok()?;
    let time = Time::from_hms(hour as u8, minute as u8, second as u8).ok()?;
    Some(PrimitiveDateTime::new(date, time).assume_utc())
}
