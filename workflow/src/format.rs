//! Date and time formatting for display.
//!
//! All functions are pure. Input the parsers do not understand is returned
//! unchanged so a malformed backend value is still visible to the user.

use serde::{Deserialize, Serialize};
use time::{
    Date, Month, OffsetDateTime, PrimitiveDateTime, Time, Weekday,
    format_description::{BorrowedFormatItem, well_known::Rfc3339},
    macros::format_description,
};

use crate::wire_enum;

const ISO_DATE: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");
const TIME_HM: &[BorrowedFormatItem<'_>] = format_description!("[hour]:[minute]");
const TIME_HMS: &[BorrowedFormatItem<'_>] = format_description!("[hour]:[minute]:[second]");
const DATETIME_HM: &[BorrowedFormatItem<'_>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]");
const DATETIME_HMS: &[BorrowedFormatItem<'_>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

/// Display language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Locale {
    #[default]
    #[serde(rename = "id")]
    Indonesian,

    #[serde(rename = "en")]
    English,
}
wire_enum!(Locale {
    Indonesian => "id",
    English => "en",
});

/// Parses a strict `YYYY-MM-DD` date.
pub fn parse_iso_date(value: &str) -> Result<Date, time::error::Parse> {
    Date::parse(value, ISO_DATE)
}

/// Parses `HH:MM` or `HH:MM:SS`.
pub fn parse_time(value: &str) -> Result<Time, time::error::Parse> {
    Time::parse(value, TIME_HMS).or_else(|_| Time::parse(value, TIME_HM))
}

fn parse_datetime(value: &str) -> Option<PrimitiveDateTime> {
    if let Ok(dt) = OffsetDateTime::parse(value, &Rfc3339) {
        return Some(PrimitiveDateTime::new(dt.date(), dt.time()));
    }

    PrimitiveDateTime::parse(value, DATETIME_HMS)
        .or_else(|_| PrimitiveDateTime::parse(value, DATETIME_HM))
        .ok()
}

fn weekday_name(day: Weekday, locale: Locale) -> &'static str {
    match (locale, day) {
        (Locale::Indonesian, Weekday::Monday) => "Senin",
        (Locale::Indonesian, Weekday::Tuesday) => "Selasa",
        (Locale::Indonesian, Weekday::Wednesday) => "Rabu",
        (Locale::Indonesian, Weekday::Thursday) => "Kamis",
        (Locale::Indonesian, Weekday::Friday) => "Jumat",
        (Locale::Indonesian, Weekday::Saturday) => "Sabtu",
        (Locale::Indonesian, Weekday::Sunday) => "Minggu",
        (Locale::English, Weekday::Monday) => "Monday",
        (Locale::English, Weekday::Tuesday) => "Tuesday",
        (Locale::English, Weekday::Wednesday) => "Wednesday",
        (Locale::English, Weekday::Thursday) => "Thursday",
        (Locale::English, Weekday::Friday) => "Friday",
        (Locale::English, Weekday::Saturday) => "Saturday",
        (Locale::English, Weekday::Sunday) => "Sunday",
    }
}

fn month_name(month: Month, locale: Locale) -> &'static str {
    match (locale, month) {
        (Locale::Indonesian, Month::January) => "Januari",
        (Locale::Indonesian, Month::February) => "Februari",
        (Locale::Indonesian, Month::March) => "Maret",
        (Locale::Indonesian, Month::April) => "April",
        (Locale::Indonesian, Month::May) => "Mei",
        (Locale::Indonesian, Month::June) => "Juni",
        (Locale::Indonesian, Month::July) => "Juli",
        (Locale::Indonesian, Month::August) => "Agustus",
        (Locale::Indonesian, Month::September) => "September",
        (Locale::Indonesian, Month::October) => "Oktober",
        (Locale::Indonesian, Month::November) => "November",
        (Locale::Indonesian, Month::December) => "Desember",
        (Locale::English, Month::January) => "January",
        (Locale::English, Month::February) => "February",
        (Locale::English, Month::March) => "March",
        (Locale::English, Month::April) => "April",
        (Locale::English, Month::May) => "May",
        (Locale::English, Month::June) => "June",
        (Locale::English, Month::July) => "July",
        (Locale::English, Month::August) => "August",
        (Locale::English, Month::September) => "September",
        (Locale::English, Month::October) => "October",
        (Locale::English, Month::November) => "November",
        (Locale::English, Month::December) => "December",
    }
}

fn short_month_name(month: Month, locale: Locale) -> &'static str {
    match (locale, month) {
        (Locale::Indonesian, Month::May) => "Mei",
        (Locale::Indonesian, Month::August) => "Agu",
        (Locale::Indonesian, Month::October) => "Okt",
        (Locale::Indonesian, Month::December) => "Des",
        (locale, month) => &month_name(month, locale)[..3],
    }
}

fn long_date(date: Date, locale: Locale) -> String {
    let weekday = weekday_name(date.weekday(), locale);
    let month = month_name(date.month(), locale);

    match locale {
        Locale::Indonesian => format!("{weekday}, {} {month} {}", date.day(), date.year()),
        Locale::English => format!("{weekday}, {month} {}, {}", date.day(), date.year()),
    }
}

fn short_date(date: Date, locale: Locale) -> String {
    let month = short_month_name(date.month(), locale);

    match locale {
        Locale::Indonesian => format!("{} {month} {}", date.day(), date.year()),
        Locale::English => format!("{month} {}, {}", date.day(), date.year()),
    }
}

fn clock(time: Time, locale: Locale) -> String {
    match locale {
        Locale::Indonesian => format!("{:02}:{:02}", time.hour(), time.minute()),
        Locale::English => {
            let (hour, meridiem) = match time.hour() {
                0 => (12, "AM"),
                h @ 1..=11 => (h, "AM"),
                12 => (12, "PM"),
                h => (h - 12, "PM"),
            };
            format!("{hour}:{:02} {meridiem}", time.minute())
        }
    }
}

/// `2025-03-10` → `Senin, 10 Maret 2025` / `Monday, March 10, 2025`.
#[must_use]
pub fn format_date(value: &str, locale: Locale) -> String {
    parse_iso_date(value).map_or_else(|_| value.to_string(), |d| long_date(d, locale))
}

/// `2025-03-10` → `10 Mar 2025` / `Mar 10, 2025`.
#[must_use]
pub fn format_short_date(value: &str, locale: Locale) -> String {
    parse_iso_date(value).map_or_else(|_| value.to_string(), |d| short_date(d, locale))
}

/// `09:00:00` → `09:00` / `9:00 AM`.
#[must_use]
pub fn format_time(value: &str, locale: Locale) -> String {
    parse_time(value).map_or_else(|_| value.to_string(), |t| clock(t, locale))
}

/// `09:00`, `12:00` → `09:00 - 12:00`.
#[must_use]
pub fn format_time_range(start: &str, end: &str, locale: Locale) -> String {
    format!("{} - {}", format_time(start, locale), format_time(end, locale))
}

/// RFC 3339 or `YYYY-MM-DD HH:MM[:SS]` → `10 Mar 2025, 09:00`.
#[must_use]
pub fn format_datetime(value: &str, locale: Locale) -> String {
    parse_datetime(value).map_or_else(
        || value.to_string(),
        |dt| format!("{}, {}", short_date(dt.date(), locale), clock(dt.time(), locale)),
    )
}
