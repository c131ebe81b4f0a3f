//! Lectionary cycles.
//!
//! Sunday readings rotate over three years (A, B, C) and weekday readings
//! over two (I, II). Both are keyed off the liturgical year, which begins on
//! the First Sunday of Advent and is numbered by the calendar year in which
//! it ends: Advent 2025 opens liturgical year 2026.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::first_sunday_of_advent;
use crate::error::Result;

/// Three-year Sunday reading cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SundayCycle {
    /// Matthew.
    A,
    /// Mark.
    B,
    /// Luke.
    C,
}

/// Two-year weekday reading cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeekdayCycle {
    /// Odd liturgical years.
    I,
    /// Even liturgical years.
    II,
}

/// Liturgical year a date belongs to.
pub fn liturgical_year_of(date: NaiveDate) -> Result<i32> {
    let advent = first_sunday_of_advent(date.year())?;
    Ok(if date >= advent {
        date.year() + 1
    } else {
        date.year()
    })
}

/// Sunday cycle in effect on a date.
pub fn sunday_cycle(date: NaiveDate) -> Result<SundayCycle> {
    Ok(match liturgical_year_of(date)?.rem_euclid(3) {
        1 => SundayCycle::A,
        2 => SundayCycle::B,
        _ => SundayCycle::C,
    })
}

/// Weekday cycle in effect on a date.
pub fn weekday_cycle(date: NaiveDate) -> Result<WeekdayCycle> {
    Ok(if liturgical_year_of(date)?.rem_euclid(2) == 1 {
        WeekdayCycle::I
    } else {
        WeekdayCycle::II
    })
}
