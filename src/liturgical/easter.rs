//! Gregorian computus.
//!
//! # Algorithm
//! Anonymous Gregorian algorithm (Meeus/Jones/Butcher). Exact for every
//! Gregorian year; all other moveable feasts are offsets from its result.
//!
//! # Reference
//! Meeus (1991), "Astronomical Algorithms", Ch. 8

use chrono::NaiveDate;

use crate::error::{Error, Result};

/// Easter Sunday for a Gregorian year.
///
/// # Errors
/// [`Error::InvalidYear`] when the year is outside chrono's date range.
pub fn easter_sunday(year: i32) -> Result<NaiveDate> {
    let (month, day) = easter_month_day(year);
    NaiveDate::from_ymd_opt(year, month, day).ok_or(Error::InvalidYear(year))
}

/// Month and day of Easter Sunday.
///
/// Euclidean division keeps the coefficients valid for proleptic
/// (negative) years as well.
pub fn easter_month_day(year: i32) -> (u32, u32) {
    let y = i64::from(year);
    let a = y.rem_euclid(19);
    let b = y.div_euclid(100);
    let c = y.rem_euclid(100);
    let d = b.div_euclid(4);
    let e = b.rem_euclid(4);
    let f = (b + 8).div_euclid(25);
    let g = (b - f + 1).div_euclid(3);
    let h = (19 * a + b - d - g + 15).rem_euclid(30);
    let i = c.div_euclid(4);
    let k = c.rem_euclid(4);
    let l = (32 + 2 * e + 2 * i - h - k).rem_euclid(7);
    let m = (a + 11 * h + 22 * l).div_euclid(451);
    let n = h + l - 7 * m + 114;

    let month = n.div_euclid(31);
    let day = n.rem_euclid(31) + 1;
    // month in 3..=4, day in 1..=31 by construction
    (month as u32, day as u32)
}
