//! Liturgical date engine.
//!
//! Derives the yearly set of moveable (and a few fixed) feast dates that
//! decide which masses a month's schedule contains. Pure: a year and a
//! [`LiturgicalConfig`] in, a [`LiturgicalDates`] out.
//!
//! # Day Arithmetic
//! Every offset is a whole calendar-day step on [`NaiveDate`], so no
//! daylight-saving transition can shift a result. Dates compare by calendar
//! day; [`LiturgicalDates::anchored`] provides the midday instant for
//! consumers that need one.
//!
//! # Offsets from Easter
//!
//! | Feast | Offset |
//! |-------|--------|
//! | Ash Wednesday | −46 |
//! | Palm Sunday | −7 |
//! | Holy Thursday | −3 |
//! | Good Friday | −2 |
//! | Holy Saturday | −1 |
//! | Divine Mercy Sunday | +7 |
//! | Ascension | +39 (Thursday) / +42 (Sunday) |
//! | Pentecost | +49 |
//! | Trinity Sunday | Pentecost +7 |
//! | Corpus Christi | Pentecost +11 (Thursday) / +14 (Sunday) |

mod cycle;
mod easter;

pub use cycle::{liturgical_year_of, sunday_cycle, weekday_cycle, SundayCycle, WeekdayCycle};
pub use easter::{easter_month_day, easter_sunday};

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::{Error, Result};
use crate::models::midday;

/// Transfer toggles set by the local bishops' conference.
///
/// All default to `false` (no transfer).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LiturgicalConfig {
    /// Celebrate Ascension on the following Sunday.
    pub transfer_ascension: bool,
    /// Celebrate Corpus Christi on the following Sunday.
    pub transfer_corpus_christi: bool,
    /// Celebrate Epiphany on the Sunday between January 2 and 8.
    pub transfer_epiphany: bool,
}

impl LiturgicalConfig {
    /// Transfers all three feasts to Sunday (the common US practice).
    pub fn all_transferred() -> Self {
        Self {
            transfer_ascension: true,
            transfer_corpus_christi: true,
            transfer_epiphany: true,
        }
    }
}

/// Named dates produced by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Feast {
    Easter,
    AshWednesday,
    PalmSunday,
    HolyThursday,
    GoodFriday,
    HolySaturday,
    DivineMercySunday,
    Pentecost,
    TrinitySunday,
    Ascension,
    CorpusChristi,
    Epiphany,
    BaptismOfTheLord,
    ImmaculateConception,
    ChristmasDay,
    MaryMotherOfGod,
    FirstSundayOfAdvent,
    ChristTheKing,
}

impl Feast {
    /// Number of feasts.
    pub const COUNT: usize = 18;

    /// Every feast, in declaration order.
    pub const ALL: [Feast; Feast::COUNT] = [
        Feast::Easter,
        Feast::AshWednesday,
        Feast::PalmSunday,
        Feast::HolyThursday,
        Feast::GoodFriday,
        Feast::HolySaturday,
        Feast::DivineMercySunday,
        Feast::Pentecost,
        Feast::TrinitySunday,
        Feast::Ascension,
        Feast::CorpusChristi,
        Feast::Epiphany,
        Feast::BaptismOfTheLord,
        Feast::ImmaculateConception,
        Feast::ChristmasDay,
        Feast::MaryMotherOfGod,
        Feast::FirstSundayOfAdvent,
        Feast::ChristTheKing,
    ];

    /// Human-readable name.
    pub fn title(&self) -> &'static str {
        match self {
            Feast::Easter => "Easter Sunday",
            Feast::AshWednesday => "Ash Wednesday",
            Feast::PalmSunday => "Palm Sunday",
            Feast::HolyThursday => "Holy Thursday",
            Feast::GoodFriday => "Good Friday",
            Feast::HolySaturday => "Holy Saturday",
            Feast::DivineMercySunday => "Divine Mercy Sunday",
            Feast::Pentecost => "Pentecost",
            Feast::TrinitySunday => "Trinity Sunday",
            Feast::Ascension => "Ascension of the Lord",
            Feast::CorpusChristi => "Corpus Christi",
            Feast::Epiphany => "Epiphany of the Lord",
            Feast::BaptismOfTheLord => "Baptism of the Lord",
            Feast::ImmaculateConception => "Immaculate Conception",
            Feast::ChristmasDay => "Christmas Day",
            Feast::MaryMotherOfGod => "Mary, Mother of God",
            Feast::FirstSundayOfAdvent => "First Sunday of Advent",
            Feast::ChristTheKing => "Christ the King",
        }
    }
}

impl fmt::Display for Feast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// The computed dates for one year.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiturgicalDates {
    year: i32,
    config: LiturgicalConfig,
    dates: [NaiveDate; Feast::COUNT],
}

impl LiturgicalDates {
    /// Calendar year these dates belong to.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// Configuration used to compute them.
    pub fn config(&self) -> &LiturgicalConfig {
        &self.config
    }

    /// Date of a feast.
    #[inline]
    pub fn date(&self, feast: Feast) -> NaiveDate {
        self.dates[feast as usize]
    }

    /// Midday instant of a feast.
    pub fn anchored(&self, feast: Feast) -> NaiveDateTime {
        midday(self.date(feast))
    }

    /// All (feast, date) pairs in feast declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (Feast, NaiveDate)> + '_ {
        Feast::ALL.iter().map(move |&f| (f, self.date(f)))
    }

    /// Feast → date map.
    pub fn to_map(&self) -> BTreeMap<Feast, NaiveDate> {
        self.iter().collect()
    }

    /// Feasts falling on a calendar day.
    pub fn feasts_on(&self, date: NaiveDate) -> Vec<Feast> {
        self.iter()
            .filter(|&(_, d)| d == date)
            .map(|(f, _)| f)
            .collect()
    }

    /// Feasts in a month of this year, ordered by date.
    pub fn in_month(&self, month: u32) -> Vec<(Feast, NaiveDate)> {
        let mut found: Vec<(Feast, NaiveDate)> =
            self.iter().filter(|&(_, d)| d.month() == month).collect();
        found.sort_by_key(|&(f, d)| (d, f));
        found
    }
}

/// Computes the liturgical dates for a year.
///
/// # Errors
/// [`Error::InvalidYear`] only when a date falls outside chrono's range.
pub fn compute_liturgical_dates(year: i32, config: &LiturgicalConfig) -> Result<LiturgicalDates> {
    let easter = easter_sunday(year)?;
    let shift = |date: NaiveDate, days: i64| offset(year, date, days);

    let pentecost = shift(easter, 49)?;
    let ascension = shift(easter, if config.transfer_ascension { 42 } else { 39 })?;
    let corpus_christi = shift(pentecost, if config.transfer_corpus_christi { 14 } else { 11 })?;

    let epiphany = epiphany(year, config)?;
    let baptism = baptism_of_the_lord(year, epiphany)?;
    let advent = first_sunday_of_advent(year)?;

    let mut dates = [easter; Feast::COUNT];
    let mut set = |feast: Feast, date: NaiveDate| dates[feast as usize] = date;

    set(Feast::Easter, easter);
    set(Feast::AshWednesday, shift(easter, -46)?);
    set(Feast::PalmSunday, shift(easter, -7)?);
    set(Feast::HolyThursday, shift(easter, -3)?);
    set(Feast::GoodFriday, shift(easter, -2)?);
    set(Feast::HolySaturday, shift(easter, -1)?);
    set(Feast::DivineMercySunday, shift(easter, 7)?);
    set(Feast::Pentecost, pentecost);
    set(Feast::TrinitySunday, shift(pentecost, 7)?);
    set(Feast::Ascension, ascension);
    set(Feast::CorpusChristi, corpus_christi);
    set(Feast::Epiphany, epiphany);
    set(Feast::BaptismOfTheLord, baptism);
    set(Feast::ImmaculateConception, ymd(year, 12, 8)?);
    set(Feast::ChristmasDay, ymd(year, 12, 25)?);
    set(Feast::MaryMotherOfGod, ymd(year, 1, 1)?);
    set(Feast::FirstSundayOfAdvent, advent);
    set(Feast::ChristTheKing, shift(advent, -7)?);

    tracing::debug!(year, %easter, %advent, "computed liturgical dates");

    Ok(LiturgicalDates {
        year,
        config: *config,
        dates,
    })
}

/// First Sunday of Advent for a calendar year.
///
/// Three weeks before the Sunday strictly preceding Christmas Day (the
/// fourth Sunday of Advent).
pub fn first_sunday_of_advent(year: i32) -> Result<NaiveDate> {
    let christmas = ymd(year, 12, 25)?;
    let back = match christmas.weekday().num_days_from_sunday() {
        0 => 7,
        n => i64::from(n),
    };
    let fourth_sunday = offset(year, christmas, -back)?;
    offset(year, fourth_sunday, -21)
}

fn epiphany(year: i32, config: &LiturgicalConfig) -> Result<NaiveDate> {
    if config.transfer_epiphany {
        sunday_on_or_after(year, ymd(year, 1, 2)?)
    } else {
        ymd(year, 1, 6)
    }
}

fn baptism_of_the_lord(year: i32, epiphany: NaiveDate) -> Result<NaiveDate> {
    if epiphany.weekday() == Weekday::Sun {
        if epiphany.day() >= 7 {
            // Sunday after Epiphany is displaced; Baptism moves to Monday
            offset(year, epiphany, 1)
        } else {
            offset(year, epiphany, 7)
        }
    } else {
        sunday_on_or_after(year, offset(year, epiphany, 1)?)
    }
}

fn sunday_on_or_after(year: i32, from: NaiveDate) -> Result<NaiveDate> {
    let mut day = from;
    while day.weekday() != Weekday::Sun {
        day = offset(year, day, 1)?;
    }
    Ok(day)
}

fn ymd(year: i32, month: u32, day: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day).ok_or(Error::InvalidYear(year))
}

fn offset(year: i32, date: NaiveDate, days: i64) -> Result<NaiveDate> {
    let step = Days::new(days.unsigned_abs());
    let moved = if days >= 0 {
        date.checked_add_days(step)
    } else {
        date.checked_sub_days(step)
    };
    moved.ok_or(Error::InvalidYear(year))
}
