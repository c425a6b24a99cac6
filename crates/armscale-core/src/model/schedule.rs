// ── Recurrence schedules for time-based profiles ──

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Day of the week, spelled the way the management plane expects.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    /// Monday through Friday.
    pub fn weekdays() -> Vec<Self> {
        vec![
            Self::Monday,
            Self::Tuesday,
            Self::Wednesday,
            Self::Thursday,
            Self::Friday,
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
pub enum RecurrenceFrequency {
    None,
    Second,
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Year,
}

/// When a recurring profile starts: a time zone, a set of days, and the
/// hours/minutes at which it kicks in on each of those days.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurrentSchedule {
    /// Windows time zone name, e.g. `Pacific Standard Time`.
    pub time_zone: String,
    pub days: Vec<DayOfWeek>,
    pub hours: Vec<u8>,
    pub minutes: Vec<u8>,
}

impl RecurrentSchedule {
    /// A schedule firing once a day at `hour:minute` on each of `days`.
    pub fn daily_at(time_zone: &str, days: &[DayOfWeek], hour: u8, minute: u8) -> Self {
        Self {
            time_zone: time_zone.to_owned(),
            days: days.to_vec(),
            hours: vec![hour],
            minutes: vec![minute],
        }
    }

    /// Every (hour, minute) start time this schedule produces, sorted.
    pub fn start_times(&self) -> Vec<(u8, u8)> {
        let mut times: Vec<(u8, u8)> = self
            .hours
            .iter()
            .flat_map(|h| self.minutes.iter().map(move |m| (*h, *m)))
            .collect();
        times.sort_unstable();
        times.dedup();
        times
    }

    /// Whether this schedule and `other` can start at the same instant.
    pub fn collides_with(&self, other: &RecurrentSchedule) -> bool {
        if self.time_zone != other.time_zone {
            return false;
        }
        let shares_day = self.days.iter().any(|d| other.days.contains(d));
        if !shares_day {
            return false;
        }
        let ours = self.start_times();
        other.start_times().iter().any(|t| ours.contains(t))
    }
}

/// Recurrence of a profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recurrence {
    pub frequency: RecurrenceFrequency,
    pub schedule: RecurrentSchedule,
}

impl Recurrence {
    pub fn weekly(schedule: RecurrentSchedule) -> Self {
        Self {
            frequency: RecurrenceFrequency::Week,
            schedule,
        }
    }
}
