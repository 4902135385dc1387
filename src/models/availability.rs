use std::collections::BTreeMap;

use chrono::{NaiveDate, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Working-hours entry for a single weekday. Times are `HH:MM` strings in the
/// coach's local time zone, matching the backend wire format.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DayWorkingHours {
    pub start: String,
    pub end: String,
    pub available: bool,
}

/// Read model for a coach's weekly template, fetched fresh per request and
/// never mutated by the engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CoachAvailability {
    pub coach_id: String,
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// Keyed by lowercase weekday name (`monday`..`sunday`). Weekdays with no
    /// entry are treated as unavailable.
    pub working_hours: BTreeMap<String, DayWorkingHours>,
    /// Calendar dates on which the coach is categorically unavailable.
    #[serde(default)]
    pub blackout_dates: Vec<NaiveDate>,
    pub preferred_session_length: i64,
    pub max_sessions_per_day: u32,
    pub buffer_time_minutes: i64,
}

fn default_timezone() -> String {
    "UTC".to_string()
}

impl CoachAvailability {
    /// Resolves the coach time zone, falling back to UTC on an unknown name.
    pub fn tz(&self) -> Tz {
        match self.timezone.parse::<Tz>() {
            Ok(tz) => tz,
            Err(_) => {
                warn!(
                    target: "app::scheduling",
                    coach_id = %self.coach_id,
                    timezone = %self.timezone,
                    "unknown coach timezone, falling back to UTC"
                );
                Tz::UTC
            }
        }
    }

    pub fn hours_for(&self, weekday: Weekday) -> Option<&DayWorkingHours> {
        self.working_hours.get(weekday_key(weekday))
    }

    pub fn is_blackout(&self, date: NaiveDate) -> bool {
        self.blackout_dates.contains(&date)
    }
}

pub fn weekday_key(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    }
}

/// Weekday index on the wire: 0 = Monday .. 6 = Sunday.
pub fn weekday_index(weekday: Weekday) -> u8 {
    weekday.num_days_from_monday() as u8
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum SessionFrequency {
    Weekly,
    BiWeekly,
    Monthly,
}

/// Program-level scheduling preferences, used only to bias scoring.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProgramConstraints {
    pub session_frequency: SessionFrequency,
    pub preferred_duration_minutes: i64,
    pub team_size: u32,
}
