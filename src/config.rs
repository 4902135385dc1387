use std::collections::BTreeMap;
use std::time::Duration as StdDuration;

use crate::models::availability::{
    CoachAvailability, DayWorkingHours, ProgramConstraints, SessionFrequency,
};

/// Fallback values and tuning knobs for the recommendation engine, injected at
/// service construction so tests can override them. The `Default` impl is the
/// documented production configuration.
#[derive(Debug, Clone)]
pub struct EngineDefaults {
    /// Bound applied to every backend HTTP call before falling back.
    pub resolver_timeout: StdDuration,
    /// Length of the default recommendation window when the caller supplies
    /// no preferred date range.
    pub horizon_days: i64,
    /// Spacing between candidate slot starts.
    pub slot_granularity_minutes: i64,
    /// Maximum recommendations returned per call.
    pub max_recommendations: usize,
    pub default_session_length_minutes: i64,
    pub default_buffer_minutes: i64,
    pub default_max_sessions_per_day: u32,
    pub default_constraints: ProgramConstraints,
    pub matching: MatchingDefaults,
}

/// Tuning for the coach-to-request matcher.
#[derive(Debug, Clone)]
pub struct MatchingDefaults {
    pub weights: MatchingWeights,
    /// Matches scoring below this floor are dropped.
    pub min_match_score: f64,
    pub max_matches: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct MatchingWeights {
    pub skills: f64,
    pub experience: f64,
    pub rating: f64,
    pub availability: f64,
    pub price: f64,
}

impl MatchingWeights {
    /// Scales the weights so they sum to 1.0.
    pub fn normalized(self) -> Self {
        let total = self.skills + self.experience + self.rating + self.availability + self.price;
        if total <= 0.0 {
            return self;
        }
        Self {
            skills: self.skills / total,
            experience: self.experience / total,
            rating: self.rating / total,
            availability: self.availability / total,
            price: self.price / total,
        }
    }
}

impl Default for MatchingDefaults {
    fn default() -> Self {
        Self {
            weights: MatchingWeights {
                skills: 0.30,
                experience: 0.25,
                rating: 0.20,
                availability: 0.15,
                price: 0.10,
            },
            min_match_score: 0.6,
            max_matches: 10,
        }
    }
}

impl Default for EngineDefaults {
    fn default() -> Self {
        Self {
            resolver_timeout: StdDuration::from_secs(5),
            horizon_days: 30,
            slot_granularity_minutes: 30,
            max_recommendations: 10,
            default_session_length_minutes: 60,
            default_buffer_minutes: 15,
            default_max_sessions_per_day: 8,
            default_constraints: ProgramConstraints {
                session_frequency: SessionFrequency::BiWeekly,
                preferred_duration_minutes: 60,
                team_size: 1,
            },
            matching: MatchingDefaults::default(),
        }
    }
}

impl EngineDefaults {
    /// Substitute template used when the availability lookup fails: Mon-Fri
    /// 09:00-17:00 UTC, weekends unavailable, no blackout dates.
    pub fn availability_for(&self, coach_id: &str) -> CoachAvailability {
        let mut working_hours = BTreeMap::new();
        for day in ["monday", "tuesday", "wednesday", "thursday", "friday"] {
            working_hours.insert(
                day.to_string(),
                DayWorkingHours {
                    start: "09:00".to_string(),
                    end: "17:00".to_string(),
                    available: true,
                },
            );
        }
        for day in ["saturday", "sunday"] {
            working_hours.insert(
                day.to_string(),
                DayWorkingHours {
                    start: "09:00".to_string(),
                    end: "17:00".to_string(),
                    available: false,
                },
            );
        }

        CoachAvailability {
            coach_id: coach_id.to_string(),
            timezone: "UTC".to_string(),
            working_hours,
            blackout_dates: Vec::new(),
            preferred_session_length: self.default_session_length_minutes,
            max_sessions_per_day: self.default_max_sessions_per_day,
            buffer_time_minutes: self.default_buffer_minutes,
        }
    }
}
