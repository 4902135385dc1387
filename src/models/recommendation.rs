use serde::{Deserialize, Serialize};

use crate::models::session::SessionType;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Immediate,
    Soon,
    #[default]
    Flexible,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SlotAvailability {
    Available,
    Busy,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AvailabilityLevel {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProgramFitLevel {
    Excellent,
    Good,
    Fair,
}

/// Preferred hour-of-day window in 24h clock, half-open on the end hour.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PreferredHours {
    pub start: u32,
    pub end: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct PreferredTimeFrames {
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    /// Weekday indexes, 0 = Monday .. 6 = Sunday.
    #[serde(default)]
    pub preferred_days: Vec<u8>,
    #[serde(default)]
    pub preferred_hours: Option<PreferredHours>,
}

impl PreferredTimeFrames {
    /// True when the caller expressed no day or hour preference, in which case
    /// the time-preference sub-score stays neutral.
    pub fn is_neutral(&self) -> bool {
        self.preferred_days.is_empty() && self.preferred_hours.is_none()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationRequest {
    pub mentorship_request_id: String,
    pub coach_id: String,
    /// Target session duration in minutes, must be positive.
    pub preferred_duration: i64,
    #[serde(default)]
    pub preferred_time_frames: Option<PreferredTimeFrames>,
    #[serde(default)]
    pub urgency: Urgency,
    #[serde(default)]
    pub session_type: SessionType,
}

/// Candidate slot, ephemeral within one recommendation call. Instants are
/// RFC3339 strings carrying the coach's local offset.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlot {
    pub start_at: String,
    pub end_at: String,
    pub availability: SlotAvailability,
    pub coach_id: String,
    #[serde(default)]
    pub conflict_reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRecommendation {
    pub slot: TimeSlot,
    /// Weighted total in [0, 100].
    pub score: i64,
    pub reasoning: Vec<String>,
    pub coach_availability: AvailabilityLevel,
    pub program_fit: ProgramFitLevel,
    pub urgency: Urgency,
}
