use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SessionType {
    #[default]
    Video,
    Audio,
    Chat,
}

/// Read-only view of an already-booked session, used for conflict checking.
/// The backend filters these to a single coach and to non-terminal statuses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExistingSession {
    #[serde(default)]
    pub id: Option<String>,
    pub scheduled_start_at: String,
    pub scheduled_end_at: String,
}

/// Remaining metadata the caller supplies when booking a recommendation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionDraft {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub session_type: SessionType,
    #[serde(default)]
    pub participants: Vec<String>,
}

/// Session-creation request posted to the external session store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleSessionRequest {
    pub mentorship_request_id: String,
    pub coach_id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub session_type: SessionType,
    pub scheduled_start_at: String,
    pub scheduled_end_at: String,
    #[serde(default)]
    pub participants: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    pub coach_id: String,
    pub status: String,
    pub scheduled_start_at: String,
    pub scheduled_end_at: String,
}
