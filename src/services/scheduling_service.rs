use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Duration, Utc};
use serde_json::json;
use tracing::{info, warn};

use crate::config::EngineDefaults;
use crate::error::{AppError, AppResult};
use crate::models::availability::{CoachAvailability, ProgramConstraints};
use crate::models::recommendation::{
    RecommendationRequest, ScheduleRecommendation, SlotAvailability,
};
use crate::models::session::{ExistingSession, ScheduleSessionRequest, Session, SessionDraft};
use crate::services::backend_api::SchedulingBackend;
use crate::services::{recommendation_scorer, schedule_utils, slot_generator};

/// Stateless recommendation engine. Each call fetches fresh read models,
/// synthesizes candidate slots, scores the conflict-free ones and returns the
/// ranked top N; the only side effect is the explicit booking call.
pub struct SchedulingService {
    backend: Arc<dyn SchedulingBackend>,
    defaults: EngineDefaults,
}

impl SchedulingService {
    pub fn new(backend: Arc<dyn SchedulingBackend>, defaults: EngineDefaults) -> Self {
        Self { backend, defaults }
    }

    pub async fn recommend(
        &self,
        request: &RecommendationRequest,
    ) -> AppResult<Vec<ScheduleRecommendation>> {
        self.recommend_at(request, Utc::now()).await
    }

    /// Same as [`recommend`](Self::recommend) with an explicit reference
    /// instant, keeping urgency scoring and the default window deterministic
    /// under test.
    pub async fn recommend_at(
        &self,
        request: &RecommendationRequest,
        reference: DateTime<Utc>,
    ) -> AppResult<Vec<ScheduleRecommendation>> {
        validate_request(request)?;
        let started = Instant::now();

        // the three lookups are independent, so they run concurrently
        let (availability, sessions, constraints) = tokio::join!(
            self.resolve_availability(&request.coach_id),
            self.resolve_sessions(&request.coach_id),
            self.resolve_constraints(&request.mentorship_request_id),
        );

        let (range_start, range_end) = self.resolve_range(request, reference)?;
        let candidates = slot_generator::generate_slots(
            &availability,
            range_start,
            range_end,
            request.preferred_duration,
            self.defaults.slot_granularity_minutes,
        )?;
        let candidate_count = candidates.len();

        let tagged = slot_generator::detect_conflicts(candidates, &sessions)?;

        let mut scored = Vec::new();
        for slot in tagged {
            if slot.availability != SlotAvailability::Available {
                continue;
            }
            let start = schedule_utils::parse_datetime(&slot.start_at)?;
            let recommendation =
                recommendation_scorer::score_available_slot(slot, request, &constraints, reference)?;
            scored.push((start, recommendation));
        }

        // descending score, earliest start breaks ties
        scored.sort_by(|a, b| b.1.score.cmp(&a.1.score).then_with(|| a.0.cmp(&b.0)));
        scored.truncate(self.defaults.max_recommendations);

        let recommendations: Vec<ScheduleRecommendation> =
            scored.into_iter().map(|(_, rec)| rec).collect();

        info!(
            target: "app::scheduling",
            coach_id = %request.coach_id,
            mentorship_request_id = %request.mentorship_request_id,
            candidates = candidate_count,
            recommendations = recommendations.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "recommendation run completed"
        );

        Ok(recommendations)
    }

    /// Converts a chosen recommendation into a session booking. Unlike the
    /// resolvers, failures here surface to the caller: booking is a
    /// user-visible committing action.
    pub async fn book(
        &self,
        request: &RecommendationRequest,
        recommendation: &ScheduleRecommendation,
        draft: &SessionDraft,
    ) -> AppResult<Session> {
        let schedule_request = ScheduleSessionRequest {
            mentorship_request_id: request.mentorship_request_id.clone(),
            coach_id: recommendation.slot.coach_id.clone(),
            title: draft.title.clone(),
            description: draft.description.clone(),
            session_type: draft.session_type,
            scheduled_start_at: recommendation.slot.start_at.clone(),
            scheduled_end_at: recommendation.slot.end_at.clone(),
            participants: draft.participants.clone(),
        };

        let session = self
            .backend
            .create_session(&schedule_request)
            .await
            .map_err(|error| {
                AppError::booking_with_details(
                    format!("failed to book session: {error}"),
                    json!({
                        "coachId": schedule_request.coach_id,
                        "startAt": schedule_request.scheduled_start_at,
                        "endAt": schedule_request.scheduled_end_at,
                    }),
                )
            })?;

        info!(
            target: "app::scheduling",
            session_id = %session.id,
            coach_id = %session.coach_id,
            start_at = %session.scheduled_start_at,
            "session booked"
        );

        Ok(session)
    }

    async fn resolve_availability(&self, coach_id: &str) -> CoachAvailability {
        match self.backend.fetch_coach_availability(coach_id).await {
            Ok(availability) => availability,
            Err(error) => {
                warn!(
                    target: "app::scheduling",
                    coach_id = %coach_id,
                    error = %error,
                    "availability lookup failed, using default weekly template"
                );
                self.defaults.availability_for(coach_id)
            }
        }
    }

    async fn resolve_sessions(&self, coach_id: &str) -> Vec<ExistingSession> {
        match self.backend.fetch_coach_sessions(coach_id).await {
            Ok(sessions) => sessions,
            Err(error) => {
                warn!(
                    target: "app::scheduling",
                    coach_id = %coach_id,
                    error = %error,
                    "session lookup failed, assuming no existing bookings"
                );
                Vec::new()
            }
        }
    }

    async fn resolve_constraints(&self, mentorship_request_id: &str) -> ProgramConstraints {
        match self
            .backend
            .fetch_program_constraints(mentorship_request_id)
            .await
        {
            Ok(constraints) => constraints,
            Err(error) => {
                warn!(
                    target: "app::scheduling",
                    mentorship_request_id = %mentorship_request_id,
                    error = %error,
                    "program lookup failed, using default constraints"
                );
                self.defaults.default_constraints.clone()
            }
        }
    }

    fn resolve_range(
        &self,
        request: &RecommendationRequest,
        reference: DateTime<Utc>,
    ) -> AppResult<(DateTime<Utc>, DateTime<Utc>)> {
        let frames = request.preferred_time_frames.as_ref();
        let start = match frames.and_then(|frames| frames.start_date.as_ref()) {
            Some(raw) => schedule_utils::parse_datetime(raw)?.with_timezone(&Utc),
            None => reference,
        };
        let end = match frames.and_then(|frames| frames.end_date.as_ref()) {
            Some(raw) => schedule_utils::parse_datetime(raw)?.with_timezone(&Utc),
            None => start + Duration::days(self.defaults.horizon_days),
        };
        Ok((start, end))
    }
}

fn validate_request(request: &RecommendationRequest) -> AppResult<()> {
    if request.mentorship_request_id.trim().is_empty() {
        return Err(AppError::validation("mentorshipRequestId must not be empty"));
    }
    if request.coach_id.trim().is_empty() {
        return Err(AppError::validation("coachId must not be empty"));
    }
    if request.preferred_duration <= 0 {
        return Err(AppError::validation_with_details(
            "preferredDuration must be a positive number of minutes",
            json!({"preferredDuration": request.preferred_duration}),
        ));
    }

    if let Some(frames) = &request.preferred_time_frames {
        let start = schedule_utils::parse_optional_datetime(frames.start_date.as_ref())?;
        let end = schedule_utils::parse_optional_datetime(frames.end_date.as_ref())?;
        if let (Some(start), Some(end)) = (start, end) {
            if end < start {
                return Err(AppError::validation_with_details(
                    "preferredTimeFrames.endDate precedes startDate",
                    json!({
                        "startDate": frames.start_date,
                        "endDate": frames.end_date,
                    }),
                ));
            }
        }
        if let Some(day) = frames.preferred_days.iter().find(|day| **day > 6) {
            return Err(AppError::validation_with_details(
                "preferredTimeFrames.preferredDays entries must be 0..=6",
                json!({"preferredDay": day}),
            ));
        }
        if let Some(hours) = &frames.preferred_hours {
            if hours.end > 24 || hours.start >= hours.end {
                return Err(AppError::validation_with_details(
                    "preferredTimeFrames.preferredHours must be an ascending 24h window",
                    json!({"start": hours.start, "end": hours.end}),
                ));
            }
        }
    }

    Ok(())
}
