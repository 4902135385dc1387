use std::sync::Arc;

use httpmock::prelude::*;
use peptok_scheduling::models::recommendation::{
    AvailabilityLevel, ProgramFitLevel, RecommendationRequest, ScheduleRecommendation,
    SlotAvailability, TimeSlot, Urgency,
};
use peptok_scheduling::models::session::{SessionDraft, SessionType};
use peptok_scheduling::{AppError, BackendApiClient, EngineDefaults, SchedulingService};
use serde_json::json;

fn service_for(server: &MockServer) -> SchedulingService {
    let defaults = EngineDefaults::default();
    let client =
        BackendApiClient::from_defaults(server.base_url(), &defaults).expect("backend client");
    SchedulingService::new(Arc::new(client), defaults)
}

fn request() -> RecommendationRequest {
    RecommendationRequest {
        mentorship_request_id: "req-1".to_string(),
        coach_id: "coach-1".to_string(),
        preferred_duration: 60,
        preferred_time_frames: None,
        urgency: Urgency::Flexible,
        session_type: SessionType::Video,
    }
}

fn recommendation() -> ScheduleRecommendation {
    ScheduleRecommendation {
        slot: TimeSlot {
            start_at: "2026-03-02T10:00:00+00:00".to_string(),
            end_at: "2026-03-02T11:00:00+00:00".to_string(),
            availability: SlotAvailability::Available,
            coach_id: "coach-1".to_string(),
            conflict_reason: None,
        },
        score: 77,
        reasoning: vec!["No scheduling conflicts".to_string()],
        coach_availability: AvailabilityLevel::High,
        program_fit: ProgramFitLevel::Good,
        urgency: Urgency::Flexible,
    }
}

fn draft() -> SessionDraft {
    SessionDraft {
        title: "Leadership coaching".to_string(),
        description: Some("Quarterly goals review".to_string()),
        session_type: SessionType::Video,
        participants: vec!["user-7".to_string()],
    }
}

#[tokio::test]
async fn booking_posts_the_chosen_slot_to_the_session_store() {
    let server = MockServer::start_async().await;
    let create_mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/sessions")
                .json_body_partial(
                    r#"{
                        "mentorshipRequestId": "req-1",
                        "coachId": "coach-1",
                        "title": "Leadership coaching",
                        "sessionType": "video",
                        "scheduledStartAt": "2026-03-02T10:00:00+00:00",
                        "scheduledEndAt": "2026-03-02T11:00:00+00:00"
                    }"#,
                );
            then.status(201).json_body(json!({
                "data": {
                    "id": "session-900",
                    "coachId": "coach-1",
                    "status": "scheduled",
                    "scheduledStartAt": "2026-03-02T10:00:00+00:00",
                    "scheduledEndAt": "2026-03-02T11:00:00+00:00"
                }
            }));
        })
        .await;

    let service = service_for(&server);
    let session = service
        .book(&request(), &recommendation(), &draft())
        .await
        .expect("booked session");

    assert_eq!(session.id, "session-900");
    assert_eq!(session.status, "scheduled");
    assert_eq!(create_mock.hits_async().await, 1);
}

#[tokio::test]
async fn booking_failure_surfaces_with_slot_context() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/sessions");
            then.status(409).json_body(json!({"error": "slot already taken"}));
        })
        .await;

    let service = service_for(&server);
    let error = service
        .book(&request(), &recommendation(), &draft())
        .await
        .expect_err("booking must fail");

    match error {
        AppError::Booking { message, details } => {
            assert!(message.contains("failed to book session"));
            let details = details.expect("booking details");
            assert_eq!(details["coachId"], "coach-1");
            assert_eq!(details["startAt"], "2026-03-02T10:00:00+00:00");
        }
        other => panic!("expected booking error, got {other:?}"),
    }
}
