use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{TimeZone, Utc};
use httpmock::prelude::*;
use peptok_scheduling::models::recommendation::{
    PreferredHours, PreferredTimeFrames, RecommendationRequest, Urgency,
};
use peptok_scheduling::models::session::SessionType;
use peptok_scheduling::{AppError, BackendApiClient, EngineDefaults, SchedulingService};
use serde_json::json;

fn service_for(server: &MockServer, defaults: EngineDefaults) -> SchedulingService {
    let client =
        BackendApiClient::from_defaults(server.base_url(), &defaults).expect("backend client");
    SchedulingService::new(Arc::new(client), defaults)
}

fn request() -> RecommendationRequest {
    RecommendationRequest {
        mentorship_request_id: "req-1".to_string(),
        coach_id: "coach-1".to_string(),
        preferred_duration: 60,
        preferred_time_frames: Some(PreferredTimeFrames {
            // Monday 2026-03-02, single-day window
            start_date: Some("2026-03-02T00:00:00Z".to_string()),
            end_date: Some("2026-03-02T23:00:00Z".to_string()),
            preferred_days: Vec::new(),
            preferred_hours: None,
        }),
        urgency: Urgency::Flexible,
        session_type: SessionType::Video,
    }
}

fn reference() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0)
        .single()
        .expect("reference instant")
}

fn availability_body() -> serde_json::Value {
    let mut working_hours = serde_json::Map::new();
    for day in ["monday", "tuesday", "wednesday", "thursday", "friday"] {
        working_hours.insert(
            day.to_string(),
            json!({"start": "09:00", "end": "17:00", "available": true}),
        );
    }
    for day in ["saturday", "sunday"] {
        working_hours.insert(
            day.to_string(),
            json!({"start": "09:00", "end": "17:00", "available": false}),
        );
    }
    json!({
        "data": {
            "coachId": "coach-1",
            "timezone": "UTC",
            "workingHours": working_hours,
            "blackoutDates": [],
            "preferredSessionLength": 60,
            "maxSessionsPerDay": 6,
            "bufferTimeMinutes": 15
        }
    })
}

fn constraints_body() -> serde_json::Value {
    json!({
        "data": {
            "sessionFrequency": "bi-weekly",
            "preferredDurationMinutes": 60,
            "teamSize": 1
        }
    })
}

async fn mock_backend(server: &MockServer, sessions: serde_json::Value) {
    server
        .mock_async(|when, then| {
            when.method(GET).path("/coaches/coach-1/availability");
            then.status(200).json_body(availability_body());
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/coaches/coach-1/sessions")
                .query_param("status", "scheduled,confirmed");
            then.status(200).json_body(json!({"data": sessions}));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/mentorship-requests/req-1");
            then.status(200).json_body(constraints_body());
        })
        .await;
}

#[tokio::test]
async fn open_monday_yields_the_baseline_lattice() {
    let server = MockServer::start_async().await;
    mock_backend(&server, json!([])).await;

    let defaults = EngineDefaults {
        max_recommendations: 20,
        ..EngineDefaults::default()
    };
    let service = service_for(&server, defaults);

    let recommendations = service
        .recommend_at(&request(), reference())
        .await
        .expect("recommendations");

    // 09:00 .. 16:00 starts at 30-minute granularity
    assert_eq!(recommendations.len(), 15);
    assert!(recommendations[0].slot.start_at.starts_with("2026-03-02T09:00:00"));
    assert!(recommendations[14].slot.start_at.starts_with("2026-03-02T16:00:00"));

    for recommendation in &recommendations {
        assert_eq!(recommendation.score, 77);
        assert_eq!(recommendation.urgency, Urgency::Flexible);
        assert!(recommendation
            .reasoning
            .iter()
            .any(|reason| reason == "Coach has high availability"));
    }

    // equal scores fall back to earliest start
    for pair in recommendations.windows(2) {
        assert!(pair[0].slot.start_at < pair[1].slot.start_at);
    }
}

#[tokio::test]
async fn default_result_cap_truncates_to_ten() {
    let server = MockServer::start_async().await;
    mock_backend(&server, json!([])).await;

    let service = service_for(&server, EngineDefaults::default());
    let recommendations = service
        .recommend_at(&request(), reference())
        .await
        .expect("recommendations");

    assert_eq!(recommendations.len(), 10);
}

#[tokio::test]
async fn conflicting_slots_are_excluded_from_the_ranked_list() {
    let server = MockServer::start_async().await;
    mock_backend(
        &server,
        json!([{
            "id": "session-42",
            "scheduledStartAt": "2026-03-02T09:00:00Z",
            "scheduledEndAt": "2026-03-02T10:00:00Z"
        }]),
    )
    .await;

    let defaults = EngineDefaults {
        max_recommendations: 20,
        ..EngineDefaults::default()
    };
    let service = service_for(&server, defaults);
    let recommendations = service
        .recommend_at(&request(), reference())
        .await
        .expect("recommendations");

    // the 09:00 and 09:30 candidates overlap the booking and are dropped
    assert_eq!(recommendations.len(), 13);
    assert!(recommendations[0].slot.start_at.starts_with("2026-03-02T10:00:00"));
    assert!(!recommendations
        .iter()
        .any(|rec| rec.slot.start_at.starts_with("2026-03-02T09:")));
}

#[tokio::test]
async fn resolver_outage_degrades_to_defaults_instead_of_failing() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET);
            then.status(500).json_body(json!({"error": "boom"}));
        })
        .await;

    let defaults = EngineDefaults {
        max_recommendations: 20,
        ..EngineDefaults::default()
    };
    let service = service_for(&server, defaults);

    let recommendations = service
        .recommend_at(&request(), reference())
        .await
        .expect("fallback recommendations");

    // default Mon-Fri template still produces the Monday lattice
    assert_eq!(recommendations.len(), 15);
    assert_eq!(recommendations[0].score, 77);
}

#[tokio::test]
async fn slow_resolvers_hit_the_configured_timeout_and_fall_back() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET);
            then.status(200)
                .json_body(availability_body())
                .delay(StdDuration::from_secs(2));
        })
        .await;

    let defaults = EngineDefaults {
        resolver_timeout: StdDuration::from_millis(250),
        max_recommendations: 20,
        ..EngineDefaults::default()
    };
    let service = service_for(&server, defaults);

    let recommendations = service
        .recommend_at(&request(), reference())
        .await
        .expect("fallback recommendations");

    // every resolver timed out, the default template still fills the Monday
    assert_eq!(recommendations.len(), 15);
    assert_eq!(recommendations[0].score, 77);
}

#[tokio::test]
async fn preferred_days_and_hours_rank_matching_slots_first() {
    let server = MockServer::start_async().await;
    mock_backend(&server, json!([])).await;

    let mut preferred = request();
    preferred.preferred_time_frames = Some(PreferredTimeFrames {
        start_date: Some("2026-03-02T00:00:00Z".to_string()),
        end_date: Some("2026-03-03T23:00:00Z".to_string()),
        preferred_days: vec![0], // Monday
        preferred_hours: Some(PreferredHours { start: 9, end: 11 }),
    });

    let defaults = EngineDefaults {
        max_recommendations: 50,
        ..EngineDefaults::default()
    };
    let service = service_for(&server, defaults);
    let recommendations = service
        .recommend_at(&preferred, reference())
        .await
        .expect("recommendations");

    // Monday 09:00-10:30 starts match both day and hour preferences
    let top = &recommendations[0];
    assert!(top.slot.start_at.starts_with("2026-03-02T09:00:00"));
    assert!(top
        .reasoning
        .iter()
        .any(|reason| reason == "Matches preferred time frame"));

    // scores stay sorted descending
    for pair in recommendations.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }

    // Tuesday slots score below preferred Monday slots
    let monday_best = recommendations
        .iter()
        .find(|rec| rec.slot.start_at.starts_with("2026-03-02T09:00:00"))
        .expect("monday slot");
    let tuesday_best = recommendations
        .iter()
        .find(|rec| rec.slot.start_at.starts_with("2026-03-03"))
        .expect("tuesday slot");
    assert!(monday_best.score > tuesday_best.score);
}

#[tokio::test]
async fn identical_inputs_yield_identical_rankings() {
    let server = MockServer::start_async().await;
    mock_backend(&server, json!([])).await;

    let service = service_for(&server, EngineDefaults::default());
    let first = service
        .recommend_at(&request(), reference())
        .await
        .expect("first run");
    let second = service
        .recommend_at(&request(), reference())
        .await
        .expect("second run");

    assert_eq!(first, second);
}

#[tokio::test]
async fn invalid_input_fails_fast_without_touching_the_backend() {
    let server = MockServer::start_async().await;
    let backend_mock = server
        .mock_async(|when, then| {
            when.method(GET);
            then.status(200).json_body(json!({"data": []}));
        })
        .await;

    let service = service_for(&server, EngineDefaults::default());

    let mut invalid = request();
    invalid.preferred_duration = -30;
    let error = service
        .recommend_at(&invalid, reference())
        .await
        .expect_err("must fail");
    assert!(matches!(error, AppError::Validation { .. }));
    assert!(error.to_string().contains("preferredDuration"));

    let mut inverted = request();
    inverted.preferred_time_frames = Some(PreferredTimeFrames {
        start_date: Some("2026-03-09T00:00:00Z".to_string()),
        end_date: Some("2026-03-02T00:00:00Z".to_string()),
        ..Default::default()
    });
    let error = service
        .recommend_at(&inverted, reference())
        .await
        .expect_err("must fail");
    assert!(matches!(error, AppError::Validation { .. }));

    assert_eq!(backend_mock.hits_async().await, 0);
}
