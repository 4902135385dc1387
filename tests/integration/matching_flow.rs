use std::sync::Arc;

use httpmock::prelude::*;
use peptok_scheduling::models::matching::{
    AvailabilityRequirement, BudgetConstraint, ExpertiseLevel, MatchingRequest, SessionFormat,
    SkillRequirement,
};
use peptok_scheduling::{BackendApiClient, CoachMatchingService, EngineDefaults};
use serde_json::json;

fn service_for(server: &MockServer) -> CoachMatchingService {
    let defaults = EngineDefaults::default();
    let client =
        BackendApiClient::from_defaults(server.base_url(), &defaults).expect("backend client");
    CoachMatchingService::new(Arc::new(client), defaults.matching)
}

fn request() -> MatchingRequest {
    MatchingRequest {
        request_id: "req-1".to_string(),
        program_id: Some("program-1".to_string()),
        session_format: SessionFormat::OneOnOne,
        skills_required: vec![SkillRequirement {
            name: "Leadership".to_string(),
            level: ExpertiseLevel::Expert,
            weight: 1.0,
            mandatory: false,
        }],
        experience_level: ExpertiseLevel::Expert,
        budget: BudgetConstraint {
            max_hourly_rate: Some(180.0),
            currency: "USD".to_string(),
        },
        availability: AvailabilityRequirement {
            days_of_week: vec![0, 2],
            flexibility: 0.5,
        },
        preferred_languages: vec!["English".to_string()],
        participants_count: 1,
    }
}

fn roster_body() -> serde_json::Value {
    json!({
        "data": [
            {
                "coachId": "coach-1",
                "firstName": "Sarah",
                "lastName": "Johnson",
                "skills": [
                    {"name": "Leadership", "level": "expert", "yearsExperience": 6}
                ],
                "totalExperienceYears": 8,
                "availableDays": [0, 2],
                "hourlyRate": 150.0,
                "rating": 4.8,
                "totalSessions": 127,
                "successRate": 0.91,
                "languages": ["English", "Spanish"],
                "maxParticipants": 5,
                "sessionFormats": ["one_on_one", "group"]
            },
            {
                "coachId": "coach-2",
                "firstName": "Michael",
                "lastName": "Chen",
                "skills": [
                    {"name": "Product Strategy", "level": "expert", "yearsExperience": 7}
                ],
                "totalExperienceYears": 10,
                "availableDays": [1],
                "hourlyRate": 320.0,
                "rating": 4.9,
                "totalSessions": 89,
                "successRate": 0.94,
                "languages": ["English", "Mandarin"],
                "maxParticipants": 10,
                "sessionFormats": ["group", "workshop"]
            }
        ]
    })
}

#[tokio::test]
async fn matching_filters_scores_and_ranks_the_roster() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/coaches");
            then.status(200).json_body(roster_body());
        })
        .await;

    let service = service_for(&server);
    let matches = service.find_matches(&request()).await.expect("matches");

    // coach-2 fails the budget, format and day filters
    assert_eq!(matches.len(), 1);
    let top = &matches[0];
    assert_eq!(top.coach_id, "coach-1");
    assert_eq!(top.coach_name, "Sarah Johnson");
    assert!(top.match_score >= 0.6 && top.match_score <= 1.0);
    assert_eq!(top.matching_skills, vec!["Leadership".to_string()]);
    assert!(top.missing_skills.is_empty());
    assert!(top.recommendation_reason.starts_with("Recommended for"));
    assert!(top.confidence_level > 0.8);
}

#[tokio::test]
async fn roster_outage_yields_an_empty_match_list() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/coaches");
            then.status(503).json_body(json!({"error": "unavailable"}));
        })
        .await;

    let service = service_for(&server);
    let matches = service.find_matches(&request()).await.expect("degraded");
    assert!(matches.is_empty());
}

#[tokio::test]
async fn low_scoring_coaches_fall_below_the_floor() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/coaches");
            then.status(200).json_body(json!({
                "data": [{
                    "coachId": "coach-3",
                    "firstName": "New",
                    "lastName": "Coach",
                    "skills": [],
                    "totalExperienceYears": 0,
                    "availableDays": [0],
                    "hourlyRate": 100.0,
                    "rating": 0.0,
                    "totalSessions": 0,
                    "successRate": 0.0,
                    "languages": ["English"],
                    "maxParticipants": 1,
                    "sessionFormats": ["one_on_one"]
                }]
            }));
        })
        .await;

    let service = service_for(&server);
    let matches = service.find_matches(&request()).await.expect("matches");
    assert!(matches.is_empty());
}
