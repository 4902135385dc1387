use chrono::{DateTime, Datelike, FixedOffset, Utc};

use crate::error::AppResult;
use crate::models::availability::{weekday_index, ProgramConstraints};
use crate::models::recommendation::{
    AvailabilityLevel, PreferredTimeFrames, ProgramFitLevel, RecommendationRequest,
    ScheduleRecommendation, TimeSlot, Urgency,
};
use crate::services::schedule_utils;

const WEIGHT_TIME_PREFERENCE: f64 = 0.30;
const WEIGHT_COACH_AVAILABILITY: f64 = 0.25;
const WEIGHT_PROGRAM_FIT: f64 = 0.20;
const WEIGHT_URGENCY: f64 = 0.15;
const WEIGHT_CONFLICT_AVOIDANCE: f64 = 0.10;

/// Sub-scores above this threshold contribute a reasoning string.
const REASONING_THRESHOLD: i64 = 80;

/// Placeholder signal until workload-aware weighting lands.
const COACH_AVAILABILITY_SCORE: i64 = 85;
/// Conservative baseline for frequency/duration alignment.
const PROGRAM_FIT_BASE: i64 = 70;
/// Every slot reaching the scorer already cleared conflict detection.
const CONFLICT_AVOIDANCE_SCORE: i64 = 100;

/// Scores one conflict-free slot against the caller's preferences. Pure in
/// the slot, the request, and the injected reference instant, so identical
/// inputs always produce identical output.
pub fn score_available_slot(
    slot: TimeSlot,
    request: &RecommendationRequest,
    constraints: &ProgramConstraints,
    reference: DateTime<Utc>,
) -> AppResult<ScheduleRecommendation> {
    let start = schedule_utils::parse_datetime(&slot.start_at)?;

    let time_preference = time_preference_score(start, request.preferred_time_frames.as_ref());
    let coach_availability = COACH_AVAILABILITY_SCORE;
    let program_fit = program_fit_score(constraints);
    let urgency = urgency_score(request.urgency, schedule_utils::hours_until(reference, start));
    let conflict_avoidance = CONFLICT_AVOIDANCE_SCORE;

    let total = (time_preference as f64) * WEIGHT_TIME_PREFERENCE
        + (coach_availability as f64) * WEIGHT_COACH_AVAILABILITY
        + (program_fit as f64) * WEIGHT_PROGRAM_FIT
        + (urgency as f64) * WEIGHT_URGENCY
        + (conflict_avoidance as f64) * WEIGHT_CONFLICT_AVOIDANCE;
    let score = (total.round() as i64).clamp(0, 100);

    let mut reasoning = Vec::new();
    if time_preference > REASONING_THRESHOLD {
        reasoning.push("Matches preferred time frame".to_string());
    }
    if coach_availability > REASONING_THRESHOLD {
        reasoning.push("Coach has high availability".to_string());
    }
    if program_fit > REASONING_THRESHOLD {
        reasoning.push("Aligns well with program constraints".to_string());
    }
    if urgency > REASONING_THRESHOLD {
        reasoning.push("Meets urgency requirements".to_string());
    }
    if conflict_avoidance > REASONING_THRESHOLD {
        reasoning.push("No scheduling conflicts".to_string());
    }

    Ok(ScheduleRecommendation {
        slot,
        score,
        reasoning,
        coach_availability: availability_level(coach_availability),
        program_fit: program_fit_level(program_fit),
        urgency: request.urgency,
    })
}

/// Base 50; +30 for a preferred weekday, +20 for a preferred start hour,
/// capped at 100. A caller with no preference at all scores a neutral 70.
fn time_preference_score(start: DateTime<FixedOffset>, frames: Option<&PreferredTimeFrames>) -> i64 {
    let frames = match frames {
        Some(frames) if !frames.is_neutral() => frames,
        _ => return 70,
    };

    let mut score = 50;
    if frames
        .preferred_days
        .contains(&weekday_index(start.weekday()))
    {
        score += 30;
    }
    if let Some(hours) = &frames.preferred_hours {
        let hour = schedule_utils::start_hour(start);
        if hour >= hours.start && hour < hours.end {
            score += 20;
        }
    }
    score.min(100)
}

fn program_fit_score(_constraints: &ProgramConstraints) -> i64 {
    PROGRAM_FIT_BASE
}

fn urgency_score(urgency: Urgency, hours_away: i64) -> i64 {
    match urgency {
        Urgency::Immediate => {
            if hours_away <= 24 {
                100
            } else {
                (100 - 2 * hours_away).max(0)
            }
        }
        Urgency::Soon => {
            if hours_away <= 72 {
                90
            } else {
                (90 - hours_away).max(0)
            }
        }
        Urgency::Flexible => 70,
    }
}

fn availability_level(score: i64) -> AvailabilityLevel {
    if score >= 80 {
        AvailabilityLevel::High
    } else if score >= 60 {
        AvailabilityLevel::Medium
    } else {
        AvailabilityLevel::Low
    }
}

fn program_fit_level(score: i64) -> ProgramFitLevel {
    if score >= 85 {
        ProgramFitLevel::Excellent
    } else if score >= 70 {
        ProgramFitLevel::Good
    } else {
        ProgramFitLevel::Fair
    }
}
