use std::sync::Arc;
use std::time::Instant;

use tracing::{info, warn};

use crate::config::MatchingDefaults;
use crate::error::AppResult;
use crate::models::matching::{CoachProfile, MatchResult, MatchingRequest};
use crate::services::backend_api::SchedulingBackend;

/// Coach-to-request matcher: hard filters first, then a weighted score over
/// skills, experience, rating, availability and price. Sub-scores live in
/// [0.0, 1.0].
pub struct CoachMatchingService {
    backend: Arc<dyn SchedulingBackend>,
    defaults: MatchingDefaults,
}

impl CoachMatchingService {
    pub fn new(backend: Arc<dyn SchedulingBackend>, defaults: MatchingDefaults) -> Self {
        Self { backend, defaults }
    }

    pub async fn find_matches(&self, request: &MatchingRequest) -> AppResult<Vec<MatchResult>> {
        let started = Instant::now();

        let coaches = match self.backend.fetch_coaches().await {
            Ok(coaches) => coaches,
            Err(error) => {
                warn!(
                    target: "app::matching",
                    request_id = %request.request_id,
                    error = %error,
                    "coach roster lookup failed, matching against empty roster"
                );
                Vec::new()
            }
        };
        let roster_size = coaches.len();

        let weights = self.defaults.weights.normalized();
        let mut results: Vec<MatchResult> = coaches
            .into_iter()
            .filter(|coach| passes_hard_filters(coach, request))
            .map(|coach| score_coach(&coach, request, &weights))
            .filter(|result| result.match_score >= self.defaults.min_match_score)
            .collect();

        results.sort_by(|a, b| {
            b.match_score
                .partial_cmp(&a.match_score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.coach_id.cmp(&b.coach_id))
        });
        results.truncate(self.defaults.max_matches);

        info!(
            target: "app::matching",
            request_id = %request.request_id,
            roster = roster_size,
            matches = results.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "matching run completed"
        );

        Ok(results)
    }
}

fn passes_hard_filters(coach: &CoachProfile, request: &MatchingRequest) -> bool {
    if !coach.is_active || !coach.can_accept_new_clients {
        return false;
    }
    if !coach.session_formats.contains(&request.session_format) {
        return false;
    }
    if let Some(max_rate) = request.budget.max_hourly_rate {
        if coach.hourly_rate > max_rate {
            return false;
        }
    }
    if coach.max_participants < request.participants_count {
        return false;
    }
    if !request
        .preferred_languages
        .iter()
        .any(|language| coach.languages.contains(language))
    {
        return false;
    }
    if !request.availability.days_of_week.is_empty()
        && !request
            .availability
            .days_of_week
            .iter()
            .any(|day| coach.available_days.contains(day))
    {
        return false;
    }
    true
}

fn score_coach(
    coach: &CoachProfile,
    request: &MatchingRequest,
    weights: &crate::config::MatchingWeights,
) -> MatchResult {
    let skill_score = skill_score(coach, request);
    let experience_score = experience_score(coach, request);
    let availability_score = availability_score(coach, request);
    let price_score = price_score(coach, request);
    let rating_score = rating_score(coach);

    let match_score = (skill_score * weights.skills
        + experience_score * weights.experience
        + rating_score * weights.rating
        + availability_score * weights.availability
        + price_score * weights.price)
        .min(1.0);

    let matching_skills: Vec<String> = request
        .skills_required
        .iter()
        .filter(|required| coach.find_skill(&required.name).is_some())
        .map(|required| required.name.clone())
        .collect();
    let missing_skills: Vec<String> = request
        .skills_required
        .iter()
        .filter(|required| coach.find_skill(&required.name).is_none())
        .map(|required| required.name.clone())
        .collect();

    MatchResult {
        coach_id: coach.coach_id.clone(),
        coach_name: coach.display_name(),
        match_score,
        skill_score,
        experience_score,
        availability_score,
        price_score,
        rating_score,
        matching_skills,
        missing_skills,
        recommendation_reason: recommendation_reason(coach, skill_score, experience_score, rating_score),
        confidence_level: confidence_level(coach, skill_score, experience_score, availability_score),
    }
}

fn skill_score(coach: &CoachProfile, request: &MatchingRequest) -> f64 {
    if request.skills_required.is_empty() {
        return 0.5;
    }
    let total_weight: f64 = request.skills_required.iter().map(|skill| skill.weight).sum();
    if total_weight <= 0.0 {
        return 0.5;
    }

    let mut score = 0.0;
    for required in &request.skills_required {
        match coach.find_skill(&required.name) {
            Some(coach_skill) => {
                let level_score = if coach_skill.level.rank() >= required.level.rank() {
                    1.0
                } else {
                    coach_skill.level.rank() as f64 / required.level.rank() as f64
                };
                let experience_bonus = (coach_skill.years_experience as f64 / 5.0).min(0.2);
                score += (level_score + experience_bonus).min(1.0) * required.weight;
            }
            None if required.mandatory => {
                score -= 0.5 * required.weight;
            }
            None => {}
        }
    }

    (score / total_weight).max(0.0)
}

fn experience_score(coach: &CoachProfile, request: &MatchingRequest) -> f64 {
    let required_years = request.experience_level.required_years();
    if coach.total_experience_years >= required_years {
        1.0
    } else {
        coach.total_experience_years as f64 / required_years as f64
    }
}

fn availability_score(coach: &CoachProfile, request: &MatchingRequest) -> f64 {
    let requested = &request.availability.days_of_week;
    if requested.is_empty() || coach.available_days.is_empty() {
        return 0.5;
    }

    let overlap = requested
        .iter()
        .filter(|day| coach.available_days.contains(day))
        .count();
    if overlap == 0 {
        return 0.0;
    }

    let overlap_ratio = overlap as f64 / requested.len() as f64;
    let flexibility_bonus = request.availability.flexibility * 0.2;
    (overlap_ratio + flexibility_bonus).min(1.0)
}

fn price_score(coach: &CoachProfile, request: &MatchingRequest) -> f64 {
    let max_rate = match request.budget.max_hourly_rate {
        Some(rate) => rate,
        None => return 0.5,
    };

    if coach.hourly_rate <= max_rate {
        if coach.hourly_rate <= max_rate * 0.8 {
            1.0
        } else {
            0.8
        }
    } else {
        let overage_ratio = (coach.hourly_rate - max_rate) / max_rate;
        (0.5 - overage_ratio).max(0.0)
    }
}

fn rating_score(coach: &CoachProfile) -> f64 {
    if coach.rating == 0.0 {
        return 0.5;
    }
    let base = coach.rating / 5.0;
    let session_bonus = (coach.total_sessions as f64 / 100.0).min(0.2);
    let success_bonus = coach.success_rate * 0.1;
    (base + session_bonus + success_bonus).min(1.0)
}

fn recommendation_reason(
    coach: &CoachProfile,
    skill_score: f64,
    experience_score: f64,
    rating_score: f64,
) -> String {
    let mut reasons = Vec::new();
    if skill_score > 0.8 {
        reasons.push("excellent skill match");
    } else if skill_score > 0.6 {
        reasons.push("good skill alignment");
    }
    if experience_score > 0.8 {
        reasons.push("extensive experience");
    }
    if rating_score > 0.8 {
        reasons.push("highly rated");
    }
    if coach.total_sessions > 50 {
        reasons.push("proven track record");
    }
    if reasons.is_empty() {
        reasons.push("meets basic requirements");
    }
    format!("Recommended for {}", reasons.join(", "))
}

fn confidence_level(
    coach: &CoachProfile,
    skill_score: f64,
    experience_score: f64,
    availability_score: f64,
) -> f64 {
    let mut confidence = (skill_score + experience_score + availability_score) / 3.0;
    if coach.total_sessions > 20 {
        confidence += 0.1;
    }
    if coach.rating > 4.5 {
        confidence += 0.1;
    }
    confidence.min(1.0)
}
