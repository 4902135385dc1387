use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExpertiseLevel {
    Beginner,
    #[default]
    Intermediate,
    Expert,
    Master,
}

impl ExpertiseLevel {
    pub fn rank(self) -> u32 {
        match self {
            ExpertiseLevel::Beginner => 1,
            ExpertiseLevel::Intermediate => 2,
            ExpertiseLevel::Expert => 3,
            ExpertiseLevel::Master => 4,
        }
    }

    /// Years of total experience the level roughly demands.
    pub fn required_years(self) -> u32 {
        match self {
            ExpertiseLevel::Beginner => 1,
            ExpertiseLevel::Intermediate => 3,
            ExpertiseLevel::Expert => 6,
            ExpertiseLevel::Master => 10,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionFormat {
    #[default]
    OneOnOne,
    Group,
    Workshop,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SkillRequirement {
    pub name: String,
    #[serde(default)]
    pub level: ExpertiseLevel,
    #[serde(default = "default_skill_weight")]
    pub weight: f64,
    #[serde(default)]
    pub mandatory: bool,
}

fn default_skill_weight() -> f64 {
    1.0
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct BudgetConstraint {
    #[serde(default)]
    pub max_hourly_rate: Option<f64>,
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_currency() -> String {
    "USD".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityRequirement {
    /// Weekday indexes, 0 = Monday .. 6 = Sunday.
    #[serde(default)]
    pub days_of_week: Vec<u8>,
    /// 0.0 (rigid) .. 1.0 (fully flexible).
    #[serde(default)]
    pub flexibility: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MatchingRequest {
    pub request_id: String,
    #[serde(default)]
    pub program_id: Option<String>,
    #[serde(default)]
    pub session_format: SessionFormat,
    #[serde(default)]
    pub skills_required: Vec<SkillRequirement>,
    #[serde(default)]
    pub experience_level: ExpertiseLevel,
    #[serde(default)]
    pub budget: BudgetConstraint,
    #[serde(default)]
    pub availability: AvailabilityRequirement,
    #[serde(default = "default_languages")]
    pub preferred_languages: Vec<String>,
    #[serde(default = "default_participants")]
    pub participants_count: u32,
}

fn default_languages() -> Vec<String> {
    vec!["English".to_string()]
}

fn default_participants() -> u32 {
    1
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CoachSkill {
    pub name: String,
    #[serde(default)]
    pub level: ExpertiseLevel,
    #[serde(default)]
    pub years_experience: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CoachProfile {
    pub coach_id: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub skills: Vec<CoachSkill>,
    #[serde(default)]
    pub total_experience_years: u32,
    /// Weekday indexes the coach works, 0 = Monday .. 6 = Sunday.
    #[serde(default)]
    pub available_days: Vec<u8>,
    #[serde(default)]
    pub hourly_rate: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub total_sessions: u32,
    #[serde(default)]
    pub success_rate: f64,
    #[serde(default = "default_languages")]
    pub languages: Vec<String>,
    #[serde(default = "default_participants")]
    pub max_participants: u32,
    #[serde(default = "default_formats")]
    pub session_formats: Vec<SessionFormat>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default = "default_true")]
    pub can_accept_new_clients: bool,
}

fn default_formats() -> Vec<SessionFormat> {
    vec![SessionFormat::OneOnOne]
}

fn default_true() -> bool {
    true
}

impl CoachProfile {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    pub fn find_skill(&self, name: &str) -> Option<&CoachSkill> {
        self.skills
            .iter()
            .find(|skill| skill.name.eq_ignore_ascii_case(name))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub coach_id: String,
    pub coach_name: String,
    /// Overall weighted score in [0.0, 1.0].
    pub match_score: f64,
    pub skill_score: f64,
    pub experience_score: f64,
    pub availability_score: f64,
    pub price_score: f64,
    pub rating_score: f64,
    pub matching_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub recommendation_reason: String,
    pub confidence_level: f64,
}
