use crate::i18n::Language;
use crate::metrics::Charts;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    pub name: String,
    pub email: String,
    /// Stored exactly as entered.
    pub password: String,
    pub birth_date: NaiveDate,
    pub base_weight: f64,
    pub created_at: DateTime<Utc>,
    pub language: Language,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WorkoutType {
    Badminton,
    Basketball,
    Biathlon,
    CrossCountrySkiing,
    Curling,
    Cycling,
    DownhillSkiing,
    FigureSkating,
    Football,
    Golf,
    Gym,
    Hiking,
    IceHockey,
    IceSkating,
    Kayaking,
    RockClimbing,
    Running,
    Sailing,
    SkiJumping,
    SkiTouring,
    Sledding,
    Snowboarding,
    SpeedSkating,
    Surfing,
    Swimming,
    Tennis,
    Volleyball,
    Yoga,
}

impl WorkoutType {
    pub const ALL: [WorkoutType; 28] = [
        WorkoutType::Badminton,
        WorkoutType::Basketball,
        WorkoutType::Biathlon,
        WorkoutType::CrossCountrySkiing,
        WorkoutType::Curling,
        WorkoutType::Cycling,
        WorkoutType::DownhillSkiing,
        WorkoutType::FigureSkating,
        WorkoutType::Football,
        WorkoutType::Golf,
        WorkoutType::Gym,
        WorkoutType::Hiking,
        WorkoutType::IceHockey,
        WorkoutType::IceSkating,
        WorkoutType::Kayaking,
        WorkoutType::RockClimbing,
        WorkoutType::Running,
        WorkoutType::Sailing,
        WorkoutType::SkiJumping,
        WorkoutType::SkiTouring,
        WorkoutType::Sledding,
        WorkoutType::Snowboarding,
        WorkoutType::SpeedSkating,
        WorkoutType::Surfing,
        WorkoutType::Swimming,
        WorkoutType::Tennis,
        WorkoutType::Volleyball,
        WorkoutType::Yoga,
    ];

    pub fn key(self) -> &'static str {
        match self {
            WorkoutType::Badminton => "badminton",
            WorkoutType::Basketball => "basketball",
            WorkoutType::Biathlon => "biathlon",
            WorkoutType::CrossCountrySkiing => "crossCountrySkiing",
            WorkoutType::Curling => "curling",
            WorkoutType::Cycling => "cycling",
            WorkoutType::DownhillSkiing => "downhillSkiing",
            WorkoutType::FigureSkating => "figureSkating",
            WorkoutType::Football => "football",
            WorkoutType::Golf => "golf",
            WorkoutType::Gym => "gym",
            WorkoutType::Hiking => "hiking",
            WorkoutType::IceHockey => "iceHockey",
            WorkoutType::IceSkating => "iceSkating",
            WorkoutType::Kayaking => "kayaking",
            WorkoutType::RockClimbing => "rockClimbing",
            WorkoutType::Running => "running",
            WorkoutType::Sailing => "sailing",
            WorkoutType::SkiJumping => "skiJumping",
            WorkoutType::SkiTouring => "skiTouring",
            WorkoutType::Sledding => "sledding",
            WorkoutType::Snowboarding => "snowboarding",
            WorkoutType::SpeedSkating => "speedSkating",
            WorkoutType::Surfing => "surfing",
            WorkoutType::Swimming => "swimming",
            WorkoutType::Tennis => "tennis",
            WorkoutType::Volleyball => "volleyball",
            WorkoutType::Yoga => "yoga",
        }
    }
}

/// Stored under the Czech labels existing histories were written with. The
/// English keys are accepted on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mood {
    #[serde(rename = "Skvělý", alias = "great")]
    Great,
    #[serde(rename = "Dobrý", alias = "good")]
    Good,
    #[serde(rename = "Průměrný", alias = "average")]
    Average,
    #[serde(rename = "Unavený", alias = "tired")]
    Tired,
}

impl Mood {
    pub const ALL: [Mood; 4] = [Mood::Great, Mood::Good, Mood::Average, Mood::Tired];

    pub fn key(self) -> &'static str {
        match self {
            Mood::Great => "Skvělý",
            Mood::Good => "Dobrý",
            Mood::Average => "Průměrný",
            Mood::Tired => "Unavený",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyActivity {
    pub id: String,
    pub date: NaiveDate,
    pub sleep_hours: f64,
    pub resting_heart_rate: u32,
    pub max_heart_rate: u32,
    pub avg_exercise_heart_rate: u32,
    pub active_calories: u32,
    pub exercise_minutes: u32,
    pub stand_hours: u32,
    pub steps: u32,
    pub workout_type: WorkoutType,
    pub mood: Mood,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyGoals {
    pub move_kcal: f64,
    pub exercise_min: f64,
    pub stand_hours: f64,
    pub reasoning: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Success,
    Warning,
    Info,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiInsight {
    pub title: String,
    pub content: String,
    #[serde(rename = "type")]
    pub kind: InsightKind,
}

/// Per-account persisted bundle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountData {
    #[serde(default, deserialize_with = "readable_activities")]
    pub activities: Vec<DailyActivity>,
    #[serde(default)]
    pub weekly_goals: Option<WeeklyGoals>,
}

/// Keeps every record that parses. A record that does not is logged and
/// skipped so the rest of the history survives the next write-through.
fn readable_activities<'de, D>(deserializer: D) -> Result<Vec<DailyActivity>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(raw
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value(value) {
            Ok(activity) => Some(activity),
            Err(err) => {
                warn!(index, "skipping unreadable activity record: {err}");
                None
            }
        })
        .collect())
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub language: Option<Language>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
    #[serde(default = "default_birth_date")]
    pub birth_date: NaiveDate,
    #[serde(default = "default_base_weight")]
    pub base_weight: f64,
    #[serde(default = "default_register_language")]
    pub language: Language,
}

fn default_birth_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1995, 1, 1).unwrap_or_default()
}

fn default_base_weight() -> f64 {
    75.0
}

fn default_register_language() -> Language {
    Language::Cs
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub base_weight: Option<f64>,
    pub language: Option<Language>,
}

/// A new activity entry. The required fields come from the form; the rest
/// fall back to the form's in-progress defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityForm {
    pub date: NaiveDate,
    pub workout_type: WorkoutType,
    pub steps: u32,
    pub sleep_hours: f64,
    pub active_calories: u32,
    pub resting_heart_rate: Option<u32>,
    pub max_heart_rate: Option<u32>,
    pub avg_exercise_heart_rate: Option<u32>,
    pub exercise_minutes: Option<u32>,
    pub stand_hours: Option<u32>,
    pub mood: Option<Mood>,
    pub weight: Option<f64>,
}

impl ActivityForm {
    pub fn into_activity(self, id: String, base_weight: f64) -> DailyActivity {
        DailyActivity {
            id,
            date: self.date,
            sleep_hours: self.sleep_hours,
            resting_heart_rate: self.resting_heart_rate.unwrap_or(60),
            max_heart_rate: self.max_heart_rate.unwrap_or(160),
            avg_exercise_heart_rate: self.avg_exercise_heart_rate.unwrap_or(140),
            active_calories: self.active_calories,
            exercise_minutes: self.exercise_minutes.unwrap_or(60),
            stand_hours: self.stand_hours.unwrap_or(12),
            steps: self.steps,
            workout_type: self.workout_type,
            mood: self.mood.unwrap_or(Mood::Good),
            weight: Some(self.weight.unwrap_or(base_weight)),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountView {
    pub id: String,
    pub name: String,
    pub email: String,
    pub birth_date: NaiveDate,
    pub base_weight: f64,
    pub created_at: DateTime<Utc>,
    pub language: Language,
}

impl From<&Account> for AccountView {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id.clone(),
            name: account.name.clone(),
            email: account.email.clone(),
            birth_date: account.birth_date,
            base_weight: account.base_weight,
            created_at: account.created_at,
            language: account.language,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Notice {
    RateLimited,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRings {
    pub move_pct: f64,
    pub exercise_pct: f64,
    pub stand_pct: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub account: AccountView,
    pub age: i32,
    pub latest: DailyActivity,
    pub activities: Vec<DailyActivity>,
    pub weekly_goals: Option<WeeklyGoals>,
    pub rings: Option<ProgressRings>,
    pub steps_ring_pct: f64,
    pub charts: Charts,
    pub insights: Vec<AiInsight>,
    pub analyzing: bool,
    pub generating_goals: bool,
    pub notice: Option<Notice>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StateView {
    LoggedOut { authenticating: bool },
    Active(Box<DashboardView>),
}
