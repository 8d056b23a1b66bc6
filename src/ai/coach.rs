use super::model::{GenerativeModel, ModelRequest};
use super::retry::{RetryPolicy, with_rate_limit_retry};
use crate::i18n::Language;
use crate::models::{AiInsight, DailyActivity, WeeklyGoals};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{error, info};

pub const DEFAULT_MODEL: &str = "gemini-3-pro-preview";

/// Goals below this many active kcal per day are raised to it.
pub const MIN_MOVE_KCAL: f64 = 1000.0;

const INSIGHT_HISTORY: usize = 10;
const GOALS_HISTORY: usize = 14;
const INSIGHT_THINKING_BUDGET: u32 = 4000;
const GOALS_THINKING_BUDGET: u32 = 2000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CoachError {
    #[error("AI service is still rate limited after retrying")]
    RateLimited,
}

/// Turns activity history into model requests and validates the replies.
///
/// Both operations resolve to `Ok(None)` when there is nothing to show:
/// empty history, a malformed reply or any failure other than an exhausted
/// rate limit. Nothing is cached; every call reaches the model.
pub struct Coach {
    model: Arc<dyn GenerativeModel>,
    model_name: String,
    retry: RetryPolicy,
}

impl Coach {
    pub fn new(model: Arc<dyn GenerativeModel>, model_name: impl Into<String>) -> Self {
        Self {
            model,
            model_name: model_name.into(),
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub async fn health_insights(
        &self,
        activities: &[DailyActivity],
        age: i32,
        language: Language,
    ) -> Result<Option<Vec<AiInsight>>, CoachError> {
        if activities.is_empty() {
            return Ok(None);
        }
        let Some(history) = recent_json(activities, INSIGHT_HISTORY) else {
            return Ok(None);
        };

        let system_instruction = format!(
            "You are an elite sports physiologist and uncompromising fitness specialist. \
             Analyze smartwatch activity data. Be strict, direct and demand discipline. \
             Look for patterns between fatigue, heart rate and movement intensity. \
             ALL RESPONSES MUST BE IN {}.",
            language.english_name()
        );
        let prompt = format!(
            "Analyze the activity history: {history}\n\
             User age: {age}.\n\n\
             Provide 3 highly professional, critical yet motivating insights.\n\
             Focus on:\n\
             1. Cardiovascular efficiency.\n\
             2. Recovery quality.\n\
             3. Discipline and stagnation signs."
        );

        let request = ModelRequest {
            model: self.model_name.clone(),
            system_instruction,
            prompt,
            response_schema: insights_schema(),
            thinking_budget: Some(INSIGHT_THINKING_BUDGET),
        };
        self.request_json("health insights", &request).await
    }

    pub async fn weekly_goal_recommendations(
        &self,
        activities: &[DailyActivity],
        age: i32,
        current_weight: f64,
        language: Language,
    ) -> Result<Option<WeeklyGoals>, CoachError> {
        if activities.is_empty() {
            return Ok(None);
        }
        let Some(history) = recent_json(activities, GOALS_HISTORY) else {
            return Ok(None);
        };

        let system_instruction = format!(
            "You are an elite, strict conditioning coach. Your standard for an active life \
             is AT LEAST {MIN_MOVE_KCAL} active calories per day. Demand excellence. \
             ALL RESPONSES MUST BE IN {}.",
            language.english_name()
        );
        let prompt = format!(
            "14-day history: {history}\n\
             Profile: {age} years old, {current_weight} kg.\n\n\
             Suggest goals for next week.\n\
             CRITICAL RULE: 'moveKcal' MUST NOT be below {MIN_MOVE_KCAL} kcal/day.\n\
             Explain the reasoning professionally and strictly."
        );

        let request = ModelRequest {
            model: self.model_name.clone(),
            system_instruction,
            prompt,
            response_schema: goals_schema(),
            thinking_budget: Some(GOALS_THINKING_BUDGET),
        };
        let goals: Option<WeeklyGoals> = self.request_json("weekly goals", &request).await?;
        Ok(goals.map(enforce_move_floor))
    }

    async fn request_json<T: DeserializeOwned>(
        &self,
        operation: &str,
        request: &ModelRequest,
    ) -> Result<Option<T>, CoachError> {
        let reply =
            with_rate_limit_retry(&self.retry, operation, || self.model.generate(request)).await;

        match reply {
            Ok(text) => match serde_json::from_str::<T>(&text) {
                Ok(value) => {
                    info!(operation, "model reply accepted");
                    Ok(Some(value))
                }
                Err(err) => {
                    error!(operation, "model reply does not match schema: {err}");
                    Ok(None)
                }
            },
            Err(err) if err.is_rate_limit() => {
                error!(operation, "{err}");
                Err(CoachError::RateLimited)
            }
            Err(err) => {
                error!(operation, "{err}");
                Ok(None)
            }
        }
    }
}

fn enforce_move_floor(mut goals: WeeklyGoals) -> WeeklyGoals {
    if goals.move_kcal < MIN_MOVE_KCAL {
        goals.move_kcal = MIN_MOVE_KCAL;
    }
    goals
}

fn recent_json(activities: &[DailyActivity], count: usize) -> Option<String> {
    let start = activities.len().saturating_sub(count);
    match serde_json::to_string(&activities[start..]) {
        Ok(json) => Some(json),
        Err(err) => {
            error!("failed to serialize activity history: {err}");
            None
        }
    }
}

fn insights_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "title": { "type": "STRING" },
                "content": { "type": "STRING" },
                "type": { "type": "STRING", "enum": ["success", "warning", "info"] }
            },
            "required": ["title", "content", "type"]
        }
    })
}

fn goals_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "moveKcal": { "type": "NUMBER" },
            "exerciseMin": { "type": "NUMBER" },
            "standHours": { "type": "NUMBER" },
            "reasoning": { "type": "STRING" }
        },
        "required": ["moveKcal", "exerciseMin", "standHours", "reasoning"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::AiError;
    use crate::ai::testing::ScriptedModel;
    use crate::models::{InsightKind, Mood, WorkoutType};
    use chrono::NaiveDate;
    use std::time::Duration;
    use tokio::time::Instant;

    fn history(len: u32) -> Vec<DailyActivity> {
        (0..len)
            .map(|i| DailyActivity {
                id: format!("rec-{i}"),
                date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap() + chrono::Duration::days(i as i64),
                sleep_hours: 7.0,
                resting_heart_rate: 55,
                max_heart_rate: 175,
                avg_exercise_heart_rate: 140,
                active_calories: 900,
                exercise_minutes: 45,
                stand_hours: 11,
                steps: 9000 + i,
                workout_type: WorkoutType::Cycling,
                mood: Mood::Good,
                weight: None,
            })
            .collect()
    }

    fn goals_reply(move_kcal: f64) -> Result<String, AiError> {
        Ok(json!({
            "moveKcal": move_kcal,
            "exerciseMin": 60,
            "standHours": 12,
            "reasoning": "More."
        })
        .to_string())
    }

    fn rate_limited() -> Result<String, AiError> {
        Err(AiError::RateLimited("429 Too Many Requests".to_string()))
    }

    fn coach(model: Arc<ScriptedModel>) -> Coach {
        Coach::new(model, "gemini-test")
    }

    #[tokio::test]
    async fn empty_history_makes_no_request() {
        let model = ScriptedModel::new(vec![]);
        let coach = coach(model.clone());
        assert_eq!(coach.health_insights(&[], 30, Language::En).await, Ok(None));
        assert_eq!(
            coach
                .weekly_goal_recommendations(&[], 30, 70.0, Language::En)
                .await,
            Ok(None)
        );
        assert!(model.requests().is_empty());
    }

    #[tokio::test]
    async fn insights_parse_and_use_last_ten_records() {
        let reply = json!([
            { "title": "Heart", "content": "Resting HR is stable.", "type": "success" },
            { "title": "Sleep", "content": "Sleep more.", "type": "warning" }
        ])
        .to_string();
        let model = ScriptedModel::new(vec![Ok(reply)]);
        let coach = coach(model.clone());

        let insights = coach
            .health_insights(&history(12), 41, Language::Cs)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(insights.len(), 2);
        assert_eq!(insights[1].kind, InsightKind::Warning);

        let requests = model.requests();
        let request = &requests[0].0;
        assert_eq!(request.model, "gemini-test");
        assert!(request.system_instruction.contains("MUST BE IN Czech"));
        assert!(request.prompt.contains("User age: 41"));
        assert!(request.prompt.contains("rec-2"));
        assert!(!request.prompt.contains("\"rec-1\""));
        assert!(request.prompt.contains("rec-11"));
        assert_eq!(request.response_schema["type"], "ARRAY");
        assert_eq!(request.thinking_budget, Some(INSIGHT_THINKING_BUDGET));
    }

    #[tokio::test]
    async fn schema_mismatch_is_no_result() {
        let model = ScriptedModel::new(vec![Ok(r#"{"title":"not an array"}"#.to_string())]);
        let coach = coach(model);
        assert_eq!(
            coach.health_insights(&history(3), 30, Language::En).await,
            Ok(None)
        );
    }

    #[tokio::test]
    async fn generic_failure_is_no_result() {
        let model = ScriptedModel::new(vec![Err(AiError::Api {
            status: 500,
            message: "internal".to_string(),
        })]);
        let coach = coach(model.clone());
        assert_eq!(
            coach
                .weekly_goal_recommendations(&history(3), 30, 80.0, Language::En)
                .await,
            Ok(None)
        );
        assert_eq!(model.requests().len(), 1);
    }

    #[tokio::test]
    async fn low_move_goal_is_raised_to_floor() {
        let model = ScriptedModel::new(vec![goals_reply(600.0), goals_reply(1500.0)]);
        let coach = coach(model.clone());

        let clamped = coach
            .weekly_goal_recommendations(&history(3), 30, 80.0, Language::En)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(clamped.move_kcal, 1000.0);
        assert_eq!(clamped.exercise_min, 60.0);

        let kept = coach
            .weekly_goal_recommendations(&history(3), 30, 80.0, Language::En)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(kept.move_kcal, 1500.0);
    }

    #[tokio::test]
    async fn goals_prompt_uses_last_fourteen_records_and_weight() {
        let model = ScriptedModel::new(vec![goals_reply(1200.0)]);
        let coach = coach(model.clone());
        coach
            .weekly_goal_recommendations(&history(20), 52, 88.5, Language::De)
            .await
            .unwrap();

        let request = &model.requests()[0].0;
        assert!(request.prompt.contains("52 years old, 88.5 kg"));
        assert!(request.prompt.contains("rec-6"));
        assert!(!request.prompt.contains("\"rec-5\""));
        assert!(request.system_instruction.contains("MUST BE IN German"));
        assert_eq!(request.response_schema["required"][0], "moveKcal");
    }

    #[tokio::test(start_paused = true)]
    async fn succeeds_on_third_attempt_after_backoff() {
        let model = ScriptedModel::new(vec![rate_limited(), rate_limited(), goals_reply(1100.0)]);
        let coach = coach(model.clone());

        let goals = coach
            .weekly_goal_recommendations(&history(2), 30, 70.0, Language::En)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(goals.move_kcal, 1100.0);

        let times: Vec<Instant> = model.requests().into_iter().map(|(_, at)| at).collect();
        assert_eq!(times.len(), 3);
        let first = times[1] - times[0];
        let second = times[2] - times[1];
        assert!(first >= Duration::from_millis(2000) && first < Duration::from_millis(2050));
        assert!(second >= Duration::from_millis(4000) && second < Duration::from_millis(4050));
    }

    #[tokio::test(start_paused = true)]
    async fn exhausted_rate_limit_is_surfaced() {
        let model = ScriptedModel::new(vec![rate_limited(), rate_limited(), rate_limited()]);
        let coach = coach(model.clone());
        assert_eq!(
            coach.health_insights(&history(2), 30, Language::En).await,
            Err(CoachError::RateLimited)
        );
        assert_eq!(model.requests().len(), 3);

        let model = ScriptedModel::new(vec![rate_limited(), rate_limited(), rate_limited()]);
        let coach = Coach::new(model, "gemini-test");
        assert_eq!(
            coach
                .weekly_goal_recommendations(&history(2), 30, 70.0, Language::En)
                .await,
            Err(CoachError::RateLimited)
        );
    }
}
