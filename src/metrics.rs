use crate::models::{DailyActivity, Mood, ProgressRings, WeeklyGoals, WorkoutType};
use chrono::{Datelike, Local, NaiveDate};
use serde::Serialize;

pub const CHART_WINDOW: usize = 14;
pub const DAILY_STEP_TARGET: f64 = 10_000.0;
const FALLBACK_MOVE_KCAL: f64 = 1000.0;

pub fn age(birth_date: NaiveDate) -> i32 {
    age_at(birth_date, Local::now().date_naive())
}

/// Whole calendar years between `birth_date` and `reference`.
pub fn age_at(birth_date: NaiveDate, reference: NaiveDate) -> i32 {
    let mut years = reference.year() - birth_date.year();
    if (reference.month(), reference.day()) < (birth_date.month(), birth_date.day()) {
        years -= 1;
    }
    years
}

/// Last recorded activity, or a zeroed record when nothing has been logged.
/// The weight falls back to `base_weight` either way, including a logged
/// weight of zero.
pub fn latest_snapshot(activities: &[DailyActivity], base_weight: f64) -> DailyActivity {
    match activities.last() {
        Some(last) => DailyActivity {
            weight: Some(logged_weight(last).unwrap_or(base_weight)),
            ..last.clone()
        },
        None => DailyActivity {
            id: String::new(),
            date: NaiveDate::default(),
            sleep_hours: 0.0,
            resting_heart_rate: 0,
            max_heart_rate: 0,
            avg_exercise_heart_rate: 0,
            active_calories: 0,
            exercise_minutes: 0,
            stand_hours: 0,
            steps: 0,
            workout_type: WorkoutType::Running,
            mood: Mood::Good,
            weight: Some(base_weight),
        },
    }
}

pub fn current_weight(activities: &[DailyActivity], base_weight: f64) -> f64 {
    activities
        .last()
        .and_then(logged_weight)
        .unwrap_or(base_weight)
}

fn logged_weight(activity: &DailyActivity) -> Option<f64> {
    activity.weight.filter(|weight| *weight > 0.0)
}

pub fn progress_rings(latest: &DailyActivity, goals: &WeeklyGoals) -> ProgressRings {
    let move_goal = if goals.move_kcal > 0.0 {
        goals.move_kcal
    } else {
        FALLBACK_MOVE_KCAL
    };
    ProgressRings {
        move_pct: percent(f64::from(latest.active_calories), move_goal),
        exercise_pct: percent(f64::from(latest.exercise_minutes), nonzero(goals.exercise_min)),
        stand_pct: percent(f64::from(latest.stand_hours), nonzero(goals.stand_hours)),
    }
}

pub fn steps_percent(latest: &DailyActivity) -> f64 {
    percent(f64::from(latest.steps), DAILY_STEP_TARGET)
}

fn nonzero(goal: f64) -> f64 {
    if goal > 0.0 { goal } else { 1.0 }
}

fn percent(value: f64, goal: f64) -> f64 {
    (value / goal * 100.0).min(100.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartMetric {
    Calories,
    Sleep,
    HeartRate,
    Weight,
    Steps,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChartPoint {
    pub date: String,
    pub value: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Charts {
    pub calories: Vec<ChartPoint>,
    pub sleep: Vec<ChartPoint>,
    pub heart_rate: Vec<ChartPoint>,
    pub weight: Vec<ChartPoint>,
    pub steps: Vec<ChartPoint>,
}

pub fn charts(activities: &[DailyActivity], base_weight: f64) -> Charts {
    Charts {
        calories: chart_series(activities, ChartMetric::Calories, base_weight),
        sleep: chart_series(activities, ChartMetric::Sleep, base_weight),
        heart_rate: chart_series(activities, ChartMetric::HeartRate, base_weight),
        weight: chart_series(activities, ChartMetric::Weight, base_weight),
        steps: chart_series(activities, ChartMetric::Steps, base_weight),
    }
}

/// Chart series over the most recent records, in insertion order.
pub fn chart_series(
    activities: &[DailyActivity],
    metric: ChartMetric,
    base_weight: f64,
) -> Vec<ChartPoint> {
    let start = activities.len().saturating_sub(CHART_WINDOW);
    activities[start..]
        .iter()
        .map(|activity| ChartPoint {
            date: activity.date.format("%Y-%m-%d").to_string(),
            value: match metric {
                ChartMetric::Calories => f64::from(activity.active_calories),
                ChartMetric::Sleep => activity.sleep_hours,
                ChartMetric::HeartRate => f64::from(activity.resting_heart_rate),
                ChartMetric::Weight => logged_weight(activity).unwrap_or(base_weight),
                ChartMetric::Steps => f64::from(activity.steps),
            },
        })
        .collect()
}
