use crate::errors::AppError;
use crate::i18n::{
    Language, SelectOption, Translations, language_options, mood_options, translations,
    workout_options,
};
use crate::models::{
    ActivityForm, DailyActivity, LoginRequest, ProfileUpdate, RegisterRequest, StateView,
};
use crate::orchestrator::CycleOutcome;
use crate::state::AppState;
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub outcome: CycleOutcome,
    pub state: StateView,
}

#[derive(Debug, Deserialize)]
pub struct OptionsQuery {
    pub lang: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionsResponse {
    pub language: Language,
    pub fully_translated: bool,
    pub workouts: Vec<SelectOption>,
    pub moods: Vec<SelectOption>,
    pub languages: Vec<SelectOption>,
    pub translations: &'static Translations,
}

pub async fn get_state(State(state): State<AppState>) -> Json<StateView> {
    Json(state.view().await)
}

pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<StateView>), AppError> {
    let view = state.register(payload).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<StateView>, AppError> {
    Ok(Json(state.login(payload).await?))
}

pub async fn logout(State(state): State<AppState>) -> Result<Json<StateView>, AppError> {
    Ok(Json(state.logout().await?))
}

pub async fn update_profile(
    State(state): State<AppState>,
    Json(payload): Json<ProfileUpdate>,
) -> Result<Json<StateView>, AppError> {
    Ok(Json(state.update_profile(payload).await?))
}

pub async fn record_activity(
    State(state): State<AppState>,
    Json(payload): Json<ActivityForm>,
) -> Result<(StatusCode, Json<DailyActivity>), AppError> {
    let activity = state.record_activity(payload).await?;
    Ok((StatusCode::CREATED, Json(activity)))
}

pub async fn analyze(State(state): State<AppState>) -> Result<Json<AnalyzeResponse>, AppError> {
    if state.data.lock().await.current_email.is_none() {
        return Err(AppError::unauthorized("not logged in"));
    }
    let outcome = state.generate().await;
    Ok(Json(AnalyzeResponse {
        outcome,
        state: state.view().await,
    }))
}

pub async fn get_options(Query(query): Query<OptionsQuery>) -> Json<OptionsResponse> {
    let language = query
        .lang
        .as_deref()
        .and_then(Language::parse)
        .unwrap_or(Language::DEFAULT);

    Json(OptionsResponse {
        language,
        fully_translated: crate::i18n::is_fully_translated(language),
        workouts: workout_options(language),
        moods: mood_options(language),
        languages: language_options(),
        translations: translations(language),
    })
}
