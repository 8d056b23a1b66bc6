use crate::accounts::save_accounts;
use crate::ai::CoachError;
use crate::auth::{check_credentials, validate_login_fields, validate_registration};
use crate::errors::AppError;
use crate::i18n::{Language, translations};
use crate::metrics::{age, charts, current_weight, latest_snapshot, progress_rings, steps_percent};
use crate::models::{
    Account, AccountView, ActivityForm, DailyActivity, DashboardView, LoginRequest, Notice,
    ProfileUpdate, RegisterRequest, StateView,
};
use crate::state::{AppData, AppState};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::time::sleep;
use tracing::{error, info, warn};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CycleOutcome {
    /// No active account, no history, or another cycle is still running.
    Skipped,
    Completed,
    RateLimited,
}

/// Clears the in-flight flag when a generation cycle ends, however it ends.
struct CycleGuard(Arc<AtomicBool>);

impl CycleGuard {
    fn try_acquire(flag: &Arc<AtomicBool>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| Self(Arc::clone(flag)))
    }
}

impl Drop for CycleGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl AppState {
    pub async fn register(&self, request: RegisterRequest) -> Result<StateView, AppError> {
        let t = translations(request.language);
        {
            let mut data = self.data.lock().await;
            validate_registration(&request, &data.accounts, t)?;
            data.authenticating = true;
        }

        sleep(self.timings.register_delay).await;

        let mut data = self.data.lock().await;
        data.authenticating = false;
        // The collection may have changed while we waited.
        validate_registration(&request, &data.accounts, t)?;

        let account = Account {
            id: Uuid::new_v4().to_string(),
            name: request.name,
            email: request.email,
            password: request.password,
            birth_date: request.birth_date,
            base_weight: request.base_weight,
            created_at: Utc::now(),
            language: request.language,
        };
        info!(email = %account.email, "account registered");
        let email = account.email.clone();
        data.accounts.push(account);
        let accounts = data.accounts.clone();
        save_accounts(&mut data.storage, &accounts).await?;
        data.activate(&email).await?;
        Ok(build_view(&data))
    }

    pub async fn login(&self, request: LoginRequest) -> Result<StateView, AppError> {
        let t = translations(request.language.unwrap_or(Language::DEFAULT));
        validate_login_fields(&request, t)?;
        self.data.lock().await.authenticating = true;

        sleep(self.timings.login_delay).await;

        let mut data = self.data.lock().await;
        data.authenticating = false;
        let email = check_credentials(&request, &data.accounts, t)?.email.clone();
        data.activate(&email).await?;
        Ok(build_view(&data))
    }

    pub async fn logout(&self) -> Result<StateView, AppError> {
        let mut data = self.data.lock().await;
        data.deactivate().await?;
        Ok(build_view(&data))
    }

    pub async fn update_profile(&self, update: ProfileUpdate) -> Result<StateView, AppError> {
        let mut data = self.data.lock().await;
        let email = data
            .current_email
            .clone()
            .ok_or_else(|| AppError::unauthorized("not logged in"))?;

        if let Some(name) = &update.name {
            if name.trim().is_empty() {
                return Err(AppError::bad_request("name must not be empty"));
            }
        }
        if let Some(weight) = update.base_weight {
            if !weight.is_finite() || weight <= 0.0 {
                return Err(AppError::bad_request("weight must be a positive number"));
            }
        }

        let Some(account) = data.accounts.iter_mut().find(|a| a.email == email) else {
            return Err(AppError::unauthorized("not logged in"));
        };
        if let Some(name) = update.name {
            account.name = name;
        }
        if let Some(birth_date) = update.birth_date {
            account.birth_date = birth_date;
        }
        if let Some(weight) = update.base_weight {
            account.base_weight = weight;
        }
        if let Some(language) = update.language {
            account.language = language;
        }

        let accounts = data.accounts.clone();
        save_accounts(&mut data.storage, &accounts).await?;
        Ok(build_view(&data))
    }

    /// Appends a record to the active history and schedules a generation
    /// cycle shortly afterwards.
    pub async fn record_activity(&self, form: ActivityForm) -> Result<DailyActivity, AppError> {
        if !form.sleep_hours.is_finite() || form.sleep_hours < 0.0 {
            return Err(AppError::bad_request("sleepHours must be a non-negative number"));
        }
        if form.weight.is_some_and(|w| !w.is_finite() || w <= 0.0) {
            return Err(AppError::bad_request("weight must be a positive number"));
        }

        let activity = {
            let mut data = self.data.lock().await;
            let base_weight = data
                .active_account()
                .map(|account| account.base_weight)
                .ok_or_else(|| AppError::unauthorized("not logged in"))?;
            let activity = form.into_activity(Uuid::new_v4().to_string(), base_weight);
            data.activities.push(activity.clone());
            data.persist_bundle().await?;
            activity
        };

        let state = self.clone();
        tokio::spawn(async move {
            sleep(state.timings.record_trigger_delay).await;
            state.generate().await;
        });

        Ok(activity)
    }

    /// Runs one generation cycle for the active account: insights first,
    /// then a short pause, then weekly goals. A trigger while a cycle is
    /// already running does nothing.
    pub async fn generate(&self) -> CycleOutcome {
        let (email, activities, age, weight, language) = {
            let data = self.data.lock().await;
            let Some(account) = data.active_account() else {
                return CycleOutcome::Skipped;
            };
            if data.activities.is_empty() {
                return CycleOutcome::Skipped;
            }
            (
                account.email.clone(),
                data.activities.clone(),
                age(account.birth_date),
                current_weight(&data.activities, account.base_weight),
                account.language,
            )
        };

        let Some(_guard) = CycleGuard::try_acquire(&self.generating) else {
            info!("generation cycle already running");
            return CycleOutcome::Skipped;
        };

        {
            let mut data = self.data.lock().await;
            if !data.is_active(&email) {
                return CycleOutcome::Skipped;
            }
            data.analyzing = true;
            data.generating_goals = true;
            data.notice = None;
        }

        let insights = self.coach.health_insights(&activities, age, language).await;
        {
            let mut data = self.data.lock().await;
            if !data.is_active(&email) {
                info!("session changed during generation, dropping results");
                return CycleOutcome::Skipped;
            }
            data.analyzing = false;
            match insights {
                Ok(Some(insights)) => data.insights = insights,
                Ok(None) => {}
                Err(CoachError::RateLimited) => {
                    warn!("insights rate limited, skipping goals");
                    data.generating_goals = false;
                    data.notice = Some(Notice::RateLimited);
                    return CycleOutcome::RateLimited;
                }
            }
        }

        sleep(self.timings.cycle_pause).await;

        let goals = self
            .coach
            .weekly_goal_recommendations(&activities, age, weight, language)
            .await;

        let mut data = self.data.lock().await;
        if !data.is_active(&email) {
            info!("session changed during generation, dropping results");
            return CycleOutcome::Skipped;
        }
        data.generating_goals = false;
        match goals {
            Ok(Some(goals)) => {
                data.weekly_goals = Some(goals);
                if let Err(err) = data.persist_bundle().await {
                    error!("failed to persist weekly goals: {err}");
                }
                CycleOutcome::Completed
            }
            Ok(None) => CycleOutcome::Completed,
            Err(CoachError::RateLimited) => {
                data.notice = Some(Notice::RateLimited);
                CycleOutcome::RateLimited
            }
        }
    }

    pub async fn view(&self) -> StateView {
        build_view(&*self.data.lock().await)
    }
}

fn build_view(data: &AppData) -> StateView {
    let Some(account) = data.active_account() else {
        return StateView::LoggedOut {
            authenticating: data.authenticating,
        };
    };

    let latest = latest_snapshot(&data.activities, account.base_weight);
    StateView::Active(Box::new(DashboardView {
        account: AccountView::from(account),
        age: age(account.birth_date),
        rings: data
            .weekly_goals
            .as_ref()
            .map(|goals| progress_rings(&latest, goals)),
        steps_ring_pct: steps_percent(&latest),
        charts: charts(&data.activities, account.base_weight),
        latest,
        activities: data.activities.clone(),
        weekly_goals: data.weekly_goals.clone(),
        insights: data.insights.clone(),
        analyzing: data.analyzing,
        generating_goals: data.generating_goals,
        notice: data.notice,
    }))
}
