use crate::accounts::{find_by_email, get_session, list_accounts, set_session};
use crate::activity::{load_account_data, save_account_data};
use crate::ai::Coach;
use crate::models::{Account, AccountData, AiInsight, DailyActivity, Notice, WeeklyGoals};
use crate::storage::{LocalStorage, StorageError};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

#[derive(Debug, Clone)]
pub struct Timings {
    pub login_delay: Duration,
    pub register_delay: Duration,
    /// Pause between the insights call and the goals call of one cycle.
    pub cycle_pause: Duration,
    /// Delay between recording an activity and starting a generation cycle.
    pub record_trigger_delay: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            login_delay: crate::auth::LOGIN_DELAY,
            register_delay: crate::auth::REGISTER_DELAY,
            cycle_pause: Duration::from_millis(800),
            record_trigger_delay: Duration::from_millis(500),
        }
    }
}

/// Everything the application holds in memory. Only the orchestrator
/// mutates it, and every change to accounts, the session pointer, the
/// history or the goals is written through to storage straight away.
#[derive(Debug)]
pub struct AppData {
    pub storage: LocalStorage,
    pub accounts: Vec<Account>,
    pub current_email: Option<String>,
    pub activities: Vec<DailyActivity>,
    pub weekly_goals: Option<WeeklyGoals>,
    pub insights: Vec<AiInsight>,
    pub authenticating: bool,
    pub analyzing: bool,
    pub generating_goals: bool,
    pub notice: Option<Notice>,
}

impl AppData {
    /// Builds the in-memory state from storage and restores the persisted
    /// session. A session naming an account that no longer exists is cleared.
    pub async fn load(storage: LocalStorage) -> Self {
        let accounts = list_accounts(&storage);
        let mut data = Self {
            storage,
            accounts,
            current_email: None,
            activities: Vec::new(),
            weekly_goals: None,
            insights: Vec::new(),
            authenticating: false,
            analyzing: false,
            generating_goals: false,
            notice: None,
        };
        if let Some(email) = get_session(&data.storage) {
            if find_by_email(&data.accounts, &email).is_some() {
                data.load_bundle(&email);
                data.current_email = Some(email);
            } else {
                warn!("stored session points at an unknown account");
                if let Err(err) = set_session(&mut data.storage, None).await {
                    error!("failed to clear stale session: {err}");
                }
            }
        }
        data
    }

    pub fn active_account(&self) -> Option<&Account> {
        let email = self.current_email.as_deref()?;
        find_by_email(&self.accounts, email)
    }

    pub fn is_active(&self, email: &str) -> bool {
        self.current_email.as_deref() == Some(email)
    }

    /// Makes `email` the session and replaces in-memory history, goals and
    /// insights with that account's own data.
    pub async fn activate(&mut self, email: &str) -> Result<(), StorageError> {
        self.current_email = Some(email.to_string());
        self.load_bundle(email);
        info!(email, "session started");
        set_session(&mut self.storage, Some(email)).await
    }

    pub async fn deactivate(&mut self) -> Result<(), StorageError> {
        self.current_email = None;
        self.activities.clear();
        self.weekly_goals = None;
        self.reset_transient();
        set_session(&mut self.storage, None).await
    }

    pub async fn persist_bundle(&mut self) -> Result<(), StorageError> {
        let Some(email) = self.current_email.clone() else {
            return Ok(());
        };
        let bundle = AccountData {
            activities: self.activities.clone(),
            weekly_goals: self.weekly_goals.clone(),
        };
        save_account_data(&mut self.storage, &email, &bundle).await
    }

    fn load_bundle(&mut self, email: &str) {
        let bundle = load_account_data(&self.storage, email);
        self.activities = bundle.activities;
        self.weekly_goals = bundle.weekly_goals;
        self.reset_transient();
    }

    fn reset_transient(&mut self) {
        self.insights.clear();
        self.analyzing = false;
        self.generating_goals = false;
        self.notice = None;
    }
}

#[derive(Clone)]
pub struct AppState {
    pub data: Arc<Mutex<AppData>>,
    pub coach: Arc<Coach>,
    pub timings: Timings,
    pub(crate) generating: Arc<AtomicBool>,
}

impl AppState {
    pub async fn load(storage: LocalStorage, coach: Coach, timings: Timings) -> Self {
        Self {
            data: Arc::new(Mutex::new(AppData::load(storage).await)),
            coach: Arc::new(coach),
            timings,
            generating: Arc::new(AtomicBool::new(false)),
        }
    }
}
