use crate::models::AccountData;
use crate::storage::{LocalStorage, StorageError};

pub const ACCOUNT_DATA_PREFIX: &str = "health_data_v2_";

pub fn account_data_key(email: &str) -> String {
    format!("{ACCOUNT_DATA_PREFIX}{email}")
}

/// Reads the bundle for `email`; absent data is an empty history with no goals.
pub fn load_account_data(storage: &LocalStorage, email: &str) -> AccountData {
    storage
        .read_json(&account_data_key(email))
        .unwrap_or_default()
}

pub async fn save_account_data(
    storage: &mut LocalStorage,
    email: &str,
    data: &AccountData,
) -> Result<(), StorageError> {
    storage.write_json(&account_data_key(email), data).await
}
