use crate::models::Account;
use crate::storage::{LocalStorage, StorageError};

pub const ACCOUNTS_KEY: &str = "health_ai_users_v2";
pub const SESSION_KEY: &str = "health_ai_current_user_email";

/// Loads every registered account. Missing or malformed data is an empty list.
pub fn list_accounts(storage: &LocalStorage) -> Vec<Account> {
    storage.read_json(ACCOUNTS_KEY).unwrap_or_default()
}

pub async fn save_accounts(
    storage: &mut LocalStorage,
    accounts: &[Account],
) -> Result<(), StorageError> {
    storage.write_json(ACCOUNTS_KEY, &accounts).await
}

/// The session pointer is the raw email, not a JSON value.
pub fn get_session(storage: &LocalStorage) -> Option<String> {
    storage
        .get_item(SESSION_KEY)
        .filter(|email| !email.is_empty())
        .map(str::to_string)
}

pub async fn set_session(
    storage: &mut LocalStorage,
    email: Option<&str>,
) -> Result<(), StorageError> {
    match email {
        Some(email) => storage.set_item(SESSION_KEY, email.to_string()).await,
        None => storage.remove_item(SESSION_KEY).await,
    }
}

pub fn find_by_email<'a>(accounts: &'a [Account], email: &str) -> Option<&'a Account> {
    accounts.iter().find(|account| account.email == email)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::Language;
    use chrono::{NaiveDate, Utc};

    fn account(email: &str) -> Account {
        Account {
            id: "id1".to_string(),
            name: "Eva".to_string(),
            email: email.to_string(),
            password: "password12".to_string(),
            birth_date: NaiveDate::from_ymd_opt(1990, 4, 2).unwrap(),
            base_weight: 64.0,
            created_at: Utc::now(),
            language: Language::Cs,
        }
    }

    #[tokio::test]
    async fn accounts_round_trip() {
        let mut storage = LocalStorage::in_memory();
        assert!(list_accounts(&storage).is_empty());

        let accounts = vec![account("a@x.cz"), account("b@x.cz")];
        save_accounts(&mut storage, &accounts).await.unwrap();
        assert_eq!(list_accounts(&storage), accounts);
        assert!(find_by_email(&accounts, "b@x.cz").is_some());
        assert!(find_by_email(&accounts, "c@x.cz").is_none());
    }

    #[tokio::test]
    async fn malformed_accounts_fail_soft() {
        let mut storage = LocalStorage::in_memory();
        storage
            .set_item(ACCOUNTS_KEY, "{\"oops\":true}".to_string())
            .await
            .unwrap();
        assert!(list_accounts(&storage).is_empty());
    }

    #[tokio::test]
    async fn session_set_and_clear() {
        let mut storage = LocalStorage::in_memory();
        assert_eq!(get_session(&storage), None);
        set_session(&mut storage, Some("a@x.cz")).await.unwrap();
        assert_eq!(get_session(&storage).as_deref(), Some("a@x.cz"));
        set_session(&mut storage, None).await.unwrap();
        assert_eq!(get_session(&storage), None);
    }
}
