use crate::accounts::find_by_email;
use crate::i18n::Translations;
use crate::models::{Account, LoginRequest, RegisterRequest};
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Duration;

pub const LOGIN_DELAY: Duration = Duration::from_millis(800);
pub const REGISTER_DELAY: Duration = Duration::from_millis(1000);
pub const MIN_PASSWORD_LEN: usize = 8;
pub const MIN_PASSWORD_DIGITS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FormField {
    Name,
    Email,
    Password,
    ConfirmPassword,
}

/// Per-field validation messages, one per offending field. Clients drop a
/// field's message when the user edits that field.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<FormField, String>);

impl FieldErrors {
    pub fn set(&mut self, field: FormField, message: &str) {
        self.0.insert(field, message.to_string());
    }

    pub fn get(&self, field: FormField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

pub fn password_meets_rule(password: &str) -> bool {
    let digits = password.chars().filter(char::is_ascii_digit).count();
    password.chars().count() >= MIN_PASSWORD_LEN && digits >= MIN_PASSWORD_DIGITS
}

/// Field checks run before any store write. Each failing field is reported.
pub fn validate_registration(
    request: &RegisterRequest,
    accounts: &[Account],
    t: &Translations,
) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::default();
    if request.name.is_empty() {
        errors.set(FormField::Name, t.error_fill_all);
    }
    if request.email.is_empty() {
        errors.set(FormField::Email, t.error_fill_all);
    } else if find_by_email(accounts, &request.email).is_some() {
        errors.set(FormField::Email, t.error_email_taken);
    }
    if !password_meets_rule(&request.password) {
        errors.set(FormField::Password, t.password_rule);
    }
    if request.password != request.confirm_password {
        errors.set(FormField::ConfirmPassword, t.error_passwords_no_match);
    }
    errors.into_result()
}

/// Required-field checks done immediately, before the authentication delay.
pub fn validate_login_fields(request: &LoginRequest, t: &Translations) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::default();
    if request.email.is_empty() {
        errors.set(FormField::Email, t.error_fill_all);
    }
    if request.password.is_empty() {
        errors.set(FormField::Password, t.error_fill_all);
    }
    errors.into_result()
}

pub fn check_credentials<'a>(
    request: &LoginRequest,
    accounts: &'a [Account],
    t: &Translations,
) -> Result<&'a Account, FieldErrors> {
    let mut errors = FieldErrors::default();
    let Some(account) = find_by_email(accounts, &request.email) else {
        errors.set(FormField::Email, t.error_user_not_found);
        return Err(errors);
    };
    if account.password != request.password {
        errors.set(FormField::Password, t.error_wrong_password);
        return Err(errors);
    }
    Ok(account)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::{CS, EN, Language};
    use chrono::{NaiveDate, Utc};

    fn register(password: &str, confirm: &str) -> RegisterRequest {
        RegisterRequest {
            name: "Jan".to_string(),
            email: "jan@x.cz".to_string(),
            password: password.to_string(),
            confirm_password: confirm.to_string(),
            birth_date: NaiveDate::from_ymd_opt(1995, 1, 1).unwrap(),
            base_weight: 75.0,
            language: Language::Cs,
        }
    }

    fn existing(email: &str) -> Account {
        Account {
            id: "x".to_string(),
            name: "Existing".to_string(),
            email: email.to_string(),
            password: "secret123".to_string(),
            birth_date: NaiveDate::from_ymd_opt(1980, 1, 1).unwrap(),
            base_weight: 90.0,
            created_at: Utc::now(),
            language: Language::En,
        }
    }

    fn login(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
            language: None,
        }
    }

    #[test]
    fn short_password_with_one_digit_is_rejected() {
        let errors = validate_registration(&register("short1", "short1"), &[], &EN).unwrap_err();
        assert_eq!(errors.get(FormField::Password), Some(EN.password_rule));
        assert!(errors.get(FormField::ConfirmPassword).is_none());
        assert!(errors.get(FormField::Name).is_none());
    }

    #[test]
    fn long_password_with_two_digits_is_accepted() {
        assert!(validate_registration(&register("password12", "password12"), &[], &EN).is_ok());
    }

    #[test]
    fn long_password_with_one_digit_is_rejected() {
        assert!(!password_meets_rule("password1"));
        assert!(password_meets_rule("12345678"));
    }

    #[test]
    fn mismatched_confirmation_is_reported_even_for_strong_password() {
        let errors =
            validate_registration(&register("password12", "password13"), &[], &EN).unwrap_err();
        assert_eq!(
            errors.get(FormField::ConfirmPassword),
            Some(EN.error_passwords_no_match)
        );
        assert!(errors.get(FormField::Password).is_none());

        let both = validate_registration(&register("weak", "weaker"), &[], &EN).unwrap_err();
        assert!(both.get(FormField::Password).is_some());
        assert!(both.get(FormField::ConfirmPassword).is_some());
    }

    #[test]
    fn missing_name_and_email_are_separate_errors() {
        let mut request = register("password12", "password12");
        request.name.clear();
        request.email.clear();
        let errors = validate_registration(&request, &[], &CS).unwrap_err();
        assert_eq!(errors.get(FormField::Name), Some(CS.error_fill_all));
        assert_eq!(errors.get(FormField::Email), Some(CS.error_fill_all));
    }

    #[test]
    fn duplicate_email_is_rejected() {
        let accounts = vec![existing("jan@x.cz")];
        let errors =
            validate_registration(&register("password12", "password12"), &accounts, &EN)
                .unwrap_err();
        assert_eq!(errors.get(FormField::Email), Some(EN.error_email_taken));
    }

    #[test]
    fn login_distinguishes_unknown_user_and_wrong_password() {
        let accounts = vec![existing("a@x.cz")];

        let unknown = check_credentials(&login("b@x.cz", "secret123"), &accounts, &EN).unwrap_err();
        assert_eq!(unknown.get(FormField::Email), Some(EN.error_user_not_found));
        assert!(unknown.get(FormField::Password).is_none());

        let wrong = check_credentials(&login("a@x.cz", "secret124"), &accounts, &EN).unwrap_err();
        assert_eq!(wrong.get(FormField::Password), Some(EN.error_wrong_password));

        let ok = check_credentials(&login("a@x.cz", "secret123"), &accounts, &EN).unwrap();
        assert_eq!(ok.email, "a@x.cz");
    }

    #[test]
    fn empty_login_fields_are_required() {
        let errors = validate_login_fields(&login("", ""), &EN).unwrap_err();
        assert_eq!(errors.get(FormField::Email), Some(EN.error_fill_all));
        assert_eq!(errors.get(FormField::Password), Some(EN.error_fill_all));

        let errors = validate_login_fields(&login("a@x.cz", ""), &EN).unwrap_err();
        assert!(errors.get(FormField::Email).is_none());
    }
}
