//! User account, address and statistics types.

use crate::error::{StoreError, check_text};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Points granted to a freshly registered user.
pub const SIGNUP_POINTS: i32 = 100;

/// Longest accepted username.
pub const MAX_USERNAME_LEN: usize = 50;

/// Minimum password length, in characters.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Input for user registration. The password is already hashed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    /// Login name (unique).
    pub username: String,
    /// Password digest.
    pub password_hash: String,
    /// Contact email (unique when present).
    pub email: Option<String>,
}

/// What login needs to know about a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserCredentials {
    /// User id.
    pub id: i64,
    /// Login name.
    pub username: String,
    /// Password digest.
    pub password_hash: String,
}

/// Public profile of a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// User id.
    pub id: i64,
    /// Login name.
    pub username: String,
    /// Contact email.
    pub email: Option<String>,
    /// Phone number.
    pub phone: Option<String>,
    /// Display name.
    pub nickname: Option<String>,
    /// Short biography.
    pub bio: Option<String>,
    /// Avatar URL.
    pub avatar_url: Option<String>,
    /// Gender, free text.
    pub gender: Option<String>,
    /// Date of birth.
    pub birth_date: Option<NaiveDate>,
    /// Loyalty points.
    pub points: i32,
    /// Registration time.
    pub created_at: DateTime<Utc>,
    /// Last profile change.
    pub updated_at: Option<DateTime<Utc>>,
}

/// Partial profile update; `None` leaves a field unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProfileUpdate {
    /// New login name.
    pub username: Option<String>,
    /// New email.
    pub email: Option<String>,
    /// New display name.
    pub nickname: Option<String>,
    /// New phone number.
    pub phone: Option<String>,
    /// New biography.
    pub bio: Option<String>,
}

impl ProfileUpdate {
    /// Whether no field is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.email.is_none()
            && self.nickname.is_none()
            && self.phone.is_none()
            && self.bio.is_none()
    }

    /// Validate the update.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] if nothing is set, the username is
    /// blank or too long, the email has no `@`, or any field contains a NUL
    /// character.
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.is_empty() {
            return Err(StoreError::validation("at least one profile field is required"));
        }
        if let Some(username) = &self.username {
            validate_username(username)?;
        }
        if let Some(email) = &self.email {
            validate_email(email)?;
        }
        for (field, value) in [
            ("nickname", &self.nickname),
            ("phone", &self.phone),
            ("bio", &self.bio),
        ] {
            if let Some(value) = value {
                check_text(field, value)?;
            }
        }
        Ok(())
    }
}

/// Check a username for registration or rename.
///
/// # Errors
///
/// Returns [`StoreError::Validation`] if the username is blank, longer
/// than [`MAX_USERNAME_LEN`] characters, or contains a NUL character.
pub fn validate_username(username: &str) -> Result<(), StoreError> {
    check_text("username", username)?;
    let trimmed = username.trim();
    if trimmed.is_empty() {
        return Err(StoreError::validation("username must not be blank"));
    }
    if trimmed.chars().count() > MAX_USERNAME_LEN {
        return Err(StoreError::validation(format!(
            "username must be at most {MAX_USERNAME_LEN} characters"
        )));
    }
    Ok(())
}

/// Check a new password before it is hashed.
///
/// # Errors
///
/// Returns [`StoreError::Validation`] if the password is shorter than
/// [`MIN_PASSWORD_LEN`] characters.
pub fn validate_password(password: &str) -> Result<(), StoreError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(StoreError::validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

/// Check an email address loosely.
///
/// # Errors
///
/// Returns [`StoreError::Validation`] if the address has no `@` between
/// non-empty parts or contains a NUL character.
pub fn validate_email(email: &str) -> Result<(), StoreError> {
    check_text("email", email)?;
    match email.trim().split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(StoreError::validation(format!("invalid email address: {email}"))),
    }
}

/// A saved shipping address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAddress {
    /// Address id.
    pub id: i64,
    /// Owner.
    pub user_id: i64,
    /// Recipient.
    pub recipient_name: String,
    /// Recipient phone.
    pub recipient_phone: String,
    /// Province.
    pub province: String,
    /// City.
    pub city: String,
    /// District.
    pub district: String,
    /// Street address.
    pub detail_address: String,
    /// Default address of the user.
    pub is_default: bool,
}

/// Aggregate figures shown on the account page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStats {
    /// Number of orders.
    pub order_total: i64,
    /// Number of favorites.
    pub favorite_total: i64,
    /// Sum of `final_amount` over all orders.
    pub spend_total: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_passwords_are_rejected() {
        assert!(validate_password("1234567").is_err());
        assert!(validate_password("12345678").is_ok());
        assert!(validate_password("密码密码密码密码").is_ok());
    }

    #[test]
    fn empty_update_is_rejected() {
        assert!(ProfileUpdate::default().validate().is_err());
    }

    #[test]
    fn update_checks_username_and_email() {
        let blank = ProfileUpdate {
            username: Some("  ".to_string()),
            ..ProfileUpdate::default()
        };
        assert!(blank.validate().is_err());

        let bad_email = ProfileUpdate {
            email: Some("reader.example.com".to_string()),
            ..ProfileUpdate::default()
        };
        assert!(bad_email.validate().is_err());

        let ok = ProfileUpdate {
            nickname: Some("Bookworm".to_string()),
            email: Some("reader@example.com".to_string()),
            ..ProfileUpdate::default()
        };
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn nul_characters_are_rejected() {
        assert!(validate_username("ali\0ce").is_err());
        assert!(validate_email("alice@exa\0mple.com").is_err());

        let bio = ProfileUpdate {
            bio: Some("reads\0on trains".to_string()),
            ..ProfileUpdate::default()
        };
        assert!(matches!(bio.validate(), Err(StoreError::Validation(_))));
    }

    #[test]
    fn long_usernames_are_rejected() {
        assert!(validate_username(&"x".repeat(MAX_USERNAME_LEN)).is_ok());
        assert!(validate_username(&"x".repeat(MAX_USERNAME_LEN + 1)).is_err());
    }
}
