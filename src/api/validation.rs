//! Input validation for API requests.
//!
//! Validators return `Result<(), String>` so handlers can collect them into
//! field-level errors with the `ValidationErrorBuilder` from the `error`
//! module.

use chrono::{NaiveDate, NaiveTime};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for validating usernames (alphanumeric start, then dots,
    /// dashes, underscores allowed, 2-32 chars)
    static ref USERNAME_REGEX: Regex = Regex::new(
        r"^[a-zA-Z0-9][a-zA-Z0-9._-]{1,31}$"
    ).unwrap();
}

/// Validate a username
pub fn validate_username(username: &str) -> Result<(), String> {
    if username.is_empty() {
        return Err("Username is required".to_string());
    }

    if !USERNAME_REGEX.is_match(username) {
        return Err(
            "Username must be 2-32 characters, alphanumeric with dots, dashes or underscores"
                .to_string(),
        );
    }

    Ok(())
}

/// Validate a password
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.is_empty() {
        return Err("Password is required".to_string());
    }

    if password.len() > 128 {
        return Err("Password is too long (max 128 characters)".to_string());
    }

    Ok(())
}

/// Validate a role value
pub fn validate_role(role: &str) -> Result<(), String> {
    match role {
        "admin" | "user" => Ok(()),
        _ => Err("Invalid role. Must be one of: admin, user".to_string()),
    }
}

/// Validate a calendar day in `YYYY-MM-DD` form
pub fn validate_date(date: &str) -> Result<(), String> {
    if date.is_empty() {
        return Err("Date is required".to_string());
    }

    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map(|_| ())
        .map_err(|_| "Invalid date. Use YYYY-MM-DD".to_string())
}

/// Validate a time of day in `HH:MM` form
pub fn validate_start_time(start_time: &str) -> Result<(), String> {
    if start_time.is_empty() {
        return Err("Start time is required".to_string());
    }

    NaiveTime::parse_from_str(start_time, "%H:%M")
        .map(|_| ())
        .map_err(|_| "Invalid start time. Use HH:MM".to_string())
}

/// Validate a reservation duration in hours
pub fn validate_duration(duration: f64) -> Result<(), String> {
    if !duration.is_finite() {
        return Err("Duration must be a number".to_string());
    }

    if duration <= 0.0 {
        return Err("Duration must be greater than 0".to_string());
    }

    if duration > 24.0 {
        return Err("Duration is too long (max 24 hours)".to_string());
    }

    Ok(())
}

/// Validate a UUID string
pub fn validate_uuid(id: &str, field_name: &str) -> Result<(), String> {
    if id.is_empty() {
        return Err(format!("{} is required", field_name));
    }

    if uuid::Uuid::parse_str(id).is_err() {
        return Err(format!("Invalid {} format", field_name));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_username() {
        assert!(validate_username("admin").is_ok());
        assert!(validate_username("alice.b").is_ok());
        assert!(validate_username("bob_42").is_ok());
        assert!(validate_username("jean-luc").is_ok());

        assert!(validate_username("").is_err());
        assert!(validate_username("a").is_err()); // too short
        assert!(validate_username(".dot").is_err()); // bad first char
        assert!(validate_username("space name").is_err());
        assert!(validate_username(&"x".repeat(33)).is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("admin").is_ok());
        assert!(validate_password("correct horse battery staple").is_ok());

        assert!(validate_password("").is_err());
        assert!(validate_password(&"x".repeat(129)).is_err());
    }

    #[test]
    fn test_validate_role() {
        assert!(validate_role("admin").is_ok());
        assert!(validate_role("user").is_ok());

        assert!(validate_role("").is_err());
        assert!(validate_role("root").is_err());
        assert!(validate_role("Admin").is_err());
    }

    #[test]
    fn test_validate_date() {
        assert!(validate_date("2026-08-07").is_ok());
        assert!(validate_date("2026-12-31").is_ok());

        assert!(validate_date("").is_err());
        assert!(validate_date("2026-13-01").is_err());
        assert!(validate_date("2026-02-30").is_err());
        assert!(validate_date("07/08/2026").is_err());
        assert!(validate_date("tomorrow").is_err());
    }

    #[test]
    fn test_validate_start_time() {
        assert!(validate_start_time("10:00").is_ok());
        assert!(validate_start_time("00:00").is_ok());
        assert!(validate_start_time("23:59").is_ok());

        assert!(validate_start_time("").is_err());
        assert!(validate_start_time("24:00").is_err());
        assert!(validate_start_time("10:60").is_err());
        assert!(validate_start_time("10am").is_err());
    }

    #[test]
    fn test_validate_duration() {
        assert!(validate_duration(1.0).is_ok());
        assert!(validate_duration(0.5).is_ok());
        assert!(validate_duration(24.0).is_ok());

        assert!(validate_duration(0.0).is_err());
        assert!(validate_duration(-1.0).is_err());
        assert!(validate_duration(25.0).is_err());
        assert!(validate_duration(f64::NAN).is_err());
        assert!(validate_duration(f64::INFINITY).is_err());
    }

    #[test]
    fn test_validate_uuid() {
        assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000", "resource_id").is_ok());
        assert!(validate_uuid("", "resource_id").is_err());
        assert!(validate_uuid("not-a-uuid", "resource_id").is_err());
    }
}
