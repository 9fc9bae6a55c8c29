use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

use crate::{
    error::{AppError, FieldError},
    models::Role,
};

pub mod appointments;
pub mod patients;
pub mod teeth;
pub mod users;

/// Collects field errors so a request reports every problem at once.
#[derive(Debug, Default)]
pub(crate) struct FieldCheck {
    errors: Vec<FieldError>,
}

impl FieldCheck {
    fn fail<T>(&mut self, field: &str, message: impl Into<String>) -> Option<T> {
        self.errors.push(FieldError::new(field, message));
        None
    }

    pub(crate) fn required(&mut self, field: &str, value: Option<String>) -> Option<String> {
        match value.map(|v| v.trim().to_string()) {
            Some(v) if !v.is_empty() => Some(v),
            _ => self.fail(field, format!("{field} is required")),
        }
    }

    /// Presence only. Secrets are kept byte-for-byte, surrounding spaces included.
    pub(crate) fn secret(&mut self, field: &str, value: Option<String>) -> Option<String> {
        match value {
            Some(v) if !v.is_empty() => Some(v),
            _ => self.fail(field, format!("{field} is required")),
        }
    }

    pub(crate) fn email(&mut self, field: &str, value: Option<String>) -> Option<String> {
        let value = self.required(field, value)?;
        if is_valid_email(&value) {
            Some(value)
        } else {
            self.fail(field, "must be a valid email address")
        }
    }

    pub(crate) fn min_len(&mut self, field: &str, value: Option<String>, min: usize) -> Option<String> {
        match value {
            Some(v) if v.chars().count() >= min => Some(v),
            _ => self.fail(field, format!("must be at least {min} characters")),
        }
    }

    pub(crate) fn role(&mut self, field: &str, value: Option<String>) -> Option<Role> {
        let value = self.required(field, value)?;
        match value.parse::<Role>() {
            Ok(role) => Some(role),
            Err(_) => self.fail(field, "must be one of Admin, Secretary, Doctor"),
        }
    }

    pub(crate) fn integer(&mut self, field: &str, value: Option<Value>) -> Option<i32> {
        let parsed = match &value {
            Some(Value::Number(n)) => n.as_i64().and_then(|n| i32::try_from(n).ok()),
            Some(Value::String(s)) => s.trim().parse::<i32>().ok(),
            _ => None,
        };
        match parsed {
            Some(n) => Some(n),
            None => self.fail(field, "must be an integer"),
        }
    }

    pub(crate) fn datetime(&mut self, field: &str, value: Option<String>) -> Option<DateTime<Utc>> {
        let value = self.required(field, value)?;
        match parse_iso8601(&value) {
            Some(at) => Some(at),
            None => self.fail(field, "must be an ISO 8601 date"),
        }
    }

    /// Resolve the checked value, or report every collected error.
    pub(crate) fn finish<T>(self, value: Option<T>) -> Result<T, AppError> {
        match value {
            Some(value) if self.errors.is_empty() => Ok(value),
            _ => Err(AppError::Validation(self.errors)),
        }
    }
}

/// Text is optional on edits; blank counts as absent.
pub(crate) fn present(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn is_valid_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !value.chars().any(char::is_whitespace)
        && domain
            .split('.')
            .collect::<Vec<_>>()
            .split_last()
            .is_some_and(|(tld, rest)| {
                !rest.is_empty() && tld.len() >= 2 && rest.iter().all(|label| !label.is_empty())
            })
}

/// RFC 3339, a naive date-time (taken as UTC) or a plain date (UTC midnight).
pub fn parse_iso8601(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Some(at.with_timezone(&Utc));
    }
    if let Ok(naive) = raw.parse::<NaiveDateTime>() {
        return Some(naive.and_utc());
    }
    raw.parse::<NaiveDate>()
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
