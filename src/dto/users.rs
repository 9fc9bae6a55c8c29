use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{FieldCheck, present};
use crate::{error::AppError, models::Role};

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct RegisterUserRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    #[schema(value_type = Option<Role>)]
    pub role: Option<String>,
}

#[derive(Debug)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub role: Role,
}

impl RegisterUserRequest {
    pub fn validate(self) -> Result<NewUser, AppError> {
        let mut check = FieldCheck::default();
        let email = check.email("email", self.email);
        let password = check.min_len("password", self.password, 6);
        let role = check.role("role", self.role);
        check.finish(
            email
                .zip(password)
                .zip(role)
                .map(|((email, password), role)| NewUser {
                    email,
                    password,
                    role,
                }),
        )
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn validate(self) -> Result<Credentials, AppError> {
        let mut check = FieldCheck::default();
        let email = check.required("email", self.email);
        let password = check.secret("password", self.password);
        check.finish(
            email
                .zip(password)
                .map(|(email, password)| Credentials { email, password }),
        )
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub role: Role,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateUserRequest {
    pub email: Option<String>,
    #[schema(value_type = Option<Role>)]
    pub role: Option<String>,
}

#[derive(Debug, Default)]
pub struct UserChanges {
    pub email: Option<String>,
    pub role: Option<Role>,
}

impl UpdateUserRequest {
    /// Blank fields are absent; present ones must be well-formed.
    pub fn validate(self) -> Result<UserChanges, AppError> {
        let mut check = FieldCheck::default();
        let email = present(self.email);
        let role = present(self.role);
        let changes = UserChanges {
            email: match email {
                Some(email) => check.email("email", Some(email)),
                None => None,
            },
            role: match role {
                Some(role) => check.role("role", Some(role)),
                None => None,
            },
        };
        check.finish(Some(changes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FieldError;

    fn fields(err: AppError) -> Vec<String> {
        match err {
            AppError::Validation(errors) => errors.into_iter().map(|e: FieldError| e.field).collect(),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn register_accepts_a_complete_request() {
        let user = RegisterUserRequest {
            email: Some("sec@clinic.test".into()),
            password: Some("hunter22".into()),
            role: Some("Secretary".into()),
        }
        .validate()
        .unwrap();
        assert_eq!(user.email, "sec@clinic.test");
        assert_eq!(user.role, Role::Secretary);
    }

    #[test]
    fn register_reports_each_bad_field() {
        let err = RegisterUserRequest {
            email: Some("not-an-email".into()),
            password: Some("12345".into()),
            role: Some("Nurse".into()),
        }
        .validate()
        .unwrap_err();
        assert_eq!(fields(err), ["email", "password", "role"]);

        let err = RegisterUserRequest::default().validate().unwrap_err();
        assert_eq!(fields(err), ["email", "password", "role"]);
    }

    #[test]
    fn login_requires_both_fields() {
        let err = LoginRequest {
            email: Some("a@clinic.test".into()),
            password: None,
        }
        .validate()
        .unwrap_err();
        assert_eq!(fields(err), ["password"]);
    }

    #[test]
    fn login_keeps_the_password_as_registered() {
        let registered = RegisterUserRequest {
            email: Some("sec@clinic.test".into()),
            password: Some(" secret ".into()),
            role: Some("Secretary".into()),
        }
        .validate()
        .unwrap();
        let credentials = LoginRequest {
            email: Some("sec@clinic.test".into()),
            password: Some(" secret ".into()),
        }
        .validate()
        .unwrap();
        assert_eq!(credentials.password, registered.password);

        let err = LoginRequest {
            email: Some("sec@clinic.test".into()),
            password: Some(String::new()),
        }
        .validate()
        .unwrap_err();
        assert_eq!(fields(err), ["password"]);
    }

    #[test]
    fn update_validates_only_present_fields() {
        let changes = UpdateUserRequest {
            email: Some("".into()),
            role: Some("Doctor".into()),
        }
        .validate()
        .unwrap();
        assert_eq!(changes.email, None);
        assert_eq!(changes.role, Some(Role::Doctor));

        let err = UpdateUserRequest {
            email: Some("broken".into()),
            role: Some("doctor".into()),
        }
        .validate()
        .unwrap_err();
        assert_eq!(fields(err), ["email", "role"]);
    }
}
