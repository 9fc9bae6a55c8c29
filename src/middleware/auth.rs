use std::{marker::PhantomData, sync::Arc};

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{HeaderMap, header, request::Parts},
};

use crate::{auth::token::TokenKeys, error::AppError, models::Role};

/// Identity taken from a verified session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: i32,
    pub email: String,
    pub role: Role,
}

/// Admit only an exact role match.
pub fn ensure_role(user: &AuthUser, required: Role) -> Result<(), AppError> {
    if user.role != required {
        return Err(AppError::Forbidden(required));
    }
    Ok(())
}

/// Token from `Authorization: Bearer <token>`; `None` for a missing or malformed header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    if scheme != "Bearer" || token.is_empty() {
        return None;
    }
    Some(token)
}

impl<S> FromRequestParts<S> for AuthUser
where
    Arc<TokenKeys>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = Arc::<TokenKeys>::from_ref(state);
        keys.verify(bearer_token(&parts.headers))
    }
}

/// Names the single role an endpoint requires.
pub trait RequiredRole: Send + Sync + 'static {
    const ROLE: Role;
}

pub struct AdminOnly;
pub struct SecretaryOnly;
pub struct DoctorOnly;

impl RequiredRole for AdminOnly {
    const ROLE: Role = Role::Admin;
}

impl RequiredRole for SecretaryOnly {
    const ROLE: Role = Role::Secretary;
}

impl RequiredRole for DoctorOnly {
    const ROLE: Role = Role::Doctor;
}

/// Role gate: authenticates the caller, then requires `R::ROLE` from the token claims.
///
/// The legacy `current-role` request header is never consulted.
pub struct Authorized<R> {
    pub user: AuthUser,
    _role: PhantomData<fn() -> R>,
}

impl<R> Authorized<R> {
    pub fn into_inner(self) -> AuthUser {
        self.user
    }
}

impl<S, R> FromRequestParts<S> for Authorized<R>
where
    R: RequiredRole,
    Arc<TokenKeys>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if let Err(err) = ensure_role(&user, R::ROLE) {
            tracing::debug!(user_id = user.user_id, role = %user.role, required = %R::ROLE, "role gate rejected request");
            return Err(err);
        }
        Ok(Self {
            user,
            _role: PhantomData,
        })
    }
}
