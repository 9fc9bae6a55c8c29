use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::{
    auth::password::{hash_password, verify_password},
    db::{bounded, update::PartialUpdate},
    dto::users::{Credentials, LoginResponse, NewUser, UserChanges},
    entity::{
        Users,
        users::{ActiveModel, Column, Model as UserModel},
    },
    error::{AppError, AppResult},
    models::User,
    services::{duplicate_user, ensure_found},
    state::AppState,
};

pub async fn register_user(state: &AppState, payload: NewUser) -> AppResult<User> {
    let NewUser {
        email,
        password,
        role,
    } = payload;
    let password = hash_password(password).await?;

    let active = ActiveModel {
        id: NotSet,
        email: Set(email),
        password: Set(password),
        role: Set(role),
        created_at: Set(Utc::now().into()),
    };
    let user = bounded(state.store_timeout, active.insert(&state.orm))
        .await
        .map_err(duplicate_user)?;

    tracing::info!(user_id = user.id, role = %user.role, "user created");
    Ok(user_from_entity(user))
}

/// Unknown email is `NotFound`; a wrong password is `InvalidCredentials`.
pub async fn login_user(state: &AppState, payload: Credentials) -> AppResult<LoginResponse> {
    let Credentials { email, password } = payload;
    let user = bounded(
        state.store_timeout,
        Users::find()
            .filter(Column::Email.eq(email.as_str()))
            .one(&state.orm),
    )
    .await?
    .ok_or_else(|| {
        tracing::debug!("login for unknown email");
        AppError::NotFound("User")
    })?;

    if !verify_password(password, user.password.clone()).await? {
        tracing::debug!(user_id = user.id, "login with wrong password");
        return Err(AppError::InvalidCredentials);
    }

    let token = state.tokens.issue(user.id, &user.email, user.role)?;
    Ok(LoginResponse {
        token,
        role: user.role,
    })
}

pub async fn list_users(state: &AppState) -> AppResult<Vec<User>> {
    let users = bounded(
        state.store_timeout,
        Users::find().order_by_asc(Column::Id).all(&state.orm),
    )
    .await?;
    Ok(users.into_iter().map(user_from_entity).collect())
}

pub async fn update_user(state: &AppState, id: i32, changes: UserChanges) -> AppResult<()> {
    let update = PartialUpdate::table("users")
        .set("email", changes.email)
        .set("role", changes.role);
    let rows = bounded(state.store_timeout, update.execute(&state.pool, id))
        .await
        .map_err(duplicate_user)?;
    ensure_found(rows, "User")
}

pub async fn delete_user(state: &AppState, id: i32) -> AppResult<()> {
    let result = bounded(state.store_timeout, Users::delete_by_id(id).exec(&state.orm)).await?;
    ensure_found(result.rows_affected, "User")
}

fn user_from_entity(model: UserModel) -> User {
    User {
        id: model.id,
        email: model.email,
        role: model.role,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
