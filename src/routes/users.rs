use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{delete, get, post, put},
};

use crate::{
    dto::users::{LoginRequest, LoginResponse, RegisterUserRequest, UpdateUserRequest},
    error::AppResult,
    middleware::auth::{AdminOnly, Authorized},
    models::User,
    response::{MessageResponse, created, ok},
    routes::params::{IdPath, JsonBody},
    services::user_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register_user))
        .route("/login", post(login))
        .route("/allusers", get(list_users))
        .route("/edit/{id}", put(update_user))
        .route("/delete/{id}", delete(delete_user))
}

#[utoipa::path(
    post,
    path = "/users/register",
    request_body = RegisterUserRequest,
    responses(
        (status = 201, description = "User created", body = MessageResponse),
        (status = 400, description = "Invalid email, password or role"),
        (status = 403, description = "Caller is not an Admin"),
        (status = 409, description = "Email already registered"),
    ),
    tag = "Users"
)]
pub async fn register_user(
    admin: Authorized<AdminOnly>,
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<RegisterUserRequest>,
) -> AppResult<(StatusCode, Json<MessageResponse>)> {
    let new_user = payload.validate()?;
    tracing::debug!(admin_id = admin.user.user_id, email = %new_user.email, "registering user");
    user_service::register_user(&state, new_user).await?;
    Ok(created("User created successfully."))
}

#[utoipa::path(
    post,
    path = "/users/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session token and role", body = LoginResponse),
        (status = 403, description = "Wrong password"),
        (status = 404, description = "Unknown email"),
    ),
    security(()),
    tag = "Users"
)]
pub async fn login(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let credentials = payload.validate()?;
    let session = user_service::login_user(&state, credentials).await?;
    Ok(Json(session))
}

#[utoipa::path(
    get,
    path = "/users/allusers",
    responses(
        (status = 200, description = "Every staff account", body = Vec<User>),
    ),
    tag = "Users"
)]
pub async fn list_users(
    _admin: Authorized<AdminOnly>,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<User>>> {
    Ok(Json(user_service::list_users(&state).await?))
}

#[utoipa::path(
    put,
    path = "/users/edit/{id}",
    params(("id" = i32, Path, description = "User id")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = MessageResponse),
        (status = 400, description = "No fields provided or invalid values"),
        (status = 404, description = "User not found"),
    ),
    tag = "Users"
)]
pub async fn update_user(
    _admin: Authorized<AdminOnly>,
    State(state): State<AppState>,
    IdPath(id): IdPath<i32>,
    JsonBody(payload): JsonBody<UpdateUserRequest>,
) -> AppResult<Json<MessageResponse>> {
    let changes = payload.validate()?;
    user_service::update_user(&state, id, changes).await?;
    Ok(ok("User updated successfully."))
}

#[utoipa::path(
    delete,
    path = "/users/delete/{id}",
    params(("id" = i32, Path, description = "User id")),
    responses(
        (status = 200, description = "User deleted", body = MessageResponse),
        (status = 404, description = "User not found"),
    ),
    tag = "Users"
)]
pub async fn delete_user(
    _admin: Authorized<AdminOnly>,
    State(state): State<AppState>,
    IdPath(id): IdPath<i32>,
) -> AppResult<Json<MessageResponse>> {
    user_service::delete_user(&state, id).await?;
    Ok(ok("User deleted successfully."))
}
