use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use tracing::{info, instrument, warn};

use crate::{
    auth::dto::{is_valid_username, AuthCredentials, SignInResponse},
    error::AuthError,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/signin", post(signin))
}

#[instrument(skip(state, payload))]
pub async fn signup(
    State(state): State<AppState>,
    Json(mut payload): Json<AuthCredentials>,
) -> Result<StatusCode, AuthError> {
    payload.username = payload.username.trim().to_string();

    if !is_valid_username(&payload.username) {
        warn!(username = %payload.username, "invalid username");
        return Err(AuthError::InvalidInput(
            "Username must be 4 to 20 characters without spaces".into(),
        ));
    }

    state.users.sign_up(&payload).await?;
    Ok(StatusCode::CREATED)
}

#[instrument(skip(state, payload))]
pub async fn signin(
    State(state): State<AppState>,
    Json(mut payload): Json<AuthCredentials>,
) -> Result<Json<SignInResponse>, AuthError> {
    payload.username = payload.username.trim().to_string();

    match state.users.validate_user_password(&payload).await? {
        Some(username) => {
            info!(%username, "user signed in");
            Ok(Json(SignInResponse { username }))
        }
        None => {
            warn!(username = %payload.username, "sign-in rejected");
            Err(AuthError::InvalidCredentials)
        }
    }
}
