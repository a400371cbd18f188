use axum::{
    extract::{FromRef, State},
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{LoginRequest, LoginResponse, SignupRequest, StatusResponse, TokenCheckResponse},
        jwt::{AuthUser, JwtKeys},
        password::{hash_password, verify_password, StoredCredential},
        repo_types::{LoginLogEntry, User},
    },
    errors::ApiError,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
}

pub fn session_routes() -> Router<AppState> {
    Router::new().route("/validateToken", get(validate_token))
}

pub fn audit_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route("/login-logs", get(list_login_logs))
}

#[instrument(skip(state, payload))]
pub async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> Result<Json<StatusResponse>, ApiError> {
    if payload.email.is_empty() || payload.password.is_empty() {
        warn!("signup with missing fields");
        return Err(ApiError::Validation("Email and password required".into()));
    }

    if state.users.find_by_email(&payload.email).await?.is_some() {
        warn!(email = %payload.email, "signup for existing email");
        return Err(ApiError::Conflict("User already exists".into()));
    }

    let hash = hash_password(&payload.password)?;
    let user = state.users.create(&payload.email, &hash).await?;

    info!(user_id = %user.id, email = %user.email, "user signed up");
    Ok(Json(StatusResponse::ok("Signup successful")))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    if payload.email.is_empty() || payload.password.is_empty() {
        warn!("login with missing fields");
        return Err(ApiError::Validation("Email and password required".into()));
    }

    let user = match state.users.find_by_email(&payload.email).await? {
        // First login for an unknown email doubles as signup.
        None => {
            let hash = hash_password(&payload.password)?;
            let user = state.users.create(&payload.email, &hash).await?;
            info!(user_id = %user.id, email = %user.email, "user created on first login");
            user
        }
        Some(user) => {
            check_credential(&state, &user, &payload.password).await?;
            user
        }
    };

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(user.id, &user.email)?;

    state.login_logs.append(user.id, &user.email).await?;

    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok(Json(LoginResponse {
        success: true,
        message: "Login successful".into(),
        token,
    }))
}

/// Verify a submitted password against the stored credential, upgrading a
/// legacy plaintext value to a hash when it matches.
async fn check_credential(state: &AppState, user: &User, password: &str) -> Result<(), ApiError> {
    let matched = match StoredCredential::parse(&user.password) {
        StoredCredential::Hashed(hash) => verify_password(password, hash)?,
        StoredCredential::Plaintext(stored) => {
            let matched = stored == password;
            if matched {
                let hash = hash_password(password)?;
                state.users.update_password(user.id, &hash).await?;
                info!(user_id = %user.id, "legacy plaintext credential upgraded to hash");
            }
            matched
        }
    };

    if !matched {
        warn!(user_id = %user.id, email = %user.email, "login invalid password");
        return Err(ApiError::Auth("Invalid credentials".into()));
    }
    Ok(())
}

#[instrument(skip(claims))]
pub async fn validate_token(AuthUser(claims): AuthUser) -> Json<TokenCheckResponse> {
    Json(TokenCheckResponse {
        success: true,
        valid: true,
        user: claims,
    })
}

#[instrument(skip(state))]
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>, ApiError> {
    let users = state.users.list().await?;
    Ok(Json(users))
}

#[instrument(skip(state))]
pub async fn list_login_logs(
    State(state): State<AppState>,
) -> Result<Json<Vec<LoginLogEntry>>, ApiError> {
    let logs = state.login_logs.list().await?;
    Ok(Json(logs))
}
