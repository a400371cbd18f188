use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde_json::Value;
use tracing::{info, instrument};

use crate::{auth::jwt::AuthUser, errors::ApiError, state::AppState};

use super::dto::SavedResponse;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/saveResume", post(save_resume))
        .route("/getResume", get(get_resume))
}

/// Overwrite the single stored document with whatever the client sent.
/// The store is a singleton: last write wins regardless of which
/// authenticated user performed it.
#[instrument(skip(state, claims, document))]
pub async fn save_resume(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Json(document): Json<Value>,
) -> Result<Json<SavedResponse>, ApiError> {
    state.resume.save(&document).await?;
    info!(user_id = %claims.id, "resume saved");
    Ok(Json(SavedResponse::ok()))
}

#[instrument(skip(state))]
pub async fn get_resume(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
) -> Result<Json<Value>, ApiError> {
    let document = state.resume.load().await?;
    Ok(Json(document))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::Claims;
    use crate::config::{AppConfig, DataConfig, JwtConfig};
    use serde_json::json;
    use std::path::Path;
    use std::sync::Arc;

    async fn make_state(dir: &Path) -> AppState {
        let config = Arc::new(AppConfig {
            data: DataConfig {
                users_file: dir.join("users.json"),
                login_logs_file: dir.join("login_logs.json"),
                resume_file: dir.join("resumes.json"),
            },
            jwt: JwtConfig {
                secret: "test-secret".into(),
                ttl_minutes: 60,
            },
        });
        AppState::open(config).await.expect("open state")
    }

    fn caller() -> AuthUser {
        AuthUser(Claims {
            id: 1,
            email: "a@b.com".into(),
            iat: 0,
            exp: usize::MAX,
        })
    }

    #[tokio::test]
    async fn get_on_fresh_store_returns_empty_object() {
        let dir = tempfile::tempdir().expect("tempdir");
        let state = make_state(dir.path()).await;

        let doc = get_resume(State(state), caller()).await.expect("get").0;
        assert_eq!(doc, json!({}));
    }

    #[tokio::test]
    async fn save_then_get_round_trips() {
        let dir = tempfile::tempdir().expect("tempdir");
        let state = make_state(dir.path()).await;

        let doc = json!({
            "name": "A",
            "email": "a@b.com",
            "skills": "Rust, axum",
            "unvalidated_extra": {"nested": true},
        });
        let res = save_resume(State(state.clone()), caller(), Json(doc.clone()))
            .await
            .expect("save");
        assert!(res.0.success);

        let loaded = get_resume(State(state), caller()).await.expect("get").0;
        assert_eq!(loaded, doc);
    }

    #[tokio::test]
    async fn save_overwrites_wholesale() {
        let dir = tempfile::tempdir().expect("tempdir");
        let state = make_state(dir.path()).await;

        save_resume(
            State(state.clone()),
            caller(),
            Json(json!({"name": "A", "summary": "kept?"})),
        )
        .await
        .expect("first save");
        save_resume(State(state.clone()), caller(), Json(json!({"name": "B"})))
            .await
            .expect("second save");

        let loaded = get_resume(State(state), caller()).await.expect("get").0;
        assert_eq!(loaded, json!({"name": "B"}));
    }
}
