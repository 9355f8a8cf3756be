use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use serde_json::json;

use console_auth::{Captcha, LoginData, TokenPair, UserProfile};
use console_client::Envelope;
use console_router::RouteDescriptor;

use crate::errors::{BAD_CAPTCHA, BAD_CREDENTIALS, envelope_error, unauthorized};
use crate::fixtures;

const TOKEN_TYPE: &str = "Bearer";

/// Issued tokens, outstanding captchas and the served route tree.
#[derive(Debug)]
pub struct MockState {
    routes: Vec<RouteDescriptor>,
    sessions: Mutex<HashMap<String, String>>,
    captchas: Mutex<HashMap<String, String>>,
}

impl Default for MockState {
    fn default() -> Self {
        Self::with_routes(fixtures::route_tree())
    }
}

impl MockState {
    pub fn with_routes(routes: Vec<RouteDescriptor>) -> Self {
        Self {
            routes,
            sessions: Mutex::new(HashMap::new()),
            captchas: Mutex::new(HashMap::new()),
        }
    }

    fn issue_captcha(&self) -> Captcha {
        let captcha_key = uuid::Uuid::now_v7().simple().to_string();
        self.captchas
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(captcha_key.clone(), fixtures::CAPTCHA_CODE.to_string());
        Captcha {
            captcha_key,
            verify_code_base64: fixtures::CAPTCHA_IMAGE.to_string(),
        }
    }

    /// Consume a captcha; each key answers at most one login attempt.
    fn redeem_captcha(&self, key: &str, code: &str) -> bool {
        self.captchas
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key)
            .is_some_and(|expected| expected.eq_ignore_ascii_case(code.trim()))
    }

    fn issue(&self, username: &str) -> String {
        let token = uuid::Uuid::now_v7().simple().to_string();
        self.sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(token.clone(), username.to_string());
        token
    }

    fn username(&self, token: &str) -> Option<String> {
        self.sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(token)
            .cloned()
    }

    fn revoke(&self, token: &str) -> bool {
        self.sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(token)
            .is_some()
    }

    pub fn active_sessions(&self) -> usize {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

pub fn build_app() -> Router {
    build_app_with(Arc::new(MockState::default()))
}

pub fn build_app_with(state: Arc<MockState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/v1/auth/captcha", get(captcha))
        .route("/api/v1/auth/login", post(login))
        .route("/api/v1/auth/logout", delete(logout))
        .route("/api/v1/users/me", get(current_user))
        .route("/api/v1/menus/routes", get(list_routes))
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn captcha(State(state): State<Arc<MockState>>) -> Json<Envelope<Captcha>> {
    Json(Envelope::ok(state.issue_captcha()))
}

async fn login(
    State(state): State<Arc<MockState>>,
    Json(form): Json<LoginData>,
) -> Result<Json<Envelope<TokenPair>>, Response> {
    if form.username.trim().is_empty() || form.password.is_empty() {
        return Err(envelope_error(
            StatusCode::OK,
            BAD_CREDENTIALS,
            "username or password is empty",
        ));
    }

    // Forms without a captcha key skip the check.
    if let Some(key) = form.captcha_key.as_deref() {
        let code = form.captcha_code.as_deref().unwrap_or_default();
        if !state.redeem_captcha(key, code) {
            return Err(envelope_error(StatusCode::OK, BAD_CAPTCHA, "captcha mismatch"));
        }
    }

    let access_token = state.issue(&form.username);
    tracing::info!(user = %form.username, "mock login");

    Ok(Json(Envelope::ok(TokenPair {
        access_token,
        token_type: TOKEN_TYPE.to_string(),
        refresh_token: None,
        expires: None,
    })))
}

async fn current_user(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
) -> Result<Json<Envelope<UserProfile>>, Response> {
    let username = authenticate(&state, &headers)?;
    Ok(Json(Envelope::ok(fixtures::profile_for(&username))))
}

async fn list_routes(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
) -> Result<Json<Envelope<Vec<RouteDescriptor>>>, Response> {
    authenticate(&state, &headers)?;
    Ok(Json(Envelope::ok(state.routes.clone())))
}

async fn logout(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
) -> Result<Json<Envelope<serde_json::Value>>, Response> {
    let token = bearer(&headers).ok_or_else(unauthorized)?;
    if !state.revoke(token) {
        return Err(unauthorized());
    }
    Ok(Json(Envelope::ok(json!({}))))
}

fn authenticate(state: &MockState, headers: &HeaderMap) -> Result<String, Response> {
    bearer(headers)
        .and_then(|token| state.username(token))
        .ok_or_else(unauthorized)
}

fn bearer(headers: &HeaderMap) -> Option<&str> {
    let token = headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")?
        .trim();
    (!token.is_empty()).then_some(token)
}
