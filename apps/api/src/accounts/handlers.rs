//! Axum route handlers for registration, login, logout and the session probe.

use axum::{extract::State, response::Redirect, Form, Json};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::account::AccountSummary;
use crate::sessions::cookie::{clear_session, session_cookie, session_token};
use crate::state::AppState;

// Missing form fields deserialize as empty strings so they surface as
// validation errors rather than extractor rejections.

#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub number: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<AccountSummary>,
}

/// POST /register
pub async fn handle_register(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<RegisterForm>,
) -> Result<(CookieJar, Redirect), AppError> {
    let account_id = state
        .accounts
        .register(&form.name, &form.email, &form.password, &form.number)
        .await?;

    let jar = replace_session(&state, jar, account_id).await?;
    Ok((jar, Redirect::to("/success")))
}

/// POST /login
pub async fn handle_login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<(CookieJar, Redirect), AppError> {
    let account_id = state
        .accounts
        .authenticate(&form.email, &form.password)
        .await?;

    let jar = replace_session(&state, jar, account_id).await?;
    Ok((jar, Redirect::to("/")))
}

/// Revokes whatever session the browser carried, then issues one for `account_id`.
async fn replace_session(
    state: &AppState,
    jar: CookieJar,
    account_id: Uuid,
) -> Result<CookieJar, AppError> {
    if let Some(previous) = session_token(&jar) {
        if let Err(e) = state.sessions.revoke(&previous).await {
            warn!("Could not revoke previous session: {e}");
        }
    }

    let token = state.sessions.issue(account_id).await?;
    Ok(jar.add(session_cookie(token, state.config.environment.is_production())))
}

/// GET /logout
///
/// Always clears the cookie and redirects, even if the store could not be reached.
pub async fn handle_logout(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Redirect) {
    if let Some(token) = session_token(&jar) {
        if let Err(e) = state.sessions.revoke(&token).await {
            warn!("Could not revoke session on logout: {e}");
        }
    }
    (clear_session(jar), Redirect::to("/"))
}

/// GET /api/v1/session
pub async fn handle_current_session(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Json<SessionResponse>, AppError> {
    let anonymous = Json(SessionResponse {
        authenticated: false,
        account: None,
    });

    let Some(token) = session_token(&jar) else {
        return Ok(anonymous);
    };
    let Some(account_id) = state.sessions.resolve(&token).await? else {
        return Ok(anonymous);
    };

    match state.accounts.find(account_id).await? {
        Some(account) => Ok(Json(SessionResponse {
            authenticated: true,
            account: Some(account.into()),
        })),
        None => {
            warn!(account_id = %account_id, "Session refers to a missing account");
            Ok(anonymous)
        }
    }
}
