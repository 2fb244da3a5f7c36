use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Reports whether both backing stores answer. 503 while either is down.
pub async fn health_handler(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let (db_ready, sessions_ready) =
        tokio::join!(state.accounts.is_ready(), state.sessions.is_ready());

    let status = if db_ready && sessions_ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(json!({
            "status": if status == StatusCode::OK { "ok" } else { "degraded" },
            "dbConnection": connection_label(db_ready),
            "sessionStore": connection_label(sessions_ready),
            "version": env!("CARGO_PKG_VERSION"),
        })),
    )
}

fn connection_label(ready: bool) -> &'static str {
    if ready {
        "connected"
    } else {
        "disconnected"
    }
}
