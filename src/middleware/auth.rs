use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_cookies::Cookies;
use tracing::debug;

use crate::auth::PrivilegeLevel;
use crate::error::AdminError;
use crate::handlers::AppState;
use crate::ui::{UiSession, SESSION_COOKIE};

/// Session of the logged-in browser, inserted into request extensions
#[derive(Clone)]
pub struct CurrentSession(pub Arc<Mutex<UiSession>>);

/// Privilege gate for console screens: requires a session at `PrivilegeLevel::Admin`.
/// Anything less is redirected to the login page.
pub async fn require_admin(
    State(state): State<AppState>,
    cookies: Cookies,
    mut request: Request,
    next: Next,
) -> Result<Response, AdminError> {
    let token = cookies
        .get(SESSION_COOKIE)
        .map(|c| c.value().to_string())
        .ok_or(AdminError::Unauthorized)?;

    let session = state.sessions.get_session(&token).await.ok_or_else(|| {
        debug!("Unknown session token on {}", request.uri().path());
        AdminError::Unauthorized
    })?;

    let level = session.lock().await.client.user_level();
    if level < PrivilegeLevel::Admin {
        debug!("Privilege {:?} too low for {}", level, request.uri().path());
        return Err(AdminError::Unauthorized);
    }

    request.extensions_mut().insert(CurrentSession(session));
    Ok(next.run(request).await)
}
