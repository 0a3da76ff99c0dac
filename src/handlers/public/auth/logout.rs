// handlers/public/auth/logout.rs - POST /logout

use axum::{extract::State, response::Redirect};
use tower_cookies::{Cookie, Cookies};
use tracing::info;

use crate::handlers::AppState;
use crate::ui::SESSION_COOKIE;

/// POST /logout - drop the session and its cookie
pub async fn logout_post(State(state): State<AppState>, cookies: Cookies) -> Redirect {
    if let Some(cookie) = cookies.get(SESSION_COOKIE) {
        if let Some(session) = state.sessions.get_session(cookie.value()).await {
            let mut session = session.lock().await;
            if let Some(name) = session.client.username() {
                info!("User '{}' logged out", name);
            }
            session.client.log_out();
        }
        state.sessions.destroy_session(cookie.value()).await;

        let mut removal = Cookie::from(SESSION_COOKIE);
        removal.set_path("/");
        cookies.remove(removal);
    }
    Redirect::to("/login")
}
