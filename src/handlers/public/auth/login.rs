// handlers/public/auth/login.rs - GET and POST /login

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;
use tower_cookies::{Cookie, Cookies};
use tracing::{info, warn};

use crate::database::models::User;
use crate::error::AdminError;
use crate::handlers::AppState;
use crate::schema::Entity;
use crate::ui::{templates, UiSession, SESSION_COOKIE};

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    username: String,
    #[serde(default)]
    password: String,
}

/// GET /login - show the login form, or skip it when the session is still valid
pub async fn login_get(State(state): State<AppState>, cookies: Cookies) -> Response {
    if let Some(cookie) = cookies.get(SESSION_COOKIE) {
        if state.sessions.get_session(cookie.value()).await.is_some() {
            return Redirect::to(&format!("/{}", User::TABLE)).into_response();
        }
    }

    Html(templates::login_page(&state.title, &state.messages, None)).into_response()
}

/// POST /login - check the password against the stored salted hash
pub async fn login_post(
    State(state): State<AppState>,
    cookies: Cookies,
    Form(form): Form<LoginForm>,
) -> Result<Response, AdminError> {
    let username = form.username.trim();

    let Some(user) = state.accounts().authenticate(username, &form.password).await? else {
        warn!("Failed login for '{}'", username);
        let page = templates::login_page(&state.title, &state.messages, Some(&state.messages.get("loginFailed")));
        return Ok((StatusCode::UNAUTHORIZED, Html(page)).into_response());
    };

    let mut session = UiSession::new(&state.repositories, &state.messages);
    session.client.log_in(user.username.clone());
    let token = state.sessions.create_session(session).await;

    let mut cookie = Cookie::new(SESSION_COOKIE, token);
    cookie.set_http_only(true);
    cookie.set_path("/");
    cookie.set_secure(state.secure_cookies);
    cookies.add(cookie);

    info!("User '{}' logged in", user.username);
    Ok(Redirect::to(&format!("/{}", User::TABLE)).into_response())
}
