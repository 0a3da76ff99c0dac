// handlers/mod.rs - Console routes in two tiers
//
// Public (no session) -> Protected (logged-in session with admin privilege)

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_cookies::CookieManagerLayer;
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::database::models::{Project, Role, User};
use crate::database::Repositories;
use crate::middleware::require_admin;
use crate::services::AccountService;
use crate::ui::{Managed, Messages, SessionStore};

pub mod protected; // Entity screens, admin only
pub mod public; // Login, logout, error page and health

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub repositories: Repositories,
    pub sessions: SessionStore,
    pub messages: Arc<Messages>,
    pub title: Arc<str>,
    pub secure_cookies: bool,
}

impl AppState {
    pub fn new(repositories: Repositories, messages: Messages, config: &AppConfig) -> Self {
        Self {
            repositories,
            sessions: SessionStore::new(),
            messages: Arc::new(messages),
            title: Arc::from(config.ui.title.as_str()),
            secure_cookies: config.security.secure_cookies,
        }
    }

    pub fn accounts(&self) -> AccountService {
        AccountService::new(self.repositories.users.clone())
    }
}

/// Build the console router
pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .merge(entity_routes::<User>())
        .merge(entity_routes::<Project>())
        .merge(entity_routes::<Role>())
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));

    Router::new()
        .route("/", get(public::root_get))
        .route("/health", get(public::health_get))
        .route("/error", get(public::error_get))
        .route("/login", get(public::auth::login_get).post(public::auth::login_post))
        .route("/logout", post(public::auth::logout_post))
        .merge(protected)
        .layer(CookieManagerLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// List, create, edit and editor-action routes of one entity screen
fn entity_routes<E: Managed>() -> Router<AppState> {
    use protected::entity;

    let base = format!("/{}", E::TABLE);
    Router::new()
        .route(&base, get(entity::list_get::<E>))
        .route(&format!("{}/new", base), get(entity::new_get::<E>))
        .route(&format!("{}/:id/edit", base), get(entity::edit_get::<E>))
        .route(&format!("{}/editor", base), post(entity::editor_post::<E>))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::database::Repository;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use tower::ServiceExt;

    fn app() -> (Router, AppState) {
        let state = AppState::new(Repositories::in_memory(), Messages::defaults(), &AppConfig::development());
        (router(state.clone()), state)
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    async fn login(app: &Router, state: &AppState) -> String {
        state.accounts().create_user("root", "", "toor").await.unwrap();
        let response = app
            .clone()
            .oneshot(
                Request::post("/login")
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from("username=root&password=toor"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        cookie.split(';').next().unwrap().to_string()
    }

    #[tokio::test]
    async fn health_reports_storage() {
        let (app, _) = app();
        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(json["data"]["storage"], "memory");
    }

    #[tokio::test]
    async fn entity_screens_require_login() {
        let (app, _) = app();
        for path in ["/users", "/projects/new", "/roles/1/edit"] {
            let response = app
                .clone()
                .oneshot(Request::get(path).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::SEE_OTHER, "{}", path);
            assert_eq!(response.headers()[header::LOCATION], "/login");
        }
    }

    #[tokio::test]
    async fn error_page_is_public() {
        let (app, _) = app();
        let response = app
            .oneshot(Request::get("/error").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("An error occurred"));
    }

    #[tokio::test]
    async fn bad_login_is_rejected() {
        let (app, _) = app();
        let response = app
            .oneshot(
                Request::post("/login")
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from("username=nobody&password=x"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(body_text(response).await.contains("Invalid username or password"));
    }

    #[tokio::test]
    async fn logged_in_session_creates_and_lists_projects() {
        let (app, state) = app();
        let cookie = login(&app, &state).await;

        let response = app
            .clone()
            .oneshot(Request::get("/projects/new").header(header::COOKIE, &cookie).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let response = app
            .clone()
            .oneshot(
                Request::post("/projects/editor")
                    .header(header::COOKIE, &cookie)
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from("action=save&name=Apollo&description=&status=active"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/projects");

        let response = app
            .oneshot(
                Request::get("/projects?filter=apo")
                    .header(header::COOKIE, &cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let html = body_text(response).await;
        assert!(html.contains(r#"<a href="/projects/1/edit">Apollo</a>"#));
        assert!(!html.contains(r#"class="window""#));
    }

    #[tokio::test]
    async fn invalid_choice_renders_error_page() {
        let (app, state) = app();
        let cookie = login(&app, &state).await;

        app.clone()
            .oneshot(Request::get("/roles/new").header(header::COOKIE, &cookie).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let response = app
            .oneshot(
                Request::post("/roles/editor")
                    .header(header::COOKIE, &cookie)
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from("action=save&name=ops&privilege_level=root"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_text(response).await.contains("An error occurred"));
        assert!(state.repositories.roles.find_all().await.unwrap().is_empty());
    }
}
