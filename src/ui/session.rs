//! Per-browser UI state and the in-memory store mapping cookie tokens to it.

use std::{collections::HashMap, sync::Arc};

use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::auth::ClientState;
use crate::database::models::{Project, Role, User};
use crate::database::{Repositories, Repository};
use crate::schema::Entity;
use crate::ui::editor::FormView;
use crate::ui::list::{GridView, ListPresenter};
use crate::ui::messages::Messages;

/// Name of the cookie carrying the session token
pub const SESSION_COOKIE: &str = "limbr_session";

pub type SessionToken = String;

/// List screen plus editor for one entity type, backed by HTML form models
pub type Console<E> = ListPresenter<E, FormView<E>, GridView<E>>;

/// Everything one logged-in browser is looking at
pub struct UiSession {
    pub client: ClientState,
    users: Console<User>,
    projects: Console<Project>,
    roles: Console<Role>,
}

impl UiSession {
    pub fn new(repositories: &Repositories, messages: &Messages) -> Self {
        Self {
            client: ClientState::default(),
            users: console(repositories.users.clone(), messages),
            projects: console(repositories.projects.clone(), messages),
            roles: console(repositories.roles.clone(), messages),
        }
    }

    pub fn console<E: Managed>(&self) -> &Console<E> {
        E::console(self)
    }

    pub fn console_mut<E: Managed>(&mut self) -> &mut Console<E> {
        E::console_mut(self)
    }
}

fn console<E: Entity>(repository: Arc<dyn Repository<E>>, messages: &Messages) -> Console<E> {
    ListPresenter::new(repository, FormView::new(), GridView::new(messages), messages)
}

/// Entity types that have a screen in the console
pub trait Managed: Entity {
    /// Message key of the navigation button
    const NAVIGATION_KEY: &'static str;

    fn console(session: &UiSession) -> &Console<Self>;

    fn console_mut(session: &mut UiSession) -> &mut Console<Self>;
}

impl Managed for User {
    const NAVIGATION_KEY: &'static str = "usersNavigationLabel";

    fn console(session: &UiSession) -> &Console<Self> {
        &session.users
    }

    fn console_mut(session: &mut UiSession) -> &mut Console<Self> {
        &mut session.users
    }
}

impl Managed for Project {
    const NAVIGATION_KEY: &'static str = "projectsNavigationLabel";

    fn console(session: &UiSession) -> &Console<Self> {
        &session.projects
    }

    fn console_mut(session: &mut UiSession) -> &mut Console<Self> {
        &mut session.projects
    }
}

impl Managed for Role {
    const NAVIGATION_KEY: &'static str = "rolesNavigationLabel";

    fn console(session: &UiSession) -> &Console<Self> {
        &session.roles
    }

    fn console_mut(session: &mut UiSession) -> &mut Console<Self> {
        &mut session.roles
    }
}

/// In-memory session store. Sessions are lost on restart.
///
/// Each session sits behind its own mutex, so requests of one browser are
/// handled one at a time while different browsers proceed independently.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<SessionToken, Arc<Mutex<UiSession>>>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `session` under a fresh random token
    pub async fn create_session(&self, session: UiSession) -> SessionToken {
        let token = Uuid::new_v4().to_string();
        let mut sessions = self.sessions.write().await;
        sessions.insert(token.clone(), Arc::new(Mutex::new(session)));
        token
    }

    pub async fn get_session(&self, token: &str) -> Option<Arc<Mutex<UiSession>>> {
        let sessions = self.sessions.read().await;
        sessions.get(token).cloned()
    }

    pub async fn destroy_session(&self, token: &str) {
        let mut sessions = self.sessions.write().await;
        sessions.remove(token);
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::list::ListView;

    #[tokio::test]
    async fn sessions_are_created_and_destroyed() {
        let store = SessionStore::new();
        let repositories = Repositories::in_memory();

        let token = store.create_session(UiSession::new(&repositories, &Messages::defaults())).await;
        assert_eq!(store.session_count().await, 1);
        assert!(store.get_session(&token).await.is_some());
        assert!(store.get_session("unknown").await.is_none());

        store.destroy_session(&token).await;
        assert!(store.get_session(&token).await.is_none());
    }

    #[tokio::test]
    async fn consoles_are_resolved_per_type() {
        let repositories = Repositories::in_memory();
        repositories.projects.save(Project::new("Alpha")).await.unwrap();
        let mut session = UiSession::new(&repositories, &Messages::defaults());

        session.console_mut::<Project>().refresh().await.unwrap();
        session.console_mut::<User>().refresh().await.unwrap();

        assert_eq!(session.console::<Project>().view().items().len(), 1);
        assert!(session.console::<User>().view().items().is_empty());
    }
}
