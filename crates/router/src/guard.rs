//! Navigation guard: runs before every navigation attempt.
//!
//! State machine per attempt:
//!
//! | state                      | target                 | outcome                                   |
//! |----------------------------|------------------------|-------------------------------------------|
//! | anonymous                  | allow-listed           | allow                                     |
//! | anonymous                  | anything else          | login, carrying `redirect=<target path>`  |
//! | authenticated              | login page             | home                                      |
//! | authenticated, no roles    | anything else          | load roles + mount routes, re-dispatch    |
//! | authenticated, with roles  | unmatched              | origin's named route, else not-found page |
//! | authenticated, with roles  | matched                | allow                                     |
//!
//! Loading roles is single-flight: concurrent attempts wait for the one in
//! progress and reuse its result instead of fetching again.

use std::sync::{Arc, PoisonError, RwLock};

use thiserror::Error;
use tokio::sync::Mutex;

use console_auth::{AuthError, UserSession};
use console_core::{SessionId, Settings};

use crate::navigation::{GuardOutcome, Location, NavigationTarget};
use crate::state::{RouteError, SessionRouteState};
use crate::table::RouteTable;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    Anonymous,
    AuthenticatedNoRoles,
    AuthenticatedWithRoles,
}

/// Failure while loading roles. Never surfaced by the guard itself: it turns
/// into a session reset and a login redirect.
#[derive(Debug, Error)]
pub enum GuardError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Route(#[from] RouteError),
}

pub struct NavigationGuard {
    settings: Arc<Settings>,
    user: Arc<UserSession>,
    routes: Arc<SessionRouteState>,
    table: Arc<RouteTable>,
    roles_loading: Mutex<()>,
    /// Session whose routes are currently mounted.
    loaded_for: RwLock<Option<SessionId>>,
}

impl NavigationGuard {
    pub fn new(
        settings: Arc<Settings>,
        user: Arc<UserSession>,
        routes: Arc<SessionRouteState>,
        table: Arc<RouteTable>,
    ) -> Self {
        Self {
            settings,
            user,
            routes,
            table,
            roles_loading: Mutex::new(()),
            loaded_for: RwLock::new(None),
        }
    }

    pub fn state(&self) -> GuardState {
        if !self.user.has_credential() {
            GuardState::Anonymous
        } else if self.roles_loaded() {
            GuardState::AuthenticatedWithRoles
        } else {
            GuardState::AuthenticatedNoRoles
        }
    }

    fn roles_loaded(&self) -> bool {
        let loaded = *self.loaded_for.read().unwrap_or_else(PoisonError::into_inner);
        loaded.is_some() && loaded == self.user.session_id() && self.user.has_roles()
    }

    /// Decide one navigation attempt from `from` to `to`.
    pub async fn before_each(&self, from: &Location, to: &NavigationTarget) -> GuardOutcome {
        let state = self.state();
        tracing::debug!(from = %from.path, to = %to.path, ?state, "navigation attempt");

        match state {
            GuardState::Anonymous => {
                if self.settings.is_allow_listed(&to.path) {
                    GuardOutcome::Allow
                } else {
                    self.login_redirect(to)
                }
            }
            _ if to.path == self.settings.login_path => {
                GuardOutcome::Redirect(NavigationTarget::new(self.settings.home_path.clone()))
            }
            GuardState::AuthenticatedNoRoles => match self.load_roles().await {
                Ok(()) => GuardOutcome::Redispatch(to.clone().replacing()),
                Err(err) => {
                    tracing::warn!(error = %err, to = %to.path, "failed to load roles; forcing re-authentication");
                    self.login_redirect(to)
                }
            },
            GuardState::AuthenticatedWithRoles => {
                if self.table.match_path(&to.path).is_some() {
                    return GuardOutcome::Allow;
                }
                tracing::debug!(to = %to.path, "no route matched");
                match &from.name {
                    Some(name) => GuardOutcome::RedirectToName(name.clone()),
                    None => GuardOutcome::Redirect(NavigationTarget::new(
                        self.settings.not_found_path.clone(),
                    )),
                }
            }
        }
    }

    /// Fetch the profile, generate and mount the routes: at most once per
    /// session. On failure the whole session is reset before the lock is
    /// released, so waiters see an anonymous session instead of retrying.
    async fn load_roles(&self) -> Result<(), GuardError> {
        let _flight = self.roles_loading.lock().await;

        if self.roles_loaded() {
            tracing::debug!("roles loaded by a concurrent navigation");
            return Ok(());
        }

        let result = self.fetch_and_mount().await;
        if result.is_err() {
            self.reset_session();
        }
        result
    }

    async fn fetch_and_mount(&self) -> Result<(), GuardError> {
        let profile = self.user.fetch_profile().await?;
        let credential = self.user.credential().ok_or(AuthError::MissingCredential)?;

        let accessible = self.routes.generate(&profile.roles, &credential).await?;

        self.table.reset();
        self.table.add_routes(accessible);

        let session_id = self.user.session_id();
        *self.loaded_for.write().unwrap_or_else(PoisonError::into_inner) = session_id;
        tracing::info!(
            session = ?session_id,
            user_id = profile.user_id,
            "session routes mounted"
        );
        Ok(())
    }

    /// Log out and drop every piece of session-derived state.
    pub async fn logout(&self) -> Result<(), AuthError> {
        let _flight = self.roles_loading.lock().await;
        let result = self.user.logout().await;
        self.clear_routes();
        result
    }

    fn reset_session(&self) {
        if let Err(err) = self.user.reset_token() {
            tracing::error!(error = %err, "failed to clear credential");
        }
        self.clear_routes();
    }

    fn clear_routes(&self) {
        self.routes.reset();
        self.table.reset();
        *self.loaded_for.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    fn login_redirect(&self, to: &NavigationTarget) -> GuardOutcome {
        GuardOutcome::Redirect(
            NavigationTarget::new(self.settings.login_path.clone()).with_query("redirect", to.path.clone()),
        )
    }
}
