//! Navigator: drives one navigation intent through the guard until it lands.

use std::sync::{Arc, PoisonError, RwLock};

use thiserror::Error;

use console_core::Settings;

use crate::guard::NavigationGuard;
use crate::navigation::{GuardOutcome, Location, NavigationTarget};
use crate::table::{RouteMatch, RouteTable};
use crate::tabs::{TabHistory, TagView};

/// Hops a single navigation may take before it is abandoned.
pub const MAX_REDIRECTS: usize = 10;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NavigationError {
    #[error("navigation to {target} exceeded {} redirects", MAX_REDIRECTS)]
    TooManyRedirects { target: String },
}

/// Where a navigation ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationReport {
    pub location: Location,
    pub target: NavigationTarget,
    /// `None` when an allow-listed path has no registered route.
    pub matched: Option<RouteMatch>,
    /// Redirects and re-dispatches taken on the way.
    pub hops: usize,
}

impl NavigationReport {
    pub fn full_path(&self) -> String {
        self.target.full_path()
    }
}

pub struct Navigator {
    guard: Arc<NavigationGuard>,
    table: Arc<RouteTable>,
    tabs: Arc<TabHistory>,
    settings: Arc<Settings>,
    current: RwLock<Location>,
}

impl Navigator {
    pub fn new(
        guard: Arc<NavigationGuard>,
        table: Arc<RouteTable>,
        tabs: Arc<TabHistory>,
        settings: Arc<Settings>,
    ) -> Self {
        Self {
            guard,
            table,
            tabs,
            settings,
            current: RwLock::new(Location::start()),
        }
    }

    pub fn current(&self) -> Location {
        self.current.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn guard(&self) -> &NavigationGuard {
        &self.guard
    }

    pub fn tabs(&self) -> &TabHistory {
        &self.tabs
    }

    /// Navigate from the current location.
    pub async fn push(
        &self,
        to: impl Into<NavigationTarget>,
    ) -> Result<NavigationReport, NavigationError> {
        let from = self.current();
        self.navigate(&from, to.into()).await
    }

    /// Run the guard for `to`, following its redirects, and commit the final
    /// location.
    pub async fn navigate(
        &self,
        from: &Location,
        to: NavigationTarget,
    ) -> Result<NavigationReport, NavigationError> {
        let mut target = to;

        for hops in 0..=MAX_REDIRECTS {
            let next = match self.guard.before_each(from, &target).await {
                GuardOutcome::Allow => {
                    let matched = self.table.match_path(&target.path);
                    match matched.as_ref().and_then(|m| m.leaf().redirect.clone()) {
                        Some(redirect) => NavigationTarget::parse(&redirect),
                        None => return Ok(self.commit(target, matched, hops)),
                    }
                }
                GuardOutcome::Redirect(next) | GuardOutcome::Redispatch(next) => next,
                GuardOutcome::RedirectToName(name) => {
                    match self.table.path_for_name(&name, &from.params) {
                        Some(path) => NavigationTarget::new(path),
                        None => {
                            tracing::warn!(%name, "redirect to unknown route name");
                            NavigationTarget::new(self.settings.not_found_path.clone())
                        }
                    }
                }
            };
            tracing::debug!(from = %target, to = %next, "navigation redirected");
            target = next;
        }

        tracing::error!(path = %target, "navigation redirect loop");
        Err(NavigationError::TooManyRedirects {
            target: target.full_path(),
        })
    }

    fn commit(
        &self,
        target: NavigationTarget,
        matched: Option<RouteMatch>,
        hops: usize,
    ) -> NavigationReport {
        let location = Location {
            path: target.path.clone(),
            name: matched.as_ref().map(|m| m.leaf().name.clone()),
            params: matched.as_ref().map(|m| m.params.clone()).unwrap_or_default(),
        };

        let titled_leaf = matched
            .as_ref()
            .map(RouteMatch::leaf)
            .filter(|leaf| leaf.meta.as_ref().is_some_and(|meta| meta.title.is_some()));
        if let (true, Some(leaf)) = (self.settings.tags_view, titled_leaf) {
            self.tabs.add_view(&TagView::from_match(&target, leaf));
        }

        *self.current.write().unwrap_or_else(PoisonError::into_inner) = location.clone();
        tracing::info!(path = %target, hops, "navigation complete");

        NavigationReport {
            location,
            target,
            matched,
            hops,
        }
    }
}
