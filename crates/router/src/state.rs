//! Session route state: the statically declared routes plus whatever the
//! last successful generation produced for the signed-in user.

use std::collections::HashSet;
use std::sync::{Arc, PoisonError, RwLock};

use thiserror::Error;

use console_auth::{Credential, RoleCode};
use console_core::ServiceError;

use crate::filter::{filter_routes, resolve_routes};
use crate::registry::ComponentRegistry;
use crate::route::{ResolvedRoute, RouteDescriptor};
use crate::service::RouteService;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RouteError {
    /// The route-listing call failed (network, auth, or payload decoding).
    #[error("route tree fetch failed: {0}")]
    RouteTreeFetchFailed(#[source] ServiceError),

    /// The payload decoded but violates the route tree's structure.
    #[error("invalid route tree: {0}")]
    InvalidRouteTree(String),
}

pub struct SessionRouteState {
    registry: Arc<ComponentRegistry>,
    service: Arc<dyn RouteService>,
    base_routes: Vec<ResolvedRoute>,
    dynamic_routes: RwLock<Vec<ResolvedRoute>>,
}

impl SessionRouteState {
    /// `base` is resolved once here and never filtered.
    pub fn new(
        registry: Arc<ComponentRegistry>,
        service: Arc<dyn RouteService>,
        base: &[RouteDescriptor],
    ) -> Self {
        let base_routes = resolve_routes(base, &registry);
        Self {
            registry,
            service,
            base_routes,
            dynamic_routes: RwLock::new(Vec::new()),
        }
    }

    pub fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }

    pub fn base_routes(&self) -> &[ResolvedRoute] {
        &self.base_routes
    }

    pub fn dynamic_routes(&self) -> Vec<ResolvedRoute> {
        self.dynamic_routes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Menu source: base routes followed by dynamic routes.
    pub fn routes(&self) -> Vec<ResolvedRoute> {
        let dynamic = self.dynamic_routes.read().unwrap_or_else(PoisonError::into_inner);
        self.base_routes.iter().chain(dynamic.iter()).cloned().collect()
    }

    pub fn set_dynamic_routes(&self, routes: Vec<ResolvedRoute>) {
        *self.dynamic_routes.write().unwrap_or_else(PoisonError::into_inner) = routes;
    }

    /// Fetch the declared route tree, filter it for `roles`, and keep the
    /// result as the dynamic routes.
    ///
    /// Errors are returned as-is; nothing is retried and the previous
    /// dynamic routes are left untouched on failure.
    pub async fn generate(
        &self,
        roles: &[RoleCode],
        credential: &Credential,
    ) -> Result<Vec<ResolvedRoute>, RouteError> {
        let declared = self
            .service
            .list_routes(credential)
            .await
            .map_err(RouteError::RouteTreeFetchFailed)?;

        validate_tree(&declared)?;

        let accessible = filter_routes(&declared, roles, &self.registry);
        tracing::info!(
            declared = declared.len(),
            accessible = accessible.len(),
            ?roles,
            "dynamic routes generated"
        );

        self.set_dynamic_routes(accessible.clone());
        Ok(accessible)
    }

    /// Children of the top-level route whose path equals `selector` (the
    /// active top-bar entry in the mixed layout). Empty if none matches.
    pub fn active_secondary_menu(&self, selector: &str) -> Vec<ResolvedRoute> {
        let dynamic = self.dynamic_routes.read().unwrap_or_else(PoisonError::into_inner);
        self.base_routes
            .iter()
            .chain(dynamic.iter())
            .find(|route| route.path == selector)
            .map(|route| route.children.clone())
            .unwrap_or_default()
    }

    /// Drop the dynamic routes (logout / token reset).
    pub fn reset(&self) {
        self.set_dynamic_routes(Vec::new());
    }
}

/// Reject trees with empty paths or duplicate sibling paths.
pub fn validate_tree(routes: &[RouteDescriptor]) -> Result<(), RouteError> {
    let mut seen = HashSet::new();
    for route in routes {
        if route.path.trim().is_empty() {
            return Err(RouteError::InvalidRouteTree(format!(
                "route {:?} has an empty path",
                route.name
            )));
        }
        if !seen.insert(route.path.as_str()) {
            return Err(RouteError::InvalidRouteTree(format!(
                "duplicate sibling path {}",
                route.path
            )));
        }
        validate_tree(&route.children)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use console_core::ServiceResult;

    use super::*;
    use crate::base::constant_routes;
    use crate::registry::View;
    use crate::route::RouteMeta;

    struct FixedRoutes(Mutex<ServiceResult<Vec<RouteDescriptor>>>);

    #[async_trait]
    impl RouteService for FixedRoutes {
        async fn list_routes(&self, _credential: &Credential) -> ServiceResult<Vec<RouteDescriptor>> {
            self.0.lock().unwrap().clone()
        }
    }

    fn state(result: ServiceResult<Vec<RouteDescriptor>>) -> SessionRouteState {
        SessionRouteState::new(
            Arc::new(ComponentRegistry::standard()),
            Arc::new(FixedRoutes(Mutex::new(result))),
            &constant_routes(),
        )
    }

    fn system_tree() -> Vec<RouteDescriptor> {
        vec![
            RouteDescriptor::new("/system")
                .view("Layout")
                .meta(RouteMeta::with_roles(["ADMIN", "EDITOR"]))
                .children(vec![
                    RouteDescriptor::new("user")
                        .view("system/user/index")
                        .meta(RouteMeta::with_roles(["EDITOR"])),
                    RouteDescriptor::new("role")
                        .view("system/role/index")
                        .meta(RouteMeta::with_roles(["ADMIN"])),
                ]),
        ]
    }

    fn credential() -> Credential {
        Credential::new("Bearer t")
    }

    #[tokio::test]
    async fn generate_filters_and_stores() {
        let state = state(Ok(system_tree()));
        let out = state.generate(&[RoleCode::new("EDITOR")], &credential()).await.unwrap();

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].children.len(), 1);
        assert_eq!(out[0].children[0].name, "user");
        assert_eq!(state.dynamic_routes(), out);
        assert_eq!(state.routes().len(), state.base_routes().len() + 1);
    }

    #[tokio::test]
    async fn generate_propagates_fetch_failure() {
        let state = state(Err(ServiceError::Http(401, "expired".to_string())));
        let err = state.generate(&[RoleCode::ADMIN], &credential()).await.unwrap_err();

        assert_eq!(
            err,
            RouteError::RouteTreeFetchFailed(ServiceError::Http(401, "expired".to_string()))
        );
        assert!(state.dynamic_routes().is_empty());
    }

    #[tokio::test]
    async fn generate_rejects_structurally_invalid_tree() {
        let tree = vec![RouteDescriptor::new("/a"), RouteDescriptor::new("/a")];
        let state = state(Ok(tree));

        assert!(matches!(
            state.generate(&[RoleCode::ADMIN], &credential()).await,
            Err(RouteError::InvalidRouteTree(_))
        ));
    }

    #[tokio::test]
    async fn secondary_menu_projects_children_of_selected_top_entry() {
        let state = state(Ok(system_tree()));
        state.generate(&[RoleCode::ADMIN], &credential()).await.unwrap();

        let menu = state.active_secondary_menu("/system");
        let names: Vec<&str> = menu.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["user", "role"]);

        let home = state.active_secondary_menu("/");
        assert_eq!(home[0].name, "Dashboard");

        assert!(state.active_secondary_menu("/nope").is_empty());
    }

    #[tokio::test]
    async fn reset_drops_dynamic_routes_only() {
        let state = state(Ok(system_tree()));
        state.generate(&[RoleCode::ADMIN], &credential()).await.unwrap();
        state.reset();

        assert!(state.dynamic_routes().is_empty());
        assert_eq!(state.routes().len(), state.base_routes().len());
    }

    #[test]
    fn base_routes_are_resolved_without_filtering() {
        let state = state(Ok(vec![]));
        let home = state
            .base_routes()
            .iter()
            .find(|r| r.path == "/")
            .unwrap();
        assert_eq!(home.view, View::Layout);
        assert_eq!(home.children[2].view, View::NotFound);
    }

    #[test]
    fn empty_child_path_is_invalid() {
        let tree = vec![RouteDescriptor::new("/a").children(vec![RouteDescriptor::new(" ")])];
        assert!(validate_tree(&tree).is_err());
    }
}
