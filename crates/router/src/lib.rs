//! `console-router`: role-gated route trees and the navigation guard.
//!
//! The backend declares a route tree; [`filter_routes`] prunes it for the
//! signed-in roles, [`SessionRouteState`] keeps the result, and
//! [`NavigationGuard`] decides every navigation attempt against the live
//! [`RouteTable`].

pub mod base;
pub mod filter;
pub mod guard;
pub mod navigation;
pub mod navigator;
pub mod registry;
pub mod route;
pub mod service;
pub mod state;
pub mod table;
pub mod tabs;

pub use base::constant_routes;
pub use filter::{filter_routes, resolve_routes};
pub use guard::{GuardError, GuardState, NavigationGuard};
pub use navigation::{GuardOutcome, Location, NavigationTarget};
pub use navigator::{MAX_REDIRECTS, NavigationError, NavigationReport, Navigator};
pub use registry::{ComponentRegistry, LAYOUT_KEY, NOT_FOUND_KEY, STANDARD_VIEWS, View, ViewUnit};
pub use route::{ResolvedRoute, RouteDescriptor, RouteMeta};
pub use service::RouteService;
pub use state::{RouteError, SessionRouteState, validate_tree};
pub use table::{MatchedRecord, RouteMatch, RouteTable};
pub use tabs::{TabHistory, TabsSnapshot, TagView};
