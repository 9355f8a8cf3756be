//! Statically declared routes, present before (and regardless of) login.

use crate::route::{RouteDescriptor, RouteMeta};

/// The console's constant routes: redirect helper, login, and the home layout
/// with dashboard and error pages.
pub fn constant_routes() -> Vec<RouteDescriptor> {
    vec![
        RouteDescriptor::new("/redirect")
            .view("Layout")
            .meta(RouteMeta::default().hidden())
            .children(vec![
                RouteDescriptor::new("/redirect/:path(.*)").view("redirect/index"),
            ]),
        RouteDescriptor::new("/login")
            .view("login/index")
            .meta(RouteMeta::default().hidden()),
        RouteDescriptor::new("/")
            .named("/")
            .view("Layout")
            .redirect("/dashboard")
            .children(vec![
                RouteDescriptor::new("dashboard")
                    .named("Dashboard")
                    .view("dashboard/index")
                    .meta(
                        RouteMeta {
                            icon: Some("homepage".to_string()),
                            ..RouteMeta::default()
                        }
                        .titled("dashboard")
                        .affix()
                        .keep_alive(),
                    ),
                RouteDescriptor::new("401")
                    .view("error-page/401")
                    .meta(RouteMeta::default().hidden()),
                RouteDescriptor::new("404")
                    .view("error-page/404")
                    .meta(RouteMeta::default().hidden()),
            ]),
    ]
}
