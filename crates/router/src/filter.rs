//! Role-based route tree filtering and view resolution.

use console_auth::{RoleCode, evaluate};

use crate::registry::{ComponentRegistry, LAYOUT_KEY, View};
use crate::route::{ResolvedRoute, RouteDescriptor};

/// Filter a declared route tree down to what `roles` may reach, resolving
/// every kept node's view.
///
/// - Sibling order is preserved (it drives menu order).
/// - A denied node drops its whole subtree; descendants are not evaluated.
/// - An unknown view key binds [`View::NotFound`]; the node is kept.
/// - A node with an empty path is unroutable and dropped with its subtree.
pub fn filter_routes(
    routes: &[RouteDescriptor],
    roles: &[RoleCode],
    registry: &ComponentRegistry,
) -> Vec<ResolvedRoute> {
    routes
        .iter()
        .filter_map(|route| filter_route(route, roles, registry))
        .collect()
}

fn filter_route(
    route: &RouteDescriptor,
    roles: &[RoleCode],
    registry: &ComponentRegistry,
) -> Option<ResolvedRoute> {
    if is_unroutable(route) {
        return None;
    }
    let admission = evaluate(roles, route);
    if !admission.is_admitted() {
        tracing::trace!(path = %route.path, ?admission, "route denied");
        return None;
    }

    Some(ResolvedRoute {
        path: route.path.clone(),
        name: route_name(route),
        view: resolve_view(route, registry),
        redirect: route.redirect.clone(),
        meta: route.meta.clone(),
        children: filter_routes(&route.children, roles, registry),
    })
}

/// Resolve views without any permission check (statically declared routes).
pub fn resolve_routes(routes: &[RouteDescriptor], registry: &ComponentRegistry) -> Vec<ResolvedRoute> {
    routes
        .iter()
        .filter(|route| !is_unroutable(route))
        .map(|route| ResolvedRoute {
            path: route.path.clone(),
            name: route_name(route),
            view: resolve_view(route, registry),
            redirect: route.redirect.clone(),
            meta: route.meta.clone(),
            children: resolve_routes(&route.children, registry),
        })
        .collect()
}

fn is_unroutable(route: &RouteDescriptor) -> bool {
    let empty = route.path.trim().is_empty();
    if empty {
        tracing::warn!(name = ?route.name, "dropping route with empty path");
    }
    empty
}

fn route_name(route: &RouteDescriptor) -> String {
    match route.name.as_deref() {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => route.path.clone(),
    }
}

fn resolve_view(route: &RouteDescriptor, registry: &ComponentRegistry) -> View {
    match route.view_key.as_deref() {
        Some(LAYOUT_KEY) => View::Layout,
        Some(key) => {
            let view = registry.resolve(key);
            if view.is_not_found() {
                tracing::warn!(path = %route.path, view = key, "view not registered; binding not-found view");
            }
            view
        }
        None => {
            tracing::debug!(path = %route.path, "route declares no view; binding not-found view");
            View::NotFound
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::route::RouteMeta;

    fn registry() -> ComponentRegistry {
        ComponentRegistry::new(["posts/index", "dashboard/index", "system/user/index"])
    }

    fn editor() -> Vec<RoleCode> {
        vec![RoleCode::new("EDITOR")]
    }

    #[test]
    fn admitted_route_resolves_its_view() {
        let tree = vec![
            RouteDescriptor::new("/posts")
                .view("posts/index")
                .meta(RouteMeta::with_roles(["EDITOR", "ADMIN"])),
        ];

        let out = filter_routes(&tree, &editor(), &registry());
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].view.key(), "posts/index");
        assert!(matches!(out[0].view, View::Page(_)));
    }

    #[test]
    fn denied_parent_drops_subtree() {
        let tree = vec![
            RouteDescriptor::new("/admin")
                .view("Layout")
                .meta(RouteMeta::with_roles(["ADMIN"]))
                .children(vec![
                    RouteDescriptor::new("/admin/logs")
                        .view("posts/index")
                        .meta(RouteMeta::with_roles(["EDITOR"])),
                ]),
        ];

        let out = filter_routes(&tree, &editor(), &registry());
        assert!(out.is_empty());
    }

    #[test]
    fn unknown_view_degrades_to_not_found() {
        let tree = vec![
            RouteDescriptor::new("/x")
                .view("missing/view")
                .meta(RouteMeta::with_roles(["EDITOR"])),
        ];

        let out = filter_routes(&tree, &editor(), &registry());
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].view, View::NotFound);
    }

    #[test]
    fn layout_sentinel_and_name_default() {
        let tree = vec![
            RouteDescriptor::new("/system")
                .view("Layout")
                .meta(RouteMeta::with_roles(["EDITOR"]))
                .children(vec![
                    RouteDescriptor::new("user")
                        .named("User")
                        .view("system/user/index")
                        .meta(RouteMeta::with_roles(["EDITOR"])),
                    RouteDescriptor::new("role").view("system/role/index"),
                ]),
        ];

        let out = filter_routes(&tree, &editor(), &registry());
        assert_eq!(out[0].view, View::Layout);
        assert_eq!(out[0].name, "/system");
        // `role` declares no roles: strict default drops it.
        assert_eq!(out[0].children.len(), 1);
        assert_eq!(out[0].children[0].name, "User");
    }

    #[test]
    fn admin_keeps_everything() {
        let tree = vec![
            RouteDescriptor::new("/a"),
            RouteDescriptor::new("/b").children(vec![RouteDescriptor::new("c")]),
        ];

        let out = filter_routes(&tree, &[RoleCode::ADMIN], &registry());
        assert_eq!(out.len(), 2);
        assert_eq!(out[1].children[0].name, "c");
        assert_eq!(out[0].view, View::NotFound);
    }

    #[test]
    fn resolve_routes_ignores_roles() {
        let tree = vec![RouteDescriptor::new("/dashboard").view("dashboard/index")];
        let out = resolve_routes(&tree, &registry());
        assert_eq!(out[0].view.key(), "dashboard/index");
    }

    #[test]
    fn empty_path_nodes_are_dropped() {
        let tree = vec![
            RouteDescriptor::new("").view("posts/index"),
            RouteDescriptor::new("/system")
                .view("Layout")
                .children(vec![
                    RouteDescriptor::new("  ").view("system/user/index"),
                    RouteDescriptor::new("user").view("system/user/index"),
                ]),
        ];

        let out = filter_routes(&tree, &[RoleCode::ADMIN], &registry());
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].name, "/system");
        assert_eq!(out[0].children.len(), 1);
        assert_eq!(out[0].children[0].name, "user");
        assert!(paths(&out).iter().all(|p| !p.trim().is_empty()));

        let resolved = resolve_routes(&tree, &registry());
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].children.len(), 1);
    }

    const ROLE_POOL: &[&str] = &["ADMIN", "EDITOR", "GUEST", "AUDITOR"];
    const VIEW_POOL: &[&str] = &["Layout", "posts/index", "dashboard/index", "missing/view"];

    fn arb_roles() -> impl Strategy<Value = Vec<RoleCode>> {
        prop::sample::subsequence(ROLE_POOL, 0..=ROLE_POOL.len())
            .prop_map(|codes| codes.into_iter().map(RoleCode::new).collect())
    }

    fn arb_meta() -> impl Strategy<Value = Option<RouteMeta>> {
        prop_oneof![
            Just(None),
            Just(Some(RouteMeta::default())),
            prop::sample::subsequence(&ROLE_POOL[1..], 0..=3)
                .prop_map(|codes| Some(RouteMeta::with_roles(codes))),
        ]
    }

    fn arb_tree() -> impl Strategy<Value = Vec<RouteDescriptor>> {
        let leaf = (
            0u32..1000,
            prop::option::of(prop::sample::select(VIEW_POOL)),
            arb_meta(),
        )
            .prop_map(|(id, view, meta)| RouteDescriptor {
                path: format!("/p{id}"),
                view_key: view.map(str::to_string),
                meta,
                ..RouteDescriptor::default()
            });

        leaf.prop_recursive(3, 32, 4, |inner| {
            (inner.clone(), prop::collection::vec(inner, 0..4)).prop_map(|(mut node, children)| {
                node.children = children;
                node
            })
        })
        .prop_map(|node| vec![node])
    }

    fn lower(routes: &[ResolvedRoute]) -> Vec<RouteDescriptor> {
        routes.iter().map(ResolvedRoute::to_descriptor).collect()
    }

    fn paths(routes: &[ResolvedRoute]) -> Vec<String> {
        routes
            .iter()
            .flat_map(|r| r.walk())
            .map(|r| r.path.clone())
            .collect()
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Re-filtering an already filtered tree with the same roles changes nothing.
        #[test]
        fn filtering_is_idempotent(tree in arb_tree(), roles in arb_roles()) {
            let registry = registry();
            let once = filter_routes(&tree, &roles, &registry);
            let twice = filter_routes(&lower(&once), &roles, &registry);
            prop_assert_eq!(once, twice);
        }

        /// Admin role sets keep every node.
        #[test]
        fn admin_admits_all(tree in arb_tree(), mut roles in arb_roles()) {
            roles.push(RoleCode::ADMIN);
            let out = filter_routes(&tree, &roles, &registry());
            let all: usize = tree.iter().map(count).sum();
            prop_assert_eq!(paths(&out).len(), all);
        }

        /// Output is an order-preserving subsequence of the input, and no
        /// kept node sits under a denied ancestor.
        #[test]
        fn output_is_ordered_subsequence(tree in arb_tree(), roles in arb_roles()) {
            let out = filter_routes(&tree, &roles, &registry());
            let input_paths: Vec<String> = tree.iter().flat_map(preorder).collect();
            let output_paths = paths(&out);

            let mut cursor = input_paths.iter();
            for p in &output_paths {
                prop_assert!(cursor.any(|q| q == p), "{} out of order", p);
            }
            for route in out.iter().flat_map(|r| r.walk()) {
                prop_assert!(roles.iter().any(RoleCode::is_admin) || console_auth::admits(&roles, route));
            }
        }
    }

    fn count(node: &RouteDescriptor) -> usize {
        1 + node.children.iter().map(count).sum::<usize>()
    }

    fn preorder(node: &RouteDescriptor) -> Vec<String> {
        let mut out = vec![node.path.clone()];
        for child in &node.children {
            out.extend(preorder(child));
        }
        out
    }
}
