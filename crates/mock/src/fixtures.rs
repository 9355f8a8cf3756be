//! Canned payloads served by the mock.

use console_auth::{PermCode, RoleCode, UserProfile};
use console_router::{RouteDescriptor, RouteMeta};

pub const ADMIN_USER: &str = "admin";
pub const AVATAR: &str =
    "https://oss.youlai.tech/youlai-boot/2023/05/16/811270ef31f548af9cffc026dfc3777b.gif";

/// Answer to every captcha the mock issues.
pub const CAPTCHA_CODE: &str = "1234";
/// 1x1 transparent PNG standing in for the rendered code.
pub const CAPTCHA_IMAGE: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAQAAAC1HAwCAAAAC0lEQVR42mNkYAAAAAYAAjCB0C8AAAAASUVORK5CYII=";

const ADMIN_PERMS: &[&str] = &[
    "sys:menu:delete",
    "sys:dept:edit",
    "sys:dict_type:add",
    "sys:dict:edit",
    "sys:dict:delete",
    "sys:dict_type:edit",
    "sys:menu:add",
    "sys:user:add",
    "sys:role:edit",
    "sys:dept:delete",
    "sys:user:edit",
    "sys:user:delete",
    "sys:user:reset_pwd",
    "sys:dept:add",
    "sys:role:delete",
    "sys:dict_type:delete",
    "sys:menu:edit",
    "sys:dict:add",
    "sys:role:add",
];

/// Profile for `username`: `admin` is the system administrator, anyone else
/// signs in as a guest.
pub fn profile_for(username: &str) -> UserProfile {
    if username == ADMIN_USER {
        UserProfile {
            user_id: 2,
            nickname: "system admin".to_string(),
            avatar: AVATAR.to_string(),
            roles: vec![RoleCode::ADMIN],
            perms: ADMIN_PERMS.iter().map(|p| PermCode::new(*p)).collect(),
        }
    } else {
        UserProfile {
            user_id: 3,
            nickname: username.to_string(),
            avatar: AVATAR.to_string(),
            roles: vec![RoleCode::new("GUEST")],
            perms: vec![PermCode::new("sys:user:query")],
        }
    }
}

fn page(path: &str, name: &str, view: &str, title: &str, roles: &[&'static str]) -> RouteDescriptor {
    RouteDescriptor::new(path)
        .named(name)
        .view(view)
        .meta(
            RouteMeta::with_roles(roles.iter().copied())
                .titled(title)
                .keep_alive(),
        )
}

/// Route tree returned by `GET /api/v1/menus/routes`.
pub fn route_tree() -> Vec<RouteDescriptor> {
    const ALL: &[&str] = &["ADMIN", "GUEST"];
    const ADMIN: &[&str] = &["ADMIN"];

    vec![
        RouteDescriptor::new("/system")
            .view("Layout")
            .redirect("/system/user")
            .meta(RouteMeta {
                icon: Some("system".to_string()),
                ..RouteMeta::with_roles(ALL.iter().copied()).titled("system")
            })
            .children(vec![
                page("user", "User", "system/user/index", "user", ALL),
                page("role", "Role", "system/role/index", "role", ADMIN),
                page("menu", "Menu", "system/menu/index", "menu", ADMIN),
                page("dept", "Dept", "system/dept/index", "dept", ADMIN),
                page("dict", "Dict", "system/dict/index", "dict", ADMIN),
            ]),
        RouteDescriptor::new("/multi-level")
            .view("Layout")
            .redirect("/multi-level/multi-level1")
            .meta(RouteMeta::with_roles(ADMIN.iter().copied()).titled("multi-level"))
            .children(vec![
                RouteDescriptor::new("multi-level1")
                    .view("demo/multi-level/level1")
                    .redirect("/multi-level/multi-level1/multi-level2")
                    .meta(RouteMeta::with_roles(ADMIN.iter().copied()).titled("level1"))
                    .children(vec![
                        RouteDescriptor::new("multi-level2")
                            .view("demo/multi-level/children/level2")
                            .meta(RouteMeta::with_roles(ADMIN.iter().copied()).titled("level2"))
                            .children(vec![
                                page(
                                    "multi-level3-1",
                                    "MultiLevel31",
                                    "demo/multi-level/children/children/level3-1",
                                    "level3-1",
                                    ADMIN,
                                ),
                                page(
                                    "multi-level3-2",
                                    "MultiLevel32",
                                    "demo/multi-level/children/children/level3-2",
                                    "level3-2",
                                    ADMIN,
                                ),
                            ]),
                    ]),
            ]),
        RouteDescriptor::new("/function")
            .view("Layout")
            .meta(RouteMeta::with_roles(ALL.iter().copied()).titled("function"))
            .children(vec![
                page("icon-demo", "IconDemo", "demo/icons", "icons", ALL),
                page("websocket", "Websocket", "demo/websocket", "websocket", ADMIN),
                page("table", "Table", "demo/table", "table", ALL),
                // Not shipped with the console: resolves to the not-found view.
                page("report", "Report", "demo/report", "report", ALL),
            ]),
    ]
}
