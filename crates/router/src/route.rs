//! Route tree model: raw descriptors as declared by the backend and their
//! resolved counterparts.

use serde::{Deserialize, Serialize};

use console_auth::{RoleCode, RoleGated};

use crate::registry::View;

/// Access and display attributes of a route.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Hidden from menus but still routable.
    #[serde(default)]
    pub hidden: bool,
    /// Show the parent menu entry even with a single child.
    #[serde(default)]
    pub always_show: bool,
    /// Roles allowed to reach the route. Absent or empty denies everyone
    /// but admins.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roles: Option<Vec<RoleCode>>,
    /// Pinned, non-closable tab.
    #[serde(default)]
    pub affix: bool,
    /// Keep the view instance cached when navigating away.
    #[serde(default)]
    pub keep_alive: bool,
}

impl RouteMeta {
    pub fn with_roles<I, R>(roles: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<RoleCode>,
    {
        Self {
            roles: Some(roles.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    pub fn titled(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn affix(mut self) -> Self {
        self.affix = true;
        self
    }

    pub fn keep_alive(mut self) -> Self {
        self.keep_alive = true;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }
}

/// A route node as declared by the route-listing service.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteDescriptor {
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// View key (`"system/user/index"`) or the layout sentinel (`"Layout"`).
    #[serde(
        default,
        rename = "component",
        alias = "viewKey",
        skip_serializing_if = "Option::is_none"
    )]
    pub view_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<RouteMeta>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<RouteDescriptor>,
}

impl RouteDescriptor {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn view(mut self, key: impl Into<String>) -> Self {
        self.view_key = Some(key.into());
        self
    }

    pub fn redirect(mut self, path: impl Into<String>) -> Self {
        self.redirect = Some(path.into());
        self
    }

    pub fn meta(mut self, meta: RouteMeta) -> Self {
        self.meta = Some(meta);
        self
    }

    pub fn children(mut self, children: Vec<RouteDescriptor>) -> Self {
        self.children = children;
        self
    }
}

impl RoleGated for RouteDescriptor {
    fn required_roles(&self) -> Option<&[RoleCode]> {
        self.meta.as_ref()?.roles.as_deref()
    }
}

/// A route after filtering and view resolution.
///
/// `name` is never absent (defaults to the path) and `view` is always bound,
/// falling back to [`View::NotFound`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedRoute {
    pub path: String,
    pub name: String,
    #[serde(rename = "component")]
    pub view: View,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<RouteMeta>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ResolvedRoute>,
}

impl ResolvedRoute {
    pub fn title(&self) -> Option<&str> {
        self.meta.as_ref()?.title.as_deref()
    }

    pub fn is_affix(&self) -> bool {
        self.meta.as_ref().is_some_and(|m| m.affix)
    }

    pub fn is_keep_alive(&self) -> bool {
        self.meta.as_ref().is_some_and(|m| m.keep_alive)
    }

    pub fn is_hidden(&self) -> bool {
        self.meta.as_ref().is_some_and(|m| m.hidden)
    }

    /// Lower back to the declared shape, views rendered as their keys.
    pub fn to_descriptor(&self) -> RouteDescriptor {
        RouteDescriptor {
            path: self.path.clone(),
            name: Some(self.name.clone()),
            view_key: Some(self.view.key().to_string()),
            redirect: self.redirect.clone(),
            meta: self.meta.clone(),
            children: self.children.iter().map(Self::to_descriptor).collect(),
        }
    }

    /// Depth-first walk over this route and its descendants.
    pub fn walk(&self) -> Vec<&ResolvedRoute> {
        let mut out = vec![self];
        for child in &self.children {
            out.extend(child.walk());
        }
        out
    }
}

impl RoleGated for ResolvedRoute {
    fn required_roles(&self) -> Option<&[RoleCode]> {
        self.meta.as_ref()?.roles.as_deref()
    }
}
