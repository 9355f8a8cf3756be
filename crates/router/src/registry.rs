//! Component registry: the exhaustive, startup-time set of views a route's
//! `component` key may name.

use std::borrow::Cow;
use std::collections::BTreeMap;

use serde::{Serialize, Serializer};

/// Reserved key meaning "render the shared layout chrome".
pub const LAYOUT_KEY: &str = "Layout";

/// Key of the not-found view. Resolving it always yields [`View::NotFound`].
pub const NOT_FOUND_KEY: &str = "error-page/404";

/// Views shipped with the console.
pub const STANDARD_VIEWS: &[&str] = &[
    "dashboard/index",
    "login/index",
    "redirect/index",
    "error-page/401",
    "system/user/index",
    "system/role/index",
    "system/menu/index",
    "system/dept/index",
    "system/dict/index",
    "demo/icons",
    "demo/websocket",
    "demo/dict",
    "demo/wang-editor",
    "demo/upload",
    "demo/table",
    "demo/permission/page",
    "demo/multi-level/level1",
    "demo/multi-level/children/level2",
    "demo/multi-level/children/children/level3-1",
    "demo/multi-level/children/children/level3-2",
];

/// A concrete, registered view, identified by its key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewUnit(Cow<'static, str>);

impl ViewUnit {
    pub fn key(&self) -> &str {
        &self.0
    }
}

/// What a resolved route renders.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum View {
    /// Shared layout chrome; children render inside it.
    Layout,
    Page(ViewUnit),
    /// Fallback for unknown or missing keys.
    NotFound,
}

impl View {
    /// Registry key this view was (or would be) resolved from.
    pub fn key(&self) -> &str {
        match self {
            View::Layout => LAYOUT_KEY,
            View::Page(unit) => unit.key(),
            View::NotFound => NOT_FOUND_KEY,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, View::NotFound)
    }
}

impl Serialize for View {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.key())
    }
}

#[derive(Debug, Clone, Default)]
pub struct ComponentRegistry {
    views: BTreeMap<Cow<'static, str>, ViewUnit>,
}

impl ComponentRegistry {
    pub fn new<I, K>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<Cow<'static, str>>,
    {
        let views = keys
            .into_iter()
            .map(Into::into)
            .filter(|key: &Cow<'static, str>| &**key != LAYOUT_KEY && &**key != NOT_FOUND_KEY)
            .map(|key| (key.clone(), ViewUnit(key)))
            .collect();
        Self { views }
    }

    /// Registry of [`STANDARD_VIEWS`].
    pub fn standard() -> Self {
        Self::new(STANDARD_VIEWS.iter().copied())
    }

    /// Look up a page view. Unknown keys and the not-found key yield
    /// [`View::NotFound`]; the layout sentinel is not a page and is handled by
    /// the caller.
    pub fn resolve(&self, key: &str) -> View {
        self.views
            .get(key)
            .cloned()
            .map(View::Page)
            .unwrap_or(View::NotFound)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.views.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.views.keys().map(|k| &**k)
    }
}
