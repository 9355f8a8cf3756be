//! Tab history: visited views shown as tabs, and the names of views whose
//! instances are kept cached.
//!
//! Affix views are pinned at the front and survive every bulk close.

use std::sync::{PoisonError, RwLock, RwLockWriteGuard};

use serde::Serialize;

use crate::navigation::NavigationTarget;
use crate::table::MatchedRecord;

const UNTITLED: &str = "no-name";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TagView {
    pub path: String,
    pub full_path: String,
    pub name: String,
    pub title: String,
    pub affix: bool,
    pub keep_alive: bool,
}

impl TagView {
    pub fn new(path: impl Into<String>, name: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            full_path: path.clone(),
            path,
            name: name.into(),
            title: UNTITLED.to_string(),
            affix: false,
            keep_alive: false,
        }
    }

    pub fn titled(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn affixed(mut self) -> Self {
        self.affix = true;
        self
    }

    pub fn kept_alive(mut self) -> Self {
        self.keep_alive = true;
        self
    }

    /// Tab for a navigation that landed on `leaf`.
    pub fn from_match(target: &NavigationTarget, leaf: &MatchedRecord) -> Self {
        let meta = leaf.meta.clone().unwrap_or_default();
        Self {
            path: target.path.clone(),
            full_path: target.full_path(),
            name: leaf.name.clone(),
            title: meta.title.unwrap_or_else(|| UNTITLED.to_string()),
            affix: meta.affix,
            keep_alive: meta.keep_alive,
        }
    }
}

/// Both lists after an operation touching them.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TabsSnapshot {
    pub visited_views: Vec<TagView>,
    pub cached_views: Vec<String>,
}

#[derive(Debug, Default)]
struct Tabs {
    visited: Vec<TagView>,
    cached: Vec<String>,
}

impl Tabs {
    fn snapshot(&self) -> TabsSnapshot {
        TabsSnapshot {
            visited_views: self.visited.clone(),
            cached_views: self.cached.clone(),
        }
    }

    fn uncache(&mut self, name: &str) {
        self.cached.retain(|n| n != name);
    }

    /// Drop non-affix views for which `drop_at(index)` holds, uncaching them.
    fn close_where(&mut self, drop_at: impl Fn(usize) -> bool) {
        let visited = std::mem::take(&mut self.visited);
        for (i, view) in visited.into_iter().enumerate() {
            if view.affix || !drop_at(i) {
                self.visited.push(view);
            } else {
                self.uncache(&view.name);
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct TabHistory {
    inner: RwLock<Tabs>,
}

impl TabHistory {
    pub fn new() -> Self {
        Self::default()
    }

    fn write(&self) -> RwLockWriteGuard<'_, Tabs> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn visited_views(&self) -> Vec<TagView> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .visited
            .clone()
    }

    pub fn cached_views(&self) -> Vec<String> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .cached
            .clone()
    }

    pub fn add_view(&self, view: &TagView) {
        self.add_visited_view(view);
        self.add_cached_view(view);
    }

    /// Ignored if a view with the same path is already open.
    pub fn add_visited_view(&self, view: &TagView) {
        let mut tabs = self.write();
        if tabs.visited.iter().any(|v| v.path == view.path) {
            return;
        }
        if view.affix {
            tabs.visited.insert(0, view.clone());
        } else {
            tabs.visited.push(view.clone());
        }
    }

    /// Only keep-alive views are cached, once per name.
    pub fn add_cached_view(&self, view: &TagView) {
        let mut tabs = self.write();
        if !view.keep_alive || tabs.cached.contains(&view.name) {
            return;
        }
        tabs.cached.push(view.name.clone());
    }

    pub fn update_visited_view(&self, view: &TagView) {
        let mut tabs = self.write();
        if let Some(existing) = tabs.visited.iter_mut().find(|v| v.path == view.path) {
            *existing = view.clone();
        }
    }

    pub fn del_view(&self, view: &TagView) -> TabsSnapshot {
        let mut tabs = self.write();
        if let Some(i) = tabs.visited.iter().position(|v| v.path == view.path) {
            tabs.visited.remove(i);
        }
        tabs.uncache(&view.name);
        tabs.snapshot()
    }

    pub fn del_visited_view(&self, view: &TagView) -> Vec<TagView> {
        let mut tabs = self.write();
        if let Some(i) = tabs.visited.iter().position(|v| v.path == view.path) {
            tabs.visited.remove(i);
        }
        tabs.visited.clone()
    }

    pub fn del_cached_view(&self, view: &TagView) -> Vec<String> {
        let mut tabs = self.write();
        tabs.uncache(&view.name);
        tabs.cached.clone()
    }

    /// Keep `view` and the affix views.
    pub fn del_other_views(&self, view: &TagView) -> TabsSnapshot {
        self.del_other_visited_views(view);
        self.del_other_cached_views(view);
        self.inner.read().unwrap_or_else(PoisonError::into_inner).snapshot()
    }

    pub fn del_other_visited_views(&self, view: &TagView) -> Vec<TagView> {
        let mut tabs = self.write();
        tabs.visited.retain(|v| v.affix || v.path == view.path);
        tabs.visited.clone()
    }

    /// Keep only `view`'s cache entry (or none if it was not cached).
    pub fn del_other_cached_views(&self, view: &TagView) -> Vec<String> {
        let mut tabs = self.write();
        tabs.cached.retain(|n| *n == view.name);
        tabs.cached.dedup();
        tabs.cached.clone()
    }

    /// Close non-affix views left of `view`. No-op if `view` is not open.
    pub fn del_left_views(&self, view: &TagView) -> Vec<TagView> {
        let mut tabs = self.write();
        if let Some(current) = tabs.visited.iter().position(|v| v.path == view.path) {
            tabs.close_where(|i| i < current);
        }
        tabs.visited.clone()
    }

    /// Close non-affix views right of `view`. No-op if `view` is not open.
    pub fn del_right_views(&self, view: &TagView) -> Vec<TagView> {
        let mut tabs = self.write();
        if let Some(current) = tabs.visited.iter().position(|v| v.path == view.path) {
            tabs.close_where(|i| i > current);
        }
        tabs.visited.clone()
    }

    /// Keep only affix views; clear the cache.
    pub fn del_all_views(&self) -> TabsSnapshot {
        let mut tabs = self.write();
        tabs.visited.retain(|v| v.affix);
        tabs.cached.clear();
        tabs.snapshot()
    }

    pub fn del_all_visited_views(&self) -> Vec<TagView> {
        let mut tabs = self.write();
        tabs.visited.retain(|v| v.affix);
        tabs.visited.clone()
    }

    pub fn del_all_cached_views(&self) -> Vec<String> {
        let mut tabs = self.write();
        tabs.cached.clear();
        tabs.cached.clone()
    }
}
