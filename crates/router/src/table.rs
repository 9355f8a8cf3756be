//! Live route table: what the router can currently match.
//!
//! Base routes are mounted at construction; dynamic routes are mounted once
//! per session by the navigation guard and dropped on reset.

use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

use crate::registry::View;
use crate::route::{ResolvedRoute, RouteMeta};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Static(String),
    Param(String),
    /// `:name(.*)`: swallows the remainder of the path.
    Rest(String),
}

/// One route of a matched chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedRecord {
    pub path: String,
    pub name: String,
    pub view: View,
    pub meta: Option<RouteMeta>,
    pub redirect: Option<String>,
}

/// Result of matching a path: the chain from top-level route to leaf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    pub matched: Vec<MatchedRecord>,
    pub params: BTreeMap<String, String>,
}

impl RouteMatch {
    pub fn leaf(&self) -> &MatchedRecord {
        // A match always has at least one record.
        &self.matched[self.matched.len() - 1]
    }
}

#[derive(Debug, Clone)]
struct Record {
    full_path: String,
    segments: Vec<Segment>,
    chain: Vec<MatchedRecord>,
}

#[derive(Debug, Default)]
struct TableInner {
    base: Vec<ResolvedRoute>,
    dynamic: Vec<ResolvedRoute>,
    records: Vec<Record>,
}

impl TableInner {
    fn rebuild(&mut self) {
        let mut records = Vec::new();
        for route in self.base.iter().chain(self.dynamic.iter()) {
            flatten(route, "", &[], &mut records);
        }
        self.records = records;
    }
}

#[derive(Debug, Default)]
pub struct RouteTable {
    inner: RwLock<TableInner>,
}

impl RouteTable {
    pub fn new(base: Vec<ResolvedRoute>) -> Self {
        let mut inner = TableInner {
            base,
            ..TableInner::default()
        };
        inner.rebuild();
        Self {
            inner: RwLock::new(inner),
        }
    }

    /// Mount dynamic routes. A top-level route whose name is already mounted
    /// replaces the earlier one.
    pub fn add_routes(&self, routes: Vec<ResolvedRoute>) {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        for route in routes {
            match inner.dynamic.iter().position(|r| r.name == route.name) {
                Some(i) => inner.dynamic[i] = route,
                None => inner.dynamic.push(route),
            }
        }
        inner.rebuild();
        tracing::debug!(records = inner.records.len(), "route table updated");
    }

    /// Unmount every dynamic route.
    pub fn reset(&self) {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        inner.dynamic.clear();
        inner.rebuild();
    }

    pub fn dynamic_len(&self) -> usize {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .dynamic
            .len()
    }

    /// Match `path`. Static segments win over params; otherwise the first
    /// mounted route wins.
    pub fn match_path(&self, path: &str) -> Option<RouteMatch> {
        let wanted = split(path);
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);

        inner
            .records
            .iter()
            .filter_map(|record| {
                match_segments(&record.segments, &wanted).map(|params| (record, params))
            })
            .min_by_key(|(record, _)| dynamic_segments(&record.segments))
            .map(|(record, params)| RouteMatch {
                matched: record.chain.clone(),
                params,
            })
    }

    pub fn has_name(&self, name: &str) -> bool {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner.records.iter().any(|r| r.leaf_name() == Some(name))
    }

    /// Concrete path of the route registered under `name`, with its
    /// `:param` segments filled from `params`. `None` if no route has that
    /// name or a required param is missing.
    pub fn path_for_name(&self, name: &str, params: &BTreeMap<String, String>) -> Option<String> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        let record = inner.records.iter().find(|r| r.leaf_name() == Some(name))?;
        fill(&record.segments, params)
    }
}

impl Record {
    fn leaf_name(&self) -> Option<&str> {
        self.chain.last().map(|leaf| leaf.name.as_str())
    }
}

fn fill(segments: &[Segment], params: &BTreeMap<String, String>) -> Option<String> {
    let mut parts = Vec::with_capacity(segments.len());
    for segment in segments {
        match segment {
            Segment::Static(s) => parts.push(s.as_str()),
            Segment::Param(name) => parts.push(params.get(name)?.as_str()),
            Segment::Rest(name) => {
                if let Some(rest) = params.get(name).filter(|r| !r.is_empty()) {
                    parts.push(rest.as_str());
                }
            }
        }
    }
    Some(format!("/{}", parts.join("/")))
}

fn flatten(route: &ResolvedRoute, parent: &str, chain: &[MatchedRecord], out: &mut Vec<Record>) {
    let full_path = join(parent, &route.path);
    let mut chain = chain.to_vec();
    chain.push(MatchedRecord {
        path: full_path.clone(),
        name: route.name.clone(),
        view: route.view.clone(),
        meta: route.meta.clone(),
        redirect: route.redirect.clone(),
    });

    out.push(Record {
        segments: parse_segments(&full_path),
        full_path: full_path.clone(),
        chain: chain.clone(),
    });

    for child in &route.children {
        flatten(child, &full_path, &chain, out);
    }
}

/// Join a child path onto its parent; absolute children stand alone.
fn join(parent: &str, child: &str) -> String {
    if child.starts_with('/') {
        return normalize(child);
    }
    if child.is_empty() {
        return normalize(parent);
    }
    normalize(&format!("{}/{}", parent.trim_end_matches('/'), child))
}

fn normalize(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}

fn split(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

fn parse_segments(path: &str) -> Vec<Segment> {
    split(path)
        .into_iter()
        .map(|seg| match seg.strip_prefix(':') {
            Some(param) => match param.strip_suffix("(.*)") {
                Some(rest) => Segment::Rest(rest.to_string()),
                None => Segment::Param(param.to_string()),
            },
            None => Segment::Static(seg.to_string()),
        })
        .collect()
}

fn dynamic_segments(segments: &[Segment]) -> usize {
    segments
        .iter()
        .filter(|s| !matches!(s, Segment::Static(_)))
        .count()
}

fn match_segments(pattern: &[Segment], path: &[&str]) -> Option<BTreeMap<String, String>> {
    let mut params = BTreeMap::new();
    for (i, segment) in pattern.iter().enumerate() {
        match segment {
            Segment::Rest(name) => {
                params.insert(name.clone(), path.get(i..).unwrap_or_default().join("/"));
                return Some(params);
            }
            Segment::Static(expected) => {
                if path.get(i) != Some(&expected.as_str()) {
                    return None;
                }
            }
            Segment::Param(name) => {
                let value = path.get(i)?;
                params.insert(name.clone(), (*value).to_string());
            }
        }
    }
    (pattern.len() == path.len()).then_some(params)
}
