//! Navigation intents and guard outcomes.

use std::collections::BTreeMap;

/// Where a navigation starts from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Location {
    pub path: String,
    /// Name of the matched route, when the location matched one.
    pub name: Option<String>,
    /// Path params the location matched with, e.g. `id` for `user/:id`.
    pub params: BTreeMap<String, String>,
}

impl Location {
    /// The location before the first navigation: `/`, unnamed.
    pub fn start() -> Self {
        Self {
            path: "/".to_string(),
            ..Self::default()
        }
    }

    pub fn named(path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: Some(name.into()),
            params: BTreeMap::new(),
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }
}

/// Where a navigation wants to go.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NavigationTarget {
    pub path: String,
    pub query: BTreeMap<String, String>,
    /// Replace the current history entry instead of pushing.
    pub replace: bool,
}

impl NavigationTarget {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Parse `"/path?k=v&k2=v2"`. Values are taken verbatim.
    pub fn parse(full_path: &str) -> Self {
        let (path, query) = full_path.split_once('?').unwrap_or((full_path, ""));
        let query = query
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| {
                let (k, v) = pair.split_once('=').unwrap_or((pair, ""));
                (k.to_string(), v.to_string())
            })
            .collect();
        Self {
            path: path.to_string(),
            query,
            replace: false,
        }
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    pub fn replacing(mut self) -> Self {
        self.replace = true;
        self
    }

    /// Path plus query string, e.g. `/login?redirect=/dashboard`.
    pub fn full_path(&self) -> String {
        self.to_string()
    }
}

impl core::fmt::Display for NavigationTarget {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.path)?;
        for (i, (k, v)) in self.query.iter().enumerate() {
            let sep = if i == 0 { '?' } else { '&' };
            write!(f, "{sep}{k}={v}")?;
        }
        Ok(())
    }
}

impl From<&str> for NavigationTarget {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

impl From<String> for NavigationTarget {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

/// Decision taken by the navigation guard for one attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    /// Proceed to the requested target.
    Allow,
    /// Abandon the target and go elsewhere.
    Redirect(NavigationTarget),
    /// Go to the route registered under this name.
    RedirectToName(String),
    /// Run the same target again (as a replace) now that routes changed.
    Redispatch(NavigationTarget),
}
