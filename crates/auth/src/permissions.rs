use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Button-level permission code (e.g. `"sys:user:add"`).
///
/// The wildcard `"*:*:*"` grants every permission.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermCode(Cow<'static, str>);

impl PermCode {
    pub const WILDCARD: &'static str = "*:*:*";

    pub fn new(code: impl Into<Cow<'static, str>>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_wildcard(&self) -> bool {
        self.as_str() == Self::WILDCARD
    }
}

impl core::fmt::Display for PermCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for PermCode {
    fn from(value: &'static str) -> Self {
        Self::new(value)
    }
}
