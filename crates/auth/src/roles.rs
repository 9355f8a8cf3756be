use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Role code used to gate routes (e.g. `"ADMIN"`, `"EDITOR"`).
///
/// Codes are opaque strings; only [`RoleCode::ADMIN`] carries meaning at this
/// layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleCode(Cow<'static, str>);

impl RoleCode {
    /// Admin sentinel: bypasses every route and button check.
    pub const ADMIN: RoleCode = RoleCode(Cow::Borrowed("ADMIN"));

    pub fn new(code: impl Into<Cow<'static, str>>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_admin(&self) -> bool {
        self.as_str() == Self::ADMIN.as_str()
    }
}

impl core::fmt::Display for RoleCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for RoleCode {
    fn from(value: &'static str) -> Self {
        Self::new(value)
    }
}
