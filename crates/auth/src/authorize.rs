use serde::Serialize;

use crate::{PermCode, RoleCode};

/// Anything whose visibility is gated by role codes (route nodes, menu items).
pub trait RoleGated {
    /// Roles allowed to reach this node.
    ///
    /// `None` when the node carries no access metadata at all; `Some(&[])`
    /// when it carries metadata but lists no roles. Both deny non-admins.
    fn required_roles(&self) -> Option<&[RoleCode]>;
}

/// Why a node was admitted or denied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "role")]
pub enum Admission {
    /// The evaluating role set holds the admin sentinel.
    AdminBypass,
    /// First evaluating role found in the node's role list.
    RoleMatch(RoleCode),
    /// The node declares no roles; strict-by-default denies it.
    NoRolesDeclared,
    /// Roles declared, none held.
    NoIntersection,
}

impl Admission {
    pub fn is_admitted(&self) -> bool {
        matches!(self, Admission::AdminBypass | Admission::RoleMatch(_))
    }
}

/// Decide whether `roles` may reach `node`, with the reason.
///
/// - No IO
/// - No panics
pub fn evaluate<N>(roles: &[RoleCode], node: &N) -> Admission
where
    N: RoleGated + ?Sized,
{
    if roles.iter().any(RoleCode::is_admin) {
        return Admission::AdminBypass;
    }

    let required = match node.required_roles() {
        Some(required) if !required.is_empty() => required,
        _ => return Admission::NoRolesDeclared,
    };

    roles
        .iter()
        .find(|role| required.contains(role))
        .map(|role| Admission::RoleMatch(role.clone()))
        .unwrap_or(Admission::NoIntersection)
}

/// `true` iff `roles` may reach `node`. See [`evaluate`].
pub fn admits<N>(roles: &[RoleCode], node: &N) -> bool
where
    N: RoleGated + ?Sized,
{
    evaluate(roles, node).is_admitted()
}

/// Button-level check: admins and the wildcard pass, otherwise exact match.
pub fn has_perm(roles: &[RoleCode], perms: &[PermCode], required: &PermCode) -> bool {
    roles.iter().any(RoleCode::is_admin)
        || perms.iter().any(|p| p.is_wildcard() || p == required)
}
