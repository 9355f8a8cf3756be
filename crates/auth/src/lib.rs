//! `console-auth`: roles, permission evaluation, credentials and user session.
//!
//! Decoupled from HTTP: backends plug in through [`AuthService`] and
//! [`CredentialStore`].

pub mod authorize;
pub mod credential;
pub mod permissions;
pub mod profile;
pub mod roles;
pub mod service;
pub mod session;

pub use authorize::{Admission, RoleGated, admits, evaluate, has_perm};
pub use credential::{Credential, CredentialStore, CredentialStoreError, MemoryCredentialStore};
pub use permissions::PermCode;
pub use profile::{Captcha, LoginData, TokenPair, UserProfile};
pub use roles::RoleCode;
pub use service::AuthService;
pub use session::{AuthError, UserSession};
