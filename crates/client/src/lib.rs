//! `console-client`: HTTP backends for the console services.
//!
//! [`HttpApi`] talks to the dashboard API (`/api/v1/...`) and implements both
//! [`console_auth::AuthService`] and [`console_router::RouteService`].
//! [`FileCredentialStore`] keeps the session credential across restarts.

pub mod envelope;
pub mod http;
pub mod store;

pub use envelope::{Envelope, SUCCESS_CODE};
pub use http::HttpApi;
pub use store::{FileCredentialStore, StoredCredential};
