//! `console-core`: shared building blocks for the admin console crates.
//!
//! Pure types only: identifiers, the transport error model, and settings.

pub mod error;
pub mod id;
pub mod settings;

pub use error::{ConfigError, ServiceError, ServiceResult};
pub use id::SessionId;
pub use settings::{Layout, Settings};
