//! `console-mock`: in-process stand-in for the dashboard API.
//!
//! Serves the captcha, login, profile, logout and route-tree endpoints with fixed
//! fixtures so the console can be driven end to end without a backend.

pub mod app;
pub mod errors;
pub mod fixtures;

pub use app::{MockState, build_app, build_app_with};
