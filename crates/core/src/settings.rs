//! Console settings: display defaults plus routing/backend configuration.
//!
//! Defaults mirror the shipped dashboard. Every field can be overridden from
//! `CONSOLE_*` environment variables via [`Settings::from_env`].

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Navigation layout. `Mix` shows top-level routes in a top bar and the
/// selected entry's children in a secondary left menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    #[default]
    Left,
    Top,
    Mix,
}

impl FromStr for Layout {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "left" => Ok(Self::Left),
            "top" => Ok(Self::Top),
            "mix" => Ok(Self::Mix),
            other => Err(ConfigError::InvalidValue {
                key: "CONSOLE_LAYOUT",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub title: String,
    pub show_settings: bool,
    /// Show the tab history bar.
    pub tags_view: bool,
    pub fixed_header: bool,
    pub sidebar_logo: bool,
    pub layout: Layout,
    /// `dark` | `light` | `auto`
    pub theme: String,
    /// `default` | `large` | `small`
    pub size: String,
    pub language: String,

    /// Base URL of the backend API (no trailing slash).
    pub api_base_url: String,
    pub login_path: String,
    pub home_path: String,
    pub not_found_path: String,
    /// Paths reachable without a credential.
    pub allow_list: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            title: "vue3-element-admin".to_string(),
            show_settings: true,
            tags_view: true,
            fixed_header: false,
            sidebar_logo: true,
            layout: Layout::Left,
            theme: "dark".to_string(),
            size: "default".to_string(),
            language: "zh-cn".to_string(),
            api_base_url: "http://localhost:3000".to_string(),
            login_path: "/login".to_string(),
            home_path: "/".to_string(),
            not_found_path: "/404".to_string(),
            allow_list: vec!["/login".to_string(), "/404".to_string()],
        }
    }
}

impl Settings {
    /// Defaults overridden by `CONSOLE_*` process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each
    /// `CONSOLE_*` key.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();

        if let Some(v) = lookup("CONSOLE_TITLE") {
            settings.title = v;
        }
        if let Some(v) = lookup("CONSOLE_SHOW_SETTINGS") {
            settings.show_settings = parse_bool("CONSOLE_SHOW_SETTINGS", &v)?;
        }
        if let Some(v) = lookup("CONSOLE_TAGS_VIEW") {
            settings.tags_view = parse_bool("CONSOLE_TAGS_VIEW", &v)?;
        }
        if let Some(v) = lookup("CONSOLE_FIXED_HEADER") {
            settings.fixed_header = parse_bool("CONSOLE_FIXED_HEADER", &v)?;
        }
        if let Some(v) = lookup("CONSOLE_SIDEBAR_LOGO") {
            settings.sidebar_logo = parse_bool("CONSOLE_SIDEBAR_LOGO", &v)?;
        }
        if let Some(v) = lookup("CONSOLE_LAYOUT") {
            settings.layout = v.parse()?;
        }
        if let Some(v) = lookup("CONSOLE_THEME") {
            settings.theme = v;
        }
        if let Some(v) = lookup("CONSOLE_SIZE") {
            settings.size = v;
        }
        if let Some(v) = lookup("CONSOLE_LANGUAGE") {
            settings.language = v;
        }
        if let Some(v) = lookup("CONSOLE_API_URL") {
            settings.api_base_url = v.trim_end_matches('/').to_string();
        }
        if let Some(v) = lookup("CONSOLE_LOGIN_PATH") {
            settings.login_path = v;
        }
        if let Some(v) = lookup("CONSOLE_HOME_PATH") {
            settings.home_path = v;
        }
        if let Some(v) = lookup("CONSOLE_NOT_FOUND_PATH") {
            settings.not_found_path = v;
        }
        if let Some(v) = lookup("CONSOLE_ALLOW_LIST") {
            settings.allow_list = v
                .split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_string)
                .collect();
        }

        tracing::debug!(layout = ?settings.layout, api = %settings.api_base_url, "settings loaded");
        Ok(settings)
    }

    pub fn is_allow_listed(&self, path: &str) -> bool {
        self.allow_list.iter().any(|p| p == path)
    }
}

fn parse_bool(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidValue {
            key,
            value: other.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_match_dashboard() {
        let s = Settings::default();
        assert_eq!(s.layout, Layout::Left);
        assert!(s.tags_view);
        assert!(s.is_allow_listed("/login"));
        assert!(s.is_allow_listed("/404"));
        assert!(!s.is_allow_listed("/dashboard"));
    }

    #[test]
    fn env_overrides_are_applied() {
        let s = Settings::from_lookup(lookup_from(&[
            ("CONSOLE_LAYOUT", "mix"),
            ("CONSOLE_TAGS_VIEW", "false"),
            ("CONSOLE_API_URL", "http://api.local/"),
            ("CONSOLE_ALLOW_LIST", "/login, /404, /register"),
        ]))
        .unwrap();

        assert_eq!(s.layout, Layout::Mix);
        assert!(!s.tags_view);
        assert_eq!(s.api_base_url, "http://api.local");
        assert!(s.is_allow_listed("/register"));
    }

    #[test]
    fn invalid_layout_is_rejected() {
        let err = Settings::from_lookup(lookup_from(&[("CONSOLE_LAYOUT", "diagonal")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidValue {
                key: "CONSOLE_LAYOUT",
                value: "diagonal".to_string()
            }
        );
    }

    #[test]
    fn invalid_bool_is_rejected() {
        assert!(Settings::from_lookup(lookup_from(&[("CONSOLE_FIXED_HEADER", "maybe")])).is_err());
    }
}
