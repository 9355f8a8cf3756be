use serde::{Deserialize, Serialize};

use crate::{PermCode, RoleCode};

/// Login form payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginData {
    pub username: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub captcha_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub captcha_code: Option<String>,
}

impl LoginData {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            captcha_key: None,
            captcha_code: None,
        }
    }

    /// Attach the answer to a previously fetched [`Captcha`].
    pub fn with_captcha(mut self, key: impl Into<String>, code: impl Into<String>) -> Self {
        self.captcha_key = Some(key.into());
        self.captcha_code = Some(code.into());
        self
    }
}

/// Verification challenge shown on the login form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Captcha {
    /// Echoed back in [`LoginData::captcha_key`].
    pub captcha_key: String,
    /// `data:image/...;base64,` URI of the rendered code.
    pub verify_code_base64: String,
}

/// Tokens returned by a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub token_type: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires: Option<i64>,
}

/// Current user as returned by the profile call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub user_id: i64,
    #[serde(default)]
    pub nickname: String,
    #[serde(default)]
    pub avatar: String,
    /// Role codes; drive route permissions.
    #[serde(default)]
    pub roles: Vec<RoleCode>,
    /// Permission codes; drive button permissions.
    #[serde(default)]
    pub perms: Vec<PermCode>,
}

impl UserProfile {
    pub fn has_roles(&self) -> bool {
        !self.roles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captcha_uses_wire_field_names() {
        let captcha: Captcha = serde_json::from_value(serde_json::json!({
            "captchaKey": "534b8ef2",
            "verifyCodeBase64": "data:image/png;base64,AAAA",
        }))
        .unwrap();
        assert_eq!(captcha.captcha_key, "534b8ef2");
        assert!(captcha.verify_code_base64.starts_with("data:image/png"));
    }

    #[test]
    fn login_form_carries_captcha_answer_only_when_set() {
        let plain = serde_json::to_value(LoginData::new("admin", "123456")).unwrap();
        assert!(plain.get("captchaKey").is_none());

        let answered =
            serde_json::to_value(LoginData::new("admin", "123456").with_captcha("k1", "1234"))
                .unwrap();
        assert_eq!(answered["captchaKey"], "k1");
        assert_eq!(answered["captchaCode"], "1234");
    }
}
