//! Response envelope shared by every API endpoint:
//! `{"code": "00000", "data": ..., "msg": "..."}`.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use console_core::{ServiceError, ServiceResult};

/// Business code of a successful call. Anything else is an error.
pub const SUCCESS_CODE: &str = "00000";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub code: String,
    pub data: Option<T>,
    #[serde(default)]
    pub msg: String,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            code: SUCCESS_CODE.to_string(),
            data: Some(data),
            msg: "ok".to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.code == SUCCESS_CODE
    }

    /// Success with data, or the matching [`ServiceError`].
    pub fn into_result(self) -> ServiceResult<T> {
        if !self.is_success() {
            return Err(ServiceError::api(self.code, self.msg));
        }
        self.data
            .ok_or_else(|| ServiceError::parse("envelope has no data"))
    }
}

impl Envelope<serde_json::Value> {
    pub fn error(code: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            data: None,
            msg: msg.into(),
        }
    }
}

/// Decode a response body into its payload.
pub fn decode<T: DeserializeOwned>(body: &str) -> ServiceResult<T> {
    let envelope: Envelope<T> =
        serde_json::from_str(body).map_err(|e| ServiceError::parse(e.to_string()))?;
    envelope.into_result()
}

/// Decode a response body whose payload is irrelevant (`data: {}`).
pub fn decode_unit(body: &str) -> ServiceResult<()> {
    let envelope: Envelope<serde_json::Value> =
        serde_json::from_str(body).map_err(|e| ServiceError::parse(e.to_string()))?;
    if envelope.is_success() {
        Ok(())
    } else {
        Err(ServiceError::api(envelope.code, envelope.msg))
    }
}
