//! reqwest-backed client for the dashboard API.

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, RequestBuilder};

use console_auth::{AuthService, Captcha, Credential, LoginData, TokenPair, UserProfile};
use console_core::{ServiceError, ServiceResult, Settings};
use console_router::{RouteDescriptor, RouteService};

use crate::envelope::{decode, decode_unit};

const CAPTCHA: &str = "/api/v1/auth/captcha";
const LOGIN: &str = "/api/v1/auth/login";
const LOGOUT: &str = "/api/v1/auth/logout";
const CURRENT_USER: &str = "/api/v1/users/me";
const ROUTES: &str = "/api/v1/menus/routes";

#[derive(Debug, Clone)]
pub struct HttpApi {
    base_url: String,
    client: Client,
}

impl HttpApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.api_base_url.clone())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send and return the body of a success-status response.
    async fn send(&self, req: RequestBuilder) -> ServiceResult<String> {
        let resp = req
            .send()
            .await
            .map_err(|e| ServiceError::network(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| ServiceError::network(e.to_string()))?;

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "api call failed");
            return Err(ServiceError::Http(status.as_u16(), body));
        }
        Ok(body)
    }

    fn authorized(&self, req: RequestBuilder, credential: &Credential) -> RequestBuilder {
        req.header(AUTHORIZATION, credential.as_str())
    }
}

#[async_trait]
impl AuthService for HttpApi {
    async fn captcha(&self) -> ServiceResult<Captcha> {
        let body = self.send(self.client.get(self.url(CAPTCHA))).await?;
        decode(&body)
    }

    async fn login(&self, data: &LoginData) -> ServiceResult<TokenPair> {
        let body = self
            .send(self.client.post(self.url(LOGIN)).json(data))
            .await?;
        decode(&body)
    }

    async fn current_user(&self, credential: &Credential) -> ServiceResult<UserProfile> {
        let req = self.authorized(self.client.get(self.url(CURRENT_USER)), credential);
        let body = self.send(req).await?;
        decode(&body)
    }

    async fn logout(&self, credential: &Credential) -> ServiceResult<()> {
        let req = self.authorized(self.client.delete(self.url(LOGOUT)), credential);
        let body = self.send(req).await?;
        decode_unit(&body)
    }
}

#[async_trait]
impl RouteService for HttpApi {
    async fn list_routes(&self, credential: &Credential) -> ServiceResult<Vec<RouteDescriptor>> {
        let req = self.authorized(self.client.get(self.url(ROUTES)), credential);
        let body = self.send(req).await?;
        let routes: Vec<RouteDescriptor> = decode(&body)?;
        tracing::debug!(count = routes.len(), "route tree fetched");
        Ok(routes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_is_normalized() {
        let api = HttpApi::new("http://localhost:3000/");
        assert_eq!(api.url(ROUTES), "http://localhost:3000/api/v1/menus/routes");
    }

    #[tokio::test]
    async fn unreachable_backend_is_a_network_error() {
        let api = HttpApi::new("http://127.0.0.1:9");
        let err = api
            .current_user(&Credential::new("Bearer t"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Network(_)));
    }
}
