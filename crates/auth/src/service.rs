use async_trait::async_trait;

use console_core::ServiceResult;

use crate::{Captcha, Credential, LoginData, TokenPair, UserProfile};

/// Backend authentication collaborator.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Fresh login challenge; its key goes back with the login form.
    async fn captcha(&self) -> ServiceResult<Captcha>;

    async fn login(&self, data: &LoginData) -> ServiceResult<TokenPair>;

    /// Profile of the user owning `credential`. Fails on invalid/expired
    /// credentials.
    async fn current_user(&self, credential: &Credential) -> ServiceResult<UserProfile>;

    async fn logout(&self, credential: &Credential) -> ServiceResult<()>;
}
