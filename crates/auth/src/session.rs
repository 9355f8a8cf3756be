//! Per-login user state: credential, profile, role and permission codes.
//!
//! The session is constructed once and shared (`Arc`) with whatever needs it
//! (navigation guard, views). State is behind short-lived locks that are never
//! held across an `.await`.

use std::sync::{Arc, PoisonError, RwLock};

use thiserror::Error;

use console_core::{ServiceError, SessionId};

use crate::{
    AuthService, Captcha, Credential, CredentialStore, CredentialStoreError, LoginData, PermCode,
    RoleCode, UserProfile, authorize,
};

#[derive(Debug, Error)]
pub enum AuthError {
    /// Profile fetch rejected the credential (bad/expired token, or the
    /// backend could not be reached).
    #[error("credential invalid: {0}")]
    CredentialInvalid(#[source] ServiceError),

    /// The profile came back without any role code.
    #[error("profile has no roles")]
    EmptyRoles,

    #[error("no credential present")]
    MissingCredential,

    #[error("captcha unavailable: {0}")]
    CaptchaFailed(#[source] ServiceError),

    #[error("login failed: {0}")]
    LoginFailed(#[source] ServiceError),

    #[error("logout failed: {0}")]
    LogoutFailed(#[source] ServiceError),

    #[error(transparent)]
    Store(#[from] CredentialStoreError),
}

#[derive(Debug, Default)]
struct SessionState {
    session_id: Option<SessionId>,
    profile: Option<UserProfile>,
}

/// User session store.
pub struct UserSession {
    auth: Arc<dyn AuthService>,
    credentials: Arc<dyn CredentialStore>,
    state: RwLock<SessionState>,
}

impl UserSession {
    pub fn new(auth: Arc<dyn AuthService>, credentials: Arc<dyn CredentialStore>) -> Self {
        Self {
            auth,
            credentials,
            state: RwLock::new(SessionState::default()),
        }
    }

    /// Fetch a login challenge. Does not touch the stored credential.
    pub async fn captcha(&self) -> Result<Captcha, AuthError> {
        let captcha = self.auth.captcha().await.map_err(AuthError::CaptchaFailed)?;
        tracing::debug!(key = %captcha.captcha_key, "captcha issued");
        Ok(captcha)
    }

    /// Exchange a login form for a credential and persist it.
    pub async fn login(&self, data: &LoginData) -> Result<SessionId, AuthError> {
        let tokens = self
            .auth
            .login(data)
            .await
            .map_err(AuthError::LoginFailed)?;

        self.credentials.set(Credential::from_tokens(&tokens))?;

        let session_id = SessionId::new();
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        *state = SessionState {
            session_id: Some(session_id),
            profile: None,
        };
        tracing::info!(%session_id, user = %data.username, "login succeeded");
        Ok(session_id)
    }

    pub fn credential(&self) -> Option<Credential> {
        self.credentials.get()
    }

    pub fn has_credential(&self) -> bool {
        self.credential().is_some()
    }

    /// Id of the current session; minted on first use when the credential
    /// was restored from durable storage rather than a fresh login.
    pub fn session_id(&self) -> Option<SessionId> {
        if !self.has_credential() {
            return None;
        }
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        Some(*state.session_id.get_or_insert_with(SessionId::new))
    }

    /// Fetch the current user's profile and keep it.
    ///
    /// Rejects when the backend rejects the credential or when the profile
    /// holds no role codes.
    pub async fn fetch_profile(&self) -> Result<UserProfile, AuthError> {
        let credential = self.credential().ok_or(AuthError::MissingCredential)?;

        let profile = self
            .auth
            .current_user(&credential)
            .await
            .map_err(AuthError::CredentialInvalid)?;

        if !profile.has_roles() {
            return Err(AuthError::EmptyRoles);
        }

        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.session_id.get_or_insert_with(SessionId::new);
        state.profile = Some(profile.clone());
        tracing::debug!(user_id = profile.user_id, roles = ?profile.roles, "profile loaded");
        Ok(profile)
    }

    pub fn profile(&self) -> Option<UserProfile> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .profile
            .clone()
    }

    pub fn roles(&self) -> Vec<RoleCode> {
        self.profile().map(|p| p.roles).unwrap_or_default()
    }

    pub fn has_roles(&self) -> bool {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .profile
            .as_ref()
            .is_some_and(UserProfile::has_roles)
    }

    /// Button-level permission check against the loaded profile.
    pub fn has_perm(&self, required: &PermCode) -> bool {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        state
            .profile
            .as_ref()
            .is_some_and(|p| authorize::has_perm(&p.roles, &p.perms, required))
    }

    /// Tell the backend, then drop all local user state.
    ///
    /// Local state is dropped even when the backend call fails.
    pub async fn logout(&self) -> Result<(), AuthError> {
        let result = match self.credential() {
            Some(credential) => self
                .auth
                .logout(&credential)
                .await
                .map_err(AuthError::LogoutFailed),
            None => Ok(()),
        };
        self.reset_token()?;
        result
    }

    /// Clear the credential and every derived piece of user state.
    pub fn reset_token(&self) -> Result<(), AuthError> {
        *self.state.write().unwrap_or_else(PoisonError::into_inner) = SessionState::default();
        self.credentials.clear()?;
        tracing::info!("session reset");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use console_core::ServiceResult;

    use super::*;
    use crate::{MemoryCredentialStore, TokenPair};

    #[derive(Default)]
    struct FakeAuth {
        roles: Vec<RoleCode>,
        reject_profile: bool,
        captcha_down: bool,
        logouts: Mutex<u32>,
    }

    #[async_trait]
    impl AuthService for FakeAuth {
        async fn captcha(&self) -> ServiceResult<Captcha> {
            if self.captcha_down {
                return Err(ServiceError::network("connection refused"));
            }
            Ok(Captcha {
                captcha_key: "k1".to_string(),
                verify_code_base64: "data:image/png;base64,AAAA".to_string(),
            })
        }

        async fn login(&self, data: &LoginData) -> ServiceResult<TokenPair> {
            if data.password != "123456" {
                return Err(ServiceError::api("A0210", "bad password"));
            }
            if data.captcha_key.is_some() && data.captcha_code.as_deref() != Some("1234") {
                return Err(ServiceError::api("A0240", "wrong captcha"));
            }
            Ok(TokenPair {
                access_token: "tok".to_string(),
                token_type: "Bearer".to_string(),
                refresh_token: None,
                expires: None,
            })
        }

        async fn current_user(&self, _credential: &Credential) -> ServiceResult<UserProfile> {
            if self.reject_profile {
                return Err(ServiceError::Http(401, "expired".to_string()));
            }
            Ok(UserProfile {
                user_id: 2,
                nickname: "admin".to_string(),
                avatar: String::new(),
                roles: self.roles.clone(),
                perms: vec![PermCode::new("sys:user:add")],
            })
        }

        async fn logout(&self, _credential: &Credential) -> ServiceResult<()> {
            *self.logouts.lock().unwrap() += 1;
            Ok(())
        }
    }

    fn session(auth: FakeAuth) -> (UserSession, Arc<MemoryCredentialStore>) {
        let store = Arc::new(MemoryCredentialStore::new());
        (UserSession::new(Arc::new(auth), store.clone()), store)
    }

    #[tokio::test]
    async fn login_stores_bearer_credential() {
        let (session, store) = session(FakeAuth::default());
        session.login(&LoginData::new("admin", "123456")).await.unwrap();

        assert_eq!(store.get(), Some(Credential::new("Bearer tok")));
        assert!(session.session_id().is_some());
        assert!(!session.has_roles());
    }

    #[tokio::test]
    async fn failed_login_leaves_store_empty() {
        let (session, store) = session(FakeAuth::default());
        let err = session.login(&LoginData::new("admin", "nope")).await.unwrap_err();

        assert!(matches!(err, AuthError::LoginFailed(_)));
        assert!(store.get().is_none());
    }

    #[tokio::test]
    async fn captcha_answer_is_sent_with_login() {
        let (session, store) = session(FakeAuth::default());
        let captcha = session.captcha().await.unwrap();
        assert!(store.get().is_none());

        let wrong = LoginData::new("admin", "123456").with_captcha(&captcha.captcha_key, "0000");
        let err = session.login(&wrong).await.unwrap_err();
        assert!(matches!(err, AuthError::LoginFailed(ServiceError::Api { ref code, .. }) if code == "A0240"));

        let right = LoginData::new("admin", "123456").with_captcha(captcha.captcha_key, "1234");
        session.login(&right).await.unwrap();
        assert!(store.get().is_some());
    }

    #[tokio::test]
    async fn unreachable_captcha_maps_to_captcha_failed() {
        let (session, _) = session(FakeAuth {
            captcha_down: true,
            ..Default::default()
        });
        assert!(matches!(
            session.captcha().await,
            Err(AuthError::CaptchaFailed(ServiceError::Network(_)))
        ));
    }

    #[tokio::test]
    async fn fetch_profile_loads_roles_and_perms() {
        let (session, _) = session(FakeAuth {
            roles: vec![RoleCode::new("EDITOR")],
            ..Default::default()
        });
        session.login(&LoginData::new("admin", "123456")).await.unwrap();
        session.fetch_profile().await.unwrap();

        assert_eq!(session.roles(), vec![RoleCode::new("EDITOR")]);
        assert!(session.has_perm(&PermCode::new("sys:user:add")));
        assert!(!session.has_perm(&PermCode::new("sys:user:delete")));
    }

    #[tokio::test]
    async fn fetch_profile_rejects_empty_roles() {
        let (session, _) = session(FakeAuth::default());
        session.login(&LoginData::new("admin", "123456")).await.unwrap();

        assert!(matches!(session.fetch_profile().await, Err(AuthError::EmptyRoles)));
        assert!(!session.has_roles());
    }

    #[tokio::test]
    async fn fetch_profile_without_credential_fails() {
        let (session, _) = session(FakeAuth::default());
        assert!(matches!(
            session.fetch_profile().await,
            Err(AuthError::MissingCredential)
        ));
    }

    #[tokio::test]
    async fn rejected_profile_maps_to_credential_invalid() {
        let (session, _) = session(FakeAuth {
            reject_profile: true,
            ..Default::default()
        });
        session.login(&LoginData::new("admin", "123456")).await.unwrap();

        assert!(matches!(
            session.fetch_profile().await,
            Err(AuthError::CredentialInvalid(ServiceError::Http(401, _)))
        ));
    }

    #[tokio::test]
    async fn logout_clears_everything() {
        let auth = Arc::new(FakeAuth {
            roles: vec![RoleCode::ADMIN],
            ..Default::default()
        });
        let store = Arc::new(MemoryCredentialStore::new());
        let session = UserSession::new(auth.clone(), store.clone());

        session.login(&LoginData::new("admin", "123456")).await.unwrap();
        session.fetch_profile().await.unwrap();
        session.logout().await.unwrap();

        assert_eq!(*auth.logouts.lock().unwrap(), 1);
        assert!(store.get().is_none());
        assert!(session.profile().is_none());
        assert!(session.session_id().is_none());
    }
}
