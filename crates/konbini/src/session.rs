//! Signed-in session: stored credentials plus silent renewal.
//!
//! All renewal goes through one async mutex, so concurrent callers that
//! find the access token expired wait for a single refresh instead of
//! racing their own.
//!
//! Once the credentials are discarded, whether by sign-out or because they
//! can no longer be renewed, the session stays signed out and never calls
//! the transport again.

use konbini_auth::{
    complete_renewal, AuthError, CredentialPair, CredentialState, CredentialStore, Credentials,
    ReauthReason, Renewal,
};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::transport::AuthTransport;

/// A session over stored credentials.
pub struct Session<T: AuthTransport, S: CredentialStore> {
    transport: T,
    store: S,
    credentials: Mutex<Option<Credentials>>,
}

impl<T: AuthTransport, S: CredentialStore> Session<T, S> {
    /// Start a session with credentials just obtained from sign-in, and
    /// persist them.
    pub fn sign_in(credentials: Credentials, transport: T, store: S) -> Result<Self> {
        store.save(&credentials)?;
        info!(has_email = credentials.email.is_some(), "signed in");
        Ok(Self::with_credentials(credentials, transport, store))
    }

    /// Resume from the store. Fails with [`AuthError::NotAuthenticated`]
    /// when nothing is stored.
    pub fn resume(transport: T, store: S) -> Result<Self> {
        let credentials = store.load()?;
        debug!("resumed stored session");
        Ok(Self::with_credentials(credentials, transport, store))
    }

    fn with_credentials(credentials: Credentials, transport: T, store: S) -> Self {
        Self {
            transport,
            store,
            credentials: Mutex::new(Some(credentials)),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// A snapshot of the current credentials.
    pub async fn credentials(&self) -> Result<Credentials> {
        let slot = self.credentials.lock().await;
        Ok(signed_in(&slot)?.clone())
    }

    /// Where the credentials stand right now.
    pub async fn state(&self) -> Result<CredentialState> {
        let slot = self.credentials.lock().await;
        Ok(signed_in(&slot)?.pair().state())
    }

    /// Whether the session still holds credentials.
    pub async fn is_signed_in(&self) -> bool {
        self.credentials.lock().await.is_some()
    }

    /// A usable access token, renewed first if it has expired.
    ///
    /// When renewal is impossible the stored credentials are removed and
    /// the error is session fatal.
    pub async fn access_token(&self) -> Result<String> {
        let mut slot = self.credentials.lock().await;
        let pair = signed_in(&slot)?.pair();

        match pair.state() {
            CredentialState::Valid => Ok(pair.access_token().to_string()),
            CredentialState::AccessExpired => {
                debug!("access token expired, renewing");
                self.renew_locked(&mut slot, &pair).await
            }
            CredentialState::BothExpired => {
                self.discard(&mut slot, ReauthReason::BothExpired)?;
                Err(AuthError::ReauthenticationRequired(ReauthReason::BothExpired).into())
            }
        }
    }

    /// Renew even though the access token looks valid, e.g. after the
    /// service answered 401 to it.
    pub async fn force_renew(&self) -> Result<String> {
        let mut slot = self.credentials.lock().await;
        let pair = signed_in(&slot)?.pair();

        if pair.state() == CredentialState::BothExpired {
            self.discard(&mut slot, ReauthReason::BothExpired)?;
            return Err(AuthError::ReauthenticationRequired(ReauthReason::BothExpired).into());
        }
        self.renew_locked(&mut slot, &pair).await
    }

    /// Forget the credentials, in memory and in the store.
    pub async fn sign_out(&self) -> Result<()> {
        let mut slot = self.credentials.lock().await;
        *slot = None;
        self.store.remove()?;
        info!("signed out");
        Ok(())
    }

    async fn renew_locked(
        &self,
        slot: &mut Option<Credentials>,
        pair: &CredentialPair,
    ) -> Result<String> {
        let outcome = self.transport.refresh(pair.refresh_token()).await;

        let renewal = match complete_renewal(pair, outcome) {
            Ok(renewal) => renewal,
            Err(AuthError::ReauthenticationRequired(reason)) => {
                self.discard(slot, reason)?;
                return Err(AuthError::ReauthenticationRequired(reason).into());
            }
            Err(e) => {
                warn!(error = %e, "access token renewal failed");
                return Err(e.into());
            }
        };

        self.persist(slot, renewal)
    }

    fn persist(&self, slot: &mut Option<Credentials>, renewal: Renewal) -> Result<String> {
        let needs_persist = renewal.needs_persist();
        let pair = renewal.into_pair();
        let credentials = slot.as_mut().ok_or(AuthError::NotAuthenticated)?;
        credentials.update_from(&pair);

        if needs_persist {
            self.store.save(credentials)?;
            info!("access token renewed");
        }
        Ok(pair.access_token().to_string())
    }

    fn discard(&self, slot: &mut Option<Credentials>, reason: ReauthReason) -> Result<()> {
        warn!(%reason, "credentials unusable, removing");
        *slot = None;
        self.store.remove()?;
        Ok(())
    }
}

fn signed_in(slot: &Option<Credentials>) -> std::result::Result<&Credentials, AuthError> {
    slot.as_ref().ok_or(AuthError::NotAuthenticated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::KonbiniError;
    use crate::transport::memory::ScriptedTransport;
    use konbini_auth::{MemoryCredentialStore, RefreshError};
    use konbini_testkit::fixtures::{expired_token, fresh_token};

    fn credentials(access: String, refresh: String) -> Credentials {
        Credentials::new(access, refresh).with_email("dev@example.com")
    }

    #[tokio::test]
    async fn test_valid_token_needs_no_renewal() {
        let access = fresh_token();
        let store = MemoryCredentialStore::with(credentials(access.clone(), fresh_token()));
        let session = Session::resume(ScriptedTransport::new(), store).unwrap();

        assert_eq!(session.access_token().await.unwrap(), access);
        assert_eq!(session.transport().calls(), 0);
        assert_eq!(session.store().save_count(), 0);
    }

    #[tokio::test]
    async fn test_expired_access_is_renewed_and_persisted() {
        let renewed = fresh_token();
        let refresh = fresh_token();
        let store = MemoryCredentialStore::with(credentials(expired_token(), refresh.clone()));
        let transport = ScriptedTransport::new().reply(Ok(renewed.clone()));
        let session = Session::resume(transport, store).unwrap();

        assert_eq!(session.access_token().await.unwrap(), renewed);
        assert_eq!(session.transport().seen().await, vec![refresh]);
        assert_eq!(session.store().save_count(), 1);

        let stored = session.store().load().unwrap();
        assert_eq!(stored.access_token, renewed);
        assert_eq!(stored.email.as_deref(), Some("dev@example.com"));
    }

    #[tokio::test]
    async fn test_both_expired_removes_credentials() {
        let store = MemoryCredentialStore::with(credentials(expired_token(), expired_token()));
        let session = Session::resume(ScriptedTransport::new(), store).unwrap();

        let err = session.access_token().await.unwrap_err();
        assert!(err.is_session_fatal());
        assert_eq!(session.transport().calls(), 0);
        assert!(matches!(session.store().load(), Err(AuthError::NotAuthenticated)));
    }

    #[tokio::test]
    async fn test_rejected_refresh_removes_credentials() {
        let store = MemoryCredentialStore::with(credentials(expired_token(), fresh_token()));
        let transport = ScriptedTransport::new().reply(Err(RefreshError::Rejected("401".into())));
        let session = Session::resume(transport, store).unwrap();

        let err = session.access_token().await.unwrap_err();
        assert!(err.is_session_fatal());
        assert!(session.store().load().is_err());
    }

    #[tokio::test]
    async fn test_transient_failure_keeps_credentials() {
        let original = credentials(expired_token(), fresh_token());
        let store = MemoryCredentialStore::with(original.clone());
        let transport = ScriptedTransport::new()
            .reply(Err(RefreshError::Transient("timeout".into())))
            .reply(Ok(fresh_token()));
        let session = Session::resume(transport, store).unwrap();

        let err = session.access_token().await.unwrap_err();
        assert!(err.is_retryable());
        assert_eq!(session.store().load().unwrap(), original);

        assert!(session.access_token().await.is_ok());
        assert_eq!(session.transport().calls(), 2);
    }

    #[tokio::test]
    async fn test_force_renew() {
        let renewed = fresh_token();
        let store = MemoryCredentialStore::with(credentials(fresh_token(), fresh_token()));
        let transport = ScriptedTransport::new().reply(Ok(renewed.clone()));
        let session = Session::resume(transport, store).unwrap();

        assert_eq!(session.force_renew().await.unwrap(), renewed);
        assert_eq!(session.credentials().await.unwrap().access_token, renewed);
    }

    #[tokio::test]
    async fn test_resume_without_credentials() {
        let result = Session::resume(ScriptedTransport::new(), MemoryCredentialStore::new());
        assert!(matches!(
            result,
            Err(KonbiniError::Auth(AuthError::NotAuthenticated))
        ));
    }

    #[tokio::test]
    async fn test_sign_in_and_out() {
        let session = Session::sign_in(
            credentials(fresh_token(), fresh_token()),
            ScriptedTransport::new(),
            MemoryCredentialStore::new(),
        )
        .unwrap();
        assert!(session.store().load().is_ok());
        assert_eq!(session.state().await.unwrap(), CredentialState::Valid);

        session.sign_out().await.unwrap();
        assert!(session.store().load().is_err());
        assert!(!session.is_signed_in().await);
        assert!(session.access_token().await.unwrap_err().is_session_fatal());
    }

    #[tokio::test]
    async fn test_rejected_session_stays_signed_out() {
        let store = MemoryCredentialStore::with(credentials(expired_token(), fresh_token()));
        let transport = ScriptedTransport::new()
            .reply(Err(RefreshError::Rejected("401".into())))
            .reply(Ok(fresh_token()));
        let session = Session::resume(transport, store).unwrap();

        assert!(session.access_token().await.unwrap_err().is_session_fatal());
        assert!(!session.is_signed_in().await);

        let err = session.access_token().await.unwrap_err();
        assert!(matches!(err, KonbiniError::Auth(AuthError::NotAuthenticated)));
        assert!(session.force_renew().await.is_err());
        assert_eq!(session.transport().calls(), 1);
        assert_eq!(session.store().save_count(), 0);
        assert!(matches!(session.store().load(), Err(AuthError::NotAuthenticated)));
    }
}
