#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use uuid::Uuid;

use gymdesk::{
    content::{Article, FeedFetcher},
    invitation::{models::InvitationModel, repository::InvitationRepository},
    session::{AuthApi, AuthProvider, AuthStatus, CookieJar, Credentials, CurrentUser, Session},
    AppError,
};

// ============================================================================
// Auth provider
// ============================================================================

#[derive(Clone)]
pub enum ProviderBehaviour {
    Allow(Uuid),
    Deny,
    Fail,
    Hang,
}

/// Auth provider that answers every check the same way and counts the checks
pub struct ScriptedAuthProvider {
    behaviour: ProviderBehaviour,
    checks: AtomicUsize,
    sign_outs: AtomicUsize,
}

impl ScriptedAuthProvider {
    pub fn new(behaviour: ProviderBehaviour) -> Self {
        Self {
            behaviour,
            checks: AtomicUsize::new(0),
            sign_outs: AtomicUsize::new(0),
        }
    }

    pub fn checks(&self) -> usize {
        self.checks.load(Ordering::SeqCst)
    }

    pub fn sign_outs(&self) -> usize {
        self.sign_outs.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AuthProvider for ScriptedAuthProvider {
    async fn validate_or_refresh(&self, _jar: &mut CookieJar) -> Result<AuthStatus, AppError> {
        self.checks.fetch_add(1, Ordering::SeqCst);
        match self.behaviour {
            ProviderBehaviour::Allow(user_id) => {
                Ok(AuthStatus::Authenticated(CurrentUser { user_id }))
            }
            ProviderBehaviour::Deny => Ok(AuthStatus::Anonymous),
            ProviderBehaviour::Fail => Err(AppError::Upstream("auth service down".to_string())),
            ProviderBehaviour::Hang => {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok(AuthStatus::Anonymous)
            }
        }
    }

    async fn sign_in(
        &self,
        _credentials: &Credentials,
        _jar: &mut CookieJar,
    ) -> Result<AuthStatus, AppError> {
        match self.behaviour {
            ProviderBehaviour::Allow(user_id) => {
                Ok(AuthStatus::Authenticated(CurrentUser { user_id }))
            }
            _ => Ok(AuthStatus::Anonymous),
        }
    }

    async fn sign_out(&self, jar: &mut CookieJar) -> Result<(), AppError> {
        self.sign_outs.fetch_add(1, Ordering::SeqCst);
        jar.clear_session();
        match self.behaviour {
            ProviderBehaviour::Fail => Err(AppError::Upstream("auth service down".to_string())),
            _ => Ok(()),
        }
    }
}

// ============================================================================
// Hosted auth API
// ============================================================================

/// Auth API whose refresh endpoint hands out a fixed session
pub struct RefreshingAuthApi {
    session: Option<Session>,
    refreshed_with: Mutex<Vec<String>>,
}

impl RefreshingAuthApi {
    pub fn new(session: Option<Session>) -> Self {
        Self {
            session,
            refreshed_with: Mutex::new(Vec::new()),
        }
    }

    pub fn refreshed_with(&self) -> Vec<String> {
        self.refreshed_with.lock().unwrap().clone()
    }
}

#[async_trait]
impl AuthApi for RefreshingAuthApi {
    async fn refresh_session(&self, refresh_token: &str) -> Result<Option<Session>, AppError> {
        self.refreshed_with
            .lock()
            .unwrap()
            .push(refresh_token.to_string());
        Ok(self.session.clone())
    }

    async fn sign_in_with_password(
        &self,
        _email: &str,
        _password: &str,
    ) -> Result<Option<Session>, AppError> {
        Ok(self.session.clone())
    }

    async fn sign_out(&self, _access_token: &str) -> Result<(), AppError> {
        Ok(())
    }
}

// ============================================================================
// Repositories and content sources
// ============================================================================

/// Invitation repository that records every insert it receives
#[derive(Default)]
pub struct RecordingInvitationRepository {
    inserts: Mutex<Vec<InvitationModel>>,
}

impl RecordingInvitationRepository {
    pub fn inserts(&self) -> Vec<InvitationModel> {
        self.inserts.lock().unwrap().clone()
    }
}

#[async_trait]
impl InvitationRepository for RecordingInvitationRepository {
    async fn create_invitation(&self, invitation: &InvitationModel) -> Result<(), AppError> {
        self.inserts.lock().unwrap().push(invitation.clone());
        Ok(())
    }

    async fn list_by_gym(&self, gym_id: Uuid) -> Result<Vec<InvitationModel>, AppError> {
        Ok(self
            .inserts
            .lock()
            .unwrap()
            .iter()
            .filter(|invitation| invitation.gym_id == gym_id)
            .cloned()
            .collect())
    }
}

/// Feed fetcher serving canned articles per URL; unknown URLs fail
pub struct CannedFeeds {
    feeds: Vec<(String, Vec<Article>)>,
}

impl CannedFeeds {
    pub fn new(feeds: Vec<(String, Vec<Article>)>) -> Self {
        Self { feeds }
    }
}

#[async_trait]
impl FeedFetcher for CannedFeeds {
    async fn fetch(&self, url: &str) -> Result<Vec<Article>, AppError> {
        self.feeds
            .iter()
            .find(|(feed, _)| feed == url)
            .map(|(_, articles)| articles.clone())
            .ok_or_else(|| AppError::Upstream(format!("{} unreachable", url)))
    }
}
