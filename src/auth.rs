use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::error::ApiError;
use crate::models::account::{AuthResponse, UserProfile};

/// What gets persisted after a successful login or registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSession {
    pub token: String,
    #[serde(default)]
    pub profile: Option<UserProfile>,
}

/// Persistence for the bearer token and the signed-in profile.
pub trait CredentialStore: Send + Sync {
    fn load(&self) -> Option<StoredSession>;
    fn save(&self, session: &StoredSession) -> Result<(), String>;
    fn clear(&self) -> Result<(), String>;
}

#[derive(Default)]
pub struct InMemoryCredentialStore {
    session: RwLock<Option<StoredSession>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: &str) -> Self {
        Self {
            session: RwLock::new(Some(StoredSession {
                token: token.to_string(),
                profile: None,
            })),
        }
    }
}

impl CredentialStore for InMemoryCredentialStore {
    fn load(&self) -> Option<StoredSession> {
        match self.session.read() {
            Ok(guard) => guard.clone(),
            Err(e) => {
                warn!("Credential store poisoned, treating as signed out: {}", e);
                None
            }
        }
    }

    fn save(&self, session: &StoredSession) -> Result<(), String> {
        let mut guard = self
            .session
            .write()
            .map_err(|e| format!("Credential store poisoned: {}", e))?;
        *guard = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), String> {
        let mut guard = self
            .session
            .write()
            .map_err(|e| format!("Credential store poisoned: {}", e))?;
        *guard = None;
        Ok(())
    }
}

/// Keeps the session in a JSON file between CLI invocations.
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&self) -> Option<StoredSession> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No stored session at {}", self.path.display());
                return None;
            }
            Err(e) => {
                warn!("Cannot read session file {}: {}", self.path.display(), e);
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(session) => Some(session),
            Err(e) => {
                warn!("Ignoring unreadable session file {}: {}", self.path.display(), e);
                None
            }
        }
    }

    fn save(&self, session: &StoredSession) -> Result<(), String> {
        let raw = serde_json::to_string_pretty(session)
            .map_err(|e| format!("Failed to serialize session: {}", e))?;
        fs::write(&self.path, raw)
            .map_err(|e| format!("Failed to write {}: {}", self.path.display(), e))
    }

    fn clear(&self) -> Result<(), String> {
        if !self.path.exists() {
            return Ok(());
        }
        fs::remove_file(&self.path)
            .map_err(|e| format!("Failed to remove {}: {}", self.path.display(), e))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    SignedIn { username: String },
    SignedOut,
    /// An authenticated call came back 401; consumers should send the user to login.
    SessionExpired,
}

/// Credential store plus a broadcast of sign-in state changes.
pub struct Credentials {
    store: Arc<dyn CredentialStore>,
    events: broadcast::Sender<AuthEvent>,
}

impl Credentials {
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        let (events, _) = broadcast::channel(16);
        Self { store, events }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryCredentialStore::new()))
    }

    pub fn token(&self) -> Option<String> {
        self.store
            .load()
            .map(|session| session.token)
            .filter(|token| !token.is_empty())
    }

    pub fn profile(&self) -> Option<UserProfile> {
        self.store.load().and_then(|session| session.profile)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.events.subscribe()
    }

    pub fn sign_in(&self, response: AuthResponse) -> Result<(), String> {
        let username = response.user.username.clone();
        self.store.save(&StoredSession {
            token: response.token,
            profile: Some(response.user),
        })?;

        info!("Signed in as {}", username);
        let _ = self.events.send(AuthEvent::SignedIn { username });
        Ok(())
    }

    pub fn sign_out(&self) {
        if let Err(e) = self.store.clear() {
            warn!("Failed to clear credentials on sign out: {}", e);
        }
        info!("Signed out");
        let _ = self.events.send(AuthEvent::SignedOut);
    }

    /// Clear credentials after the server rejected them.
    pub fn expire(&self) {
        if let Err(e) = self.store.clear() {
            warn!("Failed to clear expired credentials: {}", e);
        }
        warn!("Session expired, credentials cleared");
        let _ = self.events.send(AuthEvent::SessionExpired);
    }

    /// Pass a call result through, expiring the session on 401.
    pub fn guard<T>(&self, result: Result<T, ApiError>) -> Result<T, ApiError> {
        if let Err(ApiError::Unauthorized) = &result {
            self.expire();
        }
        result
    }
}
