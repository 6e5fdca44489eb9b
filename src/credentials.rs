use std::{
    fs,
    path::PathBuf,
    sync::{Mutex, MutexGuard},
};

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CredentialKind {
    ApiKey,
    BearerToken,
}

impl CredentialKind {
    pub fn describe(&self) -> &'static str {
        match self {
            CredentialKind::ApiKey => "API key",
            CredentialKind::BearerToken => "bearer token",
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Credential store I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Credential store is corrupt: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Local key-value state: the outbound credentials plus how many quizzes
/// have been generated. Passed into the gateway instead of being looked up
/// ambiently.
pub trait CredentialStore: Send + Sync {
    fn get(&self, kind: CredentialKind) -> Option<SecretString>;

    /// Stores a trimmed value; a blank value clears the entry.
    fn set(&self, kind: CredentialKind, value: &str) -> Result<(), StoreError>;

    fn clear(&self, kind: CredentialKind) -> Result<(), StoreError>;

    fn generation_count(&self) -> u64;

    /// Increments and returns the generation counter.
    fn record_generation(&self) -> Result<u64, StoreError>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    bearer_token: Option<String>,
    #[serde(default)]
    generation_count: u64,
}

impl StoredState {
    fn slot(&mut self, kind: CredentialKind) -> &mut Option<String> {
        match kind {
            CredentialKind::ApiKey => &mut self.api_key,
            CredentialKind::BearerToken => &mut self.bearer_token,
        }
    }

    fn value(&self, kind: CredentialKind) -> Option<SecretString> {
        let value = match kind {
            CredentialKind::ApiKey => self.api_key.as_ref(),
            CredentialKind::BearerToken => self.bearer_token.as_ref(),
        };
        value.map(|v| SecretString::from(v.clone()))
    }

    fn assign(&mut self, kind: CredentialKind, value: &str) {
        let trimmed = value.trim();
        *self.slot(kind) = (!trimmed.is_empty()).then(|| trimmed.to_string());
    }
}

fn lock(state: &Mutex<StoredState>) -> MutexGuard<'_, StoredState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Process-local store. The backend seeds it from configuration; tests use
/// it directly.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    state: Mutex<StoredState>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_api_key(api_key: &str) -> Self {
        let store = Self::default();
        lock(&store.state).assign(CredentialKind::ApiKey, api_key);
        store
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self, kind: CredentialKind) -> Option<SecretString> {
        lock(&self.state).value(kind)
    }

    fn set(&self, kind: CredentialKind, value: &str) -> Result<(), StoreError> {
        lock(&self.state).assign(kind, value);
        Ok(())
    }

    fn clear(&self, kind: CredentialKind) -> Result<(), StoreError> {
        *lock(&self.state).slot(kind) = None;
        Ok(())
    }

    fn generation_count(&self) -> u64 {
        lock(&self.state).generation_count
    }

    fn record_generation(&self) -> Result<u64, StoreError> {
        let mut state = lock(&self.state);
        state.generation_count += 1;
        Ok(state.generation_count)
    }
}

/// JSON file on the user's machine, rewritten on every change.
#[derive(Debug)]
pub struct FileCredentialStore {
    path: PathBuf,
    state: Mutex<StoredState>,
}

impl FileCredentialStore {
    /// Opens the store at `path`; a missing file starts empty.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let state = match fs::read_to_string(&path) {
            Ok(contents) if contents.trim().is_empty() => StoredState::default(),
            Ok(contents) => serde_json::from_str(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => StoredState::default(),
            Err(e) => return Err(e.into()),
        };

        log::debug!("Opened credential store at {}", path.display());
        Ok(Self {
            path,
            state: Mutex::new(state),
        })
    }

    /// `$HOME/.study-quiz/credentials.json`, or the working directory when
    /// no home directory is known.
    pub fn default_path() -> PathBuf {
        std::env::var_os("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".study-quiz")
            .join("credentials.json")
    }

    fn persist(&self, state: &StoredState) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, serde_json::to_string_pretty(state)?)?;
        Ok(())
    }

    fn update<T>(&self, change: impl FnOnce(&mut StoredState) -> T) -> Result<T, StoreError> {
        let mut state = lock(&self.state);
        let mut next = state.clone();
        let result = change(&mut next);
        self.persist(&next)?;
        *state = next;
        Ok(result)
    }
}

impl CredentialStore for FileCredentialStore {
    fn get(&self, kind: CredentialKind) -> Option<SecretString> {
        lock(&self.state).value(kind)
    }

    fn set(&self, kind: CredentialKind, value: &str) -> Result<(), StoreError> {
        self.update(|state| state.assign(kind, value))?;
        log::info!("Saved {}", kind.describe());
        Ok(())
    }

    fn clear(&self, kind: CredentialKind) -> Result<(), StoreError> {
        self.update(|state| *state.slot(kind) = None)?;
        log::info!("Cleared {}", kind.describe());
        Ok(())
    }

    fn generation_count(&self) -> u64 {
        lock(&self.state).generation_count
    }

    fn record_generation(&self) -> Result<u64, StoreError> {
        self.update(|state| {
            state.generation_count += 1;
            state.generation_count
        })
    }
}
