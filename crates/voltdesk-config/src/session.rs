// ── Session persistence ──
//
// `session.toml` in the data dir holds one entry per profile. The token
// is written in plaintext with owner-only permissions and lives as a
// `SecretString` once loaded.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::debug;

use voltdesk_core::{Session, SessionUser};

use crate::{ConfigError, data_dir};

#[derive(Debug, Default, Deserialize, Serialize)]
struct SessionFile {
    #[serde(default)]
    sessions: HashMap<String, StoredSession>,
}

#[derive(Debug, Deserialize, Serialize)]
struct StoredSession {
    token: String,
    established_at: DateTime<Utc>,
    user: SessionUser,
}

impl From<&Session> for StoredSession {
    fn from(session: &Session) -> Self {
        Self {
            token: session.token.expose_secret().to_owned(),
            established_at: session.established_at,
            user: session.user.clone(),
        }
    }
}

impl From<StoredSession> for Session {
    fn from(stored: StoredSession) -> Self {
        Self {
            token: SecretString::from(stored.token),
            user: stored.user,
            established_at: stored.established_at,
        }
    }
}

pub fn session_path() -> PathBuf {
    data_dir().join("session.toml")
}

fn read_file(path: &Path) -> Result<SessionFile, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(raw) => toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        }),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(SessionFile::default()),
        Err(e) => Err(e.into()),
    }
}

fn write_file(path: &Path, file: &SessionFile) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, toml::to_string_pretty(file)?)?;
    restrict_permissions(path)?;
    Ok(())
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<(), ConfigError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
    Ok(())
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> Result<(), ConfigError> {
    Ok(())
}

// ── Path-explicit API ───────────────────────────────────────────────

pub fn load_session_from(path: &Path, profile: &str) -> Result<Option<Session>, ConfigError> {
    let mut file = read_file(path)?;
    Ok(file.sessions.remove(profile).map(Session::from))
}

pub fn save_session_to(path: &Path, profile: &str, session: &Session) -> Result<(), ConfigError> {
    let mut file = read_file(path)?;
    file.sessions
        .insert(profile.to_owned(), StoredSession::from(session));
    write_file(path, &file)?;
    debug!(profile, path = %path.display(), "session saved");
    Ok(())
}

/// Remove the profile's session. Returns whether one existed.
pub fn clear_session_at(path: &Path, profile: &str) -> Result<bool, ConfigError> {
    let mut file = read_file(path)?;
    let existed = file.sessions.remove(profile).is_some();
    if existed {
        if file.sessions.is_empty() {
            std::fs::remove_file(path)?;
        } else {
            write_file(path, &file)?;
        }
    }
    Ok(existed)
}

// ── Canonical-path wrappers ─────────────────────────────────────────

pub fn load_session(profile: &str) -> Result<Option<Session>, ConfigError> {
    load_session_from(&session_path(), profile)
}

pub fn save_session(profile: &str, session: &Session) -> Result<(), ConfigError> {
    save_session_to(&session_path(), profile, session)
}

pub fn clear_session(profile: &str) -> Result<bool, ConfigError> {
    clear_session_at(&session_path(), profile)
}
