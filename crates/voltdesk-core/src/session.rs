// ── Authenticated session ──
//
// One owner for the bearer token and the signed-in identity. Every
// consumer reads through typed accessors; logout invalidates it in one
// place.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use voltdesk_api::LoginUser;

use crate::model::EntityId;

/// The identity a token belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: EntityId,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role_id: Option<EntityId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role_name: Option<String>,
}

impl From<LoginUser> for SessionUser {
    fn from(user: LoginUser) -> Self {
        Self {
            id: EntityId::new(user.id),
            username: user.username,
            role_id: user.role_id.map(EntityId::new),
            role_name: user.role_name,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    pub token: SecretString,
    pub user: SessionUser,
    pub established_at: DateTime<Utc>,
}

impl Session {
    pub fn new(token: SecretString, user: SessionUser) -> Self {
        Self {
            token,
            user,
            established_at: Utc::now(),
        }
    }
}

/// Observable holder of the current session.
pub struct SessionContext {
    current: watch::Sender<Option<Arc<Session>>>,
}

impl SessionContext {
    pub fn new() -> Self {
        let (current, _) = watch::channel(None);
        Self { current }
    }

    pub fn establish(&self, session: Session) -> Arc<Session> {
        let session = Arc::new(session);
        self.current.send_replace(Some(Arc::clone(&session)));
        session
    }

    /// Drop the session. Returns the one that was active, if any.
    pub fn invalidate(&self) -> Option<Arc<Session>> {
        self.current.send_replace(None)
    }

    pub fn current(&self) -> Option<Arc<Session>> {
        self.current.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.borrow().is_some()
    }

    pub fn user(&self) -> Option<SessionUser> {
        self.current.borrow().as_ref().map(|s| s.user.clone())
    }

    pub fn role_id(&self) -> Option<EntityId> {
        self.current.borrow().as_ref().and_then(|s| s.user.role_id)
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<Session>>> {
        self.current.subscribe()
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> SessionUser {
        SessionUser {
            id: EntityId::new(11),
            username: "ops".into(),
            role_id: Some(EntityId::new(2)),
            role_name: Some("Operator".into()),
        }
    }

    #[test]
    fn establish_then_invalidate() {
        let ctx = SessionContext::new();
        assert!(!ctx.is_authenticated());

        ctx.establish(Session::new(SecretString::from("t".to_owned()), user()));
        assert!(ctx.is_authenticated());
        assert_eq!(ctx.role_id(), Some(EntityId::new(2)));
        assert_eq!(ctx.user().map(|u| u.username), Some("ops".to_owned()));

        let previous = ctx.invalidate();
        assert!(previous.is_some());
        assert!(!ctx.is_authenticated());
        assert!(ctx.role_id().is_none());
    }

    #[test]
    fn login_user_converts() {
        let converted = SessionUser::from(LoginUser {
            id: 11,
            username: "ops".into(),
            role_id: Some(2),
            role_name: Some("Operator".into()),
        });
        assert_eq!(converted, user());
    }
}
