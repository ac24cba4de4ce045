// ── Console ──
//
// The entry point for consumers. Owns the API client, the session, and
// one orchestrator (with its slice) per collection. Cheaply cloneable;
// passed explicitly, never global.

use std::sync::Arc;

use secrecy::SecretString;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use voltdesk_api::ApiClient;

use crate::config::{ConsoleConfig, InsertPolicy};
use crate::effect::{Orchestrator, RolePowerOrchestrator};
use crate::error::CoreError;
use crate::model::{Device, Entity, Menu, Meter, Power, Role, User};
use crate::session::{Session, SessionContext, SessionUser};

#[derive(Clone)]
pub struct Console {
    inner: Arc<ConsoleInner>,
}

struct ConsoleInner {
    api: Arc<ApiClient>,
    session: SessionContext,
    cancel: CancellationToken,
    devices: Orchestrator<Device>,
    meters: Orchestrator<Meter>,
    powers: Orchestrator<Power>,
    roles: Orchestrator<Role>,
    users: Orchestrator<User>,
    menus: Orchestrator<Menu>,
    role_powers: RolePowerOrchestrator,
}

impl Console {
    /// Build a console from configuration. Does not contact the backend.
    pub fn new(config: &ConsoleConfig) -> Result<Self, CoreError> {
        let api = ApiClient::new(config.url.clone(), &config.transport())?;
        Ok(Self::with_api(api, &config.insert))
    }

    /// Build a console around an existing API client.
    pub fn with_api(api: ApiClient, insert: &InsertPolicy) -> Self {
        let api = Arc::new(api);
        let cancel = CancellationToken::new();

        Self {
            inner: Arc::new(ConsoleInner {
                devices: orchestrator(&api, insert, &cancel),
                meters: orchestrator(&api, insert, &cancel),
                powers: orchestrator(&api, insert, &cancel),
                roles: orchestrator(&api, insert, &cancel),
                users: orchestrator(&api, insert, &cancel),
                menus: orchestrator(&api, insert, &cancel),
                role_powers: RolePowerOrchestrator::new(Arc::clone(&api), cancel.child_token()),
                session: SessionContext::new(),
                api,
                cancel,
            }),
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    // ── Session ──────────────────────────────────────────────────

    /// Exchange credentials for a token and install it.
    pub async fn login(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<Arc<Session>, CoreError> {
        let resp = self
            .inner
            .api
            .login(username, password)
            .await
            .map_err(|e| match CoreError::from(e) {
                CoreError::Rejected { message, .. } => CoreError::AuthenticationFailed {
                    message: message.unwrap_or_else(|| "invalid username or password".into()),
                },
                other => other,
            })?;

        let session = Session::new(resp.token, SessionUser::from(resp.user));
        let session = self.restore_session(session);
        info!(user = %session.user.username, "logged in");
        Ok(session)
    }

    /// Install a previously persisted session without contacting the backend.
    pub fn restore_session(&self, session: Session) -> Arc<Session> {
        self.inner.api.set_token(session.token.clone());
        let session = self.inner.session.establish(session);
        debug!(user = %session.user.username, "session installed");
        session
    }

    /// Drop the token and invalidate the session.
    pub fn logout(&self) -> Option<Arc<Session>> {
        self.inner.api.clear_token();
        let previous = self.inner.session.invalidate();
        if let Some(ref s) = previous {
            info!(user = %s.user.username, "logged out");
        }
        previous
    }

    pub fn session(&self) -> &SessionContext {
        &self.inner.session
    }

    /// The active session, or `NotAuthenticated`.
    pub fn require_session(&self) -> Result<Arc<Session>, CoreError> {
        self.inner
            .session
            .current()
            .ok_or(CoreError::NotAuthenticated)
    }

    // ── Orchestrators ────────────────────────────────────────────

    pub fn devices(&self) -> &Orchestrator<Device> {
        &self.inner.devices
    }

    pub fn meters(&self) -> &Orchestrator<Meter> {
        &self.inner.meters
    }

    pub fn powers(&self) -> &Orchestrator<Power> {
        &self.inner.powers
    }

    pub fn roles(&self) -> &Orchestrator<Role> {
        &self.inner.roles
    }

    pub fn users(&self) -> &Orchestrator<User> {
        &self.inner.users
    }

    pub fn menus(&self) -> &Orchestrator<Menu> {
        &self.inner.menus
    }

    pub fn role_powers(&self) -> &RolePowerOrchestrator {
        &self.inner.role_powers
    }

    // ── Lifecycle ────────────────────────────────────────────────

    /// Stop in-flight work. Pending completions resolve to `None`.
    pub fn shutdown(&self) {
        self.inner.cancel.cancel();
        debug!("console shut down");
    }

    pub fn is_shut_down(&self) -> bool {
        self.inner.cancel.is_cancelled()
    }
}

fn orchestrator<T: Entity>(
    api: &Arc<ApiClient>,
    insert: &InsertPolicy,
    cancel: &CancellationToken,
) -> Orchestrator<T> {
    Orchestrator::new(
        Arc::clone(api),
        insert.position_for(T::KIND),
        cancel.child_token(),
    )
}
