// ── Runtime console configuration ──
//
// Describes *how* to reach a backend. Core never reads config files;
// the CLI builds a `ConsoleConfig` from its profile and hands it in.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use url::Url;
use voltdesk_api::{TlsMode, TransportConfig};

use crate::model::{EntityKind, InsertPosition};

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-signed certs).
    DangerAcceptInvalid,
}

/// Per-entity override of where created records are inserted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InsertPolicy {
    overrides: HashMap<EntityKind, InsertPosition>,
}

impl InsertPolicy {
    pub fn with(mut self, kind: EntityKind, position: InsertPosition) -> Self {
        self.overrides.insert(kind, position);
        self
    }

    pub fn set(&mut self, kind: EntityKind, position: InsertPosition) {
        self.overrides.insert(kind, position);
    }

    /// Configured position, or the entity's default.
    pub fn position_for(&self, kind: EntityKind) -> InsertPosition {
        self.overrides
            .get(&kind)
            .copied()
            .unwrap_or_else(|| kind.default_insert())
    }
}

#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    /// API root, e.g. `https://ems.example.com/api`.
    pub url: Url,
    pub tls: TlsVerification,
    /// Per-request timeout enforced by the HTTP transport.
    pub timeout: Duration,
    pub insert: InsertPolicy,
}

impl ConsoleConfig {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
            insert: InsertPolicy::default(),
        }
    }

    pub(crate) fn transport(&self) -> TransportConfig {
        TransportConfig {
            tls: tls_to_transport(&self.tls),
            timeout: self.timeout,
        }
    }
}

fn tls_to_transport(tls: &TlsVerification) -> TlsMode {
    match tls {
        TlsVerification::SystemDefaults => TlsMode::System,
        TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
        TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn insert_policy_falls_back_to_entity_default() {
        let policy = InsertPolicy::default().with(EntityKind::Power, InsertPosition::Prepend);
        assert_eq!(policy.position_for(EntityKind::Power), InsertPosition::Prepend);
        assert_eq!(policy.position_for(EntityKind::Device), InsertPosition::Prepend);
        assert_eq!(policy.position_for(EntityKind::Role), InsertPosition::Append);
    }

    #[test]
    fn transport_carries_timeout_and_tls() {
        let mut config = ConsoleConfig::new(Url::parse("https://ems.local/api").unwrap());
        config.timeout = Duration::from_secs(5);
        config.tls = TlsVerification::DangerAcceptInvalid;
        let transport = config.transport();
        assert_eq!(transport.timeout, Duration::from_secs(5));
        assert!(matches!(transport.tls, TlsMode::DangerAcceptInvalid));
    }
}
