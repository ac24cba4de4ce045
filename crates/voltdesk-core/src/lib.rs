// voltdesk-core: Client-side state and effect orchestration between voltdesk-api and consumers.

pub mod config;
pub mod console;
pub mod effect;
pub mod error;
pub mod model;
pub mod request;
pub mod session;
pub mod store;
pub mod stream;
pub mod view;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{ConsoleConfig, InsertPolicy, TlsVerification};
pub use console::Console;
pub use effect::{Orchestrator, RolePowerOrchestrator};
pub use error::{CoreError, FORBIDDEN_MESSAGE};
pub use request::{OperationKind, Request, RolePowerRequest};
pub use session::{Session, SessionContext, SessionUser};
pub use store::{
    EntityState, EntityTransition, Notification, NotificationKind, PowerSet, RolePowerState,
    RolePowerTransition, Slice, Status,
};
pub use stream::SliceStream;

// Re-export model types at the crate root for ergonomics.
pub use model::{
    Audit, Device, DeviceDraft, DeviceStatus, Entity, EntityId, EntityKind, InsertPosition, Menu,
    MenuDraft, Meter, MeterDraft, MeterKind, Power, PowerDraft, Role, RoleDraft, User, UserDraft,
};
