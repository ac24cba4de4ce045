// voltdesk-api: Async Rust client for the voltdesk REST API.

pub mod auth;
pub mod client;
pub mod crud;
pub mod envelope;
pub mod error;
pub mod role_powers;
pub mod transport;

pub use auth::{LoginResponse, LoginUser};
pub use client::ApiClient;
pub use envelope::Envelope;
pub use error::Error;
pub use transport::{TlsMode, TransportConfig};
