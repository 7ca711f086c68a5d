// fieldsync-api: Async Rust client for the field-sensor monitoring service

pub mod client;
pub mod endpoints;
pub mod error;
pub mod models;
pub mod transport;

pub use client::RemoteClient;
pub use error::Error;
pub use models::{RawAlert, RawReport, RawSensor, RawStats, ReportsPayload};
pub use transport::{REQUEST_TIMEOUT, TlsMode, TransportConfig};
