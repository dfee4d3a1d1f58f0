// cfgsync-api: Async Rust client for the provisioning controller's REST API

pub mod auth;
pub mod client;
pub mod configlets;
pub mod error;
pub mod inventory;
pub mod models;
pub mod provisioning;
pub mod tasks;
pub mod transport;

pub use client::CvpClient;
pub use error::Error;
pub use models::{
    ComplianceResponse, ConfigletRecord, ConfigletRef, ContainerRecord, DeviceRecord,
    GenerationResult, TaskPage, TaskRecord, TempTask,
};
pub use transport::{TlsMode, TransportConfig};
