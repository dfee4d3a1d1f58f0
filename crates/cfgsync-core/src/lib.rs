// cfgsync-core: configlet reconciliation engine and run driver.
//
// Sits between the raw `cfgsync-api` client and the CLI. The engine in
// `reconcile` is pure; everything that talks to the controller goes through
// the `ProvisioningApi` trait.

pub mod api;
pub mod batch;
pub mod cleanup;
pub mod config;
pub mod convert;
pub mod driver;
pub mod error;
pub mod generate;
pub mod inventory;
pub mod model;
pub mod reconcile;
pub mod session;

// ── Primary re-exports ──────────────────────────────────────────────
pub use api::ProvisioningApi;
pub use batch::{ChangeBatch, KeyedNames, ReassignDirective};
pub use cleanup::DeletionQueue;
pub use config::{ControllerConfig, RunOptions, TlsVerification, UnmatchedPolicy, controller_url};
pub use driver::{DeviceReport, Reconciler, RunReport};
pub use error::CoreError;
pub use generate::{BuilderOutput, GeneratedSet, generate_all};
pub use inventory::{BuilderMap, Inventory};
pub use reconcile::{DevicePlan, PlanChange, owning_builder, reconcile_device};
pub use session::Session;

pub use model::{Configlet, ConfigletKind, Container, Device, GeneratedConfiglet, Task};
