// ── Domain model ──
//
// Canonical representations of the controller entities a reconciliation run
// works with. Wire records from `cfgsync_api` are converted into these types
// in `crate::convert`; nothing outside this crate sees the wire shapes.

pub mod configlet;
pub mod device;
pub mod task;

pub use configlet::{Configlet, ConfigletKind, GeneratedConfiglet};
pub use device::{Container, Device};
pub use task::Task;
