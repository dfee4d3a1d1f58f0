// Provisioning controller wire types
//
// Models for the `/cvpservice` JSON API. Field names follow the controller's
// camelCase (and, for containers, PascalCase) spelling. Fields use
// `#[serde(default)]` liberally because the controller is inconsistent about
// field presence across releases.

use serde::{Deserialize, Serialize};

// ── Envelopes ────────────────────────────────────────────────────────

/// `{ "data": [...] }` envelope used by configlet and generator endpoints.
#[derive(Debug, Deserialize)]
pub struct DataEnvelope<T> {
    pub data: Vec<T>,
}

/// `{ "configletList": [...] }` envelope of the per-device configlet listing.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigletListEnvelope {
    #[serde(default)]
    pub configlet_list: Vec<ConfigletRecord>,
}

// ── Inventory ────────────────────────────────────────────────────────

/// Device record from `inventory/devices`.
///
/// The inventory returns dozens of fields per device; the ones the
/// reconciliation needs are modelled explicitly, everything else lands in
/// `extra`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceRecord {
    pub serial_number: String,
    pub system_mac_address: String,
    #[serde(default)]
    pub parent_container_key: String,
    #[serde(default)]
    pub ip_address: String,
    #[serde(default)]
    pub fqdn: String,
    #[serde(default)]
    pub hostname: Option<String>,
    #[serde(default)]
    pub model_name: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Container record from `inventory/containers`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContainerRecord {
    #[serde(rename = "Key")]
    pub key: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(default, rename = "ParentContainerId")]
    pub parent_container_id: Option<String>,
}

// ── Configlets ───────────────────────────────────────────────────────

/// A configlet as the controller reports it.
///
/// `configlet_type` is kept as the raw wire string (`Static`, `Builder`,
/// `Generated`, `Reconciled`, ...); core maps it onto its own kind enum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigletRecord {
    pub key: String,
    pub name: String,
    #[serde(rename = "type", default)]
    pub configlet_type: String,
    #[serde(default)]
    pub config: String,
}

/// One entry of an `autoConfigletGenerator.do` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResult {
    /// System MAC of the device the configlet was generated for.
    pub net_element_id: String,
    pub configlet: ConfigletRecord,
}

/// `{name, key}` pair accepted by `deleteConfiglet.do`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigletRef {
    pub name: String,
    pub key: String,
}

// ── Provisioning ─────────────────────────────────────────────────────

/// A pending topology action, submitted in bulk to `addTempAction.do`.
///
/// Only the `associate` action is produced by this crate: it declares the
/// full configlet set of one device, split into plain configlets and
/// configlet builders, each with an add list and an ignore (remove) list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TempTask {
    pub task_id: u32,
    pub info: String,
    pub info_preview: String,
    pub action: String,
    pub node_type: String,
    pub node_id: String,
    pub configlet_list: Vec<String>,
    pub configlet_names_list: Vec<String>,
    pub ignore_configlet_list: Vec<String>,
    pub ignore_configlet_names_list: Vec<String>,
    pub configlet_builder_list: Vec<String>,
    pub configlet_builder_names_list: Vec<String>,
    pub ignore_configlet_builder_list: Vec<String>,
    pub ignore_configlet_builder_names_list: Vec<String>,
    pub to_id: String,
    pub to_id_type: String,
    pub from_id: String,
    pub node_name: String,
    pub from_name: String,
    pub to_name: String,
    pub node_ip_address: String,
    pub node_target_ip_address: String,
    pub child_tasks: Vec<String>,
    pub parent_task: String,
}

/// Response of `checkCompliance.do`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceResponse {
    pub compliance_code: String,
    #[serde(default)]
    pub compliance_indication: Option<String>,
}

impl ComplianceResponse {
    /// `"0000"` is the controller's code for an in-sync device.
    pub fn is_compliant(&self) -> bool {
        self.compliance_code == "0000"
    }
}

// ── Tasks ────────────────────────────────────────────────────────────

/// Page of tasks from `getTasks.do`.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskPage {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub data: Vec<TaskRecord>,
}

/// A change-control task created when the topology is saved.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
    pub work_order_id: String,
    #[serde(default)]
    pub work_order_user_defined_status: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub work_order_details: WorkOrderDetails,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkOrderDetails {
    #[serde(default)]
    pub net_element_id: Option<String>,
    #[serde(default)]
    pub net_element_host_name: Option<String>,
}
