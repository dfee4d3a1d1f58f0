// ── Change batch ──
//
// Pending reassignment directives, accumulated per device and flushed to
// the controller as temp actions in one request. The driver owns the batch
// and decides when to commit.

use cfgsync_api::TempTask;
use tracing::debug;

use crate::api::ProvisioningApi;
use crate::error::CoreError;
use crate::model::{Configlet, Device};

/// Full desired configlet set for one device, split by configlet kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReassignDirective {
    /// Position in the batch, starting at 1.
    pub task_id: u32,
    pub device_id: String,
    pub serial_number: String,
    pub fqdn: String,
    pub ip_address: String,
    pub configlets: KeyedNames,
    pub ignore_configlets: KeyedNames,
    pub builders: KeyedNames,
    pub ignore_builders: KeyedNames,
}

/// Parallel key and name lists, as the controller expects them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyedNames {
    pub keys: Vec<String>,
    pub names: Vec<String>,
}

impl KeyedNames {
    fn push(&mut self, configlet: &Configlet) {
        self.keys.push(configlet.key.clone());
        self.names.push(configlet.name.clone());
    }
}

/// Split a configlet list into (builders, everything else).
fn split_by_kind(configlets: &[Configlet]) -> (KeyedNames, KeyedNames) {
    let mut builders = KeyedNames::default();
    let mut others = KeyedNames::default();
    for c in configlets {
        if c.is_builder() {
            builders.push(c);
        } else {
            others.push(c);
        }
    }
    (builders, others)
}

impl ReassignDirective {
    pub fn new(
        task_id: u32,
        device: &Device,
        unassign: &[Configlet],
        assign: &[Configlet],
    ) -> Self {
        let (ignore_builders, ignore_configlets) = split_by_kind(unassign);
        let (builders, configlets) = split_by_kind(assign);
        Self {
            task_id,
            device_id: device.id.clone(),
            serial_number: device.serial_number.clone(),
            fqdn: device.fqdn.clone(),
            ip_address: device.ip_address.clone(),
            configlets,
            ignore_configlets,
            builders,
            ignore_builders,
        }
    }

    /// Wire form: an `associate` action targeting the device.
    pub fn to_temp_task(&self) -> TempTask {
        let info = format!("Reassigning configlets to device {}", self.serial_number);
        TempTask {
            task_id: self.task_id,
            info_preview: info.clone(),
            info,
            action: "associate".into(),
            node_type: "configlet".into(),
            node_id: String::new(),
            configlet_list: self.configlets.keys.clone(),
            configlet_names_list: self.configlets.names.clone(),
            ignore_configlet_list: self.ignore_configlets.keys.clone(),
            ignore_configlet_names_list: self.ignore_configlets.names.clone(),
            configlet_builder_list: self.builders.keys.clone(),
            configlet_builder_names_list: self.builders.names.clone(),
            ignore_configlet_builder_list: self.ignore_builders.keys.clone(),
            ignore_configlet_builder_names_list: self.ignore_builders.names.clone(),
            to_id: self.device_id.clone(),
            to_id_type: "netelement".into(),
            from_id: String::new(),
            node_name: String::new(),
            from_name: String::new(),
            to_name: self.fqdn.clone(),
            node_ip_address: self.ip_address.clone(),
            node_target_ip_address: self.ip_address.clone(),
            child_tasks: Vec::new(),
            parent_task: String::new(),
        }
    }
}

/// Accumulator of reassignment directives awaiting a commit.
#[derive(Debug, Default)]
pub struct ChangeBatch {
    pending: Vec<ReassignDirective>,
}

impl ChangeBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a directive declaring the device's full configlet set and
    /// return its task id.
    pub fn submit_reassignment(
        &mut self,
        device: &Device,
        unassign: &[Configlet],
        assign: &[Configlet],
    ) -> u32 {
        let task_id = u32::try_from(self.pending.len() + 1).unwrap_or(u32::MAX);
        self.pending
            .push(ReassignDirective::new(task_id, device, unassign, assign));
        task_id
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn pending(&self) -> &[ReassignDirective] {
        &self.pending
    }

    /// Flush pending directives. Returns `false` without calling the
    /// controller when nothing is pending. The batch is only cleared once
    /// the flush succeeded.
    pub async fn commit<A: ProvisioningApi>(&mut self, api: &A) -> Result<bool, CoreError> {
        if self.pending.is_empty() {
            return Ok(false);
        }
        debug!(count = self.pending.len(), "committing reassignment directives");
        api.add_temp_actions(&self.pending).await?;
        self.pending.clear();
        Ok(true)
    }
}
