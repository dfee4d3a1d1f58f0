// ── Inventory scan ──
//
// One pass over the fleet: every inventory device, the configlets
// assigned to it, and the builder → container → devices map that drives
// generation. Read-only against the controller.

use indexmap::IndexMap;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::api::ProvisioningApi;
use crate::error::CoreError;
use crate::model::{Configlet, Device};

/// builder key → container key → device ids, all in scan order.
pub type BuilderMap = IndexMap<String, IndexMap<String, Vec<String>>>;

#[derive(Debug, Clone, Default, Serialize)]
pub struct Inventory {
    /// device id → device, in scan order.
    pub devices: IndexMap<String, Device>,
    /// device id → assigned configlets, in assignment order.
    pub assignments: IndexMap<String, Vec<Configlet>>,
    pub builder_map: BuilderMap,
    /// builder key → builder configlet, for every builder seen on a device.
    pub builders: IndexMap<String, Configlet>,
}

impl Inventory {
    /// Walk the fleet once.
    pub async fn scan<A: ProvisioningApi>(api: &A) -> Result<Self, CoreError> {
        info!("Collecting device inventory.");
        let devices = api.list_devices().await?;

        let mut inventory = Inventory::default();
        for device in devices {
            if inventory.devices.contains_key(&device.id) {
                warn!(device = %device.id, "device listed twice in inventory, skipping");
                continue;
            }

            info!("Find configlets assigned to {}", device.id);
            let assigned = api.configlets_for_device(&device.id).await?;
            debug!(device = %device.id, count = assigned.len(), "assigned configlets");

            for builder in assigned.iter().filter(|c| c.is_builder()) {
                inventory
                    .builders
                    .entry(builder.key.clone())
                    .or_insert_with(|| builder.clone());
                let devices = inventory
                    .builder_map
                    .entry(builder.key.clone())
                    .or_default()
                    .entry(device.container_key.clone())
                    .or_default();
                if !devices.contains(&device.id) {
                    devices.push(device.id.clone());
                }
            }

            inventory.assignments.insert(device.id.clone(), assigned);
            inventory.devices.insert(device.id.clone(), device);
        }

        info!(
            devices = inventory.devices.len(),
            builders = inventory.builder_map.len(),
            "inventory collected"
        );
        Ok(inventory)
    }

    /// Keep only the given builder keys in the builder map.
    pub fn retain_builders(&mut self, keys: &[String]) {
        self.builder_map.retain(|key, _| keys.contains(key));
    }

    /// Keep only devices under `container_key` in the builder map.
    ///
    /// Device and assignment maps are left whole.
    pub fn retain_container(&mut self, container_key: &str) {
        for containers in self.builder_map.values_mut() {
            containers.retain(|key, _| key == container_key);
        }
        self.builder_map.retain(|_, containers| !containers.is_empty());
    }

    /// Names of the builders still in scope, in scan order.
    pub fn builder_names(&self) -> Vec<String> {
        self.builder_map
            .keys()
            .filter_map(|key| self.builders.get(key))
            .map(|b| b.name.clone())
            .collect()
    }

    pub fn builder_name<'a>(&'a self, key: &'a str) -> &'a str {
        self.builders.get(key).map_or(key, |b| b.name.as_str())
    }

    /// Devices that carry at least one in-scope builder, in scan order.
    pub fn devices_in_scope(&self) -> Vec<&Device> {
        self.devices
            .values()
            .filter(|d| {
                self.builder_map
                    .values()
                    .any(|containers| containers.values().any(|ids| ids.contains(&d.id)))
            })
            .collect()
    }

    pub fn assigned(&self, device_id: &str) -> &[Configlet] {
        self.assignments.get(device_id).map_or(&[], Vec::as_slice)
    }
}
