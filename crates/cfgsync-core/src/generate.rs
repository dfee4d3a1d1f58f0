// ── Generator invocation ──
//
// One generation call per (builder, container) pair. Results are attributed
// to devices by the tag the controller puts on each result, never by
// response position.

use indexmap::IndexMap;
use tracing::{debug, info, warn};

use crate::api::ProvisioningApi;
use crate::error::CoreError;
use crate::inventory::Inventory;
use crate::model::Configlet;

/// Configlets generated for one device, keyed by the name of the builder
/// that produced them.
pub type BuilderOutput = IndexMap<String, Vec<Configlet>>;

/// Freshly generated configlets grouped by target device, then by builder.
#[derive(Debug, Clone, Default)]
pub struct GeneratedSet {
    pub by_device: IndexMap<String, BuilderOutput>,
}

impl GeneratedSet {
    /// Everything generated for one device, per builder.
    pub fn for_device(&self, device_id: &str) -> Option<&BuilderOutput> {
        self.by_device.get(device_id)
    }
}

/// Run every in-scope builder for its devices.
pub async fn generate_all<A: ProvisioningApi>(
    api: &A,
    inventory: &Inventory,
) -> Result<GeneratedSet, CoreError> {
    let mut set = GeneratedSet::default();

    for (builder_key, containers) in &inventory.builder_map {
        let builder_name = inventory.builder_name(builder_key);
        for (container_key, device_ids) in containers {
            info!(
                "Generating configlets from builder {builder_name} for devices {device_ids:?} in container {container_key}"
            );
            let results = api
                .generate_from_builder(builder_key, device_ids, container_key)
                .await?;
            debug!(builder = builder_name, count = results.len(), "configlets generated");

            for result in results {
                if !device_ids.contains(&result.device_id) {
                    warn!(
                        device = %result.device_id,
                        configlet = %result.configlet.name,
                        "generated configlet targets a device outside the request, ignoring"
                    );
                    continue;
                }
                set.by_device
                    .entry(result.device_id)
                    .or_default()
                    .entry(builder_name.to_owned())
                    .or_default()
                    .push(result.configlet);
            }
        }
    }

    Ok(set)
}
