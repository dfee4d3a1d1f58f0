// ── Deletion queue ──
//
// Configlets superseded during a run. Deduplicated by key and flushed once,
// after every reassignment has been committed.

use indexmap::IndexMap;
use tracing::{debug, info};

use crate::api::ProvisioningApi;
use crate::error::CoreError;
use crate::model::Configlet;

#[derive(Debug, Default)]
pub struct DeletionQueue {
    pending: IndexMap<String, Configlet>,
}

impl DeletionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a configlet. Returns `false` if its key was already queued.
    pub fn queue(&mut self, configlet: &Configlet) -> bool {
        if self.pending.contains_key(&configlet.key) {
            debug!(configlet = %configlet.name, "already queued for deletion");
            return false;
        }
        self.pending.insert(configlet.key.clone(), configlet.clone());
        true
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn configlets(&self) -> impl Iterator<Item = &Configlet> {
        self.pending.values()
    }

    /// Send one delete request for everything queued and return what was
    /// deleted. No request when the queue is empty.
    pub async fn flush<A: ProvisioningApi>(
        &mut self,
        api: &A,
    ) -> Result<Vec<Configlet>, CoreError> {
        if self.pending.is_empty() {
            return Ok(Vec::new());
        }
        info!("Deleting configlets that are no longer required.");
        let configlets: Vec<Configlet> = self.pending.values().cloned().collect();
        api.delete_configlets(&configlets).await?;
        self.pending.clear();
        Ok(configlets)
    }
}
