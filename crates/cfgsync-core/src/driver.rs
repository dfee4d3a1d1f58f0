// ── Reconciliation driver ──
//
// Sequences one full run: scan → scope filters → generation → per-device
// reconcile and apply → cleanup → optional task execution. Any collaborator
// failure aborts the run and is returned to the caller untouched.

use serde::Serialize;
use tracing::{debug, info};

use crate::api::ProvisioningApi;
use crate::batch::ChangeBatch;
use crate::cleanup::DeletionQueue;
use crate::config::RunOptions;
use crate::error::CoreError;
use crate::generate::{BuilderOutput, generate_all};
use crate::inventory::Inventory;
use crate::model::{Configlet, ConfigletKind, Device};
use crate::reconcile::{DevicePlan, PlanChange, reconcile_device};

/// What one run did (or, in dry-run mode, would do).
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    pub dry_run: bool,
    pub devices_scanned: usize,
    pub devices: Vec<DeviceReport>,
    /// Names of configlets deleted (dry run: queued).
    pub deleted: Vec<String>,
    pub executed_tasks: Vec<String>,
}

impl RunReport {
    pub fn changed(&self) -> impl Iterator<Item = &DeviceReport> {
        self.devices.iter().filter(|d| d.change_detected)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DeviceReport {
    pub device_id: String,
    pub device_name: String,
    pub change_detected: bool,
    pub assign: Vec<String>,
    pub unassign: Vec<String>,
    pub delete: Vec<String>,
    pub changes: Vec<PlanChange>,
}

impl DeviceReport {
    fn new(device: &Device, plan: &DevicePlan) -> Self {
        Self {
            device_id: device.id.clone(),
            device_name: device.display_name().to_owned(),
            change_detected: plan.change_detected,
            assign: names(&plan.assign),
            unassign: names(&plan.unassign),
            delete: names(&plan.delete),
            changes: plan.changes.clone(),
        }
    }
}

fn names(list: &[Configlet]) -> Vec<String> {
    list.iter().map(|c| c.name.clone()).collect()
}

/// Drives reconciliation against one controller session.
pub struct Reconciler<'a, A> {
    api: &'a A,
}

impl<'a, A: ProvisioningApi> Reconciler<'a, A> {
    pub fn new(api: &'a A) -> Self {
        Self { api }
    }

    /// Scan the fleet without changing anything.
    pub async fn inventory(&self) -> Result<Inventory, CoreError> {
        Inventory::scan(self.api).await
    }

    pub async fn run(&self, options: &RunOptions) -> Result<RunReport, CoreError> {
        let mut inventory = Inventory::scan(self.api).await?;
        self.apply_scope(&mut inventory, options).await?;

        let generated = generate_all(self.api, &inventory).await?;
        let builder_names = inventory.builder_names();

        let mut report = RunReport {
            dry_run: options.dry_run,
            devices_scanned: inventory.devices.len(),
            ..RunReport::default()
        };
        let mut batch = ChangeBatch::new();
        let mut deletions = DeletionQueue::new();
        let nothing_generated = BuilderOutput::new();

        for device in inventory.devices_in_scope() {
            debug!(device = %device.id, "reconciling");
            let mut plan = reconcile_device(
                inventory.assigned(&device.id),
                &builder_names,
                generated
                    .for_device(&device.id)
                    .unwrap_or(&nothing_generated),
                options.unmatched,
            );

            if !plan.change_detected
                && options.check_compliance
                && !self.api.check_compliance(&device.id).await?
            {
                info!("{} is not compliant, re-submitting its configlets", device.id);
                plan.change_detected = true;
                plan.changes.push(PlanChange::Resubmitted);
            }

            if plan.change_detected {
                for configlet in &plan.delete {
                    deletions.queue(configlet);
                }
                self.apply(&mut batch, device, &plan, options.dry_run).await?;
            } else {
                info!("No change was detected. Nothing to do.");
            }

            report.devices.push(DeviceReport::new(device, &plan));
        }

        report.deleted = if options.dry_run {
            deletions.configlets().map(|c| c.name.clone()).collect()
        } else {
            names(&deletions.flush(self.api).await?)
        };

        if options.execute_tasks && !options.dry_run {
            report.executed_tasks = self.execute_pending(&report).await?;
        }

        info!(
            devices = report.devices.len(),
            changed = report.changed().count(),
            deleted = report.deleted.len(),
            "reconciliation finished"
        );
        Ok(report)
    }

    /// Narrow the builder map to the requested builders and container.
    async fn apply_scope(
        &self,
        inventory: &mut Inventory,
        options: &RunOptions,
    ) -> Result<(), CoreError> {
        if !options.builders.is_empty() {
            let configlets = self.api.list_configlets().await?;
            let mut keys = Vec::with_capacity(options.builders.len());
            for name in &options.builders {
                let builder = configlets
                    .iter()
                    .find(|c| c.kind == ConfigletKind::Builder && &c.name == name)
                    .ok_or_else(|| CoreError::NotFound {
                        entity_type: "Configlet builder".into(),
                        identifier: name.clone(),
                    })?;
                keys.push(builder.key.clone());
            }
            inventory.retain_builders(&keys);
        }

        if let Some(ref name) = options.container {
            let containers = self.api.list_containers().await?;
            let container = containers
                .iter()
                .find(|c| &c.name == name)
                .ok_or_else(|| CoreError::NotFound {
                    entity_type: "Container".into(),
                    identifier: name.clone(),
                })?;
            inventory.retain_container(&container.key);
        }

        Ok(())
    }

    /// Submit, commit and finalize one device's new assignment.
    async fn apply(
        &self,
        batch: &mut ChangeBatch,
        device: &Device,
        plan: &DevicePlan,
        dry_run: bool,
    ) -> Result<(), CoreError> {
        if dry_run {
            info!("Dry run: would re-assign configlets to {}", device.id);
            return Ok(());
        }
        info!("Re-assigning configlets to {}", device.id);
        batch.submit_reassignment(device, &plan.unassign, &plan.assign);

        info!("Adding temp actions and saving topology.");
        if batch.commit(self.api).await? {
            self.api.save_topology().await?;
        }
        Ok(())
    }

    /// Execute pending tasks that target devices changed in this run.
    async fn execute_pending(&self, report: &RunReport) -> Result<Vec<String>, CoreError> {
        let changed: Vec<&str> = report.changed().map(|d| d.device_id.as_str()).collect();
        if changed.is_empty() {
            return Ok(Vec::new());
        }

        let task_ids: Vec<String> = self
            .api
            .list_pending_tasks()
            .await?
            .into_iter()
            .filter(|t| t.device_id.as_deref().is_some_and(|id| changed.contains(&id)))
            .map(|t| t.id)
            .collect();

        if task_ids.is_empty() {
            info!("No pending tasks to execute.");
            return Ok(task_ids);
        }
        info!("Executing tasks {task_ids:?}");
        self.api.execute_tasks(&task_ids).await?;
        Ok(task_ids)
    }
}
