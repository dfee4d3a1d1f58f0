// ── Provisioning collaborator seam ──
//
// Every controller call a reconciliation run makes goes through
// `ProvisioningApi`. The engine and driver are generic over it; the real
// implementation below forwards to `cfgsync_api::CvpClient`, tests plug in
// an in-memory recorder.

use std::future::Future;

use cfgsync_api::{ConfigletRef, CvpClient, TempTask};

use crate::batch::ReassignDirective;
use crate::error::CoreError;
use crate::model::{Configlet, Container, Device, GeneratedConfiglet, Task};

/// Controller operations consumed by the reconciliation driver.
///
/// Reads have no side effects. Writes are only issued by the driver outside
/// dry-run mode.
pub trait ProvisioningApi: Sync {
    /// The full device inventory, in inventory order.
    fn list_devices(&self) -> impl Future<Output = Result<Vec<Device>, CoreError>> + Send;

    fn list_containers(&self) -> impl Future<Output = Result<Vec<Container>, CoreError>> + Send;

    /// Every configlet known to the controller (used to resolve builder names).
    fn list_configlets(&self) -> impl Future<Output = Result<Vec<Configlet>, CoreError>> + Send;

    /// Configlets assigned to a device, in assignment order.
    fn configlets_for_device(
        &self,
        device_id: &str,
    ) -> impl Future<Output = Result<Vec<Configlet>, CoreError>> + Send;

    /// Run a builder for a set of devices under one container.
    fn generate_from_builder(
        &self,
        builder_key: &str,
        device_ids: &[String],
        container_key: &str,
    ) -> impl Future<Output = Result<Vec<GeneratedConfiglet>, CoreError>> + Send;

    /// Flush pending reassignment directives as temp actions.
    fn add_temp_actions(
        &self,
        directives: &[ReassignDirective],
    ) -> impl Future<Output = Result<(), CoreError>> + Send;

    /// Persist the working topology.
    fn save_topology(&self) -> impl Future<Output = Result<(), CoreError>> + Send;

    fn delete_configlets(
        &self,
        configlets: &[Configlet],
    ) -> impl Future<Output = Result<(), CoreError>> + Send;

    /// Whether the device's running config matches its designed config.
    fn check_compliance(
        &self,
        device_id: &str,
    ) -> impl Future<Output = Result<bool, CoreError>> + Send;

    fn list_pending_tasks(&self) -> impl Future<Output = Result<Vec<Task>, CoreError>> + Send;

    fn execute_tasks(&self, task_ids: &[String])
    -> impl Future<Output = Result<(), CoreError>> + Send;
}

impl ProvisioningApi for CvpClient {
    async fn list_devices(&self) -> Result<Vec<Device>, CoreError> {
        let records = CvpClient::list_devices(self, false).await?;
        Ok(records.into_iter().map(Device::from).collect())
    }

    async fn list_containers(&self) -> Result<Vec<Container>, CoreError> {
        let records = CvpClient::list_containers(self).await?;
        Ok(records.into_iter().map(Container::from).collect())
    }

    async fn list_configlets(&self) -> Result<Vec<Configlet>, CoreError> {
        let records = CvpClient::list_configlets(self).await?;
        Ok(records.into_iter().map(Configlet::from).collect())
    }

    async fn configlets_for_device(&self, device_id: &str) -> Result<Vec<Configlet>, CoreError> {
        let records = CvpClient::configlets_for_device(self, device_id).await?;
        Ok(records.into_iter().map(Configlet::from).collect())
    }

    async fn generate_from_builder(
        &self,
        builder_key: &str,
        device_ids: &[String],
        container_key: &str,
    ) -> Result<Vec<GeneratedConfiglet>, CoreError> {
        let results =
            CvpClient::generate_from_builder(self, builder_key, device_ids, container_key).await?;
        Ok(results.into_iter().map(GeneratedConfiglet::from).collect())
    }

    async fn add_temp_actions(&self, directives: &[ReassignDirective]) -> Result<(), CoreError> {
        let tasks: Vec<TempTask> = directives
            .iter()
            .map(ReassignDirective::to_temp_task)
            .collect();
        Ok(CvpClient::add_temp_actions(self, &tasks).await?)
    }

    async fn save_topology(&self) -> Result<(), CoreError> {
        Ok(CvpClient::save_topology(self).await?)
    }

    async fn delete_configlets(&self, configlets: &[Configlet]) -> Result<(), CoreError> {
        let refs: Vec<ConfigletRef> = configlets.iter().map(ConfigletRef::from).collect();
        Ok(CvpClient::delete_configlets(self, &refs).await?)
    }

    async fn check_compliance(&self, device_id: &str) -> Result<bool, CoreError> {
        let resp = CvpClient::check_compliance(self, device_id).await?;
        Ok(resp.is_compliant())
    }

    async fn list_pending_tasks(&self) -> Result<Vec<Task>, CoreError> {
        let page = CvpClient::list_tasks(self, "Pending").await?;
        Ok(page.data.into_iter().map(Task::from).collect())
    }

    async fn execute_tasks(&self, task_ids: &[String]) -> Result<(), CoreError> {
        Ok(CvpClient::execute_tasks(self, task_ids).await?)
    }
}
