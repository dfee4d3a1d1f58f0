// Inventory endpoints
//
// Device and container listings plus the per-device configlet assignment.
// All of these are pure reads.

use tracing::debug;

use crate::client::CvpClient;
use crate::error::Error;
use crate::models::{ConfigletListEnvelope, ConfigletRecord, ContainerRecord, DeviceRecord};

impl CvpClient {
    /// List devices in the inventory.
    ///
    /// `GET /cvpservice/inventory/devices?provisioned={provisioned}`
    ///
    /// `provisioned = false` returns the full inventory, including devices
    /// still sitting in the Undefined container.
    pub async fn list_devices(&self, provisioned: bool) -> Result<Vec<DeviceRecord>, Error> {
        let flag = if provisioned { "true" } else { "false" };
        let url = self.url("/cvpservice/inventory/devices", &[("provisioned", flag)])?;
        debug!(provisioned, "listing devices");
        self.get(url, "Collecting device inventory").await
    }

    /// List all containers.
    ///
    /// `GET /cvpservice/inventory/containers`
    pub async fn list_containers(&self) -> Result<Vec<ContainerRecord>, Error> {
        let url = self.url("/cvpservice/inventory/containers", &[])?;
        debug!("listing containers");
        self.get(url, "Collecting container inventory").await
    }

    /// Configlets currently assigned to a device, in assignment order.
    ///
    /// `GET /cvpservice/provisioning/getConfigletsByNetElementId.do`
    pub async fn configlets_for_device(
        &self,
        system_mac: &str,
    ) -> Result<Vec<ConfigletRecord>, Error> {
        let url = self.url(
            "/cvpservice/provisioning/getConfigletsByNetElementId.do",
            &[
                ("netElementId", system_mac),
                ("startIndex", "0"),
                ("endIndex", "0"),
            ],
        )?;
        debug!(system_mac, "listing configlets assigned to device");
        let envelope: ConfigletListEnvelope = self
            .get(url, "Collecting configlets assigned to a device")
            .await?;
        Ok(envelope.configlet_list)
    }
}
