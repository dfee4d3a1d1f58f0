// Configlet endpoints
//
// Configlet inventory, generation from a configlet builder, and deletion.

use serde_json::json;
use tracing::debug;

use crate::client::CvpClient;
use crate::error::Error;
use crate::models::{ConfigletRecord, ConfigletRef, DataEnvelope, GenerationResult};

impl CvpClient {
    /// List every configlet known to the controller.
    ///
    /// `GET /cvpservice/configlet/getConfiglets.do?startIndex=0&endIndex=0`
    pub async fn list_configlets(&self) -> Result<Vec<ConfigletRecord>, Error> {
        let url = self.url(
            "/cvpservice/configlet/getConfiglets.do",
            &[("startIndex", "0"), ("endIndex", "0")],
        )?;
        debug!("listing configlets");
        let envelope: DataEnvelope<ConfigletRecord> =
            self.get(url, "Collecting configlet inventory").await?;
        Ok(envelope.data)
    }

    /// Run a configlet builder for a batch of devices in one container.
    ///
    /// `POST /cvpservice/configlet/autoConfigletGenerator.do`
    ///
    /// Returns one result per device, each tagged with the device's system
    /// MAC. The response order is not guaranteed to follow `device_macs`.
    pub async fn generate_from_builder(
        &self,
        builder_key: &str,
        device_macs: &[String],
        container_key: &str,
    ) -> Result<Vec<GenerationResult>, Error> {
        let url = self.url("/cvpservice/configlet/autoConfigletGenerator.do", &[])?;
        debug!(
            builder_key,
            container_key,
            devices = device_macs.len(),
            "generating configlets from builder"
        );
        let body = json!({
            "configletBuilderId": builder_key,
            "netElementIds": device_macs,
            "containerId": container_key,
            "pageType": "string",
        });
        let envelope: DataEnvelope<GenerationResult> = self
            .post(url, &body, "Generating updated configlets from builder")
            .await?;
        Ok(envelope.data)
    }

    /// Delete configlets by `(name, key)`.
    ///
    /// `POST /cvpservice/configlet/deleteConfiglet.do`
    pub async fn delete_configlets(&self, configlets: &[ConfigletRef]) -> Result<(), Error> {
        let url = self.url("/cvpservice/configlet/deleteConfiglet.do", &[])?;
        debug!(count = configlets.len(), "deleting configlets");
        let _: serde_json::Value = self.post(url, &configlets, "Deleting configlets").await?;
        Ok(())
    }
}
