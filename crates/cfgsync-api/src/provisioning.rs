// Provisioning endpoints
//
// Temp actions (pending topology changes), topology save, and compliance.

use serde_json::json;
use tracing::debug;

use crate::client::CvpClient;
use crate::error::Error;
use crate::models::{ComplianceResponse, TempTask};

impl CvpClient {
    /// Submit pending topology actions.
    ///
    /// `POST /cvpservice/provisioning/addTempAction.do?nodeId=root&format=topology`
    pub async fn add_temp_actions(&self, tasks: &[TempTask]) -> Result<(), Error> {
        let url = self.url(
            "/cvpservice/provisioning/addTempAction.do",
            &[("nodeId", "root"), ("format", "topology")],
        )?;
        debug!(count = tasks.len(), "adding temp actions");
        let body = json!({ "data": tasks });
        let _: serde_json::Value = self
            .post(url, &body, "Adding temp actions to the controller")
            .await?;
        Ok(())
    }

    /// Save the working topology, turning temp actions into tasks.
    ///
    /// `POST /cvpservice/provisioning/v2/saveTopology.do` with `[]`
    pub async fn save_topology(&self) -> Result<(), Error> {
        let url = self.url("/cvpservice/provisioning/v2/saveTopology.do", &[])?;
        debug!("saving topology");
        let empty: [serde_json::Value; 0] = [];
        let _: serde_json::Value = self.post(url, &empty, "Saving topology").await?;
        Ok(())
    }

    /// Ask the controller whether a device's running config matches its
    /// designed config.
    ///
    /// `POST /cvpservice/provisioning/checkCompliance.do`
    pub async fn check_compliance(&self, system_mac: &str) -> Result<ComplianceResponse, Error> {
        let url = self.url("/cvpservice/provisioning/checkCompliance.do", &[])?;
        debug!(system_mac, "checking compliance");
        let body = json!({
            "nodeId": system_mac,
            "nodeType": "netelement",
        });
        self.post(url, &body, "Checking device compliance").await
    }
}
