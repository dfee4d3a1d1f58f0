// ── Authenticated controller session ──
//
// Owns the single logged-in `CvpClient` for the lifetime of a run. The CLI
// builds a `ControllerConfig`, calls `Session::connect`, hands `client()` to
// the reconciler and finally calls `disconnect`.

use cfgsync_api::{CvpClient, TlsMode, TransportConfig};
use tracing::{debug, info, warn};

use crate::config::{ControllerConfig, TlsVerification};
use crate::error::CoreError;

pub struct Session {
    client: CvpClient,
}

impl Session {
    /// Build the HTTP client and log in.
    pub async fn connect(config: &ControllerConfig) -> Result<Self, CoreError> {
        let transport = build_transport(config);
        let client = CvpClient::new(config.url.clone(), &transport)?;

        info!(url = %config.url, username = %config.username, "Connecting to the controller.");
        client.login(&config.username, &config.password).await?;
        debug!("session authentication successful");

        Ok(Self { client })
    }

    pub fn client(&self) -> &CvpClient {
        &self.client
    }

    /// Log out. Failure here never fails the run.
    pub async fn disconnect(self) {
        if let Err(e) = self.client.logout().await {
            warn!(error = %e, "logout failed (non-fatal)");
        }
        debug!("disconnected");
    }
}

// ── Helpers ──────────────────────────────────────────────────────

fn build_transport(config: &ControllerConfig) -> TransportConfig {
    TransportConfig {
        tls: tls_to_transport(&config.tls),
        timeout: config.timeout,
        cookie_jar: None, // CvpClient::new adds one
    }
}

fn tls_to_transport(tls: &TlsVerification) -> TlsMode {
    match tls {
        TlsVerification::SystemDefaults => TlsMode::System,
        TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
        TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
    }
}
