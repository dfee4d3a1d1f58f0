// Session authentication
//
// Cookie-based login/logout. The login endpoint sets a session cookie in
// the client's jar; every later request carries it automatically.

use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tracing::debug;

use crate::client::CvpClient;
use crate::error::Error;

impl CvpClient {
    /// Authenticate with the controller using username/password.
    ///
    /// `POST /web/login/authenticate.do` with `{"userId", "password"}`.
    /// Any non-success status, or an `errorCode` in the body, is an
    /// authentication failure.
    pub async fn login(&self, username: &str, password: &SecretString) -> Result<(), Error> {
        let url = self.url("/web/login/authenticate.do", &[])?;

        debug!(%url, username, "logging in");

        let body = json!({
            "userId": username,
            "password": password.expose_secret(),
        });

        let resp = self
            .http()
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(|source| Error::Transport {
                operation: "Connecting to the controller",
                source,
            })?;

        let status = resp.status();
        let text = resp.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(Error::Authentication {
                message: format!("login failed (HTTP {status})"),
            });
        }

        if let Ok(value) = serde_json::from_str::<serde_json::Value>(&text) {
            if value.get("errorCode").is_some() {
                let message = value
                    .get("errorMessage")
                    .and_then(serde_json::Value::as_str)
                    .unwrap_or("login rejected")
                    .to_owned();
                return Err(Error::Authentication { message });
            }
        }

        debug!("login successful");
        Ok(())
    }

    /// End the current session.
    ///
    /// `POST /web/login/logout.do`
    pub async fn logout(&self) -> Result<(), Error> {
        let url = self.url("/web/login/logout.do", &[])?;

        debug!(%url, "logging out");

        let _resp = self
            .http()
            .post(url)
            .send()
            .await
            .map_err(|source| Error::Transport {
                operation: "Logging out",
                source,
            })?;

        debug!("logout complete");
        Ok(())
    }
}
