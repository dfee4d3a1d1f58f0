#![allow(clippy::unwrap_used)]
// `ProvisioningApi` over a real `CvpClient`, against wiremock.

use pretty_assertions::assert_eq;
use serde_json::json;
use url::Url;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use cfgsync_api::{CvpClient, TransportConfig};
use cfgsync_core::ProvisioningApi;

async fn setup() -> (MockServer, CvpClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = CvpClient::new(base_url, &TransportConfig::default()).unwrap();
    (server, client)
}

#[tokio::test]
async fn scan_requests_the_full_device_inventory() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/cvpservice/inventory/devices"))
        .and(query_param("provisioned", "false"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "serialNumber": "SN-LEAF1",
                "systemMacAddress": "50:00:00:d5:5d:c0",
                "parentContainerKey": "container_leafs",
                "ipAddress": "192.168.122.11",
                "fqdn": "leaf1.lab"
            },
            {
                "serialNumber": "SN-NEW",
                "systemMacAddress": "50:00:00:aa:bb:cc",
                "parentContainerKey": "undefined_container",
                "ipAddress": "192.168.122.99",
                "fqdn": "new.lab"
            }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let devices = ProvisioningApi::list_devices(&client).await.unwrap();

    let ids: Vec<&str> = devices.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(ids, vec!["50:00:00:d5:5d:c0", "50:00:00:aa:bb:cc"]);
    assert_eq!(devices[1].container_key, "undefined_container");
}
