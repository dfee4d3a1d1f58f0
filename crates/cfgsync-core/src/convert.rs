// ── API-to-domain type conversions ──
//
// Bridges raw `cfgsync_api` records into `cfgsync_core::model` types and
// back where a request needs a wire shape.

use cfgsync_api::{
    ConfigletRecord, ConfigletRef, ContainerRecord, DeviceRecord, GenerationResult, TaskRecord,
};

use crate::model::{Configlet, ConfigletKind, Container, Device, GeneratedConfiglet, Task};

/// Empty strings from the controller mean "absent".
fn non_empty(raw: Option<String>) -> Option<String> {
    raw.filter(|s| !s.trim().is_empty())
}

// ── Device ─────────────────────────────────────────────────────────

impl From<DeviceRecord> for Device {
    fn from(r: DeviceRecord) -> Self {
        Device {
            id: r.system_mac_address,
            serial_number: r.serial_number,
            container_key: r.parent_container_key,
            ip_address: r.ip_address,
            fqdn: r.fqdn,
            hostname: non_empty(r.hostname),
            model: non_empty(r.model_name),
            version: non_empty(r.version),
        }
    }
}

impl From<ContainerRecord> for Container {
    fn from(r: ContainerRecord) -> Self {
        Container {
            key: r.key,
            name: r.name,
            parent_key: non_empty(r.parent_container_id),
        }
    }
}

// ── Configlet ──────────────────────────────────────────────────────

impl From<ConfigletRecord> for Configlet {
    fn from(r: ConfigletRecord) -> Self {
        Configlet {
            kind: ConfigletKind::from_wire(&r.configlet_type),
            key: r.key,
            name: r.name,
            config: r.config,
        }
    }
}

impl From<&Configlet> for ConfigletRef {
    fn from(c: &Configlet) -> Self {
        ConfigletRef {
            name: c.name.clone(),
            key: c.key.clone(),
        }
    }
}

impl From<GenerationResult> for GeneratedConfiglet {
    fn from(r: GenerationResult) -> Self {
        // Generation responses sometimes omit the type of the new configlet.
        let untyped = r.configlet.configlet_type.is_empty();
        let mut configlet = Configlet::from(r.configlet);
        if untyped {
            configlet.kind = ConfigletKind::Generated;
        }
        GeneratedConfiglet {
            device_id: r.net_element_id,
            configlet,
        }
    }
}

// ── Task ───────────────────────────────────────────────────────────

impl From<TaskRecord> for Task {
    fn from(r: TaskRecord) -> Self {
        Task {
            id: r.work_order_id,
            status: r.work_order_user_defined_status,
            device_id: non_empty(r.work_order_details.net_element_id),
            description: non_empty(r.description),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn device_record_maps_identity_fields() {
        let record: DeviceRecord = serde_json::from_value(json!({
            "serialNumber": "JPE123",
            "systemMacAddress": "00:1c:73:aa:bb:01",
            "parentContainerKey": "container_42",
            "ipAddress": "10.1.1.1",
            "fqdn": "leaf1.lab",
            "hostname": "",
            "modelName": "DCS-7050SX3",
            "streamingStatus": "active"
        }))
        .unwrap();

        let device = Device::from(record);
        assert_eq!(device.id, "00:1c:73:aa:bb:01");
        assert_eq!(device.container_key, "container_42");
        assert_eq!(device.hostname, None);
        assert_eq!(device.model.as_deref(), Some("DCS-7050SX3"));
    }

    #[test]
    fn configlet_kind_from_type_field() {
        let record = ConfigletRecord {
            key: "configlet_1".into(),
            name: "mcast_builder".into(),
            configlet_type: "Builder".into(),
            config: String::new(),
        };
        assert_eq!(Configlet::from(record).kind, ConfigletKind::Builder);
    }

    #[test]
    fn generation_result_defaults_to_generated() {
        let result: GenerationResult = serde_json::from_value(json!({
            "netElementId": "00:1c:73:aa:bb:01",
            "configlet": {"key": "configlet_9", "name": "mcast_builder_leaf1_2", "config": "x"}
        }))
        .unwrap();

        let generated = GeneratedConfiglet::from(result);
        assert_eq!(generated.device_id, "00:1c:73:aa:bb:01");
        assert_eq!(generated.configlet.kind, ConfigletKind::Generated);
    }

    #[test]
    fn task_record_maps_device() {
        let record: TaskRecord = serde_json::from_value(json!({
            "workOrderId": "57",
            "workOrderUserDefinedStatus": "Pending",
            "workOrderDetails": {"netElementId": "00:1c:73:aa:bb:01"}
        }))
        .unwrap();

        let task = Task::from(record);
        assert_eq!(task.id, "57");
        assert_eq!(task.device_id.as_deref(), Some("00:1c:73:aa:bb:01"));
        assert_eq!(task.description, None);
    }
}
