//! `cfgsync inventory`: devices, their configlets, and the builders in use.

use tabled::Tabled;

use cfgsync_core::{ConfigletKind, Inventory, ProvisioningApi, Reconciler};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "Device")]
    name: String,
    #[tabled(rename = "System MAC")]
    id: String,
    #[tabled(rename = "Container")]
    container: String,
    #[tabled(rename = "Builders")]
    builders: String,
    #[tabled(rename = "Configlets")]
    configlets: String,
}

fn rows(inventory: &Inventory, color: bool) -> Vec<DeviceRow> {
    inventory
        .devices
        .values()
        .map(|device| {
            let assigned = inventory.assigned(&device.id);
            let builders: Vec<&str> = assigned
                .iter()
                .filter(|c| c.kind == ConfigletKind::Builder)
                .map(|c| c.name.as_str())
                .collect();
            let configlets: Vec<String> = assigned
                .iter()
                .filter(|c| c.kind != ConfigletKind::Builder)
                .map(|c| {
                    if c.kind == ConfigletKind::Generated {
                        format!("{} {}", c.name, output::dim("(generated)", color))
                    } else {
                        c.name.clone()
                    }
                })
                .collect();
            DeviceRow {
                name: device.display_name().to_owned(),
                id: device.id.clone(),
                container: device.container_key.clone(),
                builders: builders.join("\n"),
                configlets: configlets.join("\n"),
            }
        })
        .collect()
}

fn detail(inventory: &Inventory, color: bool) -> String {
    let mut out = output::render_table(&rows(inventory, color));
    out.push_str(&format!(
        "\n{} devices, {} builders in use",
        inventory.devices.len(),
        inventory.builder_map.len()
    ));
    out
}

pub async fn handle<A: ProvisioningApi>(api: &A, global: &GlobalOpts) -> Result<(), CliError> {
    let inventory = Reconciler::new(api).inventory().await?;

    let color = output::should_color(global.color);
    let out = output::render_single(global.output, &inventory, |inv| detail(inv, color))?;
    output::print_output(&out, global.quiet);
    Ok(())
}
