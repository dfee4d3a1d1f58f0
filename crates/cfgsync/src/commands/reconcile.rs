//! `cfgsync reconcile`: run the reconciliation and report per-device plans.

use tabled::Tabled;

use cfgsync_core::{
    DeviceReport, PlanChange, ProvisioningApi, Reconciler, RunOptions, RunReport, UnmatchedPolicy,
};

use crate::cli::{GlobalOpts, ReconcileArgs, UnmatchedArg};
use crate::config::Resolved;
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct PlanRow {
    #[tabled(rename = "Device")]
    name: String,
    #[tabled(rename = "System MAC")]
    id: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Changes")]
    changes: String,
}

fn describe(change: &PlanChange) -> String {
    match change {
        PlanChange::Replaced { old, new } => format!("replaced {old} with {new}"),
        PlanChange::Recovered { builder, configlet } => {
            format!("recovered {configlet} after {builder}")
        }
        PlanChange::Removed { configlet } => format!("removed {configlet}"),
        PlanChange::Resubmitted => "re-submitted (non-compliant)".into(),
    }
}

fn to_row(d: &DeviceReport, color: bool) -> PlanRow {
    PlanRow {
        name: d.device_name.clone(),
        id: d.device_id.clone(),
        status: output::change_label(d.change_detected, color),
        changes: d.changes.iter().map(describe).collect::<Vec<_>>().join("\n"),
    }
}

fn detail(report: &RunReport, color: bool) -> String {
    let rows: Vec<PlanRow> = report.devices.iter().map(|d| to_row(d, color)).collect();
    let mut out = if rows.is_empty() {
        "No devices with configlet builders in scope.".to_owned()
    } else {
        output::render_table(&rows)
    };

    let changed = report.changed().count();
    out.push_str(&format!(
        "\n{changed} of {} devices changed ({} scanned)",
        report.devices.len(),
        report.devices_scanned
    ));
    if !report.deleted.is_empty() {
        let verb = if report.dry_run { "Would delete" } else { "Deleted" };
        out.push_str(&format!("\n{verb}: {}", report.deleted.join(", ")));
    }
    if !report.executed_tasks.is_empty() {
        out.push_str(&format!(
            "\nExecuted tasks: {}",
            report.executed_tasks.join(", ")
        ));
    }
    if report.dry_run {
        out.push('\n');
        out.push_str(&output::dim("Dry run: nothing was changed on the controller.", color));
    }
    out
}

fn policy(arg: Option<UnmatchedArg>, fallback: UnmatchedPolicy) -> UnmatchedPolicy {
    match arg {
        Some(UnmatchedArg::Keep) => UnmatchedPolicy::Keep,
        Some(UnmatchedArg::Remove) => UnmatchedPolicy::Remove,
        None => fallback,
    }
}

pub async fn handle<A: ProvisioningApi>(
    api: &A,
    args: ReconcileArgs,
    resolved: &Resolved,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let options = RunOptions {
        dry_run: args.dry_run,
        builders: args.builders,
        container: args.container,
        unmatched: policy(args.unmatched, resolved.unmatched),
        check_compliance: args.check_compliance,
        execute_tasks: args.execute,
    };

    let report = Reconciler::new(api).run(&options).await?;

    let color = output::should_color(global.color);
    let out = output::render_single(global.output, &report, |r| detail(r, color))?;
    output::print_output(&out, global.quiet);
    Ok(())
}
