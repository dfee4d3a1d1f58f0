// ── Reconciliation engine ──
//
// Pure diff of one device's assigned configlets against the configlets just
// generated for it. No I/O: the driver feeds it inventory state and applies
// the resulting plan.
//
// Generated configlets are matched to their builder by name containment and
// to their fresh counterpart by version-stripped name. Recovery only looks
// at the output of the builder being recovered. Replacements happen
// in place; a generated configlet lost from the assignment is re-inserted
// right after its builder.

use serde::Serialize;
use tracing::{info, warn};

use crate::config::UnmatchedPolicy;
use crate::generate::BuilderOutput;
use crate::model::Configlet;

/// One observable decision taken for a device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlanChange {
    /// Body changed: `old` is swapped for `new` at the same position.
    Replaced { old: String, new: String },
    /// Generated configlet was missing and is re-inserted after `builder`.
    Recovered { builder: String, configlet: String },
    /// No fresh counterpart and policy says remove.
    Removed { configlet: String },
    /// Non-compliant device re-submitted with an unchanged assignment.
    Resubmitted,
}

/// Outcome of reconciling one device.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DevicePlan {
    /// Full desired assignment, in order.
    pub assign: Vec<Configlet>,
    pub unassign: Vec<Configlet>,
    /// Configlets no longer needed anywhere once this plan is applied.
    pub delete: Vec<Configlet>,
    pub change_detected: bool,
    pub changes: Vec<PlanChange>,
}

/// The in-scope builder owning a generated configlet: the first builder
/// name contained in its name.
pub fn owning_builder<'a>(configlet_name: &str, builder_names: &'a [String]) -> Option<&'a str> {
    let mut candidates = builder_names
        .iter()
        .filter(|b| configlet_name.contains(b.as_str()));
    let owner = candidates.next()?;

    let others: Vec<&str> = candidates.map(String::as_str).collect();
    if !others.is_empty() {
        warn!(
            configlet = configlet_name,
            chosen = owner.as_str(),
            also_matching = ?others,
            "ambiguous builder match, using the first one"
        );
    }
    Some(owner.as_str())
}

/// Compute the plan for one device.
///
/// `builder_names` are the in-scope builders across the fleet; `generated`
/// is every configlet freshly generated for this device, per builder.
///
/// Each in-scope builder assigned to the device ends up with exactly one
/// generated configlet next to it, unless its builder produced none.
pub fn reconcile_device(
    assigned: &[Configlet],
    builder_names: &[String],
    generated: &BuilderOutput,
    unmatched: UnmatchedPolicy,
) -> DevicePlan {
    let mut plan = DevicePlan::default();

    let expected: Vec<&str> = assigned
        .iter()
        .filter(|c| c.is_builder() && builder_names.contains(&c.name))
        .map(|c| c.name.as_str())
        .collect();
    let mut satisfied: Vec<&str> = Vec::new();

    for current in assigned {
        if !current.is_generated() {
            plan.assign.push(current.clone());
            continue;
        }
        let Some(owner) = owning_builder(&current.name, builder_names) else {
            // Not produced by a builder we manage.
            plan.assign.push(current.clone());
            continue;
        };

        let prefix = current.version_stripped_name();
        let fresh = generated.iter().find_map(|(producer, list)| {
            list.iter()
                .find(|g| g.version_stripped_name() == prefix)
                .map(|g| (producer.as_str(), g))
        });

        match fresh {
            Some((producer, fresh))
                if fresh.key == current.key || fresh.config == current.config =>
            {
                plan.assign.push(current.clone());
                satisfied.push(producer);
            }
            Some((producer, fresh)) => {
                info!(
                    "A change was detected. {} will be replaced with {}",
                    current.name, fresh.name
                );
                plan.assign.push(fresh.clone());
                plan.unassign.push(current.clone());
                plan.delete.push(current.clone());
                plan.changes.push(PlanChange::Replaced {
                    old: current.name.clone(),
                    new: fresh.name.clone(),
                });
                plan.change_detected = true;
                satisfied.push(producer);
            }
            None => match unmatched {
                UnmatchedPolicy::Keep => {
                    warn!(
                        configlet = %current.name,
                        builder = owner,
                        "no freshly generated counterpart, keeping it assigned"
                    );
                    plan.assign.push(current.clone());
                    satisfied.push(owner);
                }
                UnmatchedPolicy::Remove => {
                    info!(
                        "{} has no freshly generated counterpart and will be removed",
                        current.name
                    );
                    plan.unassign.push(current.clone());
                    plan.delete.push(current.clone());
                    plan.changes.push(PlanChange::Removed {
                        configlet: current.name.clone(),
                    });
                    plan.change_detected = true;
                }
            },
        }
    }

    for builder in expected.into_iter().filter(|b| !satisfied.contains(b)) {
        recover(&mut plan, builder, generated);
    }

    plan
}

/// Re-insert the configlet `builder` generated for this device right after
/// the builder.
fn recover(plan: &mut DevicePlan, builder: &str, generated: &BuilderOutput) {
    let Some(builder_idx) = plan.assign.iter().position(|c| c.is_builder() && c.name == builder)
    else {
        return;
    };
    let Some(fresh) = generated
        .get(builder)
        .and_then(|list| list.iter().find(|g| g.name.contains(builder)))
    else {
        warn!(builder, "generated configlet is missing and the builder produced none");
        return;
    };
    if let Some(holder) = plan.assign.iter().find(|c| c.key == fresh.key) {
        warn!(
            builder,
            configlet = %fresh.name,
            assigned_as = %holder.name,
            "generated configlet is already assigned, not recovering it"
        );
        return;
    }

    info!(
        "Recovering configlet {} that was lost due to operator error.",
        fresh.name
    );
    plan.assign.insert(builder_idx + 1, fresh.clone());
    plan.changes.push(PlanChange::Recovered {
        builder: builder.to_owned(),
        configlet: fresh.name.clone(),
    });
    plan.change_detected = true;
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::ConfigletKind;

    fn builder(key: &str, name: &str) -> Configlet {
        Configlet::new(key, name, ConfigletKind::Builder, "")
    }

    fn generated(key: &str, name: &str, body: &str) -> Configlet {
        Configlet::new(key, name, ConfigletKind::Generated, body)
    }

    fn fixed(key: &str, name: &str) -> Configlet {
        Configlet::new(key, name, ConfigletKind::Static, "hostname x")
    }

    fn names(list: &[Configlet]) -> Vec<&str> {
        list.iter().map(|c| c.name.as_str()).collect()
    }

    fn builders(names: &[&str]) -> Vec<String> {
        names.iter().map(ToString::to_string).collect()
    }

    fn output(builder: &str, list: Vec<Configlet>) -> BuilderOutput {
        let mut out = BuilderOutput::new();
        out.insert(builder.to_owned(), list);
        out
    }

    fn generated_for(list: &[Configlet]) -> usize {
        list.iter().filter(|c| c.is_generated()).count()
    }

    #[test]
    fn no_drift_is_identity() {
        let assigned = vec![
            fixed("s1", "base"),
            builder("b1", "mcast_builder"),
            generated("g1", "mcast_builder_leaf1_1", "ip pim"),
            fixed("s2", "tail"),
        ];
        let fresh = vec![generated("g1", "mcast_builder_leaf1_1", "ip pim")];

        let plan = reconcile_device(
            &assigned,
            &builders(&["mcast_builder"]),
            &output("mcast_builder", fresh),
            UnmatchedPolicy::Keep,
        );

        assert!(!plan.change_detected);
        assert_eq!(plan.assign, assigned);
        assert!(plan.unassign.is_empty());
        assert!(plan.delete.is_empty());
        assert!(plan.changes.is_empty());
    }

    #[test]
    fn changed_body_is_replaced_in_place() {
        let old = generated("g1", "mcast_builder_leaf1_1", "ip pim sparse");
        let new = generated("g2", "mcast_builder_leaf1_2", "ip pim sparse-dense");
        let assigned = vec![builder("b1", "mcast_builder"), old.clone(), fixed("s1", "tail")];

        let plan = reconcile_device(
            &assigned,
            &builders(&["mcast_builder"]),
            &output("mcast_builder", vec![new.clone()]),
            UnmatchedPolicy::Keep,
        );

        assert!(plan.change_detected);
        assert_eq!(
            names(&plan.assign),
            vec!["mcast_builder", "mcast_builder_leaf1_2", "tail"]
        );
        assert_eq!(plan.assign[1], new);
        assert_eq!(plan.unassign, vec![old.clone()]);
        assert_eq!(plan.delete, vec![old]);
        assert_eq!(
            plan.changes,
            vec![PlanChange::Replaced {
                old: "mcast_builder_leaf1_1".into(),
                new: "mcast_builder_leaf1_2".into(),
            }]
        );
    }

    #[test]
    fn lost_configlet_is_recovered_after_builder() {
        let assigned = vec![
            fixed("s1", "base"),
            builder("b1", "mcast_builder"),
            fixed("s2", "tail"),
        ];
        let fresh = generated("g3", "mcast_builder_leaf1_3", "ip pim");

        let plan = reconcile_device(
            &assigned,
            &builders(&["mcast_builder"]),
            &output("mcast_builder", vec![fresh]),
            UnmatchedPolicy::Keep,
        );

        assert!(plan.change_detected);
        assert_eq!(
            names(&plan.assign),
            vec!["base", "mcast_builder", "mcast_builder_leaf1_3", "tail"]
        );
        assert!(plan.unassign.is_empty());
        assert!(plan.delete.is_empty());
    }

    #[test]
    fn builder_only_device_gets_generated_at_index_one() {
        let assigned = vec![builder("b1", "mcast_builder")];
        let fresh = vec![generated("g3", "mcast_builder_leaf1_3", "ip pim")];

        let plan = reconcile_device(
            &assigned,
            &builders(&["mcast_builder"]),
            &output("mcast_builder", fresh),
            UnmatchedPolicy::Keep,
        );

        assert!(plan.change_detected);
        assert_eq!(plan.assign.len(), 2);
        assert_eq!(plan.assign[1].key, "g3");
    }

    #[test]
    fn new_key_with_identical_body_is_not_a_change() {
        let old = generated("g1", "mcast_builder_leaf1_1", "ip pim");
        let assigned = vec![builder("b1", "mcast_builder"), old.clone()];
        let fresh = vec![generated("g9", "mcast_builder_leaf1_9", "ip pim")];

        let plan = reconcile_device(
            &assigned,
            &builders(&["mcast_builder"]),
            &output("mcast_builder", fresh),
            UnmatchedPolicy::Keep,
        );

        assert!(!plan.change_detected);
        assert_eq!(plan.assign, vec![builder("b1", "mcast_builder"), old]);
        assert!(plan.delete.is_empty());
    }

    #[test]
    fn unmatched_generated_is_kept_as_is_by_default() {
        let stale = generated("g1", "mcast_builder_spine1_4", "ip pim");
        let assigned = vec![builder("b1", "mcast_builder"), stale];
        let fresh = vec![generated("g5", "mcast_builder_leaf1_5", "ip pim")];

        let plan = reconcile_device(
            &assigned,
            &builders(&["mcast_builder"]),
            &output("mcast_builder", fresh),
            UnmatchedPolicy::default(),
        );

        assert!(!plan.change_detected);
        assert_eq!(plan.assign, assigned);
        assert_eq!(generated_for(&plan.assign), 1);
        assert!(plan.unassign.is_empty());
        assert!(plan.delete.is_empty());
    }

    #[test]
    fn removed_unmatched_generated_is_replaced_by_recovery() {
        let stale = generated("g1", "mcast_builder_spine1_4", "ip pim");
        let assigned = vec![builder("b1", "mcast_builder"), stale.clone()];
        let fresh = vec![generated("g5", "mcast_builder_leaf1_5", "ip pim")];

        let plan = reconcile_device(
            &assigned,
            &builders(&["mcast_builder"]),
            &output("mcast_builder", fresh),
            UnmatchedPolicy::Remove,
        );

        assert!(plan.change_detected);
        assert_eq!(
            names(&plan.assign),
            vec!["mcast_builder", "mcast_builder_leaf1_5"]
        );
        assert_eq!(generated_for(&plan.assign), 1);
        assert_eq!(plan.unassign, vec![stale.clone()]);
        assert_eq!(plan.delete, vec![stale]);
    }

    #[test]
    fn recovery_only_uses_the_lost_builders_output() {
        let assigned = vec![
            builder("b1", "mcast_ext"),
            generated("g1", "mcast_ext_leaf1_1", "ext"),
            builder("b2", "mcast"),
        ];
        let mut fresh = output(
            "mcast_ext",
            vec![generated("g1", "mcast_ext_leaf1_1", "ext")],
        );
        fresh.insert("mcast".into(), vec![generated("g3", "mcast_leaf1_3", "pim")]);

        // With "mcast" first it also owns "mcast_ext_leaf1_1" by name.
        for order in [["mcast_ext", "mcast"], ["mcast", "mcast_ext"]] {
            let plan = reconcile_device(
                &assigned,
                &builders(&order),
                &fresh,
                UnmatchedPolicy::Keep,
            );

            assert!(plan.change_detected);
            assert_eq!(
                names(&plan.assign),
                vec!["mcast_ext", "mcast_ext_leaf1_1", "mcast", "mcast_leaf1_3"]
            );
            assert_eq!(
                plan.changes,
                vec![PlanChange::Recovered {
                    builder: "mcast".into(),
                    configlet: "mcast_leaf1_3".into(),
                }]
            );
        }
    }

    #[test]
    fn recovery_skips_configlet_already_assigned() {
        let assigned = vec![
            builder("b1", "mcast"),
            builder("b2", "ntp"),
            generated("g7", "mcast_leaf1_7", "pim"),
        ];
        // ntp's output collides with a configlet already assigned under mcast.
        let mut fresh = output("mcast", vec![generated("g7", "mcast_leaf1_7", "pim")]);
        fresh.insert("ntp".into(), vec![generated("g7", "ntp_mcast_leaf1_7", "pim")]);

        let plan = reconcile_device(
            &assigned,
            &builders(&["mcast", "ntp"]),
            &fresh,
            UnmatchedPolicy::Keep,
        );

        assert!(!plan.change_detected);
        assert_eq!(plan.assign, assigned);
    }

    #[test]
    fn unmatched_generated_is_removed_when_asked() {
        let stale = generated("g1", "mcast_builder_spine1_4", "ip pim");
        let assigned = vec![builder("b1", "mcast_builder"), stale.clone()];

        let plan = reconcile_device(
            &assigned,
            &builders(&["mcast_builder"]),
            &BuilderOutput::new(),
            UnmatchedPolicy::Remove,
        );

        assert!(plan.change_detected);
        assert_eq!(names(&plan.assign), vec!["mcast_builder"]);
        assert_eq!(plan.unassign, vec![stale.clone()]);
        assert_eq!(plan.delete, vec![stale]);
    }

    #[test]
    fn orphan_generated_is_copied_through() {
        let orphan = generated("g1", "legacy_thing_2", "x");
        let assigned = vec![fixed("s1", "base"), orphan];

        let plan = reconcile_device(
            &assigned,
            &builders(&["mcast_builder"]),
            &BuilderOutput::new(),
            UnmatchedPolicy::Remove,
        );

        assert!(!plan.change_detected);
        assert_eq!(plan.assign, assigned);
    }

    #[test]
    fn missing_fresh_configlet_for_recovery_is_not_a_change() {
        let assigned = vec![builder("b1", "mcast_builder")];

        let plan = reconcile_device(
            &assigned,
            &builders(&["mcast_builder"]),
            &BuilderOutput::new(),
            UnmatchedPolicy::Keep,
        );

        assert!(!plan.change_detected);
        assert_eq!(plan.assign, assigned);
    }

    #[test]
    fn out_of_scope_builder_is_left_alone() {
        let assigned = vec![
            builder("b1", "mcast_builder"),
            generated("g1", "mcast_builder_leaf1_1", "old"),
            builder("b2", "ntp_builder"),
        ];
        let fresh = vec![generated("g1", "mcast_builder_leaf1_1", "old")];

        let plan = reconcile_device(
            &assigned,
            &builders(&["mcast_builder"]),
            &output("mcast_builder", fresh),
            UnmatchedPolicy::Keep,
        );

        assert!(!plan.change_detected);
        assert_eq!(plan.assign, assigned);
    }

    #[test]
    fn two_builders_on_one_device() {
        let assigned = vec![
            builder("b1", "mcast_builder"),
            generated("g1", "mcast_builder_leaf1_1", "pim v1"),
            builder("b2", "ntp_builder"),
            generated("g2", "ntp_builder_leaf1_1", "ntp v1"),
        ];
        let mut fresh = output(
            "mcast_builder",
            vec![generated("g1", "mcast_builder_leaf1_1", "pim v1")],
        );
        fresh.insert(
            "ntp_builder".into(),
            vec![generated("g3", "ntp_builder_leaf1_2", "ntp v2")],
        );

        let plan = reconcile_device(
            &assigned,
            &builders(&["mcast_builder", "ntp_builder"]),
            &fresh,
            UnmatchedPolicy::Keep,
        );

        assert!(plan.change_detected);
        assert_eq!(
            names(&plan.assign),
            vec![
                "mcast_builder",
                "mcast_builder_leaf1_1",
                "ntp_builder",
                "ntp_builder_leaf1_2"
            ]
        );
        assert_eq!(names(&plan.delete), vec!["ntp_builder_leaf1_1"]);
    }

    #[test]
    fn generated_before_builder_still_satisfies_it() {
        let assigned = vec![
            generated("g1", "mcast_builder_leaf1_1", "pim"),
            builder("b1", "mcast_builder"),
        ];
        let fresh = vec![generated("g1", "mcast_builder_leaf1_1", "pim")];

        let plan = reconcile_device(
            &assigned,
            &builders(&["mcast_builder"]),
            &output("mcast_builder", fresh),
            UnmatchedPolicy::Keep,
        );

        assert!(!plan.change_detected);
        assert_eq!(plan.assign, assigned);
    }

    #[test]
    fn owning_builder_prefers_first_match() {
        let names = builders(&["mcast", "mcast_v2"]);
        assert_eq!(owning_builder("mcast_v2_leaf1_3", &names), Some("mcast"));
        assert_eq!(owning_builder("ntp_leaf1_3", &names), None);
    }

    #[test]
    fn name_without_version_suffix_matches_whole_name() {
        let old = generated("g1", "mcastleaf", "a");
        let new = generated("g2", "mcastleaf", "b");
        let assigned = vec![builder("b1", "mcast"), old];

        let plan = reconcile_device(
            &assigned,
            &builders(&["mcast"]),
            &output("mcast", vec![new.clone()]),
            UnmatchedPolicy::Keep,
        );

        assert!(plan.change_detected);
        assert_eq!(plan.assign[1], new);
    }
}
