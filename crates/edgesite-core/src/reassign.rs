// ── Reassignment protocol ──
//
// Moves the default-interface role from one slot to another. The
// control-plane has no "move" call, so this is a fixed sequence of
// interface updates. There is no rollback: a failure part-way leaves the
// site in an intermediate state that the next pass re-resolves and
// finishes, since every stage is idempotent.

use std::fmt;

use edgesite_api::types::{InterfaceLan, InterfaceUpdate};
use tracing::{info, warn};

use crate::apply::interface_update;
use crate::control::ControlPlane;
use crate::error::{CoreError, Step};
use crate::model::{DestinationRole, InterfaceSlot, SlotIndex};
use crate::resolve::{ResolutionSource, SlotSurvey, resolve_default_slot};
use crate::validate::DesiredState;

/// Non-routable (TEST-NET-1) addressing used to occupy the target slot.
pub const PLACEHOLDER_SUBNET: &str = "192.0.2.0/30";
pub const PLACEHOLDER_LOCAL_IP: &str = "192.0.2.1";
pub const PLACEHOLDER_NAME: &str = "edgesite-staging";

/// One stage of the protocol, in execution order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stage {
    /// Occupy the target with a throwaway LAN config.
    StagePlaceholder { target: SlotIndex },
    /// Disable every LAG member before the master is disabled.
    DrainLagMembers { master: SlotIndex },
    /// Disable the current default, keeping its display name.
    DisableCurrentDefault {
        slot: SlotIndex,
        name: Option<String>,
    },
    /// Apply the desired interface config to the target.
    ApplyTargetSlot { target: SlotIndex },
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StagePlaceholder { target } => {
                write!(f, "stage placeholder {PLACEHOLDER_SUBNET} on {target}")
            }
            Self::DrainLagMembers { master } => write!(f, "disable LAG members of {master}"),
            Self::DisableCurrentDefault { slot, .. } => write!(f, "disable {slot}"),
            Self::ApplyTargetSlot { target } => write!(f, "configure {target} as default"),
        }
    }
}

/// A validated move of the default role from `from` to `to`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reassignment {
    pub from: SlotIndex,
    pub to: SlotIndex,
    pub stages: Vec<Stage>,
}

/// Check the preconditions and lay out the stages for moving the default
/// role to `desired.slot`.
pub fn plan_reassignment(
    survey: &SlotSurvey,
    desired: &DesiredState,
) -> Result<Reassignment, CoreError> {
    let site = &desired.site_id;
    let current = &survey.current;

    if current.source != ResolutionSource::DefaultFlag && !survey.flag_supported() {
        return Err(CoreError::FeatureUnavailable {
            site: site.clone(),
            reason: "the control-plane does not expose a default interface flag for this site"
                .into(),
        });
    }
    if survey.find(&desired.slot).is_none() {
        return Err(CoreError::UnknownSlot {
            site: site.clone(),
            slot: desired.slot.clone(),
            connection_type: desired.connection_type,
        });
    }

    let from = current.slot.index.clone();
    let to = desired.slot.clone();

    // Flag supported but set on no slot: an earlier pass disabled the old
    // default and stopped before configuring the target.
    if current.source != ResolutionSource::DefaultFlag {
        info!(site = %site, %to, "resuming interrupted reassignment");
        return Ok(Reassignment {
            from,
            stages: vec![Stage::ApplyTargetSlot { target: to.clone() }],
            to,
        });
    }

    let mut stages = vec![Stage::StagePlaceholder { target: to.clone() }];
    if current.slot.role.is_some_and(DestinationRole::is_lag_master) {
        stages.push(Stage::DrainLagMembers {
            master: from.clone(),
        });
    }
    stages.push(Stage::DisableCurrentDefault {
        slot: from.clone(),
        name: current.slot.name.clone(),
    });
    stages.push(Stage::ApplyTargetSlot { target: to.clone() });

    Ok(Reassignment { from, to, stages })
}

/// Run every stage in order, then confirm the flag moved.
///
/// Returns the post-move survey.
pub async fn execute<C: ControlPlane>(
    cp: &C,
    desired: &DesiredState,
    reassignment: &Reassignment,
) -> Result<SlotSurvey, CoreError> {
    let site = desired.site_id.as_str();

    for stage in &reassignment.stages {
        info!(site, %stage, "reassignment stage");
        match stage {
            Stage::StagePlaceholder { target } => {
                let body = InterfaceUpdate {
                    dest_type: DestinationRole::Lan.to_string(),
                    name: Some(PLACEHOLDER_NAME.to_owned()),
                    lan: Some(InterfaceLan {
                        subnet: PLACEHOLDER_SUBNET.to_owned(),
                        local_ip: PLACEHOLDER_LOCAL_IP.to_owned(),
                        translated_subnet: None,
                    }),
                    lag: None,
                };
                update(cp, site, target, &body, || Step::StagePlaceholder {
                    slot: target.clone(),
                })
                .await?;
            }
            Stage::DrainLagMembers { .. } => {
                drain_lag_members(cp, site, &reassignment.to).await?;
            }
            Stage::DisableCurrentDefault { slot, name } => {
                let body = disabled(name.clone());
                update(cp, site, slot, &body, || Step::DisableCurrentDefault {
                    slot: slot.clone(),
                })
                .await?;
            }
            Stage::ApplyTargetSlot { target } => {
                let body = interface_update(desired);
                update(cp, site, target, &body, || Step::ApplyTargetSlot {
                    slot: target.clone(),
                })
                .await?;
            }
        }
    }

    let after = resolve_default_slot(cp, site, desired.connection_type).await?;
    let moved = after.current.source == ResolutionSource::DefaultFlag
        && after.current.slot.index == reassignment.to;
    if !moved {
        warn!(
            site,
            expected = %reassignment.to,
            actual = %after.current.slot.index,
            "default flag did not move after reassignment"
        );
        return Err(CoreError::FeatureUnavailable {
            site: site.to_owned(),
            reason: format!(
                "the default interface flag is on {} ({}) instead of {} after reassignment; \
                 the capability may not be enabled for this account",
                after.current.slot.index, after.current.source, reassignment.to
            ),
        });
    }

    info!(site, from = %reassignment.from, to = %reassignment.to, "default interface reassigned");
    Ok(after)
}

async fn drain_lag_members<C: ControlPlane>(
    cp: &C,
    site: &str,
    target: &SlotIndex,
) -> Result<(), CoreError> {
    let raw = cp
        .list_lag_members(site)
        .await
        .map_err(|e| CoreError::remote(site, Step::ListLagMembers, e))?;

    for member in &raw {
        let member = InterfaceSlot::try_from(member).map_err(|e| CoreError::InvalidResponse {
            site: site.to_owned(),
            message: e.to_string(),
        })?;
        if &member.index == target || member.role != Some(DestinationRole::LanLagMember) {
            continue;
        }
        info!(site, slot = %member.index, "disabling LAG member");
        let body = disabled(member.name.clone());
        update(cp, site, &member.index, &body, || Step::DrainLagMember {
            slot: member.index.clone(),
        })
        .await?;
    }
    Ok(())
}

fn disabled(name: Option<String>) -> InterfaceUpdate {
    InterfaceUpdate {
        dest_type: DestinationRole::Disabled.to_string(),
        name,
        lan: None,
        lag: None,
    }
}

async fn update<C: ControlPlane>(
    cp: &C,
    site: &str,
    index: &SlotIndex,
    body: &InterfaceUpdate,
    step: impl FnOnce() -> Step,
) -> Result<(), CoreError> {
    cp.update_interface(site, &index.to_string(), body)
        .await
        .map_err(|e| CoreError::remote(site, step(), e))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{ConnectionType, SiteConfig};
    use crate::resolve::ResolvedSlot;
    use crate::validate::validate;

    fn slot(index: &str, role: DestinationRole, default: Option<bool>) -> InterfaceSlot {
        InterfaceSlot {
            id: format!("id-{index}"),
            index: index.parse().unwrap(),
            name: Some(format!("port {index}")),
            is_default: default,
            role: Some(role),
            subnet: None,
            local_ip: None,
            lag_min_links: None,
        }
    }

    fn desired(slot: &str) -> DesiredState {
        let cfg: SiteConfig = serde_json::from_value(serde_json::json!({
            "site_id": "77",
            "connection_type": "SOCKET_X1600",
            "native_range": {
                "interface_index": slot,
                "native_subnet": "10.9.0.0/24",
                "local_ip": "10.9.0.1",
            }
        }))
        .unwrap();
        validate(&cfg).unwrap()
    }

    fn survey(current_role: DestinationRole, source: ResolutionSource) -> SlotSurvey {
        let (current, other) = match source {
            ResolutionSource::DefaultFlag => (Some(true), Some(false)),
            ResolutionSource::ConnectionTypeTable => (None, None),
        };
        let current = slot("INT_5", current_role, current);
        SlotSurvey {
            slots: vec![
                current.clone(),
                slot("INT_6", DestinationRole::Disabled, other),
            ],
            current: ResolvedSlot {
                slot: current,
                source,
            },
        }
    }

    #[test]
    fn plain_move_has_three_stages() {
        let plan = plan_reassignment(
            &survey(DestinationRole::Lan, ResolutionSource::DefaultFlag),
            &desired("INT_6"),
        )
        .unwrap();
        assert_eq!(plan.from, SlotIndex::Numbered(5));
        assert_eq!(plan.to, SlotIndex::Numbered(6));
        assert_eq!(
            plan.stages,
            vec![
                Stage::StagePlaceholder {
                    target: SlotIndex::Numbered(6)
                },
                Stage::DisableCurrentDefault {
                    slot: SlotIndex::Numbered(5),
                    name: Some("port INT_5".into())
                },
                Stage::ApplyTargetSlot {
                    target: SlotIndex::Numbered(6)
                },
            ]
        );
    }

    #[test]
    fn lag_master_is_drained_first() {
        let plan = plan_reassignment(
            &survey(DestinationRole::LanLagMasterAndVrrp, ResolutionSource::DefaultFlag),
            &desired("INT_6"),
        )
        .unwrap();
        assert_eq!(plan.stages.len(), 4);
        assert_eq!(
            plan.stages[1],
            Stage::DrainLagMembers {
                master: SlotIndex::Numbered(5)
            }
        );
    }

    #[test]
    fn requires_the_default_flag() {
        let err = plan_reassignment(
            &survey(DestinationRole::Lan, ResolutionSource::ConnectionTypeTable),
            &desired("INT_6"),
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::FeatureUnavailable { .. }));
    }

    #[test]
    fn unflagged_site_resumes_at_the_final_stage() {
        let mut survey = survey(DestinationRole::Disabled, ResolutionSource::ConnectionTypeTable);
        for slot in &mut survey.slots {
            slot.is_default = Some(false);
        }
        survey.current.slot.is_default = Some(false);

        let plan = plan_reassignment(&survey, &desired("INT_6")).unwrap();
        assert_eq!(plan.from, SlotIndex::Numbered(5));
        assert_eq!(
            plan.stages,
            vec![Stage::ApplyTargetSlot {
                target: SlotIndex::Numbered(6)
            }]
        );
    }

    #[test]
    fn target_must_exist() {
        let err = plan_reassignment(
            &survey(DestinationRole::Lan, ResolutionSource::DefaultFlag),
            &desired("INT_9"),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            CoreError::UnknownSlot {
                connection_type: ConnectionType::SocketX1600,
                ..
            }
        ));
    }
}
