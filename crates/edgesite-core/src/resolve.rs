// ── Slot resolver ──
//
// Determines which interface slot currently holds the default-interface
// role. The is-default flag is authoritative; control-planes that predate
// the flag fall back to the connection type's documented default slot.

use tracing::warn;

use crate::control::ControlPlane;
use crate::error::{CoreError, Step};
use crate::model::{ConnectionType, InterfaceSlot, SlotIndex};

/// How the current default slot was identified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum ResolutionSource {
    #[strum(serialize = "default flag")]
    DefaultFlag,
    #[strum(serialize = "connection type table")]
    ConnectionTypeTable,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSlot {
    pub slot: InterfaceSlot,
    pub source: ResolutionSource,
}

impl ResolvedSlot {
    pub fn index(&self) -> &SlotIndex {
        &self.slot.index
    }
}

/// Every slot of a site plus the one resolved as current default.
#[derive(Debug, Clone)]
pub struct SlotSurvey {
    pub slots: Vec<InterfaceSlot>,
    pub current: ResolvedSlot,
}

impl SlotSurvey {
    pub fn find(&self, index: &SlotIndex) -> Option<&InterfaceSlot> {
        self.slots.iter().find(|s| &s.index == index)
    }

    /// Whether the control-plane reports the default flag at all. A
    /// control-plane that supports it may still have no slot flagged,
    /// e.g. between disabling the old default and configuring the new one.
    pub fn flag_supported(&self) -> bool {
        self.slots.iter().any(|s| s.is_default.is_some())
    }
}

/// Pick the default slot out of `slots`, or `None` when neither the flag
/// nor the connection-type table identifies one.
pub fn select_default_slot(slots: &[InterfaceSlot], ct: ConnectionType) -> Option<ResolvedSlot> {
    let mut flagged = slots.iter().filter(|s| s.flagged_default());
    if let Some(slot) = flagged.next() {
        if let Some(other) = flagged.next() {
            warn!(
                first = %slot.index,
                second = %other.index,
                "more than one slot flagged as default, using the first"
            );
        }
        return Some(ResolvedSlot {
            slot: slot.clone(),
            source: ResolutionSource::DefaultFlag,
        });
    }

    let expected = ct.default_slot();
    slots
        .iter()
        .find(|s| s.index == expected)
        .map(|slot| ResolvedSlot {
            slot: slot.clone(),
            source: ResolutionSource::ConnectionTypeTable,
        })
}

/// List a site's slots, parsing each at the boundary.
pub(crate) async fn list_slots<C: ControlPlane>(
    cp: &C,
    site_id: &str,
    ct: ConnectionType,
) -> Result<Vec<InterfaceSlot>, CoreError> {
    let raw = cp
        .list_interfaces(site_id, &ct.to_string())
        .await
        .map_err(|e| CoreError::remote(site_id, Step::ListSlots, e))?;

    raw.iter()
        .map(|r| {
            InterfaceSlot::try_from(r).map_err(|e| CoreError::InvalidResponse {
                site: site_id.to_owned(),
                message: e.to_string(),
            })
        })
        .collect()
}

/// Query the control-plane and resolve the current default slot.
pub async fn resolve_default_slot<C: ControlPlane>(
    cp: &C,
    site_id: &str,
    ct: ConnectionType,
) -> Result<SlotSurvey, CoreError> {
    let slots = list_slots(cp, site_id, ct).await?;
    let current = select_default_slot(&slots, ct).ok_or_else(|| CoreError::Resolution {
        site: site_id.to_owned(),
        expected: ct.default_slot(),
    })?;

    if current.source == ResolutionSource::ConnectionTypeTable {
        warn!(
            site = site_id,
            slot = %current.slot.index,
            "no slot carries the default flag, falling back to the connection type default"
        );
    }

    Ok(SlotSurvey { slots, current })
}
