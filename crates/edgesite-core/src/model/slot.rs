// ── Interface slots ──
//
// Slot identifiers, destination roles, and the typed view of one slot
// as parsed from the control-plane's loosely-typed attribute bag.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

// ── SlotIndex ───────────────────────────────────────────────────────

/// Identifier of an interface slot.
///
/// Hardware families either name their lanes (`LAN1`, `WAN2`, `USB1`) or
/// number them (`INT_1` .. `INT_n`). The control-plane sometimes reports
/// numbered slots as a bare `"5"`; that parses to the same value as
/// `"INT_5"` so the two compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SlotIndex {
    Named(String),
    Numbered(u16),
}

/// A slot identifier that is neither a name nor a number.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid interface slot index '{0}'")]
pub struct InvalidSlotIndex(pub String);

impl SlotIndex {
    pub(crate) fn from_static(raw: &'static str) -> Self {
        raw.parse().unwrap_or_else(|_| Self::Named(raw.to_owned()))
    }

    pub fn is_numbered(&self) -> bool {
        matches!(self, Self::Numbered(_))
    }
}

impl fmt::Display for SlotIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => f.write_str(name),
            Self::Numbered(n) => write!(f, "INT_{n}"),
        }
    }
}

impl FromStr for SlotIndex {
    type Err = InvalidSlotIndex;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.contains(char::is_whitespace) {
            return Err(InvalidSlotIndex(s.to_owned()));
        }

        let upper = trimmed.to_ascii_uppercase();
        let numeric = upper.strip_prefix("INT_").unwrap_or(&upper);
        if let Ok(n) = numeric.parse::<u16>() {
            return Ok(Self::Numbered(n));
        }
        if upper.starts_with("INT_") {
            return Err(InvalidSlotIndex(s.to_owned()));
        }

        Ok(Self::Named(upper))
    }
}

impl TryFrom<String> for SlotIndex {
    type Error = InvalidSlotIndex;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SlotIndex> for String {
    fn from(index: SlotIndex) -> Self {
        index.to_string()
    }
}

// ── DestinationRole ─────────────────────────────────────────────────

/// Functional mode of an interface slot (`destType` on the wire).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
pub enum DestinationRole {
    #[default]
    #[serde(rename = "LAN")]
    #[strum(serialize = "LAN")]
    Lan,
    #[serde(rename = "LAN_LAG_MASTER")]
    #[strum(serialize = "LAN_LAG_MASTER")]
    LanLagMaster,
    #[serde(rename = "LAN_LAG_MASTER_AND_VRRP")]
    #[strum(serialize = "LAN_LAG_MASTER_AND_VRRP")]
    LanLagMasterAndVrrp,
    #[serde(rename = "LAN_AND_HA")]
    #[strum(serialize = "LAN_AND_HA")]
    LanAndHa,
    #[serde(rename = "VRRP")]
    #[strum(serialize = "VRRP")]
    Vrrp,
    #[serde(rename = "VRRP_AND_LAN")]
    #[strum(serialize = "VRRP_AND_LAN")]
    VrrpAndLan,
    #[serde(rename = "INTERFACE_DISABLED")]
    #[strum(serialize = "INTERFACE_DISABLED")]
    Disabled,
    #[serde(rename = "LAN_LAG_MEMBER")]
    #[strum(serialize = "LAN_LAG_MEMBER")]
    LanLagMember,
}

impl DestinationRole {
    /// Roles that make the slot the master of a link aggregation group.
    pub const fn is_lag_master(self) -> bool {
        matches!(self, Self::LanLagMaster | Self::LanLagMasterAndVrrp)
    }

    /// Roles that carry LAN addressing (subnet + local IP).
    pub const fn carries_lan(self) -> bool {
        !matches!(self, Self::Disabled | Self::LanLagMember)
    }
}

// ── InterfaceSlot ───────────────────────────────────────────────────

/// Typed view of one interface slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceSlot {
    pub id: String,
    pub index: SlotIndex,
    pub name: Option<String>,
    /// `None` when the control-plane predates the default flag.
    pub is_default: Option<bool>,
    pub role: Option<DestinationRole>,
    pub subnet: Option<String>,
    pub local_ip: Option<String>,
    pub lag_min_links: Option<u32>,
}

impl InterfaceSlot {
    pub fn flagged_default(&self) -> bool {
        self.is_default == Some(true)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn numbered_slots_accept_bare_numbers() {
        let a: SlotIndex = "INT_5".parse().unwrap();
        let b: SlotIndex = "5".parse().unwrap();
        let c: SlotIndex = "int_5".parse().unwrap();
        assert_eq!(a, b);
        assert_eq!(a, c);
        assert_eq!(b.to_string(), "INT_5");
        assert!(a.is_numbered());
    }

    #[test]
    fn named_slots_are_uppercased() {
        let lan: SlotIndex = "lan1".parse().unwrap();
        assert_eq!(lan, SlotIndex::Named("LAN1".into()));
        assert_eq!(lan.to_string(), "LAN1");
        assert_ne!(lan, "INT_1".parse().unwrap());
    }

    #[test]
    fn malformed_slots_are_rejected() {
        assert!("".parse::<SlotIndex>().is_err());
        assert!("INT_x".parse::<SlotIndex>().is_err());
        assert!("LAN 1".parse::<SlotIndex>().is_err());
    }

    #[test]
    fn slot_index_serializes_as_text() {
        let idx = SlotIndex::Numbered(3);
        assert_eq!(serde_json::to_string(&idx).unwrap(), "\"INT_3\"");
        let back: SlotIndex = serde_json::from_str("\"3\"").unwrap();
        assert_eq!(back, idx);
    }

    #[test]
    fn role_classification() {
        assert!(DestinationRole::LanLagMaster.is_lag_master());
        assert!(DestinationRole::LanLagMasterAndVrrp.is_lag_master());
        assert!(!DestinationRole::LanLagMember.is_lag_master());
        assert!(!DestinationRole::Disabled.carries_lan());
        assert!(DestinationRole::VrrpAndLan.carries_lan());
        assert_eq!(
            "INTERFACE_DISABLED".parse::<DestinationRole>().ok(),
            Some(DestinationRole::Disabled)
        );
        assert_eq!(DestinationRole::LanAndHa.to_string(), "LAN_AND_HA");
    }
}
