// ── Connection types ──
//
// The hardware / virtual-appliance family of a site. Fixed for the
// lifetime of the site; it determines which interface slot backs the
// native range by default and whether a different slot may be chosen.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

use super::slot::SlotIndex;

/// Site connection type as reported and accepted by the control-plane.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
pub enum ConnectionType {
    #[serde(rename = "SOCKET_X1500")]
    #[strum(serialize = "SOCKET_X1500")]
    SocketX1500,
    #[serde(rename = "SOCKET_X1600")]
    #[strum(serialize = "SOCKET_X1600")]
    SocketX1600,
    #[serde(rename = "SOCKET_X1600_LTE")]
    #[strum(serialize = "SOCKET_X1600_LTE")]
    SocketX1600Lte,
    #[serde(rename = "SOCKET_X1700")]
    #[strum(serialize = "SOCKET_X1700")]
    SocketX1700,
    #[serde(rename = "SOCKET_AWS1500")]
    #[strum(serialize = "SOCKET_AWS1500")]
    SocketAws1500,
    #[serde(rename = "SOCKET_AZ1500")]
    #[strum(serialize = "SOCKET_AZ1500")]
    SocketAz1500,
    #[serde(rename = "SOCKET_ESX1500")]
    #[strum(serialize = "SOCKET_ESX1500")]
    SocketEsx1500,
    #[serde(rename = "SOCKET_GCP1500")]
    #[strum(serialize = "SOCKET_GCP1500")]
    SocketGcp1500,
}

/// Static per-connection-type facts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionProfile {
    /// The physical family this type belongs to (itself for physical models).
    pub family: ConnectionType,
    /// Slot that holds the native range on a freshly provisioned site.
    pub default_slot: &'static str,
    /// Whether the native range may be placed on a slot other than
    /// `default_slot`.
    pub slot_selectable: bool,
}

impl ConnectionType {
    /// Lookup table of default slots and slot selectability.
    pub const fn profile(self) -> ConnectionProfile {
        match self {
            Self::SocketX1500 => ConnectionProfile {
                family: Self::SocketX1500,
                default_slot: "LAN1",
                slot_selectable: false,
            },
            Self::SocketX1600 => ConnectionProfile {
                family: Self::SocketX1600,
                default_slot: "INT_5",
                slot_selectable: true,
            },
            Self::SocketX1600Lte => ConnectionProfile {
                family: Self::SocketX1600Lte,
                default_slot: "INT_5",
                slot_selectable: true,
            },
            Self::SocketX1700 => ConnectionProfile {
                family: Self::SocketX1700,
                default_slot: "INT_3",
                slot_selectable: true,
            },
            Self::SocketAws1500 | Self::SocketAz1500 | Self::SocketGcp1500 => ConnectionProfile {
                family: Self::SocketX1500,
                default_slot: "LAN1",
                slot_selectable: false,
            },
            // vSphere appliances expose every vNIC as a selectable slot.
            Self::SocketEsx1500 => ConnectionProfile {
                family: Self::SocketX1500,
                default_slot: "LAN1",
                slot_selectable: true,
            },
        }
    }

    /// The documented default slot for this connection type.
    pub fn default_slot(self) -> SlotIndex {
        SlotIndex::from_static(self.profile().default_slot)
    }

    pub const fn slot_selectable(self) -> bool {
        self.profile().slot_selectable
    }

    pub const fn is_virtual(self) -> bool {
        matches!(
            self,
            Self::SocketAws1500 | Self::SocketAz1500 | Self::SocketEsx1500 | Self::SocketGcp1500
        )
    }

    /// Connection types on which an explicit slot may be requested.
    pub fn selectable() -> impl Iterator<Item = Self> {
        Self::iter().filter(|ct| ct.slot_selectable())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_slots_follow_hardware_family() {
        assert_eq!(ConnectionType::SocketX1500.default_slot().to_string(), "LAN1");
        assert_eq!(ConnectionType::SocketX1600.default_slot().to_string(), "INT_5");
        assert_eq!(ConnectionType::SocketX1600Lte.default_slot().to_string(), "INT_5");
        assert_eq!(ConnectionType::SocketX1700.default_slot().to_string(), "INT_3");
        for ct in [
            ConnectionType::SocketAws1500,
            ConnectionType::SocketAz1500,
            ConnectionType::SocketEsx1500,
            ConnectionType::SocketGcp1500,
        ] {
            assert!(ct.is_virtual());
            assert_eq!(ct.profile().family, ConnectionType::SocketX1500);
            assert_eq!(ct.default_slot().to_string(), "LAN1");
        }
    }

    #[test]
    fn selectable_types() {
        let selectable: Vec<_> = ConnectionType::selectable().collect();
        assert_eq!(
            selectable,
            vec![
                ConnectionType::SocketX1600,
                ConnectionType::SocketX1600Lte,
                ConnectionType::SocketX1700,
                ConnectionType::SocketEsx1500,
            ]
        );
    }

    #[test]
    fn wire_names_round_trip_through_strum_and_serde() {
        for ct in ConnectionType::iter() {
            let text = ct.to_string();
            assert_eq!(text.parse::<ConnectionType>().ok(), Some(ct));
            let json = serde_json::to_string(&ct).ok();
            assert_eq!(json, Some(format!("\"{text}\"")));
        }
        assert!("SOCKET_X9000".parse::<ConnectionType>().is_err());
    }
}
