// ── Domain model ──
//
// Strongly-typed representation of sites, interface slots and native
// ranges. The control-plane's loosely-typed payloads are parsed into
// these types at the boundary (see `convert`); nothing past that point
// handles raw JSON.

pub mod connection;
pub mod dhcp;
pub mod site;
pub mod slot;

// ── Re-exports ──────────────────────────────────────────────────────

pub use connection::{ConnectionProfile, ConnectionType};
pub use dhcp::{DhcpConfig, DhcpSettings, DhcpType, RelayGroupRef};
pub use site::{NativeRangeConfig, SiteConfig, SiteLocation};
pub use slot::{DestinationRole, InterfaceSlot, InvalidSlotIndex, SlotIndex};
