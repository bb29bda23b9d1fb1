// In-memory control-plane used to drive the reconciler in tests.
//
// Mirrors the behaviors the engine depends on: the default flag clears
// when the default slot is disabled and lands on the next slot given LAN
// addressing while no default exists; omitted general-detail fields are
// left untouched.

#![allow(dead_code, clippy::unwrap_used)]

use std::sync::{Mutex, MutexGuard};

use serde_json::{Map, Value, json};

use edgesite_api::Error;
use edgesite_api::types::{
    DhcpSettingsPayload, InterfaceSlot, InterfaceUpdate, NativeRange, NativeRangeUpdate,
    RelayGroup, SiteGeneralDetailsUpdate, SiteLocationPayload, SiteSnapshot,
};
use edgesite_core::{ControlPlane, SlotIndex};

// ── State ───────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct FakeState {
    pub site: Option<SiteSnapshot>,
    pub slots: Vec<InterfaceSlot>,
    pub range: NativeRange,
    pub relay_groups: Vec<RelayGroup>,
    /// The control-plane reports `isDefault` at all.
    pub flag_supported: bool,
    /// The control-plane re-derives the flag after interface updates.
    pub flag_moves: bool,
    /// Keep relay fields from a previous DHCP_RELAY config when switching
    /// to DHCP_RANGE, like releases that echo stale sub-fields.
    pub echo_stale_dhcp: bool,
    /// Report the native subnet as translated subnet when none is set.
    pub echo_translated_as_native: bool,
    /// Fail the call with this log entry (500).
    pub fail_on: Option<String>,
    /// Matching calls let through before `fail_on` starts failing.
    pub fail_after: usize,
    pub calls: Vec<String>,
    pub detail_updates: Vec<SiteGeneralDetailsUpdate>,
}

pub struct FakeControlPlane {
    state: Mutex<FakeState>,
}

impl FakeControlPlane {
    pub fn new(state: FakeState) -> Self {
        Self {
            state: Mutex::new(state),
        }
    }

    pub fn state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }

    pub fn calls(&self) -> Vec<String> {
        self.state().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state().calls.clear();
    }

    pub fn slot(&self, index: &str) -> InterfaceSlot {
        let wanted: SlotIndex = index.parse().unwrap();
        self.state()
            .slots
            .iter()
            .find(|s| s.index.parse::<SlotIndex>().ok().as_ref() == Some(&wanted))
            .cloned()
            .unwrap()
    }

    pub fn default_slot(&self) -> Option<String> {
        self.state()
            .slots
            .iter()
            .find(|s| s.is_default == Some(true))
            .map(|s| s.index.clone())
    }

    pub fn dest_type(&self, index: &str) -> String {
        self.slot(index).helper_fields["destType"]
            .as_str()
            .unwrap()
            .to_owned()
    }

    fn record(&self, call: String) -> Result<MutexGuard<'_, FakeState>, Error> {
        let mut state = self.state();
        let mut fail = state.fail_on.as_deref() == Some(call.as_str());
        if fail && state.fail_after > 0 {
            state.fail_after -= 1;
            fail = false;
        }
        state.calls.push(call.clone());
        if fail {
            return Err(Error::Api {
                message: format!("injected failure: {call}"),
                code: None,
                status: 500,
            });
        }
        Ok(state)
    }
}

fn not_found(what: &str) -> Error {
    Error::Api {
        message: format!("{what} not found"),
        code: Some("NOT_FOUND".into()),
        status: 404,
    }
}

fn require_site<'a>(state: &'a FakeState, site_id: &str) -> Result<&'a SiteSnapshot, Error> {
    state
        .site
        .as_ref()
        .filter(|s| s.id == site_id)
        .ok_or_else(|| not_found("site"))
}

fn position(state: &FakeState, index: &str) -> Result<usize, Error> {
    let wanted: SlotIndex = index.parse().map_err(|_| not_found("interface"))?;
    state
        .slots
        .iter()
        .position(|s| s.index.parse::<SlotIndex>().ok().as_ref() == Some(&wanted))
        .ok_or_else(|| not_found("interface"))
}

// ── ControlPlane ────────────────────────────────────────────────────

impl ControlPlane for FakeControlPlane {
    async fn get_site(&self, site_id: &str) -> Result<SiteSnapshot, Error> {
        let state = self.record(format!("GET site {site_id}"))?;
        require_site(&state, site_id).cloned()
    }

    async fn list_interfaces(
        &self,
        site_id: &str,
        connection_type: &str,
    ) -> Result<Vec<InterfaceSlot>, Error> {
        let state = self.record(format!("GET interfaces {connection_type}"))?;
        let site = require_site(&state, site_id)?;
        assert_eq!(site.connection_type, connection_type);
        let mut slots = state.slots.clone();
        if !state.flag_supported {
            for slot in &mut slots {
                slot.is_default = None;
            }
        }
        Ok(slots)
    }

    async fn list_lag_members(&self, site_id: &str) -> Result<Vec<InterfaceSlot>, Error> {
        let state = self.record("GET lag members".into())?;
        require_site(&state, site_id)?;
        Ok(state
            .slots
            .iter()
            .filter(|s| s.helper_fields.get("destType") == Some(&json!("LAN_LAG_MEMBER")))
            .cloned()
            .collect())
    }

    async fn update_interface(
        &self,
        site_id: &str,
        index: &str,
        body: &InterfaceUpdate,
    ) -> Result<(), Error> {
        let mut state = self.record(format!("PUT interface {index} {}", body.dest_type))?;
        require_site(&state, site_id)?;
        let pos = position(&state, index)?;

        let disabling = body.dest_type == "INTERFACE_DISABLED";
        let flag_moves = state.flag_moves;
        let any_default = state.slots.iter().any(|s| s.is_default == Some(true));

        let slot = &mut state.slots[pos];
        let fields = &mut slot.helper_fields;
        fields.insert("destType".into(), json!(body.dest_type));
        match &body.lan {
            Some(lan) => {
                fields.insert("subnet".into(), json!(lan.subnet));
                fields.insert("localIp".into(), json!(lan.local_ip));
            }
            None => {
                fields.remove("subnet");
                fields.remove("localIp");
            }
        }
        match &body.lag {
            // Some releases echo the count as a string.
            Some(lag) => fields.insert("lagMinLinks".into(), json!(lag.min_links.to_string())),
            None => fields.remove("lagMinLinks"),
        };
        if body.name.is_some() {
            slot.name.clone_from(&body.name);
        }

        if flag_moves && disabling && slot.is_default == Some(true) {
            slot.is_default = Some(false);
        } else if flag_moves && !disabling && body.lan.is_some() && !any_default {
            slot.is_default = Some(true);
            let id = slot.id.clone();
            state.range.interface_id = Some(id);
        }
        Ok(())
    }

    async fn get_native_range(&self, site_id: &str) -> Result<NativeRange, Error> {
        let state = self.record("GET native range".into())?;
        require_site(&state, site_id)?;
        Ok(state.range.clone())
    }

    async fn update_native_range(
        &self,
        range_id: &str,
        body: &NativeRangeUpdate,
    ) -> Result<(), Error> {
        let mut state = self.record(format!("PUT range {range_id}"))?;
        if state.range.id != range_id {
            return Err(not_found("range"));
        }
        let echo_stale = state.echo_stale_dhcp;
        let echo_translated = state.echo_translated_as_native;
        let range = &mut state.range;

        range.subnet.clone_from(&body.subnet);
        range.local_ip = Some(body.local_ip.clone());
        range.gateway = Some(body.gateway.clone());
        range.vlan = Some(body.vlan.unwrap_or(0));
        range.translated_subnet = match &body.translated_subnet {
            Some(t) => Some(t.clone()),
            None if echo_translated => Some(body.subnet.clone()),
            None => None,
        };
        range.mdns_reflector = Some(body.mdns_reflector);
        if let Some(dhcp) = &body.dhcp_settings {
            let mut next = dhcp.clone();
            if echo_stale {
                if let Some(prev) = &range.dhcp_settings {
                    next.relay_group_id = next.relay_group_id.or(prev.relay_group_id.clone());
                    next.relay_group_name =
                        next.relay_group_name.or(prev.relay_group_name.clone());
                }
            }
            range.dhcp_settings = Some(next);
        }
        Ok(())
    }

    async fn find_relay_groups(&self, name: &str) -> Result<Vec<RelayGroup>, Error> {
        let state = self.record(format!("GET relay groups {name}"))?;
        Ok(state
            .relay_groups
            .iter()
            .filter(|g| g.name.contains(name))
            .cloned()
            .collect())
    }

    async fn update_site_general_details(
        &self,
        site_id: &str,
        body: &SiteGeneralDetailsUpdate,
    ) -> Result<(), Error> {
        let mut state = self.record("PUT general details".into())?;
        require_site(&state, site_id)?;
        state.detail_updates.push(body.clone());

        let Some(site) = state.site.as_mut() else {
            return Err(not_found("site"));
        };
        if body.description.is_some() {
            site.description.clone_from(&body.description);
        }
        let loc = site
            .site_location
            .get_or_insert_with(SiteLocationPayload::default);
        let p = &body.site_location;
        for (dst, src) in [
            (&mut loc.country_code, &p.country_code),
            (&mut loc.state_code, &p.state_code),
            (&mut loc.timezone, &p.timezone),
            (&mut loc.city, &p.city),
            (&mut loc.address, &p.address),
        ] {
            if src.is_some() {
                dst.clone_from(src);
            }
        }
        Ok(())
    }

    async fn remove_site(&self, site_id: &str) -> Result<(), Error> {
        let mut state = self.record(format!("DELETE site {site_id}"))?;
        require_site(&state, site_id)?;
        state.site = None;
        Ok(())
    }
}

// ── Fixtures ────────────────────────────────────────────────────────

pub fn slot(index: &str, dest_type: &str, is_default: bool) -> InterfaceSlot {
    let mut helper = Map::new();
    helper.insert("destType".into(), Value::String(dest_type.into()));
    InterfaceSlot {
        id: format!("if-{index}"),
        index: index.into(),
        name: Some(format!("port {index}")),
        is_default: Some(is_default),
        helper_fields: helper,
    }
}

pub fn site(id: &str, connection_type: &str) -> SiteSnapshot {
    SiteSnapshot {
        id: id.into(),
        name: format!("site-{id}"),
        connection_type: connection_type.into(),
        description: None,
        site_location: None,
    }
}

pub fn native_range(interface_id: &str) -> NativeRange {
    NativeRange {
        id: "range-1".into(),
        interface_id: Some(interface_id.into()),
        subnet: "192.168.1.0/24".into(),
        local_ip: Some("192.168.1.1".into()),
        gateway: Some("192.168.1.1".into()),
        vlan: None,
        translated_subnet: None,
        mdns_reflector: Some(false),
        range_type: Some("Native".into()),
        dhcp_settings: Some(DhcpSettingsPayload {
            dhcp_type: "DHCP_DISABLED".into(),
            ..DhcpSettingsPayload::default()
        }),
    }
}

fn state(site_snapshot: SiteSnapshot, slots: Vec<InterfaceSlot>, default_id: &str) -> FakeState {
    FakeState {
        site: Some(site_snapshot),
        slots,
        range: native_range(default_id),
        relay_groups: vec![
            RelayGroup {
                id: "rg-1".into(),
                name: "corp-relays".into(),
            },
            RelayGroup {
                id: "rg-2".into(),
                name: "corp-relays-backup".into(),
            },
        ],
        flag_supported: true,
        flag_moves: true,
        echo_stale_dhcp: false,
        echo_translated_as_native: false,
        fail_on: None,
        fail_after: 0,
        calls: Vec::new(),
        detail_updates: Vec::new(),
    }
}

/// A 5-slot ESX appliance: default on LAN1, INT_2..INT_5 disabled.
pub fn esx_site() -> FakeControlPlane {
    let slots = vec![
        slot("LAN1", "LAN", true),
        slot("INT_2", "INTERFACE_DISABLED", false),
        slot("INT_3", "INTERFACE_DISABLED", false),
        slot("INT_4", "INTERFACE_DISABLED", false),
        slot("INT_5", "INTERFACE_DISABLED", false),
    ];
    FakeControlPlane::new(state(site("1001", "SOCKET_ESX1500"), slots, "if-LAN1"))
}

/// An X1600 with numbered slots reported as bare numbers; default on 5.
pub fn x1600_site() -> FakeControlPlane {
    let mut slots: Vec<_> = (1..=8)
        .map(|n| slot(&n.to_string(), "INTERFACE_DISABLED", false))
        .collect();
    slots[4] = slot("5", "LAN", true);
    FakeControlPlane::new(state(site("2002", "SOCKET_X1600"), slots, "if-5"))
}
