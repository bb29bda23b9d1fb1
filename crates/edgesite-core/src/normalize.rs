// ── Field normalization policy ──
//
// The control-plane and the declared configuration encode "nothing" in
// different ways: empty strings, zero, `false`, stale sub-fields of an
// inactive DHCP mode, or a translated subnet equal to the native one.
// Each field's handling is listed once in `Field::policy`; hydration and
// location writes go through `normalize_read` / `normalize_write` only,
// which keeps repeated convergence a fixed point.

use strum::{Display, EnumIter};

use crate::model::{DestinationRole, DhcpType};
use crate::subnet::same_network;

/// Every field with non-trivial absent/empty semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum Field {
    InterfaceName,
    TranslatedSubnet,
    Vlan,
    LagMinLinks,
    DhcpIpRange,
    DhcpMicrosegmentation,
    DhcpRelayGroupId,
    DhcpRelayGroupName,
    Description,
    LocationCountryCode,
    LocationStateCode,
    LocationCity,
    LocationAddress,
    LocationTimezone,
}

/// How a remote value becomes an observed value. Rules apply in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadRule {
    /// Blank strings, zero and `false` read as absent.
    EmptyIsAbsent,
    /// As `EmptyIsAbsent`, but an empty value is kept when the reference
    /// carries the field (an explicit `false` the user declared).
    EmptyIsAbsentUnlessReferenced,
    /// A subnet equal to the native subnet reads as absent.
    AbsentWhenSameNetworkAsNative,
    /// Only meaningful for these DHCP types; otherwise the reference
    /// value is kept and the remote echo ignored.
    OnlyForDhcp(&'static [DhcpType]),
    /// Only meaningful on LAG master roles; otherwise absent.
    OnlyForLagMaster,
    /// When the remote omits the field, keep the reference value.
    ReferenceWhenUnechoed,
}

/// How a declared value is submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteRule {
    Verbatim,
    /// The control-plane ignores omitted fields, so clearing a previously
    /// set value requires sending this sentinel instead.
    ClearWith(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldPolicy {
    pub read: &'static [ReadRule],
    pub write: WriteRule,
}

const EMPTY_IS_ABSENT: &[ReadRule] = &[ReadRule::EmptyIsAbsent];
const TRANSLATED_SUBNET: &[ReadRule] = &[
    ReadRule::EmptyIsAbsent,
    ReadRule::AbsentWhenSameNetworkAsNative,
];
const LAG_MIN_LINKS: &[ReadRule] = &[ReadRule::OnlyForLagMaster, ReadRule::EmptyIsAbsent];
const RANGE_ONLY: &[DhcpType] = &[DhcpType::Range];
const RELAY_ONLY: &[DhcpType] = &[DhcpType::Relay];
const DHCP_IP_RANGE: &[ReadRule] = &[ReadRule::OnlyForDhcp(RANGE_ONLY), ReadRule::EmptyIsAbsent];
const DHCP_MICROSEGMENTATION: &[ReadRule] = &[
    ReadRule::OnlyForDhcp(RANGE_ONLY),
    ReadRule::EmptyIsAbsentUnlessReferenced,
];
const DHCP_RELAY_GROUP_ID: &[ReadRule] =
    &[ReadRule::OnlyForDhcp(RELAY_ONLY), ReadRule::EmptyIsAbsent];
const DHCP_RELAY_GROUP_NAME: &[ReadRule] = &[
    ReadRule::OnlyForDhcp(RELAY_ONLY),
    ReadRule::EmptyIsAbsent,
    ReadRule::ReferenceWhenUnechoed,
];

impl Field {
    pub const fn policy(self) -> FieldPolicy {
        let read = match self {
            Self::TranslatedSubnet => TRANSLATED_SUBNET,
            Self::LagMinLinks => LAG_MIN_LINKS,
            Self::DhcpIpRange => DHCP_IP_RANGE,
            Self::DhcpMicrosegmentation => DHCP_MICROSEGMENTATION,
            Self::DhcpRelayGroupId => DHCP_RELAY_GROUP_ID,
            Self::DhcpRelayGroupName => DHCP_RELAY_GROUP_NAME,
            Self::InterfaceName
            | Self::Vlan
            | Self::Description
            | Self::LocationCountryCode
            | Self::LocationStateCode
            | Self::LocationCity
            | Self::LocationAddress
            | Self::LocationTimezone => EMPTY_IS_ABSENT,
        };

        let write = match self {
            Self::LocationCity => WriteRule::ClearWith(" "),
            Self::LocationAddress => WriteRule::ClearWith(""),
            _ => WriteRule::Verbatim,
        };

        FieldPolicy { read, write }
    }
}

// ── Values ───────────────────────────────────────────────────────────

/// A field value the policy rules can inspect.
pub trait FieldValue: Clone {
    /// Whether this value is the "nothing" encoding of its type.
    fn is_empty_value(&self) -> bool;

    fn as_text(&self) -> Option<&str> {
        None
    }
}

impl FieldValue for String {
    fn is_empty_value(&self) -> bool {
        self.trim().is_empty()
    }

    fn as_text(&self) -> Option<&str> {
        Some(self)
    }
}

impl FieldValue for u16 {
    fn is_empty_value(&self) -> bool {
        *self == 0
    }
}

impl FieldValue for u32 {
    fn is_empty_value(&self) -> bool {
        *self == 0
    }
}

impl FieldValue for bool {
    fn is_empty_value(&self) -> bool {
        !*self
    }
}

/// Facts about the remote record a field was read from.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReadContext<'a> {
    pub native_subnet: Option<&'a str>,
    pub dhcp_type: Option<DhcpType>,
    pub role: Option<DestinationRole>,
}

// ── Read / write ─────────────────────────────────────────────────────

/// Normalize a remote value against `reference` (the declared config on
/// establish / converge, the prior observed config on refresh).
pub fn normalize_read<T: FieldValue>(
    field: Field,
    remote: Option<T>,
    reference: Option<&T>,
    ctx: &ReadContext<'_>,
) -> Option<T> {
    let mut value = remote;
    for rule in field.policy().read {
        value = match *rule {
            ReadRule::EmptyIsAbsent => value.filter(|v| !v.is_empty_value()),
            ReadRule::EmptyIsAbsentUnlessReferenced => {
                value.filter(|v| !v.is_empty_value() || reference.is_some())
            }
            ReadRule::AbsentWhenSameNetworkAsNative => value.filter(|v| {
                !v.as_text()
                    .zip(ctx.native_subnet)
                    .is_some_and(|(t, native)| same_network(t, native))
            }),
            ReadRule::OnlyForDhcp(types) => {
                if ctx.dhcp_type.is_some_and(|t| types.contains(&t)) {
                    value
                } else {
                    return reference.cloned();
                }
            }
            ReadRule::OnlyForLagMaster => {
                if ctx.role.is_some_and(DestinationRole::is_lag_master) {
                    value
                } else {
                    None
                }
            }
            ReadRule::ReferenceWhenUnechoed => value.or_else(|| reference.cloned()),
        };
    }
    value
}

/// The value to submit for `field`, or `None` to omit it.
///
/// A blank or absent declared value clears the field only when
/// `previous` held something; the sentinel of a `ClearWith` rule is sent
/// in that case.
pub fn normalize_write(
    field: Field,
    declared: Option<&str>,
    previous: Option<&str>,
) -> Option<String> {
    let declared = declared.filter(|v| !v.trim().is_empty());
    match (field.policy().write, declared) {
        (_, Some(v)) => Some(v.to_owned()),
        (WriteRule::Verbatim, None) => None,
        (WriteRule::ClearWith(sentinel), None) => previous
            .filter(|p| !p.trim().is_empty())
            .map(|_| sentinel.to_owned()),
    }
}
