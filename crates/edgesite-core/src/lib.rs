// edgesite-core: Reconciliation engine between declared site configuration
// and the control-plane (edgesite-api).
//
// Flow for one site: validate -> resolve default slot -> (reassign) ->
// update range and interface -> hydrate observed state.

pub mod apply;
pub mod config;
pub mod control;
pub mod convert;
pub mod error;
pub mod hydrate;
pub mod model;
pub mod normalize;
pub mod reassign;
pub mod reconcile;
pub mod resolve;
pub mod subnet;
pub mod validate;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{ClientConfig, TlsVerification};
pub use control::ControlPlane;
pub use error::{AddressError, CoreError, Step, ValidationError};
pub use reassign::{Reassignment, Stage};
pub use reconcile::{Convergence, Phase, Plan, Reconciler};
pub use resolve::{ResolutionSource, ResolvedSlot, SlotSurvey};
pub use validate::{DesiredState, validate};

// Re-export model types at the crate root for ergonomics.
pub use model::{
    ConnectionType, DestinationRole, DhcpConfig, DhcpSettings, DhcpType, InterfaceSlot,
    NativeRangeConfig, RelayGroupRef, SiteConfig, SiteLocation, SlotIndex,
};
