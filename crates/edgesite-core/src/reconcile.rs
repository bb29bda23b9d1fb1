// ── Convergence orchestrator ──
//
// Sequences validation, slot resolution, the optional reassignment,
// range/interface updates and hydration for one site. Every remote call
// is awaited before the next is issued; the first failure ends the
// invocation and no automatic retry is attempted.

use edgesite_api::types::SiteSnapshot;
use strum::Display;
use tracing::{info, warn};

use crate::apply::{apply_native_range, general_details_update};
use crate::control::ControlPlane;
use crate::error::{CoreError, Step};
use crate::hydrate::hydrate;
use crate::model::{ConnectionType, SiteConfig, SiteLocation, SlotIndex};
use crate::reassign::{Reassignment, execute, plan_reassignment};
use crate::resolve::{ResolvedSlot, SlotSurvey, resolve_default_slot};
use crate::validate::{DesiredState, validate};

/// Orchestrator state, logged on every transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Phase {
    Establishing,
    Validating,
    Resolving,
    Reassigning,
    Updating,
    Hydrating,
    Converged,
    Failed,
}

/// Result of a successful establish / converge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Convergence {
    pub observed: SiteConfig,
    /// `(from, to)` when the default interface was moved.
    pub reassigned: Option<(SlotIndex, SlotIndex)>,
    pub location_updated: bool,
}

/// What an establish / converge would do, computed without mutation.
#[derive(Debug, Clone)]
pub struct Plan {
    pub site_id: String,
    pub site_name: String,
    pub current: ResolvedSlot,
    pub target: SlotIndex,
    pub reassignment: Option<Reassignment>,
    pub location_update: bool,
}

/// Converges sites against a [`ControlPlane`].
pub struct Reconciler<C> {
    cp: C,
}

impl<C: ControlPlane> Reconciler<C> {
    pub fn new(cp: C) -> Self {
        Self { cp }
    }

    pub fn control_plane(&self) -> &C {
        &self.cp
    }

    /// First convergence of a site that has no tracked state yet.
    pub async fn establish(&self, declared: &SiteConfig) -> Result<Convergence, CoreError> {
        info!(site = %declared.site_id, phase = %Phase::Establishing);
        let result = self.run(declared, None).await;
        finish(&declared.site_id, result)
    }

    /// Re-converge a tracked site. The connection type and site id are
    /// immutable and checked against `prior` before any remote call.
    pub async fn converge(
        &self,
        declared: &SiteConfig,
        prior: &SiteConfig,
    ) -> Result<Convergence, CoreError> {
        info!(site = %declared.site_id, phase = %Phase::Establishing);
        let result = match check_immutable(declared, prior) {
            Ok(()) => self.run(declared, Some(prior)).await,
            Err(e) => Err(e),
        };
        finish(&declared.site_id, result)
    }

    /// Refresh tracked state without mutating anything. `None` means the
    /// site no longer exists.
    pub async fn read(&self, prior: &SiteConfig) -> Result<Option<SiteConfig>, CoreError> {
        let Some(snapshot) = self.read_site(&prior.site_id).await? else {
            info!(site = %prior.site_id, "site no longer exists");
            return Ok(None);
        };
        check_connection_type(&snapshot, prior.connection_type)?;
        hydrate(&self.cp, &snapshot, prior.connection_type, prior)
            .await
            .map(Some)
    }

    /// Validate and resolve, reporting whether a reassignment would run.
    pub async fn plan(
        &self,
        declared: &SiteConfig,
        prior: Option<&SiteConfig>,
    ) -> Result<Plan, CoreError> {
        if let Some(prior) = prior {
            check_immutable(declared, prior)?;
        }
        let desired = validate(declared)?;
        let snapshot = self.require_site(&desired).await?;
        let survey =
            resolve_default_slot(&self.cp, &desired.site_id, desired.connection_type).await?;

        let reassignment = if survey.current.slot.index == desired.slot {
            None
        } else {
            Some(plan_reassignment(&survey, &desired)?)
        };
        let (prev_description, prev_location) = previous_details(&snapshot, prior);

        Ok(Plan {
            site_id: desired.site_id.clone(),
            site_name: snapshot.name,
            current: survey.current,
            target: desired.slot,
            reassignment,
            location_update: general_details_update(
                declared,
                prev_description.as_deref(),
                prev_location.as_ref(),
            )
            .is_some(),
        })
    }

    /// Remove a site. A site that is already gone counts as removed.
    pub async fn teardown(&self, site_id: &str) -> Result<(), CoreError> {
        if self.read_site(site_id).await?.is_none() {
            info!(site = site_id, "site already absent");
            return Ok(());
        }

        match self.cp.remove_site(site_id).await {
            Ok(()) => {
                info!(site = site_id, "site removed");
                Ok(())
            }
            Err(e) if e.is_not_found() => {
                info!(site = site_id, "site disappeared before removal");
                Ok(())
            }
            Err(e) => Err(CoreError::remote(site_id, Step::RemoveSite, e)),
        }
    }

    /// Every interface slot of a site plus the resolved default.
    pub async fn survey(
        &self,
        site_id: &str,
        connection_type: ConnectionType,
    ) -> Result<SlotSurvey, CoreError> {
        resolve_default_slot(&self.cp, site_id, connection_type).await
    }

    // ── Internals ────────────────────────────────────────────────────

    async fn run(
        &self,
        declared: &SiteConfig,
        prior: Option<&SiteConfig>,
    ) -> Result<Convergence, CoreError> {
        let site = declared.site_id.as_str();

        info!(site, phase = %Phase::Validating);
        let desired = validate(declared)?;

        info!(site, phase = %Phase::Resolving);
        let mut snapshot = self.require_site(&desired).await?;
        let survey = resolve_default_slot(&self.cp, site, desired.connection_type).await?;

        let reassigned = if survey.current.slot.index == desired.slot {
            None
        } else {
            info!(
                site,
                phase = %Phase::Reassigning,
                from = %survey.current.slot.index,
                to = %desired.slot
            );
            let reassignment = plan_reassignment(&survey, &desired)?;
            execute(&self.cp, &desired, &reassignment).await?;
            Some((reassignment.from, reassignment.to))
        };

        info!(site, phase = %Phase::Updating);
        apply_native_range(&self.cp, &desired).await?;

        let (prev_description, prev_location) = previous_details(&snapshot, prior);
        let details = general_details_update(
            declared,
            prev_description.as_deref(),
            prev_location.as_ref(),
        );
        let location_updated = details.is_some();
        if let Some(body) = details {
            info!(site, "updating site general details");
            self.cp
                .update_site_general_details(site, &body)
                .await
                .map_err(|e| CoreError::remote(site, Step::UpdateLocation, e))?;
            snapshot = self.require_site(&desired).await?;
        }

        info!(site, phase = %Phase::Hydrating);
        let observed = hydrate(&self.cp, &snapshot, desired.connection_type, declared).await?;

        Ok(Convergence {
            observed,
            reassigned,
            location_updated,
        })
    }

    async fn read_site(&self, site_id: &str) -> Result<Option<SiteSnapshot>, CoreError> {
        match self.cp.get_site(site_id).await {
            Ok(snapshot) => Ok(Some(snapshot)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(CoreError::remote(site_id, Step::ReadSite, e)),
        }
    }

    async fn require_site(&self, desired: &DesiredState) -> Result<SiteSnapshot, CoreError> {
        let snapshot = self
            .read_site(&desired.site_id)
            .await?
            .ok_or_else(|| CoreError::SiteNotFound {
                site: desired.site_id.clone(),
            })?;
        check_connection_type(&snapshot, desired.connection_type)?;
        Ok(snapshot)
    }
}

fn finish(
    site: &str,
    result: Result<Convergence, CoreError>,
) -> Result<Convergence, CoreError> {
    match &result {
        Ok(c) => info!(site, phase = %Phase::Converged, reassigned = c.reassigned.is_some()),
        Err(e) => warn!(site, phase = %Phase::Failed, error = %e),
    }
    result
}

fn check_immutable(declared: &SiteConfig, prior: &SiteConfig) -> Result<(), CoreError> {
    if declared.site_id != prior.site_id {
        return Err(CoreError::SiteMismatch {
            declared: declared.site_id.clone(),
            tracked: prior.site_id.clone(),
        });
    }
    if declared.connection_type != prior.connection_type {
        return Err(CoreError::ConnectionTypeChanged {
            site: declared.site_id.clone(),
            current: prior.connection_type,
            requested: declared.connection_type,
        });
    }
    Ok(())
}

fn check_connection_type(
    snapshot: &SiteSnapshot,
    declared: ConnectionType,
) -> Result<(), CoreError> {
    if snapshot.connection_type == declared.to_string() {
        Ok(())
    } else {
        Err(CoreError::ConnectionTypeMismatch {
            site: snapshot.id.clone(),
            remote: snapshot.connection_type.clone(),
            declared,
        })
    }
}

/// Description and location to diff against: the prior observed state
/// when there is one, the live snapshot otherwise.
fn previous_details(
    snapshot: &SiteSnapshot,
    prior: Option<&SiteConfig>,
) -> (Option<String>, Option<SiteLocation>) {
    match prior {
        Some(p) => (p.description.clone(), p.location.clone()),
        None => (
            snapshot.description.clone(),
            snapshot.site_location.as_ref().map(SiteLocation::from),
        ),
    }
}
