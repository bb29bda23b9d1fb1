// ── Control-plane seam ──
//
// The set of remote operations the reconciliation engine consumes.
// `ControlPlaneClient` implements it over HTTP; tests drive the engine
// with an in-memory implementation.

use edgesite_api::types::{
    InterfaceSlot, InterfaceUpdate, NativeRange, NativeRangeUpdate, RelayGroup,
    SiteGeneralDetailsUpdate, SiteSnapshot,
};
use edgesite_api::{ControlPlaneClient, Error};

/// Remote operations consumed by [`Reconciler`](crate::Reconciler).
///
/// Each method is one remote call. Implementations must not retry.
#[allow(async_fn_in_trait)]
pub trait ControlPlane {
    async fn get_site(&self, site_id: &str) -> Result<SiteSnapshot, Error>;

    async fn list_interfaces(
        &self,
        site_id: &str,
        connection_type: &str,
    ) -> Result<Vec<InterfaceSlot>, Error>;

    async fn list_lag_members(&self, site_id: &str) -> Result<Vec<InterfaceSlot>, Error>;

    async fn update_interface(
        &self,
        site_id: &str,
        index: &str,
        body: &InterfaceUpdate,
    ) -> Result<(), Error>;

    async fn get_native_range(&self, site_id: &str) -> Result<NativeRange, Error>;

    async fn update_native_range(
        &self,
        range_id: &str,
        body: &NativeRangeUpdate,
    ) -> Result<(), Error>;

    async fn find_relay_groups(&self, name: &str) -> Result<Vec<RelayGroup>, Error>;

    async fn update_site_general_details(
        &self,
        site_id: &str,
        body: &SiteGeneralDetailsUpdate,
    ) -> Result<(), Error>;

    async fn remove_site(&self, site_id: &str) -> Result<(), Error>;
}

impl ControlPlane for ControlPlaneClient {
    async fn get_site(&self, site_id: &str) -> Result<SiteSnapshot, Error> {
        ControlPlaneClient::get_site(self, site_id).await
    }

    async fn list_interfaces(
        &self,
        site_id: &str,
        connection_type: &str,
    ) -> Result<Vec<InterfaceSlot>, Error> {
        Ok(ControlPlaneClient::list_interfaces(self, site_id, connection_type)
            .await?
            .items)
    }

    async fn list_lag_members(&self, site_id: &str) -> Result<Vec<InterfaceSlot>, Error> {
        Ok(ControlPlaneClient::list_lag_members(self, site_id).await?.items)
    }

    async fn update_interface(
        &self,
        site_id: &str,
        index: &str,
        body: &InterfaceUpdate,
    ) -> Result<(), Error> {
        ControlPlaneClient::update_interface(self, site_id, index, body).await?;
        Ok(())
    }

    async fn get_native_range(&self, site_id: &str) -> Result<NativeRange, Error> {
        ControlPlaneClient::get_native_range(self, site_id).await
    }

    async fn update_native_range(
        &self,
        range_id: &str,
        body: &NativeRangeUpdate,
    ) -> Result<(), Error> {
        ControlPlaneClient::update_native_range(self, range_id, body).await?;
        Ok(())
    }

    async fn find_relay_groups(&self, name: &str) -> Result<Vec<RelayGroup>, Error> {
        Ok(ControlPlaneClient::find_relay_groups(self, name).await?.items)
    }

    async fn update_site_general_details(
        &self,
        site_id: &str,
        body: &SiteGeneralDetailsUpdate,
    ) -> Result<(), Error> {
        ControlPlaneClient::update_site_general_details(self, site_id, body).await
    }

    async fn remove_site(&self, site_id: &str) -> Result<(), Error> {
        ControlPlaneClient::remove_site(self, site_id).await
    }
}
