use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use homzhub_core::domain::lease::{AssetUnitId, Furnishing, LeaseSpaceForm, LeaseTermForm};

use crate::client::ApiClient;
use crate::error::ApiError;

/// Flattened space + term body for the lease listing POST. Built only
/// from forms that already passed client-side validation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LeaseTermRequest {
    pub floor_number: i32,
    pub total_floors: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub carpet_area: Option<Decimal>,
    pub furnishing: Furnishing,
    pub expected_rent: Decimal,
    pub security_deposit: Decimal,
    pub available_from: DateTime<Utc>,
    pub minimum_lease_months: u8,
}

impl LeaseTermRequest {
    pub fn from_forms(space: &LeaseSpaceForm, term: &LeaseTermForm) -> Self {
        Self {
            floor_number: space.floor_number,
            total_floors: space.total_floors,
            carpet_area: space.carpet_area,
            furnishing: space.furnishing,
            expected_rent: term.expected_rent,
            security_deposit: term.security_deposit,
            available_from: term.available_from,
            minimum_lease_months: term.minimum_lease_months,
        }
    }
}

#[async_trait]
pub trait LeaseApi: Send + Sync {
    async fn submit_lease_term(
        &self,
        unit: &AssetUnitId,
        request: &LeaseTermRequest,
    ) -> Result<(), ApiError>;
}

#[derive(Clone)]
pub struct HttpLeaseApi {
    client: ApiClient,
}

impl HttpLeaseApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl LeaseApi for HttpLeaseApi {
    async fn submit_lease_term(
        &self,
        unit: &AssetUnitId,
        request: &LeaseTermRequest,
    ) -> Result<(), ApiError> {
        self.client.post_unit(&format!("asset-units/{}/lease-terms", unit.0), request).await
    }
}
