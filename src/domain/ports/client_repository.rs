//! Client profile repository port.
//!
//! Profiles are only ever written by `LeadRepository::convert_to_client`,
//! so this port is read-only.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::errors::DomainResult;
use crate::domain::models::ClientProfile;

#[async_trait]
pub trait ClientProfileRepository: Send + Sync {
    /// Get a client profile by ID.
    async fn get(&self, id: Uuid) -> DomainResult<Option<ClientProfile>>;

    /// Get the profile converted from a lead, if any.
    async fn get_by_lead(&self, lead_id: Uuid) -> DomainResult<Option<ClientProfile>>;

    /// List every profile owned by a professional, newest first.
    async fn list_by_professional(&self, professional_id: Uuid) -> DomainResult<Vec<ClientProfile>>;
}
