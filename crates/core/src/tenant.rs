//! Explicit tenant context.
//!
//! Every core operation receives the business it acts for as an argument.
//! The engine never infers the tenant from ambient state, and any entity
//! whose `business_id` differs from the context is rejected.

use kontu_shared::types::{BusinessId, UserId};
use kontu_shared::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Resolved tenant context supplied by the session layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantContext {
    /// The business all operations are scoped to.
    pub business_id: BusinessId,
    /// The acting user, recorded in audit fields.
    pub user_id: UserId,
}

impl TenantContext {
    /// Creates a new tenant context.
    #[must_use]
    pub const fn new(business_id: BusinessId, user_id: UserId) -> Self {
        Self {
            business_id,
            user_id,
        }
    }

    /// Rejects an entity that belongs to a different business.
    ///
    /// # Errors
    ///
    /// Returns `AppError::CrossTenant` when the ids differ.
    pub fn ensure_business(&self, entity_business_id: BusinessId) -> AppResult<()> {
        if entity_business_id == self.business_id {
            Ok(())
        } else {
            Err(AppError::CrossTenant)
        }
    }
}
