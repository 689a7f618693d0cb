//! Permission guard for admin-only operations

use tracing::{debug, warn};

use crate::domain::{Actor, Permission};
use crate::error::DomainError;

/// Fails with `AuthorizationError` unless `actor` holds `required`.
///
/// Call before touching any repository.
pub fn ensure_permission(actor: &Actor, required: Permission) -> Result<(), DomainError> {
    if !actor.has_permission(required) {
        warn!(
            actor_id = %actor.id,
            tenant_id = %actor.tenant_id,
            required = %required,
            "Permission denied"
        );
        return Err(DomainError::AuthorizationError {
            actor_id: actor.id,
            required,
        });
    }

    debug!(actor_id = %actor.id, required = %required, "Permission granted");
    Ok(())
}
