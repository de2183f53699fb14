//! Existing-user lookup by email or CRM.
//!
//! "No such user" is `Ok(None)`; "lookup failed" is `Err`. Callers can tell
//! the two apart, so registration forms can offer to link an existing
//! account without masking backend outages.

use std::str::FromStr;

use crate::backend::{BackendError, CancelToken, ProfileRepository, ProfileRow};
use crate::models::{NotificationPreferences, UserProfile, UserRole};

/// Look up a user whose email or CRM matches.
///
/// Backend failures are logged and returned unchanged. Cancelling `cancel`
/// aborts the in-flight call with `BackendError::Cancelled`.
pub async fn lookup_user(
    repo: &dyn ProfileRepository,
    email: &str,
    crm: &str,
    cancel: &CancelToken,
) -> Result<Option<UserProfile>, BackendError> {
    if cancel.is_cancelled() {
        return Err(BackendError::Cancelled);
    }

    let row = tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            tracing::info!("User lookup cancelled");
            return Err(BackendError::Cancelled);
        }
        result = repo.find_profile_by_email_or_crm(email, crm) => result,
    };

    match row {
        Ok(Some(row)) => {
            let profile = profile_from_row(row)?;
            tracing::debug!(user_id = %profile.id, "User lookup matched");
            Ok(Some(profile))
        }
        Ok(None) => {
            tracing::debug!("User lookup found no match");
            Ok(None)
        }
        Err(e) => {
            tracing::warn!(error = %e, "User lookup failed");
            Err(e)
        }
    }
}

/// Map a stored row into the domain shape. Absent text becomes `""`; an
/// absent role defaults to doctor, an unrecognised one is an error.
pub fn profile_from_row(row: ProfileRow) -> Result<UserProfile, BackendError> {
    let role = match row.role.as_deref() {
        None | Some("") => UserRole::Doctor,
        Some(raw) => UserRole::from_str(raw)
            .map_err(|e| BackendError::InvalidRecord(format!("profile {}: {e}", row.id)))?,
    };

    Ok(UserProfile {
        id: row.id,
        first_name: row.first_name.unwrap_or_default(),
        last_name: row.last_name.unwrap_or_default(),
        email: row.email.unwrap_or_default(),
        phone: row.phone.unwrap_or_default(),
        crm: row.crm.unwrap_or_default(),
        title: row.title.unwrap_or_default(),
        bio: row.bio.unwrap_or_default(),
        notifications: NotificationPreferences::default(),
        role,
    })
}
