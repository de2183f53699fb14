//! Profile endpoints: form validation and existing-user lookup.

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::models::UserProfile;
use crate::user_lookup::lookup_user;
use crate::validation::{validate_profile, ProfileForm};

#[derive(Debug, Serialize)]
pub struct ValidatedProfile {
    pub profile: ProfileForm,
}

/// `POST /api/profiles/validate`: the accepted form, or 422 with every
/// offending field.
pub async fn validate(Json(form): Json<ProfileForm>) -> Result<Json<ValidatedProfile>, ApiError> {
    let profile = validate_profile(form)?;
    Ok(Json(ValidatedProfile { profile }))
}

#[derive(Debug, Deserialize)]
pub struct LookupQuery {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub crm: String,
}

#[derive(Debug, Serialize)]
pub struct LookupResponse {
    pub profile: UserProfile,
}

/// `GET /api/profiles/lookup?email=&crm=`
///
/// 404 when no profile matches, 502 when the backend cannot answer.
pub async fn lookup(
    State(ctx): State<ApiContext>,
    Query(query): Query<LookupQuery>,
) -> Result<Json<LookupResponse>, ApiError> {
    let email = query.email.trim();
    let crm = query.crm.trim();
    if email.is_empty() && crm.is_empty() {
        return Err(ApiError::BadRequest("email or crm is required".into()));
    }

    let found = lookup_user(ctx.core.profiles(), email, crm, ctx.core.shutdown_token()).await?;
    match found {
        Some(profile) => Ok(Json(LookupResponse { profile })),
        None => Err(ApiError::NotFound("Usuário não encontrado".into())),
    }
}
