//! Material catalogue filtering.

use axum::Json;
use serde::{Deserialize, Serialize};

use crate::models::{compatible_materials, Material, TussCode};

#[derive(Debug, Deserialize)]
pub struct CompatibleMaterialsRequest {
    pub materials: Vec<Material>,
    pub procedures: Vec<TussCode>,
}

#[derive(Debug, Serialize)]
pub struct CompatibleMaterialsResponse {
    pub materials: Vec<Material>,
}

/// `POST /api/materials/compatible`: catalogue entries usable with at least
/// one of the selected procedures, in catalogue order.
pub async fn compatible(
    Json(body): Json<CompatibleMaterialsRequest>,
) -> Json<CompatibleMaterialsResponse> {
    let materials = compatible_materials(&body.materials, &body.procedures)
        .into_iter()
        .cloned()
        .collect();
    Json(CompatibleMaterialsResponse { materials })
}
