use serde::{Deserialize, Serialize};

use super::procedure::TussCode;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub id: String,
    pub description: String,
    pub manufacturer: String,
    pub code: String,
    /// Ids of the procedures this material may be billed with.
    #[serde(default)]
    pub compatible_procedures: Vec<String>,
    #[serde(default)]
    pub reference_price: Option<f64>,
}

impl Material {
    pub fn is_compatible_with(&self, procedure_id: &str) -> bool {
        self.compatible_procedures.iter().any(|id| id == procedure_id)
    }
}

/// A material selected on a request, with the requested quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialWithQuantity {
    #[serde(flatten)]
    pub material: Material,
    pub quantity: u32,
}

/// Materials compatible with at least one of the selected procedures,
/// in catalogue order.
pub fn compatible_materials<'a>(
    materials: &'a [Material],
    procedures: &[TussCode],
) -> Vec<&'a Material> {
    materials
        .iter()
        .filter(|m| procedures.iter().any(|p| m.is_compatible_with(&p.id)))
        .collect()
}
