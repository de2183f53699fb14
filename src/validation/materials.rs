use crate::models::MaterialWithQuantity;

use super::{ValidationErrors, Violations};

/// Every selected material must be requested at least once.
pub fn validate_materials(materials: &[MaterialWithQuantity]) -> Result<(), ValidationErrors> {
    let mut v = Violations::default();

    for item in materials.iter().filter(|item| item.quantity == 0) {
        v.push(
            "materials",
            format!(
                "Quantidade deve ser pelo menos 1: {}",
                item.material.description
            ),
        );
    }

    v.finish(())
}
