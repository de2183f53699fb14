//! Line-item tables for the request document.
//!
//! An empty input suppresses the whole table (`None`) for both procedures
//! and materials. Rows alternate shading by zero-based position.

use serde::Serialize;

use crate::models::{MaterialWithQuantity, RowShade, SurgicalTeam, TussCode};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcedureRow {
    pub code: String,
    pub description: String,
    pub shade: RowShade,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProceduresTable {
    pub rows: Vec<ProcedureRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaterialRow {
    pub description: String,
    pub quantity: u32,
    pub shade: RowShade,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaterialsTable {
    pub rows: Vec<MaterialRow>,
}

pub fn compose_procedures_table(procedures: &[TussCode]) -> Option<ProceduresTable> {
    if procedures.is_empty() {
        return None;
    }
    let rows = procedures
        .iter()
        .enumerate()
        .map(|(i, p)| ProcedureRow {
            code: p.code.clone(),
            description: p.description.clone(),
            shade: RowShade::for_index(i),
        })
        .collect();
    Some(ProceduresTable { rows })
}

pub fn compose_materials_table(materials: &[MaterialWithQuantity]) -> Option<MaterialsTable> {
    if materials.is_empty() {
        return None;
    }
    let rows = materials
        .iter()
        .enumerate()
        .map(|(i, m)| MaterialRow {
            description: m.material.description.clone(),
            quantity: m.quantity,
            shade: RowShade::for_index(i),
        })
        .collect();
    Some(MaterialsTable { rows })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamMember {
    pub role: &'static str,
    pub name: String,
    pub crm: String,
    /// `Dr(a). <name> — CRM <crm>`, as printed.
    pub display_name: String,
}

/// Assigned team members; `None` when nobody is assigned yet.
pub fn compose_team(team: &SurgicalTeam) -> Option<Vec<TeamMember>> {
    let members: Vec<TeamMember> = team
        .members()
        .into_iter()
        .map(|(role, doctor)| TeamMember {
            role,
            name: doctor.name.clone(),
            crm: doctor.crm.clone(),
            display_name: doctor.display_name(),
        })
        .collect();
    if members.is_empty() {
        None
    } else {
        Some(members)
    }
}
