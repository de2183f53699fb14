use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::insurance::InsuranceCompany;
use super::material::MaterialWithQuantity;
use super::patient::{Patient, SurgicalTeam};
use super::procedure::TussCode;

/// Generated identifier printed on a request document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestNumber(pub String);

impl RequestNumber {
    /// `ANG-YYYYMMDD-XXXXXXXX`, the suffix taken from a random UUID.
    pub fn generate(date: NaiveDate) -> Self {
        let suffix: String = Uuid::new_v4()
            .simple()
            .to_string()
            .chars()
            .take(8)
            .collect::<String>()
            .to_uppercase();
        Self(format!("ANG-{}-{suffix}", date.format("%Y%m%d")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RequestNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Everything needed to render one angioplasty authorization request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AngioplastyRequestData {
    pub patient: Patient,
    pub insurance: InsuranceCompany,
    #[serde(default)]
    pub procedures: Vec<TussCode>,
    #[serde(default)]
    pub materials: Vec<MaterialWithQuantity>,
    #[serde(default)]
    pub team: SurgicalTeam,
    pub request_number: RequestNumber,
    /// Angiography findings / clinical indication, as typed by the author.
    #[serde(default)]
    pub clinical_indication: String,
    #[serde(default)]
    pub proposed_treatment: String,
}
