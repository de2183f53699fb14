use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
}

/// Whole years elapsed between `birth` and `on`.
pub fn age_in_years(birth: NaiveDate, on: NaiveDate) -> Option<u32> {
    on.years_since(birth)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Doctor {
    pub id: String,
    pub name: String,
    pub crm: String,
}

impl Doctor {
    pub fn display_name(&self) -> String {
        format!("Dr(a). {} — CRM {}", self.name, self.crm)
    }
}

/// Team assigned to the procedure. Any member may still be unassigned.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SurgicalTeam {
    #[serde(default)]
    pub surgeon: Option<Doctor>,
    #[serde(default)]
    pub assistant: Option<Doctor>,
    #[serde(default)]
    pub anesthesiologist: Option<Doctor>,
}

impl SurgicalTeam {
    /// Assigned members paired with their role label, in display order.
    pub fn members(&self) -> Vec<(&'static str, &Doctor)> {
        [
            ("Cirurgião", self.surgeon.as_ref()),
            ("Auxiliar", self.assistant.as_ref()),
            ("Anestesista", self.anesthesiologist.as_ref()),
        ]
        .into_iter()
        .filter_map(|(role, doctor)| doctor.map(|d| (role, d)))
        .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.surgeon.is_none() && self.assistant.is_none() && self.anesthesiologist.is_none()
    }
}
