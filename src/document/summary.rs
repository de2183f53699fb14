use chrono::NaiveDate;
use serde::Serialize;

use super::city::resolve_city;
use super::DocumentContext;
use crate::models::{AngioplastyRequestData, Clinic};

/// Dateline plus the insurance, patient and request-number lines.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatientInfoFragment {
    pub dateline: String,
    pub insurance_name: String,
    pub patient_name: String,
    pub request_number: String,
}

impl PatientInfoFragment {
    /// Label/value pairs in print order.
    pub fn labeled_lines(&self) -> [(&'static str, &str); 3] {
        [
            ("Convênio", self.insurance_name.as_str()),
            ("Paciente", self.patient_name.as_str()),
            ("Nº da solicitação", self.request_number.as_str()),
        ]
    }
}

/// `"<city>, dd/mm/yyyy"` (pt-BR short date).
pub fn format_dateline(city: &str, date: NaiveDate) -> String {
    format!("{city}, {}", date.format("%d/%m/%Y"))
}

pub fn compose_patient_info(
    clinic: &Clinic,
    request: &AngioplastyRequestData,
    ctx: &DocumentContext,
) -> PatientInfoFragment {
    let city = resolve_city(clinic.city(), ctx.cached_city.as_deref());
    PatientInfoFragment {
        dateline: format_dateline(&city, ctx.today),
        insurance_name: request.insurance.name.clone(),
        patient_name: request.patient.name.clone(),
        request_number: request.request_number.to_string(),
    }
}
