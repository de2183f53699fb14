//! Request document composition.
//!
//! Every compose function is pure: it reads borrowed domain values plus a
//! `DocumentContext` resolved once by the caller (cached city, today's date)
//! and returns serializable fragments. `pdf` turns the assembled document
//! into printable bytes.

pub mod city;
pub mod clinical;
pub mod header;
pub mod pdf;
pub mod summary;
pub mod tables;

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{AngioplastyRequestData, Clinic};

pub use city::resolve_city;
pub use clinical::{compose_clinical_info, ClinicalInfoFragment, NarrativeSection};
pub use header::{compose_header, HeaderFragment, LogoSlot};
pub use pdf::{export_pdf_to_file, render_pdf};
pub use summary::{compose_patient_info, format_dateline, PatientInfoFragment};
pub use tables::{
    compose_materials_table, compose_procedures_table, compose_team, MaterialsTable,
    ProceduresTable, TeamMember,
};

/// Configuration injected into composition, resolved at the call site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentContext {
    /// City from the local preference store, if the user set one.
    pub cached_city: Option<String>,
    /// Date used for the dateline and the patient's age.
    pub today: NaiveDate,
}

/// A complete angioplasty authorization request, fragments in print order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestDocument {
    pub title: String,
    pub header: HeaderFragment,
    pub patient_info: PatientInfoFragment,
    pub clinical_info: ClinicalInfoFragment,
    pub procedures: Option<ProceduresTable>,
    pub materials: Option<MaterialsTable>,
    pub team: Option<Vec<TeamMember>>,
}

#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("PDF generation failed: {0}")]
    Pdf(String),
    #[error("Cannot write document: {0}")]
    Io(#[from] std::io::Error),
}

pub fn compose_request_document(
    clinic: &Clinic,
    request: &AngioplastyRequestData,
    ctx: &DocumentContext,
) -> RequestDocument {
    RequestDocument {
        title: format!("Solicitação de Angioplastia — {}", request.request_number),
        header: compose_header(clinic, ctx),
        patient_info: compose_patient_info(clinic, request, ctx),
        clinical_info: compose_clinical_info(
            request.patient.birth_date,
            &request.clinical_indication,
            &request.proposed_treatment,
            ctx.today,
        ),
        procedures: compose_procedures_table(&request.procedures),
        materials: compose_materials_table(&request.materials),
        team: compose_team(&request.team),
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[test]
    fn composes_all_fragments() {
        let ctx = DocumentContext {
            cached_city: None,
            today: today(),
        };
        let doc = compose_request_document(&clinic(), &request(), &ctx);

        assert_eq!(doc.title, "Solicitação de Angioplastia — ANG-20261016-1A2B3C4D");
        assert_eq!(doc.header.clinic_name, "Instituto Cardiovascular Paulista");
        assert_eq!(doc.header.city, "São Paulo");
        assert_eq!(doc.patient_info.dateline, "São Paulo, 16/10/2026");
        assert_eq!(doc.clinical_info.age, Some(68));
        assert_eq!(doc.procedures.as_ref().unwrap().rows.len(), 2);
        assert_eq!(doc.materials.as_ref().unwrap().rows.len(), 1);
        assert_eq!(doc.team.as_ref().unwrap()[0].name, "Ana Souza");
    }

    #[test]
    fn cached_city_reaches_header_and_dateline() {
        let ctx = DocumentContext {
            cached_city: Some("Ribeirão Preto".into()),
            today: today(),
        };
        let doc = compose_request_document(&clinic(), &request(), &ctx);
        assert_eq!(doc.header.city, "Ribeirão Preto");
        assert!(doc.patient_info.dateline.starts_with("Ribeirão Preto, "));
    }

    #[test]
    fn empty_selections_drop_optional_sections() {
        let mut request = request();
        request.procedures.clear();
        request.materials.clear();
        request.team = Default::default();
        let ctx = DocumentContext {
            cached_city: None,
            today: today(),
        };
        let doc = compose_request_document(&clinic(), &request, &ctx);
        assert!(doc.procedures.is_none());
        assert!(doc.materials.is_none());
        assert!(doc.team.is_none());
    }

    #[test]
    fn serializes_fragments_in_print_order() {
        let ctx = DocumentContext {
            cached_city: None,
            today: today(),
        };
        let doc = compose_request_document(&clinic(), &request(), &ctx);
        let json = serde_json::to_string(&doc).unwrap();
        let positions: Vec<usize> = ["\"header\"", "\"patient_info\"", "\"clinical_info\"", "\"procedures\"", "\"materials\""]
            .iter()
            .map(|key| json.find(key).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert!(json.contains("\"shade\":\"shaded\""));
    }
}
