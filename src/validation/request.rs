use serde::{Deserialize, Serialize};

use super::{ValidationErrors, Violations};

/// New-request form: the two required references plus free-text narrative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestForm {
    pub patient_id: String,
    pub insurance_id: String,
    #[serde(default)]
    pub clinical_indication: Option<String>,
    #[serde(default)]
    pub proposed_treatment: Option<String>,
}

/// Validate a request submission. Only the references can fail.
pub fn validate_request(form: RequestForm) -> Result<RequestForm, ValidationErrors> {
    let mut v = Violations::default();

    if form.patient_id.is_empty() {
        v.push("patient_id", "Selecione um paciente");
    }
    if form.insurance_id.is_empty() {
        v.push("insurance_id", "Selecione um convênio");
    }

    v.finish(form)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(patient_id: &str, insurance_id: &str) -> RequestForm {
        RequestForm {
            patient_id: patient_id.into(),
            insurance_id: insurance_id.into(),
            clinical_indication: None,
            proposed_treatment: None,
        }
    }

    #[test]
    fn accepts_both_references() {
        assert!(validate_request(form("p1", "i1")).is_ok());
    }

    #[test]
    fn missing_patient_is_named() {
        let errors = validate_request(form("", "i1")).unwrap_err();
        assert_eq!(errors.fields(), vec!["patient_id"]);
    }

    #[test]
    fn missing_insurance_is_named() {
        let errors = validate_request(form("p1", "")).unwrap_err();
        assert_eq!(errors.fields(), vec!["insurance_id"]);
    }

    #[test]
    fn missing_both_reports_both() {
        let errors = validate_request(form("", "")).unwrap_err();
        assert_eq!(errors.fields(), vec!["patient_id", "insurance_id"]);
    }

    #[test]
    fn narrative_never_causes_failure() {
        let long = "x".repeat(10_000);
        for text in ["", " ", "Lesão de 90% em DA proximal\n\nStent", long.as_str()] {
            let request = RequestForm {
                clinical_indication: Some(text.to_string()),
                proposed_treatment: Some(text.to_string()),
                ..form("p1", "i1")
            };
            assert!(validate_request(request).is_ok());
        }
    }
}
