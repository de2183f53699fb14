use chrono::NaiveDate;
use serde::Serialize;

use crate::models::age_in_years;

/// A labeled block of author text. Each entry of `lines` is one line as
/// typed, blank lines included.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NarrativeSection {
    pub label: &'static str,
    pub lines: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClinicalInfoFragment {
    /// Whole years on the render date, when the birth date is known.
    pub age: Option<u32>,
    /// Clinical picture, angiography findings, proposed treatment.
    pub sections: [NarrativeSection; 3],
}

/// Split on `\n`, keeping a trailing blank line. Empty text has no lines.
fn split_lines(text: &str) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
        .collect()
}

fn clinical_picture(age: Option<u32>) -> String {
    match age {
        Some(1) => "Paciente de 1 ano de idade.".to_string(),
        Some(years) => format!("Paciente de {years} anos de idade."),
        None => "Paciente com idade não informada.".to_string(),
    }
}

pub fn compose_clinical_info(
    birth_date: Option<NaiveDate>,
    angiography_findings: &str,
    proposed_treatment: &str,
    today: NaiveDate,
) -> ClinicalInfoFragment {
    let age = birth_date.and_then(|birth| age_in_years(birth, today));
    ClinicalInfoFragment {
        age,
        sections: [
            NarrativeSection {
                label: "Quadro clínico",
                lines: vec![clinical_picture(age)],
            },
            NarrativeSection {
                label: "Achados da angiografia",
                lines: split_lines(angiography_findings),
            },
            NarrativeSection {
                label: "Tratamento proposto",
                lines: split_lines(proposed_treatment),
            },
        ],
    }
}
