use serde::Serialize;

use crate::models::Patient;

/// Controlled search input. Every input is forwarded to `on_search_change`
/// immediately; there is no debouncing.
pub struct SearchBar<F: FnMut(&str)> {
    value: String,
    placeholder: String,
    on_search_change: F,
}

impl<F: FnMut(&str)> SearchBar<F> {
    pub fn new(placeholder: impl Into<String>, on_search_change: F) -> Self {
        Self {
            value: String::new(),
            placeholder: placeholder.into(),
            on_search_change,
        }
    }

    /// The input now holds `text`.
    pub fn input(&mut self, text: &str) {
        self.value.clear();
        self.value.push_str(text);
        (self.on_search_change)(&self.value);
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }
}

/// What the header shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderView {
    pub title: String,
    pub subtitle: String,
    pub action_label: String,
}

/// Page header with a single "new patient" action.
pub struct PatientsHeader<F: FnMut()> {
    view: HeaderView,
    on_new_patient: F,
}

impl<F: FnMut()> PatientsHeader<F> {
    pub fn new(title: impl Into<String>, subtitle: impl Into<String>, on_new_patient: F) -> Self {
        Self {
            view: HeaderView {
                title: title.into(),
                subtitle: subtitle.into(),
                action_label: "Novo paciente".to_string(),
            },
            on_new_patient,
        }
    }

    pub fn view(&self) -> &HeaderView {
        &self.view
    }

    /// The action button was activated.
    pub fn activate(&mut self) {
        (self.on_new_patient)();
    }
}

/// Lowercase and strip Portuguese diacritics for matching.
fn fold(text: &str) -> String {
    text.chars()
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'í' | 'ì' | 'î' | 'ï' => 'i',
            'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
            'ú' | 'ù' | 'û' | 'ü' => 'u',
            'ç' => 'c',
            other => other,
        })
        .collect()
}

/// Patients whose name contains `query`, ignoring case and accents.
/// A blank query keeps everyone, in order.
pub fn filter_patients<'a>(patients: &'a [Patient], query: &str) -> Vec<&'a Patient> {
    let needle = fold(query.trim());
    if needle.is_empty() {
        return patients.iter().collect();
    }
    patients
        .iter()
        .filter(|p| fold(&p.name).contains(&needle))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn patient(name: &str) -> Patient {
        Patient {
            id: name.to_lowercase(),
            name: name.into(),
            birth_date: None,
        }
    }

    #[test]
    fn search_bar_forwards_every_keystroke() {
        let seen = RefCell::new(Vec::new());
        let mut bar = SearchBar::new("Buscar paciente", |text: &str| {
            seen.borrow_mut().push(text.to_string())
        });

        for text in ["J", "Jo", "Jos", "Jo"] {
            bar.input(text);
        }

        assert_eq!(bar.value(), "Jo");
        assert_eq!(bar.placeholder(), "Buscar paciente");
        drop(bar);
        assert_eq!(seen.into_inner(), vec!["J", "Jo", "Jos", "Jo"]);
    }

    #[test]
    fn search_bar_forwards_clearing() {
        let mut last = None;
        {
            let mut bar = SearchBar::new("", |text: &str| last = Some(text.to_string()));
            bar.input("Maria");
            bar.input("");
        }
        assert_eq!(last.as_deref(), Some(""));
    }

    #[test]
    fn header_action_invokes_callback_each_time() {
        let mut clicks = 0;
        {
            let mut header = PatientsHeader::new("Pacientes", "Gerencie seus pacientes", || {
                clicks += 1
            });
            assert_eq!(header.view().title, "Pacientes");
            assert_eq!(header.view().subtitle, "Gerencie seus pacientes");
            assert_eq!(header.view().action_label, "Novo paciente");
            header.activate();
            header.activate();
        }
        assert_eq!(clicks, 2);
    }

    #[test]
    fn filter_ignores_case_and_accents() {
        let patients = vec![patient("José Pereira"), patient("Maria Conceição"), patient("Ana Lúcia")];
        let names: Vec<&str> = filter_patients(&patients, "jose")
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(names, vec!["José Pereira"]);

        assert_eq!(filter_patients(&patients, "CONCEICAO").len(), 1);
        assert_eq!(filter_patients(&patients, "lu").len(), 1);
        assert!(filter_patients(&patients, "zzz").is_empty());
    }

    #[test]
    fn blank_query_keeps_everyone_in_order() {
        let patients = vec![patient("B"), patient("A")];
        let kept = filter_patients(&patients, "   ");
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].name, "B");
    }
}
