use serde::{Deserialize, Serialize};

/// Clinic identity and contact details printed on request headers.
///
/// Only `name` is guaranteed; every other field may be absent and is
/// resolved to a default at render time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clinic {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub logo_url: Option<String>,
}

impl Clinic {
    /// City set on the clinic record, ignoring blank values.
    pub fn city(&self) -> Option<&str> {
        self.city.as_deref().map(str::trim).filter(|c| !c.is_empty())
    }
}
