use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::{ValidationErrors, Violations};

/// `local@domain.tld` with no whitespace and a single `@`.
static EMAIL_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@.]+(?:\.[^\s@.]+)+$").unwrap()
});

const NAME_MIN_CHARS: usize = 2;
const CRM_MIN_CHARS: usize = 4;

/// Profile edit form as submitted by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub crm: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
}

pub fn is_email_shaped(value: &str) -> bool {
    EMAIL_SHAPE.is_match(value)
}

/// Validate a profile submission, returning it unchanged when every rule holds.
pub fn validate_profile(form: ProfileForm) -> Result<ProfileForm, ValidationErrors> {
    let mut v = Violations::default();

    v.require_min_chars(
        "first_name",
        &form.first_name,
        NAME_MIN_CHARS,
        "Nome é obrigatório",
        "Nome deve ter pelo menos 2 caracteres",
    );
    v.require_min_chars(
        "last_name",
        &form.last_name,
        NAME_MIN_CHARS,
        "Sobrenome é obrigatório",
        "Sobrenome deve ter pelo menos 2 caracteres",
    );

    if form.email.is_empty() {
        v.push("email", "Email é obrigatório");
    } else if !is_email_shaped(&form.email) {
        v.push("email", "Email inválido");
    }

    v.require_min_chars(
        "crm",
        &form.crm,
        CRM_MIN_CHARS,
        "CRM é obrigatório",
        "CRM deve ter pelo menos 4 caracteres",
    );

    // phone, title and bio accept any string, including the empty one.

    v.finish(form)
}
