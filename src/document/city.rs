use crate::config::DEFAULT_CITY;

/// City printed on headers and datelines: the clinic's own city, else the
/// cached preference, else `DEFAULT_CITY`. Blank values are skipped.
pub fn resolve_city(clinic_city: Option<&str>, cached_city: Option<&str>) -> String {
    [clinic_city, cached_city]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|city| !city.is_empty())
        .unwrap_or(DEFAULT_CITY)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clinic_city_wins() {
        assert_eq!(resolve_city(Some("Recife"), Some("Campinas")), "Recife");
    }

    #[test]
    fn cached_city_when_clinic_has_none() {
        assert_eq!(resolve_city(None, Some("Campinas")), "Campinas");
    }

    #[test]
    fn default_when_nothing_known() {
        assert_eq!(resolve_city(None, None), "São Paulo");
    }

    #[test]
    fn blank_values_fall_through() {
        assert_eq!(resolve_city(Some(""), Some("  ")), "São Paulo");
        assert_eq!(resolve_city(Some(" "), Some("Santos")), "Santos");
    }
}
