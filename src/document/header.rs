use serde::Serialize;

use super::city::resolve_city;
use super::DocumentContext;
use crate::models::Clinic;

/// Bounding box reserved for the clinic logo, in millimetres.
pub const LOGO_BOX_WIDTH_MM: f32 = 40.0;
pub const LOGO_BOX_HEIGHT_MM: f32 = 20.0;

/// Where the clinic logo goes and how large it may be.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogoSlot {
    pub url: String,
    pub max_width_mm: f32,
    pub max_height_mm: f32,
}

impl LogoSlot {
    fn new(url: String) -> Self {
        Self {
            url,
            max_width_mm: LOGO_BOX_WIDTH_MM,
            max_height_mm: LOGO_BOX_HEIGHT_MM,
        }
    }

    /// Scale an image of the given intrinsic size to the largest size that
    /// fits the box with its aspect ratio intact. `None` for degenerate sizes.
    pub fn fit(&self, width: f32, height: f32) -> Option<(f32, f32)> {
        if !(width > 0.0 && height > 0.0) {
            return None;
        }
        let scale = (self.max_width_mm / width).min(self.max_height_mm / height);
        Some((width * scale, height * scale))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeaderFragment {
    pub clinic_name: String,
    pub address: Option<String>,
    pub city: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub logo: Option<LogoSlot>,
}

impl HeaderFragment {
    /// Contact lines under the clinic name, skipping absent fields.
    pub fn contact_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        match &self.address {
            Some(address) => lines.push(format!("{address} — {}", self.city)),
            None => lines.push(self.city.clone()),
        }
        let mut reach = Vec::new();
        if let Some(phone) = &self.phone {
            reach.push(format!("Tel: {phone}"));
        }
        if let Some(email) = &self.email {
            reach.push(email.clone());
        }
        if !reach.is_empty() {
            lines.push(reach.join(" | "));
        }
        lines
    }
}

fn present(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}

pub fn compose_header(clinic: &Clinic, ctx: &DocumentContext) -> HeaderFragment {
    HeaderFragment {
        clinic_name: clinic.name.clone(),
        address: present(&clinic.address),
        city: resolve_city(clinic.city(), ctx.cached_city.as_deref()),
        phone: present(&clinic.phone),
        email: present(&clinic.email),
        logo: present(&clinic.logo_url).map(LogoSlot::new),
    }
}
