pub mod clinic;
pub mod enums;
pub mod insurance;
pub mod material;
pub mod patient;
pub mod procedure;
pub mod profile;
pub mod request;

pub use clinic::Clinic;
pub use enums::{InvalidEnum, RowShade, UserRole};
pub use insurance::InsuranceCompany;
pub use material::{compatible_materials, Material, MaterialWithQuantity};
pub use patient::{age_in_years, Doctor, Patient, SurgicalTeam};
pub use procedure::TussCode;
pub use profile::{NotificationPreferences, UserProfile};
pub use request::{AngioplastyRequestData, RequestNumber};
