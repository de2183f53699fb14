use serde::{Deserialize, Serialize};

/// A TUSS billing code selected as a procedure on a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TussCode {
    pub id: String,
    pub code: String,
    pub description: String,
}
