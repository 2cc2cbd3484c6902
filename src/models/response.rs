//! Fallback response payload returned to callers.

use super::area::{AreaContact, CompanyArea};
use serde::{Deserialize, Serialize};

/// Description used when the default contact answers.
pub const DEFAULT_AREA_DESCRIPTION: &str = "General Administration";

/// Message used when the default contact answers.
pub const DEFAULT_MESSAGE: &str = "For general assistance, please contact:";

/// Contact information handed back for a query nobody could answer.
///
/// Serializes to an object with exactly the keys `message`, `contact_name`,
/// `contact_email`, `contact_phone` and `area_description`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FallbackResponse {
    pub message: String,
    pub contact_name: String,
    pub contact_email: String,
    pub contact_phone: String,
    pub area_description: String,
}

impl FallbackResponse {
    /// Build the response for a matched area.
    pub fn for_area(area: &CompanyArea) -> Self {
        Self {
            message: format!(
                "For inquiries related to {}, please contact:",
                area.area_name
            ),
            contact_name: area.contact.name.clone(),
            contact_email: area.contact.email.clone(),
            contact_phone: area.contact.phone.clone(),
            area_description: area.description.clone(),
        }
    }

    /// Build the response for the default contact.
    pub fn for_default(contact: &AreaContact) -> Self {
        Self {
            message: DEFAULT_MESSAGE.to_string(),
            contact_name: contact.name.clone(),
            contact_email: contact.email.clone(),
            contact_phone: contact.phone.clone(),
            area_description: DEFAULT_AREA_DESCRIPTION.to_string(),
        }
    }
}
