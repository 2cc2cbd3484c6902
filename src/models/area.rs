//! Company area model: a business unit with routing keywords and a contact.

use serde::{Deserialize, Serialize};

/// Contact details for a company area (or the default contact).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct AreaContact {
    /// Contact person or team name
    pub name: String,

    /// Contact email address
    pub email: String,

    /// Contact phone number
    pub phone: String,
}

impl AreaContact {
    /// Create a new AreaContact.
    pub fn new(name: impl Into<String>, email: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
        }
    }
}

/// A configured business unit that unclassified queries can be routed to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct CompanyArea {
    /// Stable identifier of the area
    pub area_id: String,

    /// Human-readable area name, used in the response message
    pub area_name: String,

    /// Keywords matched case-insensitively against queries, in configuration order
    pub keywords: Vec<String>,

    /// Who to contact for this area
    pub contact: AreaContact,

    /// Short description returned alongside the contact
    pub description: String,
}

impl CompanyArea {
    /// Create a new CompanyArea.
    pub fn new(
        area_id: impl Into<String>,
        area_name: impl Into<String>,
        keywords: Vec<String>,
        contact: AreaContact,
        description: impl Into<String>,
    ) -> Self {
        Self {
            area_id: area_id.into(),
            area_name: area_name.into(),
            keywords,
            contact,
            description: description.into(),
        }
    }
}
