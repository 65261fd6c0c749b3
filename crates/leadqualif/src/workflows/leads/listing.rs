//! Hand-off to the advertisement copy collaborator.
//!
//! The collaborator receives a flat property description and returns free text that the
//! lead workflow stores or displays verbatim. Nothing here reads that text back.

use serde::Serialize;

use super::domain::Lead;

/// Flat property description passed to the copywriter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertyBrief {
    pub property_type: Option<String>,
    pub location: Option<String>,
    pub price: Option<u64>,
    pub surface: Option<u32>,
    pub rooms: Option<u32>,
}

impl From<&Lead> for PropertyBrief {
    fn from(lead: &Lead) -> Self {
        let interest = &lead.interest;
        Self {
            property_type: interest.property_type.clone(),
            location: interest.location.clone(),
            price: (interest.budget > 0).then_some(interest.budget),
            surface: interest.surface,
            rooms: interest.rooms,
        }
    }
}

/// Drafts advertisement copy; implemented outside this crate.
pub trait AdvertisementDrafter: Send + Sync {
    fn draft(&self, brief: &PropertyBrief) -> Result<String, DraftError>;
}

#[derive(Debug, thiserror::Error)]
pub enum DraftError {
    #[error("copywriter unavailable: {0}")]
    Unavailable(String),
    #[error("copywriter rejected the brief: {0}")]
    Rejected(String),
}
