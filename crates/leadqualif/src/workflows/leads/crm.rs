//! Rules governing the free-form `statut_crm` field.
//!
//! Status updates are last-write-wins: no version check is made, so two agents
//! updating the same lead concurrently race and the later commit is kept.

use std::collections::BTreeSet;

/// Status assigned to every new lead.
pub const UNTRIAGED_STATUS: &str = "À traiter";

/// Statuses offered by the agency dashboard.
pub const DASHBOARD_STATUSES: [&str; 6] = [
    UNTRIAGED_STATUS,
    "Contacté",
    "RDV Planifié",
    "Offre en cours",
    "Signé / Vendu",
    "Perdu / Abandon",
];

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CrmError {
    #[error("field '{field}' must not be empty")]
    MissingValue { field: &'static str },
    #[error("status '{0}' is not part of the configured vocabulary")]
    UnknownStatus(String),
}

/// Which status values an agent may assign.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum StatusPolicy {
    /// Any non-empty value.
    #[default]
    Lenient,
    /// Only listed values, plus whatever the lead already holds.
    Vocabulary(BTreeSet<String>),
}

impl StatusPolicy {
    pub fn vocabulary<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let set = entries
            .into_iter()
            .map(Into::into)
            .map(|entry: String| entry.trim().to_string())
            .filter(|entry| !entry.is_empty())
            .collect();
        StatusPolicy::Vocabulary(set)
    }

    pub fn dashboard() -> Self {
        Self::vocabulary(DASHBOARD_STATUSES)
    }

    /// Validate `requested` for a lead currently holding `current`.
    pub fn resolve(&self, current: &str, requested: &str) -> Result<String, CrmError> {
        let status = requested.trim();
        if status.is_empty() {
            return Err(CrmError::MissingValue { field: "status" });
        }

        match self {
            StatusPolicy::Lenient => Ok(status.to_string()),
            StatusPolicy::Vocabulary(allowed) => {
                if allowed.contains(status) || status == current.trim() {
                    Ok(status.to_string())
                } else {
                    Err(CrmError::UnknownStatus(status.to_string()))
                }
            }
        }
    }
}

/// Validate an interaction category before it is logged.
pub fn resolve_action_type(requested: &str) -> Result<String, CrmError> {
    let action = requested.trim();
    if action.is_empty() {
        return Err(CrmError::MissingValue {
            field: "action_type",
        });
    }
    Ok(action.to_string())
}

pub fn clean_details(details: Option<&str>) -> Option<String> {
    details
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lenient_policy_accepts_free_text() {
        let status = StatusPolicy::Lenient
            .resolve(UNTRIAGED_STATUS, "  Rappeler lundi ")
            .expect("free text accepted");
        assert_eq!(status, "Rappeler lundi");
    }

    #[test]
    fn blank_status_is_a_missing_value() {
        for policy in [StatusPolicy::Lenient, StatusPolicy::dashboard()] {
            assert_eq!(
                policy.resolve(UNTRIAGED_STATUS, " \t"),
                Err(CrmError::MissingValue { field: "status" })
            );
        }
    }

    #[test]
    fn vocabulary_rejects_unknown_values() {
        let policy = StatusPolicy::dashboard();
        assert_eq!(
            policy.resolve(UNTRIAGED_STATUS, "Contacté"),
            Ok("Contacté".to_string())
        );
        assert_eq!(
            policy.resolve(UNTRIAGED_STATUS, "Rappeler lundi"),
            Err(CrmError::UnknownStatus("Rappeler lundi".to_string()))
        );
    }

    #[test]
    fn vocabulary_keeps_previously_accepted_values() {
        let policy = StatusPolicy::dashboard();
        assert_eq!(
            policy.resolve("Rappeler lundi", "Rappeler lundi"),
            Ok("Rappeler lundi".to_string())
        );
    }

    #[test]
    fn action_type_must_not_be_blank() {
        assert_eq!(
            resolve_action_type(""),
            Err(CrmError::MissingValue {
                field: "action_type"
            })
        );
        assert_eq!(resolve_action_type(" Appel "), Ok("Appel".to_string()));
        assert_eq!(clean_details(Some("   ")), None);
    }
}
