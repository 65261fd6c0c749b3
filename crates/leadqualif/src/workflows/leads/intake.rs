//! Intake validation for public lead submissions.
//!
//! Submissions arrive from several form generations with different field names and
//! loosely typed numbers. Everything is folded into one canonical shape here so the
//! scoring rules only ever see normalized values.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::domain::{AgencyId, ContactDetails, PropertyInterest};

/// Numeric field as typed by a visitor: a JSON number or a free-form string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumericInput {
    Integer(i64),
    Decimal(f64),
    Text(String),
}

impl NumericInput {
    /// Lenient conversion; anything unusable becomes 0.
    pub fn to_amount(&self) -> u64 {
        match self {
            NumericInput::Integer(value) => u64::try_from(*value).unwrap_or(0),
            NumericInput::Decimal(value) if value.is_finite() && *value > 0.0 => {
                if *value >= u64::MAX as f64 {
                    u64::MAX
                } else {
                    value.trunc() as u64
                }
            }
            NumericInput::Decimal(_) => 0,
            NumericInput::Text(raw) => parse_amount(raw),
        }
    }
}

impl From<&str> for NumericInput {
    fn from(value: &str) -> Self {
        NumericInput::Text(value.to_string())
    }
}

impl From<i64> for NumericInput {
    fn from(value: i64) -> Self {
        NumericInput::Integer(value)
    }
}

/// Raw public submission. Accepts the historical French field names as aliases.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawLeadSubmission {
    #[serde(default, alias = "nom", alias = "nom_client")]
    pub name: Option<String>,
    #[serde(default, alias = "email_client")]
    pub email: Option<String>,
    #[serde(default, alias = "telephone")]
    pub phone: Option<String>,
    #[serde(
        default,
        alias = "adresse",
        alias = "adresse_bien_interesse",
        alias = "localisation"
    )]
    pub location: Option<String>,
    #[serde(default, alias = "prix")]
    pub budget: Option<NumericInput>,
    #[serde(default, alias = "type_bien", alias = "typeBien")]
    pub property_type: Option<String>,
    #[serde(default)]
    pub surface: Option<NumericInput>,
    #[serde(default, alias = "pieces")]
    pub rooms: Option<NumericInput>,
    #[serde(default, alias = "delai")]
    pub timeline: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, alias = "agencyId")]
    pub agency_id: Option<String>,
}

/// Submission after normalization, tagged with its owning agency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedLead {
    pub agency_id: AgencyId,
    pub contact: ContactDetails,
    pub interest: PropertyInterest,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum IntakeError {
    #[error("required field '{field}' is missing or malformed")]
    MissingRequiredField { field: &'static str },
    #[error("an agency identifier is required to submit a lead")]
    TenantRequired,
    #[error("agency identifier '{value}' is not a valid UUID")]
    InvalidAgencyId { value: String },
}

/// Checks required fields and normalizes noisy input before scoring.
#[derive(Debug, Clone)]
pub struct IntakeValidator {
    multi_tenant: bool,
    default_agency: Option<AgencyId>,
}

impl Default for IntakeValidator {
    fn default() -> Self {
        Self::multi_tenant()
    }
}

impl IntakeValidator {
    pub fn multi_tenant() -> Self {
        Self {
            multi_tenant: true,
            default_agency: None,
        }
    }

    /// Single-agency deployments route anonymous submissions to `agency`.
    pub fn single_tenant(agency: AgencyId) -> Self {
        Self {
            multi_tenant: false,
            default_agency: Some(agency),
        }
    }

    pub fn validate(&self, raw: RawLeadSubmission) -> Result<NormalizedLead, IntakeError> {
        let name = raw
            .name
            .as_deref()
            .map(collapse_whitespace)
            .filter(|value| !value.is_empty())
            .ok_or(IntakeError::MissingRequiredField { field: "name" })?;

        let email = raw
            .email
            .as_deref()
            .map(str::trim)
            .filter(|value| is_plausible_email(value))
            .ok_or(IntakeError::MissingRequiredField { field: "email" })?;

        let agency_id = self.resolve_agency(raw.agency_id.as_deref())?;

        let contact = ContactDetails {
            name,
            email: email.to_string(),
            phone: raw.phone.as_deref().and_then(normalize_phone),
        };

        let interest = PropertyInterest {
            property_type: clean_text(raw.property_type.as_deref()),
            location: clean_text(raw.location.as_deref()),
            budget: raw.budget.as_ref().map(NumericInput::to_amount).unwrap_or(0),
            surface: raw.surface.as_ref().and_then(small_quantity),
            rooms: raw.rooms.as_ref().and_then(small_quantity),
            timeline: clean_text(raw.timeline.as_deref()),
            message: clean_text(raw.message.as_deref()),
        };

        Ok(NormalizedLead {
            agency_id,
            contact,
            interest,
        })
    }

    fn resolve_agency(&self, supplied: Option<&str>) -> Result<AgencyId, IntakeError> {
        match supplied.map(str::trim).filter(|value| !value.is_empty()) {
            Some(value) => Uuid::parse_str(value)
                .map(AgencyId)
                .map_err(|_| IntakeError::InvalidAgencyId {
                    value: value.to_string(),
                }),
            None if self.multi_tenant => Err(IntakeError::TenantRequired),
            None => self.default_agency.ok_or(IntakeError::TenantRequired),
        }
    }
}

/// Parse a budget-like string such as `"600 000€"` or `"1.250.000 EUR"`.
///
/// Whitespace, currency markers and thousands separators are dropped. A `.` counts as a
/// thousands separator only when every group after it has exactly three digits; otherwise
/// it is a decimal point and the fraction is truncated. Unparsable input yields 0.
pub fn parse_amount(raw: &str) -> u64 {
    let lowered = raw.to_lowercase();
    let without_words = lowered.replace("euros", "").replace("euro", "").replace("eur", "");
    let cleaned: String = without_words
        .chars()
        .filter(|ch| !ch.is_whitespace())
        .filter(|ch| !matches!(*ch, '€' | '$' | '£' | '¥' | ',' | '\'' | '’' | '_'))
        .collect();
    let cleaned = cleaned.strip_prefix('+').unwrap_or(&cleaned);

    let mut groups = cleaned.split('.');
    let head = groups.next().unwrap_or_default();
    let tail: Vec<&str> = groups.collect();

    let digits = if tail.is_empty() {
        head.to_string()
    } else if tail.iter().all(|group| is_digit_group(group, 3)) {
        let mut joined = head.to_string();
        tail.iter().for_each(|group| joined.push_str(group));
        joined
    } else if tail.len() == 1 && tail[0].chars().all(|ch| ch.is_ascii_digit()) {
        head.to_string()
    } else {
        return 0;
    };

    if digits.is_empty() || !digits.chars().all(|ch| ch.is_ascii_digit()) {
        return 0;
    }
    digits.parse::<u64>().unwrap_or(0)
}

fn is_digit_group(group: &str, len: usize) -> bool {
    group.len() == len && group.chars().all(|ch| ch.is_ascii_digit())
}

fn small_quantity(input: &NumericInput) -> Option<u32> {
    let amount = input.to_amount();
    if amount == 0 {
        return None;
    }
    u32::try_from(amount).ok()
}

/// Strip spaces, hyphens, dots and parentheses from a phone number.
pub fn normalize_phone(raw: &str) -> Option<String> {
    let cleaned: String = raw
        .chars()
        .filter(|ch| !ch.is_whitespace() && !matches!(*ch, '-' | '.' | '(' | ')'))
        .collect();
    (!cleaned.is_empty()).then_some(cleaned)
}

pub fn phone_digit_count(phone: &str) -> usize {
    phone.chars().filter(char::is_ascii_digit).count()
}

pub fn is_plausible_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let mut parts = value.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    if local.is_empty() || domain.is_empty() {
        return false;
    }
    match domain.find('.') {
        Some(_) => !domain.starts_with('.') && !domain.ends_with('.'),
        None => false,
    }
}

fn collapse_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn clean_text(value: Option<&str>) -> Option<String> {
    value
        .map(collapse_whitespace)
        .filter(|cleaned| !cleaned.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission() -> RawLeadSubmission {
        RawLeadSubmission {
            name: Some("  Jean   Dupont ".to_string()),
            email: Some("j@d.fr".to_string()),
            phone: Some("06 12-34.56 78".to_string()),
            location: Some("Lyon".to_string()),
            budget: Some(NumericInput::from("600 000€")),
            agency_id: Some("6f1c2c8e-52a4-4a4b-9a57-0d0a4f1f9c11".to_string()),
            ..RawLeadSubmission::default()
        }
    }

    #[test]
    fn normalizes_contact_and_budget() {
        let lead = IntakeValidator::multi_tenant()
            .validate(submission())
            .expect("valid submission");
        assert_eq!(lead.contact.name, "Jean Dupont");
        assert_eq!(lead.contact.phone.as_deref(), Some("0612345678"));
        assert_eq!(lead.interest.budget, 600_000);
        assert_eq!(lead.interest.location.as_deref(), Some("Lyon"));
    }

    #[test]
    fn parses_noisy_amounts() {
        assert_eq!(parse_amount("600 000€"), 600_000);
        assert_eq!(parse_amount("1.250.000 EUR"), 1_250_000);
        assert_eq!(parse_amount("450,000 $"), 450_000);
        assert_eq!(parse_amount("250000.75"), 250_000);
        assert_eq!(parse_amount("300\u{a0}000 euros"), 300_000);
        assert_eq!(parse_amount("-20000"), 0);
        assert_eq!(parse_amount("about 300k"), 0);
        assert_eq!(parse_amount("1.2.3"), 0);
        assert_eq!(parse_amount(""), 0);
    }

    #[test]
    fn numeric_inputs_never_fail() {
        assert_eq!(NumericInput::Integer(-5).to_amount(), 0);
        assert_eq!(NumericInput::Decimal(f64::NAN).to_amount(), 0);
        assert_eq!(NumericInput::Decimal(180_000.9).to_amount(), 180_000);
        assert_eq!(NumericInput::Integer(200_000).to_amount(), 200_000);
    }

    #[test]
    fn missing_name_is_reported_by_field() {
        let mut raw = submission();
        raw.name = Some("   ".to_string());
        assert_eq!(
            IntakeValidator::multi_tenant().validate(raw),
            Err(IntakeError::MissingRequiredField { field: "name" })
        );
    }

    #[test]
    fn missing_and_malformed_email_are_rejected() {
        let mut raw = submission();
        raw.email = None;
        assert_eq!(
            IntakeValidator::multi_tenant().validate(raw),
            Err(IntakeError::MissingRequiredField { field: "email" })
        );

        for bad in ["jean.dupont", "@d.fr", "j@d", "j@.fr", "j@d.", "j@@d.fr", "j d@d.fr"] {
            let mut raw = submission();
            raw.email = Some(bad.to_string());
            assert_eq!(
                IntakeValidator::multi_tenant().validate(raw),
                Err(IntakeError::MissingRequiredField { field: "email" }),
                "{bad}"
            );
        }
    }

    #[test]
    fn multi_tenant_intake_requires_agency() {
        let mut raw = submission();
        raw.agency_id = Some(" ".to_string());
        assert_eq!(
            IntakeValidator::multi_tenant().validate(raw),
            Err(IntakeError::TenantRequired)
        );
    }

    #[test]
    fn single_tenant_intake_falls_back_to_default_agency() {
        let agency = AgencyId::new();
        let mut raw = submission();
        raw.agency_id = None;
        let lead = IntakeValidator::single_tenant(agency)
            .validate(raw)
            .expect("default agency applies");
        assert_eq!(lead.agency_id, agency);
    }

    #[test]
    fn rejects_malformed_agency_identifier() {
        let mut raw = submission();
        raw.agency_id = Some("agency-42".to_string());
        assert_eq!(
            IntakeValidator::multi_tenant().validate(raw),
            Err(IntakeError::InvalidAgencyId {
                value: "agency-42".to_string()
            })
        );
    }

    #[test]
    fn accepts_french_aliases() {
        let payload = serde_json::json!({
            "nom_client": "Claire Martin",
            "email_client": "claire@agence.fr",
            "telephone": "07 00 00 00 00",
            "adresse_bien_interesse": "12 rue de Rivoli, Paris",
            "prix": 420000,
            "type_bien": "Appartement",
            "pieces": "3",
            "surface": "68 m2",
            "agencyId": "6f1c2c8e-52a4-4a4b-9a57-0d0a4f1f9c11"
        });
        let raw: RawLeadSubmission = serde_json::from_value(payload).expect("aliases decode");
        let lead = IntakeValidator::multi_tenant()
            .validate(raw)
            .expect("valid submission");
        assert_eq!(lead.contact.name, "Claire Martin");
        assert_eq!(lead.interest.budget, 420_000);
        assert_eq!(lead.interest.rooms, Some(3));
        assert_eq!(lead.interest.surface, None);
        assert_eq!(lead.interest.property_type.as_deref(), Some("Appartement"));
    }
}
