//! Rate settings: the legal value domain for rate fields.

use serde::{Deserialize, Serialize};
use shared::validation::validate_token_set;
use validator::{Validate, ValidationError};

use super::favorite::ALL_CATEGORIES;
use super::rate::FALLBACK_ISSUER;

/// Singleton settings record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateSettings {
    pub categories: Vec<String>,
    pub card_types: Vec<String>,
    pub card_issuers: Vec<String>,
}

impl Default for RateSettings {
    fn default() -> Self {
        fn owned(values: &[&str]) -> Vec<String> {
            values.iter().map(|v| v.to_string()).collect()
        }

        Self {
            categories: owned(&[
                "education",
                "gold",
                "travel",
                "fastag",
                "utility",
                "non_utility",
                "general",
            ]),
            card_types: owned(&[
                "business",
                "consumer",
                "R",
                "P",
                "C",
                "CC",
                "upi_credit_card",
                "business_visa",
                "Visa",
                "corporate",
                "domestic",
                "upi",
            ]),
            card_issuers: owned(&["HDFC", "ICICI", "SBI", "AXIS", FALLBACK_ISSUER]),
        }
    }
}

/// Request payload replacing the settings record.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSettingsRequest {
    #[validate(custom(function = "validate_categories"))]
    pub categories: Vec<String>,

    #[validate(custom(function = "shared::validation::validate_token_set"))]
    pub card_types: Vec<String>,

    #[validate(custom(function = "validate_card_issuers"))]
    pub card_issuers: Vec<String>,
}

impl From<UpdateSettingsRequest> for RateSettings {
    fn from(request: UpdateSettingsRequest) -> Self {
        Self {
            categories: request.categories,
            card_types: request.card_types,
            card_issuers: request.card_issuers,
        }
    }
}

/// The favorites sentinel cannot double as a real category.
fn validate_categories(categories: &[String]) -> Result<(), ValidationError> {
    validate_token_set(categories)?;
    if categories.iter().any(|c| c == ALL_CATEGORIES) {
        let mut err = ValidationError::new("reserved_category");
        err.message = Some(format!("'{}' is reserved", ALL_CATEGORIES).into());
        return Err(err);
    }
    Ok(())
}

fn validate_card_issuers(issuers: &[String]) -> Result<(), ValidationError> {
    validate_token_set(issuers)?;
    if !issuers.iter().any(|i| i == FALLBACK_ISSUER) {
        let mut err = ValidationError::new("fallback_issuer_missing");
        err.message = Some(format!("cardIssuers must include '{}'", FALLBACK_ISSUER).into());
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = RateSettings::default();
        assert_eq!(settings.categories.len(), 7);
        assert_eq!(settings.card_types.len(), 12);
        assert!(settings.card_issuers.contains(&FALLBACK_ISSUER.to_string()));
    }

    #[test]
    fn test_settings_serialization_uses_camel_case() {
        let json = serde_json::to_value(RateSettings::default()).unwrap();
        assert!(json.get("cardTypes").is_some());
        assert!(json.get("cardIssuers").is_some());
        assert!(json.get("card_types").is_none());
    }

    #[test]
    fn test_update_request_valid() {
        let request: UpdateSettingsRequest = serde_json::from_str(
            r#"{
                "categories": ["education", "travel"],
                "cardTypes": ["CC"],
                "cardIssuers": ["HDFC", "others"]
            }"#,
        )
        .unwrap();
        assert!(request.validate().is_ok());

        let settings = RateSettings::from(request);
        assert_eq!(settings.card_types, vec!["CC".to_string()]);
    }

    #[test]
    fn test_update_request_requires_fallback_issuer() {
        let request = UpdateSettingsRequest {
            categories: vec!["education".to_string()],
            card_types: vec!["CC".to_string()],
            card_issuers: vec!["HDFC".to_string()],
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_update_request_rejects_duplicates_and_sentinel() {
        let request = UpdateSettingsRequest {
            categories: vec![ALL_CATEGORIES.to_string()],
            card_types: vec!["CC".to_string(), "CC".to_string()],
            card_issuers: vec!["others".to_string()],
        };
        let errors = request.validate().unwrap_err();
        assert_eq!(errors.field_errors().len(), 2);
    }

    #[test]
    fn test_update_request_rejects_empty_lists() {
        let request = UpdateSettingsRequest {
            categories: vec![],
            card_types: vec!["CC".to_string()],
            card_issuers: vec!["others".to_string()],
        };
        assert!(request.validate().is_err());
    }
}
