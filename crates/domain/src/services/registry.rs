//! Domain value registry.
//!
//! Read-only view over [`RateSettings`] answering membership questions for
//! the rate validator. Built once per settings revision and replaced
//! wholesale when the settings change.

use std::collections::HashSet;

use crate::models::{RateSettings, FALLBACK_ISSUER};

/// Legal values for rate categories, card types and card issuers.
#[derive(Debug, Clone, Default)]
pub struct DomainRegistry {
    settings: RateSettings,
    categories: HashSet<String>,
    card_types: HashSet<String>,
    card_issuers: HashSet<String>,
}

impl DomainRegistry {
    pub fn from_settings(settings: RateSettings) -> Self {
        Self {
            categories: settings.categories.iter().cloned().collect(),
            card_types: settings.card_types.iter().cloned().collect(),
            card_issuers: settings.card_issuers.iter().cloned().collect(),
            settings,
        }
    }

    pub fn settings(&self) -> &RateSettings {
        &self.settings
    }

    /// Categories in settings order.
    pub fn categories(&self) -> &[String] {
        &self.settings.categories
    }

    pub fn is_valid_category(&self, value: &str) -> bool {
        self.categories.contains(value)
    }

    pub fn is_valid_card_type(&self, value: &str) -> bool {
        self.card_types.contains(value)
    }

    /// The fallback issuer is legal regardless of the registry contents.
    pub fn is_valid_card_issuer(&self, value: &str) -> bool {
        value == FALLBACK_ISSUER || self.card_issuers.contains(value)
    }
}

impl From<RateSettings> for DomainRegistry {
    fn from(settings: RateSettings) -> Self {
        Self::from_settings(settings)
    }
}
