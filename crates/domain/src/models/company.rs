//! Company domain models.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

/// Lifecycle status shared by companies and gateways.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityStatus {
    #[default]
    Active,
    Inactive,
}

impl EntityStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityStatus::Active => "active",
            EntityStatus::Inactive => "inactive",
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, EntityStatus::Active)
    }
}

impl FromStr for EntityStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(EntityStatus::Active),
            "inactive" => Ok(EntityStatus::Inactive),
            _ => Err(format!("Unknown status: {}", s)),
        }
    }
}

impl fmt::Display for EntityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A company owning zero or more payment gateways.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Company {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub status: EntityStatus,
}

/// Fields of a company as written by create and update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct NewCompany {
    pub name: String,
    pub description: String,
    pub status: EntityStatus,
}

impl NewCompany {
    pub fn with_id(self, id: i64) -> Company {
        Company {
            id,
            name: self.name,
            description: self.description,
            status: self.status,
        }
    }
}

/// Request payload for creating or replacing a company.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CompanyRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub name: String,

    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: Option<String>,

    pub status: Option<EntityStatus>,
}

impl From<CompanyRequest> for NewCompany {
    fn from(request: CompanyRequest) -> Self {
        Self {
            name: request.name.trim().to_string(),
            description: request.description.unwrap_or_default(),
            status: request.status.unwrap_or_default(),
        }
    }
}
