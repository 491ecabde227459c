//! Payment gateway domain models.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::company::EntityStatus;

/// A payment gateway owned by a company.
///
/// `pg_partner` identifies the underlying processing partner and is kept
/// as an opaque string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Gateway {
    pub id: i64,
    pub name: String,
    pub company_id: i64,
    pub pg_partner: String,
    pub status: EntityStatus,
}

/// Fields of a gateway as written by create and update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct NewGateway {
    pub name: String,
    pub company_id: i64,
    pub pg_partner: String,
    pub status: EntityStatus,
}

impl NewGateway {
    pub fn with_id(self, id: i64) -> Gateway {
        Gateway {
            id,
            name: self.name,
            company_id: self.company_id,
            pg_partner: self.pg_partner,
            status: self.status,
        }
    }
}

/// Request payload for creating or replacing a gateway.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct GatewayRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub name: String,

    pub company_id: i64,

    #[validate(length(min = 1, max = 255, message = "pg_partner must be 1-255 characters"))]
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub pg_partner: String,

    pub status: Option<EntityStatus>,
}

impl From<GatewayRequest> for NewGateway {
    fn from(request: GatewayRequest) -> Self {
        Self {
            name: request.name.trim().to_string(),
            company_id: request.company_id,
            pg_partner: request.pg_partner,
            status: request.status.unwrap_or_default(),
        }
    }
}

/// Query parameters for listing gateways.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ListGatewaysQuery {
    pub company_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gateway_request_into_new_gateway() {
        let request: GatewayRequest = serde_json::from_str(
            r#"{"name": "Razorpay", "company_id": 1, "pg_partner": "razorpay"}"#,
        )
        .unwrap();
        assert!(request.validate().is_ok());

        let gateway = NewGateway::from(request).with_id(9);
        assert_eq!(gateway.id, 9);
        assert_eq!(gateway.company_id, 1);
        assert_eq!(gateway.pg_partner, "razorpay");
        assert_eq!(gateway.status, EntityStatus::Active);
    }

    #[test]
    fn test_gateway_request_requires_partner() {
        let request = GatewayRequest {
            name: "Payu".to_string(),
            company_id: 1,
            pg_partner: " ".to_string(),
            status: Some(EntityStatus::Inactive),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_gateway_serialization() {
        let gateway = Gateway {
            id: 3,
            name: "Slpe gold travel pure".to_string(),
            company_id: 1,
            pg_partner: "slpe_gold_travel_pure".to_string(),
            status: EntityStatus::Inactive,
        };
        let json = serde_json::to_value(&gateway).unwrap();
        assert_eq!(json["company_id"], 1);
        assert_eq!(json["status"], "inactive");
    }
}
