use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use domain::services::{FeeOverflow, RateRejection, ResolutionError};
use persistence::StoreError;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {message}")]
    Validation {
        message: String,
        details: Vec<ValidationDetail>,
    },

    #[error("Rate rejected: {0}")]
    Rejected(RateRejection),

    #[error("Resolution failed: {0}")]
    Resolution(ResolutionError),

    #[error("Fee not computable: {0}")]
    FeeOverflow(FeeOverflow),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation {
            message: message.into(),
            details: Vec::new(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Validation { .. } => StatusCode::BAD_REQUEST,
            ApiError::Rejected(RateRejection::OverlappingRange(_)) => StatusCode::CONFLICT,
            ApiError::Rejected(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Resolution(ResolutionError::AmbiguousRate(_)) => StatusCode::CONFLICT,
            ApiError::Resolution(_) => StatusCode::NOT_FOUND,
            ApiError::FeeOverflow(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Vec<ValidationDetail>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    rate_ids: Option<Vec<i64>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidationDetail {
    pub field: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            ApiError::NotFound(message) => ErrorBody {
                error: "not_found".into(),
                message,
                details: None,
                rate_ids: None,
            },
            ApiError::Validation { message, details } => ErrorBody {
                error: "validation_error".into(),
                message,
                details: (!details.is_empty()).then_some(details),
                rate_ids: None,
            },
            ApiError::Rejected(rejection) => ErrorBody {
                error: rejection.code().into(),
                message: rejection.to_string(),
                details: None,
                rate_ids: match rejection {
                    RateRejection::OverlappingRange(id) => Some(vec![id]),
                    _ => None,
                },
            },
            ApiError::Resolution(failure) => ErrorBody {
                error: failure.code().into(),
                message: failure.to_string(),
                details: None,
                rate_ids: match failure {
                    ResolutionError::AmbiguousRate(ids) => Some(ids),
                    _ => None,
                },
            },
            ApiError::FeeOverflow(overflow) => ErrorBody {
                error: "fee_overflow".into(),
                message: overflow.to_string(),
                details: None,
                rate_ids: Some(vec![overflow.rate_id]),
            },
            ApiError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                ErrorBody {
                    error: "internal_error".into(),
                    message: "An internal error occurred".into(),
                    details: None,
                    rate_ids: None,
                }
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<RateRejection> for ApiError {
    fn from(rejection: RateRejection) -> Self {
        ApiError::Rejected(rejection)
    }
}

impl From<ResolutionError> for ApiError {
    fn from(failure: ResolutionError) -> Self {
        ApiError::Resolution(failure)
    }
}

impl From<FeeOverflow> for ApiError {
    fn from(overflow: FeeOverflow) -> Self {
        ApiError::FeeOverflow(overflow)
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Rejected(rejection) => ApiError::Rejected(rejection),
            StoreError::NotFound(what) => ApiError::NotFound(format!("{} not found", what)),
            StoreError::MissingReference(what) => {
                ApiError::NotFound(format!("Referenced {} not found", what))
            }
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut details: Vec<ValidationDetail> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |e| ValidationDetail {
                    field: field.to_string(),
                    message: e
                        .message
                        .clone()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string()),
                })
            })
            .collect();
        details.sort_by(|a, b| a.field.cmp(&b.field));

        let message = if details.len() == 1 {
            format!("{}: {}", details[0].field, details[0].message)
        } else {
            format!("{} validation errors", details.len())
        };

        ApiError::Validation { message, details }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::services::RateField;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_rejection_status_codes() {
        assert_eq!(
            ApiError::from(RateRejection::OverlappingRange(3)).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::from(RateRejection::InvalidRange).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ApiError::from(RateRejection::UnknownGateway(7)).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ApiError::from(RateRejection::InvalidDomainValue {
                field: RateField::Category,
                value: "crypto".to_string(),
            })
            .status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn test_resolution_status_codes() {
        assert_eq!(
            ApiError::from(ResolutionError::UnknownGateway(7)).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(ResolutionError::NoApplicableRate).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(ResolutionError::AmbiguousRate(vec![1, 2])).status(),
            StatusCode::CONFLICT
        );
    }

    #[tokio::test]
    async fn test_overlap_body_carries_rate_id() {
        let response = ApiError::from(RateRejection::OverlappingRange(12)).into_response();
        let body = body_json(response).await;

        assert_eq!(body["error"], "overlapping_range");
        assert_eq!(body["rate_ids"], serde_json::json!([12]));
        assert!(body.get("details").is_none());
    }

    #[tokio::test]
    async fn test_ambiguous_body_lists_rates() {
        let response = ApiError::from(ResolutionError::AmbiguousRate(vec![4, 9])).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let body = body_json(response).await;
        assert_eq!(body["error"], "ambiguous_rate");
        assert_eq!(body["rate_ids"], serde_json::json!([4, 9]));
    }

    #[tokio::test]
    async fn test_fee_overflow_is_unprocessable() {
        let response = ApiError::from(FeeOverflow {
            rate_id: 5,
            amount: rust_decimal::Decimal::MAX,
        })
        .into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body = body_json(response).await;
        assert_eq!(body["error"], "fee_overflow");
        assert_eq!(body["rate_ids"], serde_json::json!([5]));
    }

    #[tokio::test]
    async fn test_internal_error_hides_details() {
        let response =
            ApiError::from(StoreError::Io(std::io::Error::other("disk full"))).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["error"], "internal_error");
        assert_eq!(body["message"], "An internal error occurred");
    }

    #[test]
    fn test_store_error_mapping() {
        assert!(matches!(
            ApiError::from(StoreError::NotFound("rate")),
            ApiError::NotFound(msg) if msg == "rate not found"
        ));
        assert!(matches!(
            ApiError::from(StoreError::MissingReference("company")),
            ApiError::NotFound(_)
        ));
        assert!(matches!(
            ApiError::from(StoreError::Rejected(RateRejection::InvalidRange)),
            ApiError::Rejected(RateRejection::InvalidRange)
        ));
    }

    #[test]
    fn test_validation_display() {
        assert_eq!(
            ApiError::validation("bad input").to_string(),
            "Validation error: bad input"
        );
        assert_eq!(
            ApiError::validation("bad input").status(),
            StatusCode::BAD_REQUEST
        );
    }
}
