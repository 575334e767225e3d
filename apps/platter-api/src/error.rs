//! # API Error Type
//!
//! Every failed request gets a status code and the same JSON body:
//!
//! ```json
//! {
//!   "code": "CROSS_RESTAURANT_CONFLICT",
//!   "message": "Cart already holds items from restaurant r1; ..."
//! }
//! ```
//!
//! | Kind                        | Status |
//! |-----------------------------|--------|
//! | `NOT_FOUND`                 | 404    |
//! | `VALIDATION_ERROR`          | 400    |
//! | `CROSS_RESTAURANT_CONFLICT` | 409    |
//! | `EMPTY_CART`                | 400    |
//! | `FORBIDDEN`                 | 403    |
//! | `AGGREGATION_ERROR`         | 500    |
//! | `STORE_UNAVAILABLE`         | 503    |
//! | `CONFLICT`                  | 409    |
//! | `UNAUTHORIZED`              | 401    |

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use platter_engine::{EngineError, ErrorKind};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

/// Error returned from route handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    BadRequest(String),
}

impl ApiError {
    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Engine(err) => status_for(err.kind()),
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    pub fn body(&self) -> ErrorBody {
        match self {
            ApiError::Engine(err) => ErrorBody {
                code: err.kind().code().to_string(),
                message: err.message().to_string(),
            },
            ApiError::Unauthorized(message) => ErrorBody {
                code: "UNAUTHORIZED".to_string(),
                message: message.clone(),
            },
            ApiError::BadRequest(message) => ErrorBody {
                code: ErrorKind::ValidationError.code().to_string(),
                message: message.clone(),
            },
        }
    }
}

pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::ValidationError => StatusCode::BAD_REQUEST,
        ErrorKind::CrossRestaurantConflict => StatusCode::CONFLICT,
        ErrorKind::EmptyCart => StatusCode::BAD_REQUEST,
        ErrorKind::Forbidden => StatusCode::FORBIDDEN,
        ErrorKind::AggregationError => StatusCode::INTERNAL_SERVER_ERROR,
        ErrorKind::StoreUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorKind::Conflict => StatusCode::CONFLICT,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.body())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ErrorKind::NotFound, 404),
            (ErrorKind::ValidationError, 400),
            (ErrorKind::CrossRestaurantConflict, 409),
            (ErrorKind::EmptyCart, 400),
            (ErrorKind::Forbidden, 403),
            (ErrorKind::AggregationError, 500),
            (ErrorKind::StoreUnavailable, 503),
            (ErrorKind::Conflict, 409),
        ];
        for (kind, status) in cases {
            let err = ApiError::from(EngineError::new(kind, "x"));
            assert_eq!(err.status().as_u16(), status, "{kind}");
        }
        assert_eq!(ApiError::unauthorized("no token").status().as_u16(), 401);
    }

    #[test]
    fn test_envelope() {
        let err = ApiError::from(EngineError::new(ErrorKind::EmptyCart, "Cart is empty"));
        assert_eq!(
            err.body(),
            ErrorBody {
                code: "EMPTY_CART".to_string(),
                message: "Cart is empty".to_string(),
            }
        );

        let body = ApiError::unauthorized("Missing bearer token").body();
        assert_eq!(body.code, "UNAUTHORIZED");
    }
}
