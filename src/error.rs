use actix_web::{HttpResponse, ResponseError, http::StatusCode};

use crate::io_struct::ErrorResponse;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidField {
    pub field: String,
    pub value: String,
    pub expected: &'static str,
}

impl std::fmt::Display for InvalidField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: expected {}, got {}", self.field, self.expected, self.value)
    }
}

/// Every way a prediction request can fail. Converted into a JSON body at
/// the HTTP boundary; nothing below the handler builds responses itself.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("Model not loaded")]
    ModelUnavailable,

    #[error("Missing required fields: {}", .fields.join(", "))]
    MissingFields { fields: Vec<String> },

    #[error("Invalid value for fields: {}", join_field_names(.fields))]
    InvalidType { fields: Vec<InvalidField> },

    #[error("Malformed request body: {reason}")]
    MalformedBody { reason: String },

    #[error("Payload exceeds limit of {limit} bytes")]
    PayloadTooLarge { limit: usize },

    #[error("Prediction failed")]
    PredictionFailed { details: String },
}

fn join_field_names(fields: &[InvalidField]) -> String {
    fields
        .iter()
        .map(|f| f.field.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

impl ApiError {
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::ModelUnavailable => "model_unavailable",
            ApiError::MissingFields { .. } => "missing_fields",
            ApiError::InvalidType { .. } => "invalid_type",
            ApiError::MalformedBody { .. } => "malformed_body",
            ApiError::PayloadTooLarge { .. } => "payload_too_large",
            ApiError::PredictionFailed { .. } => "prediction_failed",
        }
    }

    /// Names of the request fields this error is about, if any.
    pub fn fields(&self) -> Vec<String> {
        match self {
            ApiError::MissingFields { fields } => fields.clone(),
            ApiError::InvalidType { fields } => fields.iter().map(|f| f.field.clone()).collect(),
            _ => Vec::new(),
        }
    }

    pub fn details(&self) -> Option<String> {
        match self {
            ApiError::InvalidType { fields } => Some(
                fields
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("; "),
            ),
            ApiError::PredictionFailed { details } => Some(details.clone()),
            _ => None,
        }
    }

    pub fn to_body(&self) -> ErrorResponse {
        ErrorResponse {
            success: false,
            error: self.to_string(),
            kind: self.kind(),
            fields: self.fields(),
            details: self.details(),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingFields { .. }
            | ApiError::InvalidType { .. }
            | ApiError::MalformedBody { .. } => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::ModelUnavailable | ApiError::PredictionFailed { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(self.to_body())
    }
}

/// Error body for failures that happen outside the prediction pipeline,
/// such as unknown routes.
pub fn create_error(
    status: StatusCode,
    kind: &'static str,
    message: impl Into<String>,
) -> HttpResponse {
    HttpResponse::build(status).json(ErrorResponse {
        success: false,
        error: message.into(),
        kind,
        fields: Vec::new(),
        details: None,
    })
}

pub fn not_found(message: impl Into<String>) -> HttpResponse {
    create_error(StatusCode::NOT_FOUND, "not_found", message)
}
