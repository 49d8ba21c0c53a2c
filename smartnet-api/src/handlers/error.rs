use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use shared_types::ErrorResponse;

/// Error returned by every handler; rendered as `{ "ok": false, "error": ... }`
#[derive(Debug)]
pub enum ApiError {
    Validation(String),
    Unauthorized,
    Forbidden(String),
    NotFound(String),
    TooManyRequests { retry_after_secs: u64, message: String },
    Misconfigured(String),
    Internal(String),
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Validation(msg) => write!(f, "{}", msg),
            ApiError::Unauthorized => write!(f, "Unauthorized"),
            ApiError::Forbidden(msg) => write!(f, "{}", msg),
            ApiError::NotFound(msg) => write!(f, "{}", msg),
            ApiError::TooManyRequests { message, .. } => write!(f, "{}", message),
            ApiError::Misconfigured(msg) => write!(f, "{}", msg),
            ApiError::Internal(msg) => write!(f, "{}", msg),
        }
    }
}

impl actix_web::error::ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::TooManyRequests { .. } => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Misconfigured(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut response = HttpResponse::build(self.status_code());
        if let ApiError::TooManyRequests { retry_after_secs, .. } = self {
            response.insert_header(("Retry-After", retry_after_secs.to_string()));
        }
        response.json(ErrorResponse {
            ok: false,
            error: self.to_string(),
        })
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        tracing::error!("Database error: {:#}", err);
        ApiError::Internal("Internal server error".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;
    use actix_web::ResponseError;

    #[actix_web::test]
    async fn test_rate_limited_response_carries_retry_after() {
        let err = ApiError::TooManyRequests {
            retry_after_secs: 60,
            message: "Too many attempts. Try again shortly.".to_string(),
        };
        let response = err.error_response();

        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers().get("Retry-After").unwrap(), "60");

        let body = to_bytes(response.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["ok"], false);
        assert_eq!(json["error"], "Too many attempts. Try again shortly.");
    }

    #[test]
    fn test_internal_errors_hide_details() {
        let err: ApiError = anyhow::anyhow!("disk I/O error at /var/db").into();
        assert_eq!(err.to_string(), "Internal server error");
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
