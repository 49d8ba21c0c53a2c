use actix_web::{web, HttpResponse};
use funnel_core::{compute_estimate, to_snapshot};
use serde::Serialize;
use shared_types::{EstimateInput, EstimateResult, EstimateSnapshot};

use crate::handlers::error::ApiError;

const MAX_SQUARE_FOOTAGE: u32 = 1_000_000;

/// Priced result plus the snapshot the client sends back with a booking or magic link
#[derive(Serialize)]
struct EstimateResponse {
    #[serde(flatten)]
    result: EstimateResult,
    snapshot: EstimateSnapshot,
}

/// `POST /api/estimate`: price an estimator wizard submission
pub async fn compute(request: web::Json<EstimateInput>) -> Result<HttpResponse, ApiError> {
    let input = request.into_inner();

    if input.square_footage == 0 || input.square_footage > MAX_SQUARE_FOOTAGE {
        return Err(ApiError::Validation(format!(
            "squareFootage must be between 1 and {}",
            MAX_SQUARE_FOOTAGE
        )));
    }

    let result = compute_estimate(&input);
    tracing::debug!(
        "Estimate for {:?} at {} sq ft: ${}-${}",
        input.project_type,
        input.square_footage,
        result.price_low,
        result.price_high
    );

    Ok(HttpResponse::Ok().json(EstimateResponse {
        snapshot: to_snapshot(&result),
        result,
    }))
}

#[cfg(test)]
mod tests {
    use crate::handlers::test_support::{context, test_app};
    use actix_web::http::StatusCode;
    use actix_web::test;

    #[actix_web::test]
    async fn test_estimate_uses_wizard_defaults() {
        let ctx = context();
        let app = test_app!(ctx);

        let req = test::TestRequest::post()
            .uri("/api/estimate")
            .set_json(serde_json::json!({}))
            .to_request();
        let json: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        // home 1.8 + cameras 0.25 + wifi 0.15 = 2.2/sq ft over 1800 sq ft
        assert_eq!(json["priceLow"], 3366);
        assert_eq!(json["priceHigh"], 4356);
        assert_eq!(json["estCameras"], 3);
        assert_eq!(json["estAps"], 1);
        assert_eq!(json["snapshot"]["roughLow"], 3366.0);
        assert_eq!(json["snapshot"]["projectType"], "home");
    }

    #[actix_web::test]
    async fn test_rejects_zero_square_footage() {
        let ctx = context();
        let app = test_app!(ctx);

        let req = test::TestRequest::post()
            .uri("/api/estimate")
            .set_json(serde_json::json!({ "squareFootage": 0 }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
