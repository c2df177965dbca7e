use actix_web::http::header::CONTENT_TYPE;
use actix_web::{HttpRequest, HttpResponse, HttpServer, get, post, web};
use futures_util::StreamExt;
use log::{error, info, warn};

use crate::config::{DEFAULT_MAX_PAYLOAD_SIZE, GatewayConfig};
use crate::dispatch::dispatch;
use crate::error::{self, ApiError};
use crate::io_struct::{HealthResponse, PredictResponse};
use crate::model::ModelHandle;
use crate::normalize::normalize_body;

#[get("/")]
pub async fn health(model: web::Data<ModelHandle>) -> HttpResponse {
    if model.is_loaded() {
        HttpResponse::Ok().json(HealthResponse::healthy())
    } else {
        HttpResponse::InternalServerError().json(HealthResponse::unhealthy())
    }
}

/// Largest `/predict` body accepted, in bytes.
#[derive(Debug, Clone, Copy)]
pub struct BodyLimit(pub usize);

impl Default for BodyLimit {
    fn default() -> Self {
        BodyLimit(DEFAULT_MAX_PAYLOAD_SIZE)
    }
}

async fn read_body(mut payload: web::Payload, limit: usize) -> Result<web::BytesMut, ApiError> {
    let mut body = web::BytesMut::new();
    while let Some(chunk) = payload.next().await {
        let chunk = chunk.map_err(|e| ApiError::MalformedBody {
            reason: e.to_string(),
        })?;
        if body.len() + chunk.len() > limit {
            warn!("Payload overflow: exceeds limit of {} bytes", limit);
            return Err(ApiError::PayloadTooLarge { limit });
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body)
}

#[post("/predict")]
pub async fn predict(
    req: HttpRequest,
    payload: web::Payload,
    model: web::Data<ModelHandle>,
) -> Result<HttpResponse, ApiError> {
    // An unhealthy gateway answers before touching the body.
    if !model.is_loaded() {
        warn!("Rejecting prediction: model not loaded");
        return Err(ApiError::ModelUnavailable);
    }

    let limit = req
        .app_data::<web::Data<BodyLimit>>()
        .map(|limit| limit.0)
        .unwrap_or_else(|| BodyLimit::default().0);
    let body = read_body(payload, limit).await?;

    let content_type = req
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok());
    let record = normalize_body(content_type, &body).inspect_err(|e| {
        info!("Rejected prediction request: {}", e);
    })?;

    let model = model.into_inner();
    let result = web::block(move || dispatch(&model, &record))
        .await
        .map_err(|e| ApiError::PredictionFailed {
            details: format!("prediction task did not complete: {}", e),
        })?
        .inspect_err(|e| {
            error!("{}: {}", e, e.details().unwrap_or_default());
        })?;

    Ok(HttpResponse::Ok().json(PredictResponse::from(result)))
}

pub async fn not_found(req: HttpRequest) -> HttpResponse {
    error::not_found(format!("No route for {} {}", req.method(), req.path()))
}

/// Registers the gateway routes. The caller supplies the `ModelHandle` as
/// app data.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health).service(predict);
}

pub async fn startup(config: GatewayConfig, model: ModelHandle) -> std::io::Result<()> {
    if let Some(reason) = model.unavailable_reason() {
        warn!("Starting in degraded mode, model unavailable: {}", reason);
    }
    let model = web::Data::new(model);
    let body_limit = web::Data::new(BodyLimit(config.max_payload_size));

    info!("Starting server at {}:{}", config.host, config.port);

    HttpServer::new(move || {
        actix_web::App::new()
            .wrap(actix_web::middleware::Logger::default())
            .app_data(model.clone())
            .app_data(body_limit.clone())
            .configure(configure)
            .default_service(web::route().to(not_found))
    })
    .bind((config.host, config.port))?
    .run()
    .await
}
