#![allow(dead_code)]

use fertilizer_gateway::model::ModelHandle;
use serde_json::{Value, json};

pub const MODEL_PATH: &str = concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/models/fertilizer_pipeline.json"
);

pub const FIELDS: [&str; 8] = [
    "Temparature",
    "Humidity",
    "Moisture",
    "Soil Type",
    "Crop Type",
    "Nitrogen",
    "Potassium",
    "Phosphorous",
];

pub fn loaded_model() -> ModelHandle {
    let model = ModelHandle::load(MODEL_PATH);
    assert!(model.is_loaded(), "bundled artifact failed to load");
    model
}

pub fn missing_model() -> ModelHandle {
    ModelHandle::load(concat!(env!("CARGO_MANIFEST_DIR"), "/models/does_not_exist.json"))
}

pub fn valid_body() -> Value {
    json!({
        "Temparature": 26,
        "Humidity": 52,
        "Moisture": 38,
        "Soil Type": "Sandy",
        "Crop Type": "Maize",
        "Nitrogen": 37,
        "Potassium": 0,
        "Phosphorous": 0
    })
}

pub fn body_without(fields: &[&str]) -> Value {
    let mut body = valid_body();
    if let Value::Object(map) = &mut body {
        for field in fields {
            map.remove(*field);
        }
    }
    body
}

pub fn body_with(field: &str, value: Value) -> Value {
    let mut body = valid_body();
    body[field] = value;
    body
}

/// Builds the gateway service around a model handle.
macro_rules! init_app {
    ($model:expr, $limit:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::new($model))
                .app_data(actix_web::web::Data::new(
                    fertilizer_gateway::server::BodyLimit($limit),
                ))
                .configure(fertilizer_gateway::server::configure)
                .default_service(actix_web::web::route().to(fertilizer_gateway::server::not_found)),
        )
        .await
    };
    ($model:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::new($model))
                .configure(fertilizer_gateway::server::configure)
                .default_service(actix_web::web::route().to(fertilizer_gateway::server::not_found)),
        )
        .await
    };
}
