use serde::Serialize;

pub const TEMPARATURE: &str = "Temparature";
pub const HUMIDITY: &str = "Humidity";
pub const MOISTURE: &str = "Moisture";
pub const SOIL_TYPE: &str = "Soil Type";
pub const CROP_TYPE: &str = "Crop Type";
pub const NITROGEN: &str = "Nitrogen";
pub const POTASSIUM: &str = "Potassium";
pub const PHOSPHOROUS: &str = "Phosphorous";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Integer,
    Text,
}

impl FieldKind {
    pub fn expected(&self) -> &'static str {
        match self {
            FieldKind::Integer => "an integer",
            FieldKind::Text => "a non-empty string",
        }
    }
}

/// Column names and types in the order the model was trained on.
/// Renaming or reordering these breaks every deployed artifact.
pub const FEATURE_FIELDS: [(&str, FieldKind); 8] = [
    (TEMPARATURE, FieldKind::Integer),
    (HUMIDITY, FieldKind::Integer),
    (MOISTURE, FieldKind::Integer),
    (SOIL_TYPE, FieldKind::Text),
    (CROP_TYPE, FieldKind::Text),
    (NITROGEN, FieldKind::Integer),
    (POTASSIUM, FieldKind::Integer),
    (PHOSPHOROUS, FieldKind::Integer),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeatureValue {
    Int(i64),
    Text(String),
}

/// A fully validated single row of model input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureRecord {
    temparature: i64,
    humidity: i64,
    moisture: i64,
    soil_type: String,
    crop_type: String,
    nitrogen: i64,
    potassium: i64,
    phosphorous: i64,
}

impl FeatureRecord {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        temparature: i64,
        humidity: i64,
        moisture: i64,
        soil_type: String,
        crop_type: String,
        nitrogen: i64,
        potassium: i64,
        phosphorous: i64,
    ) -> Self {
        FeatureRecord {
            temparature,
            humidity,
            moisture,
            soil_type,
            crop_type,
            nitrogen,
            potassium,
            phosphorous,
        }
    }

    pub fn temparature(&self) -> i64 {
        self.temparature
    }

    pub fn humidity(&self) -> i64 {
        self.humidity
    }

    pub fn moisture(&self) -> i64 {
        self.moisture
    }

    pub fn soil_type(&self) -> &str {
        &self.soil_type
    }

    pub fn crop_type(&self) -> &str {
        &self.crop_type
    }

    pub fn nitrogen(&self) -> i64 {
        self.nitrogen
    }

    pub fn potassium(&self) -> i64 {
        self.potassium
    }

    pub fn phosphorous(&self) -> i64 {
        self.phosphorous
    }

    /// Named values in canonical column order.
    pub fn columns(&self) -> [(&'static str, FeatureValue); 8] {
        [
            (TEMPARATURE, FeatureValue::Int(self.temparature)),
            (HUMIDITY, FeatureValue::Int(self.humidity)),
            (MOISTURE, FeatureValue::Int(self.moisture)),
            (SOIL_TYPE, FeatureValue::Text(self.soil_type.clone())),
            (CROP_TYPE, FeatureValue::Text(self.crop_type.clone())),
            (NITROGEN, FeatureValue::Int(self.nitrogen)),
            (POTASSIUM, FeatureValue::Int(self.potassium)),
            (PHOSPHOROUS, FeatureValue::Int(self.phosphorous)),
        ]
    }
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub success: bool,
    pub prediction: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub model_loaded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'static str>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        HealthResponse {
            status: "healthy",
            model_loaded: true,
            message: Some("Fertilizer Prediction API is Running!"),
            error: None,
        }
    }

    pub fn unhealthy() -> Self {
        HealthResponse {
            status: "unhealthy",
            model_loaded: false,
            message: None,
            error: Some("Model not loaded"),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}
