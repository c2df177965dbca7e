use log::debug;

use crate::error::ApiError;
use crate::io_struct::{FeatureRecord, PredictResponse};
use crate::model::ModelHandle;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictionResult {
    pub label: String,
}

impl From<PredictionResult> for PredictResponse {
    fn from(result: PredictionResult) -> Self {
        PredictResponse {
            success: true,
            prediction: result.label,
        }
    }
}

/// Runs the model on a single validated row. The predictor must return
/// exactly one label; prediction is deterministic, so failures are never
/// retried.
pub fn dispatch(model: &ModelHandle, record: &FeatureRecord) -> Result<PredictionResult, ApiError> {
    let predictor = model.predictor().ok_or(ApiError::ModelUnavailable)?;

    let mut labels = predictor
        .predict(std::slice::from_ref(record))
        .map_err(|e| ApiError::PredictionFailed {
            details: e.to_string(),
        })?;

    match labels.len() {
        1 => {
            let label = labels.swap_remove(0);
            debug!("Predicted {:?} for {:?}", label, record);
            Ok(PredictionResult { label })
        }
        0 => Err(ApiError::PredictionFailed {
            details: "model returned no prediction".to_string(),
        }),
        n => Err(ApiError::PredictionFailed {
            details: format!("model returned {} predictions for a single row", n),
        }),
    }
}
