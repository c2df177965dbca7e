//! JSON tree-ensemble artifact.
//!
//! Text columns are ordinal-encoded through the per-feature category lists,
//! every tree votes for a class, and the class with the most votes wins
//! (ties go to the lower class index).

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::io_struct::{FeatureRecord, FeatureValue};
use crate::model::{LoadError, PredictError, Predictor};

pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum TreeNode {
    Leaf {
        class: usize,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
    },
}

impl TreeNode {
    /// Walks to a leaf; `value <= threshold` goes left.
    pub fn evaluate(&self, row: &[f64]) -> Result<usize, PredictError> {
        let mut node = self;
        loop {
            match node {
                TreeNode::Leaf { class } => return Ok(*class),
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    let value = row.get(*feature).ok_or_else(|| {
                        PredictError::Internal(format!(
                            "tree references feature index {} but rows have {} columns",
                            feature,
                            row.len()
                        ))
                    })?;
                    node = if *value <= *threshold { left } else { right };
                }
            }
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TreePipeline {
    format_version: u32,
    /// Column names the model was trained on, in training order.
    features: Vec<String>,
    #[serde(default)]
    categories: HashMap<String, Vec<String>>,
    classes: Vec<String>,
    trees: Vec<TreeNode>,
}

impl TreePipeline {
    pub fn features(&self) -> &[String] {
        &self.features
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }

    pub fn from_path(path: &Path) -> Result<Self, LoadError> {
        let bytes = std::fs::read(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                LoadError::NotFound {
                    path: path.to_path_buf(),
                }
            } else {
                LoadError::Io {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;
        Self::from_slice(&bytes)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, LoadError> {
        let pipeline: TreePipeline = serde_json::from_slice(bytes)?;
        pipeline.validate()?;
        Ok(pipeline)
    }

    fn validate(&self) -> Result<(), LoadError> {
        if self.format_version != FORMAT_VERSION {
            return Err(LoadError::UnsupportedVersion {
                found: self.format_version,
                supported: FORMAT_VERSION,
            });
        }
        if self.features.is_empty() {
            return Err(LoadError::Invalid("no features declared".to_string()));
        }
        if self.classes.is_empty() {
            return Err(LoadError::Invalid("no classes declared".to_string()));
        }
        if self.trees.is_empty() {
            return Err(LoadError::Invalid("no trees declared".to_string()));
        }
        Ok(())
    }

    fn encode(&self, record: &FeatureRecord) -> Result<Vec<f64>, PredictError> {
        let columns = record.columns();
        let names_match = columns.len() == self.features.len()
            && columns
                .iter()
                .zip(self.features.iter())
                .all(|((name, _), expected)| *name == expected.as_str());
        if !names_match {
            return Err(PredictError::SchemaMismatch {
                expected: self.features.clone(),
                actual: columns.iter().map(|(name, _)| name.to_string()).collect(),
            });
        }

        columns
            .into_iter()
            .map(|(name, value)| match value {
                FeatureValue::Int(i) => Ok(i as f64),
                FeatureValue::Text(text) => {
                    let categories = self.categories.get(name).ok_or_else(|| {
                        PredictError::Internal(format!(
                            "no category encoding for feature '{}'",
                            name
                        ))
                    })?;
                    categories
                        .iter()
                        .position(|c| *c == text)
                        .map(|idx| idx as f64)
                        .ok_or_else(|| PredictError::UnknownCategory {
                            feature: name.to_string(),
                            value: text,
                        })
                }
            })
            .collect()
    }

    fn classify(&self, row: &[f64]) -> Result<&str, PredictError> {
        let mut votes = vec![0usize; self.classes.len()];
        for tree in &self.trees {
            let class = tree.evaluate(row)?;
            let slot = votes.get_mut(class).ok_or_else(|| {
                PredictError::Internal(format!(
                    "tree voted for class index {} but only {} classes exist",
                    class,
                    self.classes.len()
                ))
            })?;
            *slot += 1;
        }
        let mut best = 0;
        for (idx, count) in votes.iter().enumerate() {
            if *count > votes[best] {
                best = idx;
            }
        }
        self.classes
            .get(best)
            .map(String::as_str)
            .ok_or_else(|| PredictError::Internal("model declares no classes".to_string()))
    }
}

impl Predictor for TreePipeline {
    fn predict(&self, rows: &[FeatureRecord]) -> Result<Vec<String>, PredictError> {
        rows.iter()
            .map(|record| {
                let row = self.encode(record)?;
                self.classify(&row).map(str::to_string)
            })
            .collect()
    }
}
