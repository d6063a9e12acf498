// Career prediction: form → feature vector → scaler → classifier → label.
// Artifacts are loaded once at startup and shared read-only through AppState.

pub mod classifier;
pub mod features;
pub mod handlers;
pub mod labels;
pub mod scaler;

use std::path::Path;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use crate::prediction::classifier::{Classifier, LinearClassifier};
use crate::prediction::features::{FeatureVector, FEATURE_ORDER};
use crate::prediction::labels::career_label;
use crate::prediction::scaler::StandardScaler;

#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("failed to read {artifact} artifact at {path}: {source}")]
    Io {
        artifact: &'static str,
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {artifact} artifact: {source}")]
    Parse {
        artifact: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("{artifact} expects {expected} features, artifact has {actual}")]
    Shape {
        artifact: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("{artifact} was fitted on features [{found}], expected [{expected}]")]
    FeatureOrder {
        artifact: &'static str,
        expected: String,
        found: String,
    },

    #[error("{artifact} artifact is malformed: {detail}")]
    Malformed {
        artifact: &'static str,
        detail: String,
    },

    #[error("decision function produced a non-finite score")]
    NonFinite,
}

pub(crate) fn read_artifact<T: DeserializeOwned>(
    artifact: &'static str,
    path: &Path,
) -> Result<T, InferenceError> {
    let raw = std::fs::read_to_string(path).map_err(|source| InferenceError::Io {
        artifact,
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| InferenceError::Parse { artifact, source })
}

/// Artifacts that record their training columns must match the canonical order.
pub(crate) fn check_feature_names(
    artifact: &'static str,
    names: Option<&[String]>,
) -> Result<(), InferenceError> {
    let Some(names) = names else {
        return Ok(());
    };
    if names.iter().map(String::as_str).eq(FEATURE_ORDER.iter().copied()) {
        return Ok(());
    }
    Err(InferenceError::FeatureOrder {
        artifact,
        expected: FEATURE_ORDER.join(", "),
        found: names.join(", "),
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub class_id: i64,
    pub career: &'static str,
}

/// Scaler + classifier pair, loaded once and shared by every request.
#[derive(Clone)]
pub struct CareerPredictor {
    scaler: StandardScaler,
    classifier: Arc<dyn Classifier>,
}

impl CareerPredictor {
    pub fn new(scaler: StandardScaler, classifier: Arc<dyn Classifier>) -> Self {
        Self { scaler, classifier }
    }

    pub fn load(scaler_path: &Path, model_path: &Path) -> Result<Self, InferenceError> {
        let scaler = StandardScaler::load(scaler_path)?;
        let classifier = LinearClassifier::load(model_path)?;
        Ok(Self::new(scaler, Arc::new(classifier)))
    }

    pub fn describe(&self) -> String {
        self.classifier.describe()
    }

    pub fn predict(&self, features: &FeatureVector) -> Result<Prediction, InferenceError> {
        let scaled = self.scaler.transform(&features.to_array());
        let class_id = self.classifier.predict(&scaled)?;
        Ok(Prediction {
            class_id,
            career: career_label(class_id),
        })
    }
}
