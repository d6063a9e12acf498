use std::path::Path;

use serde::Deserialize;

use crate::prediction::features::FEATURE_COUNT;
use crate::prediction::{check_feature_names, read_artifact, InferenceError};

/// JSON export of a fitted standard scaler.
#[derive(Debug, Clone, Deserialize)]
pub struct ScalerArtifact {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
}

/// Per-feature `(x - mean) / scale`.
#[derive(Debug, Clone)]
pub struct StandardScaler {
    mean: [f64; FEATURE_COUNT],
    scale: [f64; FEATURE_COUNT],
}

impl StandardScaler {
    pub fn load(path: &Path) -> Result<Self, InferenceError> {
        Self::from_artifact(read_artifact("scaler", path)?)
    }

    pub fn from_artifact(artifact: ScalerArtifact) -> Result<Self, InferenceError> {
        check_feature_names("scaler", artifact.feature_names.as_deref())?;
        let mean = to_features("scaler mean", artifact.mean)?;
        let mut scale = to_features("scaler scale", artifact.scale)?;
        // Constant features are fitted with a zero scale; they are only centred.
        for s in scale.iter_mut() {
            if *s == 0.0 {
                *s = 1.0;
            }
        }
        Ok(Self { mean, scale })
    }

    pub fn transform(&self, features: &[f64; FEATURE_COUNT]) -> [f64; FEATURE_COUNT] {
        let mut out = [0.0; FEATURE_COUNT];
        for (i, x) in features.iter().enumerate() {
            out[i] = (x - self.mean[i]) / self.scale[i];
        }
        out
    }
}

pub(crate) fn to_features(
    artifact: &'static str,
    values: Vec<f64>,
) -> Result<[f64; FEATURE_COUNT], InferenceError> {
    if values.iter().any(|v| !v.is_finite()) {
        return Err(InferenceError::Malformed {
            artifact,
            detail: "contains non-finite values".to_string(),
        });
    }
    let actual = values.len();
    values.try_into().map_err(|_| InferenceError::Shape {
        artifact,
        expected: FEATURE_COUNT,
        actual,
    })
}
