//! Classifier backends. The rest of the service only sees the `Classifier`
//! trait, carried in `AppState` behind an `Arc<dyn Classifier>`.

use std::path::Path;

use serde::Deserialize;

use crate::prediction::features::FEATURE_COUNT;
use crate::prediction::scaler::to_features;
use crate::prediction::{check_feature_names, read_artifact, InferenceError};

/// `predict(scaled_features) -> class id`.
pub trait Classifier: Send + Sync {
    fn predict(&self, features: &[f64; FEATURE_COUNT]) -> Result<i64, InferenceError>;

    /// Short description for startup logs.
    fn describe(&self) -> String;
}

/// JSON export of a fitted linear classifier (one-vs-rest or multinomial).
#[derive(Debug, Clone, Deserialize)]
pub struct LinearArtifact {
    pub classes: Vec<i64>,
    pub coef: Vec<Vec<f64>>,
    pub intercept: Vec<f64>,
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
}

/// Linear decision function: `score_k = coef_k · x + intercept_k`.
#[derive(Debug, Clone)]
pub struct LinearClassifier {
    classes: Vec<i64>,
    coef: Vec<[f64; FEATURE_COUNT]>,
    intercept: Vec<f64>,
}

impl LinearClassifier {
    pub fn load(path: &Path) -> Result<Self, InferenceError> {
        Self::from_artifact(read_artifact("classifier", path)?)
    }

    pub fn from_artifact(artifact: LinearArtifact) -> Result<Self, InferenceError> {
        check_feature_names("classifier", artifact.feature_names.as_deref())?;

        let LinearArtifact {
            classes,
            coef,
            intercept,
            ..
        } = artifact;

        if classes.len() < 2 {
            return Err(malformed(format!(
                "needs at least 2 classes, found {}",
                classes.len()
            )));
        }
        // Binary models carry a single decision row for classes[1].
        let expected_rows = if classes.len() == 2 { 1 } else { classes.len() };
        if coef.len() != expected_rows && coef.len() != classes.len() {
            return Err(malformed(format!(
                "{} classes but {} coefficient rows",
                classes.len(),
                coef.len()
            )));
        }
        if intercept.len() != coef.len() {
            return Err(malformed(format!(
                "{} coefficient rows but {} intercepts",
                coef.len(),
                intercept.len()
            )));
        }
        if intercept.iter().any(|v| !v.is_finite()) {
            return Err(malformed("intercept contains non-finite values".to_string()));
        }

        let coef = coef
            .into_iter()
            .map(|row| to_features("classifier coef", row))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            classes,
            coef,
            intercept,
        })
    }

    pub fn decision_function(&self, features: &[f64; FEATURE_COUNT]) -> Vec<f64> {
        self.coef
            .iter()
            .zip(&self.intercept)
            .map(|(row, b)| row.iter().zip(features).map(|(w, x)| w * x).sum::<f64>() + b)
            .collect()
    }
}

impl Classifier for LinearClassifier {
    fn predict(&self, features: &[f64; FEATURE_COUNT]) -> Result<i64, InferenceError> {
        let scores = self.decision_function(features);
        if scores.iter().any(|s| !s.is_finite()) {
            return Err(InferenceError::NonFinite);
        }

        if scores.len() == 1 {
            let idx = usize::from(scores[0] > 0.0);
            return Ok(self.classes[idx]);
        }

        // First maximum wins on ties.
        let mut best = 0;
        for (i, s) in scores.iter().enumerate().skip(1) {
            if *s > scores[best] {
                best = i;
            }
        }
        Ok(self.classes[best])
    }

    fn describe(&self) -> String {
        format!(
            "linear ({} classes, {} decision rows)",
            self.classes.len(),
            self.coef.len()
        )
    }
}

fn malformed(detail: String) -> InferenceError {
    InferenceError::Malformed {
        artifact: "classifier",
        detail,
    }
}
