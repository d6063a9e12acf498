use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::forms::{parse_score, FormFields};

/// The seven scored subjects, in the canonical order used by the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Subject {
    Math,
    History,
    Physics,
    Chemistry,
    Biology,
    English,
    Geography,
}

impl Subject {
    pub const ALL: [Subject; 7] = [
        Subject::Math,
        Subject::History,
        Subject::Physics,
        Subject::Chemistry,
        Subject::Biology,
        Subject::English,
        Subject::Geography,
    ];

    /// Column name in `subjects`, also the value submitted by the predict form.
    pub fn column(self) -> &'static str {
        match self {
            Subject::Math => "math_score",
            Subject::History => "history_score",
            Subject::Physics => "physics_score",
            Subject::Chemistry => "chemistry_score",
            Subject::Biology => "biology_score",
            Subject::English => "english_score",
            Subject::Geography => "geography_score",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Subject::Math => "Math",
            Subject::History => "History",
            Subject::Physics => "Physics",
            Subject::Chemistry => "Chemistry",
            Subject::Biology => "Biology",
            Subject::English => "English",
            Subject::Geography => "Geography",
        }
    }

    pub fn from_column(column: &str) -> Option<Self> {
        Subject::ALL.into_iter().find(|s| s.column() == column)
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

/// A row of `subjects`. The table is owned by the hosted store, so any score
/// cell may come back null.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubjectScores {
    pub id: i64,
    pub student_id: i64,
    #[serde(default)]
    pub math_score: Option<f64>,
    #[serde(default)]
    pub history_score: Option<f64>,
    #[serde(default)]
    pub physics_score: Option<f64>,
    #[serde(default)]
    pub chemistry_score: Option<f64>,
    #[serde(default)]
    pub biology_score: Option<f64>,
    #[serde(default)]
    pub english_score: Option<f64>,
    #[serde(default)]
    pub geography_score: Option<f64>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl SubjectScores {
    pub fn scores(&self) -> [Option<f64>; 7] {
        [
            self.math_score,
            self.history_score,
            self.physics_score,
            self.chemistry_score,
            self.biology_score,
            self.english_score,
            self.geography_score,
        ]
    }

    pub fn score(&self, subject: Subject) -> Option<f64> {
        self.scores()[subject.index()]
    }

    /// Mean over the scores present in the row; `None` when every cell is null.
    pub fn mean(&self) -> Option<f64> {
        let present: Vec<f64> = self.scores().into_iter().flatten().collect();
        if present.is_empty() {
            return None;
        }
        Some(present.iter().sum::<f64>() / present.len() as f64)
    }
}

pub fn mean_of(scores: &[f64; 7]) -> f64 {
    scores.iter().sum::<f64>() / scores.len() as f64
}

/// Insert/update payload for `subjects`; `student_id` is only sent on insert.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SubjectScoresInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_id: Option<i64>,
    pub math_score: f64,
    pub history_score: f64,
    pub physics_score: f64,
    pub chemistry_score: f64,
    pub biology_score: f64,
    pub english_score: f64,
    pub geography_score: f64,
}

impl SubjectScoresInput {
    pub fn for_insert(form: &FormFields) -> Result<Self, AppError> {
        let mut input = Self::for_update(form)?;
        input.student_id = Some(form.parse("student_id")?);
        Ok(input)
    }

    pub fn for_update(form: &FormFields) -> Result<Self, AppError> {
        let mut scores = [0.0; 7];
        for subject in Subject::ALL {
            let key = subject.column();
            scores[subject.index()] = parse_score(key, form.require(key)?)?;
        }
        let [math, history, physics, chemistry, biology, english, geography] = scores;
        Ok(Self {
            student_id: None,
            math_score: math,
            history_score: history,
            physics_score: physics,
            chemistry_score: chemistry,
            biology_score: biology,
            english_score: english,
            geography_score: geography,
        })
    }
}
