//! Feature assembly: turns a predict-form submission into the 13-field vector
//! the scaler and classifier were fitted on.
//!
//! The form carries fixed fields plus up to seven numbered
//! `subject_{i}_name` / `subject_{i}_score` rows. Rows are parsed into a
//! bounded list of `(Subject, score)` pairs here, at the boundary, so the
//! assembler itself is a pure function with no failure modes.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::errors::AppError;
use crate::forms::{parse_score, FormFields};
use crate::models::subjects::mean_of;
use crate::models::{Flag, Gender, Subject};

pub const FEATURE_COUNT: usize = 13;

/// Canonical feature order. Artifacts must have been fitted on exactly this order.
pub const FEATURE_ORDER: [&str; FEATURE_COUNT] = [
    "gender",
    "math_score",
    "history_score",
    "physics_score",
    "chemistry_score",
    "biology_score",
    "english_score",
    "geography_score",
    "absence_days",
    "part_time_job",
    "extracurricular_activities",
    "weekly_self_study_hours",
    "average_score",
];

/// Highest `subject_{i}_*` row index the form may submit.
pub const MAX_SUBJECT_ROWS: usize = Subject::ALL.len();

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubjectEntry {
    pub subject: Subject,
    pub score: f64,
}

/// Validated predict-form submission.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionInput {
    pub gender: Gender,
    pub absence_days: u32,
    pub part_time_job: Flag,
    pub extracurricular_activities: Flag,
    pub weekly_self_study_hours: u32,
    pub subjects: Vec<SubjectEntry>,
}

impl PredictionInput {
    pub fn from_form(form: &FormFields) -> Result<Self, AppError> {
        Ok(Self {
            gender: Gender::parse("gender", form.require("gender")?)?,
            absence_days: form.parse("absence_days")?,
            part_time_job: Flag::parse("part_time_job", form.require("part_time_job")?)?,
            extracurricular_activities: Flag::parse(
                "extracurricular_activities",
                form.require("extracurricular_activities")?,
            )?,
            weekly_self_study_hours: form.parse("weekly_self_study_hours")?,
            subjects: parse_subject_rows(form)?,
        })
    }
}

#[derive(Default)]
struct RawRow<'a> {
    name: Option<&'a str>,
    score: Option<&'a str>,
}

fn parse_subject_rows(form: &FormFields) -> Result<Vec<SubjectEntry>, AppError> {
    let mut rows: BTreeMap<usize, RawRow<'_>> = BTreeMap::new();

    for (key, value) in form.pairs() {
        let Some(rest) = key.strip_prefix("subject_") else {
            continue;
        };
        let (index, is_name) = if let Some(idx) = rest.strip_suffix("_name") {
            (idx, true)
        } else if let Some(idx) = rest.strip_suffix("_score") {
            (idx, false)
        } else {
            continue;
        };
        let index: usize = index
            .parse()
            .map_err(|_| AppError::Validation(format!("{key} is not a valid subject field")))?;
        if index == 0 || index > MAX_SUBJECT_ROWS {
            return Err(AppError::Validation(format!(
                "{key}: at most {MAX_SUBJECT_ROWS} subject rows may be submitted"
            )));
        }
        let row = rows.entry(index).or_default();
        if is_name {
            row.name = Some(value.trim());
        } else {
            row.score = Some(value.trim());
        }
    }

    let mut entries: Vec<SubjectEntry> = Vec::with_capacity(rows.len());
    for (index, row) in rows {
        let name = row.name.unwrap_or("");
        let blank_score = row.score.map_or(true, str::is_empty);
        if name.is_empty() {
            if blank_score {
                continue;
            }
            return Err(AppError::Validation(format!(
                "subject_{index}_name is required when a score is given"
            )));
        }

        let subject = Subject::from_column(name).ok_or_else(|| {
            AppError::Validation(format!(
                "subject_{index}_name '{name}' is not a recognised subject"
            ))
        })?;
        if entries.iter().any(|e| e.subject == subject) {
            return Err(AppError::Validation(format!(
                "{name} was submitted more than once"
            )));
        }

        let score = match row.score {
            None => 0.0,
            Some(raw) => parse_score(&format!("subject_{index}_score"), raw)?,
        };
        entries.push(SubjectEntry { subject, score });
    }

    Ok(entries)
}

/// The 13 model inputs, named, in canonical order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureVector {
    pub gender: f64,
    pub math_score: f64,
    pub history_score: f64,
    pub physics_score: f64,
    pub chemistry_score: f64,
    pub biology_score: f64,
    pub english_score: f64,
    pub geography_score: f64,
    pub absence_days: f64,
    pub part_time_job: f64,
    pub extracurricular_activities: f64,
    pub weekly_self_study_hours: f64,
    pub average_score: f64,
}

impl FeatureVector {
    pub fn to_array(&self) -> [f64; FEATURE_COUNT] {
        [
            self.gender,
            self.math_score,
            self.history_score,
            self.physics_score,
            self.chemistry_score,
            self.biology_score,
            self.english_score,
            self.geography_score,
            self.absence_days,
            self.part_time_job,
            self.extracurricular_activities,
            self.weekly_self_study_hours,
            self.average_score,
        ]
    }
}

/// Assembles the feature vector. Subjects not submitted score 0.0 and still
/// count towards the seven-subject average.
pub fn assemble(input: &PredictionInput) -> FeatureVector {
    let mut scores = [0.0; 7];
    for entry in &input.subjects {
        scores[entry.subject.index()] = entry.score;
    }
    let average_score = mean_of(&scores);
    let [math, history, physics, chemistry, biology, english, geography] = scores;

    FeatureVector {
        gender: input.gender.code(),
        math_score: math,
        history_score: history,
        physics_score: physics,
        chemistry_score: chemistry,
        biology_score: biology,
        english_score: english,
        geography_score: geography,
        absence_days: f64::from(input.absence_days),
        part_time_job: f64::from(input.part_time_job.code()),
        extracurricular_activities: f64::from(input.extracurricular_activities.code()),
        weekly_self_study_hours: f64::from(input.weekly_self_study_hours),
        average_score,
    }
}
