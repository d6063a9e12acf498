use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::forms::FormFields;

/// Gender as submitted by the forms. The model was trained with Male=0, Female=1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn parse(field: &str, raw: &str) -> Result<Self, AppError> {
        match raw {
            "Male" => Ok(Gender::Male),
            "Female" => Ok(Gender::Female),
            other => Err(AppError::Validation(format!(
                "{field} must be one of Male, Female, got '{other}'"
            ))),
        }
    }

    pub fn code(self) -> f64 {
        match self {
            Gender::Male => 0.0,
            Gender::Female => 1.0,
        }
    }
}

/// A row of `student_data`. Only the key is guaranteed non-null.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
    pub student_id: i64,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Student {
    /// First and last name, whichever are present; falls back to the id.
    pub fn full_name(&self) -> String {
        let parts: Vec<&str> = [&self.first_name, &self.last_name]
            .into_iter()
            .filter_map(|p| p.as_deref().map(str::trim))
            .filter(|p| !p.is_empty())
            .collect();
        if parts.is_empty() {
            format!("Student {}", self.student_id)
        } else {
            parts.join(" ")
        }
    }
}

/// Insert/update payload for `student_data`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StudentInput {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub gender: Gender,
}

impl StudentInput {
    pub fn from_form(form: &FormFields) -> Result<Self, AppError> {
        Ok(Self {
            first_name: form.require_string("first_name")?,
            last_name: form.require_string("last_name")?,
            email: form.require_string("email")?,
            gender: Gender::parse("gender", form.require("gender")?)?,
        })
    }
}
