use chrono::{DateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::AppError;
use crate::forms::FormFields;

/// A Yes/No form answer, persisted and fed to the model as 0/1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flag {
    No,
    Yes,
}

impl Flag {
    pub fn parse(field: &str, raw: &str) -> Result<Self, AppError> {
        match raw {
            "No" => Ok(Flag::No),
            "Yes" => Ok(Flag::Yes),
            other => Err(AppError::Validation(format!(
                "{field} must be one of No, Yes, got '{other}'"
            ))),
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Flag::No => 0,
            Flag::Yes => 1,
        }
    }
}

impl Serialize for Flag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

// Older rows were written with the raw "Yes"/"No" text, and boolean columns
// come back as JSON booleans; all of them read as the same flag.
impl<'de> Deserialize<'de> for Flag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Bool(bool),
            Int(i64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Bool(b) => Ok(if b { Flag::Yes } else { Flag::No }),
            Raw::Int(0) => Ok(Flag::No),
            Raw::Int(1) => Ok(Flag::Yes),
            Raw::Int(n) => Err(de::Error::custom(format!("invalid flag value {n}"))),
            Raw::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
                "no" | "0" | "false" => Ok(Flag::No),
                "yes" | "1" | "true" => Ok(Flag::Yes),
                _ => Err(de::Error::custom(format!("invalid flag value '{s}'"))),
            },
        }
    }
}

/// A row of `academic_info`. Everything but the two ids may be null.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcademicRecord {
    pub record_id: i64,
    pub student_id: i64,
    #[serde(default)]
    pub absence_days: Option<i64>,
    #[serde(default)]
    pub part_time_job: Option<Flag>,
    #[serde(default)]
    pub extracurricular_activities: Option<Flag>,
    #[serde(default)]
    pub weekly_self_study_hours: Option<i64>,
    #[serde(default)]
    pub career_aspiration: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Insert/update payload for `academic_info`. Flags are always written as 0/1,
/// for inserts and updates alike; `student_id` is only sent on insert.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AcademicInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_id: Option<i64>,
    pub absence_days: u32,
    pub part_time_job: Flag,
    pub extracurricular_activities: Flag,
    pub weekly_self_study_hours: u32,
    pub career_aspiration: String,
}

impl AcademicInput {
    pub fn for_insert(form: &FormFields) -> Result<Self, AppError> {
        let mut input = Self::for_update(form)?;
        input.student_id = Some(form.parse("student_id")?);
        Ok(input)
    }

    pub fn for_update(form: &FormFields) -> Result<Self, AppError> {
        Ok(Self {
            student_id: None,
            absence_days: form.parse("absence_days")?,
            part_time_job: Flag::parse("part_time_job", form.require("part_time_job")?)?,
            extracurricular_activities: Flag::parse(
                "extracurricular_activities",
                form.require("extracurricular_activities")?,
            )?,
            weekly_self_study_hours: form.parse("weekly_self_study_hours")?,
            career_aspiration: form.require_string("career_aspiration")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn form(pairs: &[(&str, &str)]) -> FormFields {
        FormFields::new(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    fn academic_form(with_student: bool) -> FormFields {
        let mut pairs = vec![
            ("absence_days", "2"),
            ("part_time_job", "Yes"),
            ("extracurricular_activities", "No"),
            ("weekly_self_study_hours", "12"),
            ("career_aspiration", "Doctor"),
        ];
        if with_student {
            pairs.push(("student_id", "41"));
        }
        form(&pairs)
    }

    #[test]
    fn test_flag_mapping_is_total_over_two_values() {
        assert_eq!(Flag::parse("f", "No").unwrap().code(), 0);
        assert_eq!(Flag::parse("f", "Yes").unwrap().code(), 1);
        for bad in ["yes", "Y", "1", ""] {
            assert!(Flag::parse("f", bad).is_err(), "{bad} accepted");
        }
    }

    #[test]
    fn test_insert_and_update_write_the_same_flag_encoding() {
        let insert = serde_json::to_value(AcademicInput::for_insert(&academic_form(true)).unwrap())
            .unwrap();
        let update = serde_json::to_value(AcademicInput::for_update(&academic_form(false)).unwrap())
            .unwrap();
        assert_eq!(insert["part_time_job"], json!(1));
        assert_eq!(update["part_time_job"], json!(1));
        assert_eq!(insert["extracurricular_activities"], json!(0));
        assert_eq!(update["extracurricular_activities"], json!(0));
        assert_eq!(insert["student_id"], json!(41));
        assert!(update.get("student_id").is_none());
    }

    #[test]
    fn test_insert_rejects_unknown_flag() {
        let f = form(&[
            ("student_id", "1"),
            ("absence_days", "2"),
            ("part_time_job", "Sometimes"),
            ("extracurricular_activities", "No"),
            ("weekly_self_study_hours", "12"),
            ("career_aspiration", "Doctor"),
        ]);
        let err = AcademicInput::for_insert(&f).unwrap_err();
        assert!(err.to_string().contains("part_time_job"));
    }

    #[test]
    fn test_row_reads_legacy_flag_encodings() {
        let row: AcademicRecord = serde_json::from_value(json!({
            "record_id": 3,
            "student_id": 9,
            "absence_days": 1,
            "part_time_job": "Yes",
            "extracurricular_activities": false,
            "weekly_self_study_hours": 5,
            "career_aspiration": "Lawyer"
        }))
        .unwrap();
        assert_eq!(row.part_time_job, Some(Flag::Yes));
        assert_eq!(row.extracurricular_activities, Some(Flag::No));
    }

    #[test]
    fn test_row_tolerates_null_cells() {
        let row: AcademicRecord = serde_json::from_value(json!({
            "record_id": 4,
            "student_id": 9,
            "absence_days": null,
            "part_time_job": null,
            "weekly_self_study_hours": 6
        }))
        .unwrap();
        assert_eq!(row.absence_days, None);
        assert_eq!(row.part_time_job, None);
        assert_eq!(row.extracurricular_activities, None);
        assert_eq!(row.weekly_self_study_hours, Some(6));
    }

    #[test]
    fn test_row_rejects_out_of_range_flag() {
        let result: Result<AcademicRecord, _> = serde_json::from_value(json!({
            "record_id": 3,
            "student_id": 9,
            "absence_days": 1,
            "part_time_job": 4,
            "extracurricular_activities": 0,
            "weekly_self_study_hours": 5
        }));
        assert!(result.is_err());
    }
}
