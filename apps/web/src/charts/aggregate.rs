//! Aggregates behind the visualizations page, computed from in-memory joins
//! of the three record lists.

use std::collections::HashMap;

use serde::Serialize;

use crate::models::{AcademicRecord, Student, Subject, SubjectScores};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Performer {
    pub name: String,
    pub average: f64,
}

/// Best and worst students by mean subject score, both ordered high → low.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Performers {
    pub top: Vec<Performer>,
    pub bottom: Vec<Performer>,
}

/// Joins score rows to students on `student_id`; score rows without a
/// matching student, or with no scores at all, are dropped.
pub fn top_and_bottom(scores: &[SubjectScores], students: &[Student], n: usize) -> Performers {
    let names: HashMap<i64, String> = students
        .iter()
        .map(|s| (s.student_id, s.full_name()))
        .collect();

    let mut ranked: Vec<Performer> = scores
        .iter()
        .filter_map(|row| {
            let name = names.get(&row.student_id)?;
            Some(Performer {
                name: name.clone(),
                average: row.mean()?,
            })
        })
        .collect();
    ranked.sort_by(|a, b| {
        b.average
            .total_cmp(&a.average)
            .then_with(|| a.name.cmp(&b.name))
    });

    let top = ranked.iter().take(n).cloned().collect();
    let bottom_start = ranked.len().saturating_sub(n);
    let bottom = ranked[bottom_start..].to_vec();
    Performers { top, bottom }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AbsencePoint {
    pub absence_days: f64,
    pub average: f64,
}

/// One point per (academic record, score row) pair sharing a `student_id`.
/// Records without absence days and rows without scores are skipped.
pub fn absence_vs_average(
    academics: &[AcademicRecord],
    scores: &[SubjectScores],
) -> Vec<AbsencePoint> {
    let mut by_student: HashMap<i64, Vec<f64>> = HashMap::new();
    for row in scores {
        if let Some(mean) = row.mean() {
            by_student.entry(row.student_id).or_default().push(mean);
        }
    }

    academics
        .iter()
        .filter_map(|record| Some((record.student_id, record.absence_days? as f64)))
        .flat_map(|(student_id, absence_days)| {
            by_student
                .get(&student_id)
                .into_iter()
                .flatten()
                .map(move |average| AbsencePoint {
                    absence_days,
                    average: *average,
                })
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CareerCount {
    pub career: String,
    pub count: usize,
}

/// Aspiration histogram, most common first; blank aspirations are skipped.
pub fn career_counts(academics: &[AcademicRecord]) -> Vec<CareerCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for career in academics
        .iter()
        .filter_map(|r| r.career_aspiration.as_deref())
        .map(str::trim)
        .filter(|c| !c.is_empty())
    {
        *counts.entry(career).or_default() += 1;
    }

    let mut out: Vec<CareerCount> = counts
        .into_iter()
        .map(|(career, count)| CareerCount {
            career: career.to_string(),
            count,
        })
        .collect();
    out.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.career.cmp(&b.career)));
    out
}

/// Five-number summary with Tukey whiskers (1.5 × IQR).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxStats {
    pub subject: &'static str,
    pub count: usize,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub whisker_low: f64,
    pub whisker_high: f64,
    pub outliers: Vec<f64>,
}

/// One box per subject over its non-null scores; subjects with none are omitted.
pub fn subject_distributions(scores: &[SubjectScores]) -> Vec<BoxStats> {
    Subject::ALL
        .iter()
        .filter_map(|&subject| {
            let mut values: Vec<f64> = scores.iter().filter_map(|r| r.score(subject)).collect();
            if values.is_empty() {
                return None;
            }
            values.sort_by(f64::total_cmp);
            Some(box_stats(subject.label(), &values))
        })
        .collect()
}

fn box_stats(subject: &'static str, sorted: &[f64]) -> BoxStats {
    let q1 = quantile(sorted, 0.25);
    let median = quantile(sorted, 0.5);
    let q3 = quantile(sorted, 0.75);
    let iqr = q3 - q1;
    let low_fence = q1 - 1.5 * iqr;
    let high_fence = q3 + 1.5 * iqr;

    let inside = |v: &f64| (low_fence..=high_fence).contains(v);
    BoxStats {
        subject,
        count: sorted.len(),
        q1,
        median,
        q3,
        whisker_low: sorted.iter().copied().find(|v| inside(v)).unwrap_or(q1),
        whisker_high: sorted.iter().copied().rev().find(|v| inside(v)).unwrap_or(q3),
        outliers: sorted.iter().copied().filter(|v| !inside(v)).collect(),
    }
}

/// Linearly interpolated quantile of a sorted, non-empty slice.
pub fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}
