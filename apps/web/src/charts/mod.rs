// Visualizations page: join the three record lists in memory, aggregate,
// then lay each chart out as inline SVG.

pub mod aggregate;
pub mod handlers;
pub mod plot;

use serde::Serialize;

use crate::models::{AcademicRecord, Student, SubjectScores};

/// How many students each side of the performers chart shows.
pub const PERFORMER_COUNT: usize = 10;

#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub performers: plot::PerformersPlot,
    pub absence: plot::ScatterPlot,
    pub careers: plot::CareerPlot,
    pub distributions: plot::BoxPlot,
}

pub fn build_dashboard(
    students: &[Student],
    academics: &[AcademicRecord],
    scores: &[SubjectScores],
) -> Dashboard {
    let performers = aggregate::top_and_bottom(scores, students, PERFORMER_COUNT);
    let absence = aggregate::absence_vs_average(academics, scores);
    let careers = aggregate::career_counts(academics);
    let distributions = aggregate::subject_distributions(scores);

    Dashboard {
        performers: plot::performers_plot(&performers),
        absence: plot::scatter_plot(&absence),
        careers: plot::career_plot(&careers),
        distributions: plot::box_plot(&distributions),
    }
}
