use axum::{extract::State, response::Html};
use minijinja::context;

use crate::charts::build_dashboard;
use crate::errors::AppError;
use crate::models::{AcademicRecord, Student, SubjectScores};
use crate::records;
use crate::state::AppState;

/// GET /visualizations
pub async fn handle_visualizations(
    State(state): State<AppState>,
) -> Result<Html<String>, AppError> {
    let store = state.store.as_ref();
    let (students, academics, scores) = tokio::try_join!(
        records::list::<Student>(store),
        records::list::<AcademicRecord>(store),
        records::list::<SubjectScores>(store),
    )?;

    let dashboard = build_dashboard(&students, &academics, &scores);
    state.views.render(
        "visualizations.html",
        context! {
            charts => dashboard,
            student_count => students.len(),
            score_count => scores.len(),
        },
    )
}
