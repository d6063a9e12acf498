//! Axum route handlers for the three record tables. Writes redirect back to
//! the table's list page (303 See Other).

use axum::{
    extract::{Path, State},
    response::{Html, Redirect},
    Form,
};
use minijinja::context;

use crate::errors::AppError;
use crate::forms::FormFields;
use crate::models::{
    AcademicInput, AcademicRecord, Student, StudentInput, Subject, SubjectScores,
    SubjectScoresInput,
};
use crate::records;
use crate::state::AppState;
use crate::store::Table;

type RawForm = Form<Vec<(String, String)>>;

// ────────────────────────────────────────────────────────────────────────────
// Students
// ────────────────────────────────────────────────────────────────────────────

/// GET /student_data
pub async fn handle_list_students(
    State(state): State<AppState>,
) -> Result<Html<String>, AppError> {
    let students = records::list::<Student>(state.store.as_ref()).await?;
    state
        .views
        .render("student_data.html", context! { students })
}

/// POST /add_student
pub async fn handle_add_student(
    State(state): State<AppState>,
    Form(pairs): RawForm,
) -> Result<Redirect, AppError> {
    let input = StudentInput::from_form(&FormFields::new(pairs))?;
    records::insert(state.store.as_ref(), Table::Students, &input).await?;
    Ok(Redirect::to("/student_data"))
}

/// POST /update_student/:id
pub async fn handle_update_student(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Form(pairs): RawForm,
) -> Result<Redirect, AppError> {
    let input = StudentInput::from_form(&FormFields::new(pairs))?;
    records::update(state.store.as_ref(), Table::Students, id, &input).await?;
    Ok(Redirect::to("/student_data"))
}

/// GET /delete_student/:id
pub async fn handle_delete_student(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Redirect, AppError> {
    records::delete(state.store.as_ref(), Table::Students, id).await?;
    Ok(Redirect::to("/student_data"))
}

// ────────────────────────────────────────────────────────────────────────────
// Academic info
// ────────────────────────────────────────────────────────────────────────────

/// GET /academic_info
pub async fn handle_list_academics(
    State(state): State<AppState>,
) -> Result<Html<String>, AppError> {
    let academics = records::list::<AcademicRecord>(state.store.as_ref()).await?;
    state
        .views
        .render("academic_info.html", context! { academics })
}

/// POST /add_academic
pub async fn handle_add_academic(
    State(state): State<AppState>,
    Form(pairs): RawForm,
) -> Result<Redirect, AppError> {
    let input = AcademicInput::for_insert(&FormFields::new(pairs))?;
    records::insert(state.store.as_ref(), Table::AcademicInfo, &input).await?;
    Ok(Redirect::to("/academic_info"))
}

/// POST /update_academic/:id
pub async fn handle_update_academic(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Form(pairs): RawForm,
) -> Result<Redirect, AppError> {
    let input = AcademicInput::for_update(&FormFields::new(pairs))?;
    records::update(state.store.as_ref(), Table::AcademicInfo, id, &input).await?;
    Ok(Redirect::to("/academic_info"))
}

/// GET /delete_academic/:id
pub async fn handle_delete_academic(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Redirect, AppError> {
    records::delete(state.store.as_ref(), Table::AcademicInfo, id).await?;
    Ok(Redirect::to("/academic_info"))
}

// ────────────────────────────────────────────────────────────────────────────
// Subject scores
// ────────────────────────────────────────────────────────────────────────────

/// GET /subjects
pub async fn handle_list_subjects(
    State(state): State<AppState>,
) -> Result<Html<String>, AppError> {
    let subjects = records::list::<SubjectScores>(state.store.as_ref()).await?;
    let columns: Vec<_> = Subject::ALL
        .iter()
        .map(|s| context! { key => s.column(), label => s.label() })
        .collect();
    state
        .views
        .render("subjects.html", context! { subjects, columns })
}

/// POST /add_subject
pub async fn handle_add_subject(
    State(state): State<AppState>,
    Form(pairs): RawForm,
) -> Result<Redirect, AppError> {
    let input = SubjectScoresInput::for_insert(&FormFields::new(pairs))?;
    records::insert(state.store.as_ref(), Table::Subjects, &input).await?;
    Ok(Redirect::to("/subjects"))
}

/// POST /update_subject/:id
pub async fn handle_update_subject(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Form(pairs): RawForm,
) -> Result<Redirect, AppError> {
    let input = SubjectScoresInput::for_update(&FormFields::new(pairs))?;
    records::update(state.store.as_ref(), Table::Subjects, id, &input).await?;
    Ok(Redirect::to("/subjects"))
}

/// GET /delete_subject/:id
pub async fn handle_delete_subject(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Redirect, AppError> {
    records::delete(state.store.as_ref(), Table::Subjects, id).await?;
    Ok(Redirect::to("/subjects"))
}
