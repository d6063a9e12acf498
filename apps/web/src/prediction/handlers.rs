use std::collections::HashMap;

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Form,
};
use minijinja::context;
use tracing::{error, info};

use crate::errors::AppError;
use crate::forms::FormFields;
use crate::models::Subject;
use crate::prediction::features::{assemble, PredictionInput, MAX_SUBJECT_ROWS};
use crate::state::AppState;

fn subject_options() -> Vec<minijinja::Value> {
    Subject::ALL
        .iter()
        .map(|s| context! { key => s.column(), label => s.label() })
        .collect()
}

fn render_form(
    state: &AppState,
    values: &HashMap<String, String>,
    prediction_text: Option<String>,
    error: Option<String>,
) -> Result<Html<String>, AppError> {
    state.views.render(
        "predict.html",
        context! {
            subjects => subject_options(),
            rows => (1..=MAX_SUBJECT_ROWS).collect::<Vec<_>>(),
            values,
            prediction_text,
            error,
        },
    )
}

/// GET /predict
pub async fn handle_predict_page(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    render_form(&state, &HashMap::new(), None, None)
}

/// POST /predict
///
/// Validation failures re-render the form with the message and a 400;
/// inference failures are logged with the assembled features and surface as 5xx.
pub async fn handle_predict(
    State(state): State<AppState>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Response, AppError> {
    let form = FormFields::new(pairs);
    let values: HashMap<String, String> = form.pairs().iter().cloned().collect();

    let input = match PredictionInput::from_form(&form) {
        Ok(input) => input,
        Err(AppError::Validation(message)) => {
            info!("Rejected prediction request: {message}");
            let page = render_form(&state, &values, None, Some(message))?;
            return Ok((StatusCode::BAD_REQUEST, page).into_response());
        }
        Err(e) => return Err(e),
    };

    let features = assemble(&input);
    let prediction = state.predictor.predict(&features).inspect_err(|e| {
        error!(features = ?features.to_array(), "Prediction failed: {e}");
    })?;

    info!(
        class_id = prediction.class_id,
        career = prediction.career,
        average_score = features.average_score,
        "Prediction served"
    );

    let text = format!("Predicted Career: {}", prediction.career);
    Ok(render_form(&state, &values, Some(text), None)?.into_response())
}
