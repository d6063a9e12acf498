//! HTML views. Templates are compiled into the binary and registered once at
//! startup; `.html` names get HTML auto-escaping.

use axum::response::Html;
use minijinja::Environment;
use serde::Serialize;

use crate::errors::AppError;

const TEMPLATES: &[(&str, &str)] = &[
    ("base.html", include_str!("../../templates/base.html")),
    ("home.html", include_str!("../../templates/home.html")),
    ("predict.html", include_str!("../../templates/predict.html")),
    ("student_data.html", include_str!("../../templates/student_data.html")),
    ("academic_info.html", include_str!("../../templates/academic_info.html")),
    ("subjects.html", include_str!("../../templates/subjects.html")),
    ("visualizations.html", include_str!("../../templates/visualizations.html")),
];

pub struct Views {
    env: Environment<'static>,
}

impl Views {
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        for &(name, source) in TEMPLATES {
            env.add_template(name, source)?;
        }
        Ok(Self { env })
    }

    pub fn render<S: Serialize>(&self, name: &str, ctx: S) -> Result<Html<String>, AppError> {
        let template = self.env.get_template(name)?;
        Ok(Html(template.render(ctx)?))
    }
}
