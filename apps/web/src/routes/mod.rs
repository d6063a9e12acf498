pub mod health;
pub mod home;

use axum::{routing::get, routing::post, Router};

use crate::charts::handlers as charts;
use crate::prediction::handlers as prediction;
use crate::records::handlers as records;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home::home_handler))
        .route("/health", get(health::health_handler))
        // Prediction
        .route(
            "/predict",
            get(prediction::handle_predict_page).post(prediction::handle_predict),
        )
        // Students
        .route("/student_data", get(records::handle_list_students))
        .route("/add_student", post(records::handle_add_student))
        .route("/update_student/:id", post(records::handle_update_student))
        .route("/delete_student/:id", get(records::handle_delete_student))
        // Academic info
        .route("/academic_info", get(records::handle_list_academics))
        .route("/add_academic", post(records::handle_add_academic))
        .route("/update_academic/:id", post(records::handle_update_academic))
        .route("/delete_academic/:id", get(records::handle_delete_academic))
        // Subject scores
        .route("/subjects", get(records::handle_list_subjects))
        .route("/add_subject", post(records::handle_add_subject))
        .route("/update_subject/:id", post(records::handle_update_subject))
        .route("/delete_subject/:id", get(records::handle_delete_subject))
        // Charts
        .route("/visualizations", get(charts::handle_visualizations))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::{header, HeaderMap, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::prediction::testing::constant_predictor;
    use crate::store::{MemoryStore, Query, Row, StoreError, Table, TableStore};
    use crate::views::Views;

    fn state_with(store: Arc<dyn TableStore>, class_id: i64) -> AppState {
        AppState {
            store,
            predictor: Arc::new(constant_predictor(class_id)),
            views: Arc::new(Views::new().unwrap()),
        }
    }

    fn app() -> (Router, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (build_router(state_with(store.clone(), 6)), store)
    }

    async fn send(app: &Router, req: Request<Body>) -> (StatusCode, HeaderMap, String) {
        let response = app.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, headers, String::from_utf8(bytes.to_vec()).unwrap())
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_form(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn rows(store: &MemoryStore, table: Table) -> Vec<Value> {
        store.select(table, Query::newest_first()).await.unwrap()
    }

    const PREDICT_FORM: &str = "gender=Female&absence_days=3&part_time_job=No\
        &extracurricular_activities=Yes&weekly_self_study_hours=10\
        &subject_1_name=math_score&subject_1_score=80\
        &subject_2_name=english_score&subject_2_score=70";

    #[tokio::test]
    async fn test_home_and_health() {
        let (app, _) = app();
        let (status, _, body) = send(&app, get_req("/")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("/predict"));

        let (status, _, body) = send(&app, get_req("/health")).await;
        assert_eq!(status, StatusCode::OK);
        let health: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(health["status"], "ok");
        assert_eq!(health["store"], "memory");
    }

    #[tokio::test]
    async fn test_predict_page_renders_subject_rows() {
        let (app, _) = app();
        let (status, _, body) = send(&app, get_req("/predict")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("subject_7_name"));
        assert!(!body.contains("subject_8_name"));
        assert!(body.contains("geography_score"));
    }

    #[tokio::test]
    async fn test_predict_renders_career() {
        let (app, _) = app();
        let (status, _, body) = send(&app, post_form("/predict", PREDICT_FORM)).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Predicted Career: Doctor"), "{body}");
    }

    #[tokio::test]
    async fn test_predict_unknown_class_renders_unknown_career() {
        let store = Arc::new(MemoryStore::new());
        let app = build_router(state_with(store, 42));
        let (_, _, body) = send(&app, post_form("/predict", PREDICT_FORM)).await;
        assert!(body.contains("Predicted Career: Unknown Career"));
    }

    #[tokio::test]
    async fn test_predict_validation_error_is_400_with_message() {
        let (app, _) = app();
        let body = PREDICT_FORM.replace("gender=Female", "gender=Other");
        let (status, _, html) = send(&app, post_form("/predict", &body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(html.contains("gender must be one of Male, Female"));
        assert!(!html.contains("Predicted Career"));
        assert!(!html.contains("Error during prediction"));
    }

    #[tokio::test]
    async fn test_predict_missing_field_is_400() {
        let (app, _) = app();
        let (status, _, html) = send(&app, post_form("/predict", "gender=Male")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(html.contains("absence_days is required"));
    }

    #[tokio::test]
    async fn test_student_crud_cycle() {
        let (app, store) = app();

        let (status, headers, _) = send(
            &app,
            post_form(
                "/add_student",
                "first_name=Grace&last_name=Hopper&email=grace%40navy.mil&gender=Female",
            ),
        )
        .await;
        assert_eq!(status, StatusCode::SEE_OTHER);
        assert_eq!(headers[header::LOCATION], "/student_data");

        let (status, _, html) = send(&app, get_req("/student_data")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("Grace"));
        assert!(html.contains("grace@navy.mil"));

        let (status, _, _) = send(
            &app,
            post_form(
                "/update_student/1",
                "first_name=Grace&last_name=Murray&email=gmh%40navy.mil&gender=Female",
            ),
        )
        .await;
        assert_eq!(status, StatusCode::SEE_OTHER);
        assert_eq!(rows(&store, Table::Students).await[0]["last_name"], "Murray");

        let (status, headers, _) = send(&app, get_req("/delete_student/1")).await;
        assert_eq!(status, StatusCode::SEE_OTHER);
        assert_eq!(headers[header::LOCATION], "/student_data");
        assert!(rows(&store, Table::Students).await.is_empty());
    }

    #[tokio::test]
    async fn test_add_student_validation_error_is_structured() {
        let (app, store) = app();
        let (status, _, body) = send(
            &app,
            post_form("/add_student", "first_name=Grace&last_name=Hopper&gender=Female"),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let err: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(err["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(err["error"]["message"], "email is required");
        assert!(rows(&store, Table::Students).await.is_empty());
    }

    #[tokio::test]
    async fn test_delete_nonexistent_id_redirects() {
        let (app, _) = app();
        for uri in ["/delete_student/999", "/delete_academic/999", "/delete_subject/999"] {
            let (status, _, _) = send(&app, get_req(uri)).await;
            assert_eq!(status, StatusCode::SEE_OTHER, "{uri}");
        }
    }

    #[tokio::test]
    async fn test_academic_flags_mapped_on_add_and_update() {
        let (app, store) = app();
        let (status, _, _) = send(
            &app,
            post_form(
                "/add_academic",
                "student_id=1&absence_days=2&part_time_job=Yes&extracurricular_activities=No\
                 &weekly_self_study_hours=9&career_aspiration=Doctor",
            ),
        )
        .await;
        assert_eq!(status, StatusCode::SEE_OTHER);
        let row = &rows(&store, Table::AcademicInfo).await[0];
        assert_eq!(row["part_time_job"], json!(1));
        assert_eq!(row["extracurricular_activities"], json!(0));

        let (status, _, _) = send(
            &app,
            post_form(
                "/update_academic/1",
                "absence_days=5&part_time_job=No&extracurricular_activities=Yes\
                 &weekly_self_study_hours=20&career_aspiration=Scientist",
            ),
        )
        .await;
        assert_eq!(status, StatusCode::SEE_OTHER);
        let row = &rows(&store, Table::AcademicInfo).await[0];
        assert_eq!(row["part_time_job"], json!(0));
        assert_eq!(row["extracurricular_activities"], json!(1));
        assert_eq!(row["student_id"], json!(1));
        assert_eq!(row["career_aspiration"], "Scientist");

        let (status, _, html) = send(&app, get_req("/academic_info")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("Scientist"));
    }

    #[tokio::test]
    async fn test_subjects_add_update_and_list() {
        let (app, store) = app();
        let scores = "math_score=90&history_score=80&physics_score=70&chemistry_score=60\
                      &biology_score=50&english_score=40&geography_score=30";
        let (status, headers, _) =
            send(&app, post_form("/add_subject", &format!("student_id=4&{scores}"))).await;
        assert_eq!(status, StatusCode::SEE_OTHER);
        assert_eq!(headers[header::LOCATION], "/subjects");

        let (status, _, _) = send(
            &app,
            post_form("/update_subject/1", &scores.replace("math_score=90", "math_score=95")),
        )
        .await;
        assert_eq!(status, StatusCode::SEE_OTHER);
        assert_eq!(rows(&store, Table::Subjects).await[0]["math_score"], json!(95.0));

        let (status, _, html) = send(&app, get_req("/subjects")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("95"));

        let (status, _, _) = send(
            &app,
            post_form("/update_subject/1", &scores.replace("math_score=90", "math_score=120")),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_visualizations_render_charts() {
        let (app, _) = app();
        send(
            &app,
            post_form(
                "/add_student",
                "first_name=Ada&last_name=Lovelace&email=ada%40x.org&gender=Female",
            ),
        )
        .await;
        send(
            &app,
            post_form(
                "/add_academic",
                "student_id=1&absence_days=2&part_time_job=No&extracurricular_activities=Yes\
                 &weekly_self_study_hours=9&career_aspiration=Scientist",
            ),
        )
        .await;
        send(
            &app,
            post_form(
                "/add_subject",
                "student_id=1&math_score=99&history_score=80&physics_score=97&chemistry_score=60\
                 &biology_score=50&english_score=88&geography_score=70",
            ),
        )
        .await;

        let (status, _, html) = send(&app, get_req("/visualizations")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(html.matches("<svg").count(), 4);
        assert!(html.contains("Ada Lovelace"));
        assert!(html.contains("Scientist"));
    }

    #[tokio::test]
    async fn test_visualizations_with_no_data() {
        let (app, _) = app();
        let (status, _, _) = send(&app, get_req("/visualizations")).await;
        assert_eq!(status, StatusCode::OK);
    }

    async fn seed(store: &MemoryStore, table: Table, value: Value) {
        let Value::Object(row) = value else {
            panic!("seed rows are objects");
        };
        store.insert(table, row).await.unwrap();
    }

    #[tokio::test]
    async fn test_pages_survive_null_cells() {
        let (app, store) = app();
        seed(
            &store,
            Table::Students,
            json!({"first_name": "Hedy", "last_name": null, "email": null, "gender": null}),
        )
        .await;
        seed(
            &store,
            Table::AcademicInfo,
            json!({"student_id": 1, "absence_days": null, "part_time_job": 1,
                   "extracurricular_activities": null, "weekly_self_study_hours": 4}),
        )
        .await;
        seed(
            &store,
            Table::Subjects,
            json!({"student_id": 1, "math_score": 90.0, "history_score": 80.0,
                   "physics_score": 70.0, "chemistry_score": 60.0, "biology_score": 50.0,
                   "english_score": 40.0, "geography_score": 30.0}),
        )
        .await;
        seed(
            &store,
            Table::Subjects,
            json!({"student_id": 1, "math_score": 100.0, "history_score": null,
                   "physics_score": 100.0, "chemistry_score": null, "biology_score": 100.0,
                   "english_score": 100.0, "geography_score": 100.0}),
        )
        .await;

        let (status, _, html) = send(&app, get_req("/subjects")).await;
        assert_eq!(status, StatusCode::OK, "{html}");
        assert!(html.contains(r#"name="history_score" type="number" min="0" max="100" step="any" value="""#));
        assert!(!html.contains(r#"value="none""#));

        let (status, _, html) = send(&app, get_req("/student_data")).await;
        assert_eq!(status, StatusCode::OK, "{html}");
        assert!(html.contains("Hedy"));

        let (status, _, html) = send(&app, get_req("/academic_info")).await;
        assert_eq!(status, StatusCode::OK, "{html}");
        assert!(html.contains(r#"name="absence_days" type="number" min="0" value="""#));

        let (status, _, html) = send(&app, get_req("/visualizations")).await;
        assert_eq!(status, StatusCode::OK, "{html}");
        assert!(html.contains("Hedy"));
        assert_eq!(html.matches("<svg").count(), 4);
    }

    #[tokio::test]
    async fn test_row_inputs_belong_to_their_update_form() {
        let (app, store) = app();
        seed(
            &store,
            Table::Subjects,
            json!({"student_id": 3, "math_score": 1.0, "history_score": 2.0,
                   "physics_score": 3.0, "chemistry_score": 4.0, "biology_score": 5.0,
                   "english_score": 6.0, "geography_score": 7.0}),
        )
        .await;
        seed(&store, Table::Students, json!({"first_name": "A", "last_name": "B"})).await;

        let (_, _, html) = send(&app, get_req("/subjects")).await;
        assert!(html.contains(r#"<form id="subject-1" method="post" action="/update_subject/1">"#));
        assert_eq!(html.matches(r#"form="subject-1""#).count(), 7);

        let (_, _, html) = send(&app, get_req("/student_data")).await;
        assert!(html.contains(r#"id="student-1""#));
        assert_eq!(html.matches(r#"form="student-1""#).count(), 4);
    }

    struct Unavailable;

    #[async_trait]
    impl TableStore for Unavailable {
        fn backend(&self) -> &'static str {
            "unavailable"
        }
        async fn select(&self, _: Table, _: Query) -> Result<Vec<Value>, StoreError> {
            Err(StoreError::Api {
                status: 503,
                message: "service unavailable".into(),
            })
        }
        async fn insert(&self, _: Table, _: Row) -> Result<(), StoreError> {
            Err(StoreError::Api {
                status: 503,
                message: "service unavailable".into(),
            })
        }
        async fn update(&self, _: Table, _: i64, _: Row) -> Result<(), StoreError> {
            Err(StoreError::Api {
                status: 503,
                message: "service unavailable".into(),
            })
        }
        async fn delete(&self, _: Table, _: i64) -> Result<(), StoreError> {
            Err(StoreError::Api {
                status: 503,
                message: "service unavailable".into(),
            })
        }
    }

    #[tokio::test]
    async fn test_store_failures_are_500() {
        let app = build_router(state_with(Arc::new(Unavailable), 6));
        for req in [
            get_req("/student_data"),
            get_req("/visualizations"),
            get_req("/delete_subject/1"),
            post_form(
                "/add_student",
                "first_name=A&last_name=B&email=a%40b.c&gender=Male",
            ),
        ] {
            let (status, _, body) = send(&app, req).await;
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            let err: Value = serde_json::from_str(&body).unwrap();
            assert_eq!(err["error"]["code"], "STORE_ERROR");
        }
    }

    #[tokio::test]
    async fn test_validation_runs_before_the_store() {
        let app = build_router(state_with(Arc::new(Unavailable), 6));
        let (status, _, _) = send(
            &app,
            post_form("/add_student", "first_name=A&last_name=B&email=a%40b.c&gender=X"),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
