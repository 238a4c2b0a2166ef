//! # API REST
//!
//! REST API implementation for NHL.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON serialization, CORS, status codes)
//!
//! Uses `api-shared` for the wire types and `nhl-core` for all patient and context logic.

#![warn(rust_2018_idioms)]

use axum::{
    extract::{Path as AxumPath, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use api_shared::{
    AddReportReq, AddReportRes, ContextRecord, CreatePatientReq, CreatePatientRes, Disease,
    HealthRes, HealthService, HistoryItem, ListDiseasesRes, ListPatientsRes, MetaRes, Patient,
    PatientReportRes, PatientRes, RelationRes, VitalSignsRes, VitalsRes,
};
use nhl_core::{NhlError, PatientService};

/// Application state shared across REST API handlers
///
/// Holds the `PatientService`, which owns the configuration, the reference data loaded at
/// startup and the JSON stores.
#[derive(Clone)]
pub struct AppState {
    pub patient_service: PatientService,
}

impl AppState {
    pub fn new(patient_service: PatientService) -> Self {
        Self { patient_service }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health,
        meta,
        list_patients,
        create_patient,
        get_patient,
        patient_report,
        add_report,
        list_diseases,
        relation,
    ),
    components(schemas(
        HealthRes,
        MetaRes,
        Patient,
        ListPatientsRes,
        PatientRes,
        CreatePatientReq,
        CreatePatientRes,
        Disease,
        ListDiseasesRes,
        RelationRes,
        ContextRecord,
        HistoryItem,
        VitalSignsRes,
        VitalsRes,
        PatientReportRes,
        AddReportReq,
        AddReportRes,
    ))
)]
pub struct ApiDoc;

/// Builds the REST router with Swagger UI and permissive CORS.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/meta", get(meta))
        .route("/api/patients", get(list_patients).post(create_patient))
        .route("/api/patients/:id", get(get_patient))
        .route("/api/patients/:id/report", get(patient_report))
        .route("/api/patients/:id/reports", post(add_report))
        .route("/api/diseases", get(list_diseases))
        .route("/api/relations/:present/:previous", get(relation))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Maps a core error onto a status code, logging it first.
fn error_response(context: &str, e: NhlError) -> (StatusCode, &'static str) {
    match e {
        NhlError::PatientNotFound(id) => {
            tracing::warn!("{}: patient {} not found", context, id);
            (StatusCode::NOT_FOUND, "Patient not found")
        }
        NhlError::InvalidInput(msg) => {
            tracing::warn!("{}: invalid input: {}", context, msg);
            (StatusCode::BAD_REQUEST, "Invalid input")
        }
        other => {
            tracing::error!("{} error: {:?}", context, other);
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal error")
        }
    }
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
///
/// Used for monitoring and load balancer health checks.
#[axum::debug_handler]
async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthService::check_health())
}

#[utoipa::path(
    get,
    path = "/api/meta",
    responses(
        (status = 200, description = "Application metadata", body = MetaRes)
    )
)]
#[axum::debug_handler]
async fn meta(State(state): State<AppState>) -> Json<MetaRes> {
    let md = state.patient_service.config().metadata();
    Json(MetaRes {
        app: md.name.clone(),
        version: md.version.clone(),
        author: md.author.clone(),
        country: md.country.clone(),
        data_source: "static mock files".into(),
    })
}

#[utoipa::path(
    get,
    path = "/api/patients",
    responses(
        (status = 200, description = "List of patients", body = ListPatientsRes),
        (status = 500, description = "Internal server error")
    )
)]
/// List all patients in the system
///
/// # Errors
/// Returns `500 Internal Server Error` if the patient store cannot be read.
#[axum::debug_handler]
async fn list_patients(
    State(state): State<AppState>,
) -> Result<Json<ListPatientsRes>, (StatusCode, &'static str)> {
    match state.patient_service.list_patients() {
        Ok(patients) => Ok(Json(ListPatientsRes { patients })),
        Err(e) => Err(error_response("List patients", e)),
    }
}

#[utoipa::path(
    post,
    path = "/api/patients",
    request_body = CreatePatientReq,
    responses(
        (status = 201, description = "Patient registered", body = CreatePatientRes),
        (status = 400, description = "Bad request"),
        (status = 500, description = "Internal server error")
    )
)]
/// Register a new patient
///
/// The new patient gets the next numeric id. `last_visit` defaults to 2025-01-01.
///
/// # Errors
/// Returns `400 Bad Request` when a required field is blank, `500` if the store cannot be
/// written.
#[axum::debug_handler]
async fn create_patient(
    State(state): State<AppState>,
    Json(req): Json<CreatePatientReq>,
) -> Result<(StatusCode, Json<CreatePatientRes>), (StatusCode, &'static str)> {
    match state.patient_service.register_patient(req) {
        Ok(patient) => {
            tracing::info!("Registered patient {}", patient.patient_id);
            Ok((StatusCode::CREATED, Json(CreatePatientRes { patient })))
        }
        Err(e) => Err(error_response("Register patient", e)),
    }
}

#[utoipa::path(
    get,
    path = "/api/patients/{id}",
    params(("id" = String, Path, description = "Patient id")),
    responses(
        (status = 200, description = "Patient found", body = PatientRes),
        (status = 404, description = "Patient not found"),
        (status = 500, description = "Internal server error")
    )
)]
#[axum::debug_handler]
async fn get_patient(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
) -> Result<Json<PatientRes>, (StatusCode, &'static str)> {
    match state.patient_service.get_patient(&id) {
        Ok(Some(patient)) => Ok(Json(PatientRes { patient })),
        Ok(None) => Err(error_response("Get patient", NhlError::PatientNotFound(id))),
        Err(e) => Err(error_response("Get patient", e)),
    }
}

#[utoipa::path(
    get,
    path = "/api/patients/{id}/report",
    params(("id" = String, Path, description = "Patient id")),
    responses(
        (status = 200, description = "Causal-context report", body = PatientReportRes),
        (status = 404, description = "Patient not found"),
        (status = 500, description = "Internal server error")
    )
)]
/// Full causal-context report for one patient
///
/// Combines the explicit relation data, the state, auto-history and report-history context
/// streams, mock vitals and the bell-curve chart values. The result is deterministic for a
/// given patient and data set.
#[axum::debug_handler]
async fn patient_report(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
) -> Result<Json<PatientReportRes>, (StatusCode, &'static str)> {
    match state.patient_service.patient_report(&id) {
        Ok(report) => Ok(Json(report.into())),
        Err(e) => Err(error_response("Patient report", e)),
    }
}

#[utoipa::path(
    post,
    path = "/api/patients/{id}/reports",
    params(("id" = String, Path, description = "Patient id")),
    request_body = AddReportReq,
    responses(
        (status = 200, description = "Diseases extracted from the report", body = AddReportRes),
        (status = 404, description = "Patient not found"),
        (status = 500, description = "Internal server error")
    )
)]
/// Add text from an uploaded medical report
///
/// Known disease names found in the text are stored as report history and feed the
/// report-history context stream from then on.
#[axum::debug_handler]
async fn add_report(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
    Json(req): Json<AddReportReq>,
) -> Result<Json<AddReportRes>, (StatusCode, &'static str)> {
    match state
        .patient_service
        .add_report(&id, &req.text, req.reported_on.as_deref())
    {
        Ok(entries) => Ok(Json(AddReportRes {
            added: entries.iter().map(HistoryItem::from).collect(),
        })),
        Err(e) => Err(error_response("Add report", e)),
    }
}

#[utoipa::path(
    get,
    path = "/api/diseases",
    responses(
        (status = 200, description = "Disease descriptions", body = ListDiseasesRes)
    )
)]
#[axum::debug_handler]
async fn list_diseases(State(state): State<AppState>) -> Json<ListDiseasesRes> {
    Json(ListDiseasesRes {
        diseases: state.patient_service.reference().diseases.clone(),
    })
}

#[utoipa::path(
    get,
    path = "/api/relations/{present}/{previous}",
    params(
        ("present" = String, Path, description = "Present disease"),
        ("previous" = String, Path, description = "Previous disease")
    ),
    responses(
        (status = 200, description = "Catalog relation", body = RelationRes),
        (status = 404, description = "No predefined relation")
    )
)]
/// Catalog relation between two diseases
///
/// Names are normalised before lookup, so `dengue` and `"Dengue"` are the same disease.
#[axum::debug_handler]
async fn relation(
    State(state): State<AppState>,
    AxumPath((present, previous)): AxumPath<(String, String)>,
) -> Result<Json<RelationRes>, (StatusCode, &'static str)> {
    let summary = state.patient_service.relation(&present, &previous);
    if summary.probability.is_none() {
        return Err((StatusCode::NOT_FOUND, "No predefined relation found"));
    }
    Ok(Json(summary.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use nhl_core::{CoreConfig, ReferenceData};
    use std::fs;
    use std::sync::Arc;
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn test_router(temp: &TempDir) -> Router {
        let dir = temp.path();
        fs::write(
            dir.join("relations.json"),
            r#"{"Dengue": {"Malaria": {"probability": 0.8, "report": "Shared vector."}}}"#,
        )
        .unwrap();
        fs::write(
            dir.join("state_diseases.json"),
            r#"{"Odisha": ["Malaria", "Typhoid", "Cholera"]}"#,
        )
        .unwrap();
        fs::write(
            dir.join("mock_history_diseases.json"),
            r#"["Flu", "Asthma", "Migraine"]"#,
        )
        .unwrap();
        fs::write(
            dir.join("diseases.json"),
            r#"[{"disease_name": "Malaria", "category": "Parasitic", "common_symptoms": "Fever", "description": "Mosquito-borne"}]"#,
        )
        .unwrap();
        fs::write(
            dir.join("patients.json"),
            r#"[{"patient_id": "42", "name": "Asha", "age": "34", "gender": "F", "city": "Puri",
                 "state": "Odisha", "last_visit": "2025-02-01", "present_disease": "Dengue",
                 "previous_diseases": "Malaria"}]"#,
        )
        .unwrap();

        let cfg = Arc::new(CoreConfig::new(dir.to_path_buf()).unwrap());
        let reference = Arc::new(ReferenceData::load(&cfg));
        router(AppState::new(PatientService::new(cfg, reference)))
    }

    async fn get_json(app: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let resp = app
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, json)
    }

    async fn post_json(
        app: &Router,
        uri: &str,
        body: serde_json::Value,
    ) -> (StatusCode, serde_json::Value) {
        let resp = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(serde_json::to_string(&body).unwrap()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn health_returns_200() {
        let temp = TempDir::new().unwrap();
        let app = test_router(&temp);

        let (status, json) = get_json(&app, "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["ok"], true);
    }

    #[tokio::test]
    async fn meta_reports_app_details() {
        let temp = TempDir::new().unwrap();
        let app = test_router(&temp);

        let (status, json) = get_json(&app, "/api/meta").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["app"], "Neural Health Link");
        assert_eq!(json["country"], "India");
    }

    #[tokio::test]
    async fn report_contains_context_streams() {
        let temp = TempDir::new().unwrap();
        let app = test_router(&temp);

        let (status, json) = get_json(&app, "/api/patients/42/report").await;
        assert_eq!(status, StatusCode::OK);

        let report: PatientReportRes = serde_json::from_value(json).unwrap();
        assert_eq!(report.region, "Odisha");
        assert_eq!(report.state_context.len(), 3);
        assert_eq!(report.state_context[0].source, "state");
        assert_eq!(report.state_context[0].narrative, "Shared vector.");
        assert_eq!(report.auto_context.len(), 3);
        assert!(report.report_context.is_empty());
        assert_eq!(report.chart_values.len(), 3 + 3 + 5);
        assert_eq!(report.relation_data[0].probability, Some(0.8));
    }

    #[tokio::test]
    async fn unknown_patient_is_404() {
        let temp = TempDir::new().unwrap();
        let app = test_router(&temp);

        let (status, _) = get_json(&app, "/api/patients/999/report").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = get_json(&app, "/api/patients/999").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn relation_lookup_and_miss() {
        let temp = TempDir::new().unwrap();
        let app = test_router(&temp);

        let (status, json) = get_json(&app, "/api/relations/dengue/malaria").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["probability"], 0.8);
        assert_eq!(json["present_disease"], "Dengue");

        let (status, _) = get_json(&app, "/api/relations/Dengue/Cholera").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn register_then_upload_report() {
        let temp = TempDir::new().unwrap();
        let app = test_router(&temp);

        let (status, json) = post_json(
            &app,
            "/api/patients",
            serde_json::json!({
                "name": "Meera",
                "age": "29",
                "gender": "F",
                "city": "Cuttack",
                "state": "Odisha",
                "present_disease": "Malaria"
            }),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["patient"]["patient_id"], "43");
        assert_eq!(json["patient"]["last_visit"], "2025-01-01");

        let (status, json) = post_json(
            &app,
            "/api/patients/43/reports",
            serde_json::json!({"text": "History of flu in 2023.", "reported_on": "2023-03-01"}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["added"][0]["disease"], "Flu");

        let (_, json) = get_json(&app, "/api/patients/43/report").await;
        assert_eq!(json["report_context"][0]["source"], "report-history");
    }

    #[tokio::test]
    async fn register_with_blank_name_is_400() {
        let temp = TempDir::new().unwrap();
        let app = test_router(&temp);

        let (status, _) = post_json(
            &app,
            "/api/patients",
            serde_json::json!({"name": "  ", "present_disease": "Malaria"}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn diseases_are_listed() {
        let temp = TempDir::new().unwrap();
        let app = test_router(&temp);

        let (status, json) = get_json(&app, "/api/diseases").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["diseases"][0]["disease_name"], "Malaria");
    }
}
