//! In-process job service for end-to-end tests: a small axum app on an
//! ephemeral port that keeps its data in memory and records every request.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde_json::json;

use crate::models::{JobPostCreate, JobPostUpdate, JobPosting, OtpRequest, OtpVerify, User, UserUpdate};
use crate::session::claims::make_token;

pub const VALID_OTP: &str = "123456";

#[derive(Debug, Clone, PartialEq)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub bearer: Option<String>,
}

pub struct Backend {
    pub token: String,
    pub user: Mutex<User>,
    pub jobs: Mutex<Vec<JobPosting>>,
    pub log: Mutex<Vec<Recorded>>,
    next_id: Mutex<u64>,
}

impl Backend {
    pub fn new(user: User, jobs: Vec<JobPosting>) -> Self {
        Self {
            token: make_token(3600),
            user: Mutex::new(user),
            jobs: Mutex::new(jobs),
            log: Mutex::new(Vec::new()),
            next_id: Mutex::new(1000),
        }
    }

    /// Issues `token` from verify-otp instead of a signed JWT.
    pub fn with_token(mut self, token: &str) -> Self {
        self.token = token.to_string();
        self
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.log.lock().unwrap().clone()
    }

    fn authorized(&self, headers: &HeaderMap) -> Result<(), Response> {
        let expected = format!("Bearer {}", self.token);
        match headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) {
            Some(value) if value == expected => Ok(()),
            _ => Err((
                StatusCode::UNAUTHORIZED,
                Json(json!({"detail": "Could not validate credentials"})),
            )
                .into_response()),
        }
    }
}

/// Starts the backend and returns its base URL.
pub async fn spawn(backend: Arc<Backend>) -> String {
    let app = router(backend);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn router(backend: Arc<Backend>) -> Router {
    Router::new()
        .route("/auth/request-otp", post(request_otp))
        .route("/auth/verify-otp", post(verify_otp))
        .route("/users/me", get(current_user).put(update_user))
        .route("/jobs/", get(list_jobs).post(create_job))
        .route("/jobs/suggestions/:kind", get(suggestions))
        .route("/jobs/:id", get(get_job).put(update_job).delete(delete_job))
        .layer(middleware::from_fn_with_state(backend.clone(), record))
        .with_state(backend)
}

async fn record(State(backend): State<Arc<Backend>>, req: Request, next: Next) -> Response {
    let bearer = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string);
    backend.log.lock().unwrap().push(Recorded {
        method: req.method().to_string(),
        path: req.uri().path().to_string(),
        query: req.uri().query().map(str::to_string),
        bearer,
    });
    next.run(req).await
}

async fn request_otp(Json(body): Json<OtpRequest>) -> Response {
    if !body.email.contains('@') {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({"detail": [{"msg": "value is not a valid email address", "loc": ["body", "email"], "type": "value_error"}]})),
        )
            .into_response();
    }
    Json(json!({"msg": "OTP sent"})).into_response()
}

async fn verify_otp(State(backend): State<Arc<Backend>>, Json(body): Json<OtpVerify>) -> Response {
    if body.otp_code != VALID_OTP {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"detail": "Invalid or expired OTP"})),
        )
            .into_response();
    }
    Json(json!({"access_token": backend.token, "token_type": "bearer"})).into_response()
}

async fn current_user(State(backend): State<Arc<Backend>>, headers: HeaderMap) -> Response {
    if let Err(denied) = backend.authorized(&headers) {
        return denied;
    }
    let user = backend.user.lock().unwrap().clone();
    Json(user).into_response()
}

async fn update_user(
    State(backend): State<Arc<Backend>>,
    headers: HeaderMap,
    Json(update): Json<UserUpdate>,
) -> Response {
    if let Err(denied) = backend.authorized(&headers) {
        return denied;
    }
    if let Some(mobile) = &update.mobile_number {
        if !mobile.chars().all(|c| c.is_ascii_digit() || c == '+') {
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({"detail": [{"msg": "Invalid mobile number", "loc": ["body", "mobile_number"], "type": "value_error"}]})),
            )
                .into_response();
        }
    }
    let mut user = backend.user.lock().unwrap();
    if let Some(full_name) = update.full_name {
        user.full_name = Some(full_name);
    }
    if let Some(mobile) = update.mobile_number {
        user.mobile_number = Some(mobile);
    }
    user.updated_at = Utc::now();
    Json(user.clone()).into_response()
}

async fn list_jobs(
    State(backend): State<Arc<Backend>>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if let Err(denied) = backend.authorized(&headers) {
        return denied;
    }
    let skip = params.get("skip").and_then(|v| v.parse().ok()).unwrap_or(0);
    let limit = params.get("limit").and_then(|v| v.parse().ok()).unwrap_or(100);
    let role = params.get("RoleName").map(|v| v.to_lowercase());
    let location = params.get("Location").map(|v| v.to_lowercase());

    let jobs: Vec<JobPosting> = backend
        .jobs
        .lock()
        .unwrap()
        .iter()
        .filter(|j| {
            role.as_ref()
                .map(|r| j.role_name.to_lowercase().contains(r))
                .unwrap_or(true)
        })
        .filter(|j| {
            location
                .as_ref()
                .map(|l| j.location.as_deref().unwrap_or("").to_lowercase().contains(l))
                .unwrap_or(true)
        })
        .skip(skip)
        .take(limit)
        .cloned()
        .collect();
    Json(jobs).into_response()
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(json!({"detail": "Job not found"}))).into_response()
}

async fn get_job(
    State(backend): State<Arc<Backend>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    if let Err(denied) = backend.authorized(&headers) {
        return denied;
    }
    let jobs = backend.jobs.lock().unwrap();
    match jobs.iter().find(|j| j.id == id) {
        Some(job) => Json(job.clone()).into_response(),
        None => not_found(),
    }
}

async fn create_job(
    State(backend): State<Arc<Backend>>,
    headers: HeaderMap,
    Json(body): Json<JobPostCreate>,
) -> Response {
    if let Err(denied) = backend.authorized(&headers) {
        return denied;
    }
    let id = {
        let mut next = backend.next_id.lock().unwrap();
        *next += 1;
        next.to_string()
    };
    let job = JobPosting {
        id,
        role_name: body.role_name,
        company_name: body.company_name,
        job_description: body.job_description,
        department_name: body.department_name,
        location: body.location,
        contact_email: body.contact_email,
        application_link: body.application_link,
        referral_status: body.referral_status,
        posting_date: Utc::now(),
    };
    backend.jobs.lock().unwrap().push(job.clone());
    (StatusCode::CREATED, Json(job)).into_response()
}

async fn update_job(
    State(backend): State<Arc<Backend>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<JobPostUpdate>,
) -> Response {
    if let Err(denied) = backend.authorized(&headers) {
        return denied;
    }
    let mut jobs = backend.jobs.lock().unwrap();
    let Some(job) = jobs.iter_mut().find(|j| j.id == id) else {
        return not_found();
    };
    if let Some(v) = body.role_name {
        job.role_name = v;
    }
    if let Some(v) = body.company_name {
        job.company_name = v;
    }
    if let Some(v) = body.job_description {
        job.job_description = v;
    }
    if let Some(v) = body.department_name {
        job.department_name = v;
    }
    if let Some(v) = body.location {
        job.location = v;
    }
    if let Some(v) = body.contact_email {
        job.contact_email = v;
    }
    if let Some(v) = body.application_link {
        job.application_link = v;
    }
    if let Some(v) = body.referral_status {
        job.referral_status = v;
    }
    Json(job.clone()).into_response()
}

async fn delete_job(
    State(backend): State<Arc<Backend>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    if let Err(denied) = backend.authorized(&headers) {
        return denied;
    }
    let mut jobs = backend.jobs.lock().unwrap();
    let before = jobs.len();
    jobs.retain(|j| j.id != id);
    if jobs.len() == before {
        return not_found();
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn suggestions(
    State(backend): State<Arc<Backend>>,
    headers: HeaderMap,
    Path(kind): Path<String>,
) -> Response {
    if let Err(denied) = backend.authorized(&headers) {
        return denied;
    }
    let jobs = backend.jobs.lock().unwrap();
    let mut values: Vec<String> = jobs
        .iter()
        .filter_map(|j| match kind.as_str() {
            "role-names" => Some(j.role_name.clone()),
            "company-names" => Some(j.company_name.clone()),
            "locations" => j.location.clone(),
            "department-names" => j.department_name.clone(),
            _ => None,
        })
        .collect();
    values.sort();
    values.dedup();
    Json(json!({"suggestions": values})).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::admin::{AdminDashboard, Preconfirmed};
    use crate::api::{ApiClient, SuggestionKind};
    use crate::errors::{AppError, ErrorKind};
    use crate::forms;
    use crate::guards::{evaluate, Decision, Route};
    use crate::listing::{JobFilters, JobListing};
    use crate::models::job::sample_job;
    use crate::models::user::sample_user;
    use crate::session::{MemoryTokenStore, SessionStore};

    fn complete_user(is_admin: bool) -> User {
        let mut user = sample_user(Some("Ada Lovelace"), Some("+4915112345678"));
        user.is_admin = is_admin;
        user
    }

    async fn start(user: User, jobs: Vec<JobPosting>) -> (Arc<Backend>, ApiClient) {
        let backend = Arc::new(Backend::new(user, jobs));
        let url = spawn(backend.clone()).await;
        (backend, ApiClient::new(url).unwrap())
    }

    #[tokio::test]
    async fn test_otp_login_flow() {
        let backend = Arc::new(Backend::new(complete_user(false), vec![]).with_token("t"));
        let api = ApiClient::new(spawn(backend.clone()).await).unwrap();
        let storage = Arc::new(MemoryTokenStore::default());
        let session = SessionStore::new(Arc::new(api.clone()), storage.clone());
        assert!(!session.initialize().await.is_authenticated());

        let request = forms::validate_login("a@b.com").unwrap();
        let sent = api.request_otp(&request).await.unwrap();
        assert_eq!(sent.msg, "OTP sent");

        let wrong = forms::validate_otp("a@b.com", "000000").unwrap();
        let err = api.verify_otp(&wrong).await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid or expired OTP (Status: 400)");

        let token = api
            .verify_otp(&forms::validate_otp("a@b.com", VALID_OTP).unwrap())
            .await
            .unwrap();
        assert_eq!(token.access_token, "t");
        assert_eq!(token.token_type.as_deref(), Some("bearer"));

        let user = session.login(token).await.unwrap();
        assert_eq!(user, complete_user(false));
        assert!(session.snapshot().is_authenticated());
        assert_eq!(session.token().as_deref(), Some("t"));
        assert_eq!(storage.current().as_deref(), Some("t"));

        let me = backend
            .requests()
            .into_iter()
            .find(|r| r.path == "/users/me")
            .unwrap();
        assert_eq!(me.bearer.as_deref(), Some("t"));
    }

    #[tokio::test]
    async fn test_restart_rehydrates_from_storage() {
        let (backend, api) = start(complete_user(false), vec![]).await;
        let storage = Arc::new(MemoryTokenStore::with_token(&backend.token));

        let restored = SessionStore::new(Arc::new(api), storage)
            .initialize()
            .await;

        assert!(restored.is_authenticated());
        assert_eq!(
            evaluate(&restored, &Route::login()),
            Decision::Redirect(Route::home())
        );
    }

    #[tokio::test]
    async fn test_login_with_incomplete_profile_then_complete_it() {
        let (backend, api) = start(sample_user(None, None), vec![]).await;
        let session = SessionStore::new(
            Arc::new(api.clone()),
            Arc::new(MemoryTokenStore::default()),
        );
        let token = api
            .verify_otp(&forms::validate_otp("a@b.com", VALID_OTP).unwrap())
            .await
            .unwrap();
        session.login(token).await.unwrap();

        assert!(matches!(
            evaluate(&session.snapshot(), &Route::home()),
            Decision::Redirect(Route::CompleteProfile { .. })
        ));

        let bad = crate::models::UserUpdate {
            full_name: Some("Ada".to_string()),
            mobile_number: Some("call me".to_string()),
        };
        let err = api
            .update_current_user(session.token().as_deref(), &bad)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid mobile number (Status: 422)");

        let update = forms::validate_profile("Ada Lovelace", "+4915112345678").unwrap();
        let user = api
            .update_current_user(session.token().as_deref(), &update)
            .await
            .unwrap();
        session.update_current_user(user);

        assert_eq!(evaluate(&session.snapshot(), &Route::home()), Decision::Render);
        assert!(backend.user.lock().unwrap().is_profile_complete());
    }

    #[tokio::test]
    async fn test_rejected_stored_token_logs_out() {
        let (backend, api) = start(complete_user(false), vec![]).await;
        let storage = Arc::new(MemoryTokenStore::with_token(&make_token(600)));
        let session = SessionStore::new(Arc::new(api), storage.clone());

        let restored = session.initialize().await;

        assert!(!restored.is_authenticated());
        assert_eq!(storage.current(), None);
        assert_eq!(backend.requests().len(), 1);
        assert!(matches!(
            evaluate(&restored, &Route::Admin),
            Decision::Redirect(Route::Login { .. })
        ));
    }

    #[tokio::test]
    async fn test_admin_delete_refetches_without_job() {
        let jobs = vec![
            sample_job("41", "SRE", "Acme"),
            sample_job("42", "Product Manager", "Acme"),
            sample_job("43", "Designer", "Initech"),
        ];
        let (backend, api) = start(complete_user(true), jobs).await;
        let token = backend.token.clone();
        let mut dashboard = AdminDashboard::new();

        dashboard.load(&api, Some(&token)).await.unwrap();
        assert_eq!(dashboard.jobs().len(), 3);

        assert!(dashboard
            .delete(&api, "42", &Preconfirmed(true), Some(&token))
            .await
            .unwrap());

        let requests = backend.requests();
        let delete_at = requests
            .iter()
            .position(|r| r.method == "DELETE")
            .unwrap();
        assert_eq!(requests[delete_at].path, "/jobs/42");
        assert_eq!(requests[delete_at].bearer.as_deref(), Some(token.as_str()));
        assert_eq!(requests[delete_at + 1].method, "GET");
        assert_eq!(requests[delete_at + 1].path, "/jobs/");

        assert_eq!(dashboard.jobs().len(), 2);
        assert!(dashboard.jobs().iter().all(|j| j.id != "42"));
    }

    #[tokio::test]
    async fn test_admin_create_and_update_round_trip() {
        let (backend, api) = start(complete_user(true), vec![]).await;
        let token = backend.token.clone();
        let mut dashboard = AdminDashboard::new();

        let form = forms::JobForm {
            role_name: "Platform Engineer".to_string(),
            company_name: "Acme".to_string(),
            job_description: "Run the platform".to_string(),
            contact_email: Some(String::new()),
            ..Default::default()
        };
        let created = dashboard.create(&api, &form, Some(&token)).await.unwrap();
        assert_eq!(created.contact_email, None);
        assert_eq!(created.referral_status.as_deref(), Some("no"));

        let existing = api.get_job(&created.id, Some(&token)).await.unwrap();
        let edit = forms::JobForm::from_job(&existing).merge(forms::JobForm {
            location: Some("Remote".to_string()),
            ..Default::default()
        });
        let updated = dashboard
            .update(&api, &created.id, &edit, Some(&token))
            .await
            .unwrap();
        assert_eq!(updated.location.as_deref(), Some("Remote"));
        assert_eq!(updated.role_name, "Platform Engineer");
        assert_eq!(dashboard.jobs().len(), 1);
    }

    #[tokio::test]
    async fn test_listing_lookahead_over_http() {
        let jobs = (1..=12)
            .map(|i| sample_job(&i.to_string(), "Engineer", "Acme"))
            .collect();
        let (backend, api) = start(complete_user(false), jobs).await;
        let token = backend.token.clone();

        let mut listing = JobListing::new(JobFilters::from_query("RoleName=engineer"), 5);
        listing.refresh(&api, Some(&token)).await.unwrap();
        assert_eq!(listing.jobs().len(), 5);
        assert_eq!(listing.total_jobs(), 6);

        let queries: Vec<String> = backend
            .requests()
            .into_iter()
            .filter_map(|r| r.query)
            .collect();
        assert_eq!(
            queries,
            vec![
                "RoleName=engineer&skip=0&limit=5",
                "RoleName=engineer&skip=5&limit=1"
            ]
        );

        assert!(listing.change_page(2));
        listing.refresh(&api, Some(&token)).await.unwrap();
        assert!(listing.change_page(3));
        listing.refresh(&api, Some(&token)).await.unwrap();
        assert_eq!(listing.jobs().len(), 2);
        assert_eq!(listing.total_jobs(), 12);
        assert_eq!(listing.total_pages(), 3);
        assert!(!listing.change_page(4));
    }

    #[tokio::test]
    async fn test_error_envelopes_and_auth_failures() {
        let (backend, api) = start(complete_user(false), vec![]).await;
        let token = backend.token.clone();

        let err = api.get_job("999", Some(&token)).await.unwrap_err();
        assert_eq!(err.to_string(), "Job not found (Status: 404)");
        assert_eq!(err.kind(), ErrorKind::Network);

        let err = api.get_job("999", Some("forged")).await.unwrap_err();
        assert!(err.is_auth_failure());

        let err = api
            .request_otp(&crate::models::OtpRequest {
                email: "nope".to_string(),
            })
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "value is not a valid email address (Status: 422)"
        );

        let err = api.get_job("1", None).await.unwrap_err();
        assert!(matches!(err, AppError::AuthRequired(_)));
        assert_eq!(backend.requests().len(), 3);
    }

    #[tokio::test]
    async fn test_field_suggestions() {
        let mut remote = sample_job("2", "SRE", "Initech");
        remote.location = Some("Remote".to_string());
        let (backend, api) = start(
            complete_user(false),
            vec![sample_job("1", "SRE", "Acme"), remote],
        )
        .await;

        let list = api
            .suggestions(SuggestionKind::Locations, Some(&backend.token))
            .await
            .unwrap();
        assert_eq!(list.suggestions, vec!["Berlin", "Remote"]);

        let request = backend.requests().pop().unwrap();
        assert_eq!(request.path, "/jobs/suggestions/locations");
    }
}
