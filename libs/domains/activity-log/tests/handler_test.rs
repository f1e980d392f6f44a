//! Handler tests for the activity log domain.
//!
//! These drive the HTTP surface against in-memory repositories:
//! request deserialization, response envelopes, status codes.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use domain_activity_log::*;
use http_body_util::BodyExt;
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

async fn json_body(body: Body) -> serde_json::Value {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

struct AlwaysRestores;

#[async_trait::async_trait]
impl UndoHandler for AlwaysRestores {
    async fn restore(&self, entry: &LogEntry) -> UndoResult<RestoreOutcome> {
        Ok(RestoreOutcome::Restored {
            undelete_event: LogEvent::UndeleteCourse,
            data: entry.data.clone(),
        })
    }
}

fn test_app(repo: Arc<InMemoryLogRepository>) -> axum::Router {
    let writer = LogWriter::new(repo.clone());
    let reader = Arc::new(LogReader::new(repo.clone(), Arc::new(EmptyDirectory)));
    let registry =
        UndoRegistry::new().register(LogEvent::CourseDeletion, Arc::new(AlwaysRestores));
    let engine = Arc::new(UndoEngine::new(repo.clone(), writer, registry));

    handlers::router(handlers::LogsState {
        reader,
        engine,
        repository: repo,
    })
}

async fn seed_course_deletion(repo: &Arc<InMemoryLogRepository>, actor: Uuid) -> LogEntry {
    LogWriter::new(repo.clone())
        .record(
            LogEvent::CourseDeletion,
            LogKind::Delete,
            Some(actor),
            LogData::Course {
                course_id: Uuid::now_v7(),
                name: "Algebra I".to_string(),
                code: "ALG1".to_string(),
                intake: false,
            },
        )
        .await
        .unwrap()
}

#[tokio::test]
async fn test_list_returns_envelope_with_undo_action() {
    let repo = Arc::new(InMemoryLogRepository::new());
    let actor = Uuid::now_v7();
    seed_course_deletion(&repo, actor).await;
    let app = test_app(repo);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/?page=1&rowPerPage=10")
                .header("x-user-id", actor.to_string())
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response.into_body()).await;

    assert_eq!(body["currentPage"], 1);
    assert_eq!(body["totalItems"], 1);
    let entry = &body["data"][0];
    assert_eq!(entry["event"], "COURSE_DELETION");
    assert_eq!(entry["type"], "DELETE");
    assert_eq!(entry["action"][0], "UNDO");
    assert_eq!(entry["unDelete"], false);
    let description = entry["description"].as_str().unwrap();
    assert!(description.starts_with("You deleted the course <strong>Algebra I</strong> (ALG1)"));
}

#[tokio::test]
async fn test_list_filters_by_event() {
    let repo = Arc::new(InMemoryLogRepository::new());
    let actor = Uuid::now_v7();
    seed_course_deletion(&repo, actor).await;
    LogWriter::new(repo.clone())
        .record(LogEvent::UserLogin, LogKind::Update, Some(actor), LogData::Empty)
        .await
        .unwrap();
    let app = test_app(repo);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/?event=USER_LOGIN")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let body = json_body(response.into_body()).await;
    assert_eq!(body["totalItems"], 1);
    assert_eq!(body["data"][0]["event"], "USER_LOGIN");
}

#[tokio::test]
async fn test_undo_endpoint_round_trip() {
    let repo = Arc::new(InMemoryLogRepository::new());
    let actor = Uuid::now_v7();
    let entry = seed_course_deletion(&repo, actor).await;
    let app = test_app(repo.clone());

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("/{}/undo", entry.id))
                .header("x-user-id", actor.to_string())
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response.into_body()).await;
    assert_eq!(body["status"], "undone");

    // Original entry flipped, undelete entry recorded
    let original = repo.find_by_id(entry.id).await.unwrap().unwrap();
    assert!(original.un_delete);

    // Second call reports the idempotency guard
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("/{}/undo", entry.id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body = json_body(response.into_body()).await;
    assert_eq!(body["status"], "already_undone");
}

#[tokio::test]
async fn test_undo_unknown_log_is_404() {
    let repo = Arc::new(InMemoryLogRepository::new());
    let app = test_app(repo);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("/{}/undo", Uuid::now_v7()))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_undo_invalid_uuid_is_400() {
    let repo = Arc::new(InMemoryLogRepository::new());
    let app = test_app(repo);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/not-a-uuid/undo")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_clean_logs_reports_deleted_count() {
    let repo = Arc::new(InMemoryLogRepository::new());
    let actor = Uuid::now_v7();
    seed_course_deletion(&repo, actor).await;
    seed_course_deletion(&repo, actor).await;
    let app = test_app(repo);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response.into_body()).await;
    assert_eq!(body["deletedCount"], 2);

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let body = json_body(response.into_body()).await;
    assert_eq!(body["totalItems"], 0);
}
