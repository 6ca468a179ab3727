use axum::{
    Router,
    extract::{Query, State},
    routing::get,
};
use axum_helpers::{
    ApiResponse, UuidPath, ValidatedJson,
    errors::responses::{
        BadRequestUuidResponse, BadRequestValidationResponse, InternalServerErrorResponse,
        NotFoundResponse,
    },
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::EventResult;
use crate::models::{Event, EventFilter, EventPayload};
use crate::repository::EventRepository;
use crate::service::EventService;

/// OpenAPI documentation for Events API
#[derive(OpenApi)]
#[openapi(
    paths(list_events, create_event, get_event, update_event, delete_event),
    components(
        schemas(
            Event,
            EventPayload,
            EventFilter,
            ApiResponse<Event>,
            ApiResponse<Vec<Event>>
        ),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestUuidResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Events", description = "Event management endpoints (MongoDB)")
    )
)]
pub struct ApiDoc;

/// Create the events router with all HTTP endpoints
pub fn router<R: EventRepository + 'static>(service: EventService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_events).post(create_event))
        .route("/{id}", get(get_event).put(update_event).delete(delete_event))
        .with_state(shared_service)
}

/// List events with optional filters
#[utoipa::path(
    get,
    path = "",
    tag = "Events",
    params(EventFilter),
    responses(
        (status = 200, description = "List of matching events", body = ApiResponse<Vec<Event>>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_events<R: EventRepository>(
    State(service): State<Arc<EventService<R>>>,
    Query(filter): Query<EventFilter>,
) -> EventResult<ApiResponse<Vec<Event>>> {
    let events = service.list_events(filter).await?;
    Ok(ApiResponse::ok(events))
}

/// Create a new event
#[utoipa::path(
    post,
    path = "",
    tag = "Events",
    request_body = EventPayload,
    responses(
        (status = 201, description = "Event created successfully", body = ApiResponse<Event>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_event<R: EventRepository>(
    State(service): State<Arc<EventService<R>>>,
    ValidatedJson(input): ValidatedJson<EventPayload>,
) -> EventResult<ApiResponse<Event>> {
    let event = service.create_event(input).await?;
    Ok(ApiResponse::created(event))
}

/// Get an event by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Events",
    params(
        ("id" = Uuid, Path, description = "Event ID")
    ),
    responses(
        (status = 200, description = "Event found", body = ApiResponse<Event>),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_event<R: EventRepository>(
    State(service): State<Arc<EventService<R>>>,
    UuidPath(id): UuidPath,
) -> EventResult<ApiResponse<Event>> {
    let event = service.get_event(id).await?;
    Ok(ApiResponse::ok(event))
}

/// Replace an event
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Events",
    params(
        ("id" = Uuid, Path, description = "Event ID")
    ),
    request_body = EventPayload,
    responses(
        (status = 200, description = "Event updated successfully", body = ApiResponse<Event>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_event<R: EventRepository>(
    State(service): State<Arc<EventService<R>>>,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<EventPayload>,
) -> EventResult<ApiResponse<Event>> {
    let event = service.update_event(id, input).await?;
    Ok(ApiResponse::ok(event))
}

/// Delete an event
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Events",
    params(
        ("id" = Uuid, Path, description = "Event ID")
    ),
    responses(
        (status = 200, description = "Event deleted successfully"),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_event<R: EventRepository>(
    State(service): State<Arc<EventService<R>>>,
    UuidPath(id): UuidPath,
) -> EventResult<ApiResponse<()>> {
    service.delete_event(id).await?;
    Ok(ApiResponse::ok_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EventError;
    use crate::repository::MockEventRepository;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use tower::ServiceExt;
    use uuid::Uuid;

    fn app(repo: MockEventRepository) -> Router {
        router(EventService::new(repo))
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn sample_event(title: &str) -> Event {
        Event::new(EventPayload {
            title: title.to_string(),
            ..Default::default()
        })
    }

    #[tokio::test]
    async fn test_create_event_returns_201_envelope() {
        let mut repo = MockEventRepository::new();
        repo.expect_create()
            .times(1)
            .returning(|input| Ok(Event::new(input)));

        let response = app(repo)
            .oneshot(json_request("POST", "/", json!({"title": "Jazz Night"})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        assert_eq!(body["status"], 201);
        assert_eq!(body["message"], "success");
        assert_eq!(body["data"]["title"], "Jazz Night");
        assert!(body["data"]["_id"].is_string());
    }

    #[tokio::test]
    async fn test_create_event_with_empty_title_returns_400() {
        let mut repo = MockEventRepository::new();
        repo.expect_create().times(0);

        let response = app(repo)
            .oneshot(json_request("POST", "/", json!({"title": ""})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["status"], 400);
        assert!(body["data"].is_null());
    }

    #[tokio::test]
    async fn test_create_event_with_missing_title_returns_400() {
        let mut repo = MockEventRepository::new();
        repo.expect_create().times(0);

        let response = app(repo)
            .oneshot(json_request("POST", "/", json!({"city": "Toronto"})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_get_event_returns_envelope_with_record() {
        let event = sample_event("Jazz Night");
        let id = event.id;
        let mut repo = MockEventRepository::new();
        repo.expect_get_by_id()
            .returning(move |_| Ok(Some(event.clone())));

        let response = app(repo)
            .oneshot(
                Request::builder()
                    .uri(format!("/{}", id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["data"]["_id"], id.to_string());
    }

    #[tokio::test]
    async fn test_get_event_missing_returns_404() {
        let mut repo = MockEventRepository::new();
        repo.expect_get_by_id().returning(|_| Ok(None));

        let response = app(repo)
            .oneshot(
                Request::builder()
                    .uri(format!("/{}", Uuid::now_v7()))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["status"], 404);
        assert!(body["data"].is_null());
    }

    #[tokio::test]
    async fn test_get_event_malformed_id_returns_400() {
        // Repository must never see a request for a malformed identifier
        let mut repo = MockEventRepository::new();
        repo.expect_get_by_id().times(0);

        let response = app(repo)
            .oneshot(
                Request::builder()
                    .uri("/not-a-uuid")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_list_events_returns_envelope_with_array() {
        let mut repo = MockEventRepository::new();
        repo.expect_list()
            .returning(|_| Ok(vec![sample_event("Jazz Night"), sample_event("Rock Fest")]));

        let response = app(repo)
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_list_events_passes_query_params() {
        let mut repo = MockEventRepository::new();
        repo.expect_list()
            .withf(|filter| {
                filter.city.as_deref() == Some("Toronto") && filter.title.is_none()
            })
            .returning(|_| Ok(vec![]));

        let response = app(repo)
            .oneshot(
                Request::builder()
                    .uri("/?city=Toronto")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["data"], json!([]));
    }

    #[tokio::test]
    async fn test_update_event_returns_replaced_record() {
        let id = Uuid::now_v7();
        let mut repo = MockEventRepository::new();
        repo.expect_update().returning(|id, input| {
            let mut event = Event::new(input);
            event.id = id;
            Ok(event)
        });

        let response = app(repo)
            .oneshot(json_request(
                "PUT",
                &format!("/{}", id),
                json!({"title": "Rock Fest", "city": "Hamilton"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["data"]["_id"], id.to_string());
        assert_eq!(body["data"]["title"], "Rock Fest");
        assert_eq!(body["data"]["city"], "Hamilton");
    }

    #[tokio::test]
    async fn test_update_event_missing_returns_404() {
        let mut repo = MockEventRepository::new();
        repo.expect_update()
            .returning(|id, _| Err(EventError::NotFound(id)));

        let response = app(repo)
            .oneshot(json_request(
                "PUT",
                &format!("/{}", Uuid::now_v7()),
                json!({"title": "Rock Fest"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_event_returns_empty_envelope() {
        let mut repo = MockEventRepository::new();
        repo.expect_delete().returning(|_| Ok(true));

        let response = app(repo)
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/{}", Uuid::now_v7()))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], 200);
        assert_eq!(body["message"], "success");
        assert!(body["data"].is_null());
    }

    #[tokio::test]
    async fn test_delete_event_missing_returns_404() {
        let mut repo = MockEventRepository::new();
        repo.expect_delete()
            .returning(|id| Err(EventError::NotFound(id)));

        let response = app(repo)
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/{}", Uuid::now_v7()))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_store_timeout_surfaces_as_500() {
        let mut repo = MockEventRepository::new();
        repo.expect_list()
            .returning(|_| Err(EventError::Timeout("find")));

        let response = app(repo)
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["status"], 500);
    }
}
