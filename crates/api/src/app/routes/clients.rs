use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};

use clientdesk_core::{ClientDraft, ClientPatch};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_clients).post(create_client))
        .route("/count", get(count_clients))
        .route("/search", get(search_clients))
        .route(
            "/:id",
            get(get_client).put(update_client).delete(delete_client),
        )
}

pub async fn list_clients(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::ListClientsQuery>,
) -> axum::response::Response {
    match services
        .repo()
        .find_all(query.skip, query.limit, query.name.as_deref(), query.active)
        .await
    {
        Ok(clients) => {
            let items: Vec<_> = clients.iter().map(dto::client_to_json).collect();
            (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
        }
        Err(e) => errors::app_error_to_response(e),
    }
}

pub async fn count_clients(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::CountClientsQuery>,
) -> axum::response::Response {
    match services
        .repo()
        .count(query.name.as_deref(), query.active)
        .await
    {
        Ok(count) => (StatusCode::OK, Json(serde_json::json!({ "count": count }))).into_response(),
        Err(e) => errors::app_error_to_response(e),
    }
}

pub async fn search_clients(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::SearchClientsQuery>,
) -> axum::response::Response {
    match services.repo().find_by_name(&query.name).await {
        Ok(clients) => {
            let items: Vec<_> = clients.iter().map(dto::client_to_json).collect();
            (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
        }
        Err(e) => errors::app_error_to_response(e),
    }
}

pub async fn get_client(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    match services.repo().find_by_id(&id).await {
        Ok(client) => (StatusCode::OK, Json(dto::client_to_json(&client))).into_response(),
        Err(e) => errors::app_error_to_response(e),
    }
}

pub async fn create_client(
    Extension(services): Extension<Arc<AppServices>>,
    Json(draft): Json<ClientDraft>,
) -> axum::response::Response {
    // Shape validation happens here, before the repository is invoked.
    if let Err(e) = draft.validate() {
        return errors::app_error_to_response(e);
    }

    match services.repo().create(draft).await {
        Ok(client) => (StatusCode::CREATED, Json(dto::client_to_json(&client))).into_response(),
        Err(e) => errors::app_error_to_response(e),
    }
}

pub async fn update_client(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(patch): Json<ClientPatch>,
) -> axum::response::Response {
    if let Err(e) = patch.validate() {
        return errors::app_error_to_response(e);
    }

    match services.repo().update(&id, patch).await {
        Ok(client) => (StatusCode::OK, Json(dto::client_to_json(&client))).into_response(),
        Err(e) => errors::app_error_to_response(e),
    }
}

pub async fn delete_client(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    match services.repo().delete(&id).await {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::app_error_to_response(e),
    }
}
