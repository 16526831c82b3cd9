use std::sync::Arc;

use aide::axum::ApiRouter;
use aide::openapi::OpenApi;
use axum::extract::DefaultBodyLimit;
use axum::http::Method;
use axum::{Extension, Router};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

use crate::database::AppState;
use crate::docs::{api_docs, docs_routes};
use crate::env;
use crate::error::ServiceResult;

/// Assemble all routes, the api documentation and middleware.
pub fn app(app_state: AppState) -> Router {
    let mut api = OpenApi::default();

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST]);

    ApiRouter::new()
        .nest_api_service("/docs", docs_routes())
        .merge(crate::api::init(app_state))
        .finish_api_with(&mut api, api_docs)
        .layer(Extension(Arc::new(api)))
        .layer(DefaultBodyLimit::max(*env::MAX_UPLOAD_SIZE))
        .layer(cors)
}

pub async fn start_server(app_state: AppState) -> ServiceResult<()> {
    let address = format!("{}:{}", env::API_HOST.as_str(), env::API_PORT.as_str());
    let listener = TcpListener::bind(&address).await?;

    log::info!("Start http server at {}", address);
    axum::serve(listener, app(app_state)).await?;

    Ok(())
}
