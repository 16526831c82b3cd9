use aide::axum::ApiRouter;
use aide::OperationOutput;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::database::AppState;

pub mod products;
pub mod upload;

pub fn init(app_state: AppState) -> ApiRouter {
    ApiRouter::new().merge(products::router(app_state))
}

/// Respond with `201 Created` and the wrapped body.
pub struct Created<T>(pub T);

impl<T: IntoResponse> IntoResponse for Created<T> {
    fn into_response(self) -> Response {
        (StatusCode::CREATED, self.0).into_response()
    }
}

impl<T: OperationOutput> OperationOutput for Created<T> {
    type Inner = T::Inner;
}
