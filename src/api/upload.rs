use aide::gen::GenContext;
use aide::openapi::{MediaType, Operation, RequestBody, SchemaObject};
use aide::operation::set_body;
use aide::OperationInput;
use axum::async_trait;
use axum::body::Bytes;
use axum::extract::multipart::MultipartError;
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::StatusCode;
use schemars::schema::{InstanceType, ObjectValidation, Schema};

use crate::error::ServiceError;

/// Name of the multipart field carrying the csv file.
pub const FILE_FIELD: &str = "file";

/// The non-empty `file` field of a multipart form upload.
///
/// Any request without such a field is rejected with a validation error.
pub struct CsvUpload {
    pub file_name: Option<String>,
    pub data: Bytes,
}

/// The body limit surfaces while streaming the form, everything else is a malformed upload.
fn multipart_error(err: MultipartError) -> ServiceError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ServiceError::PayloadTooLarge(err.body_text())
    } else {
        ServiceError::ValidationError(err.body_text())
    }
}

#[async_trait]
impl<S> FromRequest<S> for CsvUpload
where
    S: Send + Sync,
{
    type Rejection = ServiceError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let mut multipart = Multipart::from_request(req, state).await.map_err(|err| {
            ServiceError::ValidationError(format!("Parameter '{FILE_FIELD}' is missing: {err}"))
        })?;

        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            if field.name() != Some(FILE_FIELD) {
                continue;
            }

            let file_name = field.file_name().map(str::to_owned);
            let data = field.bytes().await.map_err(multipart_error)?;

            if data.is_empty() {
                return Err(ServiceError::ValidationError(format!(
                    "Parameter '{FILE_FIELD}' is empty"
                )));
            }

            return Ok(CsvUpload { file_name, data });
        }

        Err(ServiceError::ValidationError(format!(
            "Parameter '{FILE_FIELD}' is missing"
        )))
    }
}

impl OperationInput for CsvUpload {
    fn operation_input(ctx: &mut GenContext, operation: &mut Operation) {
        let file = schemars::schema::SchemaObject {
            instance_type: Some(InstanceType::String.into()),
            format: Some("binary".to_owned()),
            ..Default::default()
        };

        let mut form = ObjectValidation::default();
        form.properties
            .insert(FILE_FIELD.to_owned(), Schema::Object(file));
        form.required.insert(FILE_FIELD.to_owned());

        let schema = schemars::schema::SchemaObject {
            instance_type: Some(InstanceType::Object.into()),
            object: Some(Box::new(form)),
            ..Default::default()
        };

        let mut body = RequestBody {
            description: Some("Csv file with a header row.".to_owned()),
            required: true,
            ..Default::default()
        };
        body.content.insert(
            "multipart/form-data".to_owned(),
            MediaType {
                schema: Some(SchemaObject {
                    json_schema: Schema::Object(schema),
                    example: None,
                    external_docs: None,
                }),
                ..Default::default()
            },
        );

        set_body(ctx, operation, body);
    }
}
