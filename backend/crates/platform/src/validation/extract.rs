//! JSON body extractors
//!
//! Body problems surface as `ValidationError` on field `body`, never as
//! axum's plain-text rejections.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use kernel::error::app_error::AppError;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::schema::Schema;
use super::validate_and_sanitize;

/// `Json<T>` whose rejection is an [`AppError`]
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(json_rejection_to_error)?;
        Ok(Self(value))
    }
}

/// Payload type bound to a schema
pub trait BodySchema {
    fn schema() -> &'static Schema;
}

/// Body validated against `T::schema()`, sanitized, then deserialized
#[derive(Debug, Clone)]
pub struct Validated<T>(pub T);

impl<S, T> FromRequest<S> for Validated<T>
where
    S: Send + Sync,
    T: DeserializeOwned + BodySchema,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let JsonBody(raw) = JsonBody::<Value>::from_request(req, state).await?;
        let cleaned = validate_and_sanitize(&raw, T::schema())?;
        Ok(Self(serde_json::from_value(cleaned)?))
    }
}

pub fn json_rejection_to_error(rejection: JsonRejection) -> AppError {
    let message = match &rejection {
        JsonRejection::MissingJsonContentType(_) => {
            "Expected request with `Content-Type: application/json`"
        }
        JsonRejection::JsonSyntaxError(_) => "Malformed JSON in request body",
        JsonRejection::JsonDataError(_) => "Request body does not match the expected shape",
        JsonRejection::BytesRejection(_) => "Failed to read request body",
        _ => "Invalid request body",
    };
    AppError::validation("body", message).with_source(rejection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::schema::{FieldSpec, Rule, StringRule};
    use axum::body::Body;
    use axum::http::{StatusCode, header};
    use kernel::error::codes;
    use kernel::error::kind::ErrorKind;
    use serde::Deserialize;
    use std::sync::LazyLock;

    #[derive(Debug, Deserialize)]
    struct Note {
        text: String,
    }

    static NOTE: LazyLock<Schema> = LazyLock::new(|| {
        Schema::new("note").field(FieldSpec::required(
            "text",
            Rule::String(StringRule::new().min(1).max(50)),
        ))
    });

    impl BodySchema for Note {
        fn schema() -> &'static Schema {
            &NOTE
        }
    }

    fn json_request(body: &'static str) -> Request {
        Request::builder()
            .method("POST")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_malformed_json_is_validation_error() {
        let err = JsonBody::<Value>::from_request(json_request("{not json"), &())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.code(), codes::VALIDATION_ERROR);
        assert_eq!(err.field(), Some("body"));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST.as_u16());
    }

    #[tokio::test]
    async fn test_missing_content_type_is_validation_error() {
        let req = Request::builder()
            .method("POST")
            .body(Body::from("{}"))
            .unwrap();
        let err = JsonBody::<Value>::from_request(req, &()).await.unwrap_err();
        assert_eq!(err.field(), Some("body"));
    }

    #[tokio::test]
    async fn test_validated_sanitizes_and_deserializes() {
        let Validated(note) =
            Validated::<Note>::from_request(json_request(r#"{"text":"<b>hi</b>","x":1}"#), &())
                .await
                .unwrap();
        assert_eq!(note.text, "hi");
    }

    #[tokio::test]
    async fn test_validated_reports_schema_violations() {
        let err = Validated::<Note>::from_request(json_request(r#"{"text":""}"#), &())
            .await
            .unwrap_err();
        assert_eq!(err.field(), Some("text"));
        assert!(err.details().is_some());
    }
}
