//! Extractors that report malformed input in the API's own error format
//! instead of axum's plain-text rejections.

use axum::{
    body::Bytes,
    extract::{
        FromRequest, FromRequestParts, Path, Request,
        path::ErrorKind,
        rejection::PathRejection,
    },
    http::request::Parts,
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;

use crate::error::{AppError, FieldError};

/// JSON request body. An empty body reads as `{}` so that missing fields are
/// reported by validation rather than as a parse failure.
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(IntoResponse::into_response)?;
        parse_body(&bytes)
            .map(JsonBody)
            .map_err(IntoResponse::into_response)
    }
}

fn parse_body<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, AppError> {
    let parsed = if bytes.iter().all(u8::is_ascii_whitespace) {
        serde_json::from_slice(b"{}")
    } else {
        serde_json::from_slice(bytes)
    };
    parsed.map_err(|err| {
        tracing::debug!(error = %err, "rejected request body");
        AppError::Validation(vec![FieldError::new("body", format!("invalid JSON: {err}"))])
    })
}

/// Path parameters. A segment that does not parse is a 400 naming the segment.
#[derive(Debug)]
pub struct IdPath<T>(pub T);

impl<S, T> FromRequestParts<S> for IdPath<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(IdPath(value)),
            Err(rejection) => Err(path_error(rejection)),
        }
    }
}

fn path_error(rejection: PathRejection) -> AppError {
    let field = match &rejection {
        PathRejection::FailedToDeserializePathParams(err) => match err.kind() {
            ErrorKind::ParseErrorAtKey { key, .. } => key.clone(),
            _ => "path".to_string(),
        },
        _ => "path".to_string(),
    };
    tracing::debug!(%field, error = %rejection.body_text(), "rejected path");
    AppError::Validation(vec![FieldError::new(field, "must be an integer")])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::patients::CreatePatientRequest;

    #[test]
    fn blank_body_reads_as_empty_object() {
        let parsed: CreatePatientRequest = parse_body(b"").unwrap();
        assert!(parsed.name.is_none());
        let parsed: CreatePatientRequest = parse_body(b"  \n").unwrap();
        assert!(parsed.contact.is_none());
    }

    #[test]
    fn malformed_json_names_body() {
        let err = parse_body::<CreatePatientRequest>(b"{\"name\":").unwrap_err();
        let AppError::Validation(errors) = err else {
            panic!("expected validation error");
        };
        assert_eq!(errors[0].field, "body");
    }

    #[test]
    fn wrong_types_are_rejected() {
        assert!(parse_body::<CreatePatientRequest>(b"{\"name\": 5}").is_err());
    }
}
