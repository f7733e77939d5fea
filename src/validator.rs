use anyhow::anyhow;
use axum::{
    Json,
    extract::{
        FromRequest, FromRequestParts, Path, Query, Request,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use schoolhub_core::AppError;

fn format_errors(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    let mut messages: Vec<String> = fields
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| {
                error
                    .message
                    .as_ref()
                    .map(|msg| msg.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field))
            })
        })
        .collect();
    // several rules on one field may share a message
    messages.dedup();
    messages.join(", ")
}

fn rejection_to_error(rejection: JsonRejection) -> AppError {
    let error_msg = rejection.body_text();

    if error_msg.contains("missing field") {
        let field = error_msg
            .split("missing field `")
            .nth(1)
            .and_then(|s| s.split('`').next())
            .unwrap_or("unknown");
        return AppError::bad_request(anyhow!("{} is required", field));
    }

    if let Some(detail) = error_msg.split("unknown variant ").nth(1) {
        let detail = detail.split(" at line").next().unwrap_or(detail);
        return AppError::bad_request(anyhow!("Invalid value {}", detail));
    }

    if error_msg.contains("invalid type") || error_msg.contains("invalid value") {
        return AppError::bad_request(anyhow!("Invalid field type in request"));
    }

    if matches!(rejection, JsonRejection::MissingJsonContentType(_)) {
        return AppError::bad_request(anyhow!("Missing 'Content-Type: application/json' header"));
    }

    AppError::bad_request(anyhow!("Invalid request body"))
}

/// JSON body extractor that runs `validator` rules.
///
/// Every rejection is a 400 with a message naming the offending field.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(rejection_to_error)?;

        value
            .validate()
            .map_err(|errors| AppError::bad_request(anyhow!("{}", format_errors(&errors))))?;

        Ok(ValidatedJson(value))
    }
}

/// Query-string extractor whose rejections use the JSON error envelope.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e: QueryRejection| {
                AppError::bad_request(anyhow!("Invalid query parameters: {}", e.body_text()))
            })?;
        Ok(ValidatedQuery(value))
    }
}

/// Path extractor whose rejections use the JSON error envelope.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedPath<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidatedPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| match e {
                PathRejection::FailedToDeserializePathParams(inner) => {
                    AppError::bad_request(anyhow!("Invalid path parameter: {}", inner.body_text()))
                }
                other => AppError::internal(anyhow!("{}", other.body_text())),
            })?;
        Ok(ValidatedPath(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{StatusCode, header};
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct Form {
        #[validate(length(min = 1, message = "name is required"))]
        name: String,
    }

    fn request(body: &str, json: bool) -> Request {
        let mut builder = Request::builder().method("POST").uri("/");
        if json {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    async fn extract(body: &str, json: bool) -> Result<ValidatedJson<Form>, AppError> {
        ValidatedJson::<Form>::from_request(request(body, json), &()).await
    }

    #[tokio::test]
    async fn test_missing_field_names_the_field() {
        let err = extract("{}", true).await.unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.error.to_string(), "name is required");
    }

    #[tokio::test]
    async fn test_validation_failure_is_bad_request() {
        let err = extract(r#"{"name":""}"#, true).await.unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.error.to_string(), "name is required");
    }

    #[tokio::test]
    async fn test_malformed_json() {
        let err = extract("{not json", true).await.unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_missing_content_type() {
        let err = extract(r#"{"name":"a"}"#, false).await.unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[derive(Debug, Deserialize)]
    struct Paging {
        limit: Option<i64>,
    }

    async fn extract_query(uri: &str) -> Result<ValidatedQuery<Paging>, AppError> {
        let (mut parts, _) = Request::builder().uri(uri).body(Body::empty()).unwrap().into_parts();
        ValidatedQuery::<Paging>::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn test_bad_query_is_bad_request() {
        let err = extract_query("/?limit=ten").await.unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert!(err.error.to_string().starts_with("Invalid query parameters"));
    }

    #[tokio::test]
    async fn test_query_parses() {
        let ValidatedQuery(paging) = extract_query("/?limit=5").await.unwrap();
        assert_eq!(paging.limit, Some(5));
    }

    #[test]
    fn test_repeated_rule_messages_are_merged() {
        #[derive(Debug, Deserialize, Validate)]
        struct Strict {
            #[validate(
                length(min = 1, message = "code is required"),
                custom(function = "schoolhub_models::validation::not_blank", message = "code is required")
            )]
            code: String,
        }
        let errors = Strict { code: String::new() }.validate().unwrap_err();
        assert_eq!(format_errors(&errors), "code is required");
    }

    #[tokio::test]
    async fn test_valid_body() {
        let ValidatedJson(form) = extract(r#"{"name":"Noy"}"#, true).await.unwrap();
        assert_eq!(form.name, "Noy");
    }
}
