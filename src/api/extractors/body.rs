//! Request body extractor accepting JSON or url-encoded forms.

use axum::{
    Form, Json,
    extract::{FromRequest, Request},
    http::header::CONTENT_TYPE,
};
use serde::de::DeserializeOwned;

use crate::error::AppError;

/// Body decoded from `application/json` or `application/x-www-form-urlencoded`.
///
/// The content type picks the decoder; anything that is not JSON is read as a
/// form. Rejections are reported as `AppError::BadRequest`.
#[derive(Debug, Clone)]
pub struct JsonOrForm<T>(pub T);

impl<S, T> FromRequest<S> for JsonOrForm<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.to_ascii_lowercase().contains("json"));

        if is_json {
            let Json(value) = Json::<T>::from_request(req, state)
                .await
                .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
            Ok(Self(value))
        } else {
            let Form(value) = Form::<T>::from_request(req, state)
                .await
                .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
            Ok(Self(value))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Payload {
        url: String,
    }

    fn request(content_type: Option<&str>, body: &'static str) -> Request {
        let mut builder = Request::builder().method("POST").uri("/");
        if let Some(content_type) = content_type {
            builder = builder.header(CONTENT_TYPE, content_type);
        }
        builder.body(Body::from(body)).unwrap()
    }

    #[tokio::test]
    async fn test_json_body() {
        let req = request(Some("application/json"), r#"{"url":"https://example.com"}"#);
        let JsonOrForm(payload) = JsonOrForm::<Payload>::from_request(req, &()).await.unwrap();
        assert_eq!(payload.url, "https://example.com");
    }

    #[tokio::test]
    async fn test_form_body() {
        let req = request(
            Some("application/x-www-form-urlencoded"),
            "url=https%3A%2F%2Fexample.com",
        );
        let JsonOrForm(payload) = JsonOrForm::<Payload>::from_request(req, &()).await.unwrap();
        assert_eq!(payload.url, "https://example.com");
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let req = request(Some("application/json"), "{not json");
        let result = JsonOrForm::<Payload>::from_request(req, &()).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_missing_content_type_is_bad_request() {
        let req = request(None, "url=x");
        let result = JsonOrForm::<Payload>::from_request(req, &()).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }
}
