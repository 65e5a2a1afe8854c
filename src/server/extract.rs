//! Request body extraction.
//!
//! Grocy sends label data as JSON or as a urlencoded form depending on how
//! the webhook is configured; preview links put the same fields in the query
//! string. All three decode into a [`LabelRecord`].

use async_trait::async_trait;
use axum::{
    extract::{rejection::FormRejection, FromRequest, Query, Request},
    http::{header, HeaderMap, Method},
    Form, Json,
};

use super::handlers::ApiError;
use crate::record::LabelRecord;

/// A label record read from the query (GET), a JSON body or a form body.
#[derive(Debug)]
pub struct LabelPayload(pub LabelRecord);

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(|mime| {
            let mime = mime.trim();
            mime.eq_ignore_ascii_case("application/json") || mime.ends_with("+json")
        })
        .unwrap_or(false)
}

#[async_trait]
impl<S> FromRequest<S> for LabelPayload
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if req.method() == Method::GET {
            let Query(record) = Query::<LabelRecord>::from_request(req, state)
                .await
                .map_err(|e| ApiError::bad_request(e.body_text()))?;
            return Ok(Self(record));
        }

        if is_json(req.headers()) {
            let Json(record) = Json::<LabelRecord>::from_request(req, state)
                .await
                .map_err(|e| ApiError::bad_request(e.body_text()))?;
            return Ok(Self(record));
        }

        match Form::<LabelRecord>::from_request(req, state).await {
            Ok(Form(record)) => Ok(Self(record)),
            // Neither JSON nor a form: nothing usable was sent
            Err(FormRejection::InvalidFormContentType(_)) => Ok(Self(LabelRecord::default())),
            Err(e) => Err(ApiError::bad_request(e.body_text())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_json_content_types() {
        let mut headers = HeaderMap::new();
        assert!(!is_json(&headers));

        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
        assert!(is_json(&headers));

        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json; charset=utf-8"),
        );
        assert!(is_json(&headers));

        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/x-www-form-urlencoded"),
        );
        assert!(!is_json(&headers));
    }
}
