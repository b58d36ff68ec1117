use axum::response::Response;
use pretty_assertions::assert_eq;

use crate::error::ErrorCode;

pub async fn response_to_string<T: hyper::body::HttpBody>(response: Response<T>) -> String
where
    T::Error: std::fmt::Debug,
{
    let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn response_to_json<T: hyper::body::HttpBody>(response: Response<T>) -> serde_json::Value
where
    T::Error: std::fmt::Debug,
{
    let string = response_to_string(response).await;
    serde_json::from_str(&string).unwrap()
}

pub fn error_to_json(err: ErrorCode) -> serde_json::Value {
    serde_json::to_value(err.details()).unwrap()
}

pub async fn assert_response_is_error<T: hyper::body::HttpBody>(
    response: Response<T>,
    error: ErrorCode,
) where
    T::Error: std::fmt::Debug,
{
    let data = response_to_json(response).await;
    assert_eq!(data, error_to_json(error));
}
