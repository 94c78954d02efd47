//! Query-string extractor for filter-accepting endpoints
//!
//! `filter` and `where` travel as JSON-valued parameters. Keys in bracket
//! notation (`where[rating][lt]=3`) are rejected rather than ignored, so a
//! bulk update can never run unfiltered by accident.

use axum::{
    async_trait,
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use serde::de::DeserializeOwned;

use crate::domain::DomainError;

/// Like `Query<T>`, but every failure uses the common error envelope.
#[derive(Debug)]
pub struct QueryParams<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for QueryParams<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = DomainError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Query(pairs) = Query::<Vec<(String, String)>>::try_from_uri(&parts.uri)
            .map_err(|e| DomainError::invalid_parameter("query", e.body_text()))?;
        if let Some(key) = pairs.iter().map(|(key, _)| key).find(|key| key.contains('[')) {
            let name = key.split('[').next().unwrap_or_default();
            return Err(DomainError::invalid_parameter(
                name,
                format!("bracket notation \"{}\" is not supported, pass the value as JSON", key),
            ));
        }

        let Query(params) = Query::<T>::try_from_uri(&parts.uri)
            .map_err(|e| DomainError::invalid_parameter("query", e.body_text()))?;
        Ok(QueryParams(params))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Params {
        filter: Option<String>,
    }

    async fn extract(uri: &str) -> Result<QueryParams<Params>, DomainError> {
        let (mut parts, _) = Request::builder().uri(uri).body(()).unwrap().into_parts();
        QueryParams::<Params>::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn json_parameter_is_passed_through() {
        let QueryParams(params) = extract("/x?filter=%7B%7D").await.unwrap();
        assert_eq!(params.filter.as_deref(), Some("{}"));

        let QueryParams(params) = extract("/x").await.unwrap();
        assert!(params.filter.is_none());
    }

    #[tokio::test]
    async fn bracket_keys_are_rejected() {
        let err = extract("/x?where%5Brating%5D%5Blt%5D=3").await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidParameter { ref name, .. } if name == "where"));

        let err = extract("/x?filter%5Blimit%5D=1").await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidParameter { ref name, .. } if name == "filter"));
    }

    #[tokio::test]
    async fn duplicate_parameters_are_invalid() {
        let err = extract("/x?filter=%7B%7D&filter=%7B%7D").await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidParameter { .. }));
    }
}
