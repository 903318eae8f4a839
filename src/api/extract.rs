//! Extractors that report their rejections through [`AppError`].

use async_trait::async_trait;
use axum::{
    extract::{
        path::ErrorKind,
        rejection::{JsonRejection, PathRejection},
        FromRequest, FromRequestParts, Path, Request,
    },
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;

use crate::advice::AppError;
use crate::errors::Validate;

/// Error code attached to path and query parameters that fail to parse
pub const TYPE_MISMATCH: &str = "typeMismatch";

/// JSON body that must pass [`Validate`]
#[derive(Debug, Clone)]
pub struct ValidJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned + Validate + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        value
            .validate()
            .into_result()
            .map_err(AppError::ArgumentNotValid)?;
        Ok(Self(value))
    }
}

/// Query string that must pass [`Validate`]
#[derive(Debug, Clone)]
pub struct ValidQuery<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ValidQuery<T>
where
    T: DeserializeOwned + Validate + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value: T = parse_query(parts.uri.query().unwrap_or_default())?;
        value.validate().into_result().map_err(AppError::Bind)?;
        Ok(Self(value))
    }
}

/// Path parameters; parse failures become type mismatches
#[derive(Debug, Clone)]
pub struct PathParams<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for PathParams<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state).await?;
        Ok(Self(value))
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::IllegalArgument(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        if let PathRejection::FailedToDeserializePathParams(inner) = &rejection {
            match inner.kind() {
                ErrorKind::ParseErrorAtKey { key, value, .. } => {
                    return AppError::TypeMismatch {
                        name: key.clone(),
                        value: Some(value.clone()),
                        error_code: TYPE_MISMATCH.to_string(),
                    };
                }
                ErrorKind::ParseErrorAtIndex { index, value, .. } => {
                    return AppError::TypeMismatch {
                        name: index.to_string(),
                        value: Some(value.clone()),
                        error_code: TYPE_MISMATCH.to_string(),
                    };
                }
                _ => {}
            }
        }
        AppError::IllegalArgument(rejection.body_text())
    }
}

/// Deserialize a query string, naming the parameter that failed
fn parse_query<T: DeserializeOwned>(query: &str) -> Result<T, AppError> {
    let deserializer = serde_urlencoded::Deserializer::new(form_urlencoded::parse(query.as_bytes()));
    serde_path_to_error::deserialize(deserializer).map_err(|err| {
        let message = err.inner().to_string();
        if let Some(name) = missing_field(&message) {
            return AppError::MissingParameter { name };
        }
        let name = err.path().to_string();
        match raw_value(query, &name) {
            Some(value) => AppError::TypeMismatch {
                name,
                value: Some(value),
                error_code: TYPE_MISMATCH.to_string(),
            },
            None => AppError::IllegalArgument(message),
        }
    })
}

/// First decoded value of `name` in a query string
fn raw_value(query: &str, name: &str) -> Option<String> {
    serde_urlencoded::from_str::<Vec<(String, String)>>(query)
        .ok()?
        .into_iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value)
}

/// Field name out of a serde "missing field `name`" message
fn missing_field(message: &str) -> Option<String> {
    let rest = message.split("missing field `").nth(1)?;
    rest.split('`')
        .next()
        .filter(|name| !name.is_empty())
        .map(ToString::to_string)
}
