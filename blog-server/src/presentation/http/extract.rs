use axum::extract::{FromRequestParts, Path, Query};

use super::app_error::AppError;

/// `Path` whose rejections render as this API's JSON errors.
#[derive(Debug, FromRequestParts)]
#[from_request(via(Path), rejection(AppError))]
pub(crate) struct ApiPath<T>(pub(crate) T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(Query), rejection(AppError))]
pub(crate) struct ApiQuery<T>(pub(crate) T);
