//! Bound form extractor - Combines deserialization with captured validation.

use axum::{
    async_trait,
    extract::{FromRequest, Request},
};
use axum_extra::extract::{Form, FormRejection};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::errors::AppError;
use crate::web::binding::BindingResult;

/// Form extractor that validates the payload without rejecting it.
///
/// Requests that cannot be deserialized at all are still rejected, but
/// validation failures are handed to the handler as a [`BindingResult`]
/// so the page can be re-rendered with its field errors and the values
/// the user already typed.
///
/// # Example
///
/// ```rust,ignore
/// async fn signup(BoundForm(form, binding): BoundForm<UserForm>) -> AppResult<View> {
///     if binding.has_errors() {
///         // re-render the form with binding.errors()
///     }
///     // form holds the submitted values either way
/// }
/// ```
pub struct BoundForm<T>(pub T, pub BindingResult);

#[async_trait]
impl<S, T> FromRequest<S> for BoundForm<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
    Form<T>: FromRequest<S, Rejection = FormRejection>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Form(value) = Form::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::bad_request(e.to_string()))?;

        let binding = match value.validate() {
            Ok(()) => BindingResult::clean(),
            Err(errors) => BindingResult::from_validation(&errors),
        };

        Ok(BoundForm(value, binding))
    }
}
