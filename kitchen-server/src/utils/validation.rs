//! Request validation
//!
//! [`ValidatedJson`] deserializes a JSON body and runs its `validator`
//! rules, rejecting with a `ValidationFailed` error either way.

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Json, Request};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use crate::utils::AppError;

/// JSON body that passed its `Validate` rules
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
            .map_err(rejection_error)?;
        value.validate().map_err(validation_error)?;
        Ok(ValidatedJson(value))
    }
}

fn rejection_error(rejection: JsonRejection) -> AppError {
    AppError::validation(format!("Invalid JSON body: {}", rejection.body_text()))
}

/// Flatten nested validator errors into `path: message` pairs
pub fn validation_error(errors: ValidationErrors) -> AppError {
    let mut fields = Vec::new();
    collect_errors("", &errors, &mut fields);
    let message = if fields.is_empty() {
        "Validation failed".to_string()
    } else {
        fields.join("; ")
    };
    AppError::validation(message).with_detail("fields", fields)
}

fn collect_errors(prefix: &str, errors: &ValidationErrors, out: &mut Vec<String>) {
    use validator::ValidationErrorsKind;

    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{prefix}.{field}")
        };
        match kind {
            ValidationErrorsKind::Field(list) => {
                for err in list {
                    let msg = err
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| err.code.to_string());
                    out.push(format!("{path}: {msg}"));
                }
            }
            ValidationErrorsKind::Struct(inner) => collect_errors(&path, inner, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect_errors(&format!("{path}[{index}]"), inner, out);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orders::{CreateOrderRequest, LineRequest};

    #[test]
    fn nested_line_errors_are_flattened() {
        let req = CreateOrderRequest::new(vec![LineRequest::food(1, 0)]);
        let errors = req.validate().unwrap_err();
        let err = validation_error(errors);
        assert_eq!(err.code, shared::error::ErrorCode::ValidationFailed);
        assert!(err.message.contains("items[0].qty"), "{}", err.message);
    }

    #[test]
    fn empty_items_reported() {
        let req = CreateOrderRequest::new(Vec::new());
        let err = validation_error(req.validate().unwrap_err());
        assert!(err.message.starts_with("items"), "{}", err.message);
    }
}
