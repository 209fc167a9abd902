use std::fmt::Display;

use crate::error::AppError;

pub trait IntoInternal<T> {
    fn into_internal(self, context: &'static str) -> Result<T, AppError>;
}

impl<T, E: Display> IntoInternal<T> for Result<T, E> {
    fn into_internal(self, context: &'static str) -> Result<T, AppError> {
        self.map_err(|e| AppError::Internal(anyhow::anyhow!("{context}: {e}")))
    }
}
