//! HTTP route handlers.

pub mod companies;
pub mod favorites;
pub mod gateways;
pub mod health;
pub mod quotes;
pub mod rates;
pub mod settings;

use serde::Serialize;

/// Envelope for collection responses.
#[derive(Debug, Serialize)]
pub struct ListResponse<T> {
    pub data: Vec<T>,
    pub count: usize,
}

impl<T> From<Vec<T>> for ListResponse<T> {
    fn from(data: Vec<T>) -> Self {
        Self {
            count: data.len(),
            data,
        }
    }
}
