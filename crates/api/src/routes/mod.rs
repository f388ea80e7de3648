pub mod access;
pub mod auth;
pub mod dues;
pub mod events;
pub mod expenses;
pub mod export;
pub mod members;
pub mod notifications;
pub mod rsvps;
pub mod seasons;
pub mod teams;

use axum::Json;
use serde::Serialize;

/// Success envelope. Every route returns `{"data": ...}`; failures go
/// through `AppError` and come back as `{"error": "..."}`.
#[derive(Serialize)]
pub struct Data<T> {
    pub data: T,
}

pub fn data<T: Serialize>(value: T) -> Json<Data<T>> {
    Json(Data { data: value })
}
