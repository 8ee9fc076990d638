//! Request / response DTO types.
//!
//! Used by the Axum handlers for JSON (de)serialisation and annotated with
//! [`utoipa`] attributes to generate the OpenAPI document.

pub mod chat;
