// Request handling for both caller flows: HTML form and JSON API.
// Validation and storage live in service.rs; handlers.rs only shapes responses.

pub mod handlers;
pub mod service;
pub mod views;
