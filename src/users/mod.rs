// Account profile module
// Self-service profile operations for logged-in users plus the admin listing

pub mod handlers;
pub mod models;

pub use models::UpdateMeRequest;
