//! JSON API
//!
//! Client side of the server endpoints the page scripts call.

mod client;
mod error;

pub use client::{
    delete_food_intake, fetch_online_status, DeleteResponse, HttpClient, OnlineStatus, CSRF_HEADER,
};
pub use error::{ApiError, ApiResult};
