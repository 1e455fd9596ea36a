//! HTTP surface
//!
//! Warp routes serving the "Register Patient" and "Get Report" views.

pub mod rest;

pub use rest::RestApi;
