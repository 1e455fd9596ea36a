//! ECGenius: patient registration and ECG prediction report portal
//!
//! ECGenius is a small web front end over a remote prediction service. It
//! registers patients against existing ECG predictions and renders finished
//! prediction reports as an HTML page and a downloadable PDF.

pub mod api;
pub mod client;
pub mod config;
pub mod controller;
pub mod document;
pub mod error;
pub mod form;
pub mod plot;
pub mod report;
pub mod view;

pub use error::EcgError;
