//! Client for the BOQ (bill of quantities) analysis service.
//!
//! The service takes a free-text requirement plus one or more drawings and
//! answers with an opaque JSON analysis. This crate validates the submission,
//! posts it as multipart form data and hands the JSON back untouched.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod client;
pub mod config;
pub mod error;
pub mod report;
pub mod request;

pub use client::BoqClient;
pub use config::{BoqConfig, ConfigError};
pub use error::BoqError;
pub use report::{default_report_name, format_file_size, write_report};
pub use request::{BoqFile, BoqRequest, FileFormat};
