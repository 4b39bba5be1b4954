//! Survey response and grading model for a survey administration tool.
//!
//! The model tracks which clients have answered which surveys, classifies each
//! (client, survey) pair as in progress or awaiting grading, and keeps the
//! reviewer's per-question grades and follow-up tasks. Storage, ids and time
//! are injected collaborators.

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod model;
pub mod seed;
pub mod services;

pub use error::{ModelError, ModelResult};
pub use model::{ModelSnapshot, SurveyResponseModel};
