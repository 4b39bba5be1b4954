//! Domain types
//!
//! These types define the survey, response and grading data structures.

pub mod grades;
pub mod questions;
pub mod responses;
pub mod status;
pub mod surveys;

// Re-export commonly used types
pub use grades::*;
pub use questions::*;
pub use responses::*;
pub use status::*;
pub use surveys::*;
