//! RDAP endpoint lookup and response interpretation

pub mod classify;
pub mod registry;

pub use classify::{classify, is_not_found_error_object, Classification};
pub use registry::{resolve, top_level_suffix, EndpointTable};
