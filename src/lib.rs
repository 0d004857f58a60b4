//! Domain Sweep - bulk RDAP domain availability checking
//!
//! Generates candidate domain names, probes each one against its registry's
//! RDAP server through a bounded worker pool, and reports the ones that are
//! free to register.

pub mod candidates;
pub mod error;
pub mod logging;
pub mod probe;
pub mod rdap;
pub mod report;
pub mod sweep;
pub mod types;

// Re-export commonly used types
pub use error::{Result, SweepError};
pub use types::{Candidate, ProbeConfig, ProbeReason, ProbeResult, SweepConfig, Verdict};

// Re-export main functionality
pub use candidates::CandidateBuilder;
pub use probe::{Probe, RdapProber};
pub use rdap::{classify, resolve, EndpointTable};
pub use sweep::{sweep, SweepReport, Sweeper};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the library
pub fn init() -> Result<()> {
    // Load .env file if it exists
    dotenv::dotenv().ok();
    Ok(())
}
