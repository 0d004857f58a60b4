//! Domain availability probing

pub mod rdap;

pub use rdap::RdapProber;

use crate::types::{Candidate, ProbeResult};
use async_trait::async_trait;

/// Something that can decide whether one candidate is available.
///
/// Infallible by signature: every failure mode must be folded into the
/// returned [`ProbeResult`]'s verdict and reason.
#[async_trait]
pub trait Probe: Send + Sync {
    async fn probe(&self, candidate: &Candidate) -> ProbeResult;
}
