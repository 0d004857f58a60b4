//! RDAP response classification.
//!
//! Status code first, then the body when the status is 200: some registries
//! (Identity Digital among them) answer 200 for every query and signal a
//! missing domain with an embedded RDAP error object instead.

use serde_json::Value;

use crate::types::{ProbeReason, Verdict};

/// Verdict plus optional diagnostic for one HTTP response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub verdict: Verdict,
    pub reason: Option<ProbeReason>,
}

impl Classification {
    fn available() -> Self {
        Self {
            verdict: Verdict::Available,
            reason: None,
        }
    }

    fn registered() -> Self {
        Self {
            verdict: Verdict::Unavailable,
            reason: None,
        }
    }

    pub(crate) fn indeterminate(reason: ProbeReason) -> Self {
        Self {
            verdict: Verdict::Indeterminate,
            reason: Some(reason),
        }
    }
}

/// `errorCode` values that mean "no such domain object"
const NOT_FOUND_ERROR_CODES: &[u64] = &[400, 404];

/// Classify an RDAP response from its status code and raw body.
pub fn classify(status: u16, body: &[u8]) -> Classification {
    match status {
        404 => Classification::available(),
        429 => Classification::indeterminate(ProbeReason::RateLimited),
        200 => match serde_json::from_slice::<Value>(body) {
            Ok(json) if is_not_found_error_object(&json) => Classification::available(),
            Ok(_) => Classification::registered(),
            Err(_) => Classification::indeterminate(ProbeReason::MalformedBody),
        },
        other => Classification::indeterminate(ProbeReason::UnexpectedStatus(other)),
    }
}

/// True for `{"errorCode": 400|404, ...}`. Anything else is a negative match.
pub fn is_not_found_error_object(json: &Value) -> bool {
    json.as_object()
        .and_then(|obj| obj.get("errorCode"))
        .and_then(Value::as_u64)
        .is_some_and(|code| NOT_FOUND_ERROR_CODES.contains(&code))
}
