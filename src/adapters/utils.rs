//! Shared helpers for the HTTP and CLI adapters.

use std::time::Duration;

use crate::error::AdapterError;

/// One blocking `ureq` agent per adapter, with a whole-request timeout.
pub(super) fn agent(timeout: Duration) -> ureq::Agent {
    ureq::AgentBuilder::new()
        .timeout(timeout)
        .user_agent(concat!("smarthome/", env!("CARGO_PKG_VERSION")))
        .build()
}

/// Collapse a `ureq` failure into the adapter taxonomy.
pub(super) fn http_error(e: ureq::Error) -> AdapterError {
    match e {
        ureq::Error::Status(code, _) => AdapterError::Status(code),
        ureq::Error::Transport(t) => AdapterError::Http(t.to_string()),
    }
}

/// Trim a URL's trailing slash so paths can be appended with `/`.
pub(super) fn base(url: &str) -> &str {
    url.trim_end_matches('/')
}
