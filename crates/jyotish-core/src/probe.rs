//! Connectivity probe seam.
//!
//! The client checks reachability before each call, the way the original
//! browser host asked its runtime whether it was online. Hosts supply their
//! own probe; [`AlwaysOnline`] is the default for environments without a
//! meaningful offline signal.

use jyotish_types::error::ClientError;

/// Reachability check run before every outbound call.
///
/// Implementations live with the host (e.g., a WASM shim over the browser's
/// online flag). A failing check resolves to [`ClientError::Offline`].
pub trait ConnectivityProbe: Send + Sync {
    fn check(&self) -> impl std::future::Future<Output = Result<(), ClientError>> + Send;
}

/// Probe that never reports offline.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysOnline;

impl ConnectivityProbe for AlwaysOnline {
    async fn check(&self) -> Result<(), ClientError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn always_online_never_fails() {
        assert!(AlwaysOnline.check().await.is_ok());
    }
}
