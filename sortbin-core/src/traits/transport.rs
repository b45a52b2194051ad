//! External alert transport abstraction
//!
//! A store-and-forward text message over a command-style serial channel.
//! The channel has no acknowledgment path, so the loop treats sends as
//! fire-and-forget: the returned error is the seam where a transport
//! with delivery confirmation would report, and the one-shot alert gate
//! does not retry on failure.

/// Errors that can occur sending an alert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransportError {
    /// Serial write failed or the channel refused data
    Serial,
    /// Message exceeds what the transport can frame
    MessageTooLong,
}

/// Trait for the external notification channel
pub trait AlertTransport {
    /// Send a short text alert to the configured destination
    fn send_alert(&mut self, text: &str) -> Result<(), TransportError>;
}
