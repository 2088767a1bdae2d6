//! # Uplink Envelope
//!
//! Input envelope for one received uplink message.
//!
//! The message pipeline delivers the application payload inside a small JSON
//! envelope. Only the `bytes` field matters to the decoder; port number and
//! frame counter are accepted so the envelope deserializes cleanly, but the
//! decoder ignores them (any further unknown envelope fields are ignored by
//! serde as usual).

use serde::Deserialize;

/// One uplink message as handed over by the message pipeline
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Uplink {
    /// Application payload bytes of this uplink
    pub bytes: Vec<u8>,

    /// LoRaWAN FPort the uplink arrived on, if the pipeline provides it
    #[serde(default)]
    pub f_port: Option<u8>,

    /// Uplink frame counter, if the pipeline provides it
    #[serde(default)]
    pub f_cnt: Option<u32>,
}

impl Uplink {
    /// Wrap a raw payload buffer in an envelope without pipeline metadata
    pub fn new(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            f_port: None,
            f_cnt: None,
        }
    }
}
