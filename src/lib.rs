//! # LoRa Uplink Decoder Library
//!
//! Decodes the fixed binary status/GPS telemetry frame transmitted by the
//! LoRa gateway sniffer node into a structured record.
//!
//! This library provides a single pure decode operation: an application-server
//! pipeline (e.g. ChirpStack) hands it the application payload bytes of one
//! uplink message and receives back a structured outcome carrying the decoded
//! fields, warnings, and errors. There is no network stack, no persistence,
//! and no shared state; decode calls are independent and freely
//! parallelizable by the caller.

pub mod error;
pub mod payload;
pub mod uplink;

pub use error::{DecoderError, Result};
pub use payload::decoder::{decode_frame, decode_uplink};
pub use payload::protocol::{DecodeOutcome, DecodedRecord, GpsFix};
pub use uplink::Uplink;
