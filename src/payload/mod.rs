//! # Binary Payload Format Module
//!
//! Implementation of the sniffer node's fixed binary status/GPS uplink format.
//!
//! This module handles:
//! - Layout constants for the 11-byte status header and 13-byte GPS extension
//! - Decoding of header fields (offsets, widths, scaling, sign conventions)
//! - Optional-section detection for the GPS extension
//! - Shaping the decode result into a pipeline-friendly outcome

pub mod decoder;
pub mod protocol;
