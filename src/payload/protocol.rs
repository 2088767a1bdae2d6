//! # Payload Layout Constants and Types
//!
//! Core definitions for the sniffer node's binary status/GPS uplink format.
//!
//! All multi-byte fields are big-endian, integers and floats alike. The frame
//! is a fixed 11-byte status header optionally followed by a 13-byte GPS
//! extension; there is no marker byte for the extension, presence is decided
//! purely by frame length.

use serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::error::DecoderError;

/// Fixed status header size in bytes
/// Layout: uptime(4) + free_memory(2) + rssi(1) + snr(1) + battery_mv(2) + battery_pct(1)
pub const STATUS_PAYLOAD_SIZE: usize = 11;

/// GPS extension size in bytes
/// Layout: latitude(4) + longitude(4) + altitude(4) + satellites(1)
pub const GPS_EXTENSION_SIZE: usize = 13;

/// Minimum frame size carrying a GPS extension (header + extension)
pub const GPS_PAYLOAD_SIZE: usize = STATUS_PAYLOAD_SIZE + GPS_EXTENSION_SIZE;

/// RSSI encoding offset: the node adds 200 so negative dBm fits a u8
/// (raw 0x00 = -200 dBm, raw 0xFF = 55 dBm)
pub const RSSI_OFFSET_DBM: i16 = 200;

/// SNR encoding offset applied before quarter-dB scaling
pub const SNR_OFFSET: f32 = 128.0;

/// SNR scale factor: raw units are quarter-dB steps
pub const SNR_SCALE: f32 = 4.0;

/// Battery voltage is transmitted in millivolts
pub const BATTERY_MILLIVOLT_SCALE: f32 = 1000.0;

/// GPS fix data from the optional frame extension
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GpsFix {
    /// Latitude in degrees
    pub latitude: f32,

    /// Longitude in degrees
    pub longitude: f32,

    /// Altitude in meters
    pub altitude: f32,

    /// Number of satellites in the fix
    pub satellites: u8,
}

/// Decoded telemetry record for one uplink frame
///
/// The GPS block is a single `Option` so that GPS-field presence and
/// [`DecodedRecord::has_gps`] cannot disagree; a legitimate fix at
/// latitude 0 is still a fix.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedRecord {
    /// Device uptime in seconds
    pub uptime_seconds: u32,

    /// Free heap memory in KB
    pub free_memory_kb: u16,

    /// RSSI of the last downlink in dBm (-200..=55)
    pub rssi_dbm: i16,

    /// SNR of the last downlink in dB, quarter-dB resolution
    pub snr_db: f32,

    /// Battery voltage in volts
    pub battery_voltage: f32,

    /// Battery charge percentage (0-100)
    pub battery_percentage: u8,

    /// GPS fix, present only when the frame carried the GPS extension
    pub gps: Option<GpsFix>,
}

impl DecodedRecord {
    /// Whether the frame carried a GPS extension
    pub fn has_gps(&self) -> bool {
        self.gps.is_some()
    }

    /// Device uptime in hours, rounded to two decimals
    ///
    /// Uses round-half-away-from-zero (`f64::round` semantics), so
    /// 18 seconds (0.005 hours exactly) rounds up to 0.01.
    pub fn uptime_hours(&self) -> f64 {
        (f64::from(self.uptime_seconds) / 3600.0 * 100.0).round() / 100.0
    }
}

impl Serialize for DecodedRecord {
    /// Serialize as a flat field map in wire order, with the derived
    /// `uptime_hours` and `has_gps` fields appended and the GPS fields
    /// omitted entirely for status-only frames.
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let field_count = if self.gps.is_some() { 12 } else { 8 };
        let mut state = serializer.serialize_struct("DecodedRecord", field_count)?;

        state.serialize_field("uptime_seconds", &self.uptime_seconds)?;
        state.serialize_field("free_memory_kb", &self.free_memory_kb)?;
        state.serialize_field("rssi_dbm", &self.rssi_dbm)?;
        state.serialize_field("snr_db", &self.snr_db)?;
        state.serialize_field("battery_voltage", &self.battery_voltage)?;
        state.serialize_field("battery_percentage", &self.battery_percentage)?;

        if let Some(gps) = &self.gps {
            state.serialize_field("latitude", &gps.latitude)?;
            state.serialize_field("longitude", &gps.longitude)?;
            state.serialize_field("altitude", &gps.altitude)?;
            state.serialize_field("satellites", &gps.satellites)?;
        }

        state.serialize_field("uptime_hours", &self.uptime_hours())?;
        state.serialize_field("has_gps", &self.has_gps())?;

        state.end()
    }
}

/// Result of decoding one uplink frame, shaped for the message pipeline
///
/// Either a decoded record with (currently always empty) warnings, or a fatal
/// failure with exactly one error entry and no record. The constructors are
/// the only way to build one, so a fatal error always pairs with empty data.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodeOutcome {
    data: Option<DecodedRecord>,
    warnings: Vec<String>,
    errors: Vec<String>,
}

impl DecodeOutcome {
    /// Successful decode
    pub fn success(record: DecodedRecord) -> Self {
        Self {
            data: Some(record),
            warnings: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Fatal decode failure; any fields decoded so far are discarded
    pub fn failure(error: &DecoderError) -> Self {
        Self {
            data: None,
            warnings: Vec::new(),
            errors: vec![format!("Decode error: {}", error)],
        }
    }

    /// Decoded record, or `None` on the failure path
    pub fn data(&self) -> Option<&DecodedRecord> {
        self.data.as_ref()
    }

    /// Non-fatal warnings, in decode order
    ///
    /// Currently always empty; retained for API stability (future cases like
    /// trailing undecoded bytes or GPS fields out of physical range).
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Fatal errors; non-empty only on the failure path, with one entry
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Whether a record was extracted
    pub fn is_success(&self) -> bool {
        self.data.is_some()
    }
}

impl Serialize for DecodeOutcome {
    /// Serialize as `{ "data": {...}, "warnings": [...], "errors": [...] }`
    /// with `data` an empty object (never `null`) on the failure path.
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("DecodeOutcome", 3)?;

        match &self.data {
            Some(record) => state.serialize_field("data", record)?,
            None => state.serialize_field("data", &serde_json::Map::new())?,
        }

        state.serialize_field("warnings", &self.warnings)?;
        state.serialize_field("errors", &self.errors)?;

        state.end()
    }
}
