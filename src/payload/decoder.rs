//! # Uplink Frame Decoder
//!
//! Decodes binary status/GPS uplink frames into telemetry records.

use tracing::{debug, warn};

use super::protocol::*;
use crate::error::{DecoderError, Result};
use crate::uplink::Uplink;

/// Decode a complete binary uplink frame
///
/// # Arguments
///
/// * `frame` - Application payload bytes of one uplink (11-byte status header,
///   optionally followed by the 13-byte GPS extension)
///
/// # Returns
///
/// * `Result<DecodedRecord>` - Decoded record, or error if invalid
///
/// # Errors
///
/// Returns [`DecoderError::TooShort`] if the frame cannot hold the fixed
/// status header. The GPS extension is decoded only when the frame is at
/// least 24 bytes; frames of 11..=23 bytes are valid status-only frames and
/// any trailing bytes (including bytes beyond offset 23) are ignored.
pub fn decode_frame(frame: &[u8]) -> Result<DecodedRecord> {
    if frame.len() < STATUS_PAYLOAD_SIZE {
        return Err(DecoderError::TooShort {
            actual: frame.len(),
            required: STATUS_PAYLOAD_SIZE,
        });
    }

    let mut record = decode_status(frame)?;

    // No marker byte for the extension; presence is decided by length alone
    if frame.len() >= GPS_PAYLOAD_SIZE {
        record.gps = Some(decode_gps(&frame[STATUS_PAYLOAD_SIZE..])?);
    }

    Ok(record)
}

/// Decode an uplink envelope into a pipeline-ready outcome
///
/// Never panics and never returns an unhandled fault: every failure is
/// converted into the outcome's error list with empty data.
///
/// # Arguments
///
/// * `uplink` - The uplink envelope handed over by the message pipeline
///
/// # Returns
///
/// * `DecodeOutcome` - Record plus warnings on success, or a single
///   `"Decode error: ..."` entry with empty data on failure
pub fn decode_uplink(uplink: &Uplink) -> DecodeOutcome {
    match decode_frame(&uplink.bytes) {
        Ok(record) => {
            debug!(
                "Decoded uplink frame ({} bytes, gps: {})",
                uplink.bytes.len(),
                record.has_gps()
            );
            DecodeOutcome::success(record)
        }
        Err(error) => {
            warn!(
                "Failed to decode uplink frame ({} bytes): {}",
                uplink.bytes.len(),
                error
            );
            DecodeOutcome::failure(&error)
        }
    }
}

/// Decode the 11-byte fixed status header
///
/// Caller has already verified the frame holds at least
/// [`STATUS_PAYLOAD_SIZE`] bytes; the checked reads below only fail if the
/// layout constants drift out of sync with the readers.
fn decode_status(frame: &[u8]) -> Result<DecodedRecord> {
    // Uptime (4 bytes) - seconds as u32
    let uptime_seconds = u32::from_be_bytes(read_bytes(frame, 0)?);

    // Free heap (2 bytes) - KB as u16
    let free_memory_kb = u16::from_be_bytes(read_bytes(frame, 4)?);

    // RSSI (1 byte) - offset by 200 to fit in a u8 (so raw 111 = -89 dBm)
    let rssi_dbm = i16::from(read_byte(frame, 6)?) - RSSI_OFFSET_DBM;

    // SNR (1 byte) - quarter-dB steps, offset by 128
    let snr_db = (f32::from(read_byte(frame, 7)?) - SNR_OFFSET) / SNR_SCALE;

    // Battery voltage (2 bytes) - millivolts as u16
    let battery_mv = u16::from_be_bytes(read_bytes(frame, 8)?);
    let battery_voltage = f32::from(battery_mv) / BATTERY_MILLIVOLT_SCALE;

    // Battery percentage (1 byte)
    let battery_percentage = read_byte(frame, 10)?;

    Ok(DecodedRecord {
        uptime_seconds,
        free_memory_kb,
        rssi_dbm,
        snr_db,
        battery_voltage,
        battery_percentage,
        gps: None,
    })
}

/// Decode the 13-byte GPS extension
///
/// # Arguments
///
/// * `extension` - Frame bytes starting right after the status header
fn decode_gps(extension: &[u8]) -> Result<GpsFix> {
    // Latitude (4 bytes) - big-endian IEEE-754 float32, degrees
    let latitude = f32::from_be_bytes(read_bytes(extension, 0)?);

    // Longitude (4 bytes) - big-endian IEEE-754 float32, degrees
    let longitude = f32::from_be_bytes(read_bytes(extension, 4)?);

    // Altitude (4 bytes) - big-endian IEEE-754 float32, meters
    let altitude = f32::from_be_bytes(read_bytes(extension, 8)?);

    // Satellites (1 byte)
    let satellites = read_byte(extension, 12)?;

    Ok(GpsFix {
        latitude,
        longitude,
        altitude,
        satellites,
    })
}

/// Checked fixed-width read, mapping an out-of-range access to
/// [`DecoderError::Internal`] instead of panicking
fn read_bytes<const N: usize>(frame: &[u8], offset: usize) -> Result<[u8; N]> {
    frame
        .get(offset..offset + N)
        .and_then(|bytes| <[u8; N]>::try_from(bytes).ok())
        .ok_or_else(|| {
            DecoderError::Internal(format!(
                "read of {} bytes at offset {} past end of {}-byte frame",
                N,
                offset,
                frame.len()
            ))
        })
}

/// Checked single-byte read
fn read_byte(frame: &[u8], offset: usize) -> Result<u8> {
    Ok(read_bytes::<1>(frame, offset)?[0])
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 11-byte status-only fixture:
    /// uptime 123 s, 357 KB free, -89 dBm, -32.0 dB, 0.307 V, 100 %
    fn status_frame() -> Vec<u8> {
        vec![
            0x00, 0x00, 0x00, 0x7B, // uptime: 123 s
            0x01, 0x65, // free memory: 357 KB
            0x6F, // RSSI: 111 - 200 = -89 dBm
            0x00, // SNR: (0 - 128) / 4 = -32.0 dB
            0x01, 0x33, // battery: 307 mV
            0x64, // battery: 100 %
        ]
    }

    /// 24-byte fixture: status header plus a New York fix
    fn gps_frame() -> Vec<u8> {
        let mut frame = status_frame();
        frame.extend_from_slice(&40.712776_f32.to_be_bytes()); // latitude
        frame.extend_from_slice(&(-74.005974_f32).to_be_bytes()); // longitude
        frame.extend_from_slice(&10.0_f32.to_be_bytes()); // altitude
        frame.push(8); // satellites
        frame
    }

    #[test]
    fn test_decode_frame_too_short() {
        let result = decode_frame(&[]);
        assert_eq!(
            result,
            Err(DecoderError::TooShort {
                actual: 0,
                required: STATUS_PAYLOAD_SIZE,
            })
        );

        // One byte short of the fixed header
        let result = decode_frame(&[0u8; 10]);
        assert_eq!(
            result,
            Err(DecoderError::TooShort {
                actual: 10,
                required: STATUS_PAYLOAD_SIZE,
            })
        );
    }

    #[test]
    fn test_decode_status_fixture() {
        let record = decode_frame(&status_frame()).unwrap();

        assert_eq!(record.uptime_seconds, 123);
        assert_eq!(record.free_memory_kb, 357);
        assert_eq!(record.rssi_dbm, -89);
        assert!((record.snr_db - (-32.0)).abs() < 0.001);
        assert!((record.battery_voltage - 0.307).abs() < 0.0001);
        assert_eq!(record.battery_percentage, 100);
        assert!(!record.has_gps());
        assert_eq!(record.uptime_hours(), 0.03);
    }

    #[test]
    fn test_decode_frame_ignores_trailing_status_bytes() {
        // Lengths 12..=23 are status-only; the extra bytes are not decoded
        let mut frame = status_frame();
        frame.push(0xAA);

        let record = decode_frame(&frame).unwrap();
        assert_eq!(record, decode_frame(&status_frame()).unwrap());
        assert!(!record.has_gps());
    }

    #[test]
    fn test_decode_gps_fixture() {
        let record = decode_frame(&gps_frame()).unwrap();

        // Header decodes exactly as in the status-only case
        assert_eq!(record.uptime_seconds, 123);
        assert_eq!(record.battery_percentage, 100);

        assert!(record.has_gps());
        let gps = record.gps.unwrap();
        assert!((gps.latitude - 40.712776).abs() < 0.0001);
        assert!((gps.longitude - (-74.005974)).abs() < 0.0001);
        assert!((gps.altitude - 10.0).abs() < 0.001);
        assert_eq!(gps.satellites, 8);
    }

    #[test]
    fn test_gps_boundary_23_vs_24_bytes() {
        let full = gps_frame();

        // 23 bytes: one short of a complete extension, so status-only
        let record = decode_frame(&full[..23]).unwrap();
        assert!(!record.has_gps());
        assert_eq!(record.gps, None);

        // 24 bytes: extension decodes
        let record = decode_frame(&full).unwrap();
        assert!(record.has_gps());
    }

    #[test]
    fn test_decode_frame_ignores_bytes_beyond_gps() {
        let mut frame = gps_frame();
        frame.extend_from_slice(&[0xDE, 0xAD, 0xBE, 0xEF]);

        let record = decode_frame(&frame).unwrap();
        assert_eq!(record, decode_frame(&gps_frame()).unwrap());
    }

    #[test]
    fn test_rssi_full_range() {
        let mut frame = status_frame();

        frame[6] = 0x00;
        assert_eq!(decode_frame(&frame).unwrap().rssi_dbm, -200);

        frame[6] = 0xFF;
        assert_eq!(decode_frame(&frame).unwrap().rssi_dbm, 55);
    }

    #[test]
    fn test_snr_quarter_db_resolution() {
        let mut frame = status_frame();

        // 144 raw: (144 - 128) / 4 = 4.0 dB
        frame[7] = 144;
        assert!((decode_frame(&frame).unwrap().snr_db - 4.0).abs() < 0.001);

        // 129 raw: one quarter-dB step above zero
        frame[7] = 129;
        assert!((decode_frame(&frame).unwrap().snr_db - 0.25).abs() < 0.001);
    }

    #[test]
    fn test_decode_is_idempotent() {
        let frame = gps_frame();
        assert_eq!(decode_frame(&frame).unwrap(), decode_frame(&frame).unwrap());

        let uplink = Uplink::new(frame);
        assert_eq!(decode_uplink(&uplink), decode_uplink(&uplink));
    }

    #[test]
    fn test_decode_uplink_success() {
        let outcome = decode_uplink(&Uplink::new(status_frame()));

        assert!(outcome.is_success());
        assert!(outcome.errors().is_empty());
        assert!(outcome.warnings().is_empty());
        assert_eq!(outcome.data().unwrap().free_memory_kb, 357);
    }

    #[test]
    fn test_decode_uplink_too_short() {
        let outcome = decode_uplink(&Uplink::new(vec![0x01, 0x02, 0x03]));

        assert!(!outcome.is_success());
        assert_eq!(outcome.data(), None);
        assert!(outcome.warnings().is_empty());
        assert_eq!(
            outcome.errors(),
            &["Decode error: Payload too short for binary format: 3 bytes, need at least 11"]
        );
    }

    #[test]
    fn test_decode_uplink_ignores_envelope_metadata() {
        let mut uplink = Uplink::new(status_frame());
        uplink.f_port = Some(3);
        uplink.f_cnt = Some(1234);

        let outcome = decode_uplink(&uplink);
        assert_eq!(outcome, decode_uplink(&Uplink::new(status_frame())));
    }

    #[test]
    fn test_outcome_serializes_for_pipeline() {
        let outcome = decode_uplink(&Uplink::new(gps_frame()));
        let json = serde_json::to_value(&outcome).unwrap();

        assert_eq!(json["data"]["uptime_seconds"], 123);
        assert_eq!(json["data"]["has_gps"], true);
        assert_eq!(json["data"]["satellites"], 8);
        assert_eq!(json["warnings"].as_array().unwrap().len(), 0);
        assert_eq!(json["errors"].as_array().unwrap().len(), 0);
    }
}
