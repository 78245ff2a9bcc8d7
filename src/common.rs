//! Report decoding shared by the sync and async drivers.
//!
//! The EXC7200 has no register map to speak of: the host reads a fixed-size
//! report from one register and everything else is bit fields inside it.

use crate::TouchSample;

// Bus protocol
pub(crate) const I2C_ADDR: u8 = 0x04;
pub(crate) const REPORT_REG: u8 = 0x09;

/// Length of one controller report, in bytes.
pub const REPORT_LEN: usize = 10;

/// The controller's native coordinate range on both axes.
pub const RAW_RANGE: u16 = 2048;

/// Report type tag carried in byte 0 of a multitouch report.
const REPORT_ID_MTOUCH: u8 = 0x04;

/// Byte 1, bit 0: contact pressed.
const PRESSED_MASK: u8 = 0x01;

/// Byte 1, bits 2..=6: contact identifier.
const CONTACT_ID_MASK: u8 = 0x7C;

/*
 -- Report layout --

 byte 0      report type tag
 byte 1      [7] unused  [6:2] contact id  [1] unused  [0] pressed
 bytes 2-3   X, little endian, low nibble is sub-pixel padding
 bytes 4-5   Y, same layout
 bytes 6-9   unused by this driver
*/

/// Decode one raw report.
///
/// Returns `None` unless the report is a multitouch report for the primary
/// contact; this is the defined outcome for foreign report types and for any
/// other contact, never an error. The controller interleaves reports for up
/// to 32 contacts, but only contact 0 is tracked.
pub fn decode(buf: &[u8; REPORT_LEN]) -> Option<TouchSample> {
    if buf[0] != REPORT_ID_MTOUCH {
        // ignore any other report type
        return None;
    }

    let pressed = (buf[1] & PRESSED_MASK) != 0;
    let contact_id = (buf[1] & CONTACT_ID_MASK) >> 2;

    if contact_id != 0 {
        // ignore any other contact
        return None;
    }

    let x = coord_from_bytes(buf[2], buf[3]);
    let y = coord_from_bytes(buf[4], buf[5]);

    Some(TouchSample {
        contact_id,
        pressed,
        x,
        y,
    })
}

/// Assemble one coordinate from its little-endian byte pair and discard the
/// sub-pixel padding nibble.
fn coord_from_bytes(lsb: u8, msb: u8) -> u16 {
    (u16::from(msb) << 8 | u16::from(lsb)) >> 4
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(bytes: &[u8]) -> [u8; REPORT_LEN] {
        let mut buf = [0u8; REPORT_LEN];
        buf[..bytes.len()].copy_from_slice(bytes);
        buf
    }

    #[test]
    fn foreign_report_types_are_ignored() {
        for tag in 0..=0xFFu8 {
            if tag == 0x04 {
                continue;
            }
            let buf = report(&[tag, 0x01, 0x00, 0x10, 0x00, 0x20]);
            assert_eq!(decode(&buf), None, "tag {tag:#04x}");
        }
    }

    #[test]
    fn non_primary_contacts_are_ignored() {
        for id in 1..=31u8 {
            let buf = report(&[0x04, (id << 2) | 0x01, 0x00, 0x10, 0x00, 0x20]);
            assert_eq!(decode(&buf), None, "contact {id}");
        }
    }

    #[test]
    fn decodes_primary_contact_press() {
        let buf = report(&[0x04, 0x01, 0x00, 0x10, 0x00, 0x20]);
        assert_eq!(
            decode(&buf),
            Some(TouchSample {
                contact_id: 0,
                pressed: true,
                x: 256,
                y: 512,
            })
        );
    }

    #[test]
    fn decodes_release() {
        let buf = report(&[0x04, 0x00, 0xFF, 0x7F, 0x34, 0x12]);
        let sample = decode(&buf).unwrap();
        assert!(!sample.pressed);
        assert_eq!(sample.x, 0x7FF);
        assert_eq!(sample.y, 0x123);
    }

    #[test]
    fn unused_bits_of_the_status_byte_are_ignored() {
        // Bits 1 and 7 are neither pressed nor contact id.
        let buf = report(&[0x04, 0x83, 0x00, 0x10, 0x00, 0x20]);
        let sample = decode(&buf).unwrap();
        assert_eq!(sample.contact_id, 0);
        assert!(sample.pressed);
    }

    #[test]
    fn sub_pixel_nibble_is_discarded() {
        let buf = report(&[0x04, 0x01, 0x0F, 0x10, 0x0F, 0x20]);
        let sample = decode(&buf).unwrap();
        assert_eq!(sample.x, 256);
        assert_eq!(sample.y, 512);
    }
}
