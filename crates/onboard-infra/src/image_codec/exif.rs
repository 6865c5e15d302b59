//! Minimal EXIF orientation extraction for JPEG payloads.
//!
//! Walks the JPEG segment stream for an APP1/Exif segment and reads the
//! orientation tag (0x0112) from IFD0. Anything malformed reads as "no
//! orientation" — the image is then used as decoded.

/// Orientation values per the EXIF spec; 1 means "as stored".
pub fn jpeg_orientation(bytes: &[u8]) -> Option<u8> {
    if !bytes.starts_with(&[0xFF, 0xD8]) {
        return None;
    }

    let mut pos = 2;
    while pos + 4 <= bytes.len() {
        if bytes[pos] != 0xFF {
            return None;
        }
        let marker = bytes[pos + 1];

        // Standalone markers carry no length field.
        if (0xD0..=0xD9).contains(&marker) {
            pos += 2;
            continue;
        }
        // Start of scan: entropy-coded data from here on.
        if marker == 0xDA {
            return None;
        }

        let len = u16::from_be_bytes([bytes[pos + 2], bytes[pos + 3]]) as usize;
        if len < 2 || pos + 2 + len > bytes.len() {
            return None;
        }

        if marker == 0xE1 {
            if let Some(orientation) = parse_exif_segment(&bytes[pos + 4..pos + 2 + len]) {
                return Some(orientation);
            }
        }

        pos += 2 + len;
    }
    None
}

fn parse_exif_segment(segment: &[u8]) -> Option<u8> {
    let tiff = segment.strip_prefix(b"Exif\0\0")?;
    if tiff.len() < 8 {
        return None;
    }

    let big_endian = match &tiff[0..2] {
        b"MM" => true,
        b"II" => false,
        _ => return None,
    };

    let read_u16 = |buf: &[u8]| -> u16 {
        if big_endian {
            u16::from_be_bytes([buf[0], buf[1]])
        } else {
            u16::from_le_bytes([buf[0], buf[1]])
        }
    };
    let read_u32 = |buf: &[u8]| -> u32 {
        if big_endian {
            u32::from_be_bytes([buf[0], buf[1], buf[2], buf[3]])
        } else {
            u32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]])
        }
    };

    if read_u16(&tiff[2..4]) != 42 {
        return None;
    }

    let ifd_offset = read_u32(&tiff[4..8]) as usize;
    if ifd_offset + 2 > tiff.len() {
        return None;
    }

    let count = read_u16(&tiff[ifd_offset..ifd_offset + 2]) as usize;
    for i in 0..count {
        let entry = ifd_offset + 2 + i * 12;
        if entry + 12 > tiff.len() {
            return None;
        }
        if read_u16(&tiff[entry..entry + 2]) == 0x0112 {
            let value = read_u16(&tiff[entry + 8..entry + 10]);
            return if (1..=8).contains(&value) {
                Some(value as u8)
            } else {
                None
            };
        }
    }
    None
}
