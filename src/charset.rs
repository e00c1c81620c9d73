//! Single-byte target encodings.
//!
//! A dictionary blob stores each character in one byte when the target
//! charset can represent it, and falls back to a 3-byte escape otherwise.
//! The reader must decode with the same table, so [`Charset::c_tables`]
//! renders the mapping as C arrays that can be compiled into it.

use std::fmt::Write as _;

/// Byte reserved as the escape marker; never produced as a plain encoding.
pub const ESCAPE: u8 = 0xFF;

/// ISO-8859-7 bytes `0xA0..=0xFF`; `0` marks an undefined byte.
const GREEK_HIGH: [u16; 96] = [
    0x00A0, 0x2018, 0x2019, 0x00A3, 0x20AC, 0x20AF, 0x00A6, 0x00A7, // A0
    0x00A8, 0x00A9, 0x037A, 0x00AB, 0x00AC, 0x00AD, 0x0000, 0x2015, // A8
    0x00B0, 0x00B1, 0x00B2, 0x00B3, 0x0384, 0x0385, 0x0386, 0x00B7, // B0
    0x0388, 0x0389, 0x038A, 0x00BB, 0x038C, 0x00BD, 0x038E, 0x038F, // B8
    0x0390, 0x0391, 0x0392, 0x0393, 0x0394, 0x0395, 0x0396, 0x0397, // C0
    0x0398, 0x0399, 0x039A, 0x039B, 0x039C, 0x039D, 0x039E, 0x039F, // C8
    0x03A0, 0x03A1, 0x0000, 0x03A3, 0x03A4, 0x03A5, 0x03A6, 0x03A7, // D0
    0x03A8, 0x03A9, 0x03AA, 0x03AB, 0x03AC, 0x03AD, 0x03AE, 0x03AF, // D8
    0x03B0, 0x03B1, 0x03B2, 0x03B3, 0x03B4, 0x03B5, 0x03B6, 0x03B7, // E0
    0x03B8, 0x03B9, 0x03BA, 0x03BB, 0x03BC, 0x03BD, 0x03BE, 0x03BF, // E8
    0x03C0, 0x03C1, 0x03C2, 0x03C3, 0x03C4, 0x03C5, 0x03C6, 0x03C7, // F0
    0x03C8, 0x03C9, 0x03CA, 0x03CB, 0x03CC, 0x03CD, 0x03CE, 0x0000, // F8
];

/// A single-byte character encoding.
///
/// Bytes `0x00..=0x9F` map to the identical code points in every
/// supported charset; the charsets differ only in the upper 96 bytes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Charset {
    /// ISO-8859-1.
    Latin1,
    /// ISO-8859-7.
    #[default]
    Greek,
}

impl Charset {
    /// Encodes `c` as a single byte, or `None` when it needs the escape form.
    ///
    /// Never returns [`ESCAPE`].
    #[inline]
    pub fn encode(self, c: char) -> Option<u8> {
        let cp = c as u32;
        if cp < 0xA0 {
            return Some(cp as u8);
        }
        let byte = match self {
            Charset::Latin1 => u8::try_from(cp).ok()?,
            Charset::Greek => {
                let cp = u16::try_from(cp).ok()?;
                let idx = GREEK_HIGH.iter().position(|&u| u == cp)?;
                0xA0 + idx as u8
            }
        };
        (byte != ESCAPE).then_some(byte)
    }

    /// Decodes a single byte, or `None` when the byte is undefined.
    #[inline]
    pub fn decode(self, byte: u8) -> Option<char> {
        if byte < 0xA0 {
            return Some(byte as char);
        }
        match self {
            Charset::Latin1 => Some(byte as char),
            Charset::Greek => match GREEK_HIGH[(byte - 0xA0) as usize] {
                0 => None,
                u => char::from_u32(u as u32),
            },
        }
    }

    /// Renders the byte-to-code-point and code-point-to-byte tables as C.
    ///
    /// Undefined bytes map to `0`, and code points with no byte map to `0`.
    pub fn c_tables(self) -> String {
        let iso_to_unicode: Vec<u32> = (0..=255u8)
            .map(|b| self.decode(b).map_or(0, |c| c as u32))
            .collect();
        let max = iso_to_unicode.iter().copied().max().unwrap_or(0);
        let mut unicode_to_iso = vec![0u32; max as usize + 1];
        // First byte wins when two bytes decode to the same code point.
        for (byte, &cp) in iso_to_unicode.iter().enumerate().rev() {
            if cp != 0 || byte == 0 {
                unicode_to_iso[cp as usize] = byte as u32;
            }
        }

        let mut out = String::new();
        out.push_str("static unsigned short ISO_TO_UNICODE[] = {");
        push_hex_array(&mut out, &iso_to_unicode, 4, 8);
        out.push_str("\n};\n\n");
        out.push_str("static unsigned char UNICODE_TO_ISO[] = {");
        push_hex_array(&mut out, &unicode_to_iso, 2, 12);
        out.push_str("\n};\n");
        out
    }
}

fn push_hex_array(out: &mut String, values: &[u32], width: usize, per_line: usize) {
    for (i, v) in values.iter().enumerate() {
        if i % per_line == 0 {
            out.push_str("\n    ");
        } else {
            out.push(' ');
        }
        let _ = write!(out, "0x{v:0width$x},");
    }
}
