//! Byte-order-mark sniffing and text decoding for meta files.

/// Text encodings recognized from a byte-order mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Utf8,
    Utf16Le,
    Utf16Be,
    Utf32Le,
    Utf32Be,
}

/// Detect a byte-order mark at the start of `bytes`.
///
/// Returns the encoding and the length of the mark. UTF-32LE is checked
/// before UTF-16LE since both start with `FF FE`.
pub fn sniff_bom(bytes: &[u8]) -> Option<(Encoding, usize)> {
    match bytes {
        [0xEF, 0xBB, 0xBF, ..] => Some((Encoding::Utf8, 3)),
        [0xFF, 0xFE, 0x00, 0x00, ..] => Some((Encoding::Utf32Le, 4)),
        [0xFF, 0xFE, ..] => Some((Encoding::Utf16Le, 2)),
        [0xFE, 0xFF, ..] => Some((Encoding::Utf16Be, 2)),
        [0x00, 0x00, 0xFE, 0xFF, ..] => Some((Encoding::Utf32Be, 4)),
        _ => None,
    }
}

/// Decode raw file contents, honouring a leading byte-order mark.
///
/// Without a mark the contents are read as UTF-8. Invalid sequences are
/// replaced with U+FFFD rather than failing.
pub fn decode_text(bytes: &[u8]) -> String {
    let Some((encoding, bom_len)) = sniff_bom(bytes) else {
        return String::from_utf8_lossy(bytes).into_owned();
    };

    let body = &bytes[bom_len..];
    match encoding {
        Encoding::Utf8 => String::from_utf8_lossy(body).into_owned(),
        Encoding::Utf16Le => decode_utf16(body, u16::from_le_bytes),
        Encoding::Utf16Be => decode_utf16(body, u16::from_be_bytes),
        Encoding::Utf32Le => decode_utf32(body, u32::from_le_bytes),
        Encoding::Utf32Be => decode_utf32(body, u32::from_be_bytes),
    }
}

fn decode_utf16(body: &[u8], unit: fn([u8; 2]) -> u16) -> String {
    let units = body.chunks_exact(2).map(|pair| unit([pair[0], pair[1]]));
    let mut text: String = char::decode_utf16(units)
        .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect();
    if body.len() % 2 != 0 {
        text.push(char::REPLACEMENT_CHARACTER);
    }
    text
}

fn decode_utf32(body: &[u8], unit: fn([u8; 4]) -> u32) -> String {
    let mut text: String = body
        .chunks_exact(4)
        .map(|quad| unit([quad[0], quad[1], quad[2], quad[3]]))
        .map(|code| char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect();
    if body.len() % 4 != 0 {
        text.push(char::REPLACEMENT_CHARACTER);
    }
    text
}
