//! Text encoding for ESC/POS printers
//!
//! Generic ESC/POS printers sold alongside WooFood setups run in GBK
//! "Chinese mode". Command bytes are always ASCII, so the conversion keeps
//! every byte below 0x80 untouched and only re-encodes runs of UTF-8 text.

use tracing::instrument;

/// FS & + FS C 1: enter Chinese mode, GBK code page
const ENTER_CHINESE: [u8; 5] = [0x1C, 0x26, 0x1C, 0x43, 0x01];
/// FS .: leave Chinese mode
const EXIT_CHINESE: [u8; 2] = [0x1C, 0x2E];
/// Leave Chinese mode, select PC858, print €, re-enter Chinese mode
const EURO_SEQUENCE: [u8; 8] = [0x1C, 0x2E, 0x1B, 0x74, 19, 0xD5, 0x1C, 0x26];

/// Convert mixed UTF-8 content (with ESC/POS commands) to GBK.
///
/// - Chinese mode is re-enabled after every `ESC @`, which clears it.
/// - `€` has no GBK code point and is printed through PC858.
/// - Characters GBK cannot represent become `?`.
#[instrument(skip(bytes), fields(len = bytes.len()))]
pub fn convert_to_gbk(bytes: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(bytes.len() * 2);
    out.extend_from_slice(&ENTER_CHINESE);

    let mut pending = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];

        if b == 0x1B && bytes.get(i + 1) == Some(&0x40) {
            flush_text(&mut pending, &mut out);
            out.extend_from_slice(&[0x1B, 0x40]);
            out.extend_from_slice(&ENTER_CHINESE[..2]);
            i += 2;
            continue;
        }

        if b < 0x80 {
            flush_text(&mut pending, &mut out);
            out.push(b);
        } else {
            pending.push(b);
        }
        i += 1;
    }
    flush_text(&mut pending, &mut out);

    out.extend_from_slice(&EXIT_CHINESE);
    out
}

fn flush_text(pending: &mut Vec<u8>, out: &mut Vec<u8>) {
    if pending.is_empty() {
        return;
    }

    let text = String::from_utf8_lossy(pending);
    let mut first = true;
    for part in text.split('€') {
        if !first {
            out.extend_from_slice(&EURO_SEQUENCE);
        }
        first = false;
        encode_gbk_lossy(part, out);
    }
    pending.clear();
}

/// GBK-encode `s`, replacing unmappable characters with `?` instead of the
/// HTML entities `encoding_rs` would emit
fn encode_gbk_lossy(s: &str, out: &mut Vec<u8>) {
    let mut buf = [0u8; 4];
    for c in s.chars() {
        let (bytes, _, unmappable) = encoding_rs::GBK.encode(c.encode_utf8(&mut buf));
        if unmappable {
            out.push(b'?');
        } else {
            out.extend_from_slice(&bytes);
        }
    }
}
