//! Content encoding
//!
//! Decides whether raw bytes can be stored as plain text lines or must be
//! base64-encoded, and chunks encoded content to the data line width.
//!
//! Plain text is only chosen when it reproduces the input exactly: every byte
//! is printable ASCII (or tab / CR / LF), the payload ends with a newline, and
//! no line is wider than [`DATA_WIDTH`]. Everything else is encoded.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use super::record::DATA_WIDTH;

/// Content lines ready to be stored in an entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedContent {
    /// Plain lines (with their `\n` terminators) or base64 chunks
    pub lines: Vec<String>,
    /// Whether `lines` are base64 chunks
    pub is_encoded: bool,
}

/// Encode raw bytes into storable content lines
pub fn encode_content(bytes: &[u8]) -> EncodedContent {
    if is_plain_text(bytes) {
        // Every byte is ASCII, so this cannot fail.
        let text = String::from_utf8_lossy(bytes);
        EncodedContent {
            lines: split_lines(&text),
            is_encoded: false,
        }
    } else {
        let encoded = STANDARD.encode(bytes);
        EncodedContent {
            lines: chunk(&encoded, DATA_WIDTH),
            is_encoded: true,
        }
    }
}

/// Reassemble the original bytes from content lines
pub fn decode_content(lines: &[String], is_encoded: bool) -> Result<Vec<u8>, base64::DecodeError> {
    if is_encoded {
        STANDARD.decode(lines.concat())
    } else {
        Ok(lines.concat().into_bytes())
    }
}

/// Check whether bytes can be kept verbatim as text lines
pub fn is_plain_text(bytes: &[u8]) -> bool {
    if bytes.is_empty() {
        return true;
    }
    if !bytes.iter().all(|&b| is_printable(b)) || bytes.last() != Some(&b'\n') {
        return false;
    }
    bytes
        .split(|&b| b == b'\n')
        .all(|line| line.len() <= DATA_WIDTH)
}

fn is_printable(byte: u8) -> bool {
    matches!(byte, b' '..=b'~' | b'\t' | b'\r' | b'\n')
}

/// Split text into lines, keeping each `\n` terminator
pub fn split_lines(text: &str) -> Vec<String> {
    text.split_inclusive('\n').map(str::to_string).collect()
}

/// Split an ASCII string into consecutive chunks of at most `width` characters
pub fn chunk(encoded: &str, width: usize) -> Vec<String> {
    encoded
        .as_bytes()
        .chunks(width)
        .map(|piece| String::from_utf8_lossy(piece).into_owned())
        .collect()
}
