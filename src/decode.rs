//! Byte-to-text decoding following the CSS Syntax Level 3 "decode a stylesheet's bytes"
//! fallback chain, backed by the WHATWG Encoding Standard via `encoding_rs`.
//!
//! Grounded on `gosub_shared::byte_stream::ByteStream::detect_encoding`, generalized to the
//! spec's full `@charset` / protocol / environment fallback order instead of the teacher's
//! narrower BOM+sniff check.

use encoding_rs::{Encoding, UTF_8};

/// Decode `bytes` into a `String`, resolving the text encoding per the CSS Syntax Level 3
/// fallback chain: BOM, then `protocol_encoding`, then a leading `@charset "…";` rule, then
/// `environment_encoding`, then UTF-8.
///
/// This never fails: undecodable byte sequences are replaced with U+FFFD by `encoding_rs`,
/// matching the spec's "decode a stylesheet's bytes" return value, which is always a string.
pub fn decode_stylesheet_bytes(
    bytes: &[u8],
    protocol_encoding: Option<&str>,
    environment_encoding: Option<&str>,
) -> String {
    if let Some((encoding, rest)) = bom_encoding(bytes) {
        let (text, _, _) = encoding.decode(rest);
        return text.into_owned();
    }

    if let Some(label) = protocol_encoding {
        if let Some(encoding) = Encoding::for_label(label.as_bytes()) {
            let (text, _, _) = encoding.decode(bytes);
            return text.into_owned();
        }
    }

    if let Some(label) = sniff_charset_rule(bytes) {
        if let Some(encoding) = Encoding::for_label(label.as_bytes()) {
            let (text, _, _) = encoding.decode(bytes);
            return text.into_owned();
        }
    }

    if let Some(label) = environment_encoding {
        if let Some(encoding) = Encoding::for_label(label.as_bytes()) {
            let (text, _, _) = encoding.decode(bytes);
            return text.into_owned();
        }
    }

    let (text, _, _) = UTF_8.decode(bytes);
    text.into_owned()
}

/// Recognize a leading byte-order-mark and return the matching encoding plus the remaining
/// bytes (with the BOM itself stripped, as `encoding_rs` expects for UTF-8 but not for the
/// UTF-16 variants, which consume it as part of decoding).
fn bom_encoding(bytes: &[u8]) -> Option<(&'static Encoding, &[u8])> {
    if bytes.starts_with(&[0xEF, 0xBB, 0xBF]) {
        return Some((UTF_8, &bytes[3..]));
    }
    if bytes.starts_with(&[0xFE, 0xFF]) {
        return Some((encoding_rs::UTF_16BE, bytes));
    }
    if bytes.starts_with(&[0xFF, 0xFE]) {
        return Some((encoding_rs::UTF_16LE, bytes));
    }
    None
}

/// Scan for a leading ASCII `@charset "...";` rule per CSS Syntax 3 §3 and return the label.
///
/// The rule must start at byte 0 with the exact ASCII bytes `@charset "`, and the label must
/// be terminated by `";`. No whitespace is permitted around the label; this matches the
/// strictness of the spec algorithm (it exists purely to let a decoder pick an encoding
/// before any general-purpose tokenizing can happen).
fn sniff_charset_rule(bytes: &[u8]) -> Option<String> {
    const PREFIX: &[u8] = b"@charset \"";
    if !bytes.starts_with(PREFIX) {
        return None;
    }
    let rest = &bytes[PREFIX.len()..];
    let end = rest.windows(2).position(|w| w == b"\";")?;
    let label = &rest[..end];
    if !label.is_ascii() {
        return None;
    }
    Some(String::from_utf8_lossy(label).into_owned())
}

/// Best-effort statistical encoding sniffing for unlabeled input, using `chardetng`.
///
/// Not part of the automatic fallback chain above: per CSS Syntax 3 §3, an unlabeled
/// stylesheet decodes as UTF-8, not a guess. This is an explicit opt-in for callers (e.g.
/// fetching a stylesheet with no `Content-Type` charset and no `@charset` rule) who prefer a
/// best-effort guess over a silent UTF-8 fallback that may mangle legacy content.
pub fn sniff_encoding(bytes: &[u8]) -> &'static Encoding {
    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(bytes, true);
    detector.guess(None, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_utf8_with_no_hints() {
        assert_eq!(decode_stylesheet_bytes(b"a { color: red }", None, None), "a { color: red }");
    }

    #[test]
    fn strips_utf8_bom() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice(b"p{}");
        assert_eq!(decode_stylesheet_bytes(&bytes, None, None), "p{}");
    }

    #[test]
    fn decodes_utf16le_bom() {
        let mut bytes = vec![0xFF, 0xFE];
        for unit in "p{}".encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        assert_eq!(decode_stylesheet_bytes(&bytes, None, None), "p{}");
    }

    #[test]
    fn protocol_encoding_wins_over_charset_rule() {
        let bytes = b"@charset \"utf-16\"; a {}";
        assert_eq!(decode_stylesheet_bytes(bytes, Some("utf-8"), None), "@charset \"utf-16\"; a {}");
    }

    #[test]
    fn leading_charset_rule_picks_the_label() {
        let mut bytes = b"@charset \"windows-1252\";".to_vec();
        bytes.push(0xE9); // 'e' with acute accent in windows-1252
        let text = decode_stylesheet_bytes(&bytes, None, None);
        assert!(text.ends_with('\u{e9}'));
    }

    #[test]
    fn falls_back_to_environment_encoding() {
        let mut bytes = b"".to_vec();
        bytes.push(0xE9);
        let text = decode_stylesheet_bytes(&bytes, None, Some("windows-1252"));
        assert_eq!(text, "\u{e9}");
    }

    #[test]
    fn unknown_protocol_label_falls_through_to_next_step() {
        let bytes = b"@charset \"utf-8\"; a {}";
        assert_eq!(
            decode_stylesheet_bytes(bytes, Some("not-a-real-encoding"), None),
            "@charset \"utf-8\"; a {}"
        );
    }

    #[test]
    fn sniff_encoding_is_available_as_explicit_opt_in() {
        let bytes = b"a { color: red }";
        let encoding = sniff_encoding(bytes);
        assert_eq!(encoding, UTF_8);
    }
}
