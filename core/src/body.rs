//! Request body decoding.
//!
//! Covers the two transformations an inbound body can need: undoing the
//! gateway's base64 transport encoding, and splitting a form-urlencoded
//! payload into fields.

use std::collections::BTreeMap;

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use percent_encoding::percent_decode_str;

use crate::error::DecodeError;

/// Media type of HTML form submissions.
pub const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// Standard alphabet; trailing `=` padding is optional on decode.
const BODY_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Decoded form fields. Each name maps to every value it was given, in
/// body order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields(BTreeMap<String, Vec<String>>);

impl FormFields {
    /// First value submitted for `name`.
    pub fn first(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(|v| v.first()).map(String::as_str)
    }

    pub fn get_all(&self, name: &str) -> &[String] {
        self.0.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.entry(name.into()).or_default().push(value.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Undo the gateway's transport encoding.
///
/// Returns `body` untouched when `is_encoded` is false. Whitespace is not
/// part of the alphabet and is rejected.
pub fn decode_base64(body: &str, is_encoded: bool) -> Result<String, DecodeError> {
    if !is_encoded {
        return Ok(body.to_string());
    }
    let bytes = BODY_ENGINE.decode(body)?;
    Ok(String::from_utf8(bytes)?)
}

/// Parse `key=value&key2=value2` into fields.
///
/// Keys and values are percent-decoded and `+` becomes a space. A key with
/// no `=` gets an empty value; repeated keys accumulate values. A `%` not
/// followed by two hex digits, or escapes that decode to invalid UTF-8,
/// fail the whole body.
pub fn parse_form_body(text: &str) -> Result<FormFields, DecodeError> {
    let mut fields = FormFields::default();
    for pair in text.split('&').filter(|pair| !pair.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        fields.insert(decode_component(key)?, decode_component(value)?);
    }
    Ok(fields)
}

fn decode_component(raw: &str) -> Result<String, DecodeError> {
    let bytes = raw.as_bytes();
    for (i, _) in bytes.iter().enumerate().filter(|(_, b)| **b == b'%') {
        let well_formed = bytes
            .get(i + 1..i + 3)
            .is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit));
        if !well_formed {
            return Err(DecodeError::Form(format!("malformed escape in {raw:?}")));
        }
    }
    let spaced = raw.replace('+', " ");
    percent_decode_str(&spaced)
        .decode_utf8()
        .map(|text| text.into_owned())
        .map_err(|_| DecodeError::Form(format!("escapes in {raw:?} are not UTF-8")))
}

/// Whether `content_type` names a form-urlencoded body. Parameters such as
/// `charset` are ignored; the media type compares case-insensitively.
pub fn is_form_urlencoded(content_type: &str) -> bool {
    media_type_matches(content_type, FORM_URLENCODED)
}

/// Compare the media-type essence (the part before `;`) of two content
/// types.
pub(crate) fn media_type_matches(actual: &str, expected: &str) -> bool {
    essence(actual).eq_ignore_ascii_case(essence(expected))
}

fn essence(content_type: &str) -> &str {
    content_type.split(';').next().unwrap_or_default().trim()
}

#[cfg(test)]
mod tests {
    use base64::engine::general_purpose::{STANDARD, STANDARD_NO_PAD};

    use super::*;

    #[test]
    fn plain_body_is_returned_verbatim() {
        let raw = "title=Dune&authors=Herbert ";
        assert_eq!(decode_base64(raw, false).unwrap(), raw);
    }

    #[test]
    fn base64_body_is_decoded() {
        let encoded = STANDARD.encode("title=Dune&authors=Herbert");
        assert_eq!(decode_base64(&encoded, true).unwrap(), "title=Dune&authors=Herbert");
    }

    #[test]
    fn base64_with_multibyte_text() {
        let encoded = STANDARD.encode("título=Ñandú");
        assert_eq!(decode_base64(&encoded, true).unwrap(), "título=Ñandú");
    }

    #[test]
    fn invalid_base64_is_rejected() {
        let err = decode_base64("not base64!!", true).unwrap_err();
        assert!(matches!(err, DecodeError::Base64(_)));
    }

    #[test]
    fn unpadded_base64_is_accepted() {
        let encoded = STANDARD_NO_PAD.encode("title=Dune");
        assert!(!encoded.ends_with('='));
        assert_eq!(decode_base64(&encoded, true).unwrap(), "title=Dune");
    }

    #[test]
    fn surrounding_whitespace_is_rejected() {
        let encoded = format!(" {}\n", STANDARD.encode("title=Dune"));
        assert!(matches!(decode_base64(&encoded, true), Err(DecodeError::Base64(_))));
    }

    #[test]
    fn non_utf8_payload_is_rejected() {
        let encoded = STANDARD.encode([0xff, 0xfe, 0xfd]);
        let err = decode_base64(&encoded, true).unwrap_err();
        assert!(matches!(err, DecodeError::Utf8(_)));
    }

    #[test]
    fn form_body_simple_pairs() {
        let fields = parse_form_body("title=Dune&authors=Herbert").unwrap();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields.first("title"), Some("Dune"));
        assert_eq!(fields.first("authors"), Some("Herbert"));
    }

    #[test]
    fn form_body_empty_text() {
        assert!(parse_form_body("").unwrap().is_empty());
    }

    #[test]
    fn form_body_key_without_value() {
        let fields = parse_form_body("flag&title=Dune").unwrap();
        assert_eq!(fields.first("flag"), Some(""));
    }

    #[test]
    fn form_body_plus_and_percent_decoding() {
        let fields = parse_form_body("title=The+Left+Hand%20of+Darkness&authors=Ursula%20K.%20Le%20Guin").unwrap();
        assert_eq!(fields.first("title"), Some("The Left Hand of Darkness"));
        assert_eq!(fields.first("authors"), Some("Ursula K. Le Guin"));
    }

    #[test]
    fn form_body_repeated_keys_accumulate() {
        let fields = parse_form_body("tag=a&tag=b&tag=c").unwrap();
        assert_eq!(fields.get_all("tag"), ["a", "b", "c"]);
        assert_eq!(fields.first("tag"), Some("a"));
        assert!(fields.get_all("missing").is_empty());
    }

    #[test]
    fn form_body_multibyte_escapes() {
        let fields = parse_form_body("authors=Stanis%C5%82aw+Lem").unwrap();
        assert_eq!(fields.first("authors"), Some("Stanisław Lem"));
    }

    #[test]
    fn form_body_bad_escape_is_rejected() {
        for text in ["title=%ZZ", "title=100%", "title=%4", "ti%G1tle=Dune"] {
            let err = parse_form_body(text).unwrap_err();
            assert!(matches!(err, DecodeError::Form(_)), "{text}");
        }
    }

    #[test]
    fn form_body_non_utf8_escape_is_rejected() {
        let err = parse_form_body("title=%FF&authors=x").unwrap_err();
        assert!(matches!(err, DecodeError::Form(_)));
    }

    #[test]
    fn form_body_encoded_percent_is_kept() {
        let fields = parse_form_body("discount=50%25").unwrap();
        assert_eq!(fields.first("discount"), Some("50%"));
    }

    #[test]
    fn form_content_type_detection() {
        assert!(is_form_urlencoded("application/x-www-form-urlencoded"));
        assert!(is_form_urlencoded("Application/X-WWW-Form-Urlencoded; charset=UTF-8"));
        assert!(!is_form_urlencoded("application/json"));
        assert!(!is_form_urlencoded(""));
    }
}
