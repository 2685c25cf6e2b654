use chardetng::EncodingDetector;
use encoding_rs::Encoding;
use notebook_logging::notebook_warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedBody {
    pub text: String,
    pub encoding_label: String,
    /// Some bytes were invalid and became U+FFFD.
    pub lossy: bool,
}

/// Decode a response body into UTF-8 using: BOM -> Content-Type charset -> chardetng guess.
/// Malformed sequences are replaced rather than rejected.
pub fn decode_body(bytes: &[u8], content_type: Option<&str>) -> DecodedBody {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return decode_with(bytes, encoding);
    }

    if let Some(label) = content_type.and_then(extract_charset) {
        if let Some(enc) = Encoding::for_label(label.as_bytes()) {
            return decode_with(bytes, enc);
        }
    }

    // Valid UTF-8 needs no guessing.
    if std::str::from_utf8(bytes).is_ok() {
        return decode_with(bytes, encoding_rs::UTF_8);
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    let enc = detector.guess(None, true);
    decode_with(bytes, enc)
}

fn extract_charset(content_type: &str) -> Option<String> {
    content_type
        .split(';')
        .filter_map(|part| {
            let (key, value) = part.split_once('=')?;
            key.trim()
                .eq_ignore_ascii_case("charset")
                .then(|| value.trim().trim_matches(['"', '\'']).to_string())
        })
        .next()
}

fn decode_with(bytes: &[u8], enc: &'static Encoding) -> DecodedBody {
    // `decode` strips a matching BOM itself.
    let (text, _, had_errors) = enc.decode(bytes);
    if had_errors {
        notebook_warn!("Body is not valid {}; malformed bytes replaced", enc.name());
    }
    DecodedBody {
        text: text.into_owned(),
        encoding_label: enc.name().to_string(),
        lossy: had_errors,
    }
}
