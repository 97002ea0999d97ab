use chardetng::EncodingDetector;
use encoding_rs::Encoding;

/// A snapshot body decoded to UTF-8 for pattern scanning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedPage {
    pub text: String,
    pub encoding: &'static str,
}

/// Decode raw page bytes using: BOM -> Content-Type charset -> chardetng.
///
/// Undecodable sequences become replacement characters rather than errors;
/// a partly mangled capture is still worth scanning for image URLs.
pub fn decode_page(bytes: &[u8], content_type: Option<&str>) -> DecodedPage {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return decode_with(bytes, encoding);
    }

    if let Some(label) = content_type.and_then(extract_charset) {
        if let Some(encoding) = Encoding::for_label(label.as_bytes()) {
            return decode_with(bytes, encoding);
        }
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    decode_with(bytes, detector.guess(None, true))
}

fn extract_charset(content_type: &str) -> Option<String> {
    content_type.split(';').find_map(|part| {
        let part = part.trim();
        let (key, value) = part.split_once('=')?;
        if key.eq_ignore_ascii_case("charset") {
            Some(value.trim_matches([' ', '"', '\''].as_ref()).to_string())
        } else {
            None
        }
    })
}

fn decode_with(bytes: &[u8], encoding: &'static Encoding) -> DecodedPage {
    let (text, actual, had_errors) = encoding.decode(bytes);
    if had_errors {
        log::debug!(
            "replacement characters while decoding page as {}",
            actual.name()
        );
    }
    DecodedPage {
        text: text.into_owned(),
        encoding: actual.name(),
    }
}
