use pretty_assertions::assert_eq;
use wayback_engine::decode_page;

#[test]
fn decode_respects_charset_header() {
    let bytes = b"caf\xe9"; // iso-8859-1
    let decoded = decode_page(bytes, Some("text/html; charset=ISO-8859-1"));
    assert_eq!(decoded.text, "café");
    assert!(
        decoded.encoding.eq_ignore_ascii_case("ISO-8859-1")
            || decoded.encoding.eq_ignore_ascii_case("windows-1252")
    );
}

#[test]
fn decode_handles_utf8_bom() {
    let bytes = b"\xEF\xBB\xBFhello";
    let decoded = decode_page(bytes, Some("text/html"));
    assert_eq!(decoded.text, "hello");
    assert_eq!(decoded.encoding, "UTF-8");
}

#[test]
fn undecodable_bytes_become_replacement_characters() {
    // Invalid UTF-8 declared as UTF-8: the page is still scannable.
    let bytes = b"before \xFF after https://pbs.example/media/ABC.jpg";
    let decoded = decode_page(bytes, Some("text/html; charset=utf-8"));
    assert!(decoded.text.contains('\u{FFFD}'));
    assert!(decoded.text.contains("https://pbs.example/media/ABC.jpg"));
}

#[test]
fn falls_back_to_detection_without_a_charset() {
    let decoded = decode_page(b"plain ascii body", None);
    assert_eq!(decoded.text, "plain ascii body");
}
