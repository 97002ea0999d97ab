use std::collections::HashSet;

use pretty_assertions::assert_eq;
use wayback_engine::{profile_size_spread, ImagePatterns, ResourceKind, PROFILE_STEM_CAP};

#[test]
fn extraction_yields_media_url_and_profile_size_variants() {
    let html = r#"
    <html><body>
        <img src="https://pbs.example/media/ABC123.jpg">
        <img src="https://pbs.example/profile_images/42/XYZ.jpg">
    </body></html>
    "#;
    let patterns = ImagePatterns::for_host("pbs.example").unwrap();

    let extracted: HashSet<String> = patterns.extract_image_urls(html).into_iter().collect();
    let expected: HashSet<String> = [
        "https://pbs.example/media/ABC123.jpg",
        "https://pbs.example/profile_images/42/XYZ.jpg",
        "https://pbs.example/profile_images/42/XYZ_400x400.jpg",
        "https://pbs.example/profile_images/42/XYZ_normal.jpg",
        "https://pbs.example/profile_images/42/XYZ_bigger.jpg",
    ]
    .into_iter()
    .map(String::from)
    .collect();
    assert_eq!(extracted, expected);
}

#[test]
fn patterns_ignore_other_hosts_and_non_jpg_resources() {
    let html = r#"
        https://elsewhere.example/media/ABC123.jpg
        https://pbs.example/media/clip.mp4
        https://pbs.example/profile_images/notanumber/XYZ.jpg
    "#;
    let patterns = ImagePatterns::for_host("pbs.example").unwrap();
    assert!(patterns.extract_image_urls(html).is_empty());
}

#[test]
fn size_spread_truncates_long_stems_at_the_cap() {
    let long_token = "A".repeat(40);
    let url = format!("https://pbs.example/profile_images/1234567890/{long_token}.jpg");
    assert!(url.len() - ".jpg".len() > PROFILE_STEM_CAP);

    let variants = profile_size_spread(&url);
    assert_eq!(variants.len(), 4);
    let stem = &url[..PROFILE_STEM_CAP];
    assert_eq!(variants[0], format!("{stem}.jpg"));
    assert_eq!(variants[1], format!("{stem}_400x400.jpg"));
    assert_eq!(variants[2], format!("{stem}_normal.jpg"));
    assert_eq!(variants[3], format!("{stem}_bigger.jpg"));
}

#[test]
fn filename_is_the_trailing_token() {
    let patterns = ImagePatterns::for_host("pbs.example").unwrap();
    assert_eq!(
        patterns.filename_of("https://pbs.example/media/ABC-12_3.jpg"),
        Some("ABC-12_3.jpg")
    );
    assert_eq!(
        patterns.filename_of("https://pbs.example/profile_images/42/XYZ_normal.jpg"),
        Some("XYZ_normal.jpg")
    );
    assert_eq!(patterns.filename_of("https://pbs.example/media/clip.mp4"), None);
}

#[test]
fn resource_kind_classifies_by_url_shape() {
    assert_eq!(
        ResourceKind::classify("https://pbs.example/media/ABC.jpg"),
        ResourceKind::Media
    );
    assert_eq!(
        ResourceKind::classify("https://pbs.example/profile_images/42/XYZ.jpg"),
        ResourceKind::Profile
    );
    assert_eq!(ResourceKind::Media.subdir(), "media");
    assert_eq!(ResourceKind::Profile.subdir(), "profile");
}
