use crate::{UploadResult, format_bytes, success_body, tests::support::sample_result};

/// WHAT: Byte counts render with binary units and two decimals
/// WHY: The success notification shows the uploaded size
#[test]
fn given_byte_counts_when_formatting_then_binary_units() {
    // Given/When/Then
    let cases = [
        (0, "0 B"),
        (1, "1.00 B"),
        (1023, "1023.00 B"),
        (1024, "1.00 KB"),
        (1536, "1.50 KB"),
        (1_048_576, "1.00 MB"),
        (5 * 1024 * 1024 * 1024, "5.00 GB"),
        (3 * 1024 * 1024 * 1024 * 1024, "3072.00 GB"),
    ];

    for (bytes, expected) in cases {
        assert_eq!(format_bytes(bytes), expected, "{} bytes", bytes);
    }
}

/// WHAT: The success body carries size and URL
/// WHY: Users see where the link went and how big the upload was
#[test]
fn given_sized_result_when_building_body_then_size_and_url_included() {
    // Given
    let result = sample_result();

    // When
    let body = success_body(&result);

    // Then
    assert_eq!(
        body,
        "URL copied to clipboard (1.50 KB)\nhttps://embrly.ca/u/abc123"
    );
}

/// WHAT: An unknown size is left out of the body
/// WHY: "0 B" would be misleading
#[test]
fn given_zero_size_when_building_body_then_size_omitted() {
    // Given
    let result = UploadResult {
        size: 0,
        ..sample_result()
    };

    // When/Then
    assert_eq!(
        success_body(&result),
        "URL copied to clipboard\nhttps://embrly.ca/u/abc123"
    );
}
