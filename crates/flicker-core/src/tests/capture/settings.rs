use crate::{
    CaptureMode, CaptureSettings, DEFAULT_ENDPOINT, SettingsHandle, UploadRequest, Visibility,
};

/// WHAT: A blank token means not configured
/// WHY: The pipeline must refuse to upload without credentials
#[test]
fn given_blank_token_when_checking_configuration_then_not_configured() {
    // Given
    let blank = CaptureSettings {
        upload_token: "   ".to_string(),
        ..CaptureSettings::default()
    };
    let set = CaptureSettings {
        upload_token: "abc".to_string(),
        ..CaptureSettings::default()
    };

    // When/Then
    assert!(!CaptureSettings::default().is_configured());
    assert!(!blank.is_configured());
    assert!(set.is_configured());
    assert_eq!(set.endpoint, DEFAULT_ENDPOINT);
}

/// WHAT: Secrets never appear in Debug output
/// WHY: Settings are logged with `?settings`
#[test]
fn given_token_and_password_when_debug_formatting_then_redacted() {
    // Given
    let settings = CaptureSettings {
        upload_token: "super-secret-token".to_string(),
        password: Some("hunter2".to_string()),
        ..CaptureSettings::default()
    };
    let request = UploadRequest::from_settings(&settings, CaptureMode::Fullscreen);

    // When
    let settings_debug = format!("{:?}", settings);
    let request_debug = format!("{:?}", request);

    // Then
    for text in [settings_debug, request_debug] {
        assert!(!text.contains("super-secret-token"));
        assert!(!text.contains("hunter2"));
    }
}

/// WHAT: Readers observe replacements immediately
/// WHY: A capture fired right after a settings edit must use the edit
#[test]
fn given_reader_when_settings_replaced_then_snapshot_is_latest() {
    // Given
    let handle = SettingsHandle::new(CaptureSettings::default());
    let reader = handle.reader();

    // When
    handle.replace(CaptureSettings {
        upload_token: "new".to_string(),
        visibility: Visibility::Private,
        ..CaptureSettings::default()
    });

    // Then
    let snapshot = reader.snapshot();
    assert_eq!(snapshot.upload_token, "new");
    assert_eq!(snapshot.visibility, Visibility::Private);
    assert_eq!(handle.snapshot(), snapshot);
}

/// WHAT: Requests carry the mode and pass settings through untouched
/// WHY: The uploader needs the monitor choice only for single-monitor captures
#[test]
fn given_settings_when_building_requests_then_mode_specific_fields() {
    // Given
    let settings = CaptureSettings {
        upload_token: "tok".to_string(),
        monitor_index: Some(2),
        password: Some("pw".to_string()),
        ..CaptureSettings::default()
    };

    // When
    let single = UploadRequest::from_settings(&settings, CaptureMode::Fullscreen);
    let all = UploadRequest::from_settings(&settings, CaptureMode::AllMonitors);

    // Then
    assert_eq!(single.credentials, "tok");
    assert_eq!(single.password.as_deref(), Some("pw"));
    assert!(!single.capture_all_monitors);
    assert_eq!(single.monitor_index, Some(2));
    assert!(all.capture_all_monitors);
    assert_eq!(all.monitor_index, None);
}

/// WHAT: Visibility uses the upper-case wire values
/// WHY: The upload API rejects other spellings
#[test]
fn given_visibility_when_rendering_then_uppercase() {
    assert_eq!(Visibility::Public.as_str(), "PUBLIC");
    assert_eq!(Visibility::Private.as_str(), "PRIVATE");
}
