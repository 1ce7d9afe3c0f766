use picsync_core::{
    BatchSummary, OutcomeKind, PhotoDescriptor, StatusKind, StatusMessage, UploadOutcome,
};

#[test]
fn summary_message_without_failures() {
    let summary = BatchSummary {
        success_count: 5,
        fail_count: 0,
    };
    assert_eq!(summary.status_message("uploaded"), "5 uploaded");
    assert!(!summary.is_partial_failure());
}

#[test]
fn summary_records_outcomes() {
    let mut summary = BatchSummary::default();
    summary.record(OutcomeKind::Success);
    summary.record(OutcomeKind::Error);
    summary.record(OutcomeKind::Success);
    assert_eq!(summary.total(), 3);
    assert_eq!(summary.status_message("deleted"), "2 deleted, 1 failed");
}

#[test]
fn batch_banner_tone_follows_failures() {
    let clean = BatchSummary {
        success_count: 2,
        fail_count: 0,
    };
    let dirty = BatchSummary {
        success_count: 0,
        fail_count: 2,
    };
    assert_eq!(StatusMessage::for_batch(&clean, "uploaded").kind, StatusKind::Success);
    let banner = StatusMessage::for_batch(&dirty, "uploaded");
    assert_eq!(banner.kind, StatusKind::Error);
    assert_eq!(banner.text, "0 uploaded, 2 failed");
}

#[test]
fn error_banner_is_prefixed() {
    assert_eq!(StatusMessage::error("boom").text, "Error: boom");
}

#[test]
fn outcome_serializes_with_kind_tag() {
    let outcome = UploadOutcome::failure("Network Error", 0);
    let json = serde_json::to_value(&outcome).unwrap();
    assert_eq!(json["kind"], "error");
    assert_eq!(json["code"], 0);
    assert_eq!(outcome.kind(), OutcomeKind::Error);
    assert!(!outcome.is_auth_failure());
    assert!(UploadOutcome::failure("expired", 401).is_auth_failure());
}

#[test]
fn extension_ignores_trailing_dot() {
    assert_eq!(PhotoDescriptor::new("a", "u", "noext.", 1).extension(), None);
    assert_eq!(PhotoDescriptor::new("a", "u", "plain", 1).extension(), None);
    assert_eq!(PhotoDescriptor::new("a", "u", "x.tar.gz", 1).extension(), Some("gz"));
}
