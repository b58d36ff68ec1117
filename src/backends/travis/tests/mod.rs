use pretty_assertions::assert_eq;

use super::models::{BuildId, BuildInfo, StatusEvent};

#[test]
fn test_parse_notification() {
    let event_str = include_str!("./notification_sample.json");
    let event: StatusEvent = serde_json::from_str(event_str).expect("should deserialize");

    assert_eq!(event.id, Some(BuildId::Number(340712281)));
    assert_eq!(event.status_message, "Passed");
    assert_eq!(
        event.target_commit(),
        Some("9f8e7d6c5b4a39281706f5e4d3c2b1a098765432")
    );
    assert_eq!(
        event.repository_slug().as_deref(),
        Some("super/netlify-travis-proxy")
    );
}

#[test]
fn test_parse_build() {
    let build_str = include_str!("./build_sample.json");
    let build: BuildInfo = serde_json::from_str(build_str).expect("should deserialize");

    assert_eq!(build.stage_names().collect::<Vec<_>>(), vec!["Test", "E2E"]);
    assert!(build.has_stage("e2e"));
}

#[test]
fn test_commit_precedence() {
    let both: StatusEvent =
        serde_json::from_str(r#"{"head_commit":"head","base_commit":"base"}"#).unwrap();
    assert_eq!(both.target_commit(), Some("head"));

    let base_only: StatusEvent = serde_json::from_str(r#"{"base_commit":"base"}"#).unwrap();
    assert_eq!(base_only.target_commit(), Some("base"));

    let commit_over_base: StatusEvent =
        serde_json::from_str(r#"{"commit":"sha","base_commit":"base"}"#).unwrap();
    assert_eq!(commit_over_base.target_commit(), Some("sha"));

    let empty_head: StatusEvent =
        serde_json::from_str(r#"{"head_commit":"","base_commit":"base"}"#).unwrap();
    assert_eq!(empty_head.target_commit(), Some("base"));

    let none: StatusEvent = serde_json::from_str("{}").unwrap();
    assert_eq!(none.target_commit(), None);
}

#[test]
fn test_build_id_shapes() {
    let text: StatusEvent = serde_json::from_str(r#"{"id":"build-id"}"#).unwrap();
    assert_eq!(text.id.map(|id| id.to_string()).as_deref(), Some("build-id"));

    let number: StatusEvent = serde_json::from_str(r#"{"id":12}"#).unwrap();
    assert_eq!(number.id.map(|id| id.to_string()).as_deref(), Some("12"));
}
