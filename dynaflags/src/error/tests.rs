//! Unit tests for error classification and message rendering.

use rstest::rstest;

use super::{FlagError, ValueError};

#[rstest]
#[case(FlagError::HelpRequested("usage".into()))]
#[case(FlagError::VersionRequested("app 1.0".into()))]
fn recognises_display_requests(#[case] err: FlagError) {
    assert!(err.is_display_request());
    assert!(err.display_text().is_some());
}

#[rstest]
#[case(FlagError::UnknownFlag { flag: "--nope".into() })]
#[case(FlagError::MissingValue { flag: "--name".into() })]
#[case(FlagError::TooFewPositionals { required: 1, got: 0 })]
fn rejects_regular_errors(#[case] err: FlagError) {
    assert!(!err.is_display_request());
    assert_eq!(err.display_text(), None);
}

#[test]
fn missing_value_message_names_the_flag() {
    let err = FlagError::MissingValue {
        flag: "--name".into(),
    };
    assert_eq!(err.to_string(), "missing value for flag: --name");
}

#[test]
fn invalid_value_message_carries_raw_text_and_cause() {
    let err = FlagError::InvalidValue {
        flag: "--port".into(),
        raw: "abc".into(),
        source: ValueError::Parse("invalid digit found in string".into()),
    };
    assert_eq!(
        err.to_string(),
        "invalid value \"abc\" for flag --port: invalid digit found in string"
    );
}

#[test]
fn counter_limit_names_the_flag_without_raw_text() {
    let err = FlagError::CounterLimit {
        flag: "-v".into(),
        source: ValueError::AboveMaximum { value: 4, max: 3 },
    };
    assert_eq!(
        err.to_string(),
        "too many occurrences of flag -v: value 4 exceeds maximum of 3"
    );
}

#[test]
fn group_messages_join_members() {
    let err = FlagError::OneOfConflict {
        group: "mode".into(),
        selected: vec!["--fast".into(), "--safe".into()],
    };
    assert_eq!(
        err.to_string(),
        "only one of [--fast, --safe] may be set (group \"mode\")"
    );

    let not_allowed = ValueError::NotAllowed {
        allowed: vec!["json".into(), "text".into()],
    };
    assert_eq!(not_allowed.to_string(), "must be one of [json, text]");
}

#[test]
fn element_errors_nest_their_cause() {
    let err = ValueError::Element {
        element: "x".into(),
        source: Box::new(ValueError::Parse("invalid digit found in string".into())),
    };
    assert_eq!(
        err.to_string(),
        "element \"x\": invalid digit found in string"
    );
}
