use embed_connect_core::{poll_transition, PollEvent, PollState};

#[test]
fn poll_happy_path_transitions() {
    let (s1, _) = poll_transition(PollState::Open, PollEvent::Sent).expect("open -> sent");
    assert_eq!(s1, PollState::Waiting);
    let (s2, _) = poll_transition(s1, PollEvent::Sent).expect("waiting -> resent");
    assert_eq!(s2, PollState::Waiting);
    let (s3, reason) = poll_transition(s2, PollEvent::Granted).expect("waiting -> granted");
    assert_eq!(s3, PollState::Resolved);
    assert_eq!(reason, "granted");
    let (s4, _) = poll_transition(s3, PollEvent::ChannelClosed).expect("resolved -> closed");
    assert_eq!(s4, PollState::Resolved);
}

#[test]
fn poll_reject_path_keeps_rejection_until_close() {
    let (s1, _) = poll_transition(PollState::Waiting, PollEvent::UserRejected).expect("reject");
    assert_eq!(s1, PollState::Rejected);
    let (s2, _) = poll_transition(s1, PollEvent::Sent).expect("still polling");
    assert_eq!(s2, PollState::Rejected);
    let (s3, _) = poll_transition(s2, PollEvent::ChannelClosed).expect("closed");
    assert_eq!(s3, PollState::Rejected);
}

#[test]
fn poll_close_without_response_is_closed() {
    let (s1, reason) =
        poll_transition(PollState::Open, PollEvent::ChannelClosed).expect("closed early");
    assert_eq!(s1, PollState::Closed);
    assert_eq!(reason, "closed_without_response");
}

#[test]
fn second_terminal_response_is_rejected() {
    let err = poll_transition(PollState::Resolved, PollEvent::Granted).expect_err("must fail");
    assert!(err.to_string().contains("illegal poll transition"));
    assert!(poll_transition(PollState::Rejected, PollEvent::Granted).is_err());
    assert!(poll_transition(PollState::Resolved, PollEvent::UserRejected).is_err());
    assert!(poll_transition(PollState::Resolved, PollEvent::Sent).is_err());
}

#[test]
fn closed_state_accepts_nothing() {
    for event in [
        PollEvent::Sent,
        PollEvent::Granted,
        PollEvent::UserRejected,
        PollEvent::Malformed,
        PollEvent::ChannelClosed,
    ] {
        assert!(poll_transition(PollState::Closed, event).is_err());
    }
}

#[test]
fn malformed_terminal_response_closes_the_loop() {
    let (s1, reason) =
        poll_transition(PollState::Waiting, PollEvent::Malformed).expect("malformed ends loop");
    assert_eq!(s1, PollState::Closed);
    assert_eq!(reason, "malformed_terminal");
    let (s1, _) = poll_transition(PollState::Open, PollEvent::Malformed).expect("before first send");
    assert_eq!(s1, PollState::Closed);
}

#[test]
fn malformed_after_decision_is_rejected() {
    assert!(poll_transition(PollState::Rejected, PollEvent::Malformed).is_err());
    assert!(poll_transition(PollState::Resolved, PollEvent::Malformed).is_err());
}
