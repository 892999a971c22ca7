use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    Open,
    Waiting,
    Resolved,
    Rejected,
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollEvent {
    Sent,
    Granted,
    UserRejected,
    /// Terminal success tag carrying a payload that could not be decoded.
    Malformed,
    ChannelClosed,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("illegal poll transition: {from:?} on {event:?}")]
pub struct TransitionError {
    pub from: PollState,
    pub event: PollEvent,
}

pub fn poll_transition(
    from: PollState,
    event: PollEvent,
) -> Result<(PollState, &'static str), TransitionError> {
    use PollEvent as E;
    use PollState as S;

    let next = match (from, event) {
        (S::Open, E::Sent) => (S::Waiting, "request_sent"),
        (S::Waiting, E::Sent) => (S::Waiting, "request_resent"),
        // the remote closes its window after a rejection; keep polling until it does
        (S::Rejected, E::Sent) => (S::Rejected, "request_resent_after_reject"),
        (S::Open | S::Waiting, E::Granted) => (S::Resolved, "granted"),
        (S::Open | S::Waiting, E::UserRejected) => (S::Rejected, "user_rejected"),
        (S::Open | S::Waiting, E::Malformed) => (S::Closed, "malformed_terminal"),
        (S::Open | S::Waiting, E::ChannelClosed) => (S::Closed, "closed_without_response"),
        (S::Resolved, E::ChannelClosed) => (S::Resolved, "closed_after_grant"),
        (S::Rejected, E::ChannelClosed) => (S::Rejected, "closed_after_reject"),
        _ => return Err(TransitionError { from, event }),
    };
    Ok(next)
}
