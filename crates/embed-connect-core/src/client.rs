use std::cell::Cell;
use std::time::Duration;

use futures::future::select;
use futures::{pin_mut, StreamExt};
use tracing::{debug, info, warn};

use crate::codec::{
    self, OperationData, RequestEnvelope, ResponseEnvelope, Verdict, WILDCARD_ORIGIN,
};
use crate::domain::{EmbedConfig, Outcome, RequestTag};
use crate::hub::{Listener, MessageHub};
use crate::origin::is_allowed_origin;
use crate::ports::{
    FramePort, PortError, PostTarget, SiteMetadataPort, StoragePort, TimerPort, WindowChannel,
    WindowPort,
};
use crate::state_machine::{poll_transition, PollEvent, PollState};

pub struct EmbedClient<W, F, M, S, T>
where
    W: WindowPort,
    F: FramePort,
    M: SiteMetadataPort,
    S: StoragePort,
    T: TimerPort,
{
    pub config: EmbedConfig,
    pub windows: W,
    pub frames: F,
    pub site_metadata: M,
    pub storage: S,
    pub timer: T,
    pub hub: MessageHub,
}

impl<W, F, M, S, T> EmbedClient<W, F, M, S, T>
where
    W: WindowPort,
    F: FramePort,
    M: SiteMetadataPort,
    S: StoragePort,
    T: TimerPort,
{
    pub fn init(
        config: EmbedConfig,
        windows: W,
        frames: F,
        site_metadata: M,
        storage: S,
        timer: T,
    ) -> Self {
        if let Err(e) = config.validate() {
            warn!(error = %e, "embed config failed validation");
        }
        info!(lib_version = %config.lib_version, chain = %config.chain, "initialized embed client");
        Self {
            config,
            windows,
            frames,
            site_metadata,
            storage,
            timer,
            hub: MessageHub::new(),
        }
    }

    /// Asks the remote for the user's account. Tries a silent hidden-frame
    /// login first when auto-connect is enabled, then falls back to polling
    /// the popup until it answers or closes.
    pub async fn login(&self) -> Outcome<String> {
        let Some(channel) = self.open_channel() else {
            return Outcome::Unresolved;
        };

        if self.config.auto_connect {
            if let Some(account) = self.try_auto_connect().await {
                info!("received account from auto connect");
                channel.close();
                self.remember_account(&account);
                return Outcome::Resolved(account);
            }
        }

        info!("waiting login");
        let outcome = self
            .run_poll_loop(
                &channel,
                RequestTag::RequestAccounts,
                OperationData::default(),
                codec::dispatch_accounts,
            )
            .await;
        if let Outcome::Resolved(account) = &outcome {
            self.remember_account(account);
        }
        outcome
    }

    pub async fn sign_message(&self, message: &[u8]) -> Outcome<Vec<u8>> {
        let Some(channel) = self.open_channel() else {
            return Outcome::Unresolved;
        };

        info!(message_len = message.len(), "waiting sign message");
        let chain = &self.config.chain;
        self.run_poll_loop(
            &channel,
            RequestTag::SignMessage,
            OperationData::sign(message),
            |envelope| codec::dispatch_signature(envelope, chain),
        )
        .await
    }

    pub fn clean_up(&self) -> Result<(), PortError> {
        self.storage.clear()
    }

    /// Builds a request envelope around `data` and posts it once to `target`.
    /// `None` for the origin posts to any origin.
    pub async fn post_message<P>(
        &self,
        target: &P,
        request: RequestTag,
        data: OperationData,
        target_origin: Option<&str>,
    ) -> Result<(), PortError>
    where
        P: PostTarget + ?Sized,
    {
        let site_metadata = self.site_metadata.build(&self.config.app_metadata).await?;
        let envelope = RequestEnvelope::new(request, &self.config, site_metadata, data);
        target.post(&envelope.to_value()?, target_origin.unwrap_or(WILDCARD_ORIGIN))
    }

    fn open_channel(&self) -> Option<W::Channel> {
        match self.windows.open(&self.config.frame_url()) {
            Ok(channel) => Some(channel),
            Err(e) => {
                warn!(error = %e, "failed to open remote window");
                None
            }
        }
    }

    fn remember_account(&self, account: &str) {
        if let Err(e) = self.storage.store_account(account, &self.config.chain) {
            warn!(error = %e, "failed to store account");
        }
    }

    async fn run_poll_loop<V, D>(
        &self,
        channel: &W::Channel,
        request: RequestTag,
        data: OperationData,
        decide: D,
    ) -> Outcome<V>
    where
        D: FnMut(&ResponseEnvelope) -> Verdict<V>,
    {
        let mut listener = match self.hub.listen() {
            Ok(listener) => listener,
            Err(e) => {
                warn!(error = %e, "failed to subscribe to remote messages");
                channel.close();
                return Outcome::Unresolved;
            }
        };

        let state = Cell::new(PollState::Open);
        let mut outcome = Outcome::Unresolved;
        {
            // Receiver first so messages already queued are handled before a
            // closed channel is noticed.
            let receiver =
                receive_until_terminal(&mut listener, channel, &state, &mut outcome, decide);
            let sender = self.send_until_closed(channel, request, &data, &state);
            pin_mut!(receiver, sender);
            select(receiver, sender).await;
        }
        drop(listener);
        advance(&state, PollEvent::ChannelClosed);
        debug!(request = request.as_wire(), state = ?state.get(), "poll loop finished");
        outcome
    }

    async fn send_until_closed(
        &self,
        channel: &W::Channel,
        request: RequestTag,
        data: &OperationData,
        state: &Cell<PollState>,
    ) {
        let target = self.config.frame_url();
        // a zero interval would re-post without ever yielding to the receiver
        let interval = Duration::from_millis(self.config.poll_interval_ms.max(1));
        while channel.is_open() {
            match self
                .post_message(channel, request, data.clone(), Some(&target))
                .await
            {
                Ok(()) => {
                    advance(state, PollEvent::Sent);
                }
                Err(e) => warn!(error = %e, request = request.as_wire(), "failed to post request"),
            }
            self.timer.sleep(interval).await;
        }
    }
}

async fn receive_until_terminal<C, V, D>(
    listener: &mut Listener,
    channel: &C,
    state: &Cell<PollState>,
    outcome: &mut Outcome<V>,
    mut decide: D,
) where
    C: WindowChannel,
    D: FnMut(&ResponseEnvelope) -> Verdict<V>,
{
    while let Some(message) = listener.next().await {
        if !is_allowed_origin(&message.origin) {
            debug!(origin = %message.origin, "dropping message from disallowed origin");
            continue;
        }
        let Some(envelope) = codec::parse_response(&message.data) else {
            continue;
        };
        match decide(&envelope) {
            Verdict::Granted(value) => {
                if advance(state, PollEvent::Granted) {
                    *outcome = Outcome::Resolved(value);
                    channel.close();
                    return;
                }
            }
            Verdict::UserRejected => {
                if advance(state, PollEvent::UserRejected) {
                    info!("user rejected request");
                    *outcome = Outcome::Rejected;
                }
            }
            Verdict::Malformed => {
                if advance(state, PollEvent::Malformed) {
                    channel.close();
                    return;
                }
            }
            Verdict::Ignore => {}
        }
    }
    channel.close();
}

fn advance(state: &Cell<PollState>, event: PollEvent) -> bool {
    match poll_transition(state.get(), event) {
        Ok((next, reason)) => {
            if next != state.get() {
                debug!(from = ?state.get(), to = ?next, reason, "poll transition");
            }
            state.set(next);
            true
        }
        Err(e) => {
            debug!(error = %e, "ignoring event");
            false
        }
    }
}
