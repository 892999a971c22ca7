//! Silent login through a hidden frame, raced against a fixed timeout.

use std::time::Duration;

use futures::future::{select, Either};
use futures::{pin_mut, StreamExt};
use tracing::{info, warn};
use web_time::Instant;

use crate::client::EmbedClient;
use crate::codec::{self, OperationData, Verdict};
use crate::domain::RequestTag;
use crate::hub::Listener;
use crate::origin::is_allowed_origin;
use crate::ports::{
    FramePort, HiddenFrame, PortError, SiteMetadataPort, StoragePort, TimerPort, WindowPort,
};

impl<W, F, M, S, T> EmbedClient<W, F, M, S, T>
where
    W: WindowPort,
    F: FramePort,
    M: SiteMetadataPort,
    S: StoragePort,
    T: TimerPort,
{
    /// Returns the account if the remote answers the hidden frame within
    /// `max_time_auto_connect_ms`. Every failure degrades to `None`.
    pub(crate) async fn try_auto_connect(&self) -> Option<String> {
        let timeout_ms = self.config.max_time_auto_connect_ms;
        info!(timeout_ms, "attempting auto connect");

        let frame = match self.frames.mount_hidden(&self.config.frame_url()) {
            Ok(frame) => frame,
            Err(e) => {
                warn!(error = %e, "failed to mount auto connect frame");
                return None;
            }
        };

        let started = Instant::now();
        let account = match self.hub.listen() {
            Ok(mut listener) => {
                let attempt = self.request_account_from_frame(&frame, &mut listener);
                let expiry = self.timer.sleep(Duration::from_millis(timeout_ms));
                pin_mut!(attempt, expiry);
                match select(attempt, expiry).await {
                    Either::Left((Ok(account), _)) => account,
                    Either::Left((Err(e), _)) => {
                        warn!(error = %e, "auto connect request failed");
                        None
                    }
                    Either::Right(_) => {
                        info!(
                            timeout_ms,
                            elapsed_ms = started.elapsed().as_millis() as u64,
                            "failed to auto connect within timeout"
                        );
                        None
                    }
                }
            }
            Err(e) => {
                warn!(error = %e, "failed to subscribe to remote messages");
                None
            }
        };

        if let Err(e) = frame.remove() {
            warn!(error = %e, "failed to remove auto connect frame");
        }
        account
    }

    async fn request_account_from_frame(
        &self,
        frame: &F::Frame,
        listener: &mut Listener,
    ) -> Result<Option<String>, PortError> {
        frame.loaded().await?;
        self.post_message(
            frame,
            RequestTag::RequestAccounts,
            OperationData::default(),
            Some(&self.config.frame_url()),
        )
        .await?;

        while let Some(message) = listener.next().await {
            if !is_allowed_origin(&message.origin) {
                continue;
            }
            let Some(envelope) = codec::parse_response(&message.data) else {
                continue;
            };
            match codec::dispatch_accounts(&envelope) {
                Verdict::Granted(account) => return Ok(Some(account)),
                Verdict::Malformed => return Ok(None),
                Verdict::UserRejected | Verdict::Ignore => {}
            }
        }
        Ok(None)
    }
}
