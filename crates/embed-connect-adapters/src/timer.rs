use std::time::Duration;

use async_trait::async_trait;

use embed_connect_core::TimerPort;

#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone, Default)]
pub struct TokioTimerAdapter;

#[cfg(not(target_arch = "wasm32"))]
#[async_trait(?Send)]
impl TimerPort for TokioTimerAdapter {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Default)]
pub struct BrowserTimerAdapter;

#[cfg(target_arch = "wasm32")]
#[async_trait(?Send)]
impl TimerPort for BrowserTimerAdapter {
    async fn sleep(&self, duration: Duration) {
        let millis = u32::try_from(duration.as_millis()).unwrap_or(u32::MAX);
        gloo_timers::future::TimeoutFuture::new(millis).await;
    }
}
