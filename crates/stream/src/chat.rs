//! Chat-surface stream consumer.
//!
//! One session posts a single placeholder message and keeps overwriting it:
//!
//! 1. **Resolve** the named computation
//! 2. **Post** the zero-frame status as a placeholder, keep its handle
//! 3. **Stream**: apply each chunk to the display state while the animation
//!    loop re-renders the status on its own clock
//! 4. **Commit** the final text (or an error message) over the placeholder
//!
//! Chunk handling and animation ticks are two branches of one `select!`, so
//! they interleave without locks and never race on the message handle.

use std::sync::Arc;

use pulsecast_core::{
    ChatSurface, Chunk, ComputationRegistry, ComputationRequest, Destination, DisplayState,
    MessageHandle, StreamError, render_status,
};
use tracing::{debug, info, warn};

use crate::animation::AnimationLoop;
use crate::retry::{RetryOutcome, final_write};
use crate::settings::{PacingBudget, RenderSettings};

/// Lifecycle of one chat session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    PostingPlaceholder,
    Streaming,
    SuccessFinalWrite,
    ErrorFinalWrite,
    Terminated,
}

/// Result of a successful chat session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatReport {
    /// The placeholder that now holds the final text
    pub handle: MessageHandle,
    /// The committed text (accumulated output or the fallback)
    pub text: String,
    /// How the final write went
    pub delivery: RetryOutcome,
    /// Status renders that reached the surface
    pub status_renders: u64,
}

/// Streams computations onto a chat surface.
pub struct ChatStreamer {
    registry: ComputationRegistry,
    surface: Arc<dyn ChatSurface>,
    settings: RenderSettings,
}

impl ChatStreamer {
    pub fn new(
        registry: ComputationRegistry,
        surface: Arc<dyn ChatSurface>,
        settings: RenderSettings,
    ) -> Self {
        Self {
            registry,
            surface,
            settings,
        }
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    /// Run `computation` for `request` and render it into `destination`.
    ///
    /// On failure an error message replaces the placeholder (or is posted,
    /// if no placeholder exists yet) and the original error is returned.
    pub async fn stream(
        &self,
        computation: &str,
        request: ComputationRequest,
        destination: &Destination,
    ) -> Result<ChatReport, StreamError> {
        info!(
            computation,
            surface = self.surface.name(),
            channel = %destination.channel,
            thread_id = %request.thread_id,
            "Starting chat session"
        );

        let mut session = ChatSession::new(self.surface.as_ref(), destination, &self.settings);
        match session.drive(&self.registry, computation, request).await {
            Ok(handle) => {
                let report = session.finish(handle).await;
                info!(
                    chars = report.text.len(),
                    delivered = report.delivery.is_delivered(),
                    "Chat session finished"
                );
                Ok(report)
            }
            Err(e) => {
                session.fail(&e).await;
                Err(e)
            }
        }
    }
}

/// The text that replaces the placeholder when a session fails.
pub fn error_message(error: &StreamError) -> String {
    format!("❌ Error: {error}")
}

struct ChatSession<'a> {
    surface: &'a dyn ChatSurface,
    destination: &'a Destination,
    settings: &'a RenderSettings,
    state: DisplayState,
    animation: AnimationLoop,
    pacing: PacingBudget,
    handle: Option<MessageHandle>,
    phase: SessionPhase,
    status_renders: u64,
}

impl<'a> ChatSession<'a> {
    fn new(
        surface: &'a dyn ChatSurface,
        destination: &'a Destination,
        settings: &'a RenderSettings,
    ) -> Self {
        Self {
            surface,
            destination,
            settings,
            state: DisplayState::new(),
            animation: AnimationLoop::new(settings.tick_interval),
            pacing: PacingBudget::new(settings.pacing_budget),
            handle: None,
            phase: SessionPhase::Idle,
            status_renders: 0,
        }
    }

    fn transition(&mut self, next: SessionPhase) {
        debug!(from = ?self.phase, to = ?next, "Chat session phase");
        self.phase = next;
    }

    async fn drive(
        &mut self,
        registry: &ComputationRegistry,
        name: &str,
        request: ComputationRequest,
    ) -> Result<MessageHandle, StreamError> {
        let computation = registry.resolve(name)?;

        self.transition(SessionPhase::PostingPlaceholder);
        let placeholder = render_status(&self.state, 0);
        let handle = self
            .surface
            .post(
                &self.destination.channel,
                self.destination.thread_anchor.as_deref(),
                &placeholder,
            )
            .await?;
        self.handle = Some(handle.clone());
        self.animation.start();

        let mut chunks = computation.stream(request).await?;
        self.transition(SessionPhase::Streaming);

        loop {
            tokio::select! {
                biased;
                frame = self.animation.tick() => self.render(frame).await,
                next = chunks.recv() => match next {
                    Some(Ok(chunk)) => self.consume(&chunk).await,
                    Some(Err(e)) => return Err(e.into()),
                    None => break,
                },
            }
        }

        Ok(handle)
    }

    async fn consume(&mut self, chunk: &Chunk) {
        let applied = self.state.apply(chunk);
        if applied.pulse {
            self.pulse().await;
        }
    }

    /// Render immediately and hold the frame so the transition is readable.
    async fn pulse(&mut self) {
        self.render(self.animation.frame()).await;
        let delay = self.settings.pacing_delay;
        match self.pacing.take(delay) {
            Some(delay) => tokio::time::sleep(delay).await,
            None if !delay.is_zero() => debug!("Pacing budget exhausted, not holding frame"),
            None => {}
        }
    }

    /// Best-effort status render. Suppressed once the session is finishing.
    async fn render(&mut self, frame: u64) {
        if self.animation.is_finished() {
            return;
        }
        let Some(handle) = self.handle.as_ref() else {
            return;
        };
        let status = render_status(&self.state, frame);
        match self
            .surface
            .update(&self.destination.channel, handle, &status)
            .await
        {
            Ok(()) => self.status_renders += 1,
            Err(e) => debug!(frame, error = %e, "Status update failed, skipping frame"),
        }
    }

    async fn finish(mut self, handle: MessageHandle) -> ChatReport {
        self.animation.cancel();
        self.transition(SessionPhase::SuccessFinalWrite);

        let text = self.state.final_text(&self.settings.fallback_text).to_string();
        let delivery = final_write(
            self.surface,
            &self.destination.channel,
            &handle,
            &text,
            &self.settings.retry,
        )
        .await;

        self.transition(SessionPhase::Terminated);
        ChatReport {
            handle,
            text,
            delivery,
            status_renders: self.status_renders,
        }
    }

    async fn fail(mut self, error: &StreamError) {
        self.animation.cancel();
        self.transition(SessionPhase::ErrorFinalWrite);

        let message = error_message(error);
        let channel = &self.destination.channel;
        match self.handle.as_ref() {
            Some(handle) => {
                if let Err(e) = self.surface.update(channel, handle, &message).await {
                    warn!(error = %e, "Failed to write error message over placeholder");
                }
            }
            None => {
                let thread = self.destination.thread_anchor.as_deref();
                if let Err(e) = self.surface.post(channel, thread, &message).await {
                    warn!(error = %e, "Failed to post error message");
                }
            }
        }

        self.transition(SessionPhase::Terminated);
    }
}
