//! Frame scheduling
//!
//! The host (browser `requestAnimationFrame`, or a manual driver) runs one
//! callback per frame. [`FrameScheduler`] keeps at most one request pending:
//! arming always cancels the previous request first, so two loops can never
//! end up running side by side.

/// Identifies one pending frame request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameToken(pub i32);

/// Host-side frame callback primitives
pub trait FrameHost {
    /// Ask for the next frame callback
    fn request_frame(&mut self) -> FrameToken;
    /// Withdraw a pending request
    fn cancel_frame(&mut self, token: FrameToken);
    /// Current timestamp (ms), same clock as frame callbacks
    fn now(&self) -> f64;
}

/// Owner of the single live frame request
#[derive(Debug, Default)]
pub struct FrameScheduler {
    pending: Option<FrameToken>,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel whatever is pending, then request a fresh frame
    pub fn arm(&mut self, host: &mut dyn FrameHost) {
        self.cancel(host);
        self.pending = Some(host.request_frame());
    }

    /// Cancel the pending request, if any
    pub fn cancel(&mut self, host: &mut dyn FrameHost) {
        if let Some(token) = self.pending.take() {
            host.cancel_frame(token);
        }
    }

    /// The pending request has just fired and is no longer cancellable
    pub fn on_fired(&mut self) {
        self.pending = None;
    }

    pub fn is_armed(&self) -> bool {
        self.pending.is_some()
    }

    #[cfg(test)]
    pub fn pending(&self) -> Option<FrameToken> {
        self.pending
    }
}

/// Frame host driven by hand: headless runs and tests
///
/// Tracks every request that is still live so callers can check that no more
/// than one is ever outstanding.
#[derive(Debug, Default)]
pub struct ManualFrameHost {
    /// Current time (ms)
    pub clock: f64,
    live: Vec<FrameToken>,
    next_id: i32,
    /// High-water mark of simultaneously live requests
    pub max_live: usize,
    pub cancelled: usize,
}

impl ManualFrameHost {
    pub fn new(start: f64) -> Self {
        Self {
            clock: start,
            ..Self::default()
        }
    }

    /// Move the clock forward
    pub fn advance(&mut self, ms: f64) {
        self.clock += ms;
    }

    /// Consume the live request, as the host would when it fires it
    pub fn take_due(&mut self) -> Option<FrameToken> {
        if self.live.is_empty() {
            None
        } else {
            Some(self.live.remove(0))
        }
    }

    pub fn live(&self) -> &[FrameToken] {
        &self.live
    }
}

impl FrameHost for ManualFrameHost {
    fn request_frame(&mut self) -> FrameToken {
        self.next_id += 1;
        let token = FrameToken(self.next_id);
        self.live.push(token);
        self.max_live = self.max_live.max(self.live.len());
        token
    }

    fn cancel_frame(&mut self, token: FrameToken) {
        self.live.retain(|t| *t != token);
        self.cancelled += 1;
    }

    fn now(&self) -> f64 {
        self.clock
    }
}
