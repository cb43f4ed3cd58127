//! Generation tokens for background requests.
//!
//! Workers can't be cancelled, so every request carries the token that was
//! current when it started. A result is applied only if its token is still
//! current when it arrives.

/// Identifies one request started by a [`RequestTracker`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestToken(u64);

#[derive(Debug, Default)]
pub struct RequestTracker {
    generation: u64,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a request, superseding every earlier one.
    pub fn begin(&mut self) -> RequestToken {
        self.generation += 1;
        RequestToken(self.generation)
    }

    pub fn is_current(&self, token: RequestToken) -> bool {
        token.0 == self.generation
    }

    /// Drop interest in everything in flight, e.g. when the page is hidden.
    pub fn invalidate(&mut self) {
        self.generation += 1;
    }
}

/// A worker result together with the token of the request that produced it.
#[derive(Debug)]
pub struct Tagged<T> {
    pub token: RequestToken,
    pub payload: T,
}

impl<T> Tagged<T> {
    pub fn new(token: RequestToken, payload: T) -> Self {
        Self { token, payload }
    }

    /// The payload if its request is still current.
    pub fn accept(self, tracker: &RequestTracker) -> Option<T> {
        if tracker.is_current(self.token) {
            Some(self.payload)
        } else {
            log::debug!("Discarding stale result {:?}", self.token);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newer_request_supersedes() {
        let mut tracker = RequestTracker::new();
        let first = tracker.begin();
        let second = tracker.begin();
        assert!(!tracker.is_current(first));
        assert!(tracker.is_current(second));

        assert_eq!(Tagged::new(first, 1).accept(&tracker), None);
        assert_eq!(Tagged::new(second, 2).accept(&tracker), Some(2));
    }

    #[test]
    fn test_invalidate_drops_in_flight() {
        let mut tracker = RequestTracker::new();
        let token = tracker.begin();
        tracker.invalidate();
        assert!(!tracker.is_current(token));
        let next = tracker.begin();
        assert!(tracker.is_current(next));
    }
}
