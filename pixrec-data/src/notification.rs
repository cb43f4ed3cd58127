//! Transient user notifications.

use std::time::Duration;

use crate::error::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn new(level: NotificationLevel, message: impl Into<String>) -> Self {
        Self { level, message: message.into() }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Success, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Info, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Error, message)
    }

    /// Error toast for a failed API call, prefixed with what was attempted.
    pub fn from_api_error(context: &str, error: &ApiError) -> Self {
        Self::error(format!("{} {}", context, error.user_message()))
    }

    pub fn display_duration(&self) -> Duration {
        match self.level {
            NotificationLevel::Success | NotificationLevel::Info => Duration::from_secs(3),
            NotificationLevel::Warning | NotificationLevel::Error => Duration::from_secs(4),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_durations() {
        assert_eq!(Notification::success("ok").display_duration(), Duration::from_secs(3));
        assert_eq!(Notification::info("i").display_duration(), Duration::from_secs(3));
        assert_eq!(Notification::warning("w").display_duration(), Duration::from_secs(4));
        assert_eq!(Notification::error("e").display_duration(), Duration::from_secs(4));
    }

    #[test]
    fn test_from_api_error() {
        let n = Notification::from_api_error("Upload failed.", &ApiError::Rejected);
        assert_eq!(n.level, NotificationLevel::Error);
        assert_eq!(n.message, "Upload failed. The server rejected the request.");
    }
}
