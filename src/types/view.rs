use std::time::{Duration, Instant};

/// How long a success message stays visible.
pub const FLASH_TTL: Duration = Duration::from_secs(3);

/// Which form the edit modal is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Closed,
    Creating,
    Editing(u64),
}

/// Two-state confirmation flow for deletes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeleteConfirmation {
    #[default]
    Idle,
    Pending(u64),
}

/// A transient success message.
#[derive(Debug, Clone, PartialEq)]
pub struct FlashMessage {
    pub text: String,
    pub shown_at: Instant,
}

impl FlashMessage {
    pub fn is_fresh(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.shown_at) < FLASH_TTL
    }
}
