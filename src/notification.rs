//! Notification System
//!
//! Records the outcome of every catalog operation, shows the latest one as a
//! toast in the footer and keeps a bounded history.

use crate::resource::ResourceKind;
use std::collections::VecDeque;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Level of detail for notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetailLevel {
    /// Minimal: status icon + outcome message
    Minimal,
    /// Detailed: adds the target and duration
    #[default]
    Detailed,
    /// Verbose: all info including error details
    Verbose,
}

impl DetailLevel {
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "minimal" => Self::Minimal,
            "verbose" => Self::Verbose,
            _ => Self::Detailed,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Minimal => "minimal",
            Self::Detailed => "detailed",
            Self::Verbose => "verbose",
        }
    }
}

/// Type of operation being performed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationType {
    Load,
    Create,
    Update,
    Delete,
    Upload,
}

impl OperationType {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Load => "Load",
            Self::Create => "Add",
            Self::Update => "Update",
            Self::Delete => "Delete",
            Self::Upload => "Upload",
        }
    }

    pub fn past_tense(&self) -> &'static str {
        match self {
            Self::Load => "loaded",
            Self::Create => "added",
            Self::Update => "updated",
            Self::Delete => "deleted",
            Self::Upload => "uploaded",
        }
    }

    pub fn present_participle(&self) -> &'static str {
        match self {
            Self::Load => "Loading",
            Self::Create => "Adding",
            Self::Update => "Updating",
            Self::Delete => "Deleting",
            Self::Upload => "Uploading",
        }
    }

    /// Infinitive used in failure messages ("Failed to add category")
    fn verb(&self) -> &'static str {
        match self {
            Self::Load => "load",
            Self::Create => "add",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Upload => "upload images for",
        }
    }
}

/// Status of a notification/operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationStatus {
    /// Request sent, waiting for the API
    Pending,
    Success,
    /// Operation failed with error message
    Error(String),
}

impl NotificationStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Success | Self::Error(_))
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Self::Pending => "◯",
            Self::Success => "✓",
            Self::Error(_) => "✗",
        }
    }
}

/// A single notification
#[derive(Debug, Clone)]
pub struct Notification {
    pub id: Uuid,
    pub operation_type: OperationType,
    pub resource_type: ResourceKind,
    /// Entity label or id the operation targeted; empty for list loads
    pub target: String,
    pub status: NotificationStatus,
    pub created_at: Instant,
    pub completed_at: Option<Instant>,
}

impl Notification {
    pub fn new(operation_type: OperationType, resource_type: ResourceKind, target: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            operation_type,
            resource_type,
            target,
            status: NotificationStatus::Pending,
            created_at: Instant::now(),
            completed_at: None,
        }
    }

    pub fn set_success(&mut self) {
        self.status = NotificationStatus::Success;
        self.completed_at = Some(Instant::now());
    }

    pub fn set_error(&mut self, error: String) {
        self.status = NotificationStatus::Error(error);
        self.completed_at = Some(Instant::now());
    }

    /// Get duration of operation (or elapsed time if still running)
    pub fn duration(&self) -> Duration {
        self.completed_at
            .unwrap_or_else(Instant::now)
            .duration_since(self.created_at)
    }

    /// Format duration for display
    pub fn duration_display(&self) -> String {
        let d = self.duration();
        if d.as_secs() < 1 {
            format!("{}ms", d.as_millis())
        } else if d.as_secs() < 60 {
            format!("{}s", d.as_secs())
        } else {
            format!("{}m{}s", d.as_secs() / 60, d.as_secs() % 60)
        }
    }

    /// Outcome sentence, e.g. "Category added successfully" / "Failed to load products"
    pub fn headline(&self) -> String {
        match (&self.status, self.operation_type) {
            (NotificationStatus::Pending, op) => {
                format!("{} {}", op.present_participle(), self.subject().to_lowercase())
            },
            (NotificationStatus::Success, op) => {
                format!("{} {} successfully", self.subject(), op.past_tense())
            },
            (NotificationStatus::Error(_), op) => {
                format!("Failed to {} {}", op.verb(), self.subject().to_lowercase())
            },
        }
    }

    fn subject(&self) -> &'static str {
        match self.operation_type {
            OperationType::Load => self.resource_type.plural(),
            _ => self.resource_type.display_name(),
        }
    }

    /// Format notification for toast display (short form)
    pub fn toast_message(&self, detail_level: DetailLevel) -> String {
        let icon = self.status.icon();
        let headline = self.headline();
        let target = if self.target.is_empty() {
            String::new()
        } else {
            format!(" '{}'", self.target)
        };

        match detail_level {
            DetailLevel::Minimal => format!("{} {}", icon, headline),
            DetailLevel::Detailed => {
                if self.status.is_terminal() {
                    format!("{} {}{} ({})", icon, headline, target, self.duration_display())
                } else {
                    format!("{} {}{}...", icon, headline, target)
                }
            },
            DetailLevel::Verbose => {
                let base = format!("{} {}{}", icon, headline, target);
                if let NotificationStatus::Error(ref err) = self.status {
                    format!("{} - {}", base, err)
                } else if self.status.is_terminal() {
                    format!("{} ({})", base, self.duration_display())
                } else {
                    format!("{}...", base)
                }
            },
        }
    }
}

/// Notification manager
pub struct NotificationManager {
    /// All notifications (recent first)
    pub notifications: VecDeque<Notification>,
    /// Maximum notifications to keep in history
    pub max_history: usize,
    /// Toast display duration
    pub toast_duration: Duration,
    /// Detail level for display
    pub detail_level: DetailLevel,
    /// Last toast notification (for display)
    last_toast_time: Option<Instant>,
}

impl Default for NotificationManager {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationManager {
    pub fn new() -> Self {
        Self {
            notifications: VecDeque::new(),
            max_history: 50,
            toast_duration: Duration::from_secs(5),
            detail_level: DetailLevel::Detailed,
            last_toast_time: None,
        }
    }

    /// Record the start of an operation; returns its id
    pub fn create_notification(
        &mut self,
        operation_type: OperationType,
        resource_type: ResourceKind,
        target: impl Into<String>,
    ) -> Uuid {
        let notification = Notification::new(operation_type, resource_type, target.into());
        let id = notification.id;
        self.notifications.push_front(notification);
        self.last_toast_time = Some(Instant::now());
        self.trim_history();
        id
    }

    pub fn mark_success(&mut self, id: Uuid) {
        if let Some(notif) = self.notifications.iter_mut().find(|n| n.id == id) {
            notif.set_success();
            self.last_toast_time = Some(Instant::now());
        }
    }

    pub fn mark_error(&mut self, id: Uuid, error: String) {
        if let Some(notif) = self.notifications.iter_mut().find(|n| n.id == id) {
            notif.set_error(error);
            self.last_toast_time = Some(Instant::now());
        }
    }

    /// Get notification by ID
    pub fn get(&self, id: Uuid) -> Option<&Notification> {
        self.notifications.iter().find(|n| n.id == id)
    }

    /// Most recent notification
    pub fn latest(&self) -> Option<&Notification> {
        self.notifications.front()
    }

    /// Get the most recent notification while its toast is still visible
    pub fn current_toast(&self) -> Option<&Notification> {
        let last_time = self.last_toast_time?;
        if last_time.elapsed() > self.toast_duration {
            return None;
        }
        self.notifications.front()
    }

    /// Get count of operations still waiting on the API
    pub fn pending_count(&self) -> usize {
        self.notifications
            .iter()
            .filter(|n| n.status == NotificationStatus::Pending)
            .count()
    }

    /// Clear all notifications
    pub fn clear(&mut self) {
        self.notifications.clear();
        self.last_toast_time = None;
    }

    /// Trim history to max size
    fn trim_history(&mut self) {
        while self.notifications.len() > self.max_history {
            // Remove oldest completed notification
            if let Some(pos) = self.notifications.iter().rposition(|n| n.status.is_terminal()) {
                self.notifications.remove(pos);
            } else {
                self.notifications.pop_back();
            }
        }
    }

    pub fn has_notifications(&self) -> bool {
        !self.notifications.is_empty()
    }
}
