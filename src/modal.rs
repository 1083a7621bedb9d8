//! Generic modal dialog state
//!
//! Two states, `Closed` and `Open`. The content type is up to the caller;
//! the modal knows nothing about resources.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum Modal<C> {
    Closed,
    Open { title: String, content: C },
}

impl<C> Default for Modal<C> {
    fn default() -> Self {
        Self::Closed
    }
}

impl<C> Modal<C> {
    /// Closed -> Open. Returns `false` and leaves the current dialog in place
    /// if one is already open.
    pub fn open(&mut self, title: impl Into<String>, content: C) -> bool {
        if self.is_open() {
            return false;
        }
        *self = Self::Open {
            title: title.into(),
            content,
        };
        true
    }

    /// Open -> Closed, handing back the content. No-op when already closed.
    pub fn close(&mut self) -> Option<C> {
        match std::mem::take(self) {
            Self::Open { content, .. } => Some(content),
            Self::Closed => None,
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open { .. })
    }

    pub fn title(&self) -> Option<&str> {
        match self {
            Self::Open { title, .. } => Some(title),
            Self::Closed => None,
        }
    }

    pub fn content(&self) -> Option<&C> {
        match self {
            Self::Open { content, .. } => Some(content),
            Self::Closed => None,
        }
    }

    pub fn content_mut(&mut self) -> Option<&mut C> {
        match self {
            Self::Open { content, .. } => Some(content),
            Self::Closed => None,
        }
    }
}
