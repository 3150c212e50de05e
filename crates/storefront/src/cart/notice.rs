//! User-facing toast notices.
//!
//! The store reports what happened as a typed [`CartError`]; this module
//! decides how that is shown to a shopper. Every failure maps to one of four
//! fixed messages.

use serde::Serialize;

use super::CartError;

/// The cart operation a notice is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CartOperation {
    Add,
    Remove,
    UpdateAmount,
}

/// Severity shown by the toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Error,
}

/// A transient, non-blocking message for the shopper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Notice {
    OutOfStock,
    AddFailed,
    RemoveFailed,
    UpdateFailed,
}

impl Notice {
    /// Pick the notice for a failed operation.
    ///
    /// Stock shortages read the same for every operation; anything else is
    /// reported as a generic failure of the operation.
    #[must_use]
    pub const fn for_failure(operation: CartOperation, error: &CartError) -> Self {
        match (error, operation) {
            (CartError::OutOfStock { .. }, _) => Self::OutOfStock,
            (_, CartOperation::Add) => Self::AddFailed,
            (_, CartOperation::Remove) => Self::RemoveFailed,
            (_, CartOperation::UpdateAmount) => Self::UpdateFailed,
        }
    }

    /// Message text shown in the toast.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::OutOfStock => "Requested quantity is out of stock",
            Self::AddFailed => "Failed to add product",
            Self::RemoveFailed => "Failed to remove product",
            Self::UpdateFailed => "Failed to update product quantity",
        }
    }

    #[must_use]
    pub const fn level(self) -> NoticeLevel {
        NoticeLevel::Error
    }
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// Wire form of a notice, as sent to UI components.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoticeView {
    pub kind: Notice,
    pub level: NoticeLevel,
    pub message: &'static str,
}

impl From<Notice> for NoticeView {
    fn from(notice: Notice) -> Self {
        Self {
            kind: notice,
            level: notice.level(),
            message: notice.message(),
        }
    }
}
