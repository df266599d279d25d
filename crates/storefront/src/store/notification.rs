//! User-facing notifications.
//!
//! The store raises one notification per failed operation and none on
//! success. Front ends show them as transient toasts.

use cartstore_core::ProductId;
use serde::Serialize;

/// Failure class of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// Requested quantity exceeds the available stock.
    StockExceeded,
    /// Adding a product failed.
    AddFailed,
    /// Removing a product failed.
    RemoveFailed,
    /// Changing a quantity failed.
    UpdateFailed,
}

impl NotificationKind {
    /// Message shown to the user.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::StockExceeded => "Requested quantity is out of stock",
            Self::AddFailed => "Failed to add product",
            Self::RemoveFailed => "Failed to remove product",
            Self::UpdateFailed => "Failed to update product quantity",
        }
    }
}

/// A toast-style message raised by a failed cart operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    /// Failure class.
    pub kind: NotificationKind,
    /// Product the operation targeted.
    pub product_id: ProductId,
    /// Message shown to the user.
    pub message: &'static str,
}

impl Notification {
    /// Create a notification with the standard message for `kind`.
    #[must_use]
    pub const fn new(kind: NotificationKind, product_id: ProductId) -> Self {
        Self {
            kind,
            product_id,
            message: kind.message(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_notification_serializes_for_front_ends() {
        let notification = Notification::new(NotificationKind::StockExceeded, ProductId::new(42));
        assert_eq!(
            serde_json::to_value(&notification).unwrap(),
            json!({
                "kind": "stock_exceeded",
                "product_id": 42,
                "message": "Requested quantity is out of stock"
            })
        );
    }

    #[test]
    fn test_every_kind_has_a_message() {
        for kind in [
            NotificationKind::StockExceeded,
            NotificationKind::AddFailed,
            NotificationKind::RemoveFailed,
            NotificationKind::UpdateFailed,
        ] {
            assert!(!kind.message().is_empty());
        }
    }
}
