use std::fmt;
use std::str::FromStr;

use crate::domain::{OrderItem, OrderItemStatus};

/// Transitions a supplier can trigger on an order item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemAction {
    Accept,
    Reject,
    Ship,
    Deliver,
}

impl ItemAction {
    pub fn as_str(self) -> &'static str {
        match self {
            ItemAction::Accept => "accept",
            ItemAction::Reject => "reject",
            ItemAction::Ship => "ship",
            ItemAction::Deliver => "deliver",
        }
    }
}

impl fmt::Display for ItemAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for ItemAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "accept" => Ok(ItemAction::Accept),
            "reject" => Ok(ItemAction::Reject),
            "ship" => Ok(ItemAction::Ship),
            "deliver" => Ok(ItemAction::Deliver),
            other => Err(format!("Unknown action: {}", other)),
        }
    }
}

/// Actions offered for `status`, in display order.
///
/// Anything not listed here gets no actions, including statuses the backend
/// adds later.
pub fn permitted_actions(status: &OrderItemStatus) -> &'static [ItemAction] {
    match status {
        OrderItemStatus::Pending => &[ItemAction::Accept, ItemAction::Reject],
        OrderItemStatus::Confirmed | OrderItemStatus::Processing => &[ItemAction::Ship],
        OrderItemStatus::Shipped => &[ItemAction::Deliver],
        OrderItemStatus::Delivered
        | OrderItemStatus::Cancelled
        | OrderItemStatus::Refunded
        | OrderItemStatus::Unknown(_) => &[],
    }
}

pub fn permitted_actions_for(raw_status: &str) -> &'static [ItemAction] {
    permitted_actions(&OrderItemStatus::from(raw_status))
}

impl OrderItem {
    pub fn permitted_actions(&self) -> &'static [ItemAction] {
        permitted_actions(&self.status)
    }

    pub fn offers(&self, action: ItemAction) -> bool {
        self.permitted_actions().contains(&action)
    }
}
