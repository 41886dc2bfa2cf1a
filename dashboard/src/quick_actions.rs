//! Static quick-action shortcuts shown on the dashboard.

use serde::Serialize;

/// A dashboard shortcut.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuickAction {
    /// Stable identifier
    pub id: &'static str,
    /// Button title
    pub title: &'static str,
    /// One-line description
    pub description: &'static str,
    /// Emoji icon
    pub icon: &'static str,
    /// Frontend action key
    pub action: &'static str,
}

/// The shortcuts, in display order.
pub const QUICK_ACTIONS: [QuickAction; 4] = [
    QuickAction {
        id: "add_product",
        title: "Add New Product",
        description: "Create and list a new product",
        icon: "\u{2795}",
        action: "create_product",
    },
    QuickAction {
        id: "view_orders",
        title: "Manage Orders",
        description: "View and update order status",
        icon: "\u{1f4e6}",
        action: "view_orders",
    },
    QuickAction {
        id: "inventory",
        title: "Check Inventory",
        description: "Monitor stock levels",
        icon: "\u{1f4ca}",
        action: "view_inventory",
    },
    QuickAction {
        id: "analytics",
        title: "Sales Analytics",
        description: "View performance metrics",
        icon: "\u{1f4c8}",
        action: "view_analytics",
    },
];
