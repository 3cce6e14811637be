//! Per-resource operations against the dashboard API.
//!
//! Each function is one screen's data need: a read that goes through the
//! query cache, or a validated mutation that invalidates the cache entries of
//! the resources it touches.

pub mod auth;
pub mod backup;
pub mod daybook;
pub mod expenses;
pub mod menu;
pub mod overview;
pub mod parties;
pub mod reports;
pub mod sales;
pub mod tables;
pub mod users;

/// Cache resource names shared between reads and the mutations that
/// invalidate them.
pub mod keys {
    pub const SALES: &str = "sales";
    pub const SALES_REPORT: &str = "reports/sales";
    pub const EXPENSES: &str = "expenses";
    pub const EXPENSE_REPORT: &str = "reports/expenses";
    pub const EXPENSE_CATEGORIES: &str = "expense-categories";
    pub const ANALYTICS: &str = "reports/analytics";
    pub const PAYMENT_METHODS: &str = "payment-methods";
    pub const PARTIES: &str = "parties";
    pub const PARTY_TRANSACTIONS: &str = "party-transactions";
    pub const TABLES: &str = "tables";
    pub const MENU: &str = "menu";
    pub const USERS: &str = "users";
    pub const DAYBOOK: &str = "daybook";
    pub const SUMMARY: &str = "summary";
}
