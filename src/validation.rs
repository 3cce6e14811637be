//! Submission payloads and their client-side checks.
//!
//! The checks are presence/range only; the backend owns every business rule.
//! A failed check returns [`ApiError::Validation`] with the first problem
//! found and the request is never sent.

use serde::Serialize;

use crate::error::{ApiError, ApiResult};
use crate::models::{
    EntryType, OrderStatus, OrderType, PartyType, PaymentStatus, Role, SaleItem, TableStatus,
};

fn invalid(message: &str) -> ApiError {
    ApiError::Validation(message.to_string())
}

fn required(value: &str, message: &str) -> ApiResult<()> {
    if value.trim().is_empty() {
        Err(invalid(message))
    } else {
        Ok(())
    }
}

fn required_id(value: u64, message: &str) -> ApiResult<()> {
    if value == 0 {
        Err(invalid(message))
    } else {
        Ok(())
    }
}

/// NaN never passes a money check.
fn non_negative(value: f64, message: &str) -> ApiResult<()> {
    if value.is_nan() || value < 0.0 {
        Err(invalid(message))
    } else {
        Ok(())
    }
}

fn looks_like_email(value: &str) -> bool {
    let value = value.trim();
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && domain.contains('.')
                && !value.contains(char::is_whitespace)
        }
        None => false,
    }
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> ApiResult<()> {
        required(&self.email, "Email is required")?;
        required(&self.password, "Password is required")
    }
}

// ---------------------------------------------------------------------------
// Parties
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PartyForm {
    pub name: String,
    #[serde(rename = "type")]
    pub party_type: PartyType,
    pub address: String,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub balance: f64,
    pub is_active: bool,
}

impl PartyForm {
    pub fn validate(&self) -> ApiResult<()> {
        required(&self.name, "Name is required")?;
        if self.party_type == PartyType::Other {
            return Err(invalid("Type is required"));
        }
        required(&self.address, "Address is required")?;
        required(&self.phone, "Phone number is required")?;
        if let Some(email) = self.email.as_deref().filter(|e| !e.trim().is_empty()) {
            if !looks_like_email(email) {
                return Err(invalid("Invalid email address"));
            }
        }
        non_negative(self.balance, "Balance cannot be negative")?;
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PartyTransactionForm {
    pub party_id: u64,
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    pub amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<u64>,
}

impl PartyTransactionForm {
    pub fn validate(&self) -> ApiResult<()> {
        required_id(self.party_id, "Party is required")?;
        if self.entry_type == EntryType::Other {
            return Err(invalid("Transaction type is required"));
        }
        if self.amount.is_nan() || self.amount < 0.01 {
            return Err(invalid("Amount must be greater than zero"));
        }
        required(&self.description, "Description is required")
    }
}

// ---------------------------------------------------------------------------
// Menu
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct MenuCategoryForm {
    pub name: String,
}

impl MenuCategoryForm {
    pub fn validate(&self) -> ApiResult<()> {
        required(&self.name, "Category name is required")
    }
}

/// Used for both creating and editing a menu item.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemForm {
    pub category_id: u64,
    pub item_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub rate: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub is_available: bool,
}

impl MenuItemForm {
    pub fn validate(&self) -> ApiResult<()> {
        required_id(self.category_id, "Category is required")?;
        required(&self.item_name, "Item name is required")?;
        if self.rate.is_nan() || self.rate < 0.01 {
            return Err(invalid("Rate must be greater than zero"));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct UserForm {
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub password: String,
    pub role: Role,
}

impl UserForm {
    pub fn validate(&self) -> ApiResult<()> {
        required(&self.username, "Username is required")?;
        if self.password.chars().count() < 6 {
            return Err(invalid("Password must be at least 6 characters"));
        }
        if !matches!(self.role, Role::Admin | Role::Waiter) {
            return Err(invalid("Role is required"));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Sales
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesUpdateForm {
    pub payment_status: PaymentStatus,
    pub order_status: OrderStatus,
    pub payment_method_id: u64,
    pub order_type: OrderType,
    pub table_id: u64,
    pub party_id: u64,
    pub sub_total: f64,
    pub discount: f64,
    pub tax: f64,
    pub total: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sales_items: Option<Vec<SaleItem>>,
}

impl SalesUpdateForm {
    pub fn validate(&self) -> ApiResult<()> {
        if !matches!(self.payment_status, PaymentStatus::Paid | PaymentStatus::Pending) {
            return Err(invalid("Payment status is required"));
        }
        if !matches!(
            self.order_status,
            OrderStatus::Preparing | OrderStatus::Ready | OrderStatus::Served | OrderStatus::Cancelled
        ) {
            return Err(invalid("Order status is required"));
        }
        required_id(self.payment_method_id, "Payment method is required")?;
        if self.order_type == OrderType::Other {
            return Err(invalid("Order type is required"));
        }
        required_id(self.table_id, "Table is required")?;
        required_id(self.party_id, "Customer is required")?;
        non_negative(self.sub_total, "Subtotal must be positive")?;
        non_negative(self.discount, "Discount cannot be negative")?;
        non_negative(self.tax, "Tax cannot be negative")?;
        non_negative(self.total, "Total must be positive")?;
        for item in self.sales_items.iter().flatten() {
            required(&item.item_name, "Item name is required")?;
            if item.quantity < 1 {
                return Err(invalid("Quantity must be at least 1"));
            }
            non_negative(item.rate, "Rate must be positive")?;
            non_negative(item.total_price, "Total price must be positive")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tables
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize)]
pub struct TableForm {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TableStatus>,
}

impl TableForm {
    /// Creating a table needs a name; updates may change either field.
    pub fn validate_create(&self) -> ApiResult<()> {
        required(self.name.as_deref().unwrap_or(""), "Table name is required")?;
        self.validate_update()
    }

    pub fn validate_update(&self) -> ApiResult<()> {
        if let Some(name) = self.name.as_deref() {
            required(name, "Table name is required")?;
        }
        if self.status == Some(TableStatus::Other) {
            return Err(invalid("Status must be available, unavailable or reserved"));
        }
        if self.name.is_none() && self.status.is_none() {
            return Err(invalid("Nothing to update"));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Expenses
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseForm {
    pub description: String,
    pub amount: f64,
    pub category_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub party_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl ExpenseForm {
    pub fn validate(&self) -> ApiResult<()> {
        required(&self.description, "Description is required")?;
        if self.amount.is_nan() || self.amount < 0.01 {
            return Err(invalid("Amount must be greater than zero"));
        }
        required_id(self.category_id, "Category is required")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn party() -> PartyForm {
        PartyForm {
            name: "Himalayan Traders".into(),
            party_type: PartyType::Supplier,
            address: "Kathmandu".into(),
            phone: "9800000000".into(),
            email: None,
            balance: 0.0,
            is_active: true,
        }
    }

    fn message(err: ApiError) -> String {
        match err {
            ApiError::Validation(m) => m,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn party_form_checks_required_fields_in_order() {
        assert!(party().validate().is_ok());

        let mut p = party();
        p.phone = " ".into();
        assert_eq!(message(p.validate().unwrap_err()), "Phone number is required");

        let mut p = party();
        p.email = Some("not-an-email".into());
        assert_eq!(message(p.validate().unwrap_err()), "Invalid email address");

        let mut p = party();
        p.balance = -1.0;
        assert_eq!(message(p.validate().unwrap_err()), "Balance cannot be negative");
    }

    #[test]
    fn party_form_serializes_type_field() {
        let value = serde_json::to_value(party()).expect("serialize");
        assert_eq!(value["type"], json!("supplier"));
        assert_eq!(value["isActive"], json!(true));
        assert!(value.get("email").is_none());
    }

    #[test]
    fn party_transaction_amount_must_be_positive() {
        let mut form = PartyTransactionForm {
            party_id: 4,
            entry_type: EntryType::Credit,
            amount: 0.0,
            reference: None,
            description: "Cash receipt".into(),
            created_by: Some(1),
        };
        assert_eq!(
            message(form.validate().unwrap_err()),
            "Amount must be greater than zero"
        );
        form.amount = f64::NAN;
        assert!(form.validate().is_err());
        form.amount = 250.0;
        assert!(form.validate().is_ok());
    }

    #[test]
    fn user_form_requires_long_password_and_known_role() {
        let mut user = UserForm {
            username: "sita".into(),
            email: None,
            password: "12345".into(),
            role: Role::Waiter,
        };
        assert_eq!(
            message(user.validate().unwrap_err()),
            "Password must be at least 6 characters"
        );
        user.password = "123456".into();
        assert!(user.validate().is_ok());
        user.role = Role::Manager;
        assert_eq!(message(user.validate().unwrap_err()), "Role is required");
    }

    #[test]
    fn sales_update_rejects_bad_items() {
        let mut form = SalesUpdateForm {
            payment_status: PaymentStatus::Paid,
            order_status: OrderStatus::Served,
            payment_method_id: 1,
            order_type: OrderType::Takeaway,
            table_id: 2,
            party_id: 3,
            sub_total: 100.0,
            discount: 0.0,
            tax: 13.0,
            total: 113.0,
            notes: None,
            sales_items: Some(vec![SaleItem {
                id: None,
                item_name: "Tea".into(),
                quantity: 0,
                rate: 50.0,
                total_price: 0.0,
                notes: None,
                menu_item_id: None,
            }]),
        };
        assert_eq!(message(form.validate().unwrap_err()), "Quantity must be at least 1");

        form.sales_items = None;
        assert!(form.validate().is_ok());

        form.order_status = OrderStatus::Pending;
        assert_eq!(message(form.validate().unwrap_err()), "Order status is required");
    }

    #[test]
    fn sales_update_rejects_nan_money() {
        let mut form = SalesUpdateForm {
            payment_status: PaymentStatus::Pending,
            order_status: OrderStatus::Preparing,
            payment_method_id: 1,
            order_type: OrderType::DineIn,
            table_id: 2,
            party_id: 3,
            sub_total: f64::NAN,
            discount: 0.0,
            tax: 0.0,
            total: 80.0,
            notes: None,
            sales_items: None,
        };
        assert_eq!(message(form.validate().unwrap_err()), "Subtotal must be positive");

        form.sub_total = 80.0;
        form.discount = f64::NAN;
        assert_eq!(message(form.validate().unwrap_err()), "Discount cannot be negative");

        form.discount = 0.0;
        form.sales_items = Some(vec![SaleItem {
            id: None,
            item_name: "Momo".into(),
            quantity: 2,
            rate: 40.0,
            total_price: f64::NAN,
            notes: None,
            menu_item_id: None,
        }]);
        assert_eq!(message(form.validate().unwrap_err()), "Total price must be positive");
    }

    #[test]
    fn table_form_create_and_update_rules() {
        assert!(TableForm::default().validate_create().is_err());
        assert!(TableForm::default().validate_update().is_err());

        let status_only = TableForm {
            name: None,
            status: Some(TableStatus::Reserved),
        };
        assert!(status_only.validate_update().is_ok());
        assert!(status_only.validate_create().is_err());
    }

    #[test]
    fn menu_item_and_category_forms() {
        assert!(MenuCategoryForm { name: "".into() }.validate().is_err());
        let item = MenuItemForm {
            category_id: 2,
            item_name: "Chowmein".into(),
            description: None,
            rate: 0.0,
            image: None,
            is_available: true,
        };
        assert_eq!(
            message(item.validate().unwrap_err()),
            "Rate must be greater than zero"
        );
    }
}
