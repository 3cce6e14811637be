//! Terminal renderings of the dashboard screens.
//!
//! Every function returns the rendered text; printing is left to the caller.

use comfy_table::{Attribute, Cell, Color, Table};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

use crate::models::{
    AnalyticsReport, Cart, Daybook, EntryType, Expense, MenuItem, Party, PartyTransaction,
    PaymentStatus, Sale, Table as DiningTable, User,
};
use crate::pagination::Pager;
use crate::report::{CategoryTotal, ExpenseReport, LedgerSummary, SalesReport, Summary};
use crate::resources::overview::Overview;
use crate::resources::tables::TableStatusCounts;

const CURRENCY: &str = "NPR";
const PAID: Color = Color::Rgb { r: 4, g: 120, b: 87 };
const UNPAID: Color = Color::Rgb { r: 185, g: 28, b: 28 };

/// `NPR 1,234.50`. Negative amounts get a leading minus.
pub fn format_currency(amount: f64) -> String {
    let sign = if amount < 0.0 { "-" } else { "" };
    let fixed = format!("{:.2}", amount.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{sign}{CURRENCY} {grouped}.{cents}")
}

/// Lower-case wire name of an enum value (`dine-in`, `paid`, ...).
fn wire_label<T: Serialize>(value: &T) -> String {
    serde_json::to_value(value)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_default()
}

fn or_dash(value: Option<&str>) -> &str {
    match value {
        Some(s) if !s.trim().is_empty() => s,
        _ => "-",
    }
}

/// `YYYY-MM-DD` part of an ISO timestamp.
fn date_part(timestamp: Option<&str>) -> &str {
    or_dash(timestamp.map(|d| d.get(..10).unwrap_or(d)))
}

fn money(amount: f64) -> Cell {
    Cell::new(format_currency(amount))
}

fn bold(text: impl ToString) -> Cell {
    Cell::new(text).add_attribute(Attribute::Bold)
}

fn card(title: &str, rows: &[(&str, String)]) -> String {
    let mut table = Table::new();
    table.set_header(vec![bold(title), Cell::new("")]);
    for (label, value) in rows {
        table.add_row(vec![Cell::new(label), Cell::new(value)]);
    }
    table.to_string()
}

/// "Page 2 of 3 (45 records)" plus the visible page-button window.
pub fn page_footer(pager: &Pager, len: usize) -> String {
    let total = pager.total_pages(len);
    if total == 0 {
        return "No records".to_string();
    }
    let buttons: Vec<String> = pager
        .buttons(len)
        .map(|p| {
            if p == pager.current() {
                format!("[{p}]")
            } else {
                p.to_string()
            }
        })
        .collect();
    format!(
        "Page {} of {total} ({len} records)  {}",
        pager.current(),
        buttons.join(" ")
    )
}

/// One rendered page of a list view plus its footer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageView {
    pub body: String,
    /// Set when the requested page did not exist and the pager stayed put.
    pub out_of_range: bool,
}

/// Move `pager` to `page` and render that slice with the page footer.
pub fn page_view<T>(
    items: &[T],
    pager: &mut Pager,
    page: usize,
    render: impl Fn(&[T]) -> String,
) -> PageView {
    let moved = pager.go_to(page, items.len());
    // Page 1 of an empty list is not an error.
    let out_of_range = !moved && page != 1;
    let body = format!(
        "{}\n{}",
        render(pager.slice(items)),
        page_footer(pager, items.len())
    );
    PageView { body, out_of_range }
}

pub fn summary_card(title: &str, summary: &Summary) -> String {
    card(
        title,
        &[
            ("Total", format_currency(summary.total)),
            ("Count", summary.count.to_string()),
            ("Average", format_currency(summary.average)),
        ],
    )
}

pub fn breakdown_table(title: &str, groups: &[CategoryTotal]) -> String {
    let mut table = Table::new();
    table.set_header(vec![bold(title), bold("Count"), bold("Total")]);
    for group in groups {
        table.add_row(vec![
            Cell::new(&group.name),
            Cell::new(group.count),
            money(group.total),
        ]);
    }
    table.to_string()
}

pub fn daily_table(days: &BTreeMap<String, f64>) -> String {
    let mut table = Table::new();
    table.set_header(vec![bold("Date"), bold("Amount")]);
    for (day, amount) in days {
        table.add_row(vec![Cell::new(day), money(*amount)]);
    }
    table.to_string()
}

// ---------------------------------------------------------------------------
// Sales and expenses
// ---------------------------------------------------------------------------

pub fn sales_table(sales: &[Sale]) -> String {
    let mut table = Table::new();
    table.set_header(vec![
        bold("ID"),
        bold("Invoice"),
        bold("Date"),
        bold("Type"),
        bold("Table"),
        bold("Party"),
        bold("Method"),
        bold("Status"),
        bold("Payment"),
        bold("Total"),
    ]);
    for sale in sales {
        let payment = wire_label(&sale.payment_status);
        let payment_cell = match sale.payment_status {
            PaymentStatus::Paid => Cell::new(payment).fg(PAID),
            PaymentStatus::Pending => Cell::new(payment).fg(UNPAID),
            _ => Cell::new(payment),
        };
        table.add_row(vec![
            Cell::new(sale.id),
            Cell::new(&sale.invoice_number),
            Cell::new(date_part(sale.created_at.as_deref())),
            Cell::new(sale.order_type.label()),
            Cell::new(or_dash(sale.table.as_ref().map(|t| t.name.as_str()))),
            Cell::new(or_dash(sale.party.as_ref().map(|p| p.name.as_str()))),
            Cell::new(or_dash(sale.payment_method.as_ref().map(|m| m.name.as_str()))),
            Cell::new(wire_label(&sale.order_status)),
            payment_cell,
            money(sale.total),
        ]);
    }
    table.to_string()
}

pub fn sales_report_view(report: &SalesReport) -> String {
    let s = &report.summary;
    [
        card(
            "Sales summary",
            &[
                ("Total sales", format_currency(s.total_sales)),
                ("Orders", s.total_orders.to_string()),
                ("Average order", format_currency(s.avg_order_value)),
                ("Paid orders", s.paid_orders.to_string()),
                ("Pending orders", s.pending_orders.to_string()),
            ],
        ),
        breakdown_table("Payment method", &report.by_payment_method),
        breakdown_table("Order type", &report.by_order_type),
        daily_table(&report.daily),
    ]
    .join("\n")
}

pub fn expenses_table(expenses: &[Expense]) -> String {
    let mut table = Table::new();
    table.set_header(vec![
        bold("ID"),
        bold("Date"),
        bold("Description"),
        bold("Category"),
        bold("Party"),
        bold("Method"),
        bold("Amount"),
    ]);
    for expense in expenses {
        table.add_row(vec![
            Cell::new(expense.id),
            Cell::new(date_part(expense.created_at.as_deref())),
            Cell::new(&expense.description),
            Cell::new(or_dash(expense.category.as_ref().map(|c| c.name.as_str()))),
            Cell::new(or_dash(expense.party.as_ref().map(|p| p.name.as_str()))),
            Cell::new(or_dash(expense.payment_method.as_ref().map(|m| m.name.as_str()))),
            money(expense.amount),
        ]);
    }
    table.to_string()
}

pub fn expense_report_view(report: &ExpenseReport) -> String {
    [
        summary_card("Expense summary", &report.summary),
        breakdown_table("Category", &report.by_category),
        daily_table(&report.daily),
    ]
    .join("\n")
}

pub fn analytics_view(report: &AnalyticsReport) -> String {
    let s = &report.summary;
    let mut parts = vec![card(
        "Analytics",
        &[
            ("Total sales", format_currency(s.total_sales)),
            ("Total expenses", format_currency(s.total_expenses)),
            ("Net profit", format_currency(s.net_profit)),
            ("Orders", s.total_orders.to_string()),
            ("Average order", format_currency(s.average_order_value)),
        ],
    )];

    if !report.top_items.is_empty() {
        let mut table = Table::new();
        table.set_header(vec![bold("Top item"), bold("Qty"), bold("Revenue")]);
        for item in &report.top_items {
            table.add_row(vec![
                Cell::new(&item.item_name),
                Cell::new(item.total_quantity),
                money(item.total_revenue),
            ]);
        }
        parts.push(table.to_string());
    }
    if !report.daily_sales.is_empty() {
        parts.push(daily_table(&report.daily_sales));
    }

    let mut stats = Table::new();
    stats.set_header(vec![bold("Breakdown"), bold("Key"), bold("Value")]);
    for (key, count) in &report.order_type_stats {
        stats.add_row(vec![Cell::new("Order type"), Cell::new(key), Cell::new(count)]);
    }
    for (key, count) in &report.order_status_stats {
        stats.add_row(vec![Cell::new("Order status"), Cell::new(key), Cell::new(count)]);
    }
    for (key, amount) in &report.payment_method_stats {
        stats.add_row(vec![Cell::new("Payment method"), Cell::new(key), money(*amount)]);
    }
    for (key, amount) in &report.expense_categories {
        stats.add_row(vec![Cell::new("Expense category"), Cell::new(key), money(*amount)]);
    }
    parts.push(stats.to_string());
    parts.join("\n")
}

// ---------------------------------------------------------------------------
// Parties
// ---------------------------------------------------------------------------

pub fn parties_table(parties: &[Party]) -> String {
    let mut table = Table::new();
    table.set_header(vec![
        bold("ID"),
        bold("Name"),
        bold("Type"),
        bold("Phone"),
        bold("Address"),
        bold("Balance"),
        bold("Active"),
    ]);
    for party in parties {
        table.add_row(vec![
            Cell::new(party.id),
            Cell::new(&party.name),
            Cell::new(wire_label(&party.party_type)),
            Cell::new(or_dash(party.phone.as_deref())),
            Cell::new(or_dash(party.address.as_deref())),
            money(party.balance),
            Cell::new(if party.is_active { "yes" } else { "no" }),
        ]);
    }
    table.to_string()
}

pub fn ledger_view(entries: &[PartyTransaction], summary: &LedgerSummary) -> String {
    let mut table = Table::new();
    table.set_header(vec![
        bold("Date"),
        bold("Type"),
        bold("Reference"),
        bold("Description"),
        bold("Amount"),
        bold("Balance"),
    ]);
    for entry in entries {
        let kind = wire_label(&entry.entry_type);
        let kind_cell = match entry.entry_type {
            EntryType::Credit => Cell::new(kind).fg(PAID),
            EntryType::Debit => Cell::new(kind).fg(UNPAID),
            EntryType::Other => Cell::new(kind),
        };
        table.add_row(vec![
            Cell::new(date_part(entry.created_at.as_deref())),
            kind_cell,
            Cell::new(or_dash(entry.reference.as_deref())),
            Cell::new(or_dash(entry.description.as_deref())),
            money(entry.amount),
            entry
                .balance_after
                .map(money)
                .unwrap_or_else(|| Cell::new("-")),
        ]);
    }
    [
        table.to_string(),
        card(
            "Ledger",
            &[
                ("Credits", format_currency(summary.total_credits)),
                ("Debits", format_currency(summary.total_debits)),
                ("Net", format_currency(summary.net)),
            ],
        ),
    ]
    .join("\n")
}

// ---------------------------------------------------------------------------
// Tables, menu, users
// ---------------------------------------------------------------------------

pub fn tables_view(tables: &[DiningTable], counts: &TableStatusCounts) -> String {
    let mut table = Table::new();
    table.set_header(vec![bold("ID"), bold("Name"), bold("Status")]);
    for t in tables {
        table.add_row(vec![Cell::new(t.id), Cell::new(&t.name), Cell::new(t.status.label())]);
    }
    [
        table.to_string(),
        card(
            "Tables",
            &[
                ("Total", counts.total.to_string()),
                ("Available", counts.available.to_string()),
                ("Unavailable", counts.unavailable.to_string()),
                ("Reserved", counts.reserved.to_string()),
            ],
        ),
    ]
    .join("\n")
}

pub fn orders_view(carts: &[Cart]) -> String {
    if carts.is_empty() {
        return "No orders on this table".to_string();
    }
    let mut table = Table::new();
    table.set_header(vec![bold("Cart"), bold("Status"), bold("Item"), bold("Qty"), bold("Price")]);
    for cart in carts {
        for item in &cart.items {
            table.add_row(vec![
                Cell::new(cart.id),
                Cell::new(or_dash(cart.status.as_deref())),
                Cell::new(or_dash(item.item_name.as_deref())),
                Cell::new(item.quantity.map(|q| q.to_string()).unwrap_or_default()),
                money(item.total_price),
            ]);
        }
        table.add_row(vec![
            bold(format!("Cart {} total", cart.id)),
            Cell::new(""),
            Cell::new(""),
            Cell::new(""),
            money(cart.total()).add_attribute(Attribute::Bold),
        ]);
    }
    let grand: f64 = carts.iter().map(Cart::total).sum();
    table.add_row(vec![
        bold("Grand total"),
        Cell::new(""),
        Cell::new(""),
        Cell::new(""),
        money(grand).add_attribute(Attribute::Bold),
    ]);
    table.to_string()
}

pub fn menu_table(items: &[&MenuItem], available: usize) -> String {
    let mut table = Table::new();
    table.set_header(vec![
        bold("ID"),
        bold("Item"),
        bold("Category"),
        bold("Rate"),
        bold("Available"),
    ]);
    for item in items {
        table.add_row(vec![
            Cell::new(item.id),
            Cell::new(&item.item_name),
            Cell::new(or_dash(item.category.as_ref().map(|c| c.name.as_str()))),
            money(item.rate),
            Cell::new(if item.is_available { "yes" } else { "no" }),
        ]);
    }
    format!(
        "{table}\n{} items, {available} available",
        items.len()
    )
}

pub fn users_table(users: &[User]) -> String {
    let mut table = Table::new();
    table.set_header(vec![bold("ID"), bold("Username"), bold("Email"), bold("Role"), bold("Active")]);
    for user in users {
        table.add_row(vec![
            Cell::new(user.id),
            Cell::new(&user.username),
            Cell::new(or_dash(user.email.as_deref())),
            Cell::new(wire_label(&user.role)),
            Cell::new(if user.is_active { "yes" } else { "no" }),
        ]);
    }
    table.to_string()
}

// ---------------------------------------------------------------------------
// Daybook and overview
// ---------------------------------------------------------------------------

pub fn daybook_view(book: &Daybook) -> String {
    let s = &book.summary;
    let mut splits = Table::new();
    splits.set_header(vec![bold(or_dash(s.date.as_deref())), bold("Cash"), bold("Online"), bold("Total")]);
    for (label, split) in [
        ("Opening balance", &s.opening_balance),
        ("Sales", &s.sales),
        ("Expenses", &s.expenses),
    ] {
        splits.add_row(vec![
            Cell::new(label),
            money(split.cash),
            money(split.online),
            money(split.total()),
        ]);
    }
    splits.add_row(vec![
        bold("Net"),
        money(s.net_cash),
        money(s.net_online),
        money(s.total_net).add_attribute(Attribute::Bold),
    ]);

    if book.transactions.is_empty() {
        return splits.to_string();
    }
    let mut txns = Table::new();
    txns.set_header(vec![bold("Time"), bold("Type"), bold("Mode"), bold("Description"), bold("Amount")]);
    for t in &book.transactions {
        txns.add_row(vec![
            Cell::new(or_dash(t.timestamp.as_deref())),
            Cell::new(t.transaction_type.label()),
            Cell::new(or_dash(t.payment_mode.as_deref())),
            Cell::new(or_dash(t.description.as_deref())),
            money(t.amount),
        ]);
    }
    format!("{splits}\n{txns}")
}

fn summary_rows(summary: &Value) -> Vec<(String, String)> {
    match summary {
        Value::Object(map) => map
            .iter()
            .filter_map(|(k, v)| match v {
                Value::Number(n) => Some((k.clone(), n.to_string())),
                Value::String(s) => Some((k.clone(), s.clone())),
                Value::Bool(b) => Some((k.clone(), b.to_string())),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

pub fn overview_view(overview: &Overview) -> String {
    let rows = summary_rows(&overview.summary.data);
    let borrowed: Vec<(&str, String)> = rows.iter().map(|(k, v)| (k.as_str(), v.clone())).collect();
    let mut parts = Vec::new();
    if !borrowed.is_empty() {
        parts.push(card("Summary", &borrowed));
    }
    parts.push(summary_card("Today's sales", &overview.sales_totals()));
    parts.push(summary_card("Today's expenses", &overview.expense_totals()));
    parts.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{ledger_summary, sales_report};
    use serde_json::json;

    #[test]
    fn currency_grouping() {
        assert_eq!(format_currency(0.0), "NPR 0.00");
        assert_eq!(format_currency(999.5), "NPR 999.50");
        assert_eq!(format_currency(1234.5), "NPR 1,234.50");
        assert_eq!(format_currency(1_234_567.891), "NPR 1,234,567.89");
        assert_eq!(format_currency(-40.0), "-NPR 40.00");
    }

    #[test]
    fn footer_marks_current_page() {
        let mut pager = Pager::new(20);
        pager.go_to(2, 45);
        assert_eq!(page_footer(&pager, 45), "Page 2 of 3 (45 records)  1 [2] 3");
        assert_eq!(page_footer(&Pager::new(20), 0), "No records");
    }

    #[test]
    fn page_view_ignores_missing_pages() {
        let rows: Vec<u32> = (1..=45).collect();
        let render = |slice: &[u32]| format!("{}..{}", slice[0], slice[slice.len() - 1]);
        let mut pager = Pager::new(20);

        let view = page_view(&rows, &mut pager, 3, render);
        assert!(!view.out_of_range);
        assert!(view.body.starts_with("41..45\n"));
        assert!(view.body.ends_with("Page 3 of 3 (45 records)  1 2 [3]"));

        let view = page_view(&rows, &mut pager, 9, render);
        assert!(view.out_of_range);
        assert_eq!(pager.current(), 3);

        let empty: Vec<u32> = Vec::new();
        let view = page_view(&empty, &mut Pager::new(20), 1, |_| String::from("(none)"));
        assert!(!view.out_of_range);
        assert_eq!(view.body, "(none)\nNo records");
    }

    #[test]
    fn sales_views_show_wire_labels_and_totals() {
        let sales: Vec<Sale> = serde_json::from_value(json!([
            { "id": 1, "invoiceNumber": "INV-1", "total": 1500, "paymentStatus": "paid",
              "orderStatus": "served", "orderType": "dine-in",
              "createdAt": "2026-10-16T09:30:00Z",
              "PaymentMethod": { "id": 1, "name": "Cash" } },
        ]))
        .expect("sales");

        let list = sales_table(&sales);
        assert!(list.contains("INV-1"));
        assert!(list.contains("dine-in"));
        assert!(list.contains("2026-10-16"));

        let report = sales_report_view(&sales_report(&sales));
        assert!(report.contains("NPR 1,500.00"));
        assert!(report.contains("Cash"));
    }

    #[test]
    fn ledger_view_shows_net() {
        let entries: Vec<PartyTransaction> = serde_json::from_value(json!([
            { "id": 1, "type": "credit", "amount": 100 },
            { "id": 2, "type": "debit", "amount": 40 },
        ]))
        .expect("entries");
        let text = ledger_view(&entries, &ledger_summary(&entries));
        assert!(text.contains("NPR 60.00"));
    }

    #[test]
    fn empty_orders_message() {
        assert_eq!(orders_view(&[]), "No orders on this table");
    }
}
