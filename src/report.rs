//! Report aggregation over already-fetched transaction lists.
//!
//! Every helper takes a slice and never fails: a failed fetch hands in an
//! empty slice and gets all-zero figures back.

use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

use crate::models::{
    DaybookTransaction, EntryType, Expense, PartyTransaction, PaymentStatus, Sale,
};

/// Label used when a record carries no category.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Anything with an amount and, optionally, a grouping label.
pub trait ReportRecord {
    fn amount(&self) -> f64;

    fn category(&self) -> Option<&str> {
        None
    }

    /// `YYYY-MM-DD` the record belongs to, when known.
    fn day(&self) -> Option<&str> {
        None
    }
}

fn day_prefix(timestamp: Option<&String>) -> Option<&str> {
    timestamp.and_then(|t| t.get(..10))
}

impl ReportRecord for Sale {
    fn amount(&self) -> f64 {
        self.total
    }

    fn category(&self) -> Option<&str> {
        self.payment_method.as_ref().map(|m| m.name.as_str())
    }

    fn day(&self) -> Option<&str> {
        day_prefix(self.created_at.as_ref())
    }
}

impl ReportRecord for Expense {
    fn amount(&self) -> f64 {
        self.amount
    }

    fn category(&self) -> Option<&str> {
        self.category.as_ref().map(|c| c.name.as_str())
    }

    fn day(&self) -> Option<&str> {
        day_prefix(self.created_at.as_ref())
    }
}

impl ReportRecord for PartyTransaction {
    fn amount(&self) -> f64 {
        self.amount
    }

    fn category(&self) -> Option<&str> {
        match self.entry_type {
            EntryType::Credit => Some("credit"),
            EntryType::Debit => Some("debit"),
            EntryType::Other => None,
        }
    }

    fn day(&self) -> Option<&str> {
        day_prefix(self.created_at.as_ref())
    }
}

impl ReportRecord for DaybookTransaction {
    fn amount(&self) -> f64 {
        self.amount
    }

    fn category(&self) -> Option<&str> {
        Some(self.transaction_type.label())
    }

    fn day(&self) -> Option<&str> {
        day_prefix(self.timestamp.as_ref())
    }
}

// ---------------------------------------------------------------------------
// Generic summaries
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Summary {
    pub total: f64,
    pub count: usize,
    pub average: f64,
}

pub fn summarize<T: ReportRecord>(records: &[T]) -> Summary {
    let total: f64 = records.iter().map(ReportRecord::amount).sum();
    let count = records.len();
    let average = if count > 0 { total / count as f64 } else { 0.0 };
    Summary {
        total,
        count,
        average,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub name: String,
    pub total: f64,
    pub count: usize,
}

/// Sum amounts per label produced by `label_of`. Groups come back in the
/// order their label was first seen; blank or missing labels fall into
/// [`UNCATEGORIZED`].
pub fn breakdown_by<T, F>(records: &[T], label_of: F) -> Vec<CategoryTotal>
where
    T: ReportRecord,
    F: Fn(&T) -> Option<&str>,
{
    let mut groups: Vec<CategoryTotal> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for record in records {
        let name = label_of(record)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(UNCATEGORIZED);
        match index.get(name) {
            Some(&i) => {
                groups[i].total += record.amount();
                groups[i].count += 1;
            }
            None => {
                index.insert(name.to_string(), groups.len());
                groups.push(CategoryTotal {
                    name: name.to_string(),
                    total: record.amount(),
                    count: 1,
                });
            }
        }
    }
    groups
}

pub fn category_breakdown<T: ReportRecord>(records: &[T]) -> Vec<CategoryTotal> {
    breakdown_by(records, |r| r.category())
}

/// Per-day totals keyed by `YYYY-MM-DD`; undated records are skipped.
pub fn daily_totals<T: ReportRecord>(records: &[T]) -> BTreeMap<String, f64> {
    let mut days = BTreeMap::new();
    for record in records {
        if let Some(day) = record.day() {
            *days.entry(day.to_string()).or_insert(0.0) += record.amount();
        }
    }
    days
}

// ---------------------------------------------------------------------------
// Domain summaries
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct LedgerSummary {
    pub total_credits: f64,
    pub total_debits: f64,
    pub net: f64,
}

/// Credits minus debits over a party's ledger.
pub fn ledger_summary(entries: &[PartyTransaction]) -> LedgerSummary {
    let mut summary = LedgerSummary::default();
    for entry in entries {
        match entry.entry_type {
            EntryType::Credit => summary.total_credits += entry.amount,
            EntryType::Debit => summary.total_debits += entry.amount,
            EntryType::Other => {}
        }
    }
    summary.net = summary.total_credits - summary.total_debits;
    summary
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SalesSummary {
    pub total_sales: f64,
    pub total_orders: usize,
    pub avg_order_value: f64,
    pub paid_orders: usize,
    pub pending_orders: usize,
}

pub fn sales_summary(sales: &[Sale]) -> SalesSummary {
    let base = summarize(sales);
    SalesSummary {
        total_sales: base.total,
        total_orders: base.count,
        avg_order_value: base.average,
        paid_orders: sales
            .iter()
            .filter(|s| s.payment_status == PaymentStatus::Paid)
            .count(),
        pending_orders: sales
            .iter()
            .filter(|s| s.payment_status == PaymentStatus::Pending)
            .count(),
    }
}

/// Everything the sales report screen shows above the list.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SalesReport {
    pub summary: SalesSummary,
    pub by_payment_method: Vec<CategoryTotal>,
    pub by_order_type: Vec<CategoryTotal>,
    pub daily: BTreeMap<String, f64>,
}

pub fn sales_report(sales: &[Sale]) -> SalesReport {
    SalesReport {
        summary: sales_summary(sales),
        by_payment_method: category_breakdown(sales),
        by_order_type: breakdown_by(sales, |s| Some(s.order_type.label())),
        daily: daily_totals(sales),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExpenseReport {
    pub summary: Summary,
    pub by_category: Vec<CategoryTotal>,
    pub daily: BTreeMap<String, f64>,
}

pub fn expense_report(expenses: &[Expense]) -> ExpenseReport {
    ExpenseReport {
        summary: summarize(expenses),
        by_category: category_breakdown(expenses),
        daily: daily_totals(expenses),
    }
}
