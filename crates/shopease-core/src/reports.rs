//! # Reports
//!
//! Pure aggregation over the sales, catalog and staff collections.
//!
//! Every function takes `today` explicitly, so results never depend on the
//! wall clock and tests can pin the date. "Today" and "this month" are UTC
//! calendar comparisons against each sale's timestamp.
//!
//! ## Report Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  sales ─────┬──► dashboard_stats ◄── products, attendance              │
//! │             ├──► finance_stats   ◄── employees (salaries)              │
//! │             ├──► category_sales  ◄── products (category lookup)        │
//! │             ├──► daily_trend                                            │
//! │             └──► monthly_trend                                          │
//! │                                                                         │
//! │  attendance ──► attendance_summary ◄── employees                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing is cached: each call scans its inputs.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{AttendanceRecord, AttendanceStatus, Employee, Product, Sale};
use crate::{MAX_TREND_DAYS, MAX_TREND_MONTHS, TOP_PRODUCTS_LIMIT, UNKNOWN_CATEGORY};

// =============================================================================
// Period
// =============================================================================

/// Which sales a finance report covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    /// Sales made on the current UTC day.
    #[default]
    Today,
    /// Sales made in the current UTC calendar month.
    Month,
    /// Every sale.
    All,
}

impl Period {
    pub fn contains(self, day: NaiveDate, today: NaiveDate) -> bool {
        match self {
            Period::Today => day == today,
            Period::Month => day.year() == today.year() && day.month() == today.month(),
            Period::All => true,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Period::Today => "today",
            Period::Month => "month",
            Period::All => "all",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "today" => Ok(Period::Today),
            "month" => Ok(Period::Month),
            "all" => Ok(Period::All),
            other => Err(ValidationError::InvalidFormat {
                field: "period".to_string(),
                reason: format!("'{other}' is not one of today, month, all"),
            }),
        }
    }
}

fn sales_in<'a>(
    sales: &'a [Sale],
    period: Period,
    today: NaiveDate,
) -> impl Iterator<Item = &'a Sale> + 'a {
    sales
        .iter()
        .filter(move |sale| period.contains(sale.day(), today))
}

// =============================================================================
// Dashboard
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DashboardStats {
    pub today_sales: Money,
    pub today_profit: Money,
    pub total_products: usize,
    pub absent_today: usize,
}

pub fn dashboard_stats(
    products: &[Product],
    sales: &[Sale],
    attendance: &[AttendanceRecord],
    today: NaiveDate,
) -> DashboardStats {
    let (today_sales, today_profit) = sales_in(sales, Period::Today, today)
        .fold((Money::zero(), Money::zero()), |(total, profit), sale| {
            (total + sale.total, profit + sale.profit)
        });

    let absent_today = attendance
        .iter()
        .filter(|record| record.date == today && record.status == AttendanceStatus::Absent)
        .count();

    DashboardStats {
        today_sales,
        today_profit,
        total_products: products.len(),
        absent_today,
    }
}

// =============================================================================
// Finance
// =============================================================================

/// Units and revenue for one product within a report period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductSales {
    pub product_id: u64,
    /// Name as recorded on the first matching sale line.
    pub name: String,
    pub quantity: i64,
    pub revenue: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FinanceStats {
    pub period: Period,
    pub total_sales: Money,
    pub total_cost: Money,
    pub gross_profit: Money,
    pub total_salaries: Money,
    pub net_profit: Money,
    pub top_products: Vec<ProductSales>,
    pub sales_count: usize,
}

/// Finance summary for a period.
///
/// Salaries are monthly and always subtracted in full, whatever the period.
pub fn finance_stats(
    sales: &[Sale],
    employees: &[Employee],
    period: Period,
    today: NaiveDate,
) -> FinanceStats {
    let mut total_sales = Money::zero();
    let mut total_cost = Money::zero();
    let mut sales_count = 0;
    let mut per_product: Vec<ProductSales> = Vec::new();

    for sale in sales_in(sales, period, today) {
        total_sales += sale.total;
        total_cost += sale.cost;
        sales_count += 1;

        for item in &sale.items {
            match per_product.iter_mut().find(|p| p.product_id == item.product_id) {
                Some(entry) => {
                    entry.quantity = entry.quantity.saturating_add(item.quantity);
                    entry.revenue += item.line_total();
                }
                None => per_product.push(ProductSales {
                    product_id: item.product_id,
                    name: item.name.clone(),
                    quantity: item.quantity,
                    revenue: item.line_total(),
                }),
            }
        }
    }

    // Stable: ties keep encounter order
    per_product.sort_by(|a, b| b.quantity.cmp(&a.quantity));
    per_product.truncate(TOP_PRODUCTS_LIMIT);

    let gross_profit = total_sales - total_cost;
    let total_salaries: Money = employees.iter().map(|e| e.salary).sum();

    FinanceStats {
        period,
        total_sales,
        total_cost,
        gross_profit,
        total_salaries,
        net_profit: gross_profit - total_salaries,
        top_products: per_product,
        sales_count,
    }
}

// =============================================================================
// Category Breakdown
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CategorySales {
    pub category: String,
    pub revenue: Money,
}

/// Revenue per product category, in encounter order.
///
/// Lines whose product has since been deleted count under "Unknown".
pub fn category_sales(
    sales: &[Sale],
    products: &[Product],
    period: Period,
    today: NaiveDate,
) -> Vec<CategorySales> {
    let mut out: Vec<CategorySales> = Vec::new();

    for item in sales_in(sales, period, today).flat_map(|sale| sale.items.iter()) {
        let category = products
            .iter()
            .find(|p| p.id == item.product_id)
            .map(|p| p.category.as_str())
            .filter(|c| !c.trim().is_empty())
            .unwrap_or(UNKNOWN_CATEGORY);

        match out.iter_mut().find(|c| c.category == category) {
            Some(entry) => entry.revenue += item.line_total(),
            None => out.push(CategorySales {
                category: category.to_string(),
                revenue: item.line_total(),
            }),
        }
    }

    out
}

// =============================================================================
// Trends
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DailyPoint {
    #[ts(as = "String")]
    pub date: NaiveDate,
    pub sales: Money,
    pub profit: Money,
}

/// Per-day sales and profit for the last `days` days, oldest first,
/// ending with `today`. Days without sales are present with zeros.
///
/// Windows longer than [`MAX_TREND_DAYS`] are clamped, and the window stops
/// at the earliest date chrono can represent.
pub fn daily_trend(sales: &[Sale], today: NaiveDate, days: u32) -> Vec<DailyPoint> {
    let mut points: Vec<DailyPoint> = (0..days.min(MAX_TREND_DAYS))
        .map_while(|back| today.checked_sub_signed(Duration::days(i64::from(back))))
        .map(|date| {
            let (total, profit) = sales
                .iter()
                .filter(|sale| sale.day() == date)
                .fold((Money::zero(), Money::zero()), |(t, p), sale| {
                    (t + sale.total, p + sale.profit)
                });
            DailyPoint {
                date,
                sales: total,
                profit,
            }
        })
        .collect();
    points.reverse();
    points
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MonthlyPoint {
    /// `YYYY-MM`
    pub month: String,
    pub sales: Money,
    pub cost: Money,
    pub profit: Money,
}

/// `(year, month)` that lies `back` months before the given one.
fn months_back(year: i32, month: u32, back: u32) -> (i64, u32) {
    let index = i64::from(year) * 12 + i64::from(month) - 1 - i64::from(back);
    (index.div_euclid(12), index.rem_euclid(12) as u32 + 1)
}

/// Per-month sales, cost and profit for the last `months` months, oldest
/// first, ending with the current month. Clamped to [`MAX_TREND_MONTHS`].
pub fn monthly_trend(sales: &[Sale], today: NaiveDate, months: u32) -> Vec<MonthlyPoint> {
    (0..months.min(MAX_TREND_MONTHS))
        .rev()
        .map(|back| {
            let (year, month) = months_back(today.year(), today.month(), back);
            let mut point = MonthlyPoint {
                month: format!("{year:04}-{month:02}"),
                sales: Money::zero(),
                cost: Money::zero(),
                profit: Money::zero(),
            };
            for sale in sales
                .iter()
                .filter(|s| i64::from(s.day().year()) == year && s.day().month() == month)
            {
                point.sales += sale.total;
                point.cost += sale.cost;
                point.profit += sale.profit;
            }
            point
        })
        .collect()
}

// =============================================================================
// Attendance
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AttendanceSummary {
    #[ts(as = "String")]
    pub date: NaiveDate,
    pub present: usize,
    pub absent: usize,
    /// Employees with no record for the day.
    pub unmarked: usize,
    pub total_employees: usize,
}

pub fn attendance_summary(
    employees: &[Employee],
    attendance: &[AttendanceRecord],
    date: NaiveDate,
) -> AttendanceSummary {
    let mut present = 0;
    let mut absent = 0;
    let mut unmarked = 0;

    for employee in employees {
        let status = attendance
            .iter()
            .find(|r| r.employee_id == employee.id && r.date == date)
            .map(|r| r.status);
        match status {
            Some(AttendanceStatus::Present) => present += 1,
            Some(AttendanceStatus::Absent) => absent += 1,
            None => unmarked += 1,
        }
    }

    AttendanceSummary {
        date,
        present,
        absent,
        unmarked,
        total_employees: employees.len(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
