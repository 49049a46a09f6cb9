//! # Report Service
//!
//! Read-only views over the stored sales, catalog and staff.
//!
//! The arithmetic lives in [`shopease_core::reports`]; this service takes a
//! consistent read of the document and feeds it the current UTC day.
//!
//! ```text
//! ┌──────────────┐   read (one lock)    ┌────────────────────────────┐
//! │ DocumentStore│ ───────────────────► │ core::reports::*(…, today) │
//! └──────────────┘                      └────────────────────────────┘
//! ```

use chrono::{NaiveDate, Utc};
use shopease_core::reports::{
    attendance_summary, category_sales, daily_trend, dashboard_stats, finance_stats,
    monthly_trend, AttendanceSummary, CategorySales, DailyPoint, DashboardStats, FinanceStats,
    MonthlyPoint, Period,
};
use tracing::debug;

use crate::error::StoreResult;
use crate::store::DocumentStore;

#[derive(Debug, Clone)]
pub struct ReportService {
    store: DocumentStore,
}

impl ReportService {
    pub fn new(store: DocumentStore) -> Self {
        ReportService { store }
    }

    fn today() -> NaiveDate {
        Utc::now().date_naive()
    }

    /// Today's sales and profit, catalog size and today's absences.
    pub async fn dashboard(&self) -> StoreResult<DashboardStats> {
        let today = Self::today();
        debug!(%today, "Building dashboard");
        self.store
            .read(|doc| dashboard_stats(&doc.products, &doc.sales, &doc.attendance, today))
            .await
    }

    pub async fn finance(&self, period: Period) -> StoreResult<FinanceStats> {
        let today = Self::today();
        debug!(%period, "Building finance report");
        self.store
            .read(|doc| finance_stats(&doc.sales, &doc.employees, period, today))
            .await
    }

    pub async fn categories(&self, period: Period) -> StoreResult<Vec<CategorySales>> {
        let today = Self::today();
        self.store
            .read(|doc| category_sales(&doc.sales, &doc.products, period, today))
            .await
    }

    /// Last `days` days ending today, oldest first.
    pub async fn daily_trend(&self, days: u32) -> StoreResult<Vec<DailyPoint>> {
        let today = Self::today();
        self.store
            .read(|doc| daily_trend(&doc.sales, today, days))
            .await
    }

    /// Last `months` calendar months ending with the current one.
    pub async fn monthly_trend(&self, months: u32) -> StoreResult<Vec<MonthlyPoint>> {
        let today = Self::today();
        self.store
            .read(|doc| monthly_trend(&doc.sales, today, months))
            .await
    }

    pub async fn attendance_summary(&self, date: NaiveDate) -> StoreResult<AttendanceSummary> {
        self.store
            .read(|doc| attendance_summary(&doc.employees, &doc.attendance, date))
            .await
    }
}
