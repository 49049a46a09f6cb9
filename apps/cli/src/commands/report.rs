//! # Report Commands
//!
//! ```text
//! shopease report dashboard
//! shopease report finance    [--period today|month|all]
//! shopease report categories [--period today|month|all]
//! shopease report trend      [--days 7 | --months 6]
//! ```
//!
//! Days and months are UTC calendar days and months.

use clap::Subcommand;
use shopease_core::reports::{CategorySales, DailyPoint, FinanceStats, MonthlyPoint, Period};
use shopease_core::{MAX_TREND_DAYS, MAX_TREND_MONTHS};

use crate::commands::Context;
use crate::error::CliResult;

#[derive(Debug, Subcommand)]
pub enum ReportCommand {
    /// Today's sales and profit, product count, absences
    Dashboard,
    /// Revenue, cost, salaries and top products for a period
    Finance {
        #[arg(long, default_value = "today")]
        period: Period,
    },
    /// Revenue per product category
    Categories {
        #[arg(long, default_value = "all")]
        period: Period,
    },
    /// Sales and profit per day, or per month with --months
    Trend {
        /// 1 to 366
        #[arg(
            long,
            default_value_t = 7,
            value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_TREND_DAYS))
        )]
        days: u32,
        /// 1 to 120
        #[arg(
            long,
            conflicts_with = "days",
            value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_TREND_MONTHS))
        )]
        months: Option<u32>,
    },
}

pub async fn handle(ctx: &Context, cmd: ReportCommand) -> CliResult<()> {
    let reports = ctx.store.reports();

    match cmd {
        ReportCommand::Dashboard => {
            let stats = reports.dashboard().await?;
            ctx.emit(&stats, |ctx, s| {
                ctx.line(format!("{} dashboard", ctx.config.shop.name));
                ctx.line(format!("  Today's sales   {:>14}", ctx.money(s.today_sales)));
                ctx.line(format!("  Today's profit  {:>14}", ctx.money(s.today_profit)));
                ctx.line(format!("  Products        {:>14}", s.total_products));
                ctx.line(format!("  Absent today    {:>14}", s.absent_today));
            })
        }
        ReportCommand::Finance { period } => {
            let stats = reports.finance(period).await?;
            ctx.emit(&stats, print_finance)
        }
        ReportCommand::Categories { period } => {
            let categories = reports.categories(period).await?;
            ctx.emit(&categories, |ctx, rows| print_categories(ctx, rows, period))
        }
        ReportCommand::Trend { days, months } => match months {
            Some(months) => {
                let points = reports.monthly_trend(months).await?;
                ctx.emit(&points, |ctx, p| print_monthly(ctx, p))
            }
            None => {
                let points = reports.daily_trend(days).await?;
                ctx.emit(&points, |ctx, p| print_daily(ctx, p))
            }
        },
    }
}

fn print_finance(ctx: &Context, s: &FinanceStats) {
    ctx.line(format!("Finance ({}, {} sales)", s.period, s.sales_count));
    ctx.line(format!("  Sales           {:>14}", ctx.money(s.total_sales)));
    ctx.line(format!("  Cost of goods   {:>14}", ctx.money(s.total_cost)));
    ctx.line(format!("  Gross profit    {:>14}", ctx.money(s.gross_profit)));
    ctx.line(format!("  Salaries        {:>14}", ctx.money(s.total_salaries)));
    ctx.line(format!("  Net profit      {:>14}", ctx.money(s.net_profit)));

    if !s.top_products.is_empty() {
        ctx.line("Top products");
        for (rank, p) in s.top_products.iter().enumerate() {
            ctx.line(format!(
                "  {}. {:<28} {:>5} {:>14}",
                rank + 1,
                p.name,
                p.quantity,
                ctx.money(p.revenue)
            ));
        }
    }
}

fn print_categories(ctx: &Context, rows: &[CategorySales], period: Period) {
    if rows.is_empty() {
        ctx.line(format!("No sales ({}).", period));
        return;
    }
    for row in rows {
        ctx.line(format!("{:<20} {:>14}", row.category, ctx.money(row.revenue)));
    }
}

fn print_daily(ctx: &Context, points: &[DailyPoint]) {
    for p in points {
        ctx.line(format!(
            "{}  {:>14} {:>14}",
            p.date,
            ctx.money(p.sales),
            ctx.money(p.profit)
        ));
    }
}

fn print_monthly(ctx: &Context, points: &[MonthlyPoint]) {
    for p in points {
        ctx.line(format!(
            "{:<8} {:>14} {:>14} {:>14}",
            p.month,
            ctx.money(p.sales),
            ctx.money(p.cost),
            ctx.money(p.profit)
        ));
    }
}

#[cfg(test)]
mod tests {
    use crate::commands::testing::{context, joined, json_context, run};
    use shopease_core::reports::{DailyPoint, FinanceStats};
    use shopease_core::{Employee, Money, Product};

    async fn seed(ctx: &crate::commands::Context) {
        ctx.store
            .products()
            .add(Product::new("Black Tee", "A1", "Tops", Money::from_minor(500), Money::from_minor(800), 10))
            .await
            .unwrap();
        ctx.store
            .employees()
            .add(Employee::new("Hamid", Money::from_minor(100)))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_finance_after_checkout() {
        let ctx = json_context().await;
        seed(&ctx).await;
        run(&ctx, &["sale", "checkout", "--item", "A1:2", "--walk-in"]).await.unwrap();

        let report_ctx = crate::commands::Context::capturing(
            ctx.store.clone(),
            ctx.config.clone(),
            true,
        );
        run(&report_ctx, &["report", "finance", "--period", "all"]).await.unwrap();

        let stats: FinanceStats = serde_json::from_str(&joined(&report_ctx)).unwrap();
        assert_eq!(stats.total_sales, Money::from_minor(1600));
        assert_eq!(stats.gross_profit, Money::from_minor(600));
        assert_eq!(stats.net_profit, Money::from_minor(500));
        assert_eq!(stats.top_products[0].quantity, 2);
    }

    #[tokio::test]
    async fn test_dashboard_text() {
        let ctx = context().await;
        seed(&ctx).await;
        run(&ctx, &["report", "dashboard"]).await.unwrap();

        let out = joined(&ctx);
        assert!(out.contains("ShopEase dashboard"));
        assert!(out.contains("Rs 0.00"));
    }

    #[tokio::test]
    async fn test_daily_trend_length() {
        let ctx = json_context().await;
        run(&ctx, &["report", "trend", "--days", "3"]).await.unwrap();
        let points: Vec<DailyPoint> = serde_json::from_str(&joined(&ctx)).unwrap();
        assert_eq!(points.len(), 3);
        assert!(points.iter().all(|p| p.sales.is_zero()));
    }

    #[test]
    fn test_trend_windows_are_bounded() {
        use crate::cli::Cli;
        use clap::Parser;

        let parse = |args: &[&str]| {
            Cli::try_parse_from(
                ["shopease", "report", "trend"].iter().chain(args.iter()).copied(),
            )
        };
        assert!(parse(&["--days", "0"]).is_err());
        assert!(parse(&["--days", "367"]).is_err());
        assert!(parse(&["--days", "200000000"]).is_err());
        assert!(parse(&["--days", "366"]).is_ok());
        assert!(parse(&["--months", "0"]).is_err());
        assert!(parse(&["--months", "121"]).is_err());
        assert!(parse(&["--months", "120"]).is_ok());
    }

    #[tokio::test]
    async fn test_monthly_trend_length() {
        let ctx = json_context().await;
        run(&ctx, &["report", "trend", "--months", "120"]).await.unwrap();
        let points: Vec<shopease_core::reports::MonthlyPoint> =
            serde_json::from_str(&joined(&ctx)).unwrap();
        assert_eq!(points.len(), 120);
    }

    #[tokio::test]
    async fn test_categories_empty() {
        let ctx = context().await;
        run(&ctx, &["report", "categories"]).await.unwrap();
        assert_eq!(ctx.output(), vec!["No sales (all).".to_string()]);
    }
}
