//! # Attendance Commands
//!
//! Dates default to today (UTC) and are given as `YYYY-MM-DD`.

use chrono::{NaiveDate, Utc};
use clap::{Subcommand, ValueEnum};
use serde::Serialize;
use shopease_core::reports::AttendanceSummary;
use shopease_core::{AttendanceRecord, AttendanceStatus, Employee};

use crate::commands::Context;
use crate::error::CliResult;

#[derive(Debug, Subcommand)]
pub enum AttendanceCommand {
    /// Set an employee's status for a day
    Mark {
        employee_id: u64,
        status: StatusArg,
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Flip present/absent; an unmarked day becomes present
    Toggle {
        employee_id: u64,
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Who was present, absent or unmarked on a day
    Summary {
        #[arg(long)]
        date: Option<NaiveDate>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StatusArg {
    Present,
    Absent,
}

impl From<StatusArg> for AttendanceStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Present => AttendanceStatus::Present,
            StatusArg::Absent => AttendanceStatus::Absent,
        }
    }
}

#[derive(Debug, Serialize)]
struct DayView {
    summary: AttendanceSummary,
    records: Vec<AttendanceRecord>,
}

fn day_or_today(date: Option<NaiveDate>) -> NaiveDate {
    date.unwrap_or_else(|| Utc::now().date_naive())
}

pub async fn handle(ctx: &Context, cmd: AttendanceCommand) -> CliResult<()> {
    let staff = ctx.store.staff();

    match cmd {
        AttendanceCommand::Mark {
            employee_id,
            status,
            date,
        } => {
            let record = staff
                .mark_attendance(employee_id, day_or_today(date), status.into())
                .await?;
            ctx.emit(&record, print_record)
        }
        AttendanceCommand::Toggle { employee_id, date } => {
            let record = staff
                .toggle_attendance(employee_id, day_or_today(date))
                .await?;
            ctx.emit(&record, print_record)
        }
        AttendanceCommand::Summary { date } => {
            let date = day_or_today(date);
            let summary = ctx.store.reports().attendance_summary(date).await?;
            let records = staff.attendance_on(date).await?;
            let employees = ctx.store.employees().list().await?;

            ctx.emit(&DayView { summary, records }, |ctx, view| {
                print_day(ctx, view, &employees)
            })
        }
    }
}

fn print_record(ctx: &Context, record: &AttendanceRecord) {
    ctx.line(format!(
        "✓ Employee #{} {} on {}",
        record.employee_id,
        record.status.as_str(),
        record.date
    ));
}

fn print_day(ctx: &Context, view: &DayView, employees: &[Employee]) {
    let s = &view.summary;
    ctx.line(format!(
        "{}: {} present, {} absent, {} unmarked ({} employees)",
        s.date, s.present, s.absent, s.unmarked, s.total_employees
    ));
    for e in employees {
        let status = view
            .records
            .iter()
            .find(|r| r.employee_id == e.id)
            .map_or("-", |r| r.status.as_str());
        ctx.line(format!("  {:>4}  {:<30} {}", e.id, e.name, status));
    }
}
