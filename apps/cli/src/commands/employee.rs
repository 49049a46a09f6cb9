//! # Employee Commands
//!
//! ```text
//! shopease employee hire "Hamid Raza" --salary 35000
//! shopease employee list
//! shopease employee dismiss 3        (their attendance goes too)
//! ```

use clap::Subcommand;
use serde::Serialize;
use shopease_core::{AttendanceRecord, Employee, Money};

use crate::commands::Context;
use crate::error::CliResult;

#[derive(Debug, Subcommand)]
pub enum EmployeeCommand {
    /// Add an employee and mark them present today
    Hire {
        name: String,
        /// Monthly salary, e.g. 35000
        #[arg(long)]
        salary: Money,
    },
    List,
    /// Remove an employee and their attendance
    Dismiss { id: u64 },
}

#[derive(Debug, Serialize)]
struct Hired {
    employee: Employee,
    attendance: AttendanceRecord,
}

#[derive(Debug, Serialize)]
struct Dismissed {
    employee_id: u64,
    attendance_removed: usize,
}

pub async fn handle(ctx: &Context, cmd: EmployeeCommand) -> CliResult<()> {
    match cmd {
        EmployeeCommand::Hire { name, salary } => {
            let (employee, attendance) = ctx
                .store
                .staff()
                .hire(Employee::new(name.trim(), salary))
                .await?;
            ctx.emit(&Hired { employee, attendance }, |ctx, h| {
                ctx.line(format!(
                    "✓ Hired #{} {} at {} / month",
                    h.employee.id,
                    h.employee.name,
                    ctx.money(h.employee.salary)
                ));
                ctx.line(format!("  Marked present for {}", h.attendance.date));
            })
        }
        EmployeeCommand::List => {
            let employees = ctx.store.employees().list().await?;
            ctx.emit(&employees, |ctx, list| {
                if list.is_empty() {
                    ctx.line("No employees.");
                    return;
                }
                for e in list {
                    ctx.line(format!("{:>4}  {:<30} {:>14}", e.id, e.name, ctx.money(e.salary)));
                }
                let payroll: Money = list.iter().map(|e| e.salary).sum();
                ctx.line(format!("      {:<30} {:>14}", "Monthly payroll", ctx.money(payroll)));
            })
        }
        EmployeeCommand::Dismiss { id } => {
            let removed = ctx.store.staff().dismiss(id).await?;
            let result = Dismissed {
                employee_id: id,
                attendance_removed: removed,
            };
            ctx.emit(&result, |ctx, d| {
                ctx.line(format!(
                    "✓ Dismissed employee #{} ({} attendance records removed)",
                    d.employee_id, d.attendance_removed
                ))
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::commands::testing::{context, joined, run};
    use crate::error::ErrorCode;
    use shopease_core::Money;

    #[tokio::test]
    async fn test_hire_list_dismiss() {
        let ctx = context().await;
        run(&ctx, &["employee", "hire", "Hamid Raza", "--salary", "35000"])
            .await
            .unwrap();
        run(&ctx, &["employee", "hire", "Sana", "--salary", "30000.50"])
            .await
            .unwrap();
        run(&ctx, &["employee", "list"]).await.unwrap();

        let out = joined(&ctx);
        assert!(out.contains("✓ Hired #1 Hamid Raza at Rs 35000.00 / month"));
        assert!(out.contains("Rs 65000.50"));
        assert_eq!(ctx.store.attendance().count().await.unwrap(), 2);

        run(&ctx, &["employee", "dismiss", "1"]).await.unwrap();
        assert_eq!(ctx.store.attendance().count().await.unwrap(), 1);
        let left = ctx.store.employees().list().await.unwrap();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].salary, Money::from_minor(3_000_050));

        let err = run(&ctx, &["employee", "dismiss", "1"]).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }
}
