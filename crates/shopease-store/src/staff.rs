//! # Staff Service
//!
//! Employees and their daily attendance.
//!
//! ```text
//! hire(e)            → employees.push(e) + attendance.push(e, today, present)
//! dismiss(id)        → employees.remove(id) + attendance.retain(employee != id)
//! mark(id, d, s)     → upsert (id, d)          one record per employee per day
//! toggle(id, d)      → present ↔ absent, or present when unmarked
//! ```
//!
//! Each operation is a single transaction.

use chrono::{NaiveDate, Utc};
use shopease_core::{AttendanceRecord, AttendanceStatus, Employee};
use tracing::{debug, info};

use crate::document::Document;
use crate::error::StoreResult;
use crate::repository::collection::{find, insert, modify};
use crate::store::DocumentStore;

#[derive(Debug, Clone)]
pub struct StaffService {
    store: DocumentStore,
}

/// Writes `status` for `(employee_id, date)`, updating an existing record
/// rather than adding a second one.
fn upsert_attendance(
    document: &mut Document,
    employee_id: u64,
    date: NaiveDate,
    status: impl FnOnce(Option<AttendanceStatus>) -> AttendanceStatus,
) -> StoreResult<AttendanceRecord> {
    find::<Employee>(document, employee_id)?;

    let existing = document
        .attendance
        .iter()
        .find(|r| r.employee_id == employee_id && r.date == date)
        .map(|r| (r.id, r.status));

    match existing {
        Some((id, current)) => {
            let next = status(Some(current));
            modify(document, id, |r: &mut AttendanceRecord| r.status = next)
        }
        None => insert(
            document,
            AttendanceRecord {
                id: 0,
                employee_id,
                date,
                status: status(None),
            },
        ),
    }
}

impl StaffService {
    pub fn new(store: DocumentStore) -> Self {
        StaffService { store }
    }

    /// Adds the employee and marks them present for today.
    pub async fn hire(&self, employee: Employee) -> StoreResult<(Employee, AttendanceRecord)> {
        let today = Utc::now().date_naive();
        let (employee, record) = self
            .store
            .transact(|doc| {
                let employee = insert(doc, employee)?;
                let record = upsert_attendance(doc, employee.id, today, |_| {
                    AttendanceStatus::Present
                })?;
                Ok((employee, record))
            })
            .await?;

        info!(employee_id = employee.id, name = %employee.name, "Employee hired");
        Ok((employee, record))
    }

    /// Removes the employee and every attendance record they have.
    ///
    /// ## Returns
    /// How many attendance records went with them.
    pub async fn dismiss(&self, employee_id: u64) -> StoreResult<usize> {
        let removed = self
            .store
            .transact(|doc| {
                find::<Employee>(doc, employee_id)?;
                doc.employees.retain(|e| e.id != employee_id);

                let before = doc.attendance.len();
                doc.attendance.retain(|r| r.employee_id != employee_id);
                Ok(before - doc.attendance.len())
            })
            .await?;

        info!(employee_id, attendance_removed = removed, "Employee dismissed");
        Ok(removed)
    }

    pub async fn mark_attendance(
        &self,
        employee_id: u64,
        date: NaiveDate,
        status: AttendanceStatus,
    ) -> StoreResult<AttendanceRecord> {
        debug!(employee_id, %date, status = status.as_str(), "Marking attendance");
        self.store
            .transact(|doc| upsert_attendance(doc, employee_id, date, |_| status))
            .await
    }

    /// Flips the day's status. An unmarked day becomes present.
    pub async fn toggle_attendance(
        &self,
        employee_id: u64,
        date: NaiveDate,
    ) -> StoreResult<AttendanceRecord> {
        debug!(employee_id, %date, "Toggling attendance");
        self.store
            .transact(|doc| {
                upsert_attendance(doc, employee_id, date, |current| {
                    current.map_or(AttendanceStatus::Present, AttendanceStatus::toggled)
                })
            })
            .await
    }

    pub async fn attendance_on(&self, date: NaiveDate) -> StoreResult<Vec<AttendanceRecord>> {
        self.store
            .read(|doc| {
                doc.attendance
                    .iter()
                    .filter(|r| r.date == date)
                    .cloned()
                    .collect()
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StoreConfig;
    use crate::StoreError;
    use shopease_core::Money;

    async fn store() -> DocumentStore {
        DocumentStore::open(StoreConfig::in_memory()).await.unwrap()
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn test_hire_marks_present_today() {
        let store = store().await;
        let (hamid, record) = store
            .staff()
            .hire(Employee::new("Hamid", Money::from_minor(3_000_000)))
            .await
            .unwrap();

        assert_eq!(hamid.id, 1);
        assert_eq!(record.employee_id, hamid.id);
        assert_eq!(record.date, Utc::now().date_naive());
        assert_eq!(record.status, AttendanceStatus::Present);
    }

    #[tokio::test]
    async fn test_hire_rejects_invalid_employee() {
        let store = store().await;
        let err = store
            .staff()
            .hire(Employee::new("", Money::from_minor(100)))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
        assert_eq!(store.attendance().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_dismiss_cascades_attendance() {
        let store = store().await;
        let staff = store.staff();
        let (hamid, _) = staff.hire(Employee::new("Hamid", Money::zero())).await.unwrap();
        let (sana, _) = staff.hire(Employee::new("Sana", Money::zero())).await.unwrap();
        staff
            .mark_attendance(hamid.id, day(2026, 1, 5), AttendanceStatus::Absent)
            .await
            .unwrap();

        assert_eq!(staff.dismiss(hamid.id).await.unwrap(), 2);
        assert_eq!(store.employees().count().await.unwrap(), 1);

        let left = store.attendance().list().await.unwrap();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].employee_id, sana.id);

        assert!(matches!(
            staff.dismiss(hamid.id).await,
            Err(StoreError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_mark_merges_same_day() {
        let store = store().await;
        let staff = store.staff();
        let emp = store
            .employees()
            .add(Employee::new("Omar", Money::zero()))
            .await
            .unwrap();
        let date = day(2026, 3, 2);

        let first = staff
            .mark_attendance(emp.id, date, AttendanceStatus::Present)
            .await
            .unwrap();
        let second = staff
            .mark_attendance(emp.id, date, AttendanceStatus::Absent)
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
        let on_day = staff.attendance_on(date).await.unwrap();
        assert_eq!(on_day.len(), 1);
        assert_eq!(on_day[0].status, AttendanceStatus::Absent);
    }

    #[tokio::test]
    async fn test_mark_requires_employee() {
        let store = store().await;
        let err = store
            .staff()
            .mark_attendance(9, day(2026, 3, 2), AttendanceStatus::Present)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
        assert_eq!(store.attendance().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_toggle() {
        let store = store().await;
        let staff = store.staff();
        let emp = store
            .employees()
            .add(Employee::new("Omar", Money::zero()))
            .await
            .unwrap();
        let date = day(2026, 3, 2);

        let created = staff.toggle_attendance(emp.id, date).await.unwrap();
        assert_eq!(created.status, AttendanceStatus::Present);

        let flipped = staff.toggle_attendance(emp.id, date).await.unwrap();
        assert_eq!(flipped.status, AttendanceStatus::Absent);

        let back = staff.toggle_attendance(emp.id, date).await.unwrap();
        assert_eq!(back.status, AttendanceStatus::Present);
        assert_eq!(staff.attendance_on(date).await.unwrap().len(), 1);
    }
}
