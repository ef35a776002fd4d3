use moka::future::Cache;
use once_cell::sync::Lazy;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// One async mutex per employee; idle entries expire so the map stays bounded.
static CHECKIN_LOCKS: Lazy<Cache<u64, Arc<Mutex<()>>>> = Lazy::new(|| {
    Cache::builder()
        .max_capacity(50_000)
        .time_to_idle(Duration::from_secs(600))
        .build()
});

/// Serializes check-in/check-out for one employee within this process.
/// The unique `(employee_id, open_day)` key still guards other processes.
pub async fn lock_employee(employee_id: u64) -> OwnedMutexGuard<()> {
    let lock = CHECKIN_LOCKS
        .get_with(employee_id, async { Arc::new(Mutex::new(())) })
        .await;
    lock.lock_owned().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex as StdMutex;

    // Mimics check-in: look for an open record, yield, then insert.
    async fn check_in(employee_id: u64, records: Arc<StdMutex<Vec<u64>>>) -> bool {
        let _guard = lock_employee(employee_id).await;

        let already_open = records.lock().unwrap().contains(&employee_id);
        tokio::time::sleep(Duration::from_millis(20)).await;

        if already_open {
            return false;
        }
        records.lock().unwrap().push(employee_id);
        true
    }

    #[tokio::test(flavor = "current_thread")]
    async fn concurrent_check_ins_for_one_employee_insert_once() {
        let records = Arc::new(StdMutex::new(Vec::new()));

        let (a, b) = tokio::join!(
            check_in(9001, records.clone()),
            check_in(9001, records.clone())
        );

        assert!(a ^ b, "exactly one check-in succeeds");
        assert_eq!(records.lock().unwrap().len(), 1);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn different_employees_do_not_block_each_other() {
        let records = Arc::new(StdMutex::new(Vec::new()));

        let (a, b) = tokio::join!(
            check_in(9101, records.clone()),
            check_in(9102, records.clone())
        );

        assert!(a && b);
        assert_eq!(records.lock().unwrap().len(), 2);
    }
}
