use anyhow::{Result, anyhow};
use autoscale_cuckoo_filter::CuckooFilter;
use futures::StreamExt;
use once_cell::sync::Lazy;
use sqlx::MySqlPool;
use std::sync::{PoisonError, RwLock};
use tracing::info;

/// Expected capacity and false-positive rate.
const FILTER_CAPACITY: usize = 100_000;
const FALSE_POSITIVE_RATE: f64 = 0.001;

static EMAIL_FILTER: Lazy<RwLock<CuckooFilter<String>>> =
    Lazy::new(|| RwLock::new(CuckooFilter::new(FILTER_CAPACITY, FALSE_POSITIVE_RATE)));

#[inline]
fn normalize(email: &str) -> String {
    email.trim().to_lowercase()
}

/// False means the email is certainly unregistered; true may be a false positive.
pub fn might_exist(email: &str) -> bool {
    EMAIL_FILTER
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .contains(&normalize(email))
}

pub fn insert(email: &str) {
    EMAIL_FILTER
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .add(&normalize(email));
}

pub fn remove(email: &str) {
    EMAIL_FILTER
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .remove(&normalize(email));
}

/// true  => email AVAILABLE
/// false => email TAKEN
pub async fn is_email_available(pool: &MySqlPool, email: &str) -> Result<bool, sqlx::Error> {
    if !might_exist(email) {
        return Ok(true);
    }

    let exists: i64 = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = ? LIMIT 1)")
        .bind(normalize(email))
        .fetch_one(pool)
        .await?;

    Ok(exists == 0)
}

/// Streams every registered email into the filter in batches.
pub async fn warmup_email_filter(pool: &MySqlPool, batch_size: usize) -> Result<()> {
    let mut stream = sqlx::query_as::<_, (String,)>("SELECT email FROM users").fetch(pool);

    let mut batch = Vec::with_capacity(batch_size);
    let mut total = 0usize;

    while let Some(row) = stream.next().await {
        let (email,) = row.map_err(|e| anyhow!("DB row fetch failed: {}", e))?;

        batch.push(normalize(&email));
        total += 1;

        if batch.len() == batch_size {
            insert_batch(&batch);
            batch.clear();
        }
    }

    if !batch.is_empty() {
        insert_batch(&batch);
    }

    info!(total, "Email filter warmup complete");
    Ok(())
}

fn insert_batch(emails: &[String]) {
    let mut filter = EMAIL_FILTER.write().unwrap_or_else(PoisonError::into_inner);
    for email in emails {
        filter.add(email);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookups_ignore_case_and_whitespace() {
        insert("Filter.Case@Example.com");
        assert!(might_exist(" filter.case@example.com "));
    }

    #[test]
    fn unknown_email_is_a_definite_miss() {
        assert!(!might_exist("never-registered-4711@example.com"));
    }

    #[test]
    fn removed_email_is_forgotten() {
        insert("leaver@example.com");
        remove("leaver@example.com");
        assert!(!might_exist("leaver@example.com"));
    }
}
