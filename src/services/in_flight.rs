//! Per-student in-flight submission lock
//!
//! One editor may only have one submission running for a question. The lock
//! lives in Redis so it also holds across tabs and server instances.

use std::time::Duration;

use redis::aio::ConnectionManager;
use uuid::Uuid;

use crate::{constants::redis_keys, error::AppResult};

/// Deletes the key only if it still holds our token
const RELEASE_SCRIPT: &str = r#"
if redis.call("GET", KEYS[1]) == ARGV[1] then
    return redis.call("DEL", KEYS[1])
else
    return 0
end
"#;

struct LockHandle {
    redis: ConnectionManager,
    key: String,
    token: String,
}

impl LockHandle {
    async fn release(mut self) {
        let result: redis::RedisResult<i32> = redis::Script::new(RELEASE_SCRIPT)
            .key(&self.key)
            .arg(&self.token)
            .invoke_async(&mut self.redis)
            .await;

        match result {
            Ok(0) => tracing::warn!(key = %self.key, "In-flight lock expired before release"),
            Ok(_) => {}
            Err(e) => tracing::warn!(key = %self.key, error = %e, "Failed to release in-flight lock"),
        }
    }
}

/// Held lock. [`InFlightLock::release`] frees it; dropping it unreleased
/// (a cancelled request future) frees it in the background.
pub struct InFlightLock {
    inner: Option<LockHandle>,
}

impl InFlightLock {
    pub fn key(student_id: &Uuid, question_id: &Uuid) -> String {
        format!("{}:{}:{}", redis_keys::IN_FLIGHT, student_id, question_id)
    }

    /// Try to take the lock; `None` if another submission holds it
    pub async fn acquire(
        mut redis: ConnectionManager,
        student_id: &Uuid,
        question_id: &Uuid,
        ttl: Duration,
    ) -> AppResult<Option<Self>> {
        let key = Self::key(student_id, question_id);
        let token = Uuid::new_v4().to_string();

        let acquired: Option<String> = redis::cmd("SET")
            .arg(&key)
            .arg(&token)
            .arg("NX")
            .arg("EX")
            .arg(ttl.as_secs().max(1))
            .query_async(&mut redis)
            .await?;

        Ok(acquired.map(|_| Self {
            inner: Some(LockHandle { redis, key, token }),
        }))
    }

    /// Release the lock; an expired or stolen lock is left alone
    pub async fn release(mut self) {
        if let Some(handle) = self.inner.take() {
            handle.release().await;
        }
    }
}

impl Drop for InFlightLock {
    fn drop(&mut self) {
        let Some(handle) = self.inner.take() else {
            return;
        };

        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                tracing::debug!(key = %handle.key, "In-flight lock dropped, releasing in background");
                runtime.spawn(handle.release());
            }
            Err(_) => {
                tracing::warn!(key = %handle.key, "In-flight lock dropped outside a runtime, left to expire");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::containers;

    #[test]
    fn test_key_format() {
        let student = Uuid::nil();
        let question = Uuid::from_u128(0xff);

        assert_eq!(
            InFlightLock::key(&student, &question),
            "in_flight:00000000-0000-0000-0000-000000000000:00000000-0000-0000-0000-0000000000ff"
        );
    }

    async fn take(redis: &ConnectionManager, student: &Uuid, question: &Uuid) -> Option<InFlightLock> {
        InFlightLock::acquire(redis.clone(), student, question, Duration::from_secs(30))
            .await
            .unwrap()
    }

    #[tokio::test]
    #[ignore = "needs Docker"]
    async fn test_second_acquire_waits_for_release() {
        let redis = containers::redis_connection().await;
        let (student, question) = (Uuid::new_v4(), Uuid::new_v4());

        let lock = take(&redis, &student, &question).await.unwrap();
        assert!(take(&redis, &student, &question).await.is_none());

        // Other questions are not affected
        assert!(take(&redis, &student, &Uuid::new_v4()).await.is_some());

        lock.release().await;
        assert!(take(&redis, &student, &question).await.is_some());
    }

    #[tokio::test]
    #[ignore = "needs Docker"]
    async fn test_dropped_lock_is_released() {
        let redis = containers::redis_connection().await;
        let (student, question) = (Uuid::new_v4(), Uuid::new_v4());

        let lock = take(&redis, &student, &question).await.unwrap();
        drop(lock);

        let mut reacquired = None;
        for _ in 0..50 {
            reacquired = take(&redis, &student, &question).await;
            if reacquired.is_some() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }

        assert!(reacquired.is_some(), "dropped lock was never released");
    }

    #[tokio::test]
    #[ignore = "needs Docker"]
    async fn test_release_leaves_a_newer_holder_alone() {
        let mut redis = containers::redis_connection().await;
        let (student, question) = (Uuid::new_v4(), Uuid::new_v4());
        let key = InFlightLock::key(&student, &question);

        let stale = take(&redis, &student, &question).await.unwrap();

        // Simulate expiry followed by another submission taking the key
        let _: () = redis::cmd("SET")
            .arg(&key)
            .arg("someone-else")
            .query_async(&mut redis)
            .await
            .unwrap();

        stale.release().await;

        let holder: Option<String> = redis::cmd("GET")
            .arg(&key)
            .query_async(&mut redis)
            .await
            .unwrap();
        assert_eq!(holder.as_deref(), Some("someone-else"));
    }
}
