// Bounded async fan-out for filesystem operations

use futures::future::join_all;
use std::future::Future;
use tokio::sync::Semaphore;

/// Run `operation` over every item with at most `limit` operations in flight.
///
/// Each operation acquires a semaphore permit before it starts and releases
/// it when it finishes, so a new operation only begins once a slot frees up.
/// Results come back in input order. A `limit` of 0 is treated as 1.
pub async fn process_bounded<T, R, F, Fut>(items: Vec<T>, limit: usize, operation: F) -> Vec<R>
where
    F: Fn(T) -> Fut,
    Fut: Future<Output = R>,
{
    let semaphore = Semaphore::new(limit.max(1));
    let semaphore = &semaphore;

    let tasks = items.into_iter().map(|item| {
        let pending = operation(item);
        async move {
            // The semaphore is never closed, so acquire cannot fail
            let _permit = semaphore.acquire().await.ok();
            pending.await
        }
    });

    join_all(tasks).await
}
