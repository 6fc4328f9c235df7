//! Offloads synchronous filesystem calls from the async executor.

use tokio::task::JoinError;

/// Runs `f` on the blocking thread pool and maps join failures with
/// `map_err`.
pub(super) async fn run_blocking<F, T, E, M>(f: F, map_err: M) -> Result<T, E>
where
    F: FnOnce() -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
    M: FnOnce(JoinError) -> E,
{
    tokio::task::spawn_blocking(f).await.map_err(map_err)?
}
