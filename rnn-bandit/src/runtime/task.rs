/// A unit of blocking work the scheduler can run off the async executor.
pub trait Task: Send + 'static {
    type Output: Send + 'static;
    fn call(self) -> Self::Output;
}

/// Adapts a closure into a [`Task`].
pub struct FnTask<F>(pub F);

impl<F, T> Task for FnTask<F>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    type Output = T;

    fn call(self) -> T {
        (self.0)()
    }
}
