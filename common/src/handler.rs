//! [`Handler`] abstractions.

use std::{future::Future, sync::Arc};

/// Asynchronous handler of an `Args` operation.
///
/// Commands, queries and infrastructure adapters are all expressed as
/// [`Handler`]s, selected by the type of the operation they accept.
pub trait Handler<Args = ()> {
    /// Type of successful [`Handler`] result.
    type Ok;

    /// Type of this [`Handler`] error.
    type Err;

    /// Executes this [`Handler`] with the provided arguments.
    fn execute(
        &self,
        args: Args,
    ) -> impl Future<Output = Result<Self::Ok, Self::Err>>;
}

/// Shared [`Handler`]s execute the same way as the ones they point to.
impl<Args, H> Handler<Args> for Arc<H>
where
    H: Handler<Args> + ?Sized,
{
    type Ok = H::Ok;
    type Err = H::Err;

    fn execute(
        &self,
        args: Args,
    ) -> impl Future<Output = Result<Self::Ok, Self::Err>> {
        (**self).execute(args)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicU32, Ordering},
        Arc,
    };

    use super::Handler;

    #[derive(Debug, Default)]
    struct Counter(AtomicU32);

    impl Handler<u32> for Counter {
        type Ok = u32;
        type Err = ();

        async fn execute(&self, by: u32) -> Result<u32, ()> {
            Ok(self.0.fetch_add(by, Ordering::SeqCst) + by)
        }
    }

    #[tokio::test]
    async fn shared_handler_delegates() {
        let counter = Arc::new(Counter::default());
        let shared = Arc::clone(&counter);

        let res = shared.execute(2).await;

        assert_eq!(res, Ok(2));
        assert_eq!(counter.0.load(Ordering::SeqCst), 2);
    }
}
