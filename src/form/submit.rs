use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use futures_timer::Delay;

pub type BoxedSubmitFuture = Pin<Box<dyn Future<Output = Result<(), String>> + Send + 'static>>;

pub trait Submitter<T>: Send + Sync {
    fn submit(&self, model: T) -> BoxedSubmitFuture;
}

impl<T, F, Fut> Submitter<T> for F
where
    F: Fn(T) -> Fut + Send + Sync,
    Fut: Future<Output = Result<(), String>> + Send + 'static,
{
    fn submit(&self, model: T) -> BoxedSubmitFuture {
        Box::pin((self)(model))
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SimulatedSubmitter {
    latency: Duration,
    failure: Option<String>,
}

impl SimulatedSubmitter {
    pub fn new(latency: Duration) -> Self {
        Self {
            latency,
            failure: None,
        }
    }

    pub fn failing(latency: Duration, reason: impl Into<String>) -> Self {
        Self {
            latency,
            failure: Some(reason.into()),
        }
    }

    pub fn latency(&self) -> Duration {
        self.latency
    }
}

impl<T> Submitter<T> for SimulatedSubmitter
where
    T: Send + 'static,
{
    fn submit(&self, _model: T) -> BoxedSubmitFuture {
        let latency = self.latency;
        let failure = self.failure.clone();
        Box::pin(async move {
            Delay::new(latency).await;
            match failure {
                Some(reason) => Err(reason),
                None => Ok(()),
            }
        })
    }
}
