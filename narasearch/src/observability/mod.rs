//! Observability utilities.

mod logging;
mod observer;

pub use logging::{init_tracing, LogFormat, RunTimer};
pub use observer::{LoggingSearchObserver, NoOpSearchObserver, SearchObserver};
