//! Progress reporting from transfer strategies into History.

mod sink;
mod throttle;

pub use sink::HistoryProgressSink;
pub use throttle::ProgressThrottle;
