mod system_clock;
mod tokio_sleeper;

pub use system_clock::SystemClock;
pub use tokio_sleeper::TokioSleeper;
