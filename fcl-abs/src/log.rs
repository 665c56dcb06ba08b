/*!

Thin logging layer. The (crate) public interface consists of `set_global_logging_threshold()` /
`get_global_logging_threshold()`, the one-call setup `init_logging()`, and the macros
`critical!`, `error!`, `warning!`, `info!`, `debug!`, and `trace!`. The backing implementation
is `tracing` with a `tracing-subscriber` fmt subscriber; swapping it out would change nothing
outside this module.

*/

use std::sync::atomic::{AtomicU8, Ordering};

use tracing::level_filters::LevelFilter;

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Default)]
#[repr(u8)]
pub enum LoggingThreshold {
  Off     = 0,
  Error   = 1,
  Warning = 2,
  #[default]
  Info    = 3,
  Debug   = 4,
  Trace   = 5,
}

impl From<LoggingThreshold> for LevelFilter {
  fn from(threshold: LoggingThreshold) -> Self {
    match threshold {
      LoggingThreshold::Off     => LevelFilter::OFF,
      LoggingThreshold::Error   => LevelFilter::ERROR,
      LoggingThreshold::Warning => LevelFilter::WARN,
      LoggingThreshold::Info    => LevelFilter::INFO,
      LoggingThreshold::Debug   => LevelFilter::DEBUG,
      LoggingThreshold::Trace   => LevelFilter::TRACE,
    }
  }
}

static GLOBAL_LOGGING_THRESHOLD: AtomicU8 = AtomicU8::new(LoggingThreshold::Info as u8);

pub fn set_global_logging_threshold(threshold: LoggingThreshold) {
  GLOBAL_LOGGING_THRESHOLD.store(threshold as u8, Ordering::Relaxed);
}

pub fn get_global_logging_threshold() -> LoggingThreshold {
  match GLOBAL_LOGGING_THRESHOLD.load(Ordering::Relaxed) {
    0 => LoggingThreshold::Off,
    1 => LoggingThreshold::Error,
    2 => LoggingThreshold::Warning,
    3 => LoggingThreshold::Info,
    4 => LoggingThreshold::Debug,
    _ => LoggingThreshold::Trace,
  }
}

/// Stores the threshold and installs a global fmt subscriber honoring it. Safe to call more
/// than once; only the first installation wins.
pub fn init_logging(threshold: LoggingThreshold) {
  set_global_logging_threshold(threshold);
  let _ = tracing_subscriber::fmt()
      .with_max_level(LevelFilter::from(threshold))
      .without_time()
      .try_init();
}

// The macros delegate level filtering to the installed subscriber; the stored threshold exists
// so that a later `init_logging` or an embedding application can consult it.

#[macro_export]
macro_rules! critical {
  ($($arg:tt)*) => { $crate::tracing::error!($($arg)*) };
}

#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => { $crate::tracing::error!($($arg)*) };
}

#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => { $crate::tracing::warn!($($arg)*) };
}

#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => { $crate::tracing::info!($($arg)*) };
}

#[macro_export]
macro_rules! debug {
  ($($arg:tt)*) => { $crate::tracing::debug!($($arg)*) };
}

#[macro_export]
macro_rules! trace {
  ($($arg:tt)*) => { $crate::tracing::trace!($($arg)*) };
}
