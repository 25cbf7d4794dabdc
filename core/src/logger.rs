// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Pluggable logging.

use log::{Level, LevelFilter};
use std::fmt::{Arguments, Debug};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Target used for every record emitted by [`StdLogger`].
pub const LOG_TARGET: &str = "novapay";

/// Logger receives the transport's log lines.
///
/// Implement it to route logs somewhere other than the `log` facade.
pub trait Logger: Debug + Send + Sync + 'static {
    /// Whether a record at `level` would be written.
    fn enabled(&self, level: Level) -> bool;

    /// Write one formatted record.
    fn log(&self, level: Level, args: Arguments<'_>);

    /// Change the level at runtime, if supported.
    fn set_level(&self, _level: LevelFilter) {}
}

/// StdLogger forwards to the `log` crate under the `novapay` target.
///
/// It keeps its own level on top of whatever the installed `log` backend filters.
#[derive(Debug)]
pub struct StdLogger {
    level: AtomicUsize,
}

impl Default for StdLogger {
    fn default() -> Self {
        Self::new(LevelFilter::Info)
    }
}

impl StdLogger {
    /// Create a new StdLogger with the given level.
    pub fn new(level: LevelFilter) -> Self {
        Self {
            level: AtomicUsize::new(level as usize),
        }
    }

    /// Current level.
    pub fn level(&self) -> LevelFilter {
        match self.level.load(Ordering::Relaxed) {
            0 => LevelFilter::Off,
            1 => LevelFilter::Error,
            2 => LevelFilter::Warn,
            3 => LevelFilter::Info,
            4 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

impl Logger for StdLogger {
    fn enabled(&self, level: Level) -> bool {
        level <= self.level()
    }

    fn log(&self, level: Level, args: Arguments<'_>) {
        if self.enabled(level) {
            log::log!(target: LOG_TARGET, level, "{}", args);
        }
    }

    fn set_level(&self, level: LevelFilter) {
        self.level.store(level as usize, Ordering::Relaxed);
    }
}

/// NoopLogger discards all records.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLogger;

impl Logger for NoopLogger {
    fn enabled(&self, _level: Level) -> bool {
        false
    }

    fn log(&self, _level: Level, _args: Arguments<'_>) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_std_logger_level() {
        let logger = StdLogger::default();
        assert_eq!(logger.level(), LevelFilter::Info);
        assert!(logger.enabled(Level::Warn));
        assert!(!logger.enabled(Level::Debug));

        logger.set_level(LevelFilter::Debug);
        assert!(logger.enabled(Level::Debug));

        logger.set_level(LevelFilter::Off);
        assert!(!logger.enabled(Level::Error));
    }

    #[test]
    fn test_noop_logger() {
        assert!(!NoopLogger.enabled(Level::Error));
        NoopLogger.log(Level::Error, format_args!("dropped"));
    }
}
