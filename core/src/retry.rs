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

use crate::{Error, Result};
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Default number of attempts: a single try, no retry.
pub const DEFAULT_ATTEMPTS: usize = 1;

/// Default wait before the first retry.
pub const DEFAULT_WAIT: Duration = Duration::from_millis(300);

/// RetryPolicy bounds the attempts of one logical call.
///
/// The wait doubles after every retryable failure; there is no cap other
/// than the number of attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    attempts: usize,
    wait: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: DEFAULT_ATTEMPTS,
            wait: DEFAULT_WAIT,
        }
    }
}

impl RetryPolicy {
    /// Create a policy with `attempts >= 1` and a non-zero initial `wait`.
    pub fn new(attempts: usize, wait: Duration) -> Result<Self> {
        if attempts < 1 {
            return Err(Error::config_invalid("retry: attempts must be >= 1"));
        }
        if wait.is_zero() {
            return Err(Error::config_invalid("retry: wait must be > 0"));
        }
        Ok(Self { attempts, wait })
    }

    /// Maximum number of attempts.
    pub fn attempts(&self) -> usize {
        self.attempts
    }

    /// Wait before the first retry.
    pub fn wait(&self) -> Duration {
        self.wait
    }

    /// Waits between consecutive attempts, in order.
    ///
    /// Yields `attempts - 1` values: `wait`, `2 * wait`, `4 * wait`, ...
    pub fn backoff(&self) -> Backoff {
        Backoff {
            next: self.wait,
            remaining: self.attempts.saturating_sub(1),
        }
    }
}

/// Iterator over the waits of a [`RetryPolicy`].
#[derive(Debug, Clone)]
pub struct Backoff {
    next: Duration,
    remaining: usize,
}

impl Iterator for Backoff {
    type Item = Duration;

    fn next(&mut self) -> Option<Duration> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let current = self.next;
        self.next = self.next.saturating_mul(2);
        Some(current)
    }
}

/// Per call options.
///
/// Both signals are observed before each dispatch, during the in-flight
/// send and during the backoff wait.
#[derive(Debug, Clone, Default)]
pub struct CallOptions {
    /// Abort the call once this token is cancelled.
    pub cancel: Option<CancellationToken>,
    /// Abort the call once this instant has passed.
    pub deadline: Option<Instant>,
}

impl CallOptions {
    /// Create empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the cancellation token.
    pub fn with_cancel(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Set an absolute deadline.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Set a deadline relative to now.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Fail if the call has been cancelled or its deadline has passed.
    pub fn check(&self) -> Result<()> {
        if let Some(token) = &self.cancel {
            if token.is_cancelled() {
                return Err(Error::cancelled());
            }
        }
        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                return Err(Error::deadline_exceeded());
            }
        }
        Ok(())
    }

    /// Run `fut` until it completes or the call is aborted.
    ///
    /// Cancellation wins over completion when both are ready.
    pub async fn guard<F, T>(&self, fut: F) -> Result<T>
    where
        F: std::future::Future<Output = Result<T>>,
    {
        let cancelled = async {
            match &self.cancel {
                Some(token) => token.cancelled().await,
                None => std::future::pending().await,
            }
        };
        let expired = async {
            match self.deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending().await,
            }
        };

        tokio::select! {
            biased;
            _ = cancelled => Err(Error::cancelled()),
            _ = expired => Err(Error::deadline_exceeded()),
            res = fut => res,
        }
    }

    /// Sleep for `wait` unless the call is aborted first.
    pub async fn sleep(&self, wait: Duration) -> Result<()> {
        self.guard(async {
            tokio::time::sleep(wait).await;
            Ok(())
        })
        .await
    }
}
