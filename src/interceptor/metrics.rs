use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::core::{Interceptor, Next};
use crate::action::Outcome;
use crate::dispatcher::{saturating_nanos, InvocationContext};
use crate::error::Result;

/// Per-pattern counters.
#[derive(Debug, Default)]
pub struct PatternStats {
    pub invocations: AtomicUsize,
    pub failures: AtomicUsize,
    pub total_latency_ns: AtomicU64,
}

impl PatternStats {
    #[must_use]
    pub fn average_latency(&self) -> Duration {
        let count = self.invocations.load(Ordering::Relaxed) as u64;
        if count == 0 {
            Duration::from_nanos(0)
        } else {
            Duration::from_nanos(self.total_latency_ns.load(Ordering::Relaxed) / count)
        }
    }
}

/// Interceptor collecting invocation counts and latency.
///
/// All counters are atomics and per-pattern entries live in a `DashMap`, so
/// one instance can sit in every chain of a shared router without locking.
#[derive(Debug, Default)]
pub struct MetricsInterceptor {
    invocation_count: AtomicUsize,
    failure_count: AtomicUsize,
    total_latency_ns: AtomicU64,
    per_pattern: DashMap<String, Arc<PatternStats>>,
}

impl MetricsInterceptor {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of invocations that passed through this interceptor
    #[must_use]
    pub fn invocation_count(&self) -> usize {
        self.invocation_count.load(Ordering::Relaxed)
    }

    /// Invocations whose inner chain returned an error
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.failure_count.load(Ordering::Relaxed)
    }

    /// Mean latency of the wrapped chain; zero before the first invocation.
    #[must_use]
    pub fn average_latency(&self) -> Duration {
        let count = self.invocation_count.load(Ordering::Relaxed) as u64;
        if count == 0 {
            Duration::from_nanos(0)
        } else {
            Duration::from_nanos(self.total_latency_ns.load(Ordering::Relaxed) / count)
        }
    }

    /// Counters for one handler pattern.
    #[must_use]
    pub fn pattern_stats(&self, pattern: &str) -> Option<Arc<PatternStats>> {
        self.per_pattern.get(pattern).map(|s| Arc::clone(s.value()))
    }

    fn stats_for(&self, pattern: &str) -> Arc<PatternStats> {
        if let Some(stats) = self.per_pattern.get(pattern) {
            return Arc::clone(stats.value());
        }
        Arc::clone(
            self.per_pattern
                .entry(pattern.to_string())
                .or_default()
                .value(),
        )
    }
}

impl Interceptor for MetricsInterceptor {
    fn intercept(&self, ctx: &mut InvocationContext<'_>, next: Next<'_>) -> Result<Outcome> {
        let stats = self.stats_for(ctx.descriptor().path());
        let start = Instant::now();

        let result = next.run(ctx);

        let elapsed = saturating_nanos(start.elapsed());
        self.invocation_count.fetch_add(1, Ordering::Relaxed);
        self.total_latency_ns.fetch_add(elapsed, Ordering::Relaxed);
        stats.invocations.fetch_add(1, Ordering::Relaxed);
        stats.total_latency_ns.fetch_add(elapsed, Ordering::Relaxed);
        if result.is_err() {
            self.failure_count.fetch_add(1, Ordering::Relaxed);
            stats.failures.fetch_add(1, Ordering::Relaxed);
        }
        result
    }
}
