use std::time::Instant;

use tracing::{field, info_span, warn};

use super::core::{Interceptor, Next};
use crate::action::Outcome;
use crate::dispatcher::{saturating_micros, InvocationContext};
use crate::error::Result;

/// Opens an `invocation` span around the rest of the chain and records its
/// latency and failure.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingInterceptor;

impl Interceptor for TracingInterceptor {
    fn intercept(&self, ctx: &mut InvocationContext<'_>, next: Next<'_>) -> Result<Outcome> {
        let span = info_span!(
            "invocation",
            invocation_id = %ctx.id(),
            path = %ctx.path(),
            pattern = %ctx.descriptor().path(),
            depth = ctx.depth(),
            latency_us = field::Empty,
            failed = field::Empty,
        );
        let _guard = span.enter();
        let start = Instant::now();

        let result = next.run(ctx);

        span.record("latency_us", saturating_micros(start.elapsed()));
        span.record("failed", result.is_err());
        if let Err(e) = &result {
            warn!(error = %e, "Invocation chain failed");
        }
        result
    }
}
