//! Request parameters and the cancellation signal threaded through
//! `compute`.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use geo::Point;

use crate::model::range::RangeSpec;
use crate::Error;

/// Cooperative cancellation flag with an optional deadline. Long-running
/// phases poll it and abort with [`Error::Cancelled`].
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    inner: Arc<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    cancelled: AtomicBool,
    deadline: Option<Instant>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Token that trips automatically once `timeout` has elapsed.
    pub fn with_deadline(timeout: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                cancelled: AtomicBool::new(false),
                deadline: Some(Instant::now() + timeout),
            }),
        }
    }

    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        if self.inner.cancelled.load(Ordering::Relaxed) {
            return true;
        }
        match self.inner.deadline {
            Some(deadline) => Instant::now() >= deadline,
            None => false,
        }
    }

    pub fn check(&self) -> Result<(), Error> {
        if self.is_cancelled() {
            Err(Error::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Everything a single isochrone request carries into `compute`.
#[derive(Debug, Clone)]
pub struct IsochroneSearchParameters {
    /// Requested origin, WGS84 lon/lat.
    pub origin: Point<f64>,
    /// Builder method name; empty selects the default builder.
    pub method: String,
    pub ranges: RangeSpec,
    /// Simplification tolerance in meters; `None` derives one from the
    /// range distance.
    pub smoothing_m: Option<f64>,
    /// Compute band areas in m².
    pub include_area: bool,
    /// Compute reach factors (band area over the ideal full circle).
    pub include_reach_factor: bool,
    pub cancellation: CancellationToken,
}

impl IsochroneSearchParameters {
    pub fn new(origin: Point<f64>, ranges: RangeSpec) -> Self {
        Self {
            origin,
            method: String::new(),
            ranges,
            smoothing_m: None,
            include_area: false,
            include_reach_factor: false,
            cancellation: CancellationToken::new(),
        }
    }

    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }

    pub fn with_statistics(mut self) -> Self {
        self.include_area = true;
        self.include_reach_factor = true;
        self
    }
}
