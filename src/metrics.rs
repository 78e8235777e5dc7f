//! Metrics hooks for store and service operations
//!
//! Metrics are disabled until a provider is installed with
//! [`set_metrics_provider`]. Operation latencies are captured with the
//! [`timer!`](crate::timer) macro, which records on drop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;
use std::time::{Duration, Instant};

static METRICS_ENABLED: AtomicBool = AtomicBool::new(false);

static METRICS_PROVIDER: RwLock<Option<Box<dyn MetricsProvider>>> = RwLock::new(None);

/// Sink for counters and timers
pub trait MetricsProvider: Send + Sync {
    /// Records a counter increment
    fn increment_counter(&self, name: &str, value: u64);

    /// Records a timer duration
    fn record_timer(&self, name: &str, duration: Duration);
}

/// Installs the metrics provider and enables collection
pub fn set_metrics_provider(provider: Box<dyn MetricsProvider>) {
    if let Ok(mut global_provider) = METRICS_PROVIDER.write() {
        *global_provider = Some(provider);
        METRICS_ENABLED.store(true, Ordering::SeqCst);
    }
}

/// Removes the provider and disables collection
pub fn disable_metrics() {
    if let Ok(mut global_provider) = METRICS_PROVIDER.write() {
        *global_provider = None;
    }
    METRICS_ENABLED.store(false, Ordering::SeqCst);
}

/// Returns true if a provider is installed
pub fn metrics_enabled() -> bool {
    METRICS_ENABLED.load(Ordering::SeqCst)
}

/// Increments a counter on the installed provider
pub fn increment_counter(name: &str, value: u64) {
    if !metrics_enabled() {
        return;
    }
    if let Ok(provider) = METRICS_PROVIDER.read() {
        if let Some(provider) = provider.as_ref() {
            provider.increment_counter(name, value);
        }
    }
}

/// Records a duration on the installed provider
pub fn record_timer(name: &str, duration: Duration) {
    if !metrics_enabled() {
        return;
    }
    if let Ok(provider) = METRICS_PROVIDER.read() {
        if let Some(provider) = provider.as_ref() {
            provider.record_timer(name, duration);
        }
    }
}

/// Records the time between its creation and drop
#[derive(Debug)]
pub struct Timer {
    name: &'static str,
    start: Instant,
}

impl Timer {
    /// Starts timing now
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            start: Instant::now(),
        }
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        record_timer(self.name, self.start.elapsed());
    }
}

/// Starts a [`Timer`] if metrics are enabled
#[macro_export]
macro_rules! timer {
    ($name:expr) => {{
        if $crate::metrics::metrics_enabled() {
            Some($crate::metrics::Timer::new($name))
        } else {
            None
        }
    }};
}

/// A provider that writes every metric through the `log` facade
#[derive(Debug, Default)]
pub struct LogMetricsProvider;

impl LogMetricsProvider {
    /// Creates a new provider
    pub fn new() -> Self {
        Self
    }

    /// Create a boxed instance ready for use with set_metrics_provider
    pub fn boxed() -> Box<dyn MetricsProvider> {
        Box::new(Self::new())
    }
}

impl MetricsProvider for LogMetricsProvider {
    fn increment_counter(&self, name: &str, value: u64) {
        log::debug!("METRIC counter: {} += {}", name, value);
    }

    fn record_timer(&self, name: &str, duration: Duration) {
        log::debug!("METRIC timer: {} = {:?}", name, duration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    #[derive(Default, Clone)]
    struct RecordingProvider {
        counters: Arc<Mutex<HashMap<String, u64>>>,
        timers: Arc<Mutex<Vec<String>>>,
    }

    impl MetricsProvider for RecordingProvider {
        fn increment_counter(&self, name: &str, value: u64) {
            *self
                .counters
                .lock()
                .unwrap()
                .entry(name.to_string())
                .or_default() += value;
        }

        fn record_timer(&self, name: &str, _duration: Duration) {
            self.timers.lock().unwrap().push(name.to_string());
        }
    }

    // Single test so the global provider is not shared across parallel tests.
    #[test]
    fn test_provider_lifecycle() {
        disable_metrics();
        assert!(timer!("customer.test.disabled").is_none());

        let provider = RecordingProvider::default();
        set_metrics_provider(Box::new(provider.clone()));
        assert!(metrics_enabled());

        {
            let _timer = timer!("customer.test.timer");
        }
        increment_counter("customer.test.counter", 2);
        increment_counter("customer.test.counter", 3);

        assert!(provider
            .timers
            .lock()
            .unwrap()
            .iter()
            .any(|name| name == "customer.test.timer"));
        assert_eq!(
            provider.counters.lock().unwrap().get("customer.test.counter"),
            Some(&5)
        );

        disable_metrics();
        increment_counter("customer.test.counter", 1);
        assert_eq!(
            provider.counters.lock().unwrap().get("customer.test.counter"),
            Some(&5)
        );
    }
}
