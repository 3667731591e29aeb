use std::collections::HashMap;
use std::time::Instant;

/// Tuning for [`PerfLogger`]. Spans shorter than `threshold_ms` are measured
/// but never logged.
#[derive(Clone, Debug)]
pub struct PerfConfig {
    pub threshold_ms: f64,
    pub enabled: bool,
    pub prefix: String,
}

impl Default for PerfConfig {
    fn default() -> Self {
        Self {
            threshold_ms: 2.0,
            enabled: true,
            prefix: String::from("granule"),
        }
    }
}

/// Label-keyed stopwatch for coarse mutation timing.
///
/// Purely informational: hosts wrap mutations in `start`/`end` (or `measure`)
/// and spans at or over the threshold are logged. Nothing here feeds back
/// into the engine.
#[derive(Debug, Default)]
pub struct PerfLogger {
    config: PerfConfig,
    open: HashMap<String, Instant>,
}

impl PerfLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: PerfConfig) -> Self {
        Self {
            config,
            open: HashMap::new(),
        }
    }

    pub fn configure(&mut self, config: PerfConfig) {
        self.config = config;
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.config.enabled = enabled;
    }

    pub fn set_threshold(&mut self, threshold_ms: f64) {
        self.config.threshold_ms = threshold_ms;
    }

    /// Opens a span. Re-starting an open label restarts its clock.
    pub fn start(&mut self, label: impl Into<String>) {
        if !self.config.enabled {
            return;
        }
        self.open.insert(label.into(), Instant::now());
    }

    /// Closes a span and returns its duration in milliseconds, or `None` if
    /// the label was never started (or the logger was disabled at the time).
    pub fn end(&mut self, label: &str) -> Option<f64> {
        let started = self.open.remove(label)?;
        let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
        if self.config.enabled && elapsed_ms >= self.config.threshold_ms {
            gdebug!(
                prefix = %self.config.prefix,
                label,
                elapsed_ms,
                "span over threshold"
            );
        }
        Some(elapsed_ms)
    }

    /// Runs `f` inside a span.
    pub fn measure<T>(&mut self, label: &str, f: impl FnOnce() -> T) -> T {
        self.start(label);
        let out = f();
        self.end(label);
        out
    }

    /// Drops every open span without logging.
    pub fn clear(&mut self) {
        self.open.clear();
    }
}
