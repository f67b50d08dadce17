//! Telemetry for agentdesk
//!
//! Log subscriber setup plus an in-process collector of query events with a
//! terminal summary.

use crate::cli::Verbosity;
use crate::errors::{AgentError, Result};
use crate::types::AgentKind;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// Install the global fmt subscriber. `RUST_LOG` takes precedence over `level`.
pub fn init_logging(level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .map_err(|e| AgentError::ConfigError(format!("invalid log level '{}': {}", level, e)))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| AgentError::Generic(format!("failed to initialize tracing subscriber: {}", e)))
}

/// Log level implied by the command-line verbosity flags
pub fn level_for(verbosity: Verbosity, configured: &str) -> String {
    match verbosity {
        Verbosity::Quiet => "error".to_string(),
        Verbosity::Normal => configured.to_string(),
        Verbosity::Verbose => "debug".to_string(),
        Verbosity::VeryVerbose => "trace".to_string(),
    }
}

/// Telemetry event types
#[derive(Debug, Clone)]
pub enum TelemetryEvent {
    CacheHit {
        confidence: f64,
        timestamp: Instant,
    },
    CacheMiss {
        timestamp: Instant,
    },
    PlanCreated {
        steps: usize,
        timestamp: Instant,
    },
    StepCompleted {
        agent: AgentKind,
        task: String,
        duration_ms: u64,
        confidence: f64,
        timestamp: Instant,
    },
    StepFailed {
        agent: AgentKind,
        task: String,
        reason: String,
        timestamp: Instant,
    },
    QueryCompleted {
        duration_ms: u64,
        timestamp: Instant,
    },
    QueryAborted {
        timestamp: Instant,
    },
}

/// Telemetry statistics
#[derive(Debug, Clone, Default)]
pub struct TelemetryStats {
    pub queries_completed: usize,
    pub queries_aborted: usize,
    pub cache_hits: usize,
    pub cache_misses: usize,
    pub plans_created: usize,
    pub steps_completed: usize,
    pub steps_failed: usize,
    /// Sum over completed queries
    pub total_query_ms: u64,
}

/// Telemetry collector, cheap to clone and shared between components
#[derive(Clone)]
pub struct TelemetryCollector {
    events: Arc<Mutex<Vec<TelemetryEvent>>>,
    stats: Arc<Mutex<TelemetryStats>>,
    start_time: Instant,
}

/// A poisoned lock only means another thread panicked mid-update of plain counters
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl TelemetryCollector {
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
            stats: Arc::new(Mutex::new(TelemetryStats::default())),
            start_time: Instant::now(),
        }
    }

    /// Record an event
    pub fn record(&self, event: TelemetryEvent) {
        {
            let mut stats = lock(&self.stats);
            match &event {
                TelemetryEvent::CacheHit { .. } => stats.cache_hits += 1,
                TelemetryEvent::CacheMiss { .. } => stats.cache_misses += 1,
                TelemetryEvent::PlanCreated { .. } => stats.plans_created += 1,
                TelemetryEvent::StepCompleted { .. } => stats.steps_completed += 1,
                TelemetryEvent::StepFailed { .. } => stats.steps_failed += 1,
                TelemetryEvent::QueryCompleted { duration_ms, .. } => {
                    stats.queries_completed += 1;
                    stats.total_query_ms += duration_ms;
                }
                TelemetryEvent::QueryAborted { .. } => stats.queries_aborted += 1,
            }
        }

        lock(&self.events).push(event);
    }

    /// Get current statistics
    pub fn get_stats(&self) -> TelemetryStats {
        lock(&self.stats).clone()
    }

    /// Time since the collector was created
    pub fn elapsed(&self) -> std::time::Duration {
        self.start_time.elapsed()
    }

    pub fn event_count(&self) -> usize {
        lock(&self.events).len()
    }

    /// Get recent events (last n)
    pub fn recent_events(&self, n: usize) -> Vec<TelemetryEvent> {
        let events = lock(&self.events);
        let start = events.len().saturating_sub(n);
        events[start..].to_vec()
    }

    /// Share of cache checks answered from memory; 0.0 before any check
    pub fn cache_hit_rate(&self) -> f64 {
        let stats = lock(&self.stats);
        let total = stats.cache_hits + stats.cache_misses;
        if total == 0 {
            0.0
        } else {
            stats.cache_hits as f64 / total as f64
        }
    }

    /// Average duration of completed queries in milliseconds
    pub fn average_query_ms(&self) -> f64 {
        let stats = lock(&self.stats);
        if stats.queries_completed == 0 {
            0.0
        } else {
            stats.total_query_ms as f64 / stats.queries_completed as f64
        }
    }
}

impl Default for TelemetryCollector {
    fn default() -> Self {
        Self::new()
    }
}

/// Simple telemetry display
pub struct TelemetryDisplay {
    collector: TelemetryCollector,
    verbosity: Verbosity,
}

impl TelemetryDisplay {
    pub fn new(collector: TelemetryCollector, verbosity: Verbosity) -> Self {
        Self { collector, verbosity }
    }

    /// Summary block as text
    pub fn summary(&self) -> String {
        let stats = self.collector.get_stats();
        let mut out = String::new();
        out.push_str("\nSession Summary\n");
        out.push_str("─────────────────────────────────────\n");
        out.push_str(&format!("Duration:          {:?}\n", self.collector.elapsed()));
        out.push_str(&format!("Queries answered:  {}\n", stats.queries_completed));
        out.push_str(&format!("Queries aborted:   {}\n", stats.queries_aborted));
        out.push_str(&format!(
            "Cache hit rate:    {:.1}%\n",
            self.collector.cache_hit_rate() * 100.0
        ));
        out.push_str(&format!("Steps run:         {}\n", stats.steps_completed));
        out.push_str(&format!("Step failures:     {}\n", stats.steps_failed));
        out.push_str(&format!("Avg query time:    {:.1}ms\n", self.collector.average_query_ms()));
        out
    }

    /// Display summary statistics
    pub fn display_summary(&self) {
        if self.verbosity == Verbosity::Quiet {
            return;
        }
        println!("{}", self.summary());
    }

    /// Whether per-step events should be echoed
    pub fn should_show_details(&self) -> bool {
        self.verbosity.show_events()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collector_creation() {
        let collector = TelemetryCollector::new();
        assert_eq!(collector.event_count(), 0);
        assert_eq!(collector.get_stats().queries_completed, 0);
    }

    #[test]
    fn test_cache_hit_rate() {
        let collector = TelemetryCollector::new();
        assert_eq!(collector.cache_hit_rate(), 0.0);

        collector.record(TelemetryEvent::CacheHit {
            confidence: 0.99,
            timestamp: Instant::now(),
        });
        collector.record(TelemetryEvent::CacheMiss { timestamp: Instant::now() });
        collector.record(TelemetryEvent::CacheMiss { timestamp: Instant::now() });
        collector.record(TelemetryEvent::CacheMiss { timestamp: Instant::now() });

        assert!((collector.cache_hit_rate() - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_step_and_query_counters() {
        let collector = TelemetryCollector::new();
        collector.record(TelemetryEvent::StepCompleted {
            agent: AgentKind::Research,
            task: "find_information".into(),
            duration_ms: 3,
            confidence: 0.9,
            timestamp: Instant::now(),
        });
        collector.record(TelemetryEvent::StepFailed {
            agent: AgentKind::Analysis,
            task: "analyze_data".into(),
            reason: "Unknown agent: analysis".into(),
            timestamp: Instant::now(),
        });
        collector.record(TelemetryEvent::QueryCompleted {
            duration_ms: 10,
            timestamp: Instant::now(),
        });
        collector.record(TelemetryEvent::QueryCompleted {
            duration_ms: 20,
            timestamp: Instant::now(),
        });
        collector.record(TelemetryEvent::QueryAborted { timestamp: Instant::now() });

        let stats = collector.get_stats();
        assert_eq!(stats.steps_completed, 1);
        assert_eq!(stats.steps_failed, 1);
        assert_eq!(stats.queries_completed, 2);
        assert_eq!(stats.queries_aborted, 1);
        assert!((collector.average_query_ms() - 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_recent_events() {
        let collector = TelemetryCollector::new();
        for steps in 0..10 {
            collector.record(TelemetryEvent::PlanCreated {
                steps,
                timestamp: Instant::now(),
            });
        }

        let recent = collector.recent_events(3);
        assert_eq!(recent.len(), 3);
        assert!(matches!(recent[2], TelemetryEvent::PlanCreated { steps: 9, .. }));
    }

    #[test]
    fn test_clones_share_state() {
        let collector = TelemetryCollector::new();
        let clone = collector.clone();
        clone.record(TelemetryEvent::CacheMiss { timestamp: Instant::now() });
        assert_eq!(collector.get_stats().cache_misses, 1);
    }

    #[test]
    fn test_summary_mentions_hit_rate() {
        let display = TelemetryDisplay::new(TelemetryCollector::new(), Verbosity::Normal);
        assert!(display.summary().contains("Cache hit rate:    0.0%"));
        assert!(!display.should_show_details());
    }

    #[test]
    fn test_level_for_verbosity() {
        assert_eq!(level_for(Verbosity::Quiet, "info"), "error");
        assert_eq!(level_for(Verbosity::Normal, "warn"), "warn");
        assert_eq!(level_for(Verbosity::VeryVerbose, "info"), "trace");
    }
}
