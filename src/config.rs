//! Capacity configuration with environment overrides.
//!
//! Settings are resolved in this order (highest priority first):
//!
//! 1. **Programmatic** — fields set on the config structs directly
//! 2. **Environment variables** — `SPLITSUM_*` overrides via `from_env`
//! 3. **Defaults** — the `Default` impls below
//!
//! # Supported Environment Variables
//!
//! | Variable | Type | Maps to |
//! |----------|------|---------|
//! | `SPLITSUM_ARENA_CAPACITY` | `usize` | [`SolverConfig::arena_capacity`] |
//! | `SPLITSUM_MAX_TASKS` | `usize` | [`ExecutorConfig::max_tasks`] |
//! | `SPLITSUM_EVENT_CAPACITY` | `usize` | [`ExecutorConfig::event_capacity`] |
//!
//! A variable that is set but unparseable is ignored in favour of the
//! default; capacities are clamped to a sane minimum so a zero override
//! cannot wedge either core.

/// Environment variable overriding the per-worker sumset arena capacity.
pub const ENV_ARENA_CAPACITY: &str = "SPLITSUM_ARENA_CAPACITY";
/// Environment variable overriding the executor's task capacity.
pub const ENV_MAX_TASKS: &str = "SPLITSUM_MAX_TASKS";
/// Environment variable overriding the reactor's event buffer capacity.
pub const ENV_EVENT_CAPACITY: &str = "SPLITSUM_EVENT_CAPACITY";

const DEFAULT_ARENA_CAPACITY: usize = 4096;
const DEFAULT_MAX_TASKS: usize = 1024;
const DEFAULT_EVENT_CAPACITY: usize = 64;

/// Tunables for the parallel search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolverConfig {
    /// Slots in each worker's sumset arena.
    pub arena_capacity: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            arena_capacity: DEFAULT_ARENA_CAPACITY,
        }
    }
}

impl SolverConfig {
    /// Returns the defaults with any `SPLITSUM_*` overrides applied.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(val) = read_usize(ENV_ARENA_CAPACITY) {
            // At least two slots per live frame plus the seeds.
            config.arena_capacity = val.max(4);
        }
        config
    }
}

/// Tunables for the cooperative executor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutorConfig {
    /// Maximum number of tasks the executor tracks at once.
    pub max_tasks: usize,
    /// Readiness events accepted per reactor poll.
    pub event_capacity: usize,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            max_tasks: DEFAULT_MAX_TASKS,
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

impl ExecutorConfig {
    /// Returns the defaults with any `SPLITSUM_*` overrides applied.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(val) = read_usize(ENV_MAX_TASKS) {
            config.max_tasks = val.max(1);
        }
        if let Some(val) = read_usize(ENV_EVENT_CAPACITY) {
            config.event_capacity = val.max(1);
        }
        config
    }
}

fn read_usize(name: &str) -> Option<usize> {
    std::env::var(name).ok()?.trim().parse().ok()
}
