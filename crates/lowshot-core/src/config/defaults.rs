//! Compiled configuration defaults.

// --- Transport ---
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_INITIAL_DELAY_SECS: u64 = 3;
pub const DEFAULT_BACKOFF_MULTIPLIER: u32 = 2;
pub const DEFAULT_MAX_DELAY_SECS: u64 = 60;

// --- Run selection ---
pub const DEFAULT_DATASET_DIR: &str = "datasets";
pub const DEFAULT_SESSION_NAME_PREFIX: &str = "lowshot";
pub const DEFAULT_SESSION_NAME_POSTFIX: &str = "dev";

// --- Logging ---
pub const DEFAULT_LOG_LEVEL: &str = "info";
