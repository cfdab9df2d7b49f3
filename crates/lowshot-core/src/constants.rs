//! Protocol constants shared across the workspace.

/// Crate version, stamped by cargo.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Seed label rounds at the start of each stage.
pub const SEED_ROUNDS_PER_STAGE: usize = 4;

/// Evaluation checkpoints per stage.
pub const CHECKPOINTS_PER_STAGE: usize = 4;

/// Machine translation sessions skip seed rounds and run extra
/// checkpoints instead.
pub const MT_CHECKPOINTS_PER_STAGE: usize = 8;

/// Request header carrying the team secret.
pub const HEADER_USER_SECRET: &str = "user_secret";

/// Request header carrying the session token.
pub const HEADER_SESSION_TOKEN: &str = "session_token";
