//! # Runtime Configuration
//!
//! Process settings read from the environment at startup.
//!
//! ### `SWITCHYARD_STACK_SIZE`
//!
//! Coroutine stack size in bytes, decimal (`32768`) or hex (`0x8000`).
//! Default: `0x8000` (32 KB). Handlers run on the request coroutine, so deep call
//! chains need a larger stack; each concurrent request costs one stack.
//!
//! ### `SWITCHYARD_ADDR`
//!
//! Listen address for `switchyard serve`. Default: `127.0.0.1:8080`.
//!
//! ```rust
//! use switchyard::runtime_config::RuntimeConfig;
//!
//! let config = RuntimeConfig::from_env();
//! println!("Stack size: {} bytes", config.stack_size);
//! ```

use std::env;

/// Default coroutine stack size (32 KB)
pub const DEFAULT_STACK_SIZE: usize = 0x8000;

/// Default listen address
pub const DEFAULT_ADDR: &str = "127.0.0.1:8080";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Stack size for coroutines in bytes
    pub stack_size: usize,
    /// Address the server binds to
    pub addr: String,
}

impl RuntimeConfig {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let stack_size = lookup("SWITCHYARD_STACK_SIZE")
            .and_then(|val| parse_size(&val))
            .unwrap_or(DEFAULT_STACK_SIZE);
        let addr = lookup("SWITCHYARD_ADDR")
            .filter(|a| !a.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ADDR.to_string());
        RuntimeConfig { stack_size, addr }
    }

    /// Apply the stack size to the `may` coroutine runtime.
    pub fn apply(&self) {
        may::config().set_stack_size(self.stack_size);
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            stack_size: DEFAULT_STACK_SIZE,
            addr: DEFAULT_ADDR.to_string(),
        }
    }
}

fn parse_size(val: &str) -> Option<usize> {
    let val = val.trim();
    match val.strip_prefix("0x").or_else(|| val.strip_prefix("0X")) {
        Some(hex) => usize::from_str_radix(hex, 16).ok(),
        None => val.parse().ok(),
    }
}
