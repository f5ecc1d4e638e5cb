//! Fixed-window counters, one per (endpoint class, caller key)

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Throttled endpoint classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndpointClass {
    Login,
    Signup,
    PasswordReset,
    Verification,
}

impl EndpointClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            EndpointClass::Login => "login",
            EndpointClass::Signup => "signup",
            EndpointClass::PasswordReset => "password-reset",
            EndpointClass::Verification => "verification",
        }
    }
}

/// Per-class window configuration
#[derive(Debug, Clone, Copy)]
pub struct RateLimitConfig {
    pub max_requests: u32,
    pub window: Duration,
}

/// How long the caller must wait before the window reopens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryAfter(pub Duration);

struct Window {
    started: Instant,
    count: u32,
}

/// In-memory fixed-window limiter.
///
/// The counter map is the only mutating shared state on the request
/// path, guarded by a single mutex; every check is a short critical
/// section with no I/O.
pub struct RateLimiter {
    configs: HashMap<EndpointClass, RateLimitConfig>,
    windows: Mutex<HashMap<(EndpointClass, String), Window>>,
}

impl RateLimiter {
    /// Apply the same configuration to every endpoint class
    pub fn new(default: RateLimitConfig) -> Self {
        let configs = [
            EndpointClass::Login,
            EndpointClass::Signup,
            EndpointClass::PasswordReset,
            EndpointClass::Verification,
        ]
        .into_iter()
        .map(|class| (class, default))
        .collect();

        Self {
            configs,
            windows: Mutex::new(HashMap::new()),
        }
    }

    /// Override the configuration for one class
    pub fn with_class(mut self, class: EndpointClass, config: RateLimitConfig) -> Self {
        self.configs.insert(class, config);
        self
    }

    /// Record one request for `key` and decide whether it may proceed
    pub fn check(&self, class: EndpointClass, key: &str) -> Result<(), RetryAfter> {
        let config = self.configs[&class];
        let now = Instant::now();

        let mut windows = self.windows.lock().expect("limiter mutex poisoned");
        let window = windows
            .entry((class, key.to_string()))
            .or_insert(Window {
                started: now,
                count: 0,
            });

        let elapsed = now.duration_since(window.started);
        if elapsed >= config.window {
            window.started = now;
            window.count = 0;
        }

        window.count += 1;
        if window.count > config.max_requests {
            let remaining = config.window.saturating_sub(now.duration_since(window.started));
            tracing::warn!(
                class = class.as_str(),
                key,
                count = window.count,
                "Rate limit exceeded"
            );
            return Err(RetryAfter(remaining));
        }

        Ok(())
    }
}
