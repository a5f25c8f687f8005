use tracing_subscriber::{EnvFilter, fmt};

/// Set up JSON logging to stdout, filtered by `RUST_LOG`. Call once at
/// startup; repeated calls are no-ops.
pub fn init_tracing() {
    let _ = fmt()
        .json()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_tracing_twice_does_not_panic() {
        init_tracing();
        init_tracing();
    }
}
