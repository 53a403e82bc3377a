//! Logging macros that call the tracing crate underneath, each gated on
//! its `log_*` feature so disabled levels compile to nothing.

#[macro_export]
macro_rules! info {
    ($($t:tt)*) => {
        if cfg!(feature = "log_info") {
            tracing::info!($($t)*);
        }
    };
}

#[macro_export]
macro_rules! warn {
    ($($t:tt)*) => {
        if cfg!(feature = "log_warnings") {
            tracing::warn!($($t)*);
        }
    };
}

#[macro_export]
macro_rules! debug {
    ($($t:tt)*) => {
        if cfg!(feature = "log_debug") {
            tracing::debug!($($t)*);
        }
    };
}

#[macro_export]
macro_rules! error {
    ($($t:tt)*) => {
        if cfg!(feature = "log_errors") {
            tracing::error!($($t)*);
        }
    };
}

#[cfg(test)]
mod tests {
    use tracing_test::traced_test;

    #[test]
    #[traced_test]
    fn test_logs_with_arg() {
        info!("environment key: {}", "HTTP_HOST");
        debug!("environment key: {}", "HTTP_HOST");
        warn!("environment key: {}", "HTTP_HOST");
        error!("environment key: {}", "HTTP_HOST");
        assert!(logs_contain("environment key: HTTP_HOST"));
    }
}
