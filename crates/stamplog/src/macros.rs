//! Formatting macros for the global logger

/// Log at the default `log` level with `format!` arguments
#[macro_export]
macro_rules! log {
    ($($arg:tt)+) => {
        $crate::log(::std::format!($($arg)+))
    };
}

/// Log an error with `format!` arguments
#[macro_export]
macro_rules! error {
    ($($arg:tt)+) => {
        $crate::error(::std::format!($($arg)+))
    };
}

/// Log a warning with `format!` arguments
#[macro_export]
macro_rules! warn {
    ($($arg:tt)+) => {
        $crate::warn(::std::format!($($arg)+))
    };
}

/// Log an informational message with `format!` arguments
#[macro_export]
macro_rules! info {
    ($($arg:tt)+) => {
        $crate::info(::std::format!($($arg)+))
    };
}

/// Log a debug message with `format!` arguments
#[macro_export]
macro_rules! debug {
    ($($arg:tt)+) => {
        $crate::debug(::std::format!($($arg)+))
    };
}

/// Log an error and return it
#[macro_export]
macro_rules! log_error {
    ($err:expr) => {{
        let e = $err;
        $crate::error(::std::format!("{}", e));
        e
    }};
    ($err:expr, $($arg:tt)+) => {{
        let e = $err;
        $crate::error(::std::format!("{}: {}", ::std::format_args!($($arg)+), e));
        e
    }};
}
