//! Result extension traits for filesystem operations

use std::io;

use crate::core::error::{LogError, LogResult};

/// Extension trait for IO Result types
pub trait LogIoResultExt<T> {
    /// Convert IO error to [`LogError::Io`], building the context lazily
    fn with_log_context<S: Into<String>, F>(self, f: F) -> LogResult<T>
    where
        F: FnOnce() -> S;
}

impl<T> LogIoResultExt<T> for Result<T, io::Error> {
    fn with_log_context<S: Into<String>, F>(self, f: F) -> LogResult<T>
    where
        F: FnOnce() -> S,
    {
        self.map_err(|source| LogError::Io {
            context: f().into(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_log_context_is_lazy() {
        let ok: Result<u8, io::Error> = Ok(7);
        let value = ok
            .with_log_context(|| -> String { unreachable!("context built on success") })
            .unwrap();
        assert_eq!(value, 7);

        let result: Result<u8, io::Error> = Err(io::Error::other("disk full"));
        let error = result
            .with_log_context(|| format!("Failed to create '{}'", "logs"))
            .unwrap_err();
        assert_eq!(error.to_string(), "Failed to create 'logs': disk full");
    }
}
