//! Reload logic for runtime filter changes

use arc_swap::ArcSwap;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, Registry};

use crate::core::{LogError, LogResult};

/// Filter layer installed at the bottom of every logger's subscriber
pub(crate) type FilterLayer = tracing_subscriber::reload::Layer<EnvFilter, Registry>;

/// Handle for runtime filter changes
#[derive(Clone)]
pub struct ReloadHandle {
    filter: tracing_subscriber::reload::Handle<EnvFilter, Registry>,
    /// Current filter string, read lock-free
    current_filter: Arc<ArcSwap<String>>,
}

impl ReloadHandle {
    /// Reload the log filter at runtime
    ///
    /// # Errors
    /// Returns error if filter parsing fails or reload fails
    pub fn reload(&self, filter: &str) -> LogResult<()> {
        self.apply(filter, parse_filter(filter)?)
    }

    /// Swap in an already parsed filter
    pub(crate) fn apply(&self, source: &str, filter: EnvFilter) -> LogResult<()> {
        self.filter
            .reload(filter)
            .map_err(|e| LogError::Config(format!("Failed to reload filter: {e}")))?;
        self.current_filter.store(Arc::new(source.to_string()));
        Ok(())
    }

    /// Get the current filter string
    pub fn current_filter(&self) -> Arc<String> {
        self.current_filter.load_full()
    }
}

impl std::fmt::Debug for ReloadHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReloadHandle")
            .field("current_filter", &self.current_filter.load())
            .finish_non_exhaustive()
    }
}

/// Parse a filter directive string such as `"info"` or `"debug,hyper=warn"`
pub(crate) fn parse_filter(filter: &str) -> LogResult<EnvFilter> {
    EnvFilter::try_new(filter).map_err(|e| LogError::Filter(format!("{filter}: {e}")))
}

/// Wrap `filter` in a reloadable layer
pub(crate) fn create_filter_layer(filter: EnvFilter, level_str: &str) -> (FilterLayer, ReloadHandle) {
    let (layer, handle) = tracing_subscriber::reload::Layer::new(filter);
    let reload_handle = ReloadHandle {
        filter: handle,
        current_filter: Arc::new(ArcSwap::from_pointee(level_str.to_string())),
    };
    (layer, reload_handle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_bad_directives() {
        let error = parse_filter("info,hyper=loud").unwrap_err();
        assert!(matches!(error, LogError::Filter(_)));
        assert!(parse_filter("debug,hyper=warn").is_ok());
    }
}
