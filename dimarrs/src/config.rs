//! `dimarrs` global configuration options.
//!
//! See [`Config`] for the list of options.

use std::sync::{LazyLock, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Global configuration options for the `dimarrs` crate.
///
/// Retrieve the global [`Config`] with [`global_config`] and modify it with [`global_config_mut`].
///
/// ## Track Refdims
/// > default: [`true`]
///
/// If true, axes eliminated by integer indexing are appended to the reference dimensions (refdims) of the result.
/// If false, eliminated axes are discarded.
///
/// ## Display Max Elements
/// > default: `16`
///
/// The maximum number of elements shown by the [`Display`](std::fmt::Display) implementation of [`DimArray`](crate::array::DimArray) before the remainder is elided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    track_refdims: bool,
    display_max_elements: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            track_refdims: true,
            display_max_elements: 16,
        }
    }
}

impl Config {
    /// Get the [track refdims](#track-refdims) configuration.
    #[must_use]
    pub fn track_refdims(&self) -> bool {
        self.track_refdims
    }

    /// Set the [track refdims](#track-refdims) configuration.
    pub fn set_track_refdims(&mut self, track_refdims: bool) -> &mut Self {
        self.track_refdims = track_refdims;
        self
    }

    /// Set the [track refdims](#track-refdims) configuration.
    #[must_use]
    pub fn with_track_refdims(mut self, track_refdims: bool) -> Self {
        self.track_refdims = track_refdims;
        self
    }

    /// Get the [display max elements](#display-max-elements) configuration.
    #[must_use]
    pub fn display_max_elements(&self) -> usize {
        self.display_max_elements
    }

    /// Set the [display max elements](#display-max-elements) configuration.
    pub fn set_display_max_elements(&mut self, display_max_elements: usize) -> &mut Self {
        self.display_max_elements = display_max_elements;
        self
    }

    /// Set the [display max elements](#display-max-elements) configuration.
    #[must_use]
    pub fn with_display_max_elements(mut self, display_max_elements: usize) -> Self {
        self.display_max_elements = display_max_elements;
        self
    }
}

static CONFIG: LazyLock<RwLock<Config>> = LazyLock::new(|| RwLock::new(Config::default()));

/// Returns a reference to the global `dimarrs` configuration.
///
/// # Panics
/// This function might panic if the global config is already held by the current thread.
pub fn global_config() -> RwLockReadGuard<'static, Config> {
    CONFIG.read().unwrap_or_else(PoisonError::into_inner)
}

/// Returns a mutable reference to the global `dimarrs` configuration.
///
/// # Panics
/// This function might panic if the global config is already held by the current thread.
pub fn global_config_mut() -> RwLockWriteGuard<'static, Config> {
    CONFIG.write().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_accessors() {
        let mut config = Config::default();
        assert!(config.track_refdims());
        assert_eq!(config.display_max_elements(), 16);
        config.set_track_refdims(false).set_display_max_elements(4);
        assert!(!config.track_refdims());
        assert_eq!(config.display_max_elements(), 4);
        let config = Config::default().with_display_max_elements(2);
        assert_eq!(config.display_max_elements(), 2);
    }
}
