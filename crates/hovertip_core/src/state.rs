//! Application state management.
//!
//! Owns the runtime that hosts tooltip waiters, the shared [`TooltipSlot`]
//! and the window's [`TooltipScheduler`]. Implements `gpui::Global` when the
//! `gpui` feature is enabled.
//!
//! # Data Directory Locations
//!
//! - **macOS**: `~/Library/Application Support/dev.hovertip.Hovertip`
//! - **Windows**: `%APPDATA%\hovertip\Hovertip`
//! - **Linux**: `~/.local/share/hovertip`
//! - **Debug builds**: `./hovertip_data` in current directory

use crate::config::{TooltipConfig, SETTINGS_FILE};
use crate::error::HovertipError;
use crate::scheduler::TooltipScheduler;
use crate::sink::TooltipSlot;

use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Get the default data directory for the application.
pub fn default_data_dir() -> PathBuf {
    #[cfg(debug_assertions)]
    {
        PathBuf::from("./hovertip_data")
    }

    #[cfg(not(debug_assertions))]
    {
        dirs::data_dir()
            .map(|d| {
                #[cfg(target_os = "macos")]
                {
                    d.join("dev.hovertip.Hovertip")
                }
                #[cfg(target_os = "windows")]
                {
                    d.join("hovertip").join("Hovertip")
                }
                #[cfg(not(any(target_os = "macos", target_os = "windows")))]
                {
                    d.join("hovertip")
                }
            })
            .unwrap_or_else(|| PathBuf::from("./hovertip_data"))
    }
}

/// Ensure the data directory exists.
pub fn init_data_dir(path: &Path) -> Result<(), HovertipError> {
    if path.exists() {
        if !path.is_dir() {
            return Err(HovertipError::storage(
                format!("Data path exists but is not a directory: {}", path.display()),
                Some("Select a different location or remove the existing file"),
            ));
        }
        return Ok(());
    }

    std::fs::create_dir_all(path).map_err(|e| {
        HovertipError::storage(
            format!("Failed to create data directory '{}': {}", path.display(), e),
            Some("Check permissions or select a different location"),
        )
    })?;

    tracing::info!(path = %path.display(), "Created data directory");
    Ok(())
}

/// Central application state.
pub struct HovertipState {
    scheduler: TooltipScheduler,
    slot: Arc<TooltipSlot>,
    data_dir: PathBuf,
    /// Hosts waiter tasks; dropped last.
    tokio_runtime: tokio::runtime::Runtime,
}

impl HovertipState {
    /// Create application state from the default data directory.
    ///
    /// Reads `tooltips.json` if present and applies environment overrides.
    pub fn new() -> Result<Self, HovertipError> {
        Self::with_data_dir(default_data_dir())
    }

    /// Create application state with a custom data directory (for testing).
    pub fn with_data_dir(data_dir: PathBuf) -> Result<Self, HovertipError> {
        init_data_dir(&data_dir)?;
        let config =
            TooltipConfig::load_or_default(&data_dir.join(SETTINGS_FILE))?.with_env_overrides()?;
        Self::with_config(data_dir, config)
    }

    /// Create application state with an explicit configuration.
    pub fn with_config(data_dir: PathBuf, config: TooltipConfig) -> Result<Self, HovertipError> {
        config.validate()?;

        // One worker is plenty: at most one waiter is alive per scheduler
        let tokio_runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("hovertip-waiter")
            .enable_time()
            .build()
            .map_err(|e| HovertipError::runtime("Failed to create tokio runtime", e))?;

        let slot = Arc::new(TooltipSlot::new());
        let scheduler =
            TooltipScheduler::new(config, slot.clone(), tokio_runtime.handle().clone());

        tracing::info!(
            data_dir = %data_dir.display(),
            initial_ms = scheduler.config().initial_delay.as_millis() as u64,
            subsequent_ms = scheduler.config().subsequent_delay.as_millis() as u64,
            cooldown_ms = scheduler.config().cooldown.as_millis() as u64,
            "HovertipState initialized"
        );

        Ok(Self { scheduler, slot, data_dir, tokio_runtime })
    }

    /// The window's tooltip scheduler.
    pub fn scheduler(&self) -> &TooltipScheduler {
        &self.scheduler
    }

    /// The sink the scheduler renders into.
    pub fn slot(&self) -> &Arc<TooltipSlot> {
        &self.slot
    }

    /// Get the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Get a handle to the tokio runtime.
    pub fn runtime(&self) -> &tokio::runtime::Runtime {
        &self.tokio_runtime
    }
}

#[cfg(feature = "gpui")]
impl gpui::Global for HovertipState {}
