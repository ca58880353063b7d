//! `tillpoint-desktop`
//!
//! Host-side shell of the TillPoint point-of-sale client: configuration, the
//! local session file, toast notifications and the commands the UI invokes to
//! drive the restock dialog.
//!
//! The back-office is injected as a [`tillpoint_restock::BackOffice`]; this
//! crate never talks to storage directly.

pub mod commands;
pub mod config;
pub mod notify;
pub mod session;
pub mod state;

pub use commands::{
    RestockDialogView, close_restock, drain_toasts, edit_restock, open_restock, sign_in, sign_out,
    submit_restock,
};
pub use config::DesktopConfig;
pub use notify::{Toast, ToastKind, ToastNotifier};
pub use session::LocalSessionStore;
pub use state::{AppState, RestockCompleted};

/// Load configuration from the environment and start logging.
pub fn bootstrap() -> anyhow::Result<DesktopConfig> {
    let config = DesktopConfig::from_env()?;
    tillpoint_observability::init_with(config.log_format);
    tracing::info!(data_dir = ?config.data_dir, "tillpoint desktop starting");
    Ok(config)
}
