//! winit runners for login screens.
//!
//! Both entry points drive the same event routing: focus on press, click on
//! release over the pressed region, Tab traversal, Enter/Space activation,
//! text editing with clipboard and IME, and caret blink redraws.
//!
//! ```no_run
//! # #[cfg(feature = "desktop")]
//! # fn main() -> anyhow::Result<()> {
//! use login_core::*;
//! use login_platform::{RunConfig, run_desktop_app};
//! use login_ui::*;
//!
//! run_desktop_app(RunConfig::new("Hello").from_env(), |_s| {
//!     Surface(Modifier::new().fill_max_size(), Text("hello"))
//! })
//! # }
//! # #[cfg(not(feature = "desktop"))]
//! # fn main() {}
//! ```

#[cfg_attr(not(any(feature = "desktop", feature = "android")), allow(dead_code))]
mod common;
pub mod config;
#[cfg(any(feature = "desktop", feature = "android"))]
mod runner;

#[cfg(feature = "android")]
pub mod android;

pub use config::RunConfig;

#[cfg(feature = "desktop")]
pub fn run_desktop_app(
    config: RunConfig,
    root: impl FnMut(&mut login_core::Scheduler) -> login_core::View + 'static,
) -> anyhow::Result<()> {
    let event_loop = winit::event_loop::EventLoop::new()?;
    log::info!("starting '{}' at {:?}", config.title, config.logical_size);
    let mut runner = runner::Runner::new(Box::new(root), config);
    event_loop.run_app(&mut runner)?;
    Ok(())
}
