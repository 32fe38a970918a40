//! Instagram-style login screen.
//!
//! The only logic is [`validation::login_enabled`]; everything else is
//! composition. [`app`] is the root handed to the platform runner.

pub mod screen;
pub mod state;
pub mod theme;
pub mod validation;

use login_core::{Scheduler, View, remember, with_theme};

pub use state::{LoginSnapshot, LoginState};

pub fn app(_s: &mut Scheduler) -> View {
    with_theme(theme::login_theme(), || {
        let state = remember(LoginState::new);
        screen::login_screen(&state)
    })
}

#[cfg(target_os = "android")]
#[unsafe(no_mangle)]
pub extern "C" fn android_main(android_app: winit::platform::android::activity::AndroidApp) {
    android_logger::init_once(
        android_logger::Config::default()
            .with_max_level(log::LevelFilter::Debug)
            .with_tag("instagram-login"),
    );
    if let Err(e) = login_platform::android::run_android_app(android_app, app) {
        log::error!("event loop exited: {e:?}");
    }
}
