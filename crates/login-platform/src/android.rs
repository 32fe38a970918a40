use login_core::{Scheduler, View};
use winit::event_loop::EventLoop;
use winit::platform::android::EventLoopBuilderExtAndroid;
use winit::platform::android::activity::AndroidApp;

use crate::config::RunConfig;
use crate::runner::Runner;

/// Runs `root` full-screen inside the native activity.
pub fn run_android_app(
    app: AndroidApp,
    root: impl FnMut(&mut Scheduler) -> View + 'static,
) -> anyhow::Result<()> {
    let event_loop = EventLoop::builder().with_android_app(app).build()?;
    let mut runner = Runner::new(Box::new(root), RunConfig::default());
    event_loop.run_app(&mut runner)?;
    Ok(())
}
