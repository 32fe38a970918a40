#[cfg(not(target_os = "android"))]
fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let config = login_platform::RunConfig::new("Instagram").from_env();
    login_platform::run_desktop_app(config, instagram_login::app).inspect_err(|e| {
        log::error!("{e:?}");
    })
}

// Android starts through `android_main` in the cdylib.
#[cfg(target_os = "android")]
fn main() {}
