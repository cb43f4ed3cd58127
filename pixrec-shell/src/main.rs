mod app;

fn main() -> anyhow::Result<()> {
    #[cfg(not(target_arch = "wasm32"))]
    {
        // Resources resolve relative to the executable inside app bundles
        if let Some(exe_dir) = std::env::current_exe()?.parent() {
            let _ = std::env::set_current_dir(exe_dir);
        }
    }

    env_logger::init();
    log::info!("Starting PixRec Studio");

    app::app_main();
    Ok(())
}
