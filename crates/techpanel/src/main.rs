use std::path::PathBuf;

use anyhow::Context;
use techpanel::logging::init_file_logging;
use techpanel::{AdminClient, Drafts, HttpBackend, PanelApp, PanelConfig, PanelFlags};
use techpanel_core::ProgramOptions;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let mut config = PanelConfig::load(config_path.as_deref()).context("loading configuration")?;
    config.apply_env();

    let log_file = config.log_file();
    init_file_logging(&log_file, &config.log.filter)
        .with_context(|| format!("initializing log file {}", log_file.display()))?;

    let client = AdminClient::new(config.backend.base_url.clone(), config.request_timeout());
    let backend = HttpBackend::new(client, config.backend.init_data.clone()).shared();
    let drafts = match &config.drafts.path {
        Some(path) => Drafts::open(path),
        None => Drafts::in_memory(),
    };
    let size = crossterm::terminal::size().context("reading terminal size")?;

    let options = ProgramOptions {
        fps: config.ui.fps,
        mouse_capture: config.ui.mouse,
        ..ProgramOptions::default()
    };
    let flags = PanelFlags {
        config,
        backend,
        drafts,
        size,
    };
    techpanel_core::run_with::<PanelApp>(flags, options)
        .await
        .context("running the panel")?;
    Ok(())
}
