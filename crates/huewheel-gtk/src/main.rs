use clap::Parser;
use huewheel::WheelVariant;
use huewheel_gtk::config;
use huewheel_gtk::gui::app::AppModel;
use huewheel_gtk::sys::runtime;
use relm4::prelude::*;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "huewheel", version, about, long_about = None)]
struct Cli {
    /// Config file to load and watch (defaults to the user config directory)
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Wheel variant: `static` or `rotating`
    #[arg(short = 'v', long)]
    variant: Option<WheelVariant>,

    /// Initial brightness in [0, 1]
    #[arg(short = 'b', long)]
    brightness: Option<f64>,

    /// Write the default config file and exit
    #[arg(long)]
    init_config: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    if cli.init_config {
        let path = config::write_default_config()?;
        println!("{}", path.display());
        return Ok(());
    }

    let config_path = match cli.config {
        Some(path) => Some(path),
        None => config::get_config_path()
            .inspect_err(|e| log::warn!("{}", e))
            .ok(),
    };

    let mut config = config::load_or_default(config_path.as_deref());
    if let Some(variant) = cli.variant {
        config.variant = variant;
    }
    if let Some(brightness) = cli.brightness {
        config.brightness = brightness;
    }
    log::debug!("Starting with {:?}", config);

    let (tx, rx) = async_channel::bounded(32);

    if let Some(path) = &config_path {
        runtime::start_background_services(path, tx);
    }

    // clap already consumed the arguments
    let app = RelmApp::new("org.huewheel.HueWheel").with_args(Vec::new());

    app.run::<AppModel>((config, config_path, rx));
    Ok(())
}
