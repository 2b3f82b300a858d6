use clap::Parser;
use crossbeam_channel::bounded;
use eframe::egui;

mod backend_bridge;
mod config;
mod controller;
mod ui;

use backend_bridge::commands::BackendCommand;
use controller::events::UiEvent;
use ui::app::ShopApp;

#[derive(Parser, Debug)]
#[command(about = "Prototype shop desktop client")]
struct Args {
    /// Basket database location (sqlite URL or plain file path).
    #[arg(long)]
    database_url: Option<String>,
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let args = Args::parse();
    let mut settings = config::load_settings();
    if let Some(database_url) = args.database_url {
        settings.database_url = database_url;
    }

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(256);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(2048);
    backend_bridge::runtime::launch(settings, cmd_rx, ui_tx);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Prototype Shop")
            .with_inner_size([900.0, 620.0])
            .with_min_inner_size([640.0, 480.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Prototype Shop",
        options,
        Box::new(|_cc| Ok(Box::new(ShopApp::new(cmd_tx, ui_rx)))),
    )
}
