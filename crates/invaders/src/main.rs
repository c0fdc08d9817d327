use anyhow::Result;
use invaders_engine::device::GpuInit;
use invaders_engine::logging::{init_logging, LoggingConfig};
use invaders_engine::window::{Runtime, RuntimeConfig};
use invaders_game::{GameConfig, InvadersApp};
use log::info;
use winit::dpi::LogicalSize;

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let config = GameConfig::from_env();
    info!(
        "field {}x{}, ship {}, invader {}",
        config.field_width, config.field_height, config.ship_asset, config.invader_asset
    );

    let runtime = RuntimeConfig {
        title: "Invaders".to_string(),
        initial_size: LogicalSize::new(f64::from(config.field_width), f64::from(config.field_height)),
    };

    Runtime::run(runtime, GpuInit::default(), InvadersApp::new(config))
}
