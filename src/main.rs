use stockscope::application::session::Session;
use stockscope::config::Config;
use stockscope::domain::ports::ChartRenderer;
use stockscope::infrastructure::ServiceFactory;

use tracing::{Level, info};
use tracing_subscriber::prelude::*;

#[cfg(feature = "ui")]
fn create_renderer(config: &Config) -> Box<dyn ChartRenderer> {
    Box::new(stockscope::interfaces::ChartWindowRenderer::new(
        config.moving_average_window,
    ))
}

#[cfg(not(feature = "ui"))]
fn create_renderer(_config: &Config) -> Box<dyn ChartRenderer> {
    Box::new(stockscope::interfaces::HeadlessRenderer)
}

fn main() -> anyhow::Result<()> {
    // 0. Load Env (before starting anything)
    dotenvy::dotenv().ok();

    // 1. Setup Logging (stderr, so prompts on stdout stay readable)
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::WARN.into()))
        .with(stderr_layer)
        .init();

    // 2. Load Config
    let config = Config::from_env()?;
    info!(
        "Stockscope {} starting: provider={:?}, window={}",
        env!("CARGO_PKG_VERSION"),
        config.provider,
        config.moving_average_window
    );

    // 3. Wire collaborators and run the prompt loop (blocks main thread)
    let provider = ServiceFactory::create_market_data_provider(&config)?;
    let renderer = create_renderer(&config);

    let stdin = std::io::stdin();
    let mut session = Session::new(
        stdin.lock(),
        std::io::stdout(),
        provider,
        renderer,
        config.moving_average_window,
    )?;
    session.run()
}
