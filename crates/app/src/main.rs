mod config;
mod server;
mod session;
mod telemetry;

fn main() {
    if let Err(err) = run() {
        eprintln!("{err:?}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let config = config::ServerConfig::from_args(&args)?;
    telemetry::init(config.verbose);
    let _ = telemetry::init_metrics_recorder();
    server::run(config)
}
