use std::io::IsTerminal;
use tracing::Level;
use tracing_subscriber::EnvFilter;

pub fn init(verbosity: u8, quiet: bool) {
    let filter = EnvFilter::from_default_env().add_directive(level_for(verbosity, quiet).into());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbosity >= 2)
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr)
        .init();
}

fn level_for(verbosity: u8, quiet: bool) -> Level {
    if quiet {
        return Level::WARN;
    }
    match verbosity {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    }
}
