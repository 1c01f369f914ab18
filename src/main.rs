use std::io;

use color_eyre::Result;

use gatewayboard::app::App;
use gatewayboard::args::Args;

fn main() -> Result<()> {
    color_eyre::install()?;

    let args: Args = argh::from_env();
    if args.version {
        println!("gatewayboard v{}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    // Logs go to stderr, keeping stdout for the report
    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .with_writer(io::stderr)
        .init();

    let app = App::new(args);
    app.run(io::stdout().lock())
}
