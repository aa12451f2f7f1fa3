use log::error;
use simplelog::{LevelFilter, TermLogger, TerminalMode};
use structopt::StructOpt;
use trails_map::cli::Cli;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let opt = Cli::from_args();
    let level_filter = opt.verbosity(LevelFilter::Info);
    TermLogger::init(level_filter, simplelog::Config::default(), TerminalMode::Mixed)?;

    // nothing is written unless every stage succeeds
    if let Err(e) = opt.execute() {
        error!("{}", e);
        return Err(e);
    }

    Ok(())
}
