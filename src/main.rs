use std::io;
use std::process::ExitCode;

use clap::Parser;

use cryptoshell::config::ShellConfig;
use cryptoshell::crypto::{DEFAULT_KEY_BITS, MAX_KEY_BITS, MIN_KEY_BITS};
use cryptoshell::input::{Console, LineReader};
use cryptoshell::shell::Shell;
use cryptoshell::signals;

#[derive(Parser)]
#[command(name = "cryptoshell")]
#[command(about = "Interactive shell for RSA key generation, signing and verification")]
#[command(version)]
struct Cli {
    /// Modulus size in bits for keys made by `rsagen`
    #[arg(
        long,
        default_value_t = DEFAULT_KEY_BITS as u64,
        value_parser = clap::value_parser!(u64).range(MIN_KEY_BITS as u64..=MAX_KEY_BITS as u64)
    )]
    bits: u64,

    /// Do not print the welcome banner
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    if let Err(err) = signals::ignore_interrupts() {
        log::warn!("interrupts will not be ignored: {err}");
    }

    let mut config = ShellConfig {
        key_bits: cli.bits as usize,
        ..ShellConfig::default()
    };
    if cli.quiet {
        config.intro = None;
    }

    let shell = Shell::new(config);
    let mut input = LineReader::new(io::stdin().lock());
    let mut stdout = io::stdout().lock();
    let mut console = Console::new(&mut input, &mut stdout);

    match shell.run(&mut console) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("shell stopped: {err}");
            ExitCode::FAILURE
        }
    }
}
