mod app;
mod command;
mod config;
mod consts;
mod engine;
mod game;
mod logo;
mod startup;
mod util;
use crate::app::App;
use crate::config::Config;
use crate::engine::Engine;
use anyhow::Context;
use lexopt::{Arg, Parser, ValueExt};
use rand::{rngs::StdRng, SeedableRng};
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

const USAGE: &str = "\
Usage: snakeblock [<options>]

Play a game of snake with blocks & power-ups in the terminal

Options:
  --config <path>     Read configuration from the given file
  --log-file <path>   Write log messages to the given file.  The log level
                      is taken from the RUST_LOG environment variable.
  --seed <n>          Seed the random number generator with the given
                      integer
  -h, --help          Display this help message and exit
  -V, --version       Show the program version and exit
";

#[derive(Clone, Debug, Eq, PartialEq)]
enum Invocation {
    Run(Arguments),
    Help,
    Version,
}

impl Invocation {
    fn from_parser(mut parser: Parser) -> Result<Invocation, lexopt::Error> {
        let mut args = Arguments::default();
        while let Some(arg) = parser.next()? {
            match arg {
                Arg::Short('h') | Arg::Long("help") => return Ok(Invocation::Help),
                Arg::Short('V') | Arg::Long("version") => return Ok(Invocation::Version),
                Arg::Long("config") => args.config = Some(PathBuf::from(parser.value()?)),
                Arg::Long("log-file") => args.log_file = Some(PathBuf::from(parser.value()?)),
                Arg::Long("seed") => args.seed = Some(parser.value()?.parse()?),
                _ => return Err(arg.unexpected()),
            }
        }
        Ok(Invocation::Run(args))
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
struct Arguments {
    config: Option<PathBuf>,
    log_file: Option<PathBuf>,
    seed: Option<u64>,
}

impl Arguments {
    /// Set up logging & build the engine for the session
    fn prepare(&self) -> anyhow::Result<Engine> {
        if let Some(ref path) = self.log_file {
            init_logging(path)?;
        }
        let config = match self.config {
            Some(ref path) => Config::load(path, false),
            None => Config::default_path().and_then(|path| Config::load(&path, true)),
        }
        .context("failed to load configuration")?;
        let rng = match self.seed {
            Some(seed) => {
                log::info!("Seeding random number generator with {seed}");
                StdRng::seed_from_u64(seed)
            }
            None => StdRng::from_os_rng(),
        };
        let engine = Engine::new(config.game, rng).context("invalid game configuration")?;
        let bounds = engine.bounds();
        log::info!("Playfield is {}x{} cells", bounds.width, bounds.height);
        Ok(engine)
    }
}

/// Send log records to the file at `path`.  Nothing is logged without a log
/// file, as stderr belongs to the terminal interface.
fn init_logging(path: &Path) -> anyhow::Result<()> {
    let file = fs_err::File::create(path).context("failed to open log file")?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init()
        .context("failed to initialize logging")?;
    Ok(())
}

fn main() -> ExitCode {
    let args = match Invocation::from_parser(Parser::from_env()) {
        Ok(Invocation::Run(args)) => args,
        Ok(Invocation::Help) => {
            print!("{USAGE}");
            return ExitCode::SUCCESS;
        }
        Ok(Invocation::Version) => {
            println!("snakeblock {}", env!("CARGO_PKG_VERSION"));
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            eprintln!("snakeblock: {e}");
            return ExitCode::from(2);
        }
    };
    let engine = match args.prepare() {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("snakeblock: {e:?}");
            return ExitCode::from(2);
        }
    };
    let terminal = ratatui::init();
    let r = App::new(engine).run(terminal);
    ratatui::restore();
    log::info!("Exiting");
    io_exit(r)
}

fn io_exit(r: io::Result<()>) -> ExitCode {
    match r {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if e.kind() == ErrorKind::BrokenPipe => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::from(2)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn parse(args: &[&str]) -> Result<Invocation, lexopt::Error> {
        Invocation::from_parser(Parser::from_args(args.iter().copied()))
    }

    #[test]
    fn no_args() {
        assert_eq!(parse(&[]).unwrap(), Invocation::Run(Arguments::default()));
    }

    #[test]
    fn all_args() {
        let inv = parse(&[
            "--config",
            "cfg.toml",
            "--log-file=game.log",
            "--seed",
            "42",
        ])
        .unwrap();
        assert_eq!(
            inv,
            Invocation::Run(Arguments {
                config: Some(PathBuf::from("cfg.toml")),
                log_file: Some(PathBuf::from("game.log")),
                seed: Some(42),
            })
        );
    }

    #[rstest]
    #[case(&["-h"], Invocation::Help)]
    #[case(&["--help"], Invocation::Help)]
    #[case(&["--seed", "7", "-V"], Invocation::Version)]
    #[case(&["--version"], Invocation::Version)]
    fn info_flags(#[case] args: &[&str], #[case] inv: Invocation) {
        assert_eq!(parse(args).unwrap(), inv);
    }

    #[rstest]
    #[case(&["--seed", "lots"])]
    #[case(&["--seed"])]
    #[case(&["--frobnicate"])]
    #[case(&["extra"])]
    fn bad_args(#[case] args: &[&str]) {
        assert!(parse(args).is_err());
    }

    #[test]
    fn missing_explicit_config() {
        let dir = tempfile::tempdir().unwrap();
        let args = Arguments {
            config: Some(dir.path().join("config.toml")),
            ..Arguments::default()
        };
        assert!(args.prepare().is_err());
    }

    #[test]
    fn seeded_engines_agree() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs_err::write(&path, "[game]\ninitial-items = 5\ninitial-obstacles = 5\n").unwrap();
        let args = Arguments {
            config: Some(path),
            seed: Some(42),
            ..Arguments::default()
        };
        let a = args.prepare().unwrap();
        let b = args.prepare().unwrap();
        assert!(!a.items().is_empty());
        assert_eq!(a.items(), b.items());
        assert_eq!(a.obstacles(), b.obstacles());
    }
}
