use std::{ffi::OsString, io::Write, path::PathBuf, process::Command};

#[cfg(target_family = "unix")]
use std::os::unix::process::CommandExt;

use anyhow::Context;
use clap::{ArgAction, Parser};
use envfile::{env::SYSTEM_ENV, GetEnv};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Load NAME=value pairs from a file and run a command with them in its
/// environment. Without a command the resulting assignments are printed.
#[derive(Debug, Parser)]
#[command(name = "envfile", version)]
struct Cli {
    /// File to load [default: $DOTENV_CONFIG_PATH or .env]
    #[arg(short, long, value_name = "FILE")]
    file: Option<PathBuf>,

    /// Don't overwrite variables that are already set
    #[arg(short, long)]
    preserve: bool,

    /// Fail on the first ill-formed line or undefined variable
    #[arg(long)]
    strict: bool,

    /// More diagnostics (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Only report errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Command to run and its arguments
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "COMMAND")]
    command: Vec<OsString>,
}

fn init_logging(cli: &Cli) {
    let default_filter = if cli.quiet {
        "envfile=error"
    } else {
        match cli.verbose {
            0 => "envfile=warn",
            1 => "envfile=debug",
            _ => "envfile=trace",
        }
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Explicit flags win; `DOTENV_CONFIG_*` variables are only read for the
/// settings they don't cover.
fn options(cli: &Cli, config: &impl GetEnv) -> anyhow::Result<envfile::Options<PathBuf>> {
    let path = match &cli.file {
        Some(file) => file.clone(),
        None => PathBuf::from(config.get_config_path().into_owned()),
    };

    let preserve = cli.preserve || config.get_preserve()
        .context("invalid DOTENV_CONFIG_PRESERVE")?;

    let strict = cli.strict || config.get_strict()
        .context("invalid DOTENV_CONFIG_STRICT")?;

    Ok(envfile::build()
        .preserve(preserve)
        .strict(strict)
        .path(path)
        .into_options())
}

fn show(options: &envfile::Options<PathBuf>) -> anyhow::Result<()> {
    let env = options.load_new()
        .with_context(|| format!("failed to load {}", options.path.display()))?;

    let mut env = env.iter().collect::<Vec<_>>();
    env.sort();

    let mut stdout = std::io::stdout().lock();
    for (key, value) in env {
        writeln!(stdout, "{}={}", key.to_string_lossy(), value.to_string_lossy())?;
    }

    Ok(())
}

fn exec(options: &envfile::Options<PathBuf>, command: &[OsString]) -> anyhow::Result<()> {
    options.load()
        .with_context(|| format!("failed to load {}", options.path.display()))?;

    let Some((program, args)) = command.split_first() else {
        return Ok(());
    };

    #[cfg(target_family = "unix")]
    let err = Command::new(program).args(args).exec();

    #[cfg(not(target_family = "unix"))]
    let err = match Command::new(program).args(args).status() {
        Ok(status) => std::process::exit(status.code().unwrap_or(1)),
        Err(err) => err,
    };

    Err(err).with_context(|| format!("failed to execute {}", program.to_string_lossy()))
}

fn main() {
    let cli = Cli::parse();
    init_logging(&cli);

    let result = options(&cli, &SYSTEM_ENV).and_then(|options| {
        if cli.command.is_empty() {
            show(&options)
        } else {
            exec(&options, &cli.command)
        }
    });

    if let Err(error) = result {
        eprintln!("envfile: {error:#}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn illegal_config() -> HashMap<String, String> {
        let mut config = HashMap::new();
        config.insert("DOTENV_CONFIG_PATH".to_owned(), "from-config.env".to_owned());
        config.insert("DOTENV_CONFIG_PRESERVE".to_owned(), "maybe".to_owned());
        config.insert("DOTENV_CONFIG_STRICT".to_owned(), "maybe".to_owned());
        config
    }

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::parse_from(["envfile", "-f", "app.env", "-p", "--strict"]);
        let options = options(&cli, &illegal_config()).unwrap();

        assert_eq!(options.path, PathBuf::from("app.env"));
        assert!(options.preserve);
        assert!(options.strict);
    }

    #[test]
    fn test_config_fills_missing_flags() {
        let mut config = illegal_config();
        config.insert("DOTENV_CONFIG_PRESERVE".to_owned(), "1".to_owned());

        let cli = Cli::parse_from(["envfile", "--strict"]);
        let options = options(&cli, &config).unwrap();

        assert_eq!(options.path, PathBuf::from("from-config.env"));
        assert!(options.preserve);
        assert!(options.strict);
    }

    #[test]
    fn test_illegal_config_without_flag() {
        let cli = Cli::parse_from(["envfile", "-p"]);
        let err = options(&cli, &illegal_config()).unwrap_err();

        assert!(format!("{err:#}").contains("DOTENV_CONFIG_STRICT"), "{err:#}");
    }
}
