use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::level_filters::LevelFilter;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use winid::config::{load_config, Config, ConfigValidator, DEFAULT_CONFIG_FILE};
use winid::{Identity, IdentityError, PrivilegeAdjust, ProcessId};

/// Exit status for any failure reported by the identity layer
const EXIT_IDENTITY_ERROR: u8 = 6;

#[derive(Parser, Debug)]
#[command(
    name = "id",
    version,
    about = "Print the user, groups and privileges of an access token"
)]
struct Cli {
    /// Print user information
    #[arg(short = 'u', long = "user")]
    user: bool,

    /// Print group information
    #[arg(short = 'g', long = "groups")]
    groups: bool,

    /// Print privilege information
    #[arg(short = 'p', long = "privs")]
    privs: bool,

    /// Print user, group and privilege information
    #[arg(short = 'a', long = "all")]
    all: bool,

    /// Query the token of another process
    #[arg(long, value_name = "PID")]
    pid: Option<ProcessId>,

    /// Enable a privilege before printing
    #[arg(long, value_name = "NAME")]
    enable: Vec<String>,

    /// Disable a privilege before printing
    #[arg(long, value_name = "NAME")]
    disable: Vec<String>,

    /// Remove a privilege from the token before printing
    #[arg(long, value_name = "NAME")]
    remove: Vec<String>,

    /// Print the identity as JSON
    #[arg(long)]
    json: bool,

    /// Configuration file
    #[arg(short = 'c', long = "config", value_name = "PATH")]
    config: Option<PathBuf>,

    /// Debug logging and full error chains
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

impl Cli {
    fn sections(&self) -> (bool, bool, bool) {
        (
            self.user || self.all,
            self.groups || self.all,
            self.privs || self.all,
        )
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if cli.verbose {
                eprintln!("Error: {:?}", err);
            } else {
                eprintln!("Error: {:#}", err);
            }
            if err.downcast_ref::<IdentityError>().is_some() {
                ExitCode::from(EXIT_IDENTITY_ERROR)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref())
        .with_context(|| format!("loading configuration from {}", config_path(cli)))?;
    init_logging(cli, &config)?;

    info!("id v{}", env!("CARGO_PKG_VERSION"));
    debug!(?cli, "parsed arguments");

    let mut identity = load_identity(cli)?;
    if config.output.lowercase_name {
        identity.lowercase_name();
    }

    let json = cli.json || config.output.is_json();
    println!("{}", render(&identity, cli, json)?);
    Ok(())
}

fn config_path(cli: &Cli) -> String {
    cli.config
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| DEFAULT_CONFIG_FILE.to_string())
}

fn init_logging(cli: &Cli, config: &Config) -> Result<()> {
    let level = if cli.verbose {
        LevelFilter::DEBUG
    } else {
        ConfigValidator::log_filter(&config.logging)?
    };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(config.logging.ansi)
        .with_target(false)
        .init();
    Ok(())
}

#[cfg(windows)]
fn load_identity(cli: &Cli) -> Result<Identity> {
    use winid::{TokenTarget, WindowsTokenApi};

    let api = WindowsTokenApi::new();
    let target = cli.pid.map(TokenTarget::Process);
    let mut identity = Identity::query(&api, target)?;
    apply_mutations(&mut identity, &api, cli)?;
    Ok(identity)
}

#[cfg(not(windows))]
fn load_identity(_cli: &Cli) -> Result<Identity> {
    Err(IdentityError::UnsupportedPlatform(std::env::consts::OS.to_string()))
        .context("id only supports Windows")
}

/// Apply `--enable`, `--disable` and `--remove`, in that order
#[cfg_attr(not(windows), allow(dead_code))]
fn apply_mutations<A: PrivilegeAdjust>(
    identity: &mut Identity,
    api: &A,
    cli: &Cli,
) -> Result<()> {
    for name in &cli.enable {
        identity
            .enable_privilege(api, name)
            .with_context(|| format!("enabling {}", name))?;
    }
    for name in &cli.disable {
        identity
            .disable_privilege(api, name)
            .with_context(|| format!("disabling {}", name))?;
    }
    for name in &cli.remove {
        identity
            .remove_privilege(api, name)
            .with_context(|| format!("removing {}", name))?;
    }
    Ok(())
}

fn render(identity: &Identity, cli: &Cli, json: bool) -> Result<String> {
    if json {
        return Ok(serde_json::to_string_pretty(identity)?);
    }

    let (user, groups, privs) = cli.sections();
    if !(user || groups || privs) {
        return Ok(identity.whoami());
    }

    let mut out = Vec::new();
    if user {
        out.push(identity.whoami_user());
    }
    if groups {
        out.push(identity.whoami_groups());
    }
    if privs {
        out.push(identity.whoami_privileges());
    }
    Ok(out.join("\n\n") + "\n")
}
