// SPDX-License-Identifier: GPL-3.0-only

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::builder::NonEmptyStringValueParser;
use clap::{Parser, Subcommand};
use storage_lvm::{
    Activation, ChangeArgs, CreateArgs, DryRunRunner, ListArgs, LvOperation, LvRelay, LvmConfig,
    LvmError, RemoveArgs,
};

/// Privileged helper for LVM logical volume operations
#[derive(Debug, Parser)]
#[command(name = "cosmic-ext-disks-lvm-helper")]
#[command(about = "Privileged helper for COSMIC Disks LVM operations", long_about = None)]
struct Cli {
    /// TOML config file (defaults to $LVM_HELPER_CONFIG, then /etc/cosmic-ext-disks/lvm-helper.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Target this volume group instead of the configured one
    #[arg(long, global = true)]
    volume_group: Option<String>,

    /// Print the lvm command line instead of running it
    #[arg(long, global = true)]
    dry_run: bool,

    /// Report command failures as a JSON object on stderr
    #[arg(long, global = true)]
    json_errors: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Report name, attr, tags and size (bytes) of a logical volume as JSON
    List {
        /// Name of the logical volume
        #[arg(value_parser = NonEmptyStringValueParser::new())]
        lv_name: String,
    },
    /// Create a logical volume
    Create {
        /// Size in lvcreate syntax, e.g. 10G
        #[arg(value_parser = NonEmptyStringValueParser::new())]
        size: String,
        /// Name of the logical volume
        #[arg(value_parser = NonEmptyStringValueParser::new())]
        lv_name: String,
        /// Tag to attach (repeatable)
        #[arg(long)]
        addtag: Vec<String>,
    },
    /// Force-remove a logical volume
    Remove {
        /// Name of the logical volume
        #[arg(value_parser = NonEmptyStringValueParser::new())]
        lv_name: String,
    },
    /// Change tags or activation of a logical volume
    Change {
        /// Name of the logical volume
        #[arg(value_parser = NonEmptyStringValueParser::new())]
        lv_name: String,
        /// Tag to attach (repeatable)
        #[arg(long)]
        addtag: Vec<String>,
        /// Tag to detach (repeatable)
        #[arg(long)]
        deltag: Vec<String>,
        /// Activate (y) or deactivate (n)
        #[arg(long, value_enum)]
        activate: Option<Activation>,
    },
}

impl From<Commands> for LvOperation {
    fn from(command: Commands) -> Self {
        match command {
            Commands::List { lv_name } => LvOperation::List(ListArgs { lv_name }),
            Commands::Create {
                size,
                lv_name,
                addtag,
            } => LvOperation::Create(CreateArgs {
                size,
                lv_name,
                addtag,
            }),
            Commands::Remove { lv_name } => LvOperation::Remove(RemoveArgs { lv_name }),
            Commands::Change {
                lv_name,
                addtag,
                deltag,
                activate,
            } => LvOperation::Change(ChangeArgs {
                lv_name,
                addtag,
                deltag,
                activate,
            }),
        }
    }
}

const DEFAULT_LOG_FILTER: &str = "storage_lvm=info,cosmic_ext_disks_lvm_helper=info,warn";

/// Default filter when `RUST_LOG` is unset. JSON error reports keep stderr log-free.
fn default_log_filter(json_errors: bool) -> &'static str {
    if json_errors { "off" } else { DEFAULT_LOG_FILTER }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let json_errors = cli.json_errors;

    // Logs go to stderr so stdout only carries relayed lvm output
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(std::io::IsTerminal::is_terminal(&std::io::stderr()))
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(default_log_filter(json_errors))
            }),
        )
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("{}", failure_message(&error, json_errors));
            ExitCode::from(exit_code_for(&error))
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = LvmConfig::resolve(cli.config.as_deref())?;
    if let Some(volume_group) = cli.volume_group {
        config = config.with_volume_group(volume_group)?;
    }

    let operation = LvOperation::from(cli.command);

    if cli.dry_run {
        let relay = LvRelay::new(config, DryRunRunner::new());
        relay.execute(&operation)?;
        for line in relay.into_runner().into_rendered() {
            println!("{line}");
        }
        return Ok(());
    }

    let relay = LvRelay::system(config);
    let stdout = relay.execute(&operation)?;

    let mut out = std::io::stdout().lock();
    out.write_all(&stdout)?;
    out.flush()?;
    Ok(())
}

/// Text written to stderr for a failed run.
///
/// With `json_errors`, command failures become a single JSON object; every
/// other error keeps the plain `Error:` line.
fn failure_message(error: &anyhow::Error, json_errors: bool) -> String {
    error
        .downcast_ref::<LvmError>()
        .filter(|_| json_errors)
        .and_then(LvmError::failure_report_json)
        .unwrap_or_else(|| format!("Error: {error:#}"))
}

fn exit_code_for(error: &anyhow::Error) -> u8 {
    error
        .downcast_ref::<LvmError>()
        .map_or(1, LvmError::exit_code)
}
