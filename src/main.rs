use anyhow::Result;
use clap::{Parser, Subcommand};
use std::ffi::OsString;
use std::path::PathBuf;
use std::time::Duration;

use binshim::commands;
use binshim::core::target::default_install_dir;
use binshim::core::transport::TransportOptions;
use binshim::error::ShimError;

#[derive(Parser)]
#[clap(name = "binshim")]
#[clap(about = "Self-installing launcher shim for native binaries")]
#[clap(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a binary, installing it first if it is absent
    Run {
        /// File name of the binary inside the install directory
        name: String,
        /// URL of the gzip-compressed tar release archive
        url: String,
        /// Install directory (default: ~/.binshim/bin)
        #[clap(long)]
        install_dir: Option<PathBuf>,
        /// Extra request header (repeatable)
        #[clap(long = "header", value_name = "KEY:VALUE")]
        headers: Vec<String>,
        /// Request timeout in seconds
        #[clap(long)]
        timeout: Option<u64>,
        /// Arguments forwarded verbatim to the binary
        #[clap(last = true)]
        args: Vec<OsString>,
    },
    /// Download and install a binary from a release archive
    Install {
        /// File name for the installed binary
        name: String,
        /// URL of the gzip-compressed tar release archive
        url: String,
        /// Install directory (default: ~/.binshim/bin)
        #[clap(long)]
        install_dir: Option<PathBuf>,
        /// Extra request header (repeatable)
        #[clap(long = "header", value_name = "KEY:VALUE")]
        headers: Vec<String>,
        /// Request timeout in seconds
        #[clap(long)]
        timeout: Option<u64>,
        /// Suppress status output
        #[clap(long)]
        quiet: bool,
        /// Reinstall even if the binary is already present
        #[clap(long)]
        force: bool,
    },
    /// Show whether a binary is installed
    Status {
        /// File name of the binary
        name: String,
        /// Install directory (default: ~/.binshim/bin)
        #[clap(long)]
        install_dir: Option<PathBuf>,
    },
    /// Remove an installed binary
    Uninstall {
        /// File name of the binary
        name: String,
        /// Install directory (default: ~/.binshim/bin)
        #[clap(long)]
        install_dir: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    match execute(cli.command) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

fn execute(command: Commands) -> Result<i32> {
    match command {
        Commands::Run {
            name,
            url,
            install_dir,
            headers,
            timeout,
            args,
        } => {
            let options = transport_options(headers, timeout)?;
            let dir = resolve_dir(install_dir)?;
            let code = commands::run::run_binary(&name, &url, dir, &options, args)?;
            Ok(code)
        }
        Commands::Install {
            name,
            url,
            install_dir,
            headers,
            timeout,
            quiet,
            force,
        } => {
            let options = transport_options(headers, timeout)?;
            let dir = resolve_dir(install_dir)?;
            commands::install::install_binary(&name, &url, dir, &options, quiet, force)?;
            Ok(0)
        }
        Commands::Status { name, install_dir } => {
            commands::status::show_status(&name, resolve_dir(install_dir)?)?;
            Ok(0)
        }
        Commands::Uninstall { name, install_dir } => {
            commands::uninstall::uninstall_binary(&name, resolve_dir(install_dir)?)?;
            Ok(0)
        }
    }
}

fn resolve_dir(install_dir: Option<PathBuf>) -> binshim::error::Result<PathBuf> {
    match install_dir {
        Some(dir) => Ok(dir),
        None => default_install_dir(),
    }
}

fn transport_options(
    headers: Vec<String>,
    timeout: Option<u64>,
) -> binshim::error::Result<TransportOptions> {
    let mut parsed = Vec::with_capacity(headers.len());
    let mut errors = Vec::new();

    for header in &headers {
        match header.split_once(':') {
            Some((name, value)) if !name.trim().is_empty() => {
                parsed.push((name.trim().to_string(), value.trim().to_string()));
            }
            _ => errors.push(format!("header must be KEY:VALUE, got: {header}")),
        }
    }

    if !errors.is_empty() {
        return Err(ShimError::Validation { errors });
    }

    Ok(TransportOptions {
        headers: parsed,
        timeout: timeout.map(Duration::from_secs),
    })
}
