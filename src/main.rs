//! portopts - report aggregated build option settings across installed
//! FreeBSD packages, or generate make.conf overrides from them.

use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use portopts::{aggregate_options, installed_packages, write_make_conf, write_report, Pkg, Ports};

#[derive(Parser, Debug)]
#[command(
    name = "portopts",
    about = "Aggregate build option settings across installed FreeBSD packages",
    version,
    author
)]
struct Args {
    /// Path to the ports tree
    #[arg(short = 'p', long, env = "PORTSDIR", default_value = "/usr/ports")]
    ports_path: PathBuf,

    /// pkg(8) binary used to query the package database
    #[arg(long, default_value = "/usr/sbin/pkg")]
    pkg_binary: PathBuf,

    /// make(1) binary used to query the ports tree
    #[arg(long, default_value = "/usr/bin/make")]
    make_binary: PathBuf,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Enable verbose report output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Generate make.conf overrides instead of a report
    #[arg(short, long)]
    make_conf: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = if args.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let pkg = Pkg::new(&args.pkg_binary);
    let ports = Ports::new(&args.make_binary, &args.ports_path);

    let packages = installed_packages(&pkg, &ports)?.collect::<portopts::Result<Vec<_>>>()?;
    let options = aggregate_options(&packages);

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if args.make_conf {
        let origins: BTreeMap<String, String> = packages
            .iter()
            .map(|package| (package.name.clone(), package.origin.clone()))
            .collect();
        write_make_conf(&mut out, &options, &origins)?;
    } else {
        write_report(&mut out, &options, args.verbose)?;
    }

    out.flush()?;
    Ok(())
}
