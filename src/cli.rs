//! Command-line interface, clap-based.
//!
//! Two mutually exclusive operations: `get` (read-only query of the boot
//! configuration) and `set` (stage a new order, with or without an
//! immediate reboot). Connection flags are global and override the
//! configuration file.

use clap::{Parser, Subcommand};

/// bootseq — configure a server's BIOS boot order through its management
/// controller and drive the change to completion.
#[derive(Debug, Parser)]
#[command(name = "bootseq", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Controller host name or IP address.
    #[arg(long, global = true)]
    pub host: Option<String>,

    /// Controller user name.
    #[arg(long, short = 'u', global = true)]
    pub username: Option<String>,

    /// Controller password.
    #[arg(long, short = 'p', global = true)]
    pub password: Option<String>,

    /// Session token; replaces basic auth when set.
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Skip TLS certificate verification (for controllers with self-signed
    /// certificates).
    #[arg(long, global = true, default_value_t = false)]
    pub insecure: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the current boot mode and boot order.
    Get,

    /// Stage a new boot order and schedule the configuration job.
    Set {
        /// Comma-separated boot-device identifiers, highest priority first.
        devices: String,

        /// Reboot the server now and poll the job to completion. Without
        /// this flag the job stays scheduled and executes on the next
        /// manual reboot.
        #[arg(long)]
        reboot: bool,
    },
}
