use std::process::ExitCode;

use clap::Parser;

use bootseq::cancel::CancelToken;
use bootseq::cli::{Cli, Command};
use bootseq::config::BootseqConfig;
use bootseq::connectivity::PingMonitor;
use bootseq::error::Error;
use bootseq::inventory;
use bootseq::orchestrator::BootOrderWorkflow;
use bootseq::redfish::{BootOrder, RedfishClient};
use bootseq::ui::WorkflowProgress;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("  {} {err}", console::style("✗").red().bold());
            ExitCode::from(err.exit_code())
        }
    }
}

async fn run(cli: Cli) -> Result<(), Error> {
    let settings = BootseqConfig::load()
        .map_err(|e| Error::Config(e.to_string()))?
        .resolve(&cli)?;
    let client = RedfishClient::connect(
        &settings.host,
        settings.credentials.clone(),
        settings.insecure,
    )?;

    match cli.command {
        Command::Get => {
            let inventory = inventory::boot_inventory(&client).await?;
            println!("{}", inventory.render());
        }
        Command::Set { devices, reboot } => {
            let order = BootOrder::parse(&devices)?;
            let cancel = CancelToken::new();
            let ctrl_c = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    eprintln!("  · cancellation requested; stopping at the next poll boundary");
                    ctrl_c.cancel();
                }
            });

            let monitor = PingMonitor::new(settings.host.clone(), settings.probe_count);
            let flow = BootOrderWorkflow::new(client, monitor, cancel);
            let progress = WorkflowProgress::start(&format!(
                "applying boot order on {}",
                settings.host
            ));
            match flow.run(order, reboot).await {
                Ok(report) => {
                    progress.finish_success("boot-order workflow finished");
                    progress.print_report(&report);
                }
                Err(err) => {
                    progress.finish_failure(&err.to_string());
                    return Err(err);
                }
            }
        }
    }
    Ok(())
}
