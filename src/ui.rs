//! Terminal output — spinner and styled result lines.
//!
//! Uses `indicatif` for the spinner and `console` for color. The spinner
//! runs while the workflow is in flight; the poll loops print their own
//! progress lines above it.

use console::Style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::orchestrator::{WorkflowReport, WorkflowStatus};

pub struct WorkflowProgress {
    pb: ProgressBar,
    green: Style,
    red: Style,
    yellow: Style,
}

impl WorkflowProgress {
    /// Start the spinner with an initial phase message.
    pub fn start(message: &str) -> Self {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .expect("invalid template"),
        );
        pb.set_message(message.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));

        Self {
            pb,
            green: Style::new().green().bold(),
            red: Style::new().red().bold(),
            yellow: Style::new().yellow(),
        }
    }

    pub fn finish_success(&self, message: &str) {
        self.pb.finish_and_clear();
        println!("  {} {message}", self.green.apply_to("✓"));
    }

    pub fn finish_failure(&self, message: &str) {
        self.pb.finish_and_clear();
        println!("  {} {message}", self.red.apply_to("✗"));
    }

    /// Print the final workflow report as pretty JSON under a styled
    /// heading.
    pub fn print_report(&self, report: &WorkflowReport) {
        let status_style = match report.status {
            WorkflowStatus::Completed => &self.green,
            WorkflowStatus::Scheduled => &self.yellow,
        };
        println!();
        println!("{}", status_style.apply_to("─── Workflow Report ───"));
        println!(
            "{}",
            serde_json::to_string_pretty(report).unwrap_or_default()
        );
    }
}
