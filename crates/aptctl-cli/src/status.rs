use aptctl_api::{Client, StorageUsage};

use crate::{cli::StatusCommand, error::Result};

/// Renders storage usage; the server already reports sizes in MiB.
pub fn format_storage(usage: &StorageUsage) -> String {
    format!(
        "Total: {} MiB\nFree: {} MiB\nPercent: {:.2}%",
        usage.total, usage.free, usage.percent_full
    )
}

pub fn run(client: &Client, command: StatusCommand) -> Result<()> {
    let status = client.status();

    match command {
        StatusCommand::Version => {
            println!("Aptly Server: {}", status.version()?.version);
        }
        StatusCommand::Storage => {
            println!("{}", format_storage(&status.storage_usage()?));
        }
    }

    Ok(())
}
