use std::path::Path;

use aptctl_api::Client;
use tracing::info;

use crate::{
    cli::FilesCommand,
    error::Result,
    upload,
    utils::print_bullets,
};

pub fn run(client: &Client, command: FilesCommand) -> Result<()> {
    let files = client.files();

    match command {
        FilesCommand::List => {
            print_bullets("List of directories:", files.list_dirs()?);
        }
        FilesCommand::Show {
            dir,
        } => {
            print_bullets(&format!("Files in '{dir}':"), files.list_files(&dir)?);
        }
        FilesCommand::Upload {
            dir,
            path,
        } => {
            let paths = upload::collect_all(Path::new(&path))?;
            let uploaded = files.upload(&dir, paths.as_slice())?;
            print_bullets("Uploaded files:", uploaded);
        }
        FilesCommand::Delete {
            dir,
            file: Some(file),
        } => {
            files.delete_file(&dir, &file)?;
            info!("Delete file '{dir}/{file}'");
        }
        FilesCommand::Delete {
            dir,
            file: None,
        } => {
            files.delete_dir(&dir)?;
            info!("Delete directory '{dir}'");
        }
    }

    Ok(())
}
