use std::path::Path;

use aptctl_api::{
    Client, ListPackagesOptions, RepoAddOptions, RepoAddResult, RepoCreateOptions,
    RepoIncludeOptions, RepoUpdateOptions,
};
use nu_ansi_term::Color::{Cyan, Green, Yellow};
use tracing::{debug, info, warn};

use crate::{
    cli::RepoCommand,
    error::{CliError, Result},
    upload::{self, UploadKind},
    utils::{print_bullets, Colored},
};

pub fn run(client: &Client, command: RepoCommand) -> Result<()> {
    let repos = client.repos();

    match command {
        RepoCommand::List => {
            let list = repos.list()?;
            print_bullets(
                "List of local repos:",
                list.iter().map(|repo| format!("[{}]", Colored(Cyan, &repo.name))),
            );
        }
        RepoCommand::Show {
            name,
            with_packages,
            newest,
        } => {
            let repo = repos.show(&name)?;
            let options = ListPackagesOptions {
                maximum_version: newest,
                ..Default::default()
            };
            let packages = repos.list_packages(&name, &options)?;

            println!("Name: {}", repo.name);
            println!("Comment: {}", repo.comment);
            println!("Default Distribution: {}", repo.default_distribution);
            println!("Default Component: {}", repo.default_component);
            println!("Number of packages: {}", packages.len());
            if with_packages || newest {
                println!("Packages:");
                for package in &packages {
                    println!("  {}", package.key);
                }
            }
        }
        RepoCommand::Create {
            name,
            comment,
            component,
            distribution,
            from_snapshot,
        } => {
            let options = RepoCreateOptions {
                comment,
                default_component: component,
                default_distribution: distribution,
                from_snapshot,
            };
            let repo = repos.create(&name, &options)?;
            info!("Repo [{}] successfully added.", Colored(Green, &repo.name));
        }
        RepoCommand::Edit {
            name,
            comment,
            component,
            distribution,
        } => {
            let options = RepoUpdateOptions {
                name: None,
                comment,
                default_component: component,
                default_distribution: distribution,
            };
            let repo = repos.edit(&name, &options)?;
            info!("Repo [{}] successfully updated.", Colored(Green, &repo.name));
        }
        RepoCommand::Rename {
            name,
            new_name,
        } => {
            let options = RepoUpdateOptions {
                name: Some(new_name.clone()),
                ..Default::default()
            };
            repos.edit(&name, &options)?;
            info!("Local repository [{name}] -> [{new_name}] has been successfully renamed.");
        }
        RepoCommand::Drop {
            name,
            force,
        } => {
            repos.drop(&name, force)?;
            info!("Local repo [{name}] has been removed.");
        }
        RepoCommand::Add {
            name,
            path,
            force_replace,
            no_remove,
        } => {
            let dir = upload_files(client, Path::new(&path), UploadKind::Packages)?;
            let options = RepoAddOptions {
                force_replace,
                no_remove,
            };
            let result = repos.add_directory(&name, &dir, options)?;
            report(result)?;
        }
        RepoCommand::Include {
            name,
            path,
            force_replace,
            accept_unsigned,
            ignore_signatures,
        } => {
            let dir = upload_files(client, Path::new(&path), UploadKind::Changes)?;
            let options = RepoIncludeOptions {
                force_replace,
                no_remove_files: false,
                accept_unsigned,
                ignore_signature: ignore_signatures,
            };
            let result = repos.include_directory(&name, &dir, options)?;
            report(result)?;
        }
    }

    Ok(())
}

/// Uploads the files found under `path` to a fresh upload directory and
/// returns its name.
fn upload_files(client: &Client, path: &Path, kind: UploadKind) -> Result<String> {
    let files = upload::collect(path, kind)?;
    let dir = upload::upload_dir_name();
    debug!("uploading {} files to {}", files.len(), dir);

    client.files().upload(&dir, files.as_slice())?;
    Ok(dir)
}

fn report(result: RepoAddResult) -> Result<()> {
    for warning in &result.report.warnings {
        warn!("{warning}");
    }
    for removed in &result.report.removed {
        info!("Removed {}", Colored(Yellow, removed));
    }
    for added in &result.report.added {
        info!("Added {}", Colored(Green, added));
    }

    if result.failed_files.is_empty() {
        Ok(())
    } else {
        Err(CliError::FailedFiles(result.failed_files))
    }
}
