use aptctl_api::{
    Client, ListPackagesOptions, PackageDiff, PackageKey, SnapshotMergeOptions,
    SnapshotUpdateOptions,
};
use nu_ansi_term::Color::{Cyan, Green, Red, Yellow};
use tabled::{builder::Builder, settings::Style};
use tracing::info;

use crate::{
    cli::{SnapshotCommand, SnapshotFrom, SnapshotSource},
    error::Result,
    utils::{print_bullets, Colored},
};

pub fn run(client: &Client, command: SnapshotCommand) -> Result<()> {
    let snapshots = client.snapshots();

    match command {
        SnapshotCommand::List => {
            let list = snapshots.list()?;
            print_bullets(
                "List of snapshots:",
                list.iter().map(|snapshot| {
                    format!("[{}] {}", Colored(Cyan, &snapshot.name), snapshot.description)
                }),
            );
        }
        SnapshotCommand::Show {
            name,
            with_packages,
        } => {
            let snapshot = snapshots.show(&name)?;
            let packages = snapshots.packages(&name, &ListPackagesOptions::default())?;

            println!("Name: {}", snapshot.name);
            println!("CreatedAt: {}", snapshot.created_at);
            println!("Description: {}", snapshot.description);
            println!("Number of packages: {}", packages.len());

            let sources = snapshot
                .snapshots
                .iter()
                .map(|source| (source.name.as_str(), "snapshot"))
                .chain(snapshot.local_repos.iter().map(|repo| (repo.name.as_str(), "local")));
            println!("Sources:");
            for (source, kind) in sources {
                println!("  {source} [{kind}]");
            }

            if with_packages {
                println!("Packages:");
                for package in &packages {
                    println!("  {}", package.key);
                }
            }
        }
        SnapshotCommand::Create {
            name,
            description,
            source: SnapshotSource::From {
                kind,
            },
        } => {
            let snapshot = match kind {
                SnapshotFrom::Repo {
                    repo,
                } => snapshots.from_repo(&name, &repo, description.as_deref())?,
                SnapshotFrom::Mirror {
                    mirror,
                } => snapshots.from_mirror(&name, &mirror, description.as_deref())?,
            };
            info!(
                "Snapshot '{}' successfully created.",
                Colored(Green, &snapshot.name)
            );
        }
        SnapshotCommand::Rename {
            old_name,
            new_name,
        } => {
            let options = SnapshotUpdateOptions {
                name: Some(new_name.clone()),
                ..Default::default()
            };
            snapshots.update(&old_name, &options)?;
            info!("Snapshot {old_name} -> {new_name} has been successfully renamed.");
        }
        SnapshotCommand::Drop {
            name,
            force,
        } => {
            snapshots.drop(&name, force)?;
            info!("Snapshot `{name}` has been dropped.");
        }
        SnapshotCommand::Diff {
            left,
            right,
            only_matching,
        } => {
            let diff = snapshots.diff(&left, &right, only_matching)?;
            if diff.is_empty() {
                info!("Snapshots are identical.");
            } else {
                print!("{}", format_diff(&left, &right, &diff));
            }
        }
        SnapshotCommand::Merge {
            destination,
            sources,
            latest,
            no_remove,
        } => {
            let options = SnapshotMergeOptions {
                latest,
                no_remove,
            };
            let snapshot = snapshots.merge(&destination, &sources, options)?;
            info!(
                "Snapshot {} successfully created.",
                Colored(Green, &snapshot.name)
            );
        }
    }

    Ok(())
}

/// Splits a diff side into its fields. Keys that do not parse are shown
/// whole in the package column.
fn side(key: Option<&str>) -> (String, String, String) {
    match key.map(PackageKey::parse) {
        Some(Ok(key)) => {
            (
                key.architecture().to_string(),
                key.name().to_string(),
                key.version().to_string(),
            )
        }
        Some(Err(_)) => (String::new(), key.unwrap_or_default().to_string(), String::new()),
        None => (String::new(), String::new(), "-".to_string()),
    }
}

/// Renders a diff as a table. Rows start with `!` when both snapshots carry
/// the package, `-` when only the left one does and `+` when only the right
/// one does.
pub fn format_diff(left: &str, right: &str, diff: &[PackageDiff]) -> String {
    let mut builder = Builder::new();
    builder.push_record([
        String::new(),
        "Arch".to_string(),
        "Package".to_string(),
        format!("Version in {left}"),
        format!("Version in {right}"),
    ]);

    for entry in diff {
        let left_key = entry.left.as_ref().map(|package| package.key.as_str());
        let right_key = entry.right.as_ref().map(|package| package.key.as_str());
        let (left_arch, left_name, left_version) = side(left_key);
        let (right_arch, right_name, right_version) = side(right_key);

        let (marker, arch, name) = match (left_key, right_key) {
            (Some(_), Some(_)) => (Colored(Yellow, "!"), left_arch, left_name),
            (Some(_), None) => (Colored(Red, "-"), left_arch, left_name),
            _ => (Colored(Green, "+"), right_arch, right_name),
        };
        builder.push_record([marker.to_string(), arch, name, left_version, right_version]);
    }

    let mut table = builder.build().with(Style::blank()).to_string();
    table.push('\n');
    table
}
