use std::fs;

use aptctl_api::{
    Client, PublishDropOptions, PublishOptions, PublishUpdateOptions, PublishedList, SigningOptions,
    SourceEntryRequest,
};
use nu_ansi_term::Color::{Cyan, Green};
use tracing::info;

use crate::{
    cli::{PublishCommand, PublishTargetArgs, SigningArgs},
    error::{ErrorContext, Result},
    utils::{bracketed, print_bullets, Colored},
};

fn format_sources(list: &PublishedList) -> String {
    list.sources
        .iter()
        .map(|source| format!("{}: [{}]", source.component, source.name))
        .collect::<Vec<_>>()
        .join(", ")
}

/// One-line summary of a published repository, as shown by `publish list`.
pub fn format_published_list(list: &PublishedList) -> String {
    let kind = if list.is_local() {
        "local"
    } else {
        "snapshot(s)"
    };
    format!(
        "{} {} publishes {kind} {{{}}}",
        list.path,
        bracketed(&list.architectures),
        format_sources(list)
    )
}

impl SigningArgs {
    /// Builds the signing settings sent to the server. A local passphrase
    /// file is read here and sent as the passphrase itself.
    pub fn to_options(&self) -> Result<SigningOptions> {
        if self.skip_signing {
            return Ok(SigningOptions::without_signing());
        }

        let mut options = SigningOptions {
            skip: false,
            gpg_key: self.gpg_key.clone(),
            keyring: self.keyring.clone(),
            secret_keyring: self.secret_keyring.clone(),
            passphrase: self.passphrase.clone(),
            passphrase_file: self.remote_passphrase_file.clone(),
        };

        if let Some(path) = &self.passphrase_file {
            let content = fs::read_to_string(path)
                .with_context(|| format!("reading passphrase file {path}"))?;
            options.passphrase = Some(content.trim_end_matches(['\r', '\n']).to_string());
        }

        Ok(options)
    }
}

impl From<PublishTargetArgs> for PublishOptions {
    fn from(args: PublishTargetArgs) -> Self {
        Self {
            architectures: args.architectures,
            distribution: args.distribution,
            component: args.component,
        }
    }
}

pub fn run(client: &Client, command: PublishCommand) -> Result<()> {
    let publish = client.publish();

    match command {
        PublishCommand::List => {
            let lists = publish.list()?;
            print_bullets(
                "Published repositories:",
                lists.iter().map(format_published_list),
            );
        }
        PublishCommand::Show {
            distribution,
            prefix,
        } => {
            let list = publish.show(&distribution, &prefix)?;
            println!("Prefix: {}", list.prefix);
            println!("Distribution: {}", list.distribution);
            println!("Architectures: {}", bracketed(&list.architectures));
            println!("Sources:");
            for source in &list.sources {
                println!("  {}: {} [{}]", source.component, source.name, list.source_kind);
            }
        }
        PublishCommand::Drop {
            distribution,
            prefix,
            force_drop,
            skip_cleanup,
        } => {
            let options = PublishDropOptions {
                force: force_drop,
                skip_cleanup,
            };
            publish.drop(&distribution, &prefix, options)?;
            info!("Dropped {prefix}/{distribution}");
        }
        PublishCommand::Repo {
            name,
            prefix,
            target,
            signing,
        } => {
            let list = publish.publish_repo(&name, &prefix, &target.into(), &signing.to_options()?)?;
            info!("Published: {}", Colored(Green, &list.path));
        }
        PublishCommand::Snapshot {
            name,
            prefix,
            target,
            signing,
        } => {
            let list =
                publish.publish_snapshot(&name, &prefix, &target.into(), &signing.to_options()?)?;
            info!("Published: {}", Colored(Green, &list.path));
        }
        PublishCommand::Update {
            distribution,
            prefix,
            force_overwrite,
            skip_contents,
            skip_bz2,
            skip_cleanup,
            signing,
        } => {
            let options = PublishUpdateOptions {
                force_overwrite,
                signing: signing.to_options()?,
                skip_contents: skip_contents.then_some(true),
                skip_bz2: skip_bz2.then_some(true),
                skip_cleanup: skip_cleanup.then_some(true),
                ..Default::default()
            };
            let list = publish.update_or_switch(&prefix, &distribution, &options)?;
            info!(
                "Publish for local repo {} {} publishes {{{}}} has been successfully updated.",
                Colored(Cyan, &list.path),
                bracketed(&list.architectures),
                format_sources(&list)
            );
        }
        PublishCommand::Switch {
            distribution,
            prefix,
            snapshot,
            component,
            force_overwrite,
            signing,
        } => {
            let options = PublishUpdateOptions {
                force_overwrite,
                signing: signing.to_options()?,
                snapshots: vec![SourceEntryRequest {
                    component,
                    name: snapshot,
                }],
                ..Default::default()
            };
            let list = publish.update_or_switch(&prefix, &distribution, &options)?;
            info!(
                "Publish for snapshot {} {} publishes {{{}}} has been successfully updated.",
                Colored(Cyan, &list.path),
                bracketed(&list.architectures),
                format_sources(&list)
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use aptctl_api::SourceEntry;
    use tempfile::NamedTempFile;

    use super::*;

    fn published(source_kind: &str) -> PublishedList {
        PublishedList {
            architectures: vec!["amd64".into(), "arm64".into()],
            distribution: "bookworm".into(),
            prefix: "debian".into(),
            path: "debian/bookworm".into(),
            source_kind: source_kind.into(),
            sources: vec![
                SourceEntry {
                    component: "main".into(),
                    name: "stable".into(),
                },
                SourceEntry {
                    component: "contrib".into(),
                    name: "extras".into(),
                },
            ],
            ..Default::default()
        }
    }

    #[test]
    fn test_format_published_list_local() {
        assert_eq!(
            format_published_list(&published("local")),
            "debian/bookworm [amd64 arm64] publishes local {main: [stable], contrib: [extras]}"
        );
    }

    #[test]
    fn test_format_published_list_snapshot() {
        assert_eq!(
            format_published_list(&published("snapshot")),
            "debian/bookworm [amd64 arm64] publishes snapshot(s) {main: [stable], contrib: [extras]}"
        );
    }

    #[test]
    fn test_skip_signing_ignores_other_flags() {
        let args = SigningArgs {
            skip_signing: true,
            gpg_key: Some("ABCD".into()),
            ..Default::default()
        };
        assert_eq!(args.to_options().unwrap(), SigningOptions::without_signing());
    }

    #[test]
    fn test_local_passphrase_file_is_read() {
        let mut file = NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, b"hunter2\n").unwrap();

        let args = SigningArgs {
            gpg_key: Some("ABCD".into()),
            passphrase: Some("ignored".into()),
            passphrase_file: Some(file.path().to_string_lossy().into_owned()),
            remote_passphrase_file: Some("/srv/pass".into()),
            ..Default::default()
        };
        let options = args.to_options().unwrap();
        assert!(!options.skip);
        assert_eq!(options.passphrase.as_deref(), Some("hunter2"));
        assert_eq!(options.passphrase_file.as_deref(), Some("/srv/pass"));
        assert_eq!(options.gpg_key.as_deref(), Some("ABCD"));
    }

    #[test]
    fn test_missing_passphrase_file() {
        let args = SigningArgs {
            passphrase_file: Some("/nonexistent/aptctl/passphrase".into()),
            ..Default::default()
        };
        assert!(args.to_options().is_err());
    }
}
