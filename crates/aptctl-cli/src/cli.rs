use clap::{ArgAction, Args as ClapArgs, Parser, Subcommand, ValueHint};

#[derive(Parser)]
#[command(
    author,
    version,
    about,
    help_template = "{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}",
    arg_required_else_help = true
)]
pub struct Args {
    /// Set output verbosity
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress outputs
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output logs as json
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Disable colors in output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Provide custom config file
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<String>,

    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[clap(subcommand)]
    pub command: Commands,
}

/// Settings used to reach the aptly server. Unset values fall back to the
/// config file.
#[derive(ClapArgs, Debug, Default, Clone)]
pub struct ConnectionArgs {
    /// Aptly server API URL
    #[arg(long, env = "APTCTL_URL", global = true, value_hint = ValueHint::Url)]
    pub url: Option<String>,

    /// Allow insecure HTTPS connections
    #[arg(long, global = true)]
    pub insecure: bool,

    /// HTTP basic auth username
    #[arg(long, env = "APTCTL_USER", global = true)]
    pub user: Option<String>,

    /// HTTP basic auth password
    #[arg(long = "basic-pass", env = "APTCTL_BASIC_PASS", global = true, hide_env_values = true)]
    pub basic_pass: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Set proxy
    #[arg(long, short = 'P', global = true)]
    pub proxy: Option<String>,

    /// Set user agent
    #[arg(long, short = 'A', global = true)]
    pub user_agent: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Repository management commands
    #[command(arg_required_else_help = true)]
    Repo {
        #[command(subcommand)]
        command: RepoCommand,
    },

    /// Snapshot management commands
    #[command(arg_required_else_help = true)]
    Snapshot {
        #[command(subcommand)]
        command: SnapshotCommand,
    },

    /// Published repository commands
    #[command(arg_required_else_help = true)]
    Publish {
        #[command(subcommand)]
        command: PublishCommand,
    },

    /// Package search commands
    #[command(arg_required_else_help = true)]
    Package {
        #[command(subcommand)]
        command: PackageCommand,
    },

    /// Uploaded file management commands
    #[command(arg_required_else_help = true)]
    Files {
        #[command(subcommand)]
        command: FilesCommand,
    },

    /// Aptly server status commands
    #[command(arg_required_else_help = true)]
    Status {
        #[command(subcommand)]
        command: StatusCommand,
    },
}

#[derive(Subcommand)]
pub enum RepoCommand {
    /// List all local package repositories on the server
    #[clap(visible_alias = "ls")]
    List,

    /// Display information about a local repository
    Show {
        name: String,

        /// List every package in the repository
        #[arg(long)]
        with_packages: bool,

        /// Only show the newest version of each package, implies --with-packages
        #[arg(long)]
        newest: bool,
    },

    /// Create a local package repository
    Create {
        name: String,

        #[arg(long)]
        comment: Option<String>,

        /// Default component when publishing
        #[arg(long)]
        component: Option<String>,

        /// Default distribution when publishing
        #[arg(long)]
        distribution: Option<String>,

        /// Seed the repository with the packages of a snapshot
        #[arg(long)]
        from_snapshot: Option<String>,
    },

    /// Change metadata of a local repository
    Edit {
        name: String,

        #[arg(long)]
        comment: Option<String>,

        #[arg(long)]
        component: Option<String>,

        #[arg(long)]
        distribution: Option<String>,
    },

    /// Change the name of a local repository
    Rename { name: String, new_name: String },

    /// Delete a local repository
    Drop {
        name: String,

        /// Drop the repository even if snapshots reference it
        #[arg(long)]
        force: bool,
    },

    /// Upload package files and add them to a repository
    Add {
        name: String,

        /// A .deb, .udeb or .dsc file, or a directory to search for them
        #[arg(value_hint = ValueHint::AnyPath)]
        path: String,

        /// Replace packages that conflict with the added ones
        #[arg(long)]
        force_replace: bool,

        /// Keep the uploaded files on the server after import
        #[arg(long)]
        no_remove: bool,
    },

    /// Upload .changes files and include them in a repository
    Include {
        name: String,

        /// A .changes file, or a directory to search for them
        #[arg(value_hint = ValueHint::AnyPath)]
        path: String,

        #[arg(long)]
        force_replace: bool,

        /// Accept unsigned .changes files
        #[arg(long)]
        accept_unsigned: bool,

        /// Skip signature verification of .changes files
        #[arg(long)]
        ignore_signatures: bool,
    },
}

#[derive(Subcommand)]
pub enum SnapshotCommand {
    /// List all snapshots
    #[clap(visible_alias = "ls")]
    List,

    /// Display information about a snapshot
    Show {
        name: String,

        #[arg(long)]
        with_packages: bool,
    },

    /// Create a snapshot from a local repository or mirror
    #[command(arg_required_else_help = true)]
    Create {
        name: String,

        #[arg(long, global = true)]
        description: Option<String>,

        #[command(subcommand)]
        source: SnapshotSource,
    },

    /// Change the name of a snapshot
    Rename { old_name: String, new_name: String },

    /// Delete a snapshot
    Drop {
        name: String,

        /// Drop the snapshot even if it is a source of other snapshots
        #[arg(long)]
        force: bool,
    },

    /// Display the package differences between two snapshots
    Diff {
        left: String,
        right: String,

        /// Only show packages present in both snapshots
        #[arg(long)]
        only_matching: bool,
    },

    /// Merge several source snapshots into a new snapshot
    Merge {
        destination: String,

        #[arg(required = true)]
        sources: Vec<String>,

        /// Keep only the latest version of each package
        #[arg(long, conflicts_with = "no_remove")]
        latest: bool,

        /// Keep every version of each package
        #[arg(long)]
        no_remove: bool,
    },
}

#[derive(Subcommand)]
pub enum SnapshotSource {
    /// Select the snapshot source
    From {
        #[command(subcommand)]
        kind: SnapshotFrom,
    },
}

#[derive(Subcommand)]
pub enum SnapshotFrom {
    /// Snapshot a local repository
    Repo { repo: String },
    /// Snapshot a mirror
    Mirror { mirror: String },
}

#[derive(ClapArgs, Debug, Default, Clone)]
pub struct SigningArgs {
    /// Do not sign Release files with GPG
    #[arg(long)]
    pub skip_signing: bool,

    /// GPG key ID to use when signing the release; the default key otherwise
    #[arg(long)]
    pub gpg_key: Option<String>,

    /// GPG keyring to use instead of the default
    #[arg(long)]
    pub keyring: Option<String>,

    /// GPG secret keyring to use instead of the default
    #[arg(long)]
    pub secret_keyring: Option<String>,

    /// GPG passphrase to unlock the private key (possibly insecure)
    #[arg(long)]
    pub passphrase: Option<String>,

    /// GPG passphrase file on the local machine, not the server
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub passphrase_file: Option<String>,

    /// GPG passphrase file on the server
    #[arg(long)]
    pub remote_passphrase_file: Option<String>,
}

#[derive(ClapArgs, Debug, Default, Clone)]
pub struct PublishTargetArgs {
    /// Distribution name to publish; guessed from the source when unset
    #[arg(long)]
    pub distribution: Option<String>,

    /// Component name to publish; defaults to the source's or main
    #[arg(long)]
    pub component: Option<String>,

    /// Comma-separated list of architectures to publish
    #[arg(long, value_delimiter = ',')]
    pub architectures: Vec<String>,
}

#[derive(Subcommand)]
pub enum PublishCommand {
    /// List published repositories
    #[clap(visible_alias = "ls")]
    List,

    /// Show a published repository
    Show { distribution: String, prefix: String },

    /// Remove the files of a published repository
    Drop {
        distribution: String,
        prefix: String,

        /// Drop even if the published files are shared
        #[arg(long)]
        force_drop: bool,

        /// Leave unreferenced files in the pool
        #[arg(long)]
        skip_cleanup: bool,
    },

    /// Publish a local repository directly, bypassing snapshots
    Repo {
        name: String,
        prefix: String,

        #[command(flatten)]
        target: PublishTargetArgs,

        #[command(flatten)]
        signing: SigningArgs,
    },

    /// Publish a snapshot as a repository to be consumed by apt
    Snapshot {
        name: String,
        prefix: String,

        #[command(flatten)]
        target: PublishTargetArgs,

        #[command(flatten)]
        signing: SigningArgs,
    },

    /// Re-publish a published local repository
    Update {
        /// Distribution name of the published repository
        distribution: String,
        prefix: String,

        /// Overwrite files in the package pool
        #[arg(long)]
        force_overwrite: bool,

        /// Don't generate Contents indexes
        #[arg(long)]
        skip_contents: bool,

        /// Don't generate bzipped indexes
        #[arg(long)]
        skip_bz2: bool,

        /// Leave unreferenced files in the pool
        #[arg(long)]
        skip_cleanup: bool,

        #[command(flatten)]
        signing: SigningArgs,
    },

    /// Switch a published snapshot in place to a new snapshot
    Switch {
        /// Distribution name of the published repository
        distribution: String,
        prefix: String,
        snapshot: String,

        /// Component to switch
        #[arg(long)]
        component: Option<String>,

        #[arg(long)]
        force_overwrite: bool,

        #[command(flatten)]
        signing: SigningArgs,
    },
}

#[derive(Subcommand)]
pub enum PackageCommand {
    /// Search the whole package database
    Search {
        /// Package query, e.g. 'Name (~ hello)'
        query: String,

        /// Show package details instead of keys
        #[arg(long)]
        details: bool,
    },

    /// Show every field of one package
    Show {
        /// Package key, e.g. 'Pamd64 hello 3.0.0-2 96e8a0deaf8fc95f'
        key: String,
    },
}

#[derive(Subcommand)]
pub enum FilesCommand {
    /// List upload directories
    #[clap(visible_alias = "ls")]
    List,

    /// List the files in an upload directory
    Show { dir: String },

    /// Upload a file or directory; file types are not checked
    Upload {
        dir: String,

        #[arg(value_hint = ValueHint::AnyPath)]
        path: String,
    },

    /// Delete an upload directory or one file in it
    Delete { dir: String, file: Option<String> },
}

#[derive(Subcommand)]
pub enum StatusCommand {
    /// Show the aptly server version
    Version,
    /// Show how full the server storage is
    Storage,
}
