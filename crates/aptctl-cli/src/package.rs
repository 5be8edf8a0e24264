use aptctl_api::{Client, Package};
use nu_ansi_term::Color::Cyan;

use crate::{cli::PackageCommand, error::Result, utils::Colored};

fn print_details(package: &Package) {
    println!("{}", Colored(Cyan, &package.key));
    println!("  Package: {}", package.package);
    println!("  Version: {}", package.version);
    println!("  Architecture: {}", package.architecture);
    if let Some(source) = &package.source {
        println!("  Source: {source}");
    }
    for (field, value) in &package.extra {
        match value.as_str() {
            Some(value) => println!("  {field}: {value}"),
            None => println!("  {field}: {value}"),
        }
    }
}

pub fn run(client: &Client, command: PackageCommand) -> Result<()> {
    let packages = client.packages();

    match command {
        PackageCommand::Search {
            query,
            details,
        } => {
            let found = packages.search(&query, details)?;
            for package in &found {
                if details {
                    print_details(package);
                } else {
                    println!("{}", package.key);
                }
            }
        }
        PackageCommand::Show {
            key,
        } => {
            let package = packages.show(&key)?;
            print_details(&package);
        }
    }

    Ok(())
}
