//! seed 命令

use std::sync::Arc;

use colored::Colorize;

use crate::interfaces::cli::CliError;
use crate::services::seed_demo_data;
use crate::storage::SeaOrmStorage;

pub async fn seed_command(storage: Arc<SeaOrmStorage>) -> Result<(), CliError> {
    println!("{}", "Seeding demo data...".yellow());

    let report = seed_demo_data(storage).await?;

    println!(
        "  {} {} groups, {} links",
        "Created".green(),
        report.groups,
        report.links
    );
    if report.profile_created {
        println!("  {} demo profile", "Created".green());
    } else {
        println!("  {}", "Existing profile kept".dimmed());
    }
    Ok(())
}
