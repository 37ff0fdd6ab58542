use crate::di::UseCases;
use anyhow::Context;
use ferrous_shield_application::use_cases::ImportOutcome;
use std::path::Path;

pub async fn import(use_cases: &UseCases, path: &Path, force: bool) -> anyhow::Result<()> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read blocklist {}", path.display()))?;

    let outcome = use_cases.import_blocklist.execute(&content, force).await?;
    print_outcome(&outcome);
    Ok(())
}

fn print_outcome(outcome: &ImportOutcome) {
    if outcome.unchanged {
        println!("Blocklist unchanged (sha256 {}), nothing imported", outcome.hash);
        println!("Use --force to import it anyway");
    } else {
        println!(
            "Imported {} domains ({} lines skipped), sha256 {}",
            outcome.imported, outcome.rejected_lines, outcome.hash
        );
        println!("Send SIGHUP to a running service to pick up the new list");
    }
}

pub async fn import_from_sources(use_cases: &UseCases, force: bool) -> anyhow::Result<()> {
    let outcome = use_cases.sync_sources.execute(force).await?;

    for (url, reason) in &outcome.failed {
        println!("Skipped {url}: {reason}");
    }
    println!(
        "Downloaded {} of {} sources",
        outcome.fetched.len(),
        outcome.fetched.len() + outcome.failed.len()
    );
    print_outcome(&outcome.import);
    Ok(())
}
