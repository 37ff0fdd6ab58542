use crate::di::UseCases;

pub async fn add(use_cases: &UseCases, url: &str) -> anyhow::Result<()> {
    let added = use_cases.sources.add(url).await?;
    println!("Added blocklist source {added}");
    println!("Run `import --from-sources` to download it");
    Ok(())
}

pub async fn remove(use_cases: &UseCases, url: &str) -> anyhow::Result<()> {
    let removed = use_cases.sources.remove(url).await?;
    println!("Removed blocklist source {removed}");
    Ok(())
}

pub async fn list(use_cases: &UseCases) -> anyhow::Result<()> {
    let sources = use_cases.sources.list().await?;
    if sources.is_empty() {
        println!("No blocklist sources");
    }
    for source in sources {
        println!(
            "{:>4}  {}  {}",
            source.id,
            source.created_at.as_deref().unwrap_or("-"),
            source.url
        );
    }
    Ok(())
}
