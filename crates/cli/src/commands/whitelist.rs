use crate::di::UseCases;

const RELOAD_HINT: &str = "Send SIGHUP to a running service to apply the change";

pub async fn add(use_cases: &UseCases, domain: &str) -> anyhow::Result<()> {
    let added = use_cases.whitelist.add(domain).await?;
    println!("Whitelisted {added}");
    println!("{RELOAD_HINT}");
    Ok(())
}

pub async fn remove(use_cases: &UseCases, domain: &str) -> anyhow::Result<()> {
    let removed = use_cases.whitelist.remove(domain).await?;
    println!("Removed {removed} from the whitelist");
    println!("{RELOAD_HINT}");
    Ok(())
}

pub async fn list(use_cases: &UseCases) -> anyhow::Result<()> {
    let domains = use_cases.whitelist.list().await?;
    if domains.is_empty() {
        println!("Whitelist is empty");
    }
    for domain in domains {
        println!("{domain}");
    }
    Ok(())
}
