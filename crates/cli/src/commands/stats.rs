use crate::di::UseCases;

pub async fn stats(use_cases: &UseCases) -> anyhow::Result<()> {
    let summary = use_cases.stats.execute().await?;

    println!("Blocked domains:     {}", summary.blocked_domains);
    println!("Whitelisted domains: {}", summary.whitelisted_domains);
    println!("Blocked (all runs):  {}", summary.blocked_total);
    println!("Logged queries:      {}", summary.queries.total);
    println!("  blocked:           {}", summary.queries.blocked);
    println!("  allowed:           {}", summary.queries.allowed());
    Ok(())
}
