use crate::di::UseCases;

pub async fn recent(use_cases: &UseCases, limit: u32) -> anyhow::Result<()> {
    let queries = use_cases.recent_queries.execute(limit).await?;
    if queries.is_empty() {
        println!("No queries logged");
        return Ok(());
    }

    for query in queries {
        let timestamp = query
            .timestamp
            .map(|t| t.format("%Y-%m-%d %H:%M:%S%.3f").to_string())
            .unwrap_or_else(|| "-".to_string());
        let verdict = if query.blocked { "BLOCKED" } else { "allowed" };
        println!(
            "{timestamp}  {:<15}  {verdict:<7}  {:<9}  {}",
            query.client_ip.to_string(),
            query.source.as_str(),
            query.domain
        );
    }
    Ok(())
}

pub async fn clear(use_cases: &UseCases) -> anyhow::Result<()> {
    let deleted = use_cases.clear_query_log.execute().await?;
    println!("Deleted {deleted} query log entries");
    Ok(())
}
