use crate::config::Config;
use crate::state::SharedState;

pub async fn cmd_search_ads(config: Config, query: &str) -> anyhow::Result<()> {
    let state = SharedState::new(config).await?;

    println!(
        "Searching for: '{query}' (cache: {})",
        state.search_service.cache_backend()
    );

    let results = state.search_service.search_ads(query).await?;

    if results.is_empty() {
        println!("No ads found matching '{query}'");
        return Ok(());
    }

    println!();
    println!("Search Results ({} total):", results.len());
    println!("{:-<70}", "");

    for ad in &results {
        println!("• {}", ad.summary_line());
        if !ad.location.is_empty() {
            println!("  {} | {}", ad.category.name, ad.location);
        }
    }

    Ok(())
}
