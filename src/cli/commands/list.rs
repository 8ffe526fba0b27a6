//! List ads command handler

use crate::config::Config;
use crate::domain::CategoryId;
use crate::services::AdService;
use crate::state::SharedState;

pub async fn cmd_list_ads(config: Config, category: Option<i32>) -> anyhow::Result<()> {
    let state = SharedState::new(config).await?;
    let ads = state
        .ad_service
        .list_ads(category.map(CategoryId::new))
        .await?;

    if ads.is_empty() {
        println!("No ads yet.");
        return Ok(());
    }

    println!("Latest ads ({} shown)", ads.len());
    println!("{:-<70}", "");

    for ad in ads {
        let tags: Vec<&str> = ad.tags.iter().map(|t| t.name.as_str()).collect();
        println!("{}", ad.summary_line());
        println!(
            "  {} | {} | tags: {}",
            ad.category.name,
            ad.created_at,
            if tags.is_empty() {
                "-".to_string()
            } else {
                tags.join(", ")
            }
        );
    }

    Ok(())
}
