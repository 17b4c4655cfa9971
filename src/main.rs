// Console demo for the humany client.
// Lists categories and popular guides, opens one guide and runs a search.

use humany::{ClientConfig, HumanyError, Query, ServiceClient};
use tracing::info;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

const DEMO_SERVICE_URL: &str = "https://help.humany.net/admin-help-en/";

#[tokio::main]
async fn main() -> humany::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("humany=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = match ClientConfig::from_env() {
        Ok(config) => config,
        Err(HumanyError::MissingServiceUrl) => ClientConfig::new(DEMO_SERVICE_URL),
        Err(e) => return Err(e),
    };
    // Real integrations should keep this id per end user between calls.
    config.client.get_or_insert_with(|| Uuid::new_v4().to_string());
    config.enable_statistics = true;

    info!(service_url = %config.service_url, "starting demo");
    let client = ServiceClient::from_config(config)?;

    println!("ALL CATEGORIES");
    let categories = client.get_categories(Query::new()).await?;
    for category in &categories.children {
        println!("\t{}", category.name);
    }

    println!();
    println!("POPULAR GUIDES");
    let guides = client.get_guides(Query::new()).await?;
    for guide in &guides.matches {
        println!("\t{}", guide.title);
    }

    if let Some(first) = guides.matches.first() {
        println!();
        println!("GUIDE #{}", first.id);
        let guide = client.get_guide(first.id, Query::new()).await?;
        println!("{}", guide.title);
        println!("{}...", guide.body.lines().next().unwrap_or_default());
    }

    println!();
    println!("SEARCH GUIDES");
    let search = client.get_guides(Query::new().phrase("guide")).await?;
    for guide in &search.matches {
        println!("\t{}", guide.title);
    }

    println!();
    println!("CATEGORY FACETS");
    let facets = client.get_categories(Query::new().phrase("guide")).await?;
    for category in facets.children.iter().filter(|c| c.guides_count > 0) {
        println!("\t{} ({})", category.name, category.guides_count);
    }

    Ok(())
}
