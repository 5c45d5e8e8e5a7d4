//! Store maintenance commands
//!
//! Work on the configured store directly, without going through HTTP.

use anyhow::Context;
use colored::Colorize;

use shopping_list::adapters;
use shopping_list::api::ItemView;
use shopping_list::config::ServerConfig;
use shopping_list::core::models::ItemName;

/// Add items to the store and print them
pub fn seed(config: &ServerConfig, names: &[String], json: bool) -> anyhow::Result<()> {
    // Validate everything before writing anything.
    let names = names
        .iter()
        .map(|raw| ItemName::parse(raw.as_str()).with_context(|| format!("Invalid item name {raw:?}")))
        .collect::<anyhow::Result<Vec<_>>>()?;

    let store = adapters::connect(&config.database_url)
        .with_context(|| format!("Failed to open store {}", config.database_url))?;

    let mut created = Vec::with_capacity(names.len());
    for name in &names {
        let item = store.create(name).context("Failed to create item")?;
        created.push(ItemView::from(item));
    }
    store.close()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&created)?);
    } else {
        for item in &created {
            println!("{} {} {}", "Added".green(), item.id.dimmed(), item.name);
        }
    }
    Ok(())
}

/// Print the items in the store
pub fn list(config: &ServerConfig, json: bool) -> anyhow::Result<()> {
    let store = adapters::connect(&config.database_url)
        .with_context(|| format!("Failed to open store {}", config.database_url))?;
    let items: Vec<ItemView> = store
        .find_all()
        .context("Failed to list items")?
        .iter()
        .map(ItemView::from)
        .collect();
    store.close()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&items)?);
    } else if items.is_empty() {
        println!("No items");
    } else {
        for item in &items {
            println!("{}  {}", item.id.dimmed(), item.name);
        }
    }
    Ok(())
}
