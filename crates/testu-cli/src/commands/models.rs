//! The `testu models` command: list the models each configured provider offers.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use testu_providers::{create_provider, load_config_from};

pub fn execute(provider_filter: Option<String>, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;

    let mut table = Table::new();
    table.set_header(vec![
        "Provider",
        "Model",
        "Name",
        "Context",
        "$/1k in",
        "$/1k out",
    ]);

    let mut names: Vec<_> = config.providers.keys().cloned().collect();
    names.sort();

    let mut rows = 0usize;

    for name in names {
        if let Some(filter) = &provider_filter {
            if &name != filter {
                continue;
            }
        }
        let provider_config = &config.providers[&name];
        let provider = match create_provider(&name, provider_config) {
            Ok(provider) => provider,
            Err(e) => {
                tracing::warn!("skipping provider '{name}': {e:#}");
                eprintln!("Warning: skipping provider '{name}': {e:#}");
                continue;
            }
        };
        for model in provider.available_models() {
            table.add_row(vec![
                Cell::new(&model.provider),
                Cell::new(&model.id),
                Cell::new(&model.name),
                Cell::new(model.max_context),
                Cell::new(format!("{:.5}", model.cost_per_1k_input)),
                Cell::new(format!("{:.5}", model.cost_per_1k_output)),
            ]);
            rows += 1;
        }
    }

    if rows == 0 {
        println!("No models available. Check your provider configuration.");
    } else {
        println!("{table}");
    }
    Ok(())
}
