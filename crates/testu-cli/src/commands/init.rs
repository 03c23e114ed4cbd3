//! The `testu init` command: write a starter config file.

use std::path::Path;

use anyhow::{Context, Result};

const STARTER_CONFIG: &str = r#"# testu configuration.
#
# The groq provider reads its key from the GROQ_API_KEY environment
# variable. Get one at https://console.groq.com/keys.

default_provider = "groq"
default_model = "openai/gpt-oss-120b"
num_questions = 5
history_file = "quiz_history.json"

[providers.groq]
type = "groq"
api_key = "${GROQ_API_KEY}"

# Offline provider with a small canned quiz. Handy for trying the
# grading flow without an API key: testu run --topic demo --provider mock
[providers.mock]
type = "mock"
"#;

pub fn execute() -> Result<()> {
    let path = Path::new("testu.toml");
    if path.exists() {
        println!("testu.toml already exists, leaving it untouched.");
        return Ok(());
    }

    std::fs::write(path, STARTER_CONFIG).context("failed to write testu.toml")?;

    println!("Wrote testu.toml.");
    println!("Next steps:");
    println!("  1. export GROQ_API_KEY=<your key>");
    println!("  2. testu run --topic \"Lietuvos istorija\"");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::STARTER_CONFIG;
    use testu_providers::TestuConfig;

    #[test]
    fn starter_config_parses() {
        let config: TestuConfig = toml::from_str(STARTER_CONFIG).unwrap();
        assert_eq!(config.default_provider, "groq");
        assert!(config.providers.contains_key("groq"));
        assert!(config.providers.contains_key("mock"));
    }
}
