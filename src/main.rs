use std::sync::Arc;

use mail_assist::config::AssistantConfig;
use mail_assist::rules::RuleParser;
use mail_assist::store::{LibSqlStore, RuleStore};

const USAGE: &str = "Usage: mail-assist <command> [args]

Commands:
  add-rule <text>      Parse a free-text rule and save it
  list-rules           Show all saved rules
  delete-rule <id>     Delete a rule
  enable-rule <id>     Enable a rule
  disable-rule <id>    Disable a rule
  show-criteria        Show the saved prioritization criteria
  clear-criteria       Remove the saved prioritization criteria";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = AssistantConfig::from_env();
    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = args.first().map(String::as_str) else {
        eprintln!("{USAGE}");
        std::process::exit(2);
    };

    let store: Arc<dyn RuleStore> = Arc::new(
        LibSqlStore::new_local(&config.db_path)
            .await
            .unwrap_or_else(|e| {
                eprintln!(
                    "Error: failed to open database at {}: {e}",
                    config.db_path.display()
                );
                std::process::exit(1);
            }),
    );

    match command {
        "add-rule" => {
            let text = args[1..].join(" ");
            if text.is_empty() {
                anyhow::bail!("add-rule needs the rule text");
            }
            let parser = RuleParser::new();
            match parser.parse(&text) {
                Some(mut rule) => {
                    let id = store.save_rule(&rule).await?;
                    rule.id = Some(id);
                    println!("Saved rule {id}: {}", rule.name);
                    println!("{}", serde_json::to_string_pretty(&rule)?);
                }
                None => {
                    anyhow::bail!(
                        "No action recognized in {text:?}. Try phrases like \
                         \"archive newsletters older than 7 days\"."
                    );
                }
            }
        }
        "list-rules" => {
            let rules = store.load_rules(false).await?;
            if rules.is_empty() {
                println!("No rules saved.");
            }
            for rule in rules {
                let id = rule.id.unwrap_or_default();
                let state = if rule.enabled { "enabled" } else { "disabled" };
                println!(
                    "[{id}] {} ({state}, {} condition(s), {} action(s))",
                    rule.name,
                    rule.conditions.len(),
                    rule.actions.len()
                );
            }
        }
        "delete-rule" => {
            let id = parse_id(&args)?;
            if store.delete_rule(id).await? {
                println!("Deleted rule {id}.");
            } else {
                anyhow::bail!("no rule with id {id}");
            }
        }
        "enable-rule" | "disable-rule" => {
            let enabled = command == "enable-rule";
            let id = parse_id(&args)?;
            if store.set_rule_enabled(id, enabled).await? {
                println!("Rule {id} {}.", if enabled { "enabled" } else { "disabled" });
            } else {
                anyhow::bail!("no rule with id {id}");
            }
        }
        "show-criteria" => match store.load_criteria().await? {
            Some(criteria) => println!("{}", serde_json::to_string_pretty(&criteria)?),
            None => println!("No prioritization criteria saved."),
        },
        "clear-criteria" => {
            store.clear_criteria().await?;
            println!("Prioritization criteria cleared.");
        }
        other => {
            eprintln!("Unknown command: {other}\n\n{USAGE}");
            std::process::exit(2);
        }
    }

    Ok(())
}

fn parse_id(args: &[String]) -> anyhow::Result<i64> {
    args.get(1)
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| anyhow::anyhow!("expected a numeric rule id"))
}
