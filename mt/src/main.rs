//! mt - transactional email template tool
//!
//! CLI entry point for listing, checking and previewing email templates.

use std::path::Path;

use clap::Parser;
use colored::*;
use eyre::{Context, Result, eyre};
use tracing::{debug, info};

use mailtemplates::cli::{Cli, Command, PreviewArgs, PreviewFormat, preview_config, preview_message};
use mailtemplates::config::Config;
use mailtemplates::{Mailer, TemplateOrigin, TemplateRegistry};

fn setup_logging(cli_log_level: Option<&str>) -> Result<()> {
    // Priority: CLI --log-level > RUST_LOG > WARN
    let level = match cli_log_level.map(str::to_uppercase).as_deref() {
        Some("TRACE") => tracing::Level::TRACE,
        Some("DEBUG") => tracing::Level::DEBUG,
        Some("INFO") => tracing::Level::INFO,
        Some("WARN") | Some("WARNING") | None => tracing::Level::WARN,
        Some("ERROR") => tracing::Level::ERROR,
        Some(other) => {
            eprintln!("Warning: Unknown log-level '{}', defaulting to WARN", other);
            tracing::Level::WARN
        }
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .try_init()
        .map_err(|e| eyre!("Failed to install subscriber: {}", e))?;

    debug!("Logging initialized (level: {:?})", level);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.log_level.as_deref()).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    info!(company = %config.company_name, "mt loaded config");

    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        Command::List { templates } => cmd_list(&config, templates.as_deref()),
        Command::Check { dir } => cmd_check(&dir),
        Command::Preview(args) => cmd_preview(config, &args),
    }
}

fn cmd_list(config: &Config, templates: Option<&Path>) -> Result<()> {
    let registry = TemplateRegistry::load_defaults().context("Failed to load default templates")?;

    if let Some(dir) = templates.or(config.templates_path.as_deref()) {
        registry
            .load_overrides(dir)
            .with_context(|| format!("Failed to load templates from {}", dir.display()))?;
    }

    for template in registry.templates() {
        let origin = match template.origin() {
            TemplateOrigin::Embedded => "embedded".dimmed(),
            TemplateOrigin::Override(path) => path.display().to_string().yellow(),
        };
        println!("{:<36} {:<5} {}", template.name().cyan(), template.format().to_string(), origin);
    }
    Ok(())
}

fn cmd_check(dir: &Path) -> Result<()> {
    let registry = TemplateRegistry::load_defaults().context("Failed to load default templates")?;

    if let Err(e) = registry.load_overrides(dir) {
        println!("{} {}", "✗".red(), e);
        return Err(eyre!("Template check failed for {}", dir.display()));
    }

    let overridden: Vec<_> = registry
        .templates()
        .into_iter()
        .filter(|t| matches!(t.origin(), TemplateOrigin::Override(_)))
        .collect();

    if overridden.is_empty() {
        println!("{} No templates found in {}", "!".yellow(), dir.display());
    }
    for template in &overridden {
        println!("{} {}", "✓".green(), template.name());
    }
    println!("{} {} override(s) parsed", "✓".green(), overridden.len());
    Ok(())
}

fn cmd_preview(config: Config, args: &PreviewArgs) -> Result<()> {
    let mailer = Mailer::new(preview_config(config)).context("Invalid configuration")?;
    debug!(templates = mailer.registry().len(), "cmd_preview: registry ready");

    let message = preview_message(&mailer, args).with_context(|| format!("Failed to build {} email", args.kind))?;

    match args.format {
        PreviewFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&message)?);
        }
        PreviewFormat::Text => println!("{}", message.text),
        PreviewFormat::Html => println!("{}", message.html),
        PreviewFormat::All => {
            println!("{} {}", "From:".bold(), message.from);
            println!("{} {}", "To:".bold(), message.to.join(", "));
            println!("{} {}", "Subject:".bold(), message.subject.cyan());
            for attachment in &message.attachments {
                println!("{} {}", "Attachment:".bold(), attachment.filename);
            }
            println!("\n{}", "--- text ---".green());
            println!("{}", message.text);
            println!("\n{}", "--- html ---".green());
            println!("{}", message.html);
        }
    }
    Ok(())
}
