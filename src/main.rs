use std::{path::PathBuf, process::exit, time::Duration};

use bento_client::{
    domain::{
        BlacklistData, CommandData, EmailData, EventData, JsonMap, SubscriberInput, ValidationData,
    },
    BentoClient, ClientConfig, Context,
};
use clap::{CommandFactory, Parser, Subcommand};
use color_eyre::eyre::{eyre, Result, WrapErr};
use serde::Serialize;

use crate::{
    config::{default_config_path, load_config, save_config, BentoConfig},
    logging::{init_logging, LoggingConfig},
};

mod config;
mod logging;

/// Command line access to the Bento marketing automation API
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Alternate path to the configuration file.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Print the path to the configuration file and exit.
    #[arg(short, long)]
    print_config_path: bool,
    /// Give up on the request after this many seconds.
    #[arg(long, value_name = "SECS")]
    deadline: Option<u64>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a configuration file template
    Init,
    /// Look up, create or import subscribers
    #[command(subcommand)]
    Subscriber(SubscriberCommand),
    /// Track a single event
    Track {
        email: String,
        /// Event type, e.g. `$purchase`
        #[arg(value_name = "TYPE")]
        kind: String,
        /// Custom field as `key=value`, repeatable
        #[arg(long = "field", value_parser = parse_key_value)]
        fields: Vec<(String, serde_json::Value)>,
        /// Event detail as `key=value`, repeatable
        #[arg(long = "detail", value_parser = parse_key_value)]
        details: Vec<(String, serde_json::Value)>,
    },
    /// Send a transactional email
    Email {
        #[arg(long)]
        to: String,
        #[arg(long)]
        from: String,
        #[arg(long)]
        subject: String,
        /// HTML body
        #[arg(long)]
        html: String,
    },
    /// Run a subscriber command such as `add_tag`
    Exec {
        #[arg(value_name = "COMMAND")]
        name: String,
        email: String,
        query: String,
    },
    /// List or create tags
    #[command(subcommand)]
    Tags(CatalogCommand),
    /// List or create custom fields
    #[command(subcommand)]
    Fields(CatalogCommand),
    /// List broadcasts
    Broadcasts,
    /// Site, segment or report statistics
    #[command(subcommand)]
    Stats(StatsCommand),
    /// Check a domain or IP address against blacklists
    Blacklist {
        #[arg(long, required_unless_present = "ip")]
        domain: Option<String>,
        #[arg(long)]
        ip: Option<String>,
    },
    /// Check whether an email address looks deliverable
    Validate {
        email: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        ip: Option<String>,
        #[arg(long)]
        user_agent: Option<String>,
    },
    /// Run content moderation over text
    Moderate { content: String },
    /// Predict gender from a full name
    Gender { name: String },
    /// Geolocate an IP address
    Geolocate { ip: String },
}

#[derive(Subcommand, Debug)]
enum SubscriberCommand {
    Find {
        email: String,
    },
    Create {
        email: String,
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        /// Tag to apply, repeatable
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
    /// Import subscribers from a JSON array
    Import {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

#[derive(Subcommand, Debug)]
enum CatalogCommand {
    List,
    Create { name: String },
}

#[derive(Subcommand, Debug)]
enum StatsCommand {
    Site,
    Segment { id: String },
    Report { id: String },
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    let config_path = args.config.clone().unwrap_or_else(default_config_path);

    if args.print_config_path {
        println!("{}", config_path.display());
        exit(0);
    }

    let Some(command) = args.command else {
        Args::command().print_help()?;
        exit(2);
    };

    let mut config = load_config(&config_path)?;

    if let Command::Init = command {
        save_config(&config_path, &config)?;
        println!("Wrote {}", config_path.display());
        return Ok(());
    }

    config.apply_env_overrides()?;

    let mut logging_config = LoggingConfig::from_env();
    if let Some(level) = &config.log_level {
        logging_config = logging_config.with_level(level);
    }
    let _log_guard =
        init_logging(logging_config).map_err(|e| eyre!("Failed to initialize logging: {e}"))?;

    let rt = tokio::runtime::Runtime::new().wrap_err("Failed to create runtime")?;
    rt.block_on(run(&config, args.deadline, command))
}

async fn run(config: &BentoConfig, deadline: Option<u64>, command: Command) -> Result<()> {
    let client = BentoClient::new(ClientConfig::try_from(config)?)?;

    let ctx = match deadline {
        Some(secs) => Context::background().with_timeout(Duration::from_secs(secs)),
        None => Context::background(),
    };

    let interrupt = ctx.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupted, cancelling request");
            interrupt.cancel();
        }
    });

    tracing::info!(version = env!("CARGO_PKG_VERSION"), ?command, "Running command");

    match command {
        Command::Init => Ok(()),
        Command::Subscriber(SubscriberCommand::Find { email }) => {
            print_json(&client.find_subscriber(&ctx, &email).await?)
        }
        Command::Subscriber(SubscriberCommand::Create { email, first_name, last_name, tags }) => {
            let input = SubscriberInput {
                first_name: first_name.map(Into::into),
                last_name: last_name.map(Into::into),
                ..SubscriberInput::new(email).with_tags(tags)
            };
            print_json(&client.create_subscriber(&ctx, &input).await?)
        }
        Command::Subscriber(SubscriberCommand::Import { file }) => {
            let raw = std::fs::read_to_string(&file)
                .wrap_err_with(|| format!("Failed to read {}", file.display()))?;
            let subscribers: Vec<SubscriberInput> = serde_json::from_str(&raw)
                .wrap_err_with(|| format!("{} is not a JSON array of subscribers", file.display()))?;
            print_json(&client.import_subscribers(&ctx, &subscribers).await?)
        }
        Command::Track { email, kind, fields, details } => {
            let event = EventData {
                fields: to_map(fields),
                details: to_map(details),
                ..EventData::new(kind, email)
            };
            print_json(&client.track_events(&ctx, &[event]).await?)
        }
        Command::Email { to, from, subject, html } => {
            let email = EmailData {
                to: to.into(),
                from: from.into(),
                subject: subject.into(),
                html_body: html,
                transactional: true,
                personalizations: None,
            };
            print_json(&client.send_emails(&ctx, &[email]).await?)
        }
        Command::Exec { name, email, query } => {
            let command = CommandData::parse(&name, email, query)?;
            print_json(&client.subscriber_command(&ctx, &[command]).await?)
        }
        Command::Tags(CatalogCommand::List) => print_json(&client.get_tags(&ctx).await?),
        Command::Tags(CatalogCommand::Create { name }) => {
            print_json(&client.create_tag(&ctx, &name).await?)
        }
        Command::Fields(CatalogCommand::List) => print_json(&client.get_fields(&ctx).await?),
        Command::Fields(CatalogCommand::Create { name }) => {
            print_json(&client.create_field(&ctx, &name).await?)
        }
        Command::Broadcasts => print_json(&client.get_broadcasts(&ctx).await?),
        Command::Stats(StatsCommand::Site) => print_json(&client.get_site_stats(&ctx).await?),
        Command::Stats(StatsCommand::Segment { id }) => {
            print_json(&client.get_segment_stats(&ctx, &id).await?)
        }
        Command::Stats(StatsCommand::Report { id }) => {
            print_json(&client.get_report_stats(&ctx, &id).await?)
        }
        Command::Blacklist { domain, ip } => {
            let data = BlacklistData {
                domain: domain.map(Into::into),
                ip_address: ip.map(Into::into),
            };
            print_json(&client.get_blacklist_status(&ctx, &data).await?)
        }
        Command::Validate { email, name, ip, user_agent } => {
            let data = ValidationData {
                full_name: name.map(Into::into),
                ip_address: ip.map(Into::into),
                user_agent: user_agent.map(Into::into),
                ..ValidationData::new(email)
            };
            print_json(&client.validate_email(&ctx, &data).await?)
        }
        Command::Moderate { content } => {
            print_json(&client.get_content_moderation(&ctx, &content).await?)
        }
        Command::Gender { name } => print_json(&client.get_gender(&ctx, &name).await?),
        Command::Geolocate { ip } => print_json(&client.geolocate_ip(&ctx, &ip).await?),
    }
}

fn print_json(value: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn to_map(pairs: Vec<(String, serde_json::Value)>) -> Option<JsonMap> {
    (!pairs.is_empty()).then(|| pairs.into_iter().collect())
}

/// Parse `key=value`, reading the value as JSON when possible
fn parse_key_value(s: &str) -> Result<(String, serde_json::Value), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got `{s}`"))?;

    if key.trim().is_empty() {
        return Err(format!("missing key in `{s}`"));
    }

    let value = serde_json::from_str(value)
        .unwrap_or_else(|_| serde_json::Value::String(value.to_string()));

    Ok((key.trim().to_string(), value))
}
