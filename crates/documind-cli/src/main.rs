use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use documind_core::client::ApiClient;
use documind_core::config::DocumindConfig;
use documind_core::model::{ChatRole, Credentials, UploadFile};
use documind_core::workspace::{
    format_file_size, ApiReplies, ChatTranscript, DashboardSnapshot, ReplySource,
    SimulatedReplies,
};
use owo_colors::OwoColorize;
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Parser)]
#[command(name = "documind", about = "DocuMind: chat with your documents", version)]
struct Cli {
    /// Service base URL (overrides api.base_url from config)
    #[arg(long, global = true)]
    api_url: Option<String>,
    /// Account email (falls back to auth.email from config)
    #[arg(long, global = true)]
    email: Option<String>,
    /// Account password (falls back to auth.password from config)
    #[arg(long, global = true)]
    password: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create an account with --email and --password
    Register,
    /// Check that the credentials are accepted
    Login,
    /// Upload, list and delete documents
    Documents {
        #[command(subcommand)]
        action: DocumentsCommand,
    },
    /// Talk to the assistant about a document
    Chat {
        #[command(subcommand)]
        action: ChatCommand,
    },
    /// Show document and activity statistics
    Dashboard {
        /// Show placeholder figures instead of querying the service
        #[arg(long)]
        sample: bool,
        /// Output raw JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum DocumentsCommand {
    /// List your documents
    List {
        /// Output raw JSON
        #[arg(long)]
        json: bool,
    },
    /// Upload a file
    Upload {
        /// Path of the file to upload
        path: PathBuf,
        /// MIME type to declare for the file
        #[arg(long)]
        mime: Option<String>,
    },
    /// Delete a document by ID
    Delete {
        /// Document ID
        id: String,
    },
}

#[derive(Subcommand)]
enum ChatCommand {
    /// Send one message and print the reply
    Send {
        /// Document ID
        doc_id: String,
        /// Message text
        message: String,
    },
    /// Print the conversation stored for a document
    History {
        /// Document ID
        doc_id: String,
        /// Output raw JSON
        #[arg(long)]
        json: bool,
    },
    /// Read messages from stdin, one per line
    Interactive {
        /// Document ID; without it replies are simulated locally
        doc_id: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "documind=warn,documind_core=warn".into()),
        )
        .compact()
        .init();

    let cli = Cli::parse();
    let mut config = DocumindConfig::load(Some(&std::env::current_dir()?))
        .unwrap_or_else(|e| {
            tracing::warn!("falling back to default config: {e}");
            DocumindConfig::default()
        });
    if let Some(url) = &cli.api_url {
        config.api.base_url = url.clone();
        config.validate();
    }

    run(cli, &config).await
}

async fn run(cli: Cli, config: &DocumindConfig) -> Result<()> {
    let mut client = ApiClient::from_config(&config.api);
    let credentials = resolve_credentials(cli.email, cli.password, config);

    match cli.command {
        Command::Register => {
            let credentials = credentials?;
            let body = client
                .register(&credentials)
                .await
                .context("registration failed")?;
            let message = body["message"].as_str().unwrap_or("account created");
            println!("{} {}", "✓".green(), message);
            Ok(())
        }
        Command::Login => {
            let token = client.login(&credentials?).await?;
            println!(
                "{} logged in to {} ({} token)",
                "✓".green(),
                client.base_url().cyan(),
                token.token_type.as_deref().unwrap_or("bearer")
            );
            Ok(())
        }
        Command::Documents { action } => {
            client.login(&credentials?).await?;
            match action {
                DocumentsCommand::List { json } => cmd_list(&client, json).await,
                DocumentsCommand::Upload { path, mime } => {
                    cmd_upload(&client, path, mime).await
                }
                DocumentsCommand::Delete { id } => {
                    client
                        .delete_document(&id)
                        .await
                        .with_context(|| format!("failed to delete {id}"))?;
                    println!("{} deleted {}", "✓".green(), id.cyan());
                    Ok(())
                }
            }
        }
        Command::Chat { action } => match action {
            ChatCommand::Interactive { doc_id: None } => {
                let transcript =
                    ChatTranscript::new(SimulatedReplies::from_config(&config.workspace));
                cmd_interactive(transcript).await
            }
            action => {
                client.login(&credentials?).await?;
                match action {
                    ChatCommand::Send { doc_id, message } => {
                        let reply = client.send_message(&doc_id, &message).await?;
                        println!("{}", reply.response);
                        Ok(())
                    }
                    ChatCommand::History { doc_id, json } => {
                        cmd_history(&client, &doc_id, json).await
                    }
                    ChatCommand::Interactive { doc_id } => {
                        let doc_id = doc_id.unwrap_or_default();
                        let transcript = ChatTranscript::new(ApiReplies::new(&client, doc_id));
                        cmd_interactive(transcript).await
                    }
                }
            }
        },
        Command::Dashboard { sample, json } => {
            let snapshot = if sample {
                DashboardSnapshot::sample()
            } else {
                client.login(&credentials?).await?;
                DashboardSnapshot::load(&client).await?
            };
            print_dashboard(&snapshot, json)
        }
    }
}

/// Command-line flags win over the `[auth]` config section.
fn resolve_credentials(
    email: Option<String>,
    password: Option<String>,
    config: &DocumindConfig,
) -> Result<Credentials> {
    let stored = config.auth.credentials();
    let email = email.or_else(|| stored.as_ref().map(|c| c.email.clone()));
    let password = password.or_else(|| stored.as_ref().map(|c| c.password.clone()));
    match (email, password) {
        (Some(email), Some(password)) => Ok(Credentials::new(email, password)),
        _ => bail!("credentials required: pass --email and --password or set [auth] in config"),
    }
}

async fn cmd_list(client: &ApiClient, json: bool) -> Result<()> {
    let documents = client.get_documents().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&documents)?);
        return Ok(());
    }

    if documents.is_empty() {
        println!("{}", "No documents uploaded yet".dimmed());
        return Ok(());
    }

    for doc in &documents {
        println!(
            "{}  {}  {}  {}",
            doc.id.cyan(),
            doc.name.bold(),
            format_file_size(doc.content.len() as u64).dimmed(),
            doc.created_at.dimmed()
        );
    }
    println!();
    println!("{} document(s)", documents.len());
    Ok(())
}

async fn cmd_upload(client: &ApiClient, path: PathBuf, mime: Option<String>) -> Result<()> {
    let mut file = UploadFile::from_path(&path)
        .await
        .with_context(|| format!("cannot read {}", path.display()))?;
    if let Some(mime) = mime {
        file = file.with_mime_type(mime);
    }
    let size = format_file_size(file.size());

    let doc = client.upload_document(&file).await?;
    println!(
        "{} uploaded {} ({}) as {}",
        "✓".green(),
        doc.name.bold(),
        size,
        doc.id.cyan()
    );
    Ok(())
}

async fn cmd_history(client: &ApiClient, doc_id: &str, json: bool) -> Result<()> {
    let history = client.get_chat_history(doc_id).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&history)?);
        return Ok(());
    }

    for message in &history {
        let who = match message.role {
            ChatRole::User => "you".blue().to_string(),
            ChatRole::Assistant => "assistant".magenta().to_string(),
        };
        println!("{} {}", who, message.timestamp.dimmed());
        println!("  {}", message.content);
    }
    Ok(())
}

async fn cmd_interactive<R: ReplySource>(mut transcript: ChatTranscript<R>) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    eprintln!("{}", "Type a message, Ctrl-D to quit.".dimmed());

    while let Some(line) = lines.next_line().await? {
        match transcript.submit(&line).await {
            Ok(Some(reply)) => println!("{} {}", "assistant:".magenta(), reply.content),
            Ok(None) => {}
            Err(e) => eprintln!("{} {e}", "error:".red()),
        }
    }
    Ok(())
}

fn print_dashboard(snapshot: &DashboardSnapshot, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(snapshot)?);
        return Ok(());
    }

    for stat in &snapshot.stats {
        println!("  {:<16} {}", stat.name.dimmed(), stat.value.bold());
    }

    if !snapshot.recent_activity.is_empty() {
        println!();
        println!("{}", "--- Recent Activity ---".dimmed());
        for activity in &snapshot.recent_activity {
            println!(
                "  {}  {}  {}",
                activity.user.cyan(),
                activity.description(),
                activity.time.dimmed()
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_documents_upload() {
        let cli = Cli::try_parse_from([
            "documind",
            "--email",
            "a@b.com",
            "documents",
            "upload",
            "notes.txt",
            "--mime",
            "text/plain",
        ])
        .unwrap();
        assert_eq!(cli.email.as_deref(), Some("a@b.com"));
        match cli.command {
            Command::Documents {
                action: DocumentsCommand::Upload { path, mime },
            } => {
                assert_eq!(path, PathBuf::from("notes.txt"));
                assert_eq!(mime.as_deref(), Some("text/plain"));
            }
            _ => panic!("expected documents upload"),
        }
    }

    #[test]
    fn test_flags_override_config_credentials() {
        let mut config = DocumindConfig::default();
        config.auth.email = Some("stored@b.com".to_string());
        config.auth.password = Some("stored".to_string());

        let creds = resolve_credentials(Some("flag@b.com".to_string()), None, &config).unwrap();
        assert_eq!(creds.email, "flag@b.com");
        assert_eq!(creds.password, "stored");
    }

    #[test]
    fn test_missing_credentials() {
        let config = DocumindConfig::default();
        let err = resolve_credentials(Some("a@b.com".to_string()), None, &config).unwrap_err();
        assert!(err.to_string().contains("credentials required"));
    }
}
