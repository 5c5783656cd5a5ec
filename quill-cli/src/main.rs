//! Quill CLI - command line client for the Quill blogging platform

use anyhow::Context;
use clap::{Arg, ArgAction, Command};
use quill_api::{HttpPostApi, PostApi};
use quill_core::outline::Outline;
use quill_core::text::{format_saved_time, looks_like_html};
use quill_core::{Config, HtmlRenderer, MarkdownParser};
use quill_editor::{
    now_millis, DraftStore, EditorMode, EditorSession, FileDraftStore, PublishSettings,
    RestoreChoice, RestorePrompt,
};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, Level};

/// Parsed command line invocation
#[derive(Debug, Clone)]
struct Args {
    command: CliCommand,
    config_file: Option<PathBuf>,
    api_url: Option<String>,
    drafts_dir: Option<PathBuf>,
    verbose: bool,
}

/// Supported subcommands
#[derive(Debug, Clone)]
enum CliCommand {
    /// Write a new post
    New,
    /// Edit an existing post
    Edit(i64),
    /// Read a post with its outline
    Read(i64),
    /// Print the outline of a local markdown file
    Toc(PathBuf),
}

impl Args {
    /// Parse command line arguments
    fn parse() -> Self {
        let matches = Command::new("quill")
            .version("0.1.0")
            .about("Client for the Quill blogging platform")
            .long_about(
                "Quill is the command line client of a personal blogging \
                platform. It drives create and edit sessions with local \
                draft autosave and restore, renders posts with navigable \
                heading anchors, and publishes through the remote post API.",
            )
            .arg(
                Arg::new("config")
                    .short('c')
                    .long("config")
                    .help("Path to configuration file (JSON format)")
                    .global(true)
                    .value_parser(clap::value_parser!(PathBuf)),
            )
            .arg(
                Arg::new("api-url")
                    .long("api-url")
                    .help("Base URL of the backend, overriding the config file")
                    .global(true)
                    .value_parser(clap::value_parser!(String)),
            )
            .arg(
                Arg::new("drafts-dir")
                    .long("drafts-dir")
                    .help("Directory for locally stored drafts")
                    .global(true)
                    .value_parser(clap::value_parser!(PathBuf)),
            )
            .arg(
                Arg::new("verbose")
                    .short('v')
                    .long("verbose")
                    .help("Enable debug logging")
                    .global(true)
                    .action(ArgAction::SetTrue),
            )
            .subcommand(Command::new("new").about("Write and publish a new post"))
            .subcommand(
                Command::new("edit")
                    .about("Edit an existing post")
                    .arg(
                        Arg::new("id")
                            .help("Id of the post to edit")
                            .required(true)
                            .value_parser(clap::value_parser!(i64)),
                    ),
            )
            .subcommand(
                Command::new("read")
                    .about("Render a post with its outline")
                    .arg(
                        Arg::new("id")
                            .help("Id of the post to read")
                            .required(true)
                            .value_parser(clap::value_parser!(i64)),
                    ),
            )
            .subcommand(
                Command::new("toc")
                    .about("Print the heading outline of a local markdown file")
                    .arg(
                        Arg::new("file")
                            .help("Markdown file to scan")
                            .required(true)
                            .value_parser(clap::value_parser!(PathBuf)),
                    ),
            )
            .subcommand_required(true)
            .get_matches();

        let command = match matches.subcommand() {
            Some(("new", _)) => CliCommand::New,
            Some(("edit", sub)) => CliCommand::Edit(*sub.get_one::<i64>("id").unwrap()),
            Some(("read", sub)) => CliCommand::Read(*sub.get_one::<i64>("id").unwrap()),
            Some(("toc", sub)) => CliCommand::Toc(sub.get_one::<PathBuf>("file").unwrap().clone()),
            _ => unreachable!("subcommand is required"),
        };

        Self {
            command,
            config_file: matches.get_one::<PathBuf>("config").cloned(),
            api_url: matches.get_one::<String>("api-url").cloned(),
            drafts_dir: matches.get_one::<PathBuf>("drafts-dir").cloned(),
            verbose: matches.get_flag("verbose"),
        }
    }

    /// Load configuration, applying command line overrides
    fn load_config(&self) -> anyhow::Result<Config> {
        let mut config = match &self.config_file {
            Some(path) => Config::from_file(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?,
            None => Config::new(),
        };

        if let Some(url) = &self.api_url {
            config.api.base_url = url.clone();
        }
        if let Some(dir) = &self.drafts_dir {
            config.storage.drafts_dir = dir.clone();
        }

        config.validate().context("Invalid configuration")?;
        Ok(config)
    }
}

/// Restore prompt backed by the terminal
struct StdinRestorePrompt;

impl RestorePrompt for StdinRestorePrompt {
    fn decide(&self, saved_at_ms: i64) -> RestoreChoice {
        print!(
            "Found a local draft (saved {}). Restore it? [y/N] ",
            format_saved_time(saved_at_ms, now_millis())
        );
        let _ = io::stdout().flush();

        let mut answer = String::new();
        if io::stdin().lock().read_line(&mut answer).is_err() {
            return RestoreChoice::Discard;
        }
        match answer.trim().to_lowercase().as_str() {
            "y" | "yes" => RestoreChoice::Restore,
            _ => RestoreChoice::Discard,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = if args.verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(args.verbose)
        .init();

    let config = args.load_config()?;

    match args.command.clone() {
        CliCommand::New => run_editor(EditorMode::Create, &config).await,
        CliCommand::Edit(id) => run_editor(EditorMode::Edit(id), &config).await,
        CliCommand::Read(id) => run_read(id, &config).await,
        CliCommand::Toc(file) => run_toc(&file),
    }
}

/// Drive one interactive editor session
async fn run_editor(mode: EditorMode, config: &Config) -> anyhow::Result<()> {
    let store: Arc<dyn DraftStore> = Arc::new(FileDraftStore::new(config.storage.drafts_dir.clone()));
    let api: Arc<dyn PostApi> =
        Arc::new(HttpPostApi::from_config(&config.api).context("Failed to create API client")?);

    let mut session = EditorSession::new(mode, store, api, config.editor.clone());
    let init = session.initialize(&StdinRestorePrompt).await;

    if let Some(message) = session.load_error() {
        eprintln!("Warning: could not load the post from the server: {}", message);
        eprintln!("Editing continues with local content only.");
    }
    if init.restored_draft {
        println!("Restored local draft.");
    }

    session.start_autosave();
    info!("Editor session started");

    let snapshot = session.snapshot().await;
    let title = prompt_line("Title", &snapshot.title)?;
    session.update_title(title).await;

    let tags_line = prompt_line("Tags (comma separated)", &snapshot.tags.join(", "))?;
    session.update_tags(parse_tags(&tags_line)).await;

    println!("Content (end with a single '.' line, empty input keeps the current text):");
    let entered = read_content_lines()?;
    if !entered.is_empty() {
        session.update_content(entered).await;
    }

    let snapshot = session.snapshot().await;
    if !snapshot.outline.is_empty() {
        println!("\nOutline:");
        print_outline(&snapshot.outline);
    }
    println!("{} characters", snapshot.word_count);

    if confirm("Publish now?")? {
        match session.publish(PublishSettings::default()).await {
            Ok(report) => println!("Published post {}.", report.post_id),
            Err(e) => {
                eprintln!("Publish failed: {}", e);
                session.save_draft().await;
                println!("Your draft was kept locally; fix the problem and retry.");
            }
        }
    } else {
        session.save_draft().await;
        println!("Draft saved.");
    }

    session.close();
    Ok(())
}

/// Fetch a post and print it with outline and heading anchors
async fn run_read(id: i64, config: &Config) -> anyhow::Result<()> {
    let api = HttpPostApi::from_config(&config.api).context("Failed to create API client")?;
    let post = api
        .fetch_post(id)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to load post {}: {}", id, e.user_message()))?;

    println!("# {}\n", post.title);
    if !post.tag_list.is_empty() {
        println!("Tags: {}\n", post.tag_list.join(", "));
    }

    if looks_like_html(&post.content) {
        // Rich markup is shown as-is; only markdown posts get an outline.
        println!("{}", post.content);
        return Ok(());
    }

    let tree = MarkdownParser::new().parse(&post.content);
    let (html, outline) = HtmlRenderer::default().render_with_outline(&tree);

    if !outline.is_empty() {
        println!("Contents:");
        print_outline(&outline);
        println!();
    }
    println!("{}", html);
    Ok(())
}

/// Print the outline of a local markdown file
fn run_toc(file: &PathBuf) -> anyhow::Result<()> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let outline = Outline::scan_markdown(&content);
    if outline.is_empty() {
        println!("No headings found.");
        return Ok(());
    }
    print_outline(&outline);
    Ok(())
}

fn print_outline(outline: &Outline) {
    for entry in &outline.entries {
        let indent = "  ".repeat((entry.level.saturating_sub(1)) as usize);
        println!("{}{} (#{})", indent, entry.text, entry.id);
    }
}

/// Read one line with a default value
fn prompt_line(label: &str, default: &str) -> anyhow::Result<String> {
    if default.is_empty() {
        print!("{}: ", label);
    } else {
        print!("{} [{}]: ", label, default);
    }
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    let line = line.trim();
    if line.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(line.to_string())
    }
}

/// Read content lines until a lone '.' or end of input
fn read_content_lines() -> anyhow::Result<String> {
    let mut lines = Vec::new();
    for line in io::stdin().lock().lines() {
        let line = line?;
        if line.trim() == "." {
            break;
        }
        lines.push(line);
    }
    Ok(lines.join("\n"))
}

/// Yes/no confirmation, defaulting to no
fn confirm(question: &str) -> anyhow::Result<bool> {
    print!("{} [y/N] ", question);
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

/// Split a comma separated tag line, dropping empties
fn parse_tags(line: &str) -> Vec<String> {
    line.split(',')
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}
