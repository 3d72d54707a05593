//! Cassandra Leaves terminal dashboard.
//!
//! Lists, searches, pages through, shows, creates, edits and deletes records
//! of the hosted `cassandra_leaves` collection.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cassandra_leaves::app::{App, StartMode};
use cassandra_leaves::managers::mutation_manager::MutationManagerTrait;
use cassandra_leaves::managers::view_manager::{parse_page_param, ViewState};
use cassandra_leaves::platform;
use cassandra_leaves::services::detail_fetch::DetailOutcome;
use cassandra_leaves::services::sanitizer::{strip_control, strip_tags};
use cassandra_leaves::services::settings_engine::SettingsEngineTrait;
use cassandra_leaves::services::snapshot;
use cassandra_leaves::types::leaf::{join_tags, parse_tags, FieldValue, Leaf, LeafFields};
use cassandra_leaves::types::query::QueryPage;

const LOG_ENV: &str = "CASSANDRA_LEAVES_LOG";

#[derive(Parser)]
#[command(name = "cassandra-leaves")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Browse and edit the Cassandra Leaves bookmark collection")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Settings file to use instead of the platform default
    #[arg(long, global = true, value_name = "path")]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List records, optionally filtered by title
    List {
        /// Case-insensitive title filter
        #[arg(short, long, default_value = "")]
        search: String,
        /// Page to show (1-based)
        #[arg(short, long)]
        page: Option<String>,
        /// Start from a snapshot file instead of fetching
        #[arg(long, value_name = "path")]
        snapshot: Option<PathBuf>,
    },
    /// Show one record in full
    Show { id: u64 },
    /// Create a record
    Add {
        #[command(flatten)]
        fields: FieldArgs,
    },
    /// Edit a record; only the given fields change
    Edit {
        id: u64,
        #[command(flatten)]
        fields: FieldArgs,
    },
    /// Delete a record after confirmation
    Delete {
        id: u64,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Fetch the whole collection into a snapshot file
    Snapshot {
        #[arg(value_name = "path")]
        path: Option<PathBuf>,
    },
    /// Show or toggle the dark-mode preference
    DarkMode {
        #[arg(value_parser = ["toggle"])]
        action: Option<String>,
    },
}

#[derive(Args)]
struct FieldArgs {
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    domain: Option<String>,
    #[arg(long)]
    content: Option<String>,
    #[arg(long)]
    url: Option<String>,
    #[arg(long, value_name = "url")]
    preview_picture: Option<String>,
    /// Comma-separated tags
    #[arg(long)]
    tags: Option<String>,
    #[arg(long)]
    archived: Option<bool>,
    #[arg(long)]
    published_by: Option<String>,
    #[arg(long)]
    user_name: Option<String>,
    #[arg(long)]
    user_email: Option<String>,
    #[arg(long)]
    user_id: Option<i64>,
    #[arg(long)]
    http_status: Option<i64>,
    #[arg(long)]
    mimetype: Option<String>,
    #[arg(long)]
    language: Option<String>,
}

impl FieldArgs {
    /// Overlays the given arguments onto `fields`.
    fn apply_to(self, fields: &mut LeafFields) {
        if let Some(v) = self.title {
            fields.title = v;
        }
        if let Some(v) = self.domain {
            fields.domain_name = v;
        }
        if let Some(v) = self.content {
            fields.content = v;
        }
        if let Some(v) = self.url {
            fields.url = v;
        }
        if let Some(v) = self.preview_picture {
            fields.preview_picture = if v.is_empty() { None } else { Some(v) };
        }
        if let Some(v) = self.tags {
            fields.tags = parse_tags(&v);
        }
        if let Some(v) = self.archived {
            fields.wallabag_is_archived = v;
        }
        if let Some(v) = self.published_by {
            fields.published_by = v;
        }
        if let Some(v) = self.user_name {
            fields.user_name = v;
        }
        if let Some(v) = self.user_email {
            fields.user_email = v;
        }
        if let Some(v) = self.user_id {
            fields.user_id = Some(FieldValue::Number(v));
        }
        if let Some(v) = self.http_status {
            fields.http_status = Some(FieldValue::Number(v));
        }
        if let Some(v) = self.mimetype {
            fields.mimetype = v;
        }
        if let Some(v) = self.language {
            fields.language = v;
        }
    }
}

fn setup_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let mut app = match App::new(cli.config) {
        Ok(app) => app,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let result = match cli.command {
        Command::List {
            search,
            page,
            snapshot,
        } => run_list(&app, &search, page.as_deref(), snapshot).await,
        Command::Show { id } => run_show(&app, id).await,
        Command::Add { fields } => run_add(&app, fields).await,
        Command::Edit { id, fields } => run_edit(&app, id, fields).await,
        Command::Delete { id, yes } => run_delete(&app, id, yes).await,
        Command::Snapshot { path } => run_snapshot(&app, path).await,
        Command::DarkMode { action } => run_dark_mode(&mut app, action.is_some()),
    };

    app.shutdown();
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

type CliResult = Result<(), Box<dyn std::error::Error>>;

async fn run_list(
    app: &App,
    search: &str,
    page: Option<&str>,
    snapshot_path: Option<PathBuf>,
) -> CliResult {
    let seed = match snapshot_path {
        Some(path) => snapshot::load_snapshot(&path)?,
        None => Vec::new(),
    };

    if let StartMode::Fetching(handle) = app.start(seed)? {
        let mut updates = app.store().subscribe();
        let progress = tokio::spawn(async move {
            while updates.changed().await.is_ok() {
                let count = updates.borrow_and_update().len();
                eprint!("\rfetched {} records...", count);
            }
        });
        let outcome = handle.await;
        progress.abort();
        eprintln!();
        match outcome {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => eprintln!("Error fetching data: {}", e),
            Err(e) => eprintln!("Error fetching data: {}", e),
        }
    }

    let mut view = app.view_state(parse_page_param(page));
    if !search.is_empty() {
        let requested = view.page();
        view.set_search(search);
        if page.is_some() {
            view.set_page(requested);
        }
    }

    let leaves = app.store().snapshot();
    let result = view.current_page(&leaves);
    print_page(app, &result);
    Ok(())
}

fn print_page(app: &App, page: &QueryPage) {
    let (heading, reset) = if app.dark_mode() {
        ("\x1b[1;96m", "\x1b[0m")
    } else {
        ("\x1b[1;34m", "\x1b[0m")
    };
    println!("{}Cassandra Leaves Dashboard{}", heading, reset);
    for leaf in &page.items {
        println!(
            "{:>8}  {}  ({})",
            leaf.id,
            strip_tags(&leaf.fields.title),
            strip_control(&leaf.fields.domain_name)
        );
    }
    println!(
        "Page {} of {} ({} matching)",
        page.page_index, page.total_pages, page.total_matches
    );
}

async fn run_show(app: &App, id: u64) -> CliResult {
    match app.load_detail(id).await {
        DetailOutcome::Loaded(leaf) => {
            print_leaf(&leaf);
            Ok(())
        }
        other => Err(other
            .user_message()
            .unwrap_or_else(|| "Failed to load the record.".to_string())
            .into()),
    }
}

fn print_leaf(leaf: &Leaf) {
    let f = &leaf.fields;
    println!("{}", strip_tags(&f.title));
    println!("{}", strip_control(&f.domain_name));
    println!();
    println!("{}", strip_tags(&f.content));
    println!();
    if !f.tags.is_empty() {
        println!("tags:  {}", strip_control(&join_tags(&f.tags)));
    }
    println!("url:   {}", strip_control(&f.url));
    println!("email: {}", strip_control(&f.user_email));
    println!("user:  {}", strip_control(&f.user_name));
    if f.wallabag_is_archived {
        println!("(archived)");
    }
}

async fn run_add(app: &App, args: FieldArgs) -> CliResult {
    let mut view = app.view_state(1);
    view.begin_create();
    args.apply_to(view.form_mut());

    let created = app.mutations().create(view.form().clone()).await?;
    view.finish_edit();
    view.flash(&format!("Record added successfully! (id {})", created.id));
    print_flash(&view);
    Ok(())
}

async fn run_edit(app: &App, id: u64, args: FieldArgs) -> CliResult {
    let current = match app.load_detail(id).await {
        DetailOutcome::Loaded(leaf) => leaf,
        other => {
            return Err(other
                .user_message()
                .unwrap_or_else(|| "Failed to load the record.".to_string())
                .into())
        }
    };
    app.store().replace_all(vec![current.clone()]);

    let mut view = app.view_state(1);
    view.begin_edit(&current);
    args.apply_to(view.form_mut());

    app.mutations().update(id, view.form().clone()).await?;
    view.finish_edit();
    view.flash("Record updated successfully!");
    print_flash(&view);
    Ok(())
}

async fn run_delete(app: &App, id: u64, yes: bool) -> CliResult {
    let mut view = app.view_state(1);
    view.request_delete(id);

    if !yes && !confirm("Are you sure you want to delete this record? [y/N] ")? {
        view.cancel_delete();
        println!("Cancelled.");
        return Ok(());
    }

    if let Some(target) = view.confirm_delete() {
        app.mutations().delete(target).await?;
        view.flash("Record deleted successfully.");
        print_flash(&view);
    }
    Ok(())
}

fn print_flash(view: &ViewState) {
    if let Some(message) = view.flash_message(Instant::now()) {
        println!("{}", message);
    }
}

fn confirm(prompt: &str) -> io::Result<bool> {
    print!("{}", prompt);
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

async fn run_snapshot(app: &App, path: Option<PathBuf>) -> CliResult {
    let path = path.unwrap_or_else(platform::default_snapshot_path);
    let count = snapshot::export_snapshot(app.transport(), &path).await?;
    println!("Wrote {} records to {}", count, path.display());
    Ok(())
}

fn run_dark_mode(app: &mut App, toggle: bool) -> CliResult {
    let enabled = if toggle {
        app.settings_engine.toggle_dark_mode()?
    } else {
        app.dark_mode()
    };
    println!("dark mode: {}", if enabled { "on" } else { "off" });
    Ok(())
}
