use anyhow::Result;
use blogdraft_common::observability::init_logging;
use blogdraft_common::{DraftError, SearchResultItem};
use blogdraft_compose::{ComposeMode, Composition, SimpleFields};
use blogdraft_config::{BlogDraftConfig, BlogDraftConfigLoader, default_config_path};
use blogdraft_web::BlogSearchApi;
use blogdraft_web::search::{LOADING_MESSAGE, found_message};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use store::ReviewStore;
use wiring::{build_from_config, log_config, store_path};

mod store;
mod wiring;

#[derive(Parser)]
#[command(name = "blogdraft")]
#[command(about = "Draft blog review posts from search snippets and your own notes")]
#[command(version)]
struct Cli {
    /// YAML config file (default: the user config dir, if present)
    #[arg(short, long, global = true, env = "BLOGDRAFT_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search blog posts and list the snippets
    Search {
        keyword: String,
        #[arg(long)]
        json: bool,
    },

    /// Compose a draft
    Compose(ComposeArgs),

    /// Saved reviews
    #[command(subcommand)]
    Review(ReviewCommand),

    /// Saved draft note
    #[command(subcommand)]
    Note(NoteCommand),

    /// Effective configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Paragraph,
    Body,
    Simple,
}

#[derive(clap::Args)]
struct ComposeArgs {
    #[arg(short, long)]
    keyword: String,
    #[arg(short, long, value_enum, default_value_t = ModeArg::Paragraph)]
    mode: ModeArg,
    /// Your own review note; the saved note is used when omitted
    #[arg(short, long)]
    note: Option<String>,
    /// Title for simple mode
    #[arg(long)]
    title: Option<String>,
    /// Rating for simple mode
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5), default_value_t = 5)]
    rating: u8,
    /// Link for simple mode
    #[arg(long)]
    url: Option<String>,
    /// Also write the rendered draft to this file
    #[arg(short, long)]
    out: Option<PathBuf>,
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand)]
enum ReviewCommand {
    Add {
        #[arg(long)]
        url: String,
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
        rating: u8,
        #[arg(long)]
        text: String,
    },
    List {
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum NoteCommand {
    Show,
    Clear,
}

#[derive(Subcommand)]
enum ConfigCommand {
    Show,
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(1)
        }
    }
}

async fn run() -> Result<ExitCode> {
    let cli = Cli::parse();

    // 1) Load config (env wins)
    let cfg = load_config(cli.config.as_deref())?;

    // 2) Logging from config
    let log_path = init_logging(log_config(&cfg)?)?;
    tracing::debug!(target: "app", log_path = %log_path.display(), "app.start");

    match cli.command {
        Commands::Search { keyword, json } => cmd_search(&cfg, &keyword, json).await,
        Commands::Compose(args) => cmd_compose(&cfg, args).await,
        Commands::Review(cmd) => cmd_review(&cfg, cmd),
        Commands::Note(cmd) => cmd_note(&cfg, cmd),
        Commands::Config(ConfigCommand::Show) => {
            print!("{}", cfg.to_yaml()?);
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn load_config(explicit: Option<&Path>) -> Result<BlogDraftConfig> {
    let loader = BlogDraftConfigLoader::new();
    let loader = match (explicit, default_config_path()) {
        (Some(path), _) => loader.with_file(path),
        (None, Some(path)) => loader.with_optional_file(path),
        (None, None) => loader,
    };
    Ok(loader.load()?)
}

/// Run a search, reporting status lines on stderr. `Ok(None)` means the
/// user has to fix the input.
async fn search(api: &BlogSearchApi, keyword: &str) -> Result<Option<Vec<SearchResultItem>>> {
    eprintln!("{LOADING_MESSAGE}");
    match api.search(keyword).await {
        Ok(items) => {
            eprintln!("{}", found_message(items.len()));
            Ok(Some(items))
        }
        Err(DraftError::EmptyInput(missing)) => {
            eprintln!("{}", missing.prompt());
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

async fn cmd_search(cfg: &BlogDraftConfig, keyword: &str, json: bool) -> Result<ExitCode> {
    let pipeline = build_from_config(cfg)?;
    let Some(items) = search(&pipeline.search, keyword).await? else {
        return Ok(ExitCode::from(2));
    };
    if json {
        let views: Vec<_> = items.iter().map(SearchResultItem::display).collect();
        println!("{}", serde_json::to_string_pretty(&views)?);
        return Ok(ExitCode::SUCCESS);
    }
    for (i, item) in items.iter().enumerate() {
        let view = item.display();
        println!("{}. {}", i + 1, view.title);
        println!("   {} · {}", view.blogger_name, view.post_date);
        if !view.description.is_empty() {
            println!("   {}", view.description);
        }
        println!("   {}", view.link);
    }
    Ok(ExitCode::SUCCESS)
}

async fn cmd_compose(cfg: &BlogDraftConfig, args: ComposeArgs) -> Result<ExitCode> {
    let store = ReviewStore::open(store_path(cfg));
    let note = match &args.note {
        Some(note) => {
            store.set_note(note)?;
            note.clone()
        }
        None => store.note()?.unwrap_or_default(),
    };

    let mode = match args.mode {
        ModeArg::Paragraph => ComposeMode::Paragraph,
        ModeArg::Body => ComposeMode::BodyDerived,
        ModeArg::Simple => ComposeMode::Simple(SimpleFields {
            title: args.title.clone().unwrap_or_default(),
            rating: args.rating,
            url: args.url.clone().unwrap_or_default(),
        }),
    };

    let pipeline = build_from_config(cfg)?;
    let items = match mode {
        ComposeMode::Simple(_) => Vec::new(),
        _ => match search(&pipeline.search, &args.keyword).await? {
            Some(items) => items,
            None => return Ok(ExitCode::from(2)),
        },
    };

    let composition = pipeline
        .composer
        .compose(&items, &note, &args.keyword, &mode)
        .await;
    print_composition(&composition, args.json)?;

    if !composition.status.is_ready() {
        return Ok(ExitCode::from(2));
    }
    if let Some(out) = &args.out {
        export(out, &composition);
    }
    Ok(ExitCode::SUCCESS)
}

fn print_composition(composition: &Composition, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(composition)?);
    } else if composition.status.is_ready() {
        println!("{}", composition.draft.render());
    }
    eprintln!("{}", composition.status.message());
    Ok(())
}

/// A failed export is reported but does not fail the command.
fn export(path: &Path, composition: &Composition) {
    let rendered = composition.draft.render();
    match std::fs::write(path, format!("{rendered}\n")) {
        Ok(()) => eprintln!("초안을 {}에 저장했습니다.", path.display()),
        Err(e) => {
            let err = DraftError::CopyFailure(e.to_string());
            tracing::warn!(target: "app", path = %path.display(), error = %err, "app.export.failed");
            eprintln!("{err}");
        }
    }
}

fn cmd_review(cfg: &BlogDraftConfig, cmd: ReviewCommand) -> Result<ExitCode> {
    let store = ReviewStore::open(store_path(cfg));
    match cmd {
        ReviewCommand::Add { url, rating, text } => {
            if text.trim().is_empty() {
                eprintln!("{}", blogdraft_common::MissingInput::ReviewText.prompt());
                return Ok(ExitCode::from(2));
            }
            let saved = store.add_review(&url, rating, &text)?;
            eprintln!(
                "후기를 저장했습니다. ({})",
                saved.saved_at.format("%Y-%m-%d %H:%M")
            );
        }
        ReviewCommand::List { json } => {
            let reviews = store.reviews()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&reviews)?);
            } else if reviews.is_empty() {
                eprintln!("저장된 후기가 없습니다.");
            } else {
                for r in &reviews {
                    println!(
                        "[{}] {}/5 {}\n  {}",
                        r.saved_at.format("%Y-%m-%d"),
                        r.rating,
                        r.url,
                        r.text
                    );
                }
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn cmd_note(cfg: &BlogDraftConfig, cmd: NoteCommand) -> Result<ExitCode> {
    let store = ReviewStore::open(store_path(cfg));
    match cmd {
        NoteCommand::Show => match store.note()? {
            Some(note) => println!("{note}"),
            None => eprintln!("저장된 메모가 없습니다."),
        },
        NoteCommand::Clear => {
            store.clear_note()?;
            eprintln!("메모를 지웠습니다.");
        }
    }
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use blogdraft_compose::{ComposeStatus, Draft};
    use clap::CommandFactory;
    use tempfile::TempDir;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn compose_args_parse() {
        let cli = Cli::try_parse_from([
            "blogdraft", "compose", "--keyword", "성수 카페", "--mode", "simple", "--rating", "4",
        ])
        .unwrap();
        let Commands::Compose(args) = cli.command else {
            panic!("expected compose");
        };
        assert_eq!(args.keyword, "성수 카페");
        assert!(matches!(args.mode, ModeArg::Simple));
        assert_eq!(args.rating, 4);
    }

    #[test]
    fn rating_out_of_range_is_rejected() {
        let res = Cli::try_parse_from([
            "blogdraft", "review", "add", "--url", "u", "--rating", "6", "--text", "t",
        ]);
        assert!(res.is_err());
    }

    #[test]
    fn export_writes_rendered_draft() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("draft.txt");
        let composition = Composition {
            status: ComposeStatus::Ready,
            draft: Draft {
                title: "제목".into(),
                body: "본문".into(),
                hashtags: vec!["#태그".into()],
            },
        };
        export(&path, &composition);
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "제목\n\n본문\n\n#태그\n"
        );
    }

    #[test]
    fn export_failure_does_not_panic() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("missing-dir").join("draft.txt");
        export(
            &path,
            &Composition {
                status: ComposeStatus::Ready,
                draft: Draft::default(),
            },
        );
        assert!(!path.exists());
    }

    #[test]
    fn explicit_missing_config_is_an_error() {
        let tmp = TempDir::new().unwrap();
        assert!(load_config(Some(&tmp.path().join("nope.yaml"))).is_err());
    }
}
