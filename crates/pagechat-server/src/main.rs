use anyhow::Result;
use clap::{Parser, Subcommand};
use pagechat_local::relevance::rank_sentences;
use pagechat_local::reply::{compose_reply, matching_rule};
use pagechat_local::scrape::Scraper;
use pagechat_local::store::DocumentStore;
use pagechat_local::LocalFetcher;
use pagechat_server::config::{self, FetchArgs, ServeArgs};
use pagechat_server::AppState;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "pagechat")]
#[command(about = "Scrape a web page and answer questions about it", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP service (/health, /scrape, /chat, /clear).
    Serve(ServeArgs),
    /// Fetch and extract one page, print the document.
    Scrape(ScrapeCmd),
    /// Fetch one page and answer a question about it.
    Ask(AskCmd),
    /// Print version info.
    Version(VersionCmd),
}

#[derive(clap::Args, Debug)]
struct ScrapeCmd {
    url: String,
    /// Output format: json|text
    #[arg(long = "output", alias = "format", default_value = "json")]
    output: String,
    #[command(flatten)]
    fetch: FetchArgs,
}

#[derive(clap::Args, Debug)]
struct AskCmd {
    url: String,
    question: String,
    /// Include the selected reply rule and ranked sentences (json).
    #[arg(long)]
    explain: bool,
    #[command(flatten)]
    fetch: FetchArgs,
}

#[derive(clap::Args, Debug)]
struct VersionCmd {
    /// Output format: json|text
    #[arg(long = "output", alias = "format", default_value = "json")]
    output: String,
}

fn one_shot_scraper(fetch: &FetchArgs) -> Result<Scraper<LocalFetcher>> {
    let fetcher = LocalFetcher::new(&fetch.fetcher_config())?;
    Ok(Scraper::new(fetcher, Arc::new(DocumentStore::new())))
}

#[tokio::main]
async fn main() -> Result<()> {
    config::load_env_file_from_env();
    config::init_tracing();

    let cli = Cli::parse();
    match cli.command {
        Commands::Serve(args) => {
            let addr = args.addr()?;
            let fetcher = LocalFetcher::new(&args.fetch.fetcher_config())?;
            let state = Arc::new(AppState::new(Scraper::new(
                fetcher,
                Arc::new(DocumentStore::new()),
            )));
            pagechat_server::serve(addr, state).await?;
        }
        Commands::Scrape(args) => {
            let scraper = one_shot_scraper(&args.fetch)?;
            let doc = scraper.fetch_document(&args.url).await?;
            match args.output.to_ascii_lowercase().as_str() {
                "text" => {
                    println!("{}", doc.title);
                    println!("{}", doc.url);
                    println!("content_length: {}", doc.content_length);
                    println!();
                    println!("{}", doc.content);
                    if !doc.links.is_empty() {
                        println!();
                        for l in &doc.links {
                            println!("- {}: {}", l.text, l.url);
                        }
                    }
                }
                _ => println!("{}", serde_json::to_string(&doc)?),
            }
        }
        Commands::Ask(args) => {
            let scraper = one_shot_scraper(&args.fetch)?;
            let doc = scraper.fetch_document(&args.url).await?;
            let response = compose_reply(&args.question, &doc);
            if args.explain {
                let v = serde_json::json!({
                    "url": doc.url,
                    "title": doc.title,
                    "rule": matching_rule(&args.question).map(|r| r.name),
                    "ranked": rank_sentences(&args.question, &doc.content),
                    "response": response,
                });
                println!("{}", serde_json::to_string_pretty(&v)?);
            } else {
                println!("{response}");
            }
        }
        Commands::Version(args) => {
            let v = serde_json::json!({
                "schema_version": 1,
                "kind": "version",
                "ok": true,
                "name": "pagechat",
                "version": env!("CARGO_PKG_VERSION"),
            });
            match args.output.to_ascii_lowercase().as_str() {
                "text" => println!("pagechat {}", env!("CARGO_PKG_VERSION")),
                _ => println!("{}", v),
            }
        }
    }
    Ok(())
}
