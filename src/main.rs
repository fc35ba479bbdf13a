use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use futures_util::StreamExt;

use moviestore::config::Config;
use moviestore::logging::init_tracing;
use moviestore::movies::{
    highlight_ranges, MovieItem, MoviesAdapter, MoviesStore, StaticCatalog, DEFAULT_PAGE,
};
use moviestore::ui::search::MovieViewModel;

/// Drive the movie search store against a local JSON catalog.
#[derive(Parser, Debug)]
#[command(name = "moviestore", version, about = "Reactive movie search store demo")]
struct Args {
    /// JSON array of movies (`[{"title": "..."}, ...]`)
    #[arg(long)]
    catalog: PathBuf,

    /// Search to run after the initial load
    #[arg(long)]
    query: Option<String>,

    /// Result page for --query
    #[arg(long, default_value_t = DEFAULT_PAGE)]
    page: u32,

    /// Filter applied to the loaded results
    #[arg(long)]
    filter: Option<String>,

    /// Config file (default: platform config dir)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Keep state in memory only
    #[arg(long)]
    no_persist: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("loading configuration")?;

    let catalog = StaticCatalog::from_json_file(&args.catalog)
        .context("loading catalog")?
        .with_page_size(config.search.page_size);
    let search = Arc::new(catalog);

    let store = if args.no_persist {
        MoviesStore::ephemeral(search, &config)
    } else {
        MoviesStore::new(search, &config)
    };

    let adapter = MoviesAdapter::new(store);
    let mut stream = adapter.vm_stream();
    let printer = tokio::spawn(async move {
        let mut count = 0usize;
        while let Some(vm) = stream.next().await {
            count += 1;
            print_snapshot(count, &vm);
        }
        count
    });

    if let Some(Err(e)) = adapter.initial_load().await {
        eprintln!("initial load failed: {e}");
    }

    if let Some(query) = &args.query {
        adapter
            .store()
            .load_movies(query, args.page)
            .await
            .with_context(|| format!("searching for '{query}'"))?;
    }

    if let Some(filter) = &args.filter {
        adapter.store().update_filter(filter);
    }

    let vm = adapter.store().snapshot();
    println!();
    println!(
        "{} of {} movies for '{}'",
        vm.filtered_movies.len(),
        vm.all_movies.len(),
        vm.search_by
    );
    for movie in &vm.filtered_movies {
        println!("  {}", highlighted(movie, &vm.filter_by));
    }

    drop(adapter);
    let received = printer.await.context("snapshot printer")?;
    tracing::debug!(snapshots = received, "demo finished");
    Ok(())
}

fn print_snapshot(index: usize, vm: &MovieViewModel) {
    println!(
        "#{index} search='{}' filter='{}' movies={} shown={}",
        vm.search_by,
        vm.filter_by,
        vm.all_movies.len(),
        vm.filtered_movies.len()
    );
}

/// Title with filter matches wrapped in brackets, plus the year if known.
fn highlighted(movie: &MovieItem, filter: &str) -> String {
    let ranges = highlight_ranges(movie.display_text(), filter);
    let mut out = String::new();
    let mut current = ranges.iter().peekable();
    for (index, ch) in movie.display_text().chars().enumerate() {
        if current.peek().is_some_and(|(start, _)| *start == index) {
            out.push('[');
        }
        out.push(ch);
        if let Some((_, end)) = current.peek() {
            if *end == index + 1 {
                out.push(']');
                current.next();
            }
        }
    }
    match &movie.year {
        Some(year) => format!("{out} ({year})"),
        None => out,
    }
}
