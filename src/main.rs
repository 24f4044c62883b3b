//! MTG Print - build printable proxy sheets from decklists.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use mtg_print::{
    collect_card_images, parse_decklist, terminal, BuildOptions, Config, Error, ImageCache,
    PaperSize, Result, ScryfallClient, SetOverrides, SheetGenerator,
};

/// MTG proxy printing tool
#[derive(Parser, Debug)]
#[command(name = "mtg_print")]
#[command(version, about, long_about = None, arg_required_else_help = true)]
struct Cli {
    /// Image cache directory (default: platform cache dir)
    #[arg(long, global = true, env = "MTG_PRINT_CACHE_DIR")]
    cache_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build printable PDF from decklist
    Build {
        /// Path to decklist file
        decklist: PathBuf,

        /// Output PDF path (default: decklist path with .pdf extension)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Override set for card: 'Card Name=SET'
        #[arg(short = 's', long = "set")]
        set_overrides: Vec<String>,

        /// Paper size
        #[arg(long, value_enum, default_value_t = PaperSize::A4)]
        paper: PaperSize,

        /// Also print one copy of every token the deck creates
        #[arg(long, default_value_t = false)]
        tokens: bool,
    },
    /// Search for card printings (oldest first)
    Search {
        /// Card name to search
        card_name: String,

        /// Max results
        #[arg(short = 'n', long, default_value_t = 10)]
        limit: usize,

        /// Show card thumbnails
        #[arg(short, long, default_value_t = false)]
        preview: bool,
    },
    /// Manage image cache
    Cache {
        /// Clear image cache
        #[arg(long, default_value_t = false)]
        clear: bool,

        /// Show cache statistics
        #[arg(long, default_value_t = false)]
        stats: bool,
    },
}

fn main() -> ExitCode {
    // Set RUST_LOG to see what is going on, e.g. RUST_LOG=info or RUST_LOG=mtg_print=debug
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let mut config = Config::default();
    if let Some(dir) = cli.cache_dir {
        config = config.with_cache_dir(dir);
    }

    match run(cli.command, config) {
        Ok(code) => code,
        Err(e @ Error::CardNotFound { .. }) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
        Err(e) => {
            log::error!("Application error: {e:?}");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands, config: Config) -> Result<ExitCode> {
    match command {
        Commands::Build {
            decklist,
            output,
            set_overrides,
            paper,
            tokens,
        } => {
            let config = config.with_paper(paper);
            let options = BuildOptions {
                include_tokens: tokens,
            };
            build(&config, &decklist, output, &set_overrides, options)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Search {
            card_name,
            limit,
            preview,
        } => search(&config, &card_name, limit, preview),
        Commands::Cache { clear, stats } => {
            cache(&config, clear, stats)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn build(
    config: &Config,
    decklist_path: &Path,
    output: Option<PathBuf>,
    set_flags: &[String],
    options: BuildOptions,
) -> Result<()> {
    let overrides = SetOverrides::parse(set_flags);
    let decklist = parse_decklist(decklist_path)?;
    println!(
        "Parsed {} unique cards ({} total)",
        decklist.unique_cards(),
        decklist.total_cards()
    );

    if decklist.is_empty() {
        return Err(Error::EmptySheet);
    }

    let client = ScryfallClient::new(config)?;
    let cache = ImageCache::new(&config.cache_dir);

    let images = collect_card_images(
        &decklist,
        &overrides,
        &client,
        &cache,
        options,
        |done, total, entry| println!("  [{done}/{total}] {}", entry.name),
    )?;

    let output_path = output.unwrap_or_else(|| decklist_path.with_extension("pdf"));
    SheetGenerator::new(config.paper).generate(&images, &output_path)?;
    println!(
        "Generated {} with {} card images",
        output_path.display(),
        images.len()
    );
    Ok(())
}

fn search(config: &Config, card_name: &str, limit: usize, preview: bool) -> Result<ExitCode> {
    let client = ScryfallClient::new(config)?;
    let printings = match client.search_printings(card_name, Some(limit)) {
        Ok(printings) => printings,
        Err(Error::CardNotFound { .. }) => {
            eprintln!("No card found matching '{card_name}'");
            return Ok(ExitCode::FAILURE);
        }
        Err(e) => return Err(e),
    };

    for (i, p) in printings.iter().enumerate() {
        let dfc = if p.is_double_faced { " (DFC)" } else { "" };
        println!(
            "  {}. {} ({}) - {}{}",
            i + 1,
            p.set_code.to_uppercase(),
            p.release_date_display(),
            p.set_name,
            dfc
        );

        if !preview {
            continue;
        }
        if let Some(url) = p.front().and_then(|f| f.image_uri_small.as_deref()) {
            match client.fetch_image(url) {
                Ok(bytes) => {
                    terminal::display_image(&bytes, 15);
                }
                Err(e) => log::warn!("Failed to fetch preview for {}: {}", p.set_code, e),
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn cache(config: &Config, clear: bool, stats: bool) -> Result<()> {
    let image_cache = ImageCache::new(&config.cache_dir);

    if clear {
        let count = image_cache.clear()?;
        println!("Cleared {count} cached images");
    } else if stats {
        let s = image_cache.stats()?;
        println!("Cached images: {}", s.file_count);
        println!("Total size: {:.2} MB", s.total_size_mb());
    } else {
        println!("Use --clear or --stats");
    }
    Ok(())
}
