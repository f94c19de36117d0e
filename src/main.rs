//! Lackey Fetch - Scryfall to LackeyCCG exporter
//!
//! `fetch` formats the sets listed in config.txt into a card data file,
//! `images` downloads one set's images, `formats` regenerates formats.txt.

use clap::{Parser, Subcommand};
use lackey_fetch::formats::generate_formats_file;
use lackey_fetch::images::{ImageOptions, ImageQuality, LACKEY_IMAGE_SIZE};
use lackey_fetch::pipeline::{download_set_images, run_batch, Workspace};
use lackey_fetch::{logging, Config, ScryfallClient};
use std::path::PathBuf;
use std::time::Duration;

/// Fetch MTG sets from Scryfall and format them for LackeyCCG
#[derive(Parser, Debug)]
#[command(name = "lackey_fetch")]
#[command(version, about, long_about = None)]
struct Args {
    /// Plugin directory holding `sets/` and ListOfCardDataFiles.txt
    #[arg(short, long, default_value = ".")]
    root: PathBuf,

    /// Config file (default: config.txt next to the executable)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Also write log lines to this file (`fetch` defaults to fetch.log next to the executable)
    #[arg(long)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Format sets into the card data file (set codes default to config.txt)
    Fetch {
        /// Set codes, overriding `set_codes` from the config
        set_codes: Vec<String>,

        /// Download images even if the config disables it
        #[arg(long, default_value_t = false)]
        images: bool,
    },
    /// Download the card images of one set
    Images {
        set_code: String,

        /// Prefer border_crop > large > normal > small instead of normal only
        #[arg(long, default_value_t = false)]
        best_quality: bool,

        /// Resize images to 312x445 before saving
        #[arg(long, default_value_t = false)]
        resize: bool,

        /// Delay between requests in milliseconds
        #[arg(long, default_value_t = 100)]
        delay_ms: u64,
    },
    /// Generate formats.txt from Scryfall set legalities
    Formats {
        /// Output file (default: formats.txt in the plugin directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() {
    let args = Args::parse();

    let log_file = match (&args.log_file, &args.command) {
        (Some(path), _) => Some(path.clone()),
        (None, Command::Fetch { .. }) => Some(Config::executable_dir().join("fetch.log")),
        (None, _) => None,
    };
    logging::init(log_file.as_deref());

    let code = run(args);
    std::process::exit(code);
}

fn run(args: Args) -> i32 {
    let workspace = Workspace::new(&args.root);

    match args.command {
        Command::Fetch { set_codes, images } => {
            let config_path = args.config.unwrap_or_else(Config::default_path);
            let mut config = Config::load(&config_path);
            if !set_codes.is_empty() {
                config.set_codes = set_codes;
            }
            if images {
                config.download_images = true;
            }

            log::info!("{}", "=".repeat(60));
            log::info!("Magic: The Gathering Card Fetcher - Starting");
            log::info!("{}", "=".repeat(60));

            let client = match ScryfallClient::new() {
                Ok(client) => client.with_page_delay(config.request_delay),
                Err(e) => {
                    log::error!("Failed to create HTTP client: {}", e);
                    return 1;
                }
            };

            match run_batch(&client, &workspace, &config) {
                Ok(summary) if summary.failed == 0 => 0,
                Ok(_) => 1,
                Err(e) => {
                    log::error!("{}", e);
                    1
                }
            }
        }
        Command::Images {
            set_code,
            best_quality,
            resize,
            delay_ms,
        } => {
            let delay = Duration::from_millis(delay_ms);
            let options = ImageOptions {
                quality: if best_quality {
                    ImageQuality::Best
                } else {
                    ImageQuality::Normal
                },
                resize: resize.then_some(LACKEY_IMAGE_SIZE),
                delay,
            };

            let client = match ScryfallClient::new() {
                Ok(client) => client.with_page_delay(delay),
                Err(e) => {
                    log::error!("Failed to create HTTP client: {}", e);
                    return 1;
                }
            };

            match download_set_images(&client, &workspace, &set_code, options) {
                Ok(summary) if summary.failed == 0 => 0,
                Ok(_) => 1,
                Err(e) => {
                    log::error!("Error: {}", e);
                    1
                }
            }
        }
        Command::Formats { output } => {
            let output = output.unwrap_or_else(|| workspace.formats_path());

            log::info!("{}", "=".repeat(60));
            log::info!("Magic: The Gathering Formats Generator - Starting");
            log::info!("{}", "=".repeat(60));

            let client = match ScryfallClient::new() {
                Ok(client) => client,
                Err(e) => {
                    log::error!("Failed to create HTTP client: {}", e);
                    return 1;
                }
            };

            match generate_formats_file(&client, &output) {
                Ok(_) => {
                    log::info!("Formats file generated successfully!");
                    0
                }
                Err(e) => {
                    log::error!("Error writing to {}: {}", output.display(), e);
                    log::error!("Failed to generate formats file");
                    1
                }
            }
        }
    }
}
