mod card;
mod meta;
mod pips;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use crate::card::DeckFonts;
use crate::meta::CARD_META;

const RANKS: [&str; 13] = [
    "A", "2", "3", "4", "5", "6", "7", "8", "9", "10", "J", "Q", "K",
];

#[derive(Parser)]
#[command(name = "playingcards", about = "Render a standard 54-card deck of playing cards")]
struct Cli {
    /// Directory the deck images are written into
    #[arg(long, default_value = "release/playingcards")]
    output_dir: PathBuf,

    /// Root of the assets tree (fonts, face art)
    #[arg(long, default_value = "assets")]
    assets: PathBuf,

    /// Enable debug logging
    #[arg(long, short)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let fonts = match DeckFonts::load(&cli.assets.join("fonts")) {
        Ok(fonts) => fonts,
        Err(e) => {
            log::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = std::fs::create_dir_all(&cli.output_dir) {
        log::error!("cannot create {}: {}", cli.output_dir.display(), e);
        return ExitCode::FAILURE;
    }

    let mut rendered = 0;
    for suit in &CARD_META {
        if suit.is_joker() {
            let img = card::pad_canvas(&card::make_card("JOKER", suit, &fonts, &cli.assets));
            let path = cli.output_dir.join(format!("{}.png", suit.name));
            match img.save(&path) {
                Ok(()) => {
                    log::debug!("Rendered {}", path.display());
                    rendered += 1;
                }
                Err(e) => log::error!("failed to save {}: {}", path.display(), e),
            }
            continue;
        }
        for rank in RANKS {
            let img = card::pad_canvas(&card::make_card(rank, suit, &fonts, &cli.assets));
            let path = cli
                .output_dir
                .join(format!("{}_{}.png", suit.name, rank.to_lowercase()));
            match img.save(&path) {
                Ok(()) => {
                    log::debug!("Rendered {}", path.display());
                    rendered += 1;
                }
                Err(e) => log::error!("failed to save {}: {}", path.display(), e),
            }
        }
    }

    log::info!("Rendered {} playing cards into {}", rendered, cli.output_dir.display());
    ExitCode::SUCCESS
}
