mod artwork;
mod card_id;
mod compose;
mod error;
mod faction;
mod fonts;
mod output;
mod record;
mod regions;
mod text;
mod texture;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use serde_json::{Map, Value};

use crate::error::RenderError;
use crate::faction::{FactionKey, StyleRegistry};
use crate::record::CardRecord;

#[derive(Parser)]
#[command(name = "cardgen", about = "Render collectible card faces from a JSON card table")]
struct Cli {
    /// JSON file containing an array of card rows
    #[arg(long, default_value = "cards.json")]
    input: PathBuf,

    /// Output directory for rendered set folders
    #[arg(long, default_value = "release")]
    outdir: PathBuf,

    /// Comma-separated row indices to render
    #[arg(long)]
    rows: Option<String>,

    /// Render a random sample of rows (5 when no count is given)
    #[arg(long, num_args = 0..=1, default_missing_value = "5")]
    random: Option<usize>,

    /// Recompute card IDs before rendering
    #[arg(long)]
    assign_ids: bool,

    /// Write the rows, with freshly assigned IDs, back out to this file
    #[arg(long)]
    write_ids: Option<PathBuf>,

    /// Root of the assets tree (fonts, icons, art)
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

    match run(&cli) {
        Ok(rendered) => {
            log::info!("Rendered {} cards into {}", rendered, cli.outdir.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn load_rows(path: &PathBuf) -> Result<Vec<Map<String, Value>>, RenderError> {
    let data = std::fs::read_to_string(path).map_err(|e| RenderError::InvalidInputSource {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    serde_json::from_str(&data).map_err(|e| RenderError::InvalidInputSource {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

fn parse_row_spec(spec: &str, total: usize) -> Vec<usize> {
    let mut picked = Vec::new();
    for part in spec.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        match part.parse::<usize>() {
            Ok(i) if i < total => picked.push(i),
            Ok(i) => log::warn!("row {} out of range (table has {} rows), skipping", i, total),
            Err(_) => log::warn!("invalid row index \"{}\", skipping", part),
        }
    }
    picked
}

fn select_rows(cli: &Cli, total: usize) -> Vec<usize> {
    if let Some(n) = cli.random {
        let n = if n == 0 { 5 } else { n }.min(total);
        let mut picked = rand::seq::index::sample(&mut rand::rng(), total, n).into_vec();
        picked.sort_unstable();
        return picked;
    }
    if let Some(spec) = &cli.rows {
        return parse_row_spec(spec, total);
    }
    (0..total).collect()
}

fn run(cli: &Cli) -> Result<usize, RenderError> {
    let mut rows = load_rows(&cli.input)?;
    log::info!("Loaded {} card rows from {}", rows.len(), cli.input.display());

    if cli.assign_ids || cli.write_ids.is_some() {
        card_id::assign_card_ids(&mut rows);
        log::info!("Assigned card IDs to {} rows", rows.len());
        if let Some(path) = &cli.write_ids {
            card_id::write_records(path, &rows)?;
            log::info!("Wrote updated rows to {}", path.display());
        }
    }

    let registry = StyleRegistry::load(&cli.assets)?;

    let selected = select_rows(cli, rows.len());
    let records: Vec<CardRecord> = selected
        .iter()
        .map(|&i| CardRecord::new(rows[i].clone(), i))
        .collect();

    output::clear_set_folders(&cli.outdir, &records)?;

    let total = records.len();
    let mut rng = rand::rng();
    let mut rendered = 0;
    for (pos, record) in records.iter().enumerate() {
        let key = FactionKey::from_text(&record.faction());
        log::debug!(
            "Row {}: \"{}\" ({}, {})",
            record.index(),
            record.name(),
            key.as_str(),
            record.rarity()
        );
        let card = compose::build_card(record, key, &registry, pos, total, &mut rng);
        let path = output::card_path(&cli.outdir, record);
        match output::save_card(&card, &path) {
            Ok(()) => {
                log::info!("Rendered \"{}\" -> {}", record.name(), path.display());
                rendered += 1;
            }
            Err(e) => log::error!("failed to save \"{}\": {}", record.name(), e),
        }
    }
    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_spec_drops_junk_and_out_of_range() {
        assert_eq!(parse_row_spec("0, 2,5", 4), vec![0, 2]);
        assert_eq!(parse_row_spec("a,,1", 4), vec![1]);
        assert_eq!(parse_row_spec("", 4), Vec::<usize>::new());
    }

    #[test]
    fn random_selection_is_sorted_and_in_bounds() {
        let cli = Cli::parse_from(["cardgen", "--random"]);
        let picked = select_rows(&cli, 20);
        assert_eq!(picked.len(), 5);
        assert!(picked.windows(2).all(|w| w[0] < w[1]));
        assert!(picked.iter().all(|&i| i < 20));
    }

    #[test]
    fn random_sample_never_exceeds_the_table() {
        let cli = Cli::parse_from(["cardgen", "--random", "50"]);
        assert_eq!(select_rows(&cli, 3).len(), 3);
        assert!(select_rows(&cli, 0).is_empty());
    }
}
