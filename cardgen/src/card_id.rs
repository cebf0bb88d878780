use std::collections::HashMap;
use std::path::Path;

use serde_json::{Map, Value};

use crate::error::RenderError;
use crate::record::CardRecord;

const COLLECTION_ABBR: &[(&str, &str)] = &[
    ("srp_bitterroot", "SRP-BR"),
    ("srp_players", "SRP-PL"),
];

const TYPE_ABBR: &[(&str, &str)] = &[
    ("artifact", "A"),
    ("creature", "C"),
    ("land", "L"),
    ("spell", "S"),
];

const SUBTYPE_ABBR: &[(&str, &str)] = &[
    ("aura", "A"),
    ("admin", "ADM"),
    ("communityrep", "CR"),
    ("dual", "D"),
    ("developer", "DEV"),
    ("elite", "E"),
    ("equipment", "EQ"),
    ("founder", "FN"),
    ("global", "G"),
    ("mutant", "MT"),
    ("myth", "MY"),
    ("omni", "O"),
    ("relic", "RL"),
    ("ritual", "RT"),
    ("specialist", "SP"),
    ("unit", "U"),
    ("utility", "UT"),
    ("veteran", "VET"),
    ("wildcard", "WLD"),
];

fn lookup<'a>(table: &'a [(&'a str, &'a str)], key: &str) -> Option<&'a str> {
    table.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

fn set_key(set: &str) -> String {
    set.trim()
        .to_lowercase()
        .replace(' ', "_")
        .replace(':', "")
}

fn word_key(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_lowercase()
}

/// Assign positional card IDs in table order. Cards are numbered
/// 1-based within their (type, subtype) bucket, so reordering rows of
/// the same kind renumbers them.
pub fn assign_card_ids(rows: &mut [Map<String, Value>]) {
    let mut counters: HashMap<(String, String), u32> = HashMap::new();
    for (i, row) in rows.iter_mut().enumerate() {
        let record = CardRecord::new(row.clone(), i);

        let collection = lookup(COLLECTION_ABBR, &set_key(&record.set_edition()))
            .map(str::to_string)
            .unwrap_or_else(|| set_key(&record.set_edition()).to_uppercase());
        let type_abbr = lookup(TYPE_ABBR, &word_key(&record.card_type())).unwrap_or("XXX");
        let subtype_abbr = lookup(SUBTYPE_ABBR, &word_key(&record.subtype())).unwrap_or("XXX");

        let n = counters
            .entry((type_abbr.to_string(), subtype_abbr.to_string()))
            .or_insert(0);
        *n += 1;

        let id = format!("{}-{:03}-{}-{}", collection, n, type_abbr, subtype_abbr);
        row.insert("Card ID".to_string(), Value::String(id));
    }
}

/// Write the rows back out as pretty-printed JSON.
pub fn write_records(path: &Path, rows: &[Map<String, Value>]) -> Result<(), RenderError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let data = serde_json::to_string_pretty(rows).map_err(|e| RenderError::InvalidInputSource {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    std::fs::write(path, data)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(set: &str, ty: &str, subtype: &str) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("Set/Edition".to_string(), json!(set));
        map.insert("Type".to_string(), json!(ty));
        map.insert("Subtype".to_string(), json!(subtype));
        map
    }

    #[test]
    fn counters_run_per_type_subtype_bucket() {
        let mut rows = vec![
            row("SRP Bitterroot", "Creature", "Unit"),
            row("SRP Bitterroot", "Creature", "Unit"),
            row("SRP Bitterroot", "Creature", "Mutant"),
            row("SRP Bitterroot", "Spell", "Ritual"),
        ];
        assign_card_ids(&mut rows);
        let ids: Vec<&str> = rows.iter().map(|r| r["Card ID"].as_str().unwrap()).collect();
        assert_eq!(
            ids,
            vec![
                "SRP-BR-001-C-U",
                "SRP-BR-002-C-U",
                "SRP-BR-001-C-MT",
                "SRP-BR-001-S-RT",
            ]
        );
    }

    #[test]
    fn unknown_kinds_get_placeholder_abbreviations() {
        let mut rows = vec![row("Homebrew: Chaos", "Enchantment", "Weird")];
        assign_card_ids(&mut rows);
        assert_eq!(rows[0]["Card ID"], json!("HOMEBREW_CHAOS-001-XXX-XXX"));
    }

    #[test]
    fn multiword_subtypes_collapse_before_lookup() {
        let mut rows = vec![row("SRP Players", "Creature", "Community Rep")];
        assign_card_ids(&mut rows);
        assert_eq!(rows[0]["Card ID"], json!("SRP-PL-001-C-CR"));
    }

    #[test]
    fn existing_ids_are_regenerated() {
        let mut rows = vec![row("SRP Players", "Land", "Global")];
        rows[0].insert("Card ID".to_string(), json!("STALE"));
        assign_card_ids(&mut rows);
        assert_eq!(rows[0]["Card ID"], json!("SRP-PL-001-L-G"));
    }

    #[test]
    fn write_records_round_trips() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("out").join("cards.json");
        let mut rows = vec![row("SRP Players", "Creature", "Unit")];
        assign_card_ids(&mut rows);
        write_records(&path, &rows).unwrap();
        let data = std::fs::read_to_string(&path).unwrap();
        let parsed: Vec<Map<String, Value>> = serde_json::from_str(&data).unwrap();
        assert_eq!(parsed, rows);
    }
}
