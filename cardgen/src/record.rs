use serde_json::{Map, Value};

/// One input row plus its position in the source table.
#[derive(Debug, Clone)]
pub struct CardRecord {
    row: Map<String, Value>,
    index: usize,
}

/// Normalize a raw cell into display text. Nulls and the usual
/// spreadsheet junk values collapse to the empty string.
pub fn sanitize(value: &Value) -> String {
    let text = match value {
        Value::Null => return String::new(),
        Value::String(s) => s.trim().to_string(),
        other => other.to_string(),
    };
    if text.eq_ignore_ascii_case("nan") || text.eq_ignore_ascii_case("none") {
        return String::new();
    }
    text
}

/// Find the first alias that resolves to a non-empty cell. Exact key
/// matches win over case-insensitive ones.
pub fn resolve_field(row: &Map<String, Value>, aliases: &[&str]) -> String {
    for alias in aliases {
        if let Some(value) = row.get(*alias) {
            let text = sanitize(value);
            if !text.is_empty() {
                return text;
            }
        }
    }
    for alias in aliases {
        for (key, value) in row {
            if key.eq_ignore_ascii_case(alias) {
                let text = sanitize(value);
                if !text.is_empty() {
                    return text;
                }
            }
        }
    }
    String::new()
}

/// Extract the first run of digits, ignoring any surrounding text.
pub fn parse_cost_number(text: &str) -> Option<u32> {
    let digits: String = text
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

/// Combat numbers in one of the two layouts the stats plaque draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatLine {
    Triple { hp: i64, atk: i64, def: i64 },
    Pair { power: i64, toughness: i64 },
}

fn parse_stats_triple(text: &str) -> Option<(i64, i64, i64)> {
    let mut values = [0i64; 3];
    let parts: Vec<&str> = text.split('/').collect();
    if parts.len() != 3 {
        return None;
    }
    for (slot, part) in values.iter_mut().zip(parts) {
        let (_, num) = part.split_once(':')?;
        *slot = num.trim().parse().ok()?;
    }
    Some((values[0], values[1], values[2]))
}

impl CardRecord {
    pub fn new(row: Map<String, Value>, index: usize) -> Self {
        Self { row, index }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    fn field(&self, aliases: &[&str]) -> String {
        resolve_field(&self.row, aliases)
    }

    pub fn name(&self) -> String {
        self.field(&["Name", "Card Name"])
    }

    pub fn faction(&self) -> String {
        self.field(&["Faction", "House", "Affiliation"])
    }

    pub fn rarity(&self) -> String {
        self.field(&["Rarity"])
    }

    pub fn card_type(&self) -> String {
        self.field(&["Type", "Card Type"])
    }

    pub fn subtype(&self) -> String {
        self.field(&["Subtype", "Sub Type", "Sub-Type"])
    }

    pub fn cost(&self) -> String {
        self.field(&["Resource Cost", "Cost"])
    }

    pub fn abilities(&self) -> String {
        self.field(&["Abilities", "Ability", "Rules Text", "Text"])
    }

    pub fn flavor(&self) -> String {
        self.field(&["Flavor Text", "FlavorText", "Flavor"])
    }

    pub fn set_edition(&self) -> String {
        self.field(&[
            "Set/Edition",
            "Set",
            "Edition",
            "Collection",
            "Collection/Edition",
            "Set Name",
        ])
    }

    pub fn card_id(&self) -> String {
        self.field(&["Card ID", "CardID", "ID", "Card_Id", "Card Number"])
    }

    pub fn artwork_hint(&self) -> String {
        self.field(&["Artwork", "Artwork Ref"])
    }

    /// Pick the stat layout for this row. A well-formed "Stats" cell
    /// (`HP: n / ATK: n / DEF: n`) wins; a malformed one falls back to
    /// placeholder numbers rather than dropping the plaque. Rows with
    /// no "Stats" cell use the Power/Toughness pair.
    pub fn stat_line(&self) -> StatLine {
        let stats = self.field(&["Stats"]);
        if !stats.is_empty() {
            let (hp, atk, def) = parse_stats_triple(&stats).unwrap_or((10, 2, 1));
            return StatLine::Triple { hp, atk, def };
        }
        let power = self.field(&["Power"]).parse().unwrap_or(0);
        let toughness = self.field(&["Toughness"]).parse().unwrap_or(0);
        StatLine::Pair { power, toughness }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(pairs: &[(&str, Value)]) -> Map<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn exact_alias_wins_over_case_insensitive() {
        let row = row(&[("name", json!("lower")), ("Name", json!("Exact"))]);
        assert_eq!(resolve_field(&row, &["Name"]), "Exact");
    }

    #[test]
    fn case_insensitive_fallback() {
        let row = row(&[("NAME", json!("Shouty"))]);
        assert_eq!(resolve_field(&row, &["Name"]), "Shouty");
    }

    #[test]
    fn junk_cells_are_skipped() {
        let row = row(&[
            ("Cost", json!("nan")),
            ("Resource Cost", json!(Value::Null)),
        ]);
        let record = CardRecord::new(row, 0);
        assert_eq!(record.cost(), "");
    }

    #[test]
    fn later_alias_used_when_first_is_empty() {
        let row = row(&[("Flavor Text", json!("  ")), ("FlavorText", json!("Ash."))]);
        let record = CardRecord::new(row, 0);
        assert_eq!(record.flavor(), "Ash.");
    }

    #[test]
    fn numeric_cells_stringify() {
        let row = row(&[("Cost", json!(3))]);
        let record = CardRecord::new(row, 0);
        assert_eq!(record.cost(), "3");
    }

    #[test]
    fn cost_number_ignores_surrounding_text() {
        assert_eq!(parse_cost_number("3 Energy"), Some(3));
        assert_eq!(parse_cost_number("Cost: 12"), Some(12));
        assert_eq!(parse_cost_number("free"), None);
        assert_eq!(parse_cost_number(""), None);
    }

    #[test]
    fn stats_triple_parses() {
        let row = row(&[("Stats", json!("HP: 12 / ATK: 4 / DEF: 3"))]);
        let record = CardRecord::new(row, 0);
        assert_eq!(
            record.stat_line(),
            StatLine::Triple {
                hp: 12,
                atk: 4,
                def: 3
            }
        );
    }

    #[test]
    fn malformed_stats_fall_back_to_placeholders() {
        let row = row(&[("Stats", json!("HP 12 / broken"))]);
        let record = CardRecord::new(row, 0);
        assert_eq!(
            record.stat_line(),
            StatLine::Triple {
                hp: 10,
                atk: 2,
                def: 1
            }
        );
    }

    #[test]
    fn missing_stats_use_power_toughness_pair() {
        let row = row(&[("Power", json!("5")), ("Toughness", json!("2"))]);
        let record = CardRecord::new(row, 0);
        assert_eq!(
            record.stat_line(),
            StatLine::Pair {
                power: 5,
                toughness: 2
            }
        );
    }
}
