//! Character -> tier reconstruction from a tier-list grid.
//!
//! Column 0 carries tier labels; columns 1+ carry character names either on the
//! label row itself or on the data rows below it. Row 0 is the header.

use std::collections::BTreeMap;

pub type TierMap = BTreeMap<String, String>;

fn trimmed(cell: Option<&Option<String>>) -> Option<&str> {
    cell.and_then(|c| c.as_deref())
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn label_of(row: &[Option<String>]) -> Option<&str> {
    trimmed(row.first())
}

fn has_data(row: &[Option<String>]) -> bool {
    row.iter().skip(1).any(|cell| trimmed(Some(cell)).is_some())
}

fn map_data_row(map: &mut TierMap, row: &[Option<String>], tier: &str) {
    for cell in row.iter().skip(1) {
        if let Some(name) = trimmed(Some(cell)) {
            map.insert(name.to_string(), tier.to_string());
        }
    }
}

/// Main pass: each label row claims its own data, or else the first populated
/// data row before the next label.
pub fn build_tier_map(rows: &[Vec<Option<String>>]) -> TierMap {
    let mut map = TierMap::new();

    for (r, row) in rows.iter().enumerate().skip(1) {
        let Some(tier) = label_of(row) else {
            continue;
        };

        if has_data(row) {
            map_data_row(&mut map, row, tier);
            continue;
        }

        for candidate in &rows[r + 1..] {
            if label_of(candidate).is_some() {
                break;
            }
            if has_data(candidate) {
                map_data_row(&mut map, candidate, tier);
                break;
            }
        }
    }

    map
}

/// Assign every still-unmapped data cell to the nearest label at or above its row.
pub fn backfill_tier_map(rows: &[Vec<Option<String>>], map: &mut TierMap) {
    for (r, row) in rows.iter().enumerate().skip(1) {
        for cell in row.iter().skip(1) {
            let Some(name) = trimmed(Some(cell)) else {
                continue;
            };
            if map.contains_key(name) {
                continue;
            }
            let nearest = rows[1..=r].iter().rev().find_map(|above| label_of(above));
            if let Some(tier) = nearest {
                map.insert(name.to_string(), tier.to_string());
            }
        }
    }
}

pub fn extract_tier_map(rows: &[Vec<Option<String>>]) -> TierMap {
    let mut map = build_tier_map(rows);
    let direct = map.len();
    backfill_tier_map(rows, &mut map);
    tracing::debug!(
        direct,
        backfilled = map.len() - direct,
        "extracted tier map from {} rows",
        rows.len()
    );
    map
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&[Option<&str>]]) -> Vec<Vec<Option<String>>> {
        rows.iter()
            .map(|row| row.iter().map(|c| c.map(str::to_string)).collect())
            .collect()
    }

    #[test]
    fn same_row_data_takes_priority_over_forward_scan() {
        let rows = grid(&[
            &[Some("hdr")],
            &[Some("S"), Some("Amiya"), None],
            &[None, Some("Kal'tsit"), None],
        ]);
        let map = build_tier_map(&rows);
        assert_eq!(map.get("Amiya").map(String::as_str), Some("S"));
        assert!(!map.contains_key("Kal'tsit"), "forward scan must not run");
    }

    #[test]
    fn forward_scan_stops_at_first_populated_data_row() {
        let rows = grid(&[
            &[Some("hdr")],
            &[Some("A"), None],
            &[None, None],
            &[None, Some("Ptilopsis")],
            &[None, Some("Silence")],
        ]);
        let map = build_tier_map(&rows);
        assert_eq!(map.len(), 1);
        assert_eq!(map["Ptilopsis"], "A");
    }

    #[test]
    fn label_without_data_contributes_nothing() {
        let rows = grid(&[
            &[Some("hdr")],
            &[Some("S+"), None],
            &[Some("S"), None],
            &[None, Some("Thorns")],
        ]);
        let map = extract_tier_map(&rows);
        assert_eq!(map.len(), 1);
        assert_eq!(map["Thorns"], "S");
    }

    #[test]
    fn backfill_reaches_consecutive_data_rows() {
        let rows = grid(&[
            &[Some("hdr")],
            &[Some("B"), None, None],
            &[None, Some("Cardigan"), None],
            &[None, Some("Beagle"), Some("Melantha")],
        ]);
        let map = extract_tier_map(&rows);
        assert_eq!(map["Cardigan"], "B");
        assert_eq!(map["Beagle"], "B");
        assert_eq!(map["Melantha"], "B");
    }

    #[test]
    fn cells_with_no_label_above_stay_unmapped() {
        let rows = grid(&[
            &[Some("hdr"), Some("Vanguard")],
            &[None, Some("Fang")],
            &[Some("C"), Some("Yato")],
        ]);
        let map = extract_tier_map(&rows);
        assert!(!map.contains_key("Fang"));
        assert!(!map.contains_key("Vanguard"), "header row is never data");
        assert_eq!(map["Yato"], "C");
    }

    #[test]
    fn names_and_labels_are_trimmed() {
        let rows = grid(&[&[Some("hdr")], &[Some(" A+ "), Some("  Eyjafjalla ")]]);
        let map = extract_tier_map(&rows);
        assert_eq!(map["Eyjafjalla"], "A+");
    }

    #[test]
    fn empty_table_yields_empty_map() {
        assert!(extract_tier_map(&[]).is_empty());
        assert!(extract_tier_map(&grid(&[&[Some("hdr")]])).is_empty());
    }
}
