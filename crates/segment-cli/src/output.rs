//! Output formatting: aligned tables for list commands, 4-space-indented
//! JSON for single-resource displays.

use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::error::SegmentCliError;
use models::Network;

/// Columns shown by `network list`, in display order.
pub const LIST_COLUMNS: [&str; 4] = ["id", "network_type", "physical_network", "segment_id"];

pub fn json_indent4<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    let mut out = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut out, formatter);
    value.serialize(&mut ser)?;
    Ok(String::from_utf8_lossy(&out).into_owned())
}

/// Renders the list table, sorted by `sort_by` (one of [`LIST_COLUMNS`]).
pub fn network_table(networks: &[Network], sort_by: &str) -> Result<String, SegmentCliError> {
    let sort_index = LIST_COLUMNS
        .iter()
        .position(|c| *c == sort_by)
        .ok_or_else(|| SegmentCliError::UnknownSortColumn(sort_by.to_string()))?;

    let mut rows: Vec<Vec<String>> = networks
        .iter()
        .map(|network| {
            LIST_COLUMNS
                .iter()
                .map(|column| network.column(column).unwrap_or_default())
                .collect()
        })
        .collect();
    rows.sort_by(|a, b| a[sort_index].cmp(&b[sort_index]));

    let mut widths: Vec<usize> = LIST_COLUMNS.iter().map(|c| c.len()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.len());
        }
    }

    let mut table = String::new();
    let header: Vec<String> = LIST_COLUMNS
        .iter()
        .zip(&widths)
        .map(|(column, width)| format!("{column:<width$}"))
        .collect();
    table.push_str(header.join("  ").trim_end());
    table.push('\n');

    for row in &rows {
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect();
        table.push_str(line.join("  ").trim_end());
        table.push('\n');
    }

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;

    fn network(id: &str, segment_id: u32) -> Network {
        Network {
            id: id.to_string(),
            network_type: models::NetworkType::Vlan,
            physical_network: Some("physnet1".to_string()),
            segment_id,
            extras: BTreeMap::new(),
        }
    }

    #[test]
    fn list_table_sorts_by_requested_column() {
        let networks = vec![network("b", 200), network("a", 100)];

        let by_id = network_table(&networks, "id").unwrap();
        let lines: Vec<&str> = by_id.lines().collect();
        assert!(lines[1].starts_with("a "));
        assert!(lines[2].starts_with("b "));

        let err = network_table(&networks, "bogus").unwrap_err();
        assert!(matches!(err, SegmentCliError::UnknownSortColumn(_)));
    }

    #[test]
    fn single_resource_json_uses_four_space_indent() {
        let rendered = json_indent4(&serde_json::json!({"id": "n1"})).unwrap();
        assert_eq!(rendered, "{\n    \"id\": \"n1\"\n}");
    }
}
