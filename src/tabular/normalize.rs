use tracing::{debug, info};

use super::cell::{generated_key, header_key, parse_cell};
use super::types::*;

/// Column plan derived from the schema: source index and output key
struct Column {
    index: usize,
    key: String,
}

/// Convert a raw grid into typed records.
///
/// Blank rows are dropped in every mode. In fixed mode a row that does not
/// reach the highest mapped column is dropped as well. Irregular data never
/// produces an error.
pub fn normalize(grid: &[RawRow], schema: &FieldSchema) -> Vec<NormalizedRecord> {
    if grid.is_empty() {
        debug!("No rows to normalize");
        return Vec::new();
    }

    let (columns, data_rows, min_width) = match schema {
        FieldSchema::Header => {
            let header = &grid[0];
            let columns: Vec<Column> = (0..header.len())
                .map(|index| Column {
                    index,
                    key: header_key(header.get(index), index),
                })
                .collect();
            (columns, &grid[1..], None)
        }
        FieldSchema::Generated => {
            let width = grid.iter().map(Vec::len).max().unwrap_or(0);
            let columns: Vec<Column> = (0..width)
                .map(|index| Column {
                    index,
                    key: generated_key(index),
                })
                .collect();
            (columns, grid, None)
        }
        FieldSchema::Fixed(mapping) => {
            let columns: Vec<Column> = mapping
                .iter()
                .map(|field| Column {
                    index: field.source_index,
                    key: field.key.clone(),
                })
                .collect();
            let min_width = mapping.iter().map(|field| field.source_index + 1).max();
            (columns, grid, min_width)
        }
    };

    debug!(
        "Normalizing {} data rows with fields {:?}",
        data_rows.len(),
        columns.iter().map(|c| c.key.as_str()).collect::<Vec<_>>()
    );

    let records: Vec<NormalizedRecord> = data_rows
        .iter()
        .filter(|row| !is_blank_row(row))
        .filter(|row| min_width.map_or(true, |width| row.len() >= width))
        .map(|row| {
            let mut record = NormalizedRecord::new();
            for column in &columns {
                record.insert(column.key.clone(), parse_cell(row.get(column.index)));
            }
            record
        })
        .collect();

    info!(
        "Normalized {} of {} data rows",
        records.len(),
        data_rows.len()
    );

    records
}

fn is_blank_row(row: &[RawCell]) -> bool {
    row.iter().all(RawCell::is_blank)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn grid(value: serde_json::Value) -> RawGrid {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_empty_grid() {
        assert!(normalize(&[], &FieldSchema::Header).is_empty());
        assert!(normalize(&[], &FieldSchema::fixed([(0, "a")])).is_empty());
    }

    #[test]
    fn test_header_mode_drops_blank_rows() {
        let raw = grid(json!([["Name", "Age"], ["Alice", "30"], ["", ""]]));
        let records = normalize(&raw, &FieldSchema::Header);

        assert_eq!(records.len(), 1);
        assert_eq!(
            serde_json::to_value(&records).unwrap(),
            json!([{ "Name": "Alice", "Age": 30 }])
        );
    }

    #[test]
    fn test_header_mode_blank_headers_and_short_rows() {
        let raw = grid(json!([[" Name ", "", null], ["Bob"], [null, "  ", 7]]));
        let records = normalize(&raw, &FieldSchema::Header);

        assert_eq!(records.len(), 2);
        assert_eq!(
            records[0].keys().collect::<Vec<_>>(),
            vec!["Name", "Column_2", "Column_3"]
        );
        assert_eq!(records[0].get("Name"), Some(&CellValue::Text("Bob".into())));
        assert_eq!(records[0].get("Column_3"), Some(&CellValue::Text(String::new())));
        assert_eq!(records[1].get("Column_3"), Some(&CellValue::Number(7.0)));
    }

    #[test]
    fn test_header_only_grid() {
        let raw = grid(json!([["Name", "Age"]]));
        assert!(normalize(&raw, &FieldSchema::Header).is_empty());
    }

    #[test]
    fn test_fixed_mode_maps_and_renames() {
        let raw = grid(json!([["id1", "2024-01-01", "M", "Boi", "3,5"]]));
        let schema = FieldSchema::fixed([(1, "data"), (4, "peso_arroba")]);
        let records = normalize(&raw, &schema);

        assert_eq!(
            serde_json::to_value(&records).unwrap(),
            json!([{ "data": "2024-01-01", "peso_arroba": 3.5 }])
        );
    }

    #[test]
    fn test_fixed_mode_drops_short_rows() {
        let raw = grid(json!([
            ["id1", "2024-01-01", "M", "Boi", "3,5"],
            ["id2", "2024-01-02", "F"],
            ["", "", "", "", ""],
            ["id3", "2024-01-03", "M", "Vaca", ""]
        ]));
        let schema = FieldSchema::fixed([(1, "data"), (4, "peso_arroba")]);
        let records = normalize(&raw, &schema);

        assert_eq!(records.len(), 2);
        assert_eq!(records[1].get("data"), Some(&CellValue::Text("2024-01-03".into())));
        assert_eq!(records[1].get("peso_arroba"), Some(&CellValue::Text(String::new())));
    }

    #[test]
    fn test_generated_mode_uses_widest_row() {
        let raw = grid(json!([["a"], ["b", "2", "x"]]));
        let records = normalize(&raw, &FieldSchema::Generated);

        assert_eq!(records.len(), 2);
        assert_eq!(
            records[0].keys().collect::<Vec<_>>(),
            vec!["Column_1", "Column_2", "Column_3"]
        );
        assert_eq!(records[1].get("Column_2"), Some(&CellValue::Number(2.0)));
    }

    #[test]
    fn test_all_records_share_keys_and_count_matches_non_blank_rows() {
        let raw = grid(json!([
            ["Animal", "Peso", "Lote"],
            ["Boi", "3,5"],
            [null, null, null],
            ["Vaca", "4", "L2", "extra"],
            [],
            ["", "", "L3"]
        ]));
        let records = normalize(&raw, &FieldSchema::Header);

        assert_eq!(records.len(), 3);
        for record in &records {
            assert_eq!(record.keys().collect::<Vec<_>>(), vec!["Animal", "Peso", "Lote"]);
        }
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let raw = grid(json!([["Name", "Age"], ["Alice", "30"], ["Bob", "4,5"]]));
        let first = normalize(&raw, &FieldSchema::Header);
        let second = normalize(&raw, &FieldSchema::Header);
        assert_eq!(first, second);
    }

    #[test]
    fn test_numeric_zero_is_not_blank() {
        let raw = grid(json!([["Qty"], [0]]));
        let records = normalize(&raw, &FieldSchema::Header);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("Qty"), Some(&CellValue::Number(0.0)));
    }
}
