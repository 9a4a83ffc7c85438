use serde::Serialize;
use serde_json::{Map, Value};
use std::io;

use crate::error::{AppError, Result};

/// One exported record: field name to value, in field order.
pub type Row = Map<String, Value>;

/// Pretty-printed JSON array, the format of the "Export JSON" button.
pub fn export_json<T: Serialize>(records: &[T]) -> Result<String> {
    Ok(serde_json::to_string_pretty(records)?)
}

/// One compact JSON object per line.
pub fn export_json_lines<T: Serialize>(records: &[T]) -> Result<String> {
    let mut out = String::new();
    for record in records {
        out.push_str(&serde_json::to_string(record)?);
        out.push('\n');
    }
    Ok(out)
}

/// Serialize records into rows. Records must serialize as JSON objects.
pub fn to_rows<T: Serialize>(records: &[T]) -> Result<Vec<Row>> {
    records
        .iter()
        .map(|record| match serde_json::to_value(record)? {
            Value::Object(row) => Ok(row),
            other => Err(AppError::Validation(format!("Cannot export non-object value {}", other))),
        })
        .collect()
}

/// Keep only `fields`, in that order. Every row must carry every field.
pub fn select_fields(rows: &[Row], fields: &[String]) -> Result<Vec<Row>> {
    rows.iter()
        .map(|row| {
            fields
                .iter()
                .map(|field| match row.get(field) {
                    Some(value) => Ok((field.clone(), value.clone())),
                    None => Err(AppError::Validation(format!("Field '{}' is not available", field))),
                })
                .collect()
        })
        .collect()
}

/// CSV with a header row of `fields`. Arrays are joined with ", ".
pub fn export_csv(rows: &[Row], fields: &[String]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(fields)?;
    for row in rows {
        writer.write_record(fields.iter().map(|field| row.get(field).map(csv_cell).unwrap_or_default()))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::Csv(e.into_error().into()))?;
    String::from_utf8(bytes).map_err(|e| AppError::Csv(io::Error::new(io::ErrorKind::InvalidData, e).into()))
}

fn csv_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(csv_cell).collect::<Vec<_>>().join(", "),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::mock_data::generate_orders;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_export_json_is_array() {
        let orders = generate_orders(&mut StdRng::seed_from_u64(5), 3);
        let json = export_json(&orders).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.as_array().map(|a| a.len()), Some(3));
        assert_eq!(parsed[0]["id"], "ORD-001");
    }

    #[test]
    fn test_export_json_lines() {
        let orders = generate_orders(&mut StdRng::seed_from_u64(5), 4);
        let lines = export_json_lines(&orders).unwrap();
        assert_eq!(lines.lines().count(), 4);
        for line in lines.lines() {
            let value: serde_json::Value = serde_json::from_str(line).unwrap();
            assert!(value["status"].is_string());
        }
        assert_eq!(export_json_lines::<u8>(&[]).unwrap(), "");
    }

    fn fields(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_rows_keep_struct_field_order() {
        let orders = generate_orders(&mut StdRng::seed_from_u64(5), 1);
        let rows = to_rows(&orders).unwrap();
        let keys: Vec<&str> = rows[0].keys().map(String::as_str).collect();
        assert_eq!(keys.first(), Some(&"id"));
        assert_eq!(keys.last(), Some(&"shipping_address"));
        assert!(to_rows(&[1u8]).is_err());
    }

    #[test]
    fn test_select_fields() {
        let orders = generate_orders(&mut StdRng::seed_from_u64(5), 2);
        let rows = to_rows(&orders).unwrap();
        let selected = select_fields(&rows, &fields(&["status", "id"])).unwrap();
        let keys: Vec<&str> = selected[1].keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["status", "id"]);
        assert_eq!(selected[1]["id"], "ORD-002");

        let err = select_fields(&rows, &fields(&["id", "colour"])).unwrap_err();
        assert!(matches!(err, AppError::Validation(ref msg) if msg.contains("colour")));
    }

    #[test]
    fn test_export_csv_quotes_and_joins() {
        let orders = generate_orders(&mut StdRng::seed_from_u64(5), 3);
        let rows = to_rows(&orders).unwrap();
        let csv = export_csv(&rows, &fields(&["id", "shipping_address", "total_amount"])).unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("id,shipping_address,total_amount"));
        let first = lines.next().unwrap();
        assert!(first.starts_with("ORD-001,\"Uzbekistan, Tashkent, Street 1\","));
        assert_eq!(csv.lines().count(), 4);

        let products = vec![serde_json::json!({ "list": ["a", "b"], "none": null })];
        let rows = to_rows(&products).unwrap();
        assert_eq!(export_csv(&rows, &fields(&["list", "none"])).unwrap(), "list,none\n\"a, b\",\n");
    }
}
