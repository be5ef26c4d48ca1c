use chrono::{DateTime, SecondsFormat};
use serde_json::{Map, Number, Value};

use crate::types::{TableCell, TableFieldSchema, TableRow, TableSchema};

/// A decoded result row: column name to typed JSON value, in schema order.
pub type Row = Map<String, Value>;

/// All rows of a finished query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryRows {
    /// Decoded rows across every page
    pub rows: Vec<Row>,
    /// Row count reported by the server, when present
    pub total_rows: Option<u64>,
}

/// Decode wire rows against `schema`.
#[must_use]
pub fn decode_rows(schema: &TableSchema, rows: &[TableRow]) -> Vec<Row> {
    rows.iter()
        .map(|row| decode_cells(&schema.fields, &row.f))
        .collect()
}

fn decode_cells(fields: &[TableFieldSchema], cells: &[TableCell]) -> Row {
    fields
        .iter()
        .zip(cells)
        .map(|(field, cell)| (field.name.clone(), decode_field(field, &cell.v)))
        .collect()
}

fn decode_field(field: &TableFieldSchema, v: &Value) -> Value {
    if !field.is_repeated() {
        return decode_single(field, v);
    }
    match v {
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| decode_single(field, item.get("v").unwrap_or(&Value::Null)))
                .collect(),
        ),
        Value::Null => Value::Array(vec![]),
        other => decode_single(field, other),
    }
}

fn decode_single(field: &TableFieldSchema, v: &Value) -> Value {
    if v.is_null() {
        return Value::Null;
    }

    match field.field_type.to_ascii_uppercase().as_str() {
        "RECORD" | "STRUCT" => decode_record(field, v),
        "INTEGER" | "INT64" => match v.as_str().map(str::parse::<i64>) {
            Some(Ok(n)) => Value::from(n),
            _ => v.clone(),
        },
        "FLOAT" | "FLOAT64" => v
            .as_str()
            .and_then(|s| s.parse::<f64>().ok())
            .and_then(Number::from_f64)
            .map_or_else(|| v.clone(), Value::Number),
        "BOOLEAN" | "BOOL" => match v.as_str() {
            Some(s) if s.eq_ignore_ascii_case("true") => Value::Bool(true),
            Some(s) if s.eq_ignore_ascii_case("false") => Value::Bool(false),
            _ => v.clone(),
        },
        "TIMESTAMP" => v
            .as_str()
            .and_then(timestamp_to_rfc3339)
            .map_or_else(|| v.clone(), Value::String),
        "JSON" => v
            .as_str()
            .and_then(|s| serde_json::from_str(s).ok())
            .unwrap_or_else(|| v.clone()),
        // NUMERIC, DATE, STRING, BYTES, GEOGRAPHY etc. stay as the server's string
        _ => v.clone(),
    }
}

fn decode_record(field: &TableFieldSchema, v: &Value) -> Value {
    let Some(cells) = v.get("f").and_then(Value::as_array) else {
        return v.clone();
    };
    let cells: Vec<TableCell> = cells
        .iter()
        .map(|c| TableCell {
            v: c.get("v").cloned().unwrap_or(Value::Null),
        })
        .collect();
    Value::Object(decode_cells(&field.fields, &cells))
}

/// TIMESTAMP cells are epoch seconds as a float string, e.g. `"1.7044032E9"`.
fn timestamp_to_rfc3339(raw: &str) -> Option<String> {
    let secs_f = raw.parse::<f64>().ok()?;
    if !secs_f.is_finite() {
        return None;
    }
    let whole = secs_f.floor();
    let micros = ((secs_f - whole) * 1_000_000.0).round() as u32;
    let dt = DateTime::from_timestamp(whole as i64, micros.min(999_999) * 1_000)?;
    Some(dt.to_rfc3339_opts(SecondsFormat::AutoSi, true))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema(v: Value) -> TableSchema {
        serde_json::from_value(v).unwrap()
    }

    fn rows(v: Value) -> Vec<TableRow> {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn scalars_are_typed_by_schema() {
        let s = schema(json!({"fields": [
            {"name": "name", "type": "STRING"},
            {"name": "n", "type": "INTEGER"},
            {"name": "ratio", "type": "FLOAT"},
            {"name": "ok", "type": "BOOLEAN"},
            {"name": "day", "type": "DATE"},
            {"name": "missing", "type": "INT64"}
        ]}));
        let r = rows(json!([
            {"f": [{"v": "alpha"}, {"v": "42"}, {"v": "0.5"}, {"v": "true"}, {"v": "2024-01-02"}, {"v": null}]}
        ]));

        let out = decode_rows(&s, &r);
        assert_eq!(
            Value::Object(out[0].clone()),
            json!({"name": "alpha", "n": 42, "ratio": 0.5, "ok": true, "day": "2024-01-02", "missing": null})
        );
    }

    #[test]
    fn keys_follow_schema_order() {
        let s = schema(json!({"fields": [
            {"name": "zeta", "type": "STRING"},
            {"name": "alpha", "type": "STRING"}
        ]}));
        let r = rows(json!([{"f": [{"v": "z"}, {"v": "a"}]}]));
        let keys: Vec<_> = decode_rows(&s, &r)[0].keys().cloned().collect();
        assert_eq!(keys, vec!["zeta", "alpha"]);
    }

    #[test]
    fn records_and_repeated_fields_nest() {
        let s = schema(json!({"fields": [
            {"name": "tags", "type": "STRING", "mode": "REPEATED"},
            {"name": "owner", "type": "RECORD", "fields": [
                {"name": "id", "type": "INTEGER"},
                {"name": "email", "type": "STRING"}
            ]},
            {"name": "scores", "type": "FLOAT64", "mode": "REPEATED"}
        ]}));
        let r = rows(json!([{"f": [
            {"v": [{"v": "a"}, {"v": "b"}]},
            {"v": {"f": [{"v": "7"}, {"v": "x@example.com"}]}},
            {"v": null}
        ]}]));

        let out = decode_rows(&s, &r);
        assert_eq!(
            Value::Object(out[0].clone()),
            json!({"tags": ["a", "b"], "owner": {"id": 7, "email": "x@example.com"}, "scores": []})
        );
    }

    #[test]
    fn timestamps_render_as_rfc3339() {
        assert_eq!(
            timestamp_to_rfc3339("1.7044032E9").as_deref(),
            Some("2024-01-04T21:20:00Z")
        );
        assert_eq!(
            timestamp_to_rfc3339("1704403200.5").as_deref(),
            Some("2024-01-04T21:20:00.500Z")
        );
        assert!(timestamp_to_rfc3339("not-a-number").is_none());
    }

    #[test]
    fn unparseable_integer_is_kept_verbatim() {
        let s = schema(json!({"fields": [{"name": "n", "type": "INTEGER"}]}));
        let r = rows(json!([{"f": [{"v": "99999999999999999999"}]}]));
        assert_eq!(decode_rows(&s, &r)[0]["n"], json!("99999999999999999999"));
    }
}
