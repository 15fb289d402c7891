// JSON export

use serde_json::{Map, Value};

/// Export annotated rows as a JSON array of objects keyed by the header row.
///
/// The id column (first) is emitted as a number. Cells past the header width
/// are keyed `column_<n>` (1-based); missing cells are `null`. Repeated header
/// names get a `_<n>` suffix so no cell is dropped.
pub fn write_json(rows: &[Vec<String>]) -> Result<Vec<u8>, String> {
    let Some((header, data)) = rows.split_first() else {
        return serde_json::to_vec_pretty(&Vec::<Value>::new()).map_err(|e| e.to_string());
    };

    let keys = unique_keys(header);

    let objects: Vec<Value> = data
        .iter()
        .map(|row| {
            let width = keys.len().max(row.len());
            let mut obj = Map::with_capacity(width);
            for col in 0..width {
                let key = keys
                    .get(col)
                    .cloned()
                    .unwrap_or_else(|| format!("column_{}", col + 1));
                let value = match row.get(col) {
                    None => Value::Null,
                    Some(cell) if col == 0 => cell
                        .parse::<u64>()
                        .map(Value::from)
                        .unwrap_or_else(|_| Value::String(cell.clone())),
                    Some(cell) => Value::String(cell.clone()),
                };
                obj.insert(key, value);
            }
            Value::Object(obj)
        })
        .collect();

    serde_json::to_vec_pretty(&objects).map_err(|e| e.to_string())
}

fn unique_keys(header: &[String]) -> Vec<String> {
    let mut keys: Vec<String> = Vec::with_capacity(header.len());
    for name in header {
        let mut key = name.clone();
        let mut n = 2;
        while keys.contains(&key) {
            key = format!("{name}_{n}");
            n += 1;
        }
        keys.push(key);
    }
    keys
}
