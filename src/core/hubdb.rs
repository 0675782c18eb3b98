use crate::domain::ports::CmsClient;
use serde_json::Value;
use std::collections::BTreeMap;

/// Fetches rows for each HubDB table. Tables that fail are logged and left
/// out of the result.
pub async fn fetch_hubdb_tables(cms: &dyn CmsClient, table_ids: &[String]) -> BTreeMap<String, Value> {
    let mut tables = BTreeMap::new();

    for table_id in table_ids {
        match cms.get_hubdb_rows(table_id).await {
            Ok(rows) => {
                tables.insert(table_id.clone(), rows);
            }
            Err(e) => {
                tracing::warn!("⚠️ Error fetching HubDB table {}: {}", table_id, e);
            }
        }
    }

    tables
}

/// Splits `1,2, 3` into trimmed, non-empty, de-duplicated ids.
pub fn parse_table_ids(raw: &str) -> Vec<String> {
    let mut ids: Vec<String> = Vec::new();
    for id in raw.split(',').map(str::trim).filter(|id| !id.is_empty()) {
        if !ids.iter().any(|existing| existing == id) {
            ids.push(id.to_string());
        }
    }
    ids
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_table_ids() {
        assert_eq!(parse_table_ids("1, 2,,3,2 "), vec!["1", "2", "3"]);
        assert!(parse_table_ids("").is_empty());
        assert!(parse_table_ids(" , ").is_empty());
    }
}
