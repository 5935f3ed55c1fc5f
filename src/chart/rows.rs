use std::path::Path;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::error::LoadError;
use super::hierarchy::ChartVariant;

/// Variant-neutral row: three hierarchy keys and one relevance score per level.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FlatRow {
    pub levels: [Option<String>; 3],
    pub relevance: [Option<f64>; 3],
    pub coverage: Option<f64>,
    pub volume: Option<f64>,
}

#[derive(Clone, Debug, Deserialize)]
pub(super) struct StrategyRow {
    #[serde(default, deserialize_with = "lenient_key")]
    channel: Option<String>,
    #[serde(default, deserialize_with = "lenient_key")]
    campaign: Option<String>,
    #[serde(default, deserialize_with = "lenient_key")]
    cluster: Option<String>,
    #[serde(default, alias = "channelRelevance", deserialize_with = "lenient_number")]
    channel_relevance: Option<f64>,
    #[serde(default, alias = "campaignRelevance", deserialize_with = "lenient_number")]
    campaign_relevance: Option<f64>,
    #[serde(default, alias = "clusterRelevance", deserialize_with = "lenient_number")]
    cluster_relevance: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    coverage: Option<f64>,
    #[serde(default, alias = "searchVolume", alias = "search_volume", deserialize_with = "lenient_number")]
    volume: Option<f64>,
}

#[derive(Clone, Debug, Deserialize)]
pub(super) struct SocialRow {
    #[serde(default, deserialize_with = "lenient_key")]
    topic: Option<String>,
    #[serde(default, deserialize_with = "lenient_key")]
    cluster: Option<String>,
    #[serde(default, deserialize_with = "lenient_key")]
    keyword: Option<String>,
    #[serde(default, alias = "topicRelevance", deserialize_with = "lenient_number")]
    topic_relevance: Option<f64>,
    #[serde(default, alias = "clusterRelevance", deserialize_with = "lenient_number")]
    cluster_relevance: Option<f64>,
    #[serde(default, alias = "keywordRelevance", deserialize_with = "lenient_number")]
    keyword_relevance: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    coverage: Option<f64>,
    #[serde(default, alias = "searchVolume", alias = "search_volume", deserialize_with = "lenient_number")]
    volume: Option<f64>,
}

impl From<StrategyRow> for FlatRow {
    fn from(row: StrategyRow) -> Self {
        Self {
            levels: [row.channel, row.campaign, row.cluster],
            relevance: [
                row.channel_relevance,
                row.campaign_relevance,
                row.cluster_relevance,
            ],
            coverage: row.coverage,
            volume: row.volume,
        }
    }
}

impl From<SocialRow> for FlatRow {
    fn from(row: SocialRow) -> Self {
        Self {
            levels: [row.topic, row.cluster, row.keyword],
            relevance: [
                row.topic_relevance,
                row.cluster_relevance,
                row.keyword_relevance,
            ],
            coverage: row.coverage,
            volume: row.volume,
        }
    }
}

fn lenient_key<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|value| match value {
        Value::String(text) => {
            let trimmed = text.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_owned())
        }
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }))
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(coerce_number))
}

/// `null` stays undefined; anything else becomes a finite number, 0 when unusable.
pub fn coerce_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Null => return None,
        Value::Bool(flag) => f64::from(u8::from(*flag)),
        Value::Number(number) => number.as_f64().unwrap_or(0.0),
        Value::String(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                0.0
            } else {
                trimmed.parse::<f64>().unwrap_or(0.0)
            }
        }
        Value::Array(_) | Value::Object(_) => 0.0,
    };

    Some(if number.is_finite() { number } else { 0.0 })
}

pub fn parse_rows(raw: &str, variant: ChartVariant) -> Result<Vec<FlatRow>, LoadError> {
    let parsed: Value = serde_json::from_str(raw)?;
    let entries = match parsed {
        Value::Array(entries) => entries,
        Value::Object(mut object) => match object.remove("rows") {
            Some(Value::Array(entries)) => entries,
            _ => return Err(LoadError::UnexpectedShape),
        },
        _ => return Err(LoadError::UnexpectedShape),
    };

    // Rows that are not objects lower to an empty row, which aggregation drops.
    let rows = entries
        .into_iter()
        .map(|entry| match variant {
            ChartVariant::Strategy => StrategyRow::deserialize(entry)
                .map(FlatRow::from)
                .unwrap_or_default(),
            ChartVariant::Social => SocialRow::deserialize(entry)
                .map(FlatRow::from)
                .unwrap_or_default(),
        })
        .collect();

    Ok(rows)
}

pub fn load_rows(path: &Path, variant: ChartVariant) -> Result<Vec<FlatRow>, LoadError> {
    let raw = std::fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_rows(&raw, variant)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    #[rstest]
    #[case(json!(null), None)]
    #[case(json!(0.4), Some(0.4))]
    #[case(json!(85), Some(85.0))]
    #[case(json!(" 0.25 "), Some(0.25))]
    #[case(json!("n/a"), Some(0.0))]
    #[case(json!(""), Some(0.0))]
    #[case(json!(true), Some(1.0))]
    #[case(json!([1, 2]), Some(0.0))]
    fn coerces_numbers_leniently(#[case] value: Value, #[case] expected: Option<f64>) {
        assert_eq!(coerce_number(&value), expected);
    }

    #[test]
    fn parses_strategy_rows_from_top_level_array() {
        let raw = r#"[
            {"channel": "Email", "campaign": "Welcome", "channel_relevance": 0.9, "campaign_relevance": 0.4},
            {"channel": "Email", "campaign": "Promo", "campaignRelevance": "0.1", "cluster": "  "}
        ]"#;

        let rows = parse_rows(raw, ChartVariant::Strategy).expect("rows parse");

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].levels[0].as_deref(), Some("Email"));
        assert_eq!(rows[0].relevance, [Some(0.9), Some(0.4), None]);
        assert_eq!(rows[1].relevance[1], Some(0.1));
        assert_eq!(rows[1].levels[2], None);
    }

    #[test]
    fn parses_social_rows_from_wrapped_object() {
        let raw = r#"{"rows": [
            {"topic": "Running", "cluster": "Shoes", "keyword": "trail shoes", "keyword_relevance": 72, "search_volume": 1200}
        ]}"#;

        let rows = parse_rows(raw, ChartVariant::Social).expect("rows parse");

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].levels[2].as_deref(), Some("trail shoes"));
        assert_eq!(rows[0].relevance[2], Some(72.0));
        assert_eq!(rows[0].volume, Some(1200.0));
    }

    #[test]
    fn non_object_entries_become_empty_rows() {
        let rows = parse_rows(r#"[42, "oops"]"#, ChartVariant::Strategy).expect("rows parse");
        assert_eq!(rows, vec![FlatRow::default(), FlatRow::default()]);
    }

    #[rstest]
    #[case("{\"data\": []}")]
    #[case("17")]
    fn rejects_unexpected_shapes(#[case] raw: &str) {
        let error = parse_rows(raw, ChartVariant::Strategy).expect_err("shape rejected");
        assert!(matches!(error, LoadError::UnexpectedShape));
    }

    #[test]
    fn load_rows_reports_missing_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("missing.json");

        let error = load_rows(&path, ChartVariant::Strategy).expect_err("missing file");
        assert!(matches!(error, LoadError::Read { .. }));
    }

    #[test]
    fn load_rows_reads_file_contents() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("rows.json");
        std::fs::write(&path, r#"[{"channel": "Social", "campaign": "Launch"}]"#)
            .expect("write rows");

        let rows = load_rows(&path, ChartVariant::Strategy).expect("rows load");
        assert_eq!(rows[0].levels[1].as_deref(), Some("Launch"));
    }
}
