// src/batch.rs
//! Batch driving: rows of arbitrary JSON columns, one independent
//! classification per row, optional progress reporting.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::classifier::{ClassificationResult, Classifier};
use crate::locale::Locale;

/// Progress is reported every this many rows unless the caller says otherwise.
pub const DEFAULT_PROGRESS_EVERY: usize = 100;

/// Column names checked for the title, in order of preference.
const TITLE_COLUMNS: [&str; 5] = ["SKU标题", "sku_title", "title", "产品标题", "product_title"];
const SITE_COLUMN: &str = "site";

pub type Row = Map<String, Value>;

/// Title and locale of one row. The first title column present in the row
/// decides; a null or non-string value there counts as missing, later
/// columns are not consulted.
pub fn row_input(row: &Row) -> (Option<&str>, Locale) {
    let title = TITLE_COLUMNS
        .iter()
        .find_map(|col| row.get(*col))
        .and_then(Value::as_str);
    let site = row.get(SITE_COLUMN).and_then(Value::as_str);
    (title, Locale::from_site(site))
}

/// Classify every row in order. `progress(done, total)` fires after every
/// `progress_every` rows (0 disables it).
pub fn classify_rows<F>(
    classifier: &Classifier,
    rows: &[Row],
    progress_every: usize,
    mut progress: F,
) -> Vec<ClassificationResult>
where
    F: FnMut(usize, usize),
{
    let total = rows.len();
    rows.iter()
        .enumerate()
        .map(|(idx, row)| {
            let (title, locale) = row_input(row);
            let result = classifier.classify(title, locale);
            if progress_every > 0 && (idx + 1) % progress_every == 0 {
                progress(idx + 1, total);
            }
            result
        })
        .collect()
}

/// One category and how many results landed in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
}

/// Per-category totals, most frequent first; ties keep first-seen order.
pub fn category_counts(results: &[ClassificationResult]) -> Vec<CategoryCount> {
    let mut counts: Vec<CategoryCount> = Vec::new();
    for r in results {
        match counts.iter_mut().find(|c| c.category == r.predicted_category) {
            Some(c) => c.count += 1,
            None => counts.push(CategoryCount {
                category: r.predicted_category.clone(),
                count: 1,
            }),
        }
    }
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

/// Original row columns followed by the result fields.
pub fn merge_row(row: &Row, result: &ClassificationResult) -> Row {
    let mut out = row.clone();
    if let Ok(Value::Object(fields)) = serde_json::to_value(result) {
        out.extend(fields);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClassifierConfig;
    use serde_json::json;

    fn classifier() -> Classifier {
        let cfg = ClassifierConfig::from_json_strs(
            r#"{ "tag_is_panel": { "US": ["panel"] } }"#,
            r#"{
                "平板灯": { "base_score": 10, "weights": { "tag_is_panel": 60 } },
                "灯光类-其他": { "base_score": 0, "weights": {} }
            }"#,
            "{}",
        )
        .unwrap();
        Classifier::new(cfg).unwrap()
    }

    fn row(v: Value) -> Row {
        match v {
            Value::Object(m) => m,
            _ => unreachable!(),
        }
    }

    #[test]
    fn sku_title_is_preferred_over_product_title() {
        let r = row(json!({ "SKU标题": "sku", "产品标题": "product", "site": "jp" }));
        assert_eq!(row_input(&r), (Some("sku"), Locale::Jp));
        let r = row(json!({ "产品标题": "product" }));
        assert_eq!(row_input(&r), (Some("product"), Locale::Us));
        let r = row(json!({ "SKU标题": 42 }));
        assert_eq!(row_input(&r), (None, Locale::Us));
    }

    #[test]
    fn null_sku_title_does_not_fall_back() {
        let r = row(json!({ "SKU标题": null, "产品标题": "Ring Light" }));
        assert_eq!(row_input(&r), (None, Locale::Us));

        let rows = vec![r];
        let results = classify_rows(&classifier(), &rows, 0, |_, _| {});
        assert_eq!(results[0].clean_title, "");
        assert!(results[0].decision_reason.starts_with("Low Score:"));
    }

    #[test]
    fn progress_fires_every_n_rows() {
        let rows: Vec<Row> = (0..7).map(|i| row(json!({ "title": format!("panel {i}") }))).collect();
        let mut seen = Vec::new();
        let results = classify_rows(&classifier(), &rows, 3, |done, total| seen.push((done, total)));
        assert_eq!(results.len(), 7);
        assert_eq!(seen, vec![(3, 7), (6, 7)]);
    }

    #[test]
    fn counts_are_sorted_by_frequency() {
        let rows: Vec<Row> = vec![
            row(json!({ "title": "nothing" })),
            row(json!({ "title": "panel a" })),
            row(json!({ "title": "panel b" })),
        ];
        let results = classify_rows(&classifier(), &rows, 0, |_, _| {});
        let counts = category_counts(&results);
        assert_eq!(counts[0], CategoryCount { category: "平板灯".into(), count: 2 });
        assert_eq!(counts[1], CategoryCount { category: "灯光类-其他".into(), count: 1 });
    }

    #[test]
    fn merged_row_keeps_original_columns() {
        let r = row(json!({ "sku_id": "A-1", "title": "panel" }));
        let result = classifier().classify(Some("panel"), Locale::Us);
        let merged = merge_row(&r, &result);
        assert_eq!(merged["sku_id"], "A-1");
        assert_eq!(merged["predicted_category"], "平板灯");
    }
}
