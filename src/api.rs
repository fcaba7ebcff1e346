use shuttle_axum::axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tower_http::cors::CorsLayer;

use crate::batch::{category_counts, classify_rows, CategoryCount, Row};
use crate::classifier::ClassificationResult;
use crate::explain::{feature_summary, score_details, score_ranking, FeatureSummary, RankedScore, ScoreDetails};
use crate::handle::ClassifierHandle;
use crate::locale::Locale;
use crate::overview::{categories, category_info, rules_summary, CategoryInfo, RulesSummary};

#[derive(Clone)]
pub struct AppState {
    pub classifier: ClassifierHandle,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/classify", post(classify))
        .route("/batch", post(classify_batch))
        .route("/rules", get(rules))
        .route("/rules/{category}", get(rule_detail))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

fn record(result: &ClassificationResult) {
    metrics::counter!(
        "classifications_total",
        "category" => result.predicted_category.clone(),
        "rule" => result.decision.rule()
    )
    .increment(1);
}

#[derive(Deserialize)]
struct ClassifyReq {
    /// Anything but a string counts as a missing title.
    #[serde(default)]
    title: Option<Value>,
    #[serde(default)]
    site: Option<String>,
}

#[derive(Serialize)]
struct ClassifyResp {
    original_title: Option<String>,
    #[serde(flatten)]
    result: ClassificationResult,
    score_ranking: Vec<RankedScore>,
    features_summary: Vec<FeatureSummary>,
    score_details: Option<ScoreDetails>,
}

async fn classify(State(state): State<AppState>, Json(body): Json<ClassifyReq>) -> Json<ClassifyResp> {
    let title = body.title.as_ref().and_then(Value::as_str);
    let locale = Locale::from_site(body.site.as_deref());

    let classifier = state.classifier.snapshot();
    let result = classifier.classify(title, locale);
    record(&result);

    let details = score_details(
        classifier.config(),
        &result.predicted_category,
        &result.scores_all,
        &result.feature_vector(),
    );

    Json(ClassifyResp {
        original_title: title.map(str::to_string),
        score_ranking: score_ranking(&result.scores_all),
        features_summary: feature_summary(&result.features_bool, &result.features_num),
        score_details: details,
        result,
    })
}

#[derive(Serialize)]
struct BatchResp {
    total: usize,
    results: Vec<ClassificationResult>,
    counts: Vec<CategoryCount>,
}

async fn classify_batch(State(state): State<AppState>, Json(rows): Json<Vec<Row>>) -> Json<BatchResp> {
    // One snapshot for the whole batch so a reload can't split it.
    let classifier = state.classifier.snapshot();
    let results = classify_rows(&classifier, &rows, 0, |_, _| {});
    results.iter().for_each(record);

    Json(BatchResp {
        total: results.len(),
        counts: category_counts(&results),
        results,
    })
}

#[derive(Serialize)]
struct RulesResp {
    summary: RulesSummary,
    categories: Vec<String>,
}

async fn rules(State(state): State<AppState>) -> Json<RulesResp> {
    let classifier = state.classifier.snapshot();
    Json(RulesResp {
        summary: rules_summary(classifier.config()),
        categories: categories(classifier.config()),
    })
}

async fn rule_detail(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<Json<CategoryInfo>, (StatusCode, String)> {
    let classifier = state.classifier.snapshot();
    category_info(classifier.config(), &category)
        .map(Json)
        .ok_or_else(|| (StatusCode::NOT_FOUND, format!("unknown category '{category}'")))
}
