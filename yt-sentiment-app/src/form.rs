use {
    std::sync::Arc,
    axum::{
        Form,
        Json,
        Router,
        extract::{State, rejection::JsonRejection},
        http::StatusCode,
        response::{Html, IntoResponse, Response},
        routing::{get, post},
    },
    minijinja::{context, Environment},
    serde::{Serialize, Deserialize},
    tracing::warn,
    yt_sentiment_core::{
        aggregator::{AnalysisResult, ChartData, TABLE_HEADERS},
        analysis::Analyzer,
        config::{clamp_comment_limit, MAX_COMMENT_LIMIT, MIN_COMMENT_LIMIT},
    },
};

const PAGE_TITLE: &str = "YouTube Comment Sentiment Analyzer";
const INDEX_TEMPLATE: &str = include_str!("../templates/index.html");

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    analyzer: Analyzer,
    pages: Environment<'static>,
    default_limit: usize,
}

#[derive(Deserialize, Debug, Default)]
pub struct AnalyzeForm {
    #[serde(default)]
    url: String,
    #[serde(default)]
    limit: String,
}

#[derive(Deserialize, Debug)]
pub struct AnalyzeRequest {
    url: String,
    limit: Option<usize>,
}

#[derive(Serialize)]
struct ChartView<'a> {
    title: &'a str,
    y_label: &'a str,
    bars: Vec<BarView<'a>>,
}

#[derive(Serialize)]
struct BarView<'a> {
    label: &'a str,
    count: usize,
    percent: usize,
}

impl AppState {
    pub fn new(analyzer: Analyzer, default_limit: usize) -> anyhow::Result<Self> {
        let mut pages = Environment::new();
        pages.add_template("index.html", INDEX_TEMPLATE)?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                analyzer,
                pages,
                default_limit: clamp_comment_limit(default_limit),
            }),
        })
    }

    fn limit_or_default(&self, limit: Option<usize>) -> usize {
        limit.map(clamp_comment_limit).unwrap_or(self.inner.default_limit)
    }

    fn render(&self, url: &str, limit: usize, result: &AnalysisResult) -> Response {
        let page = self.inner.pages.get_template("index.html").and_then(|template| template.render(context! {
            title => PAGE_TITLE,
            url => url,
            limit => limit,
            min_limit => MIN_COMMENT_LIMIT,
            max_limit => MAX_COMMENT_LIMIT,
            summary => &result.summary,
            headers => TABLE_HEADERS,
            rows => &result.comments,
            chart => chart_view(&result.chart),
        }));

        match page {
            Ok(page) => Html(page).into_response(),
            Err(err) => {
                warn!("failed to render page: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "failed to render page").into_response()
            }
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/analyze", post(analyze))
        .route("/clear", post(clear))
        .route("/api/analyze", post(analyze_json))
        .with_state(state)
}

async fn index(State(state): State<AppState>) -> Response {
    let limit = state.limit_or_default(None);
    state.render("", limit, &AnalysisResult::empty())
}

async fn analyze(State(state): State<AppState>, Form(form): Form<AnalyzeForm>) -> Response {
    let limit = state.limit_or_default(parse_limit(&form.limit));
    let result = state.inner.analyzer.analyze(form.url.trim(), limit).await;
    state.render(&form.url, limit, &result)
}

// Clears the outputs only; the inputs keep what the user typed.
async fn clear(State(state): State<AppState>, Form(form): Form<AnalyzeForm>) -> Response {
    let limit = state.limit_or_default(parse_limit(&form.limit));
    state.render(&form.url, limit, &AnalysisResult::empty())
}

async fn analyze_json(State(state): State<AppState>, request: Result<Json<AnalyzeRequest>, JsonRejection>) -> Response {
    let Json(request) = match request {
        Ok(request) => request,
        Err(rejection) => {
            warn!("rejected analyze request: {}", rejection.body_text());
            let result = AnalysisResult::message(format!("Invalid request: {}", rejection.body_text()));
            return (rejection.status(), Json(result)).into_response();
        }
    };

    let limit = state.limit_or_default(request.limit);
    Json(state.inner.analyzer.analyze(request.url.trim(), limit).await).into_response()
}

fn parse_limit(value: &str) -> Option<usize> {
    value.trim().parse().ok()
}

fn chart_view(chart: &ChartData) -> ChartView<'_> {
    let max = chart.max_count().max(1);
    ChartView {
        title: &chart.title,
        y_label: &chart.y_label,
        bars: chart.bars.iter()
            .map(|bar| BarView {
                label: &bar.label,
                count: bar.count,
                percent: bar.count * 100 / max,
            })
            .collect(),
    }
}
