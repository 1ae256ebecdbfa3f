use {
    std::{collections::HashMap, net::SocketAddr, sync::{Arc, Mutex}},
    axum::{Json, Router, extract::{Query, State}, http::StatusCode, response::{IntoResponse, Response}, routing::get},
    crate::{
        config::YoutubeConfig,
        youtube::{ApiErrorBody, ApiErrorResponse, CommentThread, CommentThreadListResponse, YoutubeClient},
    },
};

/// In-process stand-in for the `commentThreads` endpoint.
///
/// Serves `pool` comments named `comment <n>` for any video except
/// `missing-video`. Page tokens are item offsets.
#[derive(Clone)]
pub struct MockYoutube {
    addr: SocketAddr,
    state: Arc<MockState>,
}

struct MockState {
    pool: usize,
    fixed_page_size: Mutex<Option<usize>>,
    fail_after_pages: Mutex<Option<usize>>,
    empty_first_page: Mutex<bool>,
    repeat_token: Mutex<bool>,
    requests: Mutex<Vec<HashMap<String, String>>>,
}

impl MockYoutube {
    pub async fn start(pool: usize) -> Self {
        let state = Arc::new(MockState {
            pool,
            fixed_page_size: Mutex::new(None),
            fail_after_pages: Mutex::new(None),
            empty_first_page: Mutex::new(false),
            repeat_token: Mutex::new(false),
            requests: Mutex::new(Vec::new()),
        });

        let router = Router::new()
            .route("/youtube/v3/commentThreads", get(comment_threads))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        Self { addr, state }
    }

    /// Returns pages of `page_size` items regardless of `maxResults`.
    pub fn ignoring_max_results(self, page_size: usize) -> Self {
        *self.state.fixed_page_size.lock().unwrap() = Some(page_size);
        self
    }

    /// Answers with a quota error once `pages` pages have been served.
    pub fn failing_after_pages(self, pages: usize) -> Self {
        *self.state.fail_after_pages.lock().unwrap() = Some(pages);
        self
    }

    /// Answers the first request with no items but a token back to the start.
    pub fn with_empty_first_page(self) -> Self {
        *self.state.empty_first_page.lock().unwrap() = true;
        self
    }

    /// Serves one item per page and always hands out the token `1`.
    pub fn repeating_token(self) -> Self {
        *self.state.repeat_token.lock().unwrap() = true;
        self
    }

    pub fn endpoint(&self) -> String {
        format!("http://{}/youtube/v3", self.addr)
    }

    pub fn client(&self) -> YoutubeClient {
        YoutubeClient::new(&YoutubeConfig::new("test-key", self.endpoint()))
    }

    pub fn requested_page_sizes(&self) -> Vec<usize> {
        self.state.requests.lock().unwrap()
            .iter()
            .map(|request| request["maxResults"].parse().unwrap())
            .collect()
    }

    pub fn last_request(&self) -> Option<HashMap<String, String>> {
        self.state.requests.lock().unwrap().last().cloned()
    }
}

async fn comment_threads(
    State(state): State<Arc<MockState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let served_pages = {
        let mut requests = state.requests.lock().unwrap();
        requests.push(params.clone());
        requests.len() - 1
    };

    if params.get("videoId").map(String::as_str) == Some("missing-video") {
        return api_error(StatusCode::NOT_FOUND, "The video identified by the videoId parameter could not be found.");
    }

    if let Some(limit) = *state.fail_after_pages.lock().unwrap() {
        if served_pages >= limit {
            return api_error(StatusCode::FORBIDDEN, "The request cannot be completed because you have exceeded your quota.");
        }
    }

    let max_results: usize = params.get("maxResults").and_then(|v| v.parse().ok()).unwrap_or(20);
    if max_results == 0 || max_results > 100 {
        return api_error(StatusCode::BAD_REQUEST, "Invalid value for maxResults.");
    }

    if served_pages == 0 && *state.empty_first_page.lock().unwrap() {
        let response = CommentThreadListResponse {
            next_page_token: Some("0".to_owned()),
            items: Vec::new(),
        };
        return (StatusCode::OK, Json(response)).into_response();
    }

    let repeat_token = *state.repeat_token.lock().unwrap();
    let page_size = if repeat_token { 1 } else { max_results };
    let page_size = state.fixed_page_size.lock().unwrap().unwrap_or(page_size);
    let offset: usize = params.get("pageToken").and_then(|v| v.parse().ok()).unwrap_or(0);
    let end = (offset + page_size).min(state.pool);

    let response = CommentThreadListResponse {
        next_page_token: if repeat_token {
            Some("1".to_owned())
        } else if end < state.pool {
            Some(end.to_string())
        } else {
            None
        },
        items: (offset..end).map(|i| CommentThread::new(format!("comment {}", i))).collect(),
    };

    (StatusCode::OK, Json(response)).into_response()
}

fn api_error(status: StatusCode, message: &str) -> Response {
    let body = ApiErrorResponse {
        error: ApiErrorBody {
            code: Some(status.as_u16()),
            message: message.to_owned(),
        },
    };

    (status, Json(body)).into_response()
}
