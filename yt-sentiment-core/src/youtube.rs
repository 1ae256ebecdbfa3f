use {
    thiserror::Error,
    serde::{Serialize, Deserialize},
    tracing::debug,
    crate::{
        config::YoutubeConfig,
        video_id::VideoId,
    },
};

pub const DEFAULT_ENDPOINT: &str = "https://www.googleapis.com/youtube/v3";
pub const MAX_RESULTS_PER_PAGE: usize = 100;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("no video id found in URL '{0}'")]
    VideoIdNotFound(String),
    #[error("request to YouTube API failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("YouTube API returned status {status}: {message}")]
    Api {
        status: u16,
        message: String,
    },
    #[error("failed to decode YouTube API response: {0}")]
    Decode(#[source] reqwest::Error),
}

#[derive(Serialize, Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct CommentThreadListResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
    #[serde(default)]
    pub items: Vec<CommentThread>,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CommentThread {
    pub snippet: CommentThreadSnippet,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CommentThreadSnippet {
    pub top_level_comment: Comment,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub snippet: CommentSnippet,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CommentSnippet {
    pub text_display: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub code: Option<u16>,
    pub message: String,
}

impl CommentThread {
    pub fn new(text_display: impl Into<String>) -> Self {
        Self {
            snippet: CommentThreadSnippet {
                top_level_comment: Comment {
                    snippet: CommentSnippet {
                        text_display: text_display.into(),
                    },
                },
            },
        }
    }

    pub fn into_text(self) -> String {
        self.snippet.top_level_comment.snippet.text_display
    }
}

/// Client for the `commentThreads` resource of the YouTube Data API.
pub struct YoutubeClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl YoutubeClient {
    pub fn new(config: &YoutubeConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: config.endpoint().trim_end_matches('/').to_owned(),
            api_key: config.api_key().to_owned(),
        }
    }

    /// Collects up to `limit` top-level comments, following page tokens.
    ///
    /// Collection stops exactly at `limit`, dropping the rest of the page that
    /// reached it. Any failed page aborts the whole fetch.
    pub async fn fetch_comments(&self, video_id: &VideoId, limit: usize) -> Result<Vec<String>, FetchError> {
        let mut comments = Vec::with_capacity(limit.min(MAX_RESULTS_PER_PAGE));
        let mut page_token: Option<String> = None;
        let mut page = 0;

        while comments.len() < limit {
            let max_results = (limit - comments.len()).min(MAX_RESULTS_PER_PAGE);
            page += 1;

            let response = self.comment_threads_page(video_id, max_results, page_token.as_deref()).await?;
            debug!(
                "fetched page {} for video {}: {} comments, next page: {}",
                page,
                video_id,
                response.items.len(),
                response.next_page_token.is_some()
            );

            for thread in response.items {
                comments.push(thread.into_text());
                if comments.len() >= limit {
                    break;
                }
            }

            match response.next_page_token {
                // a token that does not move would request the same page forever
                Some(token) if page_token.as_deref() != Some(token.as_str()) => page_token = Some(token),
                _ => break,
            }
        }

        Ok(comments)
    }

    async fn comment_threads_page(&self, video_id: &VideoId, max_results: usize, page_token: Option<&str>) -> Result<CommentThreadListResponse, FetchError> {
        let mut query = vec![
            ("part", "snippet".to_owned()),
            ("videoId", video_id.as_str().to_owned()),
            ("maxResults", max_results.to_string()),
            ("textFormat", "plainText".to_owned()),
            ("key", self.api_key.clone()),
        ];
        if let Some(token) = page_token {
            query.push(("pageToken", token.to_owned()));
        }

        let res = self.client.get(format!("{}/commentThreads", self.endpoint))
            .query(&query)
            .send()
            .await
            .map_err(FetchError::Transport)?;

        let status = res.status();
        if !status.is_success() {
            let message = res.json::<ApiErrorResponse>()
                .await
                .map(|body| body.error.message)
                .unwrap_or_else(|_| status.canonical_reason().unwrap_or("unknown error").to_owned());

            return Err(FetchError::Api {
                status: status.as_u16(),
                message,
            });
        }

        res.json().await.map_err(FetchError::Decode)
    }
}
