use {
    std::sync::Arc,
    thiserror::Error,
    tracing::{info, warn},
    crate::{
        aggregator::{aggregate, AnalysisResult, NO_COMMENTS_SUMMARY},
        normalizer::normalize,
        progress::Progress,
        sentiment::{Classification, SentimentClassifier},
        video_id::extract_video_id,
        youtube::{FetchError, YoutubeClient},
    },
};

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Error fetching comments: {0}")]
    Fetch(#[from] FetchError),
    #[error("Error classifying comments: {0}")]
    Classification(anyhow::Error),
}

/// URL in, result bundle out: extract the id, fetch, classify, aggregate.
pub struct Analyzer {
    youtube: YoutubeClient,
    classifier: Arc<dyn SentimentClassifier>,
}

impl Analyzer {
    pub fn new(youtube: YoutubeClient, classifier: Arc<dyn SentimentClassifier>) -> Self {
        Self {
            youtube,
            classifier,
        }
    }

    /// Never fails: errors are turned into the summary text with an empty
    /// table and chart.
    pub async fn analyze(&self, url: &str, limit: usize) -> AnalysisResult {
        match self.try_analyze(url, limit).await {
            Ok(result) => {
                info!("analyzed {} comments for {}: {}", result.comments.len(), url, result.summary);
                result
            },
            Err(err) => {
                warn!("analysis of {} failed: {}", url, err);
                AnalysisResult::message(err.to_string())
            }
        }
    }

    pub async fn try_analyze(&self, url: &str, limit: usize) -> Result<AnalysisResult, AnalysisError> {
        let video_id = extract_video_id(url).ok_or_else(|| FetchError::VideoIdNotFound(url.to_owned()))?;
        let comments = self.youtube.fetch_comments(&video_id, limit).await?;

        if comments.is_empty() {
            return Ok(AnalysisResult::message(NO_COMMENTS_SUMMARY));
        }

        let classifier = self.classifier.clone();
        let classified = tokio::task::spawn_blocking(move || classify_all(classifier.as_ref(), comments))
            .await
            .map_err(|err| AnalysisError::Classification(err.into()))?
            .map_err(AnalysisError::Classification)?;

        Ok(aggregate(classified))
    }
}

/// Classifies comments one at a time, in order. The original text is kept
/// alongside its classification; only the model sees the normalized form.
pub fn classify_all(classifier: &dyn SentimentClassifier, comments: Vec<String>) -> anyhow::Result<Vec<(String, Classification)>> {
    let mut progress = Progress::new("classifying comments", comments.len());
    let mut classified = Vec::with_capacity(comments.len());

    for comment in comments {
        let classification = classifier.classify(&normalize(&comment))?;
        classified.push((comment, classification));
        progress.update();
    }

    progress.finish();
    Ok(classified)
}
