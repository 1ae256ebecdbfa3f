use {
    serde::Serialize,
    crate::sentiment::{Classification, LABEL_NEGATIVE, LABEL_NEUTRAL, LABEL_POSITIVE},
};

pub const NO_COMMENTS_SUMMARY: &str = "No comments fetched.";
pub const TABLE_HEADERS: [&str; 3] = ["Comment", "Sentiment", "Confidence"];
pub const CHART_TITLE: &str = "Sentiment Distribution";
pub const CHART_Y_LABEL: &str = "Count";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifiedComment {
    pub comment: String,
    pub sentiment: String,
    pub confidence: f64,
}

/// Count of comments per sentiment label, in order of first insertion.
///
/// Starts with the three conventional labels at zero; any other label the
/// classifier emits is added when first seen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentimentTally {
    counts: Vec<(String, usize)>,
}

impl SentimentTally {
    pub fn new() -> Self {
        Self {
            counts: [LABEL_POSITIVE, LABEL_NEGATIVE, LABEL_NEUTRAL]
                .iter()
                .map(|label| (label.to_string(), 0))
                .collect(),
        }
    }

    pub fn record(&mut self, label: &str) {
        match self.counts.iter_mut().find(|(known, _)| known == label) {
            Some((_, count)) => *count += 1,
            None => self.counts.push((label.to_owned(), 1)),
        }
    }

    pub fn count(&self, label: &str) -> usize {
        self.counts.iter()
            .find(|(known, _)| known == label)
            .map(|(_, count)| *count)
            .unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.iter().map(|(_, count)| count).sum()
    }
}

impl Default for SentimentTally {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartBar {
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub title: String,
    pub y_label: String,
    pub bars: Vec<ChartBar>,
}

impl ChartData {
    pub fn empty() -> Self {
        Self {
            title: CHART_TITLE.to_owned(),
            y_label: CHART_Y_LABEL.to_owned(),
            bars: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn max_count(&self) -> usize {
        self.bars.iter().map(|bar| bar.count).max().unwrap_or(0)
    }
}

/// Everything shown for one analysis request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub summary: String,
    pub comments: Vec<ClassifiedComment>,
    pub chart: ChartData,
}

impl AnalysisResult {
    /// The cleared state: no summary, no rows, no bars.
    pub fn empty() -> Self {
        Self::message("")
    }

    /// A result carrying only a message, used for errors and empty fetches.
    pub fn message(summary: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            comments: Vec::new(),
            chart: ChartData::empty(),
        }
    }
}

/// Tallies classified comments and builds the rows, summary and chart.
/// Rows keep fetch order.
pub fn aggregate(classified: Vec<(String, Classification)>) -> AnalysisResult {
    if classified.is_empty() {
        return AnalysisResult::message(NO_COMMENTS_SUMMARY);
    }

    let mut tally = SentimentTally::new();
    let comments: Vec<ClassifiedComment> = classified.into_iter()
        .map(|(comment, classification)| {
            tally.record(&classification.label);
            ClassifiedComment {
                comment,
                sentiment: classification.label,
                confidence: round_to_hundredths(classification.score),
            }
        })
        .collect();

    AnalysisResult {
        summary: summary(&tally),
        chart: chart(&tally, &comments),
        comments,
    }
}

pub fn summary(tally: &SentimentTally) -> String {
    format!(
        "Positive: {}, Negative: {}, Neutral: {}, Total: {}",
        tally.count(LABEL_POSITIVE),
        tally.count(LABEL_NEGATIVE),
        tally.count(LABEL_NEUTRAL),
        tally.total()
    )
}

// Bars follow the order in which labels first appear among the rows.
fn chart(tally: &SentimentTally, comments: &[ClassifiedComment]) -> ChartData {
    let mut chart = ChartData::empty();
    for comment in comments {
        if !chart.bars.iter().any(|bar| bar.label == comment.sentiment) {
            chart.bars.push(ChartBar {
                label: comment.sentiment.clone(),
                count: tally.count(&comment.sentiment),
            });
        }
    }
    chart
}

// Formatting rounds the exact binary value, so 0.075 (stored just below it)
// becomes 0.07 rather than being pushed up by a scaled multiply.
fn round_to_hundredths(value: f64) -> f64 {
    format!("{:.2}", value).parse().unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classified(items: &[(&str, &str, f64)]) -> Vec<(String, Classification)> {
        items.iter()
            .map(|(text, label, score)| (text.to_string(), Classification::new(*label, *score)))
            .collect()
    }

    #[test]
    fn positive_and_negative_scenario() {
        let result = aggregate(classified(&[
            ("great video!", "POSITIVE", 0.9812),
            ("terrible, worst ever", "NEGATIVE", 0.9487),
        ]));

        assert_eq!(result.summary, "Positive: 1, Negative: 1, Neutral: 0, Total: 2");
        assert_eq!(result.comments, vec![
            ClassifiedComment { comment: "great video!".to_owned(), sentiment: "POSITIVE".to_owned(), confidence: 0.98 },
            ClassifiedComment { comment: "terrible, worst ever".to_owned(), sentiment: "NEGATIVE".to_owned(), confidence: 0.95 },
        ]);
        assert_eq!(result.chart.bars, vec![
            ChartBar { label: "POSITIVE".to_owned(), count: 1 },
            ChartBar { label: "NEGATIVE".to_owned(), count: 1 },
        ]);
    }

    #[test]
    fn empty_input_has_no_rows_and_no_bars() {
        let result = aggregate(Vec::new());

        assert_eq!(result.summary, NO_COMMENTS_SUMMARY);
        assert!(result.comments.is_empty());
        assert!(result.chart.is_empty());
    }

    #[test]
    fn unknown_labels_are_tallied_not_rejected() {
        let mut tally = SentimentTally::new();
        tally.record("MIXED");
        tally.record("POSITIVE");
        tally.record("MIXED");

        assert_eq!(tally.count("MIXED"), 2);
        assert_eq!(tally.count("POSITIVE"), 1);
        assert_eq!(tally.total(), 3);
        assert_eq!(
            tally.counts.iter().map(|(label, _)| label.as_str()).collect::<Vec<_>>(),
            vec!["POSITIVE", "NEGATIVE", "NEUTRAL", "MIXED"]
        );
    }

    #[test]
    fn summary_reports_only_conventional_labels_but_counts_all() {
        let result = aggregate(classified(&[
            ("a", "MIXED", 0.5),
            ("b", "NEUTRAL", 0.7),
        ]));

        assert_eq!(result.summary, "Positive: 0, Negative: 0, Neutral: 1, Total: 2");
        assert_eq!(result.chart.bars[0], ChartBar { label: "MIXED".to_owned(), count: 1 });
    }

    #[test]
    fn tally_matches_rows_and_inputs() {
        let labels = ["POSITIVE", "NEGATIVE", "NEUTRAL", "OTHER"];
        for n in [1, 2, 7, 100] {
            let input: Vec<_> = (0..n)
                .map(|i| (format!("comment {}", i), Classification::new(labels[i % labels.len()], 0.5)))
                .collect();

            let result = aggregate(input);
            let bar_total: usize = result.chart.bars.iter().map(|bar| bar.count).sum();

            assert_eq!(result.comments.len(), n);
            assert_eq!(bar_total, n);
            assert!(result.summary.ends_with(&format!("Total: {}", n)));
        }
    }

    #[test]
    fn chart_bars_follow_first_appearance() {
        let result = aggregate(classified(&[
            ("a", "NEGATIVE", 0.9),
            ("b", "POSITIVE", 0.9),
            ("c", "NEGATIVE", 0.9),
        ]));

        assert_eq!(result.chart.bars, vec![
            ChartBar { label: "NEGATIVE".to_owned(), count: 2 },
            ChartBar { label: "POSITIVE".to_owned(), count: 1 },
        ]);
        assert_eq!(result.chart.max_count(), 2);
    }

    #[test]
    fn confidence_is_rounded_to_two_decimals() {
        assert_eq!(round_to_hundredths(0.996), 1.0);
        assert_eq!(round_to_hundredths(0.5049), 0.5);
        assert_eq!(round_to_hundredths(0.123), 0.12);
        assert_eq!(round_to_hundredths(0.075), 0.07);
        assert_eq!(round_to_hundredths(0.285), 0.28);
        assert_eq!(round_to_hundredths(0.98), 0.98);
    }
}
