use {
    std::{sync::{mpsc, Mutex}, thread},
    anyhow::{anyhow, Result},
    tracing::info,
    rust_bert::pipelines::sentiment::{SentimentModel, SentimentPolarity},
};

pub const LABEL_POSITIVE: &str = "POSITIVE";
pub const LABEL_NEGATIVE: &str = "NEGATIVE";
pub const LABEL_NEUTRAL: &str = "NEUTRAL";

/// Label and confidence assigned to one piece of text.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub label: String,
    pub score: f64,
}

impl Classification {
    pub fn new(label: impl Into<String>, score: f64) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }
}

pub trait SentimentClassifier: Send + Sync {
    fn classify(&self, text: &str) -> Result<Classification>;
}

type Job = (String, mpsc::Sender<Result<Classification>>);

/// DistilBERT SST-2 sentiment model served from its own thread.
///
/// The model is blocking and owns its tensors, so it is created on the
/// worker thread and fed through a channel for the lifetime of the process.
pub struct RustBertClassifier {
    jobs: Mutex<mpsc::Sender<Job>>,
}

impl RustBertClassifier {
    pub fn load() -> Result<Self> {
        let (jobs_tx, jobs_rx) = mpsc::channel::<Job>();
        let (ready_tx, ready_rx) = mpsc::channel::<Result<()>>();

        thread::Builder::new()
            .name("sentiment-model".to_owned())
            .spawn(move || {
                info!("loading sentiment model");
                let model = match SentimentModel::new(Default::default()) {
                    Ok(model) => model,
                    Err(err) => {
                        let _ = ready_tx.send(Err(anyhow!("failed to load sentiment model: {}", err)));
                        return;
                    }
                };
                let _ = ready_tx.send(Ok(()));
                info!("sentiment model loaded");

                for (text, reply) in jobs_rx {
                    let _ = reply.send(predict(&model, &text));
                }
            })?;

        ready_rx.recv().map_err(|_| anyhow!("sentiment model thread exited during startup"))??;

        Ok(Self {
            jobs: Mutex::new(jobs_tx),
        })
    }
}

impl SentimentClassifier for RustBertClassifier {
    fn classify(&self, text: &str) -> Result<Classification> {
        let (reply_tx, reply_rx) = mpsc::channel();

        self.jobs.lock()
            .map_err(|_| anyhow!("sentiment model channel is poisoned"))?
            .send((text.to_owned(), reply_tx))
            .map_err(|_| anyhow!("sentiment model thread is not running"))?;

        reply_rx.recv().map_err(|_| anyhow!("sentiment model thread dropped the request"))?
    }
}

fn predict(model: &SentimentModel, text: &str) -> Result<Classification> {
    let sentiment = model.predict(&[text])
        .pop()
        .ok_or_else(|| anyhow!("sentiment model returned no prediction"))?;

    Ok(Classification::new(polarity_label(&sentiment.polarity), sentiment.score))
}

fn polarity_label(polarity: &SentimentPolarity) -> &'static str {
    match polarity {
        SentimentPolarity::Positive => LABEL_POSITIVE,
        SentimentPolarity::Negative => LABEL_NEGATIVE,
    }
}
