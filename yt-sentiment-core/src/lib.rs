pub mod aggregator;
pub mod analysis;
pub mod config;
pub mod normalizer;
pub mod progress;
pub mod sentiment;
pub mod video_id;
pub mod youtube;

#[cfg(test)]
pub(crate) mod test_support;
