use {
    std::fmt,
    url::Url,
};

/// Identifier of a YouTube video as it appears in its URLs. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoId(String);

impl VideoId {
    pub fn new(id: impl Into<String>) -> Option<Self> {
        let id = id.into();
        if id.is_empty() {
            None
        } else {
            Some(Self(id))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Extracts the video id from short links (`youtu.be/<id>`), watch pages
/// (`youtube.com/watch?v=<id>`), embeds (`youtube.com/embed/<id>`) and
/// legacy player links (`youtube.com/v/<id>`). Anything else yields `None`.
pub fn extract_video_id(input: &str) -> Option<VideoId> {
    let url = Url::parse(input).ok()?;

    let id = match url.host_str()? {
        "youtu.be" => url.path_segments()?.next().map(str::to_owned),
        "www.youtube.com" | "youtube.com" => {
            let path = url.path();
            if path == "/watch" {
                url.query_pairs()
                    .find(|(key, _)| key == "v")
                    .map(|(_, value)| value.into_owned())
            } else if path.starts_with("/embed/") || path.starts_with("/v/") {
                path.split('/').nth(2).map(str::to_owned)
            } else {
                None
            }
        },
        _ => None,
    };

    id.and_then(VideoId::new)
}
