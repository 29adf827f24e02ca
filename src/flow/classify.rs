use anyhow::Context;
use regex::Regex;

/// which of the two recognized url shapes an intercepted request matches.
/// most traffic matches neither, that's the normal outcome and not an error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlMatch {
    /// canonical video-page url, carries the trailing numeric id
    Page { video_id: String },
    /// cdn streaming url, carries the path under the cdn host and the mp4 name
    Stream {
        content_path: String,
        file_name: String,
    },
    NoMatch,
}

/// the two compiled patterns, built once at startup and passed around.
/// the stream host shape comes from config because the original intent
/// (specific cdn domains vs any word.word.word host) was never pinned down
pub struct FlowPatterns {
    page: Regex,
    stream: Regex,
}

impl FlowPatterns {
    pub fn new(stream_host_pattern: &str) -> anyhow::Result<Self> {
        // anchored on both ends so unrelated hosts that merely contain these
        // shapes somewhere in the middle never classify
        let page = Regex::new(r"^(?:www\.)?vimeo\.com/(?:[^/]+/)*(\d{5,15})$")
            .context("page pattern failed to compile")?;

        let stream = Regex::new(&format!(
            r"^{stream_host_pattern}/([^?]+)/([^/?]+\.mp4)(?:\?.*)?$"
        ))
        .context("stream pattern failed to compile")?;

        Ok(Self { page, stream })
    }

    /// match host+path against both shapes. Page wins if both could ever
    /// match the same input, same precedence the original checks had
    pub fn classify(&self, effective_url: &str) -> UrlMatch {
        if let Some(caps) = self.page.captures(effective_url) {
            return UrlMatch::Page {
                video_id: caps[1].to_string(),
            };
        }

        if let Some(caps) = self.stream.captures(effective_url) {
            return UrlMatch::Stream {
                content_path: caps[1].to_string(),
                file_name: caps[2].to_string(),
            };
        }

        UrlMatch::NoMatch
    }
}
