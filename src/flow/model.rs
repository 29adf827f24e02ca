use std::collections::HashMap;

/// the request under inspection, lives for exactly one interception pass.
/// the runtime owns the real connection, this is the mutable view it hands us
#[derive(Debug, Clone, PartialEq)]
pub struct FlowRequest {
    pub scheme: String,
    pub host: String,
    pub port: u16,
    pub path: String,
    pub url: String,
    pub headers: HashMap<String, String>,
}

impl FlowRequest {
    /// host + path, the input the classifier works on
    pub fn effective_url(&self) -> String {
        format!("{}{}", self.host, self.path)
    }

    pub fn set_header(&mut self, name: &str, value: &str) {
        self.headers.insert(name.to_string(), value.to_string());
    }
}

/// response view, the only thing we ever touch on it is the stream flag
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlowResponse {
    pub stream: bool,
}

/// local media origin that serves cached files
#[derive(Debug, Clone, PartialEq)]
pub struct LocalOrigin {
    pub host: String,
    pub port: u16,
}

impl LocalOrigin {
    /// host:port form for urls and the Host header, port elided when default
    pub fn authority(&self) -> String {
        if self.port == 80 {
            self.host.clone()
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }

    /// url for a cached file, everything the origin serves sits under /unada/
    pub fn media_url(&self, video_file: &str) -> String {
        format!("http://{}/unada/{}", self.authority(), video_file)
    }
}

/// outcome of one request-phase pass. The engine returns this instead of
/// mutating the flow directly so the decision stays independently testable
#[derive(Debug, Clone, PartialEq)]
pub enum RewriteDecision {
    /// request goes to its original destination untouched
    PassThrough,
    /// request gets pointed at the local origin
    RedirectTo {
        scheme: String,
        host: String,
        port: u16,
        path: String,
        url: String,
        host_header: String,
    },
}

impl RewriteDecision {
    pub fn apply(&self, flow: &mut FlowRequest) {
        match self {
            RewriteDecision::PassThrough => {}
            RewriteDecision::RedirectTo {
                scheme,
                host,
                port,
                path,
                url,
                host_header,
            } => {
                flow.scheme = scheme.clone();
                flow.host = host.clone();
                flow.port = *port;
                flow.path = path.clone();
                flow.url = url.clone();
                flow.set_header("Host", host_header);
            }
        }
    }
}
