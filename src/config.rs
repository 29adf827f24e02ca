#[derive(clap::ValueEnum, Clone, Debug, Copy)]
pub enum CargoEnv {
    Development,
    Production,
}

#[derive(clap::Parser)]
pub struct AppConfig {
    // production or development
    #[clap(long, env, value_enum)]
    pub cargo_env: CargoEnv,

    // port that the interception hop will bind to
    #[clap(long, env, default_value = "8080")]
    pub port: u16,

    // health lives on its own port so the transparent hop never shadows an
    // upstream path
    #[clap(long, env, default_value = "8081")]
    pub admin_port: u16,

    // download-trigger endpoint, the numeric video id gets appended to this
    #[clap(long, env, default_value = "http://192.168.40.1:8181/unada/rest/download/")]
    pub download_endpoint: String,

    // existence-check endpoint, takes a plain-text local file path and answers true/false
    #[clap(long, env, default_value = "http://192.168.40.1:8181/unada/rest/access")]
    pub access_endpoint: String,

    // local media origin that serves already-cached files under /unada/
    #[clap(long, env, default_value = "192.168.40.1")]
    pub local_media_host: String,

    #[clap(long, env, default_value = "80")]
    pub local_media_port: u16,

    // cache root on disk, falls back to $HOME/unada when not set
    #[clap(long, env)]
    pub cache_root: Option<String>,

    // host shape for the streaming pattern. The original matched any word.word.word
    // host, so the scope is kept configurable rather than hard-coded
    #[clap(long, env, default_value = "[a-z0-9_-]+\\.[a-z]+\\.[a-z]+")]
    pub stream_host_pattern: String,

    // bounded timeout for both collaborator calls so a dead endpoint degrades to
    // pass-through instead of stalling the request
    #[clap(long, env, default_value = "5")]
    pub collaborator_timeout_secs: u64,

    // optional sentry integration
    #[clap(long, env)]
    pub sentry_dsn: Option<String>,
}

impl Default for AppConfig {
    // defaults aren't really needed here but it's here as a bad fallback
    fn default() -> Self {
        Self {
            cargo_env: CargoEnv::Development,
            port: 8080,
            admin_port: 8081,
            download_endpoint: "http://192.168.40.1:8181/unada/rest/download/".to_string(),
            access_endpoint: "http://192.168.40.1:8181/unada/rest/access".to_string(),
            local_media_host: "192.168.40.1".to_string(),
            local_media_port: 80,
            cache_root: None,
            stream_host_pattern: "[a-z0-9_-]+\\.[a-z]+\\.[a-z]+".to_string(),
            collaborator_timeout_secs: 5,
            sentry_dsn: None,
        }
    }
}
