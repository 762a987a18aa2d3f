use pagechat_local::{FetcherConfig, DEFAULT_MAX_BYTES, DEFAULT_TIMEOUT_MS, DEFAULT_USER_AGENT};
use std::net::SocketAddr;

/// Fetch knobs shared by every subcommand that touches the network.
#[derive(clap::Args, Debug, Clone)]
pub struct FetchArgs {
    /// Per-request fetch timeout (connect + body).
    #[arg(long, env = "PAGECHAT_FETCH_TIMEOUT_MS", default_value_t = DEFAULT_TIMEOUT_MS)]
    pub fetch_timeout_ms: u64,
    /// Hard cap on response body bytes read before extraction.
    #[arg(long, env = "PAGECHAT_MAX_BYTES", default_value_t = DEFAULT_MAX_BYTES)]
    pub max_bytes: u64,
    /// User-Agent header sent with every fetch.
    #[arg(long, env = "PAGECHAT_USER_AGENT", default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,
}

impl FetchArgs {
    pub fn fetcher_config(&self) -> FetcherConfig {
        FetcherConfig {
            user_agent: self.user_agent.clone(),
            timeout_ms: self.fetch_timeout_ms,
            max_bytes: self.max_bytes,
        }
    }
}

impl Default for FetchArgs {
    fn default() -> Self {
        Self {
            fetch_timeout_ms: DEFAULT_TIMEOUT_MS,
            max_bytes: DEFAULT_MAX_BYTES,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

#[derive(clap::Args, Debug, Clone)]
pub struct ServeArgs {
    /// Interface to listen on.
    #[arg(long, env = "PAGECHAT_BIND", default_value = "0.0.0.0")]
    pub bind: String,
    /// Port to listen on.
    #[arg(long, env = "PORT", default_value_t = 5000)]
    pub port: u16,
    #[command(flatten)]
    pub fetch: FetchArgs,
}

impl ServeArgs {
    pub fn addr(&self) -> anyhow::Result<SocketAddr> {
        let s = format!("{}:{}", self.bind, self.port);
        s.parse()
            .map_err(|e| anyhow::anyhow!("invalid bind address {s:?}: {e}"))
    }
}

/// Optional env-file loader (`PAGECHAT_ENV_FILE=path`).
///
/// `KEY=VALUE` lines; blank lines and `#` comments are skipped. Variables already present in
/// the process environment win. Values are never logged.
pub fn load_env_file_from_env() {
    let Ok(p) = std::env::var("PAGECHAT_ENV_FILE") else {
        return;
    };
    let p = p.trim();
    if p.is_empty() {
        return;
    }
    if let Ok(txt) = std::fs::read_to_string(p) {
        for (k, v) in parse_env_lines(&txt) {
            if std::env::var_os(k).is_none() {
                std::env::set_var(k, v);
            }
        }
    }
}

fn parse_env_lines(txt: &str) -> Vec<(&str, &str)> {
    let mut out = Vec::new();
    for raw in txt.lines() {
        let s = raw.trim();
        if s.is_empty() || s.starts_with('#') {
            continue;
        }
        let Some((k, v)) = s.split_once('=') else {
            continue;
        };
        let k = k.trim();
        if k.is_empty() {
            continue;
        }
        out.push((k, v.trim()));
    }
    out
}

/// Install the global `tracing` subscriber (stderr, `RUST_LOG`, default `info`).
///
/// Logs go to stderr so `scrape`/`ask` can print JSON on stdout.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_env_lines_skips_comments_and_junk() {
        let txt = "# comment\n\nPORT=8080\n  PAGECHAT_BIND = 127.0.0.1 \nnot a pair\n=novalue\n";
        assert_eq!(
            parse_env_lines(txt),
            vec![("PORT", "8080"), ("PAGECHAT_BIND", "127.0.0.1")]
        );
    }

    #[test]
    fn env_file_does_not_override_existing_vars() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pagechat.env");
        std::fs::write(
            &path,
            "PAGECHAT_TEST_ENVFILE_NEW=from_file\nPAGECHAT_TEST_ENVFILE_SET=from_file\n",
        )
        .unwrap();

        std::env::set_var("PAGECHAT_TEST_ENVFILE_SET", "from_process");
        std::env::remove_var("PAGECHAT_TEST_ENVFILE_NEW");
        std::env::set_var("PAGECHAT_ENV_FILE", &path);
        load_env_file_from_env();
        std::env::remove_var("PAGECHAT_ENV_FILE");

        assert_eq!(
            std::env::var("PAGECHAT_TEST_ENVFILE_NEW").as_deref(),
            Ok("from_file")
        );
        assert_eq!(
            std::env::var("PAGECHAT_TEST_ENVFILE_SET").as_deref(),
            Ok("from_process")
        );
    }

    #[test]
    fn serve_addr_rejects_garbage() {
        let args = ServeArgs {
            bind: "127.0.0.1".to_string(),
            port: 5001,
            fetch: FetchArgs::default(),
        };
        assert_eq!(args.addr().unwrap().port(), 5001);

        let bad = ServeArgs {
            bind: "not an ip".to_string(),
            ..args
        };
        assert!(bad.addr().is_err());
    }
}
