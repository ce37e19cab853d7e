//! TCP server for the quiz adapter
//!
//! Accepts connections and runs each client in its own task with its own
//! [`Connection`] (and so its own game session). Uses tokio for async
//! networking.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use crate::connection::Connection;
use crate::core::Catalog;
use crate::protocol::{current_timestamp_ms, ServerMessage};

/// Major version `1.` is accepted from clients
pub const PROTOCOL_VERSION: &str = "1.0.0";

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub protocol_version: String,
    /// Base seed; client `n` plays seed `base + n`. Clock-derived when unset.
    pub seed: Option<u64>,
    /// JSON catalog replacing the built-in one
    pub catalog_path: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 7878,
            protocol_version: PROTOCOL_VERSION.to_string(),
            seed: None,
            catalog_path: None,
        }
    }
}

impl ServerConfig {
    /// Create from `TOWER_QUIZ_*` environment variables
    pub fn from_env() -> Self {
        use std::env;

        let defaults = Self::default();

        let host = env::var("TOWER_QUIZ_HOST").unwrap_or(defaults.host);
        let port = env::var("TOWER_QUIZ_PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.port);

        let seed = env::var("TOWER_QUIZ_SEED")
            .ok()
            .and_then(|s| s.trim().parse().ok());

        let catalog_path = env::var("TOWER_QUIZ_CATALOG")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .map(PathBuf::from);

        Self {
            host,
            port,
            protocol_version: defaults.protocol_version,
            seed,
            catalog_path,
        }
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid socket address {}:{}", self.host, self.port))
    }

    /// Check if the server is disabled via environment
    pub fn is_disabled() -> bool {
        std::env::var("TOWER_QUIZ_DISABLED")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    }

    /// Load the configured catalog, or the built-in one
    pub fn load_catalog(&self) -> anyhow::Result<Catalog> {
        match &self.catalog_path {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .with_context(|| format!("reading catalog {}", path.display()))?;
                Catalog::from_json(&json)
                    .with_context(|| format!("loading catalog {}", path.display()))
            }
            None => Catalog::builtin().context("loading built-in catalog"),
        }
    }
}

/// Run the adapter until the listener fails.
///
/// `ready_tx` receives the bound address once the socket is listening, which
/// lets callers bind port 0.
pub async fn run_server(
    config: ServerConfig,
    catalog: Arc<Catalog>,
    ready_tx: Option<oneshot::Sender<SocketAddr>>,
) -> anyhow::Result<()> {
    let addr = config.socket_addr()?;
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    let bound = listener.local_addr()?;
    info!(%bound, protocol_version = %config.protocol_version, "TCP server listening");
    if let Some(tx) = ready_tx {
        let _ = tx.send(bound);
    }

    let base_seed = config.seed.unwrap_or_else(current_timestamp_ms);
    let mut client_id_counter = 0u64;

    loop {
        let (socket, peer) = listener.accept().await?;
        client_id_counter += 1;
        let client_id = client_id_counter;
        let connection = Connection::new(
            client_id,
            base_seed.wrapping_add(client_id),
            &config.protocol_version,
            Arc::clone(&catalog),
        );

        info!(client_id, %peer, "client connected");
        tokio::spawn(async move {
            if let Err(e) = handle_client(socket, connection).await {
                warn!(client_id, error = %e, "client error");
            }
            info!(client_id, "client disconnected");
        });
    }
}

async fn handle_client(socket: TcpStream, mut connection: Connection) -> anyhow::Result<()> {
    let (reader, mut writer) = tokio::io::split(socket);
    let mut reader = BufReader::new(reader);
    let mut line = String::new();
    let mut buf: Vec<u8> = Vec::with_capacity(4096);

    loop {
        line.clear();
        if reader.read_line(&mut line).await? == 0 {
            break;
        }

        let Some(reply) = connection.handle_line(&line, current_timestamp_ms()) else {
            continue;
        };
        write_message(&mut writer, &mut buf, &reply).await?;
        debug!(client_id = connection.client_id(), seq = reply.seq(), "reply sent");
    }

    Ok(())
}

async fn write_message<W>(writer: &mut W, buf: &mut Vec<u8>, msg: &ServerMessage) -> anyhow::Result<()>
where
    W: AsyncWrite + Unpin,
{
    buf.clear();
    serde_json::to_writer(&mut *buf, msg)?;
    buf.push(b'\n');
    writer.write_all(buf).await?;
    writer.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 7878);
        assert_eq!(config.protocol_version, PROTOCOL_VERSION);
        assert_eq!(
            config.socket_addr().unwrap(),
            "127.0.0.1:7878".parse::<SocketAddr>().unwrap()
        );
    }

    #[test]
    fn test_bad_socket_addr() {
        let config = ServerConfig {
            host: "not a host".to_string(),
            ..ServerConfig::default()
        };
        assert!(config.socket_addr().is_err());
    }

    #[test]
    fn test_load_builtin_catalog() {
        let catalog = ServerConfig::default().load_catalog().unwrap();
        assert_eq!(catalog.len(), 54);
    }

    #[test]
    fn test_load_missing_catalog_file() {
        let config = ServerConfig {
            catalog_path: Some(PathBuf::from("/nonexistent/catalog.json")),
            ..ServerConfig::default()
        };
        let err = config.load_catalog().unwrap_err();
        assert!(err.to_string().contains("reading catalog"));
    }
}
