//! Server configuration from command-line flags and environment variables.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use clap::{Parser, ValueEnum};

use crate::store::UpdateMode;

/// How the store assigns ids to new records.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum IdKind {
    /// Random UUID v4, string form on the wire.
    #[default]
    Uuid,
    /// Integers counting up from 1.
    Sequential,
}

/// Behaviour of `PUT /todos/{id}` for an id that is not stored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum UpdateModeArg {
    /// Respond 404.
    #[default]
    Strict,
    /// Insert the record under that id.
    Upsert,
}

impl From<UpdateModeArg> for UpdateMode {
    fn from(arg: UpdateModeArg) -> Self {
        match arg {
            UpdateModeArg::Strict => UpdateMode::Strict,
            UpdateModeArg::Upsert => UpdateMode::Upsert,
        }
    }
}

#[derive(Clone, Debug, Parser)]
#[command(name = "todo-server")]
#[command(version)]
#[command(about = "In-memory todo CRUD service", long_about = None)]
pub struct ServerConfig {
    /// Address to bind to
    #[arg(long, env = "TODO_HOST", default_value_t = IpAddr::V4(Ipv4Addr::LOCALHOST))]
    pub host: IpAddr,

    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = 8000)]
    pub port: u16,

    /// Id scheme for new records
    #[arg(long, env = "TODO_ID_SCHEME", value_enum, default_value_t = IdKind::Uuid)]
    pub id_scheme: IdKind,

    /// What PUT does for an unknown id
    #[arg(long, env = "TODO_UPDATE_MODE", value_enum, default_value_t = UpdateModeArg::Strict)]
    pub update_mode: UpdateModeArg,

    /// Allow any origin, method and header (local development only)
    #[arg(long, env = "TODO_CORS")]
    pub cors: bool,

    /// Start with a fixed set of sample records
    #[arg(long, env = "TODO_SEED")]
    pub seed: bool,

    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(long, env = "TODO_LOG", default_value = "info")]
    pub log_level: String,

    /// Emit logs as JSON
    #[arg(long, env = "TODO_JSON_LOGS")]
    pub json_logs: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 8000,
            id_scheme: IdKind::Uuid,
            update_mode: UpdateModeArg::Strict,
            cors: false,
            seed: false,
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}

impl ServerConfig {
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
