//! Per-exchange audit records.
//!
//! Each inbound request produces one `tracing` event on [`EXCHANGE_TARGET`].
//! [`exchange_layer`] writes those events as JSON lines to a file; nothing is
//! kept in memory. Records never carry credentials or bodies.

use crate::error::GatewayError;
use crate::providers::Provider;
use std::fs::{File, OpenOptions};
use std::path::Path;
use std::time::Instant;
use tracing::{Level, Subscriber};
use tracing_subscriber::filter::Targets;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::Layer;
use uuid::Uuid;

pub const EXCHANGE_TARGET: &str = "chat_gateway::exchange";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    BackendError,
    InternalError,
    Unauthorized,
}

impl Outcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::BackendError => "backend_error",
            Self::InternalError => "internal_error",
            Self::Unauthorized => "unauthorized",
        }
    }
}

impl From<&GatewayError> for Outcome {
    fn from(err: &GatewayError) -> Self {
        match err {
            GatewayError::Unauthorized => Self::Unauthorized,
            GatewayError::Backend { .. } => Self::BackendError,
            _ => Self::InternalError,
        }
    }
}

/// An exchange in flight. Finish it once the response is known.
#[derive(Debug)]
pub struct Exchange {
    id: Uuid,
    path: String,
    provider: Option<Provider>,
    model: Option<String>,
    started: Instant,
}

impl Exchange {
    pub fn start(path: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            path: path.into(),
            provider: None,
            model: None,
            started: Instant::now(),
        }
    }

    pub fn set_provider(&mut self, provider: Provider) {
        self.provider = Some(provider);
    }

    pub fn set_model(&mut self, model: Option<&str>) {
        self.model = model.map(str::to_string);
    }

    pub fn finish(self, outcome: Outcome, status: u16) -> ExchangeRecord {
        ExchangeRecord {
            id: self.id,
            path: self.path,
            provider: self.provider,
            model: self.model,
            outcome,
            status,
            latency_ms: u64::try_from(self.started.elapsed().as_millis()).unwrap_or(u64::MAX),
        }
    }

    pub fn failed(self, err: &GatewayError) -> ExchangeRecord {
        self.finish(Outcome::from(err), err.status().as_u16())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeRecord {
    pub id: Uuid,
    pub path: String,
    pub provider: Option<Provider>,
    pub model: Option<String>,
    pub outcome: Outcome,
    pub status: u16,
    pub latency_ms: u64,
}

impl ExchangeRecord {
    pub fn emit(&self) {
        tracing::info!(
            target: EXCHANGE_TARGET,
            id = %self.id,
            path = %self.path,
            provider = self.provider.map(Provider::name),
            model = self.model.as_deref(),
            outcome = self.outcome.as_str(),
            status = self.status,
            latency_ms = self.latency_ms,
            "exchange"
        );
    }
}

/// Open (appending) the exchange log file, creating parent directories.
pub fn open_exchange_log(path: impl AsRef<Path>) -> std::io::Result<File> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// JSON-lines layer that only sees exchange records.
pub fn exchange_layer<S>(file: File) -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    tracing_subscriber::fmt::layer()
        .json()
        .with_current_span(false)
        .with_span_list(false)
        .with_ansi(false)
        .with_writer(file)
        .with_filter(Targets::new().with_target(EXCHANGE_TARGET, Level::INFO))
}
