use ponto_store::Store;
use zbus::interface;

use crate::engine::{Engine, EngineError};
use crate::wire::{self, EnrollRequest, PunchRequest};

/// D-Bus interface for the Ponto attendance daemon.
///
/// Bus name: org.ponto.Ponto1
/// Object path: /org/ponto/Ponto1
pub struct PontoService {
    engine: Engine,
    store: Store,
}

impl PontoService {
    pub fn new(engine: Engine, store: Store) -> Self {
        Self { engine, store }
    }
}

#[interface(name = "org.ponto.Ponto1")]
impl PontoService {
    /// Enroll (or re-enroll) a person from a JSON request body.
    async fn enroll(&self, request: &str) -> zbus::fdo::Result<String> {
        let req: EnrollRequest = parse_request(request)?;
        let person = self
            .engine
            .enroll(&req.full_name, req.age, req.descriptor)
            .await
            .map_err(into_fdo_error)?;
        Ok(wire::enroll_response(&person))
    }

    /// Record a punch against the nearest enrolled identity.
    async fn punch(&self, request: &str) -> zbus::fdo::Result<String> {
        let req: PunchRequest = parse_request(request)?;
        let outcome = self
            .engine
            .punch(req.descriptor, req.location.as_deref())
            .await
            .map_err(into_fdo_error)?;
        Ok(wire::punch_response(&outcome))
    }

    /// Daemon status: version plus database connectivity.
    async fn status(&self) -> zbus::fdo::Result<String> {
        let db = match self.store.ping().await {
            Ok(()) => "connected",
            Err(err) => {
                tracing::warn!(error = %err, "status probe failed");
                "unavailable"
            }
        };
        Ok(serde_json::json!({
            "version": env!("CARGO_PKG_VERSION"),
            "db": db,
        })
        .to_string())
    }

    /// Newest punch records as a JSON array, at most `limit` of them.
    async fn recent_punches(&self, limit: u32) -> zbus::fdo::Result<String> {
        let records = self
            .store
            .ledger()
            .recent(limit)
            .await
            .map_err(|err| zbus::fdo::Error::Failed(err.to_string()))?;
        Ok(serde_json::json!(records).to_string())
    }
}

fn parse_request<T: serde::de::DeserializeOwned>(body: &str) -> zbus::fdo::Result<T> {
    serde_json::from_str(body)
        .map_err(|err| zbus::fdo::Error::InvalidArgs(format!("malformed request: {err}")))
}

/// Map engine outcomes onto D-Bus errors the way the original wire contract
/// mapped them onto statuses: client faults to InvalidArgs, an unrecognized
/// face to AccessDenied carrying the structured rejection body, anything
/// store-side to Failed.
fn into_fdo_error(err: EngineError) -> zbus::fdo::Error {
    match err {
        EngineError::Validation(message) => zbus::fdo::Error::InvalidArgs(message),
        EngineError::NoEnrollees => {
            zbus::fdo::Error::Failed("no enrolled people found".to_string())
        }
        EngineError::NotRecognized {
            distance,
            threshold,
        } => zbus::fdo::Error::AccessDenied(wire::not_recognized_response(distance, threshold)),
        err @ (EngineError::Store(_) | EngineError::NotRecorded { .. }) => {
            tracing::error!(error = %err, "store fault");
            zbus::fdo::Error::Failed(err.to_string())
        }
    }
}
