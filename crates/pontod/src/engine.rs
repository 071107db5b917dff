use chrono::Utc;
use chrono_tz::Tz;
use ponto_core::{Descriptor, Matcher, NearestMatcher, Person, PunchRecord};
use ponto_store::{IdentityStore, PunchLedger, StoreError};
use thiserror::Error;

/// Location label recorded when a punch request carries none.
pub const DEFAULT_LOCATION: &str = "web";

/// Longest location label the ledger will store.
const MAX_LOCATION_CHARS: usize = 120;

#[derive(Debug, Error)]
pub enum EngineError {
    /// Malformed or out-of-range input. Always reported before any store access.
    #[error("{0}")]
    Validation(String),
    #[error("no enrolled people found")]
    NoEnrollees,
    #[error("face not recognized: distance {distance} exceeds threshold {threshold}")]
    NotRecognized { distance: f32, threshold: f32 },
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    /// The match succeeded but the ledger write did not. Kept distinct from
    /// [`EngineError::Store`] so callers can tell "matched but not recorded"
    /// from a read-path fault.
    #[error("punch matched {username} but was not recorded: {source}")]
    NotRecorded { username: String, source: StoreError },
}

/// Result of an accepted punch.
#[derive(Debug)]
pub struct PunchOutcome {
    pub person: Person,
    pub distance: f32,
    pub record: PunchRecord,
}

/// Enrollment and attendance services over injected stores.
///
/// Holds no mutable state of its own; every operation is request-synchronous
/// and all coordination is delegated to the store's statement atomicity.
pub struct Engine {
    identities: IdentityStore,
    ledger: PunchLedger,
    threshold: f32,
    timezone: Tz,
}

impl Engine {
    pub fn new(identities: IdentityStore, ledger: PunchLedger, threshold: f32, timezone: Tz) -> Self {
        Self {
            identities,
            ledger,
            threshold,
            timezone,
        }
    }

    /// Enroll a person, or overwrite their descriptor and age if the trimmed
    /// name is already enrolled.
    pub async fn enroll(
        &self,
        full_name: &str,
        age: i64,
        descriptor: Vec<f32>,
    ) -> Result<Person, EngineError> {
        let name = full_name.trim();
        if name.is_empty() {
            return Err(EngineError::Validation("fullName is required".into()));
        }
        let name_len = name.chars().count();
        if !(2..=120).contains(&name_len) {
            return Err(EngineError::Validation(
                "fullName length must be between 2 and 120".into(),
            ));
        }
        if !(1..=120).contains(&age) {
            return Err(EngineError::Validation(
                "age must be an integer between 1 and 120".into(),
            ));
        }
        let descriptor = Descriptor::new(descriptor);
        if !descriptor.is_valid() {
            return Err(EngineError::Validation("invalid descriptor".into()));
        }

        let person = self.identities.upsert(name, age, &descriptor).await?;
        tracing::info!(id = person.id, name = %person.full_name, "identity enrolled");
        Ok(person)
    }

    /// Match the probe descriptor against every enrolled identity and, if
    /// the nearest one is within the threshold, append a punch record.
    pub async fn punch(
        &self,
        descriptor: Vec<f32>,
        location: Option<&str>,
    ) -> Result<PunchOutcome, EngineError> {
        let probe = Descriptor::new(descriptor);
        if !probe.is_valid() {
            return Err(EngineError::Validation("invalid descriptor".into()));
        }

        let candidates = self.identities.list().await?;
        let Some(best) = NearestMatcher.find_best(&probe, &candidates) else {
            return Err(EngineError::NoEnrollees);
        };

        if best.distance > self.threshold {
            return Err(EngineError::NotRecognized {
                distance: best.distance,
                threshold: self.threshold,
            });
        }

        let person = Person {
            id: best.identity.id,
            full_name: best.identity.full_name.clone(),
            age: best.identity.age,
        };
        let distance = best.distance;
        let location = sanitize_location(location);

        // One clock read; every time field of the record derives from it.
        let now = Utc::now().with_timezone(&self.timezone);

        let record = self
            .ledger
            .append(&person.full_name, now, &location)
            .await
            .map_err(|source| EngineError::NotRecorded {
                username: person.full_name.clone(),
                source,
            })?;

        tracing::info!(
            id = person.id,
            name = %person.full_name,
            distance,
            location = %record.location,
            "punch recorded"
        );

        Ok(PunchOutcome {
            person,
            distance,
            record,
        })
    }
}

/// Trim the client-supplied label, cap it at the column limit, and fall back
/// to the [`DEFAULT_LOCATION`] sentinel when absent or blank.
fn sanitize_location(location: Option<&str>) -> String {
    match location.map(str::trim) {
        Some(trimmed) if !trimmed.is_empty() => trimmed.chars().take(MAX_LOCATION_CHARS).collect(),
        _ => DEFAULT_LOCATION.to_string(),
    }
}
