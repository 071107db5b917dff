//! JSON boundary: strictly-typed requests and response payload builders.
//!
//! Field names match the wire contract of the service
//! (`fullName`, `punchSaved`, `row`). Requests are parsed into typed structs
//! before any domain logic runs; a non-array descriptor or non-integer age
//! fails the parse and never reaches the engine.

use ponto_core::Person;
use serde::Deserialize;
use serde_json::json;

use crate::engine::PunchOutcome;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollRequest {
    pub full_name: String,
    pub age: i64,
    pub descriptor: Vec<f32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PunchRequest {
    pub descriptor: Vec<f32>,
    #[serde(default)]
    pub location: Option<String>,
}

/// Distances are echoed to clients rounded to 4 decimals.
pub fn round4(value: f32) -> f32 {
    (value * 10_000.0).round() / 10_000.0
}

pub fn enroll_response(person: &Person) -> String {
    json!({ "message": "person enrolled", "person": person }).to_string()
}

pub fn punch_response(outcome: &PunchOutcome) -> String {
    json!({
        "message": "punch registered",
        "person": outcome.person,
        "distance": round4(outcome.distance),
        "punchSaved": true,
        "row": outcome.record,
    })
    .to_string()
}

/// Structured rejection for a face whose best match is past the threshold.
pub fn not_recognized_response(distance: f32, threshold: f32) -> String {
    json!({
        "error": "face not recognized",
        "distance": round4(distance),
        "threshold": threshold,
    })
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ponto_core::{PunchRecord, DESCRIPTOR_DIM};

    #[test]
    fn test_enroll_request_parses_camel_case() {
        let descriptor: Vec<f32> = vec![0.1; DESCRIPTOR_DIM];
        let body = json!({
            "fullName": "Ana Silva",
            "age": 30,
            "descriptor": descriptor,
        })
        .to_string();

        let req: EnrollRequest = serde_json::from_str(&body).unwrap();
        assert_eq!(req.full_name, "Ana Silva");
        assert_eq!(req.age, 30);
        assert_eq!(req.descriptor.len(), DESCRIPTOR_DIM);
    }

    #[test]
    fn test_enroll_request_rejects_non_integer_age() {
        let body = json!({
            "fullName": "Ana Silva",
            "age": "thirty",
            "descriptor": [0.1],
        })
        .to_string();
        assert!(serde_json::from_str::<EnrollRequest>(&body).is_err());
    }

    #[test]
    fn test_punch_request_location_is_optional() {
        let body = json!({ "descriptor": [0.1, 0.2] }).to_string();
        let req: PunchRequest = serde_json::from_str(&body).unwrap();
        assert!(req.location.is_none());
    }

    #[test]
    fn test_punch_request_rejects_scalar_descriptor() {
        let body = json!({ "descriptor": 1.5 }).to_string();
        assert!(serde_json::from_str::<PunchRequest>(&body).is_err());
    }

    #[test]
    fn test_round4() {
        assert_eq!(round4(0.123_456), 0.1235);
        assert_eq!(round4(0.0), 0.0);
        assert_eq!(round4(1.0), 1.0);
    }

    #[test]
    fn test_punch_response_shape() {
        let outcome = PunchOutcome {
            person: Person {
                id: 7,
                full_name: "Ana Silva".into(),
                age: 30,
            },
            distance: 0.123_456,
            record: PunchRecord {
                id: 1,
                username: "Ana Silva".into(),
                punch_date: "2024-03-01".into(),
                punch_time: "09:30:15".into(),
                minute: 30,
                second: 15,
                location: "Office".into(),
                created_at: "2024-03-01T09:30:15-03:00".into(),
            },
        };

        let body: serde_json::Value =
            serde_json::from_str(&punch_response(&outcome)).unwrap();
        assert_eq!(body["message"], "punch registered");
        assert_eq!(body["person"]["fullName"], "Ana Silva");
        assert_eq!(body["punchSaved"], true);
        assert_eq!(body["row"]["username"], "Ana Silva");
        // f32 widened to f64 on serialization
        assert!((body["distance"].as_f64().unwrap() - 0.1235).abs() < 1e-6);
    }

    #[test]
    fn test_not_recognized_response_carries_diagnostics() {
        let body: serde_json::Value =
            serde_json::from_str(&not_recognized_response(0.512_345, 0.45)).unwrap();
        assert_eq!(body["error"], "face not recognized");
        assert!((body["distance"].as_f64().unwrap() - 0.5123).abs() < 1e-6);
        assert!((body["threshold"].as_f64().unwrap() - 0.45).abs() < 1e-6);
    }
}
