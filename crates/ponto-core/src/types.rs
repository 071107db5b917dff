use serde::{Deserialize, Serialize};

/// Dimensionality every descriptor must have.
pub const DESCRIPTOR_DIM: usize = 128;

/// Face descriptor vector (128-dimensional, produced by an external encoder).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Descriptor {
    pub values: Vec<f32>,
}

impl Descriptor {
    pub fn new(values: Vec<f32>) -> Self {
        Self { values }
    }

    /// A descriptor is valid iff it has exactly [`DESCRIPTOR_DIM`] elements
    /// and every element is finite. Guards both enrollment and matching;
    /// nothing invalid reaches the store.
    pub fn is_valid(&self) -> bool {
        self.values.len() == DESCRIPTOR_DIM && self.values.iter().all(|v| v.is_finite())
    }

    /// Compute Euclidean (L2) distance to another descriptor.
    ///
    /// Only meaningful when both descriptors have the same length;
    /// callers compare validated probes against same-length candidates.
    pub fn euclidean_distance(&self, other: &Descriptor) -> f32 {
        self.values
            .iter()
            .zip(other.values.iter())
            .map(|(a, b)| (a - b).powi(2))
            .sum::<f32>()
            .sqrt()
    }
}

/// An enrolled person as stored: reference descriptor plus metadata.
///
/// `full_name` is the natural key — re-enrolling the same name overwrites
/// `age`, `descriptor` and `updated_at` in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    pub id: i64,
    pub full_name: String,
    pub age: i64,
    pub descriptor: Descriptor,
    pub updated_at: String,
}

/// The identity fields echoed back to callers (no descriptor).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub id: i64,
    pub full_name: String,
    pub age: i64,
}

/// One attendance event. Append-only; `username` is a snapshot of the
/// matched identity's name at punch time, not a foreign key, so later
/// identity edits never alter history.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PunchRecord {
    pub id: i64,
    pub username: String,
    pub punch_date: String,
    pub punch_time: String,
    pub minute: u32,
    pub second: u32,
    pub location: String,
    pub created_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor_of(value: f32) -> Descriptor {
        Descriptor::new(vec![value; DESCRIPTOR_DIM])
    }

    #[test]
    fn test_distance_to_self_is_zero() {
        let a = descriptor_of(0.25);
        assert_eq!(a.euclidean_distance(&a), 0.0);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let mut values = vec![0.0; DESCRIPTOR_DIM];
        values[0] = 1.5;
        values[7] = -0.5;
        let a = Descriptor::new(values);
        let b = descriptor_of(0.1);
        assert_eq!(a.euclidean_distance(&b), b.euclidean_distance(&a));
    }

    #[test]
    fn test_distance_matches_l2_norm() {
        // 3-4-5 triangle in the first two coordinates
        let mut a = vec![0.0; DESCRIPTOR_DIM];
        let mut b = vec![0.0; DESCRIPTOR_DIM];
        a[0] = 3.0;
        b[1] = 4.0;
        let d = Descriptor::new(a).euclidean_distance(&Descriptor::new(b));
        assert!((d - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_valid_descriptor() {
        assert!(descriptor_of(0.5).is_valid());
    }

    #[test]
    fn test_rejects_wrong_length() {
        assert!(!Descriptor::new(vec![0.5; 127]).is_valid());
        assert!(!Descriptor::new(vec![0.5; 129]).is_valid());
        assert!(!Descriptor::new(Vec::new()).is_valid());
    }

    #[test]
    fn test_rejects_non_finite_elements() {
        let mut values = vec![0.5; DESCRIPTOR_DIM];
        values[63] = f32::NAN;
        assert!(!Descriptor::new(values.clone()).is_valid());
        values[63] = f32::INFINITY;
        assert!(!Descriptor::new(values.clone()).is_valid());
        values[63] = f32::NEG_INFINITY;
        assert!(!Descriptor::new(values).is_valid());
    }
}
