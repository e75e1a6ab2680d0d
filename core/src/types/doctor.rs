use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A number that may arrive as JSON text, as decimal columns often do.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Numeric {
    Number(f64),
    Text(String),
}

impl Numeric {
    pub fn as_f64(&self) -> Option<f64> {
        let value = match self {
            Numeric::Number(value) => Some(*value),
            Numeric::Text(text) => text.trim().parse().ok(),
        };
        value.filter(|v| v.is_finite())
    }
}

/// Profile fields as the backend nests them under `doctor_profile`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DoctorProfileFields {
    pub specialization: Option<String>,
    pub bio: Option<String>,
    pub rating: Option<Numeric>,
    pub review_count: Option<Numeric>,
    pub consultation_fee: Option<Numeric>,
    pub years_of_experience: Option<Numeric>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A doctor exactly as the wire delivers it: profile fields may sit at the
/// top level, under `doctor_profile`, both, or neither.
#[derive(Debug, Clone, Deserialize)]
pub struct DoctorRecord {
    pub id: i64,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub avatar_url: Option<String>,
    pub specialization: Option<String>,
    pub bio: Option<String>,
    pub rating: Option<Numeric>,
    pub review_count: Option<Numeric>,
    pub consultation_fee: Option<Numeric>,
    pub years_of_experience: Option<Numeric>,
    pub doctor_profile: Option<DoctorProfileFields>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Keys `Doctor` models directly; never taken from `extra`.
const DOCTOR_FIELDS: [&str; 10] = [
    "id",
    "full_name",
    "email",
    "avatar_url",
    "specialization",
    "bio",
    "rating",
    "review_count",
    "consultation_fee",
    "years_of_experience",
];

/// Normalized doctor.
///
/// Each profile field takes the `doctor_profile` value when present and
/// falls back to the top-level one; numeric fields default to 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "DoctorRecord")]
pub struct Doctor {
    pub id: i64,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub avatar_url: Option<String>,
    pub specialization: Option<String>,
    pub bio: Option<String>,
    pub rating: f64,
    pub review_count: u32,
    pub consultation_fee: f64,
    pub years_of_experience: u32,
    /// Fields the client does not model, kept for display.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Doctor {
    pub fn display_name(&self) -> &str {
        self.full_name.as_deref().unwrap_or("Doctor")
    }
}

impl From<DoctorRecord> for Doctor {
    fn from(record: DoctorRecord) -> Self {
        let profile = record.doctor_profile.unwrap_or_default();

        let mut extra = record.extra;
        for (key, value) in profile.extra {
            if !DOCTOR_FIELDS.contains(&key.as_str()) {
                extra.entry(key).or_insert(value);
            }
        }

        Doctor {
            id: record.id,
            full_name: record.full_name,
            email: record.email,
            avatar_url: record.avatar_url,
            specialization: prefer_text(profile.specialization, record.specialization),
            bio: prefer_text(profile.bio, record.bio),
            rating: prefer_number(profile.rating, record.rating),
            review_count: prefer_count(profile.review_count, record.review_count),
            consultation_fee: prefer_number(profile.consultation_fee, record.consultation_fee),
            years_of_experience: prefer_count(
                profile.years_of_experience,
                record.years_of_experience,
            ),
            extra,
        }
    }
}

fn prefer_text(nested: Option<String>, top: Option<String>) -> Option<String> {
    nested
        .filter(|value| !value.trim().is_empty())
        .or(top.filter(|value| !value.trim().is_empty()))
}

fn prefer_number(nested: Option<Numeric>, top: Option<Numeric>) -> f64 {
    nested
        .as_ref()
        .and_then(Numeric::as_f64)
        .or_else(|| top.as_ref().and_then(Numeric::as_f64))
        .unwrap_or(0.0)
}

fn prefer_count(nested: Option<Numeric>, top: Option<Numeric>) -> u32 {
    // Saturating cast: negatives become 0.
    prefer_number(nested, top).round() as u32
}
