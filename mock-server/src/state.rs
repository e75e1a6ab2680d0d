//! In-memory tables and seed data.
//!
//! Doctors are seeded in both wire shapes the real backend produces: newer
//! rows nest profile fields under `doctor_profile`, older rows carry them at
//! the top level.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde::Serialize;
use serde_json::{json, Value};
use tokio::sync::RwLock;

pub const SEED_PATIENT_EMAIL: &str = "patient@example.com";
pub const SEED_PATIENT_PASSWORD: &str = "password123";

/// Bookable half-hour slots, identical for every doctor and day.
pub const SLOT_TIMES: [&str; 12] = [
    "09:00", "09:30", "10:00", "10:30", "11:00", "11:30", "14:00", "14:30", "15:00", "15:30",
    "16:00", "16:30",
];

#[derive(Clone, Debug, Serialize)]
pub struct UserRow {
    pub id: i64,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub full_name: Option<String>,
    pub role: String,
}

#[derive(Clone, Debug)]
pub struct DoctorRow {
    pub id: i64,
    pub full_name: String,
    pub email: String,
    pub specialization: String,
    pub bio: String,
    pub rating: f64,
    pub review_count: u32,
    pub consultation_fee: f64,
    pub years_of_experience: u32,
    pub nested_profile: bool,
}

impl DoctorRow {
    pub fn to_json(&self) -> Value {
        if self.nested_profile {
            json!({
                "id": self.id,
                "full_name": self.full_name,
                "email": self.email,
                "is_available": true,
                "doctor_profile": {
                    "specialization": self.specialization,
                    "bio": self.bio,
                    "rating": self.rating,
                    "review_count": self.review_count,
                    "consultation_fee": format!("{:.2}", self.consultation_fee),
                    "years_of_experience": self.years_of_experience,
                }
            })
        } else {
            json!({
                "id": self.id,
                "full_name": self.full_name,
                "email": self.email,
                "specialization": self.specialization,
                "bio": self.bio,
                "rating": self.rating,
                "review_count": self.review_count,
                "consultation_fee": self.consultation_fee,
                "years_of_experience": self.years_of_experience,
            })
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct JournalRow {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub content: String,
    pub mood: Option<String>,
    pub tags: Vec<String>,
    pub created_at: String,
    pub updated_at: Option<String>,
}

#[derive(Clone, Debug)]
pub struct AppointmentRow {
    pub id: i64,
    pub patient_id: i64,
    pub doctor_id: i64,
    pub appointment_date: NaiveDate,
    pub appointment_time: String,
    pub status: String,
    pub reason: Option<String>,
    pub created_at: String,
}

#[derive(Clone, Debug)]
pub struct RoomRow {
    pub id: i64,
    pub patient_id: i64,
    pub doctor_id: i64,
    pub created_at: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct MessageRow {
    pub id: i64,
    pub room_id: i64,
    pub sender_id: i64,
    pub content: String,
    pub created_at: String,
    pub is_read: bool,
}

#[derive(Debug, Default)]
pub struct Db {
    pub users: Vec<UserRow>,
    pub sessions: HashMap<String, i64>,
    pub doctors: Vec<DoctorRow>,
    pub journal: Vec<JournalRow>,
    pub appointments: Vec<AppointmentRow>,
    pub rooms: Vec<RoomRow>,
    pub messages: Vec<MessageRow>,
    next_id: i64,
}

impl Db {
    pub fn seeded() -> Self {
        let mut db = Db {
            next_id: 100,
            ..Db::default()
        };
        db.users.push(UserRow {
            id: 1,
            email: SEED_PATIENT_EMAIL.to_string(),
            password: SEED_PATIENT_PASSWORD.to_string(),
            full_name: Some("Pat Patient".to_string()),
            role: "patient".to_string(),
        });
        db.doctors = vec![
            doctor(1, "Dr. Amara Okafor", "Cardiology", 4.8, 124, 150.0, 15, true),
            doctor(2, "Dr. Lena Fischer", "Dermatology", 4.6, 88, 120.0, 9, false),
            doctor(3, "Dr. Rahul Mehta", "Family Medicine", 4.9, 210, 90.0, 20, true),
            doctor(4, "Dr. Sofia Reyes", "Pediatrics", 4.7, 156, 100.0, 12, true),
            doctor(5, "Dr. Kenji Watanabe", "Cardiology", 4.5, 64, 160.0, 7, false),
        ];
        db
    }

    pub fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    pub fn doctor(&self, id: i64) -> Option<&DoctorRow> {
        self.doctors.iter().find(|d| d.id == id)
    }

    pub fn user(&self, id: i64) -> Option<&UserRow> {
        self.users.iter().find(|u| u.id == id)
    }

    pub fn appointment_json(&self, row: &AppointmentRow) -> Value {
        json!({
            "id": row.id,
            "patient_id": row.patient_id,
            "doctor_id": row.doctor_id,
            "appointment_date": row.appointment_date,
            "appointment_time": row.appointment_time,
            "status": row.status,
            "reason": row.reason,
            "notes": Value::Null,
            "created_at": row.created_at,
            "doctor": self.doctor(row.doctor_id).map(DoctorRow::to_json),
            "patient": self.user(row.patient_id),
        })
    }

    pub fn room_json(&self, row: &RoomRow) -> Value {
        let last_message = self.messages.iter().rev().find(|m| m.room_id == row.id);
        json!({
            "id": row.id,
            "patient_id": row.patient_id,
            "doctor_id": row.doctor_id,
            "created_at": row.created_at,
            "doctor": self.doctor(row.doctor_id).map(DoctorRow::to_json),
            "last_message": last_message,
        })
    }
}

#[allow(clippy::too_many_arguments)]
fn doctor(
    id: i64,
    name: &str,
    specialization: &str,
    rating: f64,
    review_count: u32,
    consultation_fee: f64,
    years_of_experience: u32,
    nested_profile: bool,
) -> DoctorRow {
    let slug = name.trim_start_matches("Dr. ").to_lowercase().replace(' ', ".");
    DoctorRow {
        id,
        full_name: name.to_string(),
        email: format!("{slug}@clinic.example"),
        specialization: specialization.to_string(),
        bio: format!("{specialization} specialist with {years_of_experience} years of practice."),
        rating,
        review_count,
        consultation_fee,
        years_of_experience,
        nested_profile,
    }
}

#[derive(Clone, Default)]
pub struct AppState {
    pub db: Arc<RwLock<Db>>,
}

impl AppState {
    pub fn seeded() -> Self {
        Self {
            db: Arc::new(RwLock::new(Db::seeded())),
        }
    }
}

/// Naive ISO-8601 timestamp, as the journal table stores them.
pub fn naive_now() -> String {
    Utc::now().naive_utc().format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
}

pub fn rfc3339_now() -> String {
    Utc::now().to_rfc3339()
}

/// Apply `skip`/`limit` with a cap of 100 items.
pub fn paginate<T>(
    items: impl Iterator<Item = T>,
    skip: Option<usize>,
    limit: Option<usize>,
) -> Vec<T> {
    items
        .skip(skip.unwrap_or(0))
        .take(limit.unwrap_or(20).min(100))
        .collect()
}
