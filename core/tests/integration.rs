//! End-to-end flows against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port inside the test runtime, then
//! drives every resource client over real HTTP through the reqwest
//! transport. Catches drift between the client DTOs and the server schema.

use std::sync::Arc;

use chrono::NaiveDate;
use clinic_core::{
    ApiError, AppointmentStatus, ClientConfig, ClinicClient, JournalEntryUpdate, MemoryTokenStore,
    NewAppointment, NewJournalEntry, PageRequest, Pagination, TokenStore,
};
use mock_server::{SEED_PATIENT_EMAIL, SEED_PATIENT_PASSWORD};

async fn start_server() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { mock_server::run(listener).await.unwrap() });
    format!("http://{addr}")
}

fn client(base_url: &str) -> (ClinicClient, Arc<MemoryTokenStore>) {
    let tokens = Arc::new(MemoryTokenStore::new());
    let client = ClinicClient::new(ClientConfig::new(base_url), tokens.clone()).unwrap();
    (client, tokens)
}

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 2).unwrap()
}

#[tokio::test]
async fn patient_session() {
    let base_url = start_server().await;
    let (client, tokens) = client(&base_url);

    // Step 1: the server is up and protected routes refuse anonymous calls.
    client.health_check().await.unwrap();
    let err = client.journal().list_entries(PageRequest::default()).await.unwrap_err();
    assert!(err.is_unauthorized(), "expected 401, got {err:?}");
    assert_eq!(err.to_string(), "Not authenticated");

    // Step 2: log in; the token lands in the store.
    let pair = client
        .auth()
        .login(SEED_PATIENT_EMAIL, SEED_PATIENT_PASSWORD)
        .await
        .unwrap();
    assert_eq!(
        tokens.get("access_token").await.unwrap().as_deref(),
        Some(pair.access_token.as_str())
    );
    let me = client.auth().current_user().await.unwrap();
    assert_eq!(me.email, SEED_PATIENT_EMAIL);

    // Step 3: doctors normalize across both wire shapes.
    let doctors = client.doctors().list(Pagination::default(), None).await.unwrap();
    assert_eq!(doctors.len(), 5);
    let okafor = doctors.iter().find(|d| d.id == 1).unwrap();
    assert_eq!(okafor.specialization.as_deref(), Some("Cardiology"));
    assert_eq!(okafor.consultation_fee, 150.0);
    let fischer = doctors.iter().find(|d| d.id == 2).unwrap();
    assert_eq!(fischer.specialization.as_deref(), Some("Dermatology"));
    assert!(fischer.rating > 0.0);

    let family = client
        .doctors()
        .list(Pagination::default(), Some("  Family Medicine "))
        .await
        .unwrap();
    assert_eq!(family.len(), 1);
    assert_eq!(family[0].id, 3);

    let err = client.doctors().get(999).await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "Doctor not found");

    // Step 4: book a slot, see it disappear, then cancel.
    let slots = client.doctors().available_slots(3, date()).await.unwrap();
    assert_eq!(slots.len(), 12);
    let booking = NewAppointment {
        doctor_id: 3,
        appointment_date: date(),
        appointment_time: slots[0].clone(),
        reason: Some("Check-up".to_string()),
    };
    let booked = client.appointments().book(&booking).await.unwrap();
    assert_eq!(booked.status, AppointmentStatus::Pending);
    assert_eq!(
        booked.doctor.as_ref().and_then(|d| d.specialization.as_deref()),
        Some("Family Medicine")
    );

    let remaining = client.doctors().available_slots(3, date()).await.unwrap();
    assert_eq!(remaining.len(), 11);
    assert!(!remaining.contains(&slots[0]));

    let err = client.appointments().book(&booking).await.unwrap_err();
    assert_eq!(err.status(), Some(409));
    assert_eq!(err.to_string(), "Time slot is already booked");

    let cancelled = client.appointments().cancel(booked.id).await.unwrap();
    assert_eq!(cancelled.status, AppointmentStatus::Cancelled);
    let listed = client.appointments().list(Pagination::default()).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].status, AppointmentStatus::Cancelled);

    // Step 5: journal lifecycle through the wrapped list shape.
    assert!(client
        .journal()
        .list_entries(PageRequest::default())
        .await
        .unwrap()
        .is_empty());
    let created = client
        .journal()
        .create_entry(&NewJournalEntry {
            title: "Morning".to_string(),
            content: "Slept well".to_string(),
            mood: Some("good".to_string()),
            tags: vec!["sleep".to_string()],
        })
        .await
        .unwrap();
    let update = JournalEntryUpdate {
        content: Some("Slept very well".to_string()),
        ..JournalEntryUpdate::default()
    };
    let updated = client.journal().update_entry(created.id, &update).await.unwrap();
    assert_eq!(updated.title, "Morning");
    assert_eq!(updated.content, "Slept very well");
    assert!(updated.updated_at.is_some());

    let mut entries = client.journal().list_entries(PageRequest::default()).await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].tags, vec!["sleep".to_string()]);
    client.journal().delete_from(&mut entries, created.id).await.unwrap();
    assert!(entries.is_empty());
    let err = client.journal().get_entry(created.id).await.unwrap_err();
    assert_eq!(err.to_string(), "Entry not found");

    // Step 6: chat with a doctor.
    let room = client.chat().start_chat(2).await.unwrap();
    let again = client.chat().start_chat(2).await.unwrap();
    assert_eq!(room.id, again.id);
    let sent = client.chat().send_message(room.id, "  Is Monday ok?  ").await.unwrap();
    assert_eq!(sent.content, "Is Monday ok?");
    let messages = client.chat().messages(room.id, Pagination::default()).await.unwrap();
    assert_eq!(messages, vec![sent]);
    let rooms = client.chat().rooms(Pagination::default()).await.unwrap();
    assert_eq!(rooms.len(), 1);

    // Step 7: logout drops the token; the next call is anonymous again.
    client.auth().logout().await.unwrap();
    assert_eq!(tokens.get("access_token").await.unwrap(), None);
    let err = client.auth().current_user().await.unwrap_err();
    assert!(err.is_unauthorized());
}

#[tokio::test]
async fn unreachable_server_is_network_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let base_url = format!("http://{addr}");
    let (client, _) = client(&base_url);
    let err = client.doctors().list(Pagination::default(), None).await.unwrap_err();

    match &err {
        ApiError::Network { base_url: reported, .. } => assert_eq!(reported, &base_url),
        other => panic!("expected network error, got {other:?}"),
    }
    assert!(err.to_string().contains(&base_url));
}
