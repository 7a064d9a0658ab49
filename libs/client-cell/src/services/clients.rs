// libs/client-cell/src/services/clients.rs
use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use tracing::{debug, info};
use uuid::Uuid;

use shared_database::RecordStoreClient;

use crate::models::{
    ClientError, ClientRecord, ClientSearchQuery, ClientStatus, CreateClientRequest,
    CreateSessionNoteRequest, MedicalAssessment, RecordAssessmentRequest, SessionNote,
    UpdateClientRequest,
};

pub struct ClientService {
    store: Arc<RecordStoreClient>,
}

impl ClientService {
    pub fn new(store: Arc<RecordStoreClient>) -> Self {
        Self { store }
    }

    pub async fn create_client(
        &self,
        request: CreateClientRequest,
        auth_token: &str,
    ) -> Result<ClientRecord, ClientError> {
        debug!("Creating client record for {} {}", request.first_name, request.last_name);

        if request.first_name.trim().is_empty() || request.last_name.trim().is_empty() {
            return Err(ClientError::ValidationError(
                "Client name cannot be empty".to_string(),
            ));
        }

        if let Some(ref email) = request.email {
            let existing_path = format!("/rest/v1/clients?email=eq.{}", email);
            let existing: Vec<ClientRecord> = self
                .store
                .fetch_list(&existing_path, auth_token)
                .await
                .map_err(|e| ClientError::DatabaseError(e.to_string()))?;

            if !existing.is_empty() {
                return Err(ClientError::DuplicateEmail(email.clone()));
            }
        }

        let now = Utc::now();
        let body = json!({
            "first_name": request.first_name,
            "last_name": request.last_name,
            "email": request.email,
            "phone_number": request.phone_number,
            "date_of_birth": request.date_of_birth,
            "assigned_clinician_ids": request.assigned_clinician_ids.unwrap_or_default(),
            "status": ClientStatus::Active,
            "referral_source": request.referral_source,
            "created_at": now,
            "updated_at": now,
        });

        let client: ClientRecord = self
            .store
            .insert("/rest/v1/clients", auth_token, body)
            .await
            .map_err(|e| ClientError::DatabaseError(e.to_string()))?;

        info!("Client record {} created", client.id);
        Ok(client)
    }

    pub async fn get_client(
        &self,
        client_id: Uuid,
        auth_token: &str,
    ) -> Result<ClientRecord, ClientError> {
        let path = format!("/rest/v1/clients?id=eq.{}", client_id);

        self.store
            .fetch_one(&path, auth_token)
            .await
            .map_err(|e| ClientError::DatabaseError(e.to_string()))?
            .ok_or(ClientError::NotFound)
    }

    pub async fn update_client(
        &self,
        client_id: Uuid,
        request: UpdateClientRequest,
        auth_token: &str,
    ) -> Result<ClientRecord, ClientError> {
        debug!("Updating client record {}", client_id);

        let mut update_data = serde_json::Map::new();

        if let Some(first_name) = request.first_name {
            update_data.insert("first_name".to_string(), json!(first_name));
        }
        if let Some(last_name) = request.last_name {
            update_data.insert("last_name".to_string(), json!(last_name));
        }
        if let Some(email) = request.email {
            update_data.insert("email".to_string(), json!(email));
        }
        if let Some(phone_number) = request.phone_number {
            update_data.insert("phone_number".to_string(), json!(phone_number));
        }
        if let Some(clinicians) = request.assigned_clinician_ids {
            update_data.insert("assigned_clinician_ids".to_string(), json!(clinicians));
        }
        if let Some(status) = request.status {
            update_data.insert("status".to_string(), json!(status));
        }
        if let Some(referral_source) = request.referral_source {
            update_data.insert("referral_source".to_string(), json!(referral_source));
        }

        update_data.insert("updated_at".to_string(), json!(Utc::now()));

        let path = format!("/rest/v1/clients?id=eq.{}", client_id);

        self.store
            .update(&path, auth_token, serde_json::Value::Object(update_data))
            .await
            .map_err(|e| ClientError::DatabaseError(e.to_string()))
    }

    pub async fn search_clients(
        &self,
        query: ClientSearchQuery,
        auth_token: &str,
    ) -> Result<Vec<ClientRecord>, ClientError> {
        debug!("Searching clients");

        let mut query_parts = vec![];

        if let Some(name) = query.name {
            query_parts.push(format!(
                "or=(first_name.ilike.%{}%,last_name.ilike.%{}%)",
                name, name
            ));
        }
        if let Some(status) = query.status {
            query_parts.push(format!("status=eq.{}", status));
        }
        if let Some(clinician_id) = query.clinician_id {
            query_parts.push(format!("assigned_clinician_ids=cs.{{{}}}", clinician_id));
        }

        query_parts.push("order=last_name.asc".to_string());
        query_parts.push(format!("limit={}", query.limit.unwrap_or(50)));
        query_parts.push(format!("offset={}", query.offset.unwrap_or(0)));

        let path = format!("/rest/v1/clients?{}", query_parts.join("&"));

        self.store
            .fetch_list(&path, auth_token)
            .await
            .map_err(|e| ClientError::DatabaseError(e.to_string()))
    }

    // ==============================================================================
    // SESSION NOTES
    // ==============================================================================

    pub async fn add_session_note(
        &self,
        client_id: Uuid,
        clinician_id: Uuid,
        request: CreateSessionNoteRequest,
        auth_token: &str,
    ) -> Result<SessionNote, ClientError> {
        if request.content.trim().is_empty() {
            return Err(ClientError::ValidationError(
                "Session note cannot be empty".to_string(),
            ));
        }

        // The client must exist before a note can hang off it.
        self.get_client(client_id, auth_token).await?;

        let now = Utc::now();
        let body = json!({
            "client_id": client_id,
            "clinician_id": clinician_id,
            "appointment_id": request.appointment_id,
            "content": request.content,
            "created_at": now,
            "updated_at": now,
        });

        self.store
            .insert("/rest/v1/session_notes", auth_token, body)
            .await
            .map_err(|e| ClientError::DatabaseError(e.to_string()))
    }

    pub async fn list_session_notes(
        &self,
        client_id: Uuid,
        auth_token: &str,
    ) -> Result<Vec<SessionNote>, ClientError> {
        let path = format!(
            "/rest/v1/session_notes?client_id=eq.{}&order=created_at.desc",
            client_id
        );

        self.store
            .fetch_list(&path, auth_token)
            .await
            .map_err(|e| ClientError::DatabaseError(e.to_string()))
    }

    // ==============================================================================
    // MEDICAL ASSESSMENTS
    // ==============================================================================

    pub async fn record_assessment(
        &self,
        client_id: Uuid,
        clinician_id: Uuid,
        request: RecordAssessmentRequest,
        auth_token: &str,
    ) -> Result<MedicalAssessment, ClientError> {
        if request.assessment_type.trim().is_empty() {
            return Err(ClientError::ValidationError(
                "Assessment type cannot be empty".to_string(),
            ));
        }

        self.get_client(client_id, auth_token).await?;

        let body = json!({
            "client_id": client_id,
            "clinician_id": clinician_id,
            "assessment_type": request.assessment_type,
            "summary": request.summary,
            "score": request.score,
            "recorded_at": Utc::now(),
        });

        self.store
            .insert("/rest/v1/medical_assessments", auth_token, body)
            .await
            .map_err(|e| ClientError::DatabaseError(e.to_string()))
    }

    pub async fn list_assessments(
        &self,
        client_id: Uuid,
        auth_token: &str,
    ) -> Result<Vec<MedicalAssessment>, ClientError> {
        let path = format!(
            "/rest/v1/medical_assessments?client_id=eq.{}&order=recorded_at.desc",
            client_id
        );

        self.store
            .fetch_list(&path, auth_token)
            .await
            .map_err(|e| ClientError::DatabaseError(e.to_string()))
    }
}
