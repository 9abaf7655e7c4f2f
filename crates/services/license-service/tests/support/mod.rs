//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, Response};
use axum::Router;

use common::{AppError, AppResult, ServiceConfig};
use domain::{License, LicenseStatus};
use license_service_lib::api::{create_router, AppState};
use license_service_lib::context::RequestContext;
use license_service_lib::repository::LicenseRepository;
use license_service_lib::service::LicenseManager;

/// In-memory license store, newest entries first.
#[derive(Default)]
pub struct InMemoryLicenses {
    rows: Mutex<Vec<License>>,
}

impl InMemoryLicenses {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a license directly, bypassing issuance
    pub fn insert(&self, license: License) {
        self.rows.lock().unwrap().insert(0, license);
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

#[async_trait]
impl LicenseRepository for InMemoryLicenses {
    async fn save(&self, ctx: &RequestContext, license: &License) -> AppResult<()> {
        ctx.ensure_active()?;
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|l| l.folio == license.folio) {
            return Err(AppError::conflict("License with this folio"));
        }
        rows.insert(0, license.clone());
        Ok(())
    }

    async fn find_by_folio(&self, ctx: &RequestContext, folio: &str) -> AppResult<Option<License>> {
        ctx.ensure_active()?;
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().find(|l| l.folio == folio).cloned())
    }

    async fn find_by_patient_id(
        &self,
        ctx: &RequestContext,
        patient_id: &str,
    ) -> AppResult<Vec<License>> {
        ctx.ensure_active()?;
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .filter(|l| l.patient_id == patient_id)
            .cloned()
            .collect())
    }

    async fn exists_by_folio_and_status(
        &self,
        ctx: &RequestContext,
        folio: &str,
        status: LicenseStatus,
    ) -> AppResult<bool> {
        ctx.ensure_active()?;
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().any(|l| l.folio == folio && l.status == status))
    }
}

/// Router over a fresh in-memory store, returned with the store for seeding.
pub fn test_app() -> (Router, Arc<InMemoryLicenses>) {
    let store = Arc::new(InMemoryLicenses::new());
    let service = Arc::new(LicenseManager::new(store.clone()));
    let state = AppState::new(service, ServiceConfig::default());
    (create_router(state), store)
}

pub fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
