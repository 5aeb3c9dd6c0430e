#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use mongodb::bson::doc;
use serde_json::Value;
use tower::ServiceExt;

use tools_manufacturer_api::auth::TokenService;
use tools_manufacturer_api::database::{DocumentStore, MemoryStore};
use tools_manufacturer_api::payments::{PaymentError, PaymentIntent, PaymentProvider};
use tools_manufacturer_api::types::Collection;
use tools_manufacturer_api::{app, AppState};

pub const SECRET: &str = "test-secret";

/// Payment provider that records requests instead of calling out
#[derive(Default)]
pub struct FakePayments {
    pub calls: Mutex<Vec<(i64, String)>>,
}

#[async_trait]
impl PaymentProvider for FakePayments {
    async fn create_intent(&self, amount: i64, currency: &str) -> Result<PaymentIntent, PaymentError> {
        let mut calls = self.calls.lock().unwrap();
        calls.push((amount, currency.to_string()));
        Ok(PaymentIntent {
            id: format!("pi_{}", calls.len()),
            client_secret: format!("pi_{}_secret_test", calls.len()),
        })
    }
}

/// Router over an in-memory store with handles for seeding and inspection
pub struct TestApp {
    pub router: Router,
    pub memory: MemoryStore,
    pub tokens: TokenService,
    pub payments: Arc<FakePayments>,
}

impl TestApp {
    pub fn new() -> Self {
        let memory = MemoryStore::new();
        Self::with_store(memory.clone(), Arc::new(memory))
    }

    /// Serve `store`, keeping `memory` as the backing data for assertions
    pub fn with_store(memory: MemoryStore, store: Arc<dyn DocumentStore>) -> Self {
        let payments = Arc::new(FakePayments::default());
        let state = AppState::new(store, TokenService::new(SECRET, 10), payments.clone(), "usd");
        Self {
            router: app(state),
            memory,
            tokens: TokenService::new(SECRET, 10),
            payments,
        }
    }

    pub fn bearer(&self, email: &str) -> String {
        format!("Bearer {}", self.tokens.issue(email).expect("issue token"))
    }

    pub async fn seed_user(&self, email: &str, role: &str) {
        self.memory
            .update_one(Collection::Users, doc! { "email": email }, doc! { "role": role }, true)
            .await
            .expect("seed user");
    }

    /// Seed an admin and return its Authorization header
    pub async fn admin(&self, email: &str) -> String {
        self.seed_user(email, "admin").await;
        self.bearer(email)
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        authorization: Option<&str>,
        body: Option<Value>,
    ) -> Result<(StatusCode, Value)> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(auth) = authorization {
            builder = builder.header(header::AUTHORIZATION, auth);
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&json)?))?,
            None => builder.body(Body::empty())?,
        };
        self.send(request).await
    }

    /// Send `body` verbatim as `application/json`
    pub async fn request_raw(&self, method: Method, uri: &str, body: &'static str) -> Result<(StatusCode, Value)> {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))?;
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> Result<(StatusCode, Value)> {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .context("router call failed")?;
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
        let value = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
        Ok((status, value))
    }

    pub async fn get(&self, uri: &str, authorization: Option<&str>) -> Result<(StatusCode, Value)> {
        self.request(Method::GET, uri, authorization, None).await
    }
}
