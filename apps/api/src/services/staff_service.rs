//! Staff registration and login.
//!
//! ## Login Flow
//! ```text
//! {phoneNumber, password}
//!      │  shape rules (phone pattern, password 5-15)
//!      ▼
//! staff_by_phone ── None ───────────────┐
//!      │                                ▼
//! verify_password (blocking pool) ── false ──► 400 "Invalid phone number or password"
//!      │ true
//!      ▼
//! JwtManager::issue ──► {userId, name, phoneNumber, accessToken}
//! ```

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::{hash_password, verify_password, JwtManager};
use crate::error::ApiResult;
use till_core::validation::{validate_password, validate_person_name, validate_phone_number};
use till_core::{CoreError, Staff, ValidationError};
use till_db::Store;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterStaffRequest {
    pub phone_number: Option<String>,
    pub name: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub phone_number: Option<String>,
    pub password: Option<String>,
}

/// What register and login hand back.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffSession {
    pub user_id: String,
    pub name: String,
    pub phone_number: String,
    pub access_token: String,
}

#[derive(Clone)]
pub struct StaffService {
    store: Arc<dyn Store>,
    jwt: Arc<JwtManager>,
}

fn required(field: &str, value: Option<String>) -> Result<String, ValidationError> {
    value.ok_or_else(|| ValidationError::Required {
        field: field.to_string(),
    })
}

impl StaffService {
    pub fn new(store: Arc<dyn Store>, jwt: Arc<JwtManager>) -> Self {
        StaffService { store, jwt }
    }

    pub async fn register(&self, req: RegisterStaffRequest) -> ApiResult<StaffSession> {
        let phone_number = required("phoneNumber", req.phone_number)?;
        let name = required("name", req.name)?;
        let password = required("password", req.password)?;

        validate_phone_number(&phone_number)?;
        validate_person_name(&name)?;
        validate_password(&password)?;

        if self.store.staff_by_phone(&phone_number).await?.is_some() {
            return Err(CoreError::PhoneNumberTaken(phone_number).into());
        }

        let staff = Staff {
            id: Uuid::new_v4().to_string(),
            phone_number,
            name,
            password_hash: hash_password(password).await?,
            created_at: Utc::now(),
        };
        self.store.insert_staff(&staff).await?;

        info!(staff_id = %staff.id, "Staff registered");
        self.session(&staff)
    }

    pub async fn login(&self, req: LoginRequest) -> ApiResult<StaffSession> {
        let phone_number = required("phoneNumber", req.phone_number)?;
        let password = required("password", req.password)?;

        validate_phone_number(&phone_number)?;
        validate_password(&password)?;

        let Some(staff) = self.store.staff_by_phone(&phone_number).await? else {
            warn!("Login for unknown phone number");
            return Err(CoreError::InvalidCredentials.into());
        };

        if !verify_password(password, staff.password_hash.clone()).await? {
            warn!(staff_id = %staff.id, "Login with wrong password");
            return Err(CoreError::InvalidCredentials.into());
        }

        info!(staff_id = %staff.id, "Staff logged in");
        self.session(&staff)
    }

    fn session(&self, staff: &Staff) -> ApiResult<StaffSession> {
        Ok(StaffSession {
            user_id: staff.id.clone(),
            name: staff.name.clone(),
            phone_number: staff.phone_number.clone(),
            access_token: self.jwt.issue(staff)?,
        })
    }
}
