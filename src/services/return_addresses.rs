use sea_orm::Set;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, instrument};
use validator::Validate;

use crate::{
    db::DbPool, entities::return_address, errors::ServiceError,
    repositories::ReturnAddressRepository,
};

const DUPLICATE_NAME: &str = "An address with this name already exists";

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreateReturnAddressRequest {
    #[validate(length(min = 1, max = 255, message = "Name is required"))]
    pub name: String,
    #[validate(length(min = 1, max = 2000, message = "Address is required"))]
    pub address: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateReturnAddressRequest {
    #[validate(length(min = 1, max = 255, message = "Name is required"))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 2000, message = "Address is required"))]
    pub address: Option<String>,
}

/// Service for the addresses RMA material is returned to
#[derive(Clone)]
pub struct ReturnAddressService {
    addresses: ReturnAddressRepository,
}

impl ReturnAddressService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self {
            addresses: ReturnAddressRepository::new(db_pool),
        }
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<return_address::Model>, ServiceError> {
        self.addresses.find_all().await
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i32) -> Result<return_address::Model, ServiceError> {
        self.addresses
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Return address", id))
    }

    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create(
        &self,
        request: CreateReturnAddressRequest,
    ) -> Result<return_address::Model, ServiceError> {
        request.validate()?;
        let name = required(&request.name, "Name is required")?;
        let address = required(&request.address, "Address is required")?;
        self.ensure_name_free(&name, None).await?;

        let created = self
            .addresses
            .create(return_address::ActiveModel {
                name: Set(name),
                address: Set(address),
                ..Default::default()
            })
            .await?;
        info!(return_address_id = created.id, "return address created");
        Ok(created)
    }

    #[instrument(skip(self, request))]
    pub async fn update(
        &self,
        id: i32,
        request: UpdateReturnAddressRequest,
    ) -> Result<return_address::Model, ServiceError> {
        request.validate()?;
        let mut active: return_address::ActiveModel = self.get(id).await?.into();
        if let Some(name) = request.name {
            let name = required(&name, "Name is required")?;
            self.ensure_name_free(&name, Some(id)).await?;
            active.name = Set(name);
        }
        if let Some(address) = request.address {
            active.address = Set(required(&address, "Address is required")?);
        }

        let updated = self.addresses.update(active).await?;
        info!(return_address_id = id, "return address updated");
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        self.addresses.delete(id).await?;
        info!(return_address_id = id, "return address deleted");
        Ok(())
    }

    /// Names are unique ignoring case. `except` is the address being renamed.
    async fn ensure_name_free(&self, name: &str, except: Option<i32>) -> Result<(), ServiceError> {
        match self.addresses.find_by_name(name).await? {
            Some(existing) if Some(existing.id) != except => {
                Err(ServiceError::Conflict(DUPLICATE_NAME.to_string()))
            }
            _ => Ok(()),
        }
    }
}

fn required(value: &str, message: &str) -> Result<String, ServiceError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ServiceError::ValidationError(message.to_string()));
    }
    Ok(value.to_string())
}
