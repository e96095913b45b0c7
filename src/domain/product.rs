use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::errors::DomainError;

const MAX_NAME_LEN: usize = 255;
// Upper bound (exclusive) of a NUMERIC(12,2) column.
const PRICE_CEILING: i64 = 10_000_000_000;

#[derive(Debug, Clone)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub price: BigDecimal,
    pub stock: i32,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct ProductInput {
    pub name: String,
    pub price: BigDecimal,
    pub stock: i32,
    pub active: bool,
}

#[derive(Debug, Clone)]
pub struct NewProduct {
    pub id: Uuid,
    pub name: String,
    pub price: BigDecimal,
    pub stock: i32,
    pub active: bool,
}

impl ProductInput {
    pub fn validate(self) -> Result<NewProduct, DomainError> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(DomainError::InvalidRequest(
                "product name must not be empty".to_string(),
            ));
        }
        if name.chars().count() > MAX_NAME_LEN {
            return Err(DomainError::InvalidRequest(format!(
                "product name must be at most {} characters",
                MAX_NAME_LEN
            )));
        }
        if self.price < BigDecimal::from(0) {
            return Err(DomainError::InvalidRequest(
                "price must not be negative".to_string(),
            ));
        }
        if self.price >= BigDecimal::from(PRICE_CEILING) {
            return Err(DomainError::InvalidRequest(format!(
                "price must be below {}",
                PRICE_CEILING
            )));
        }
        // NUMERIC(12,2) would silently round anything finer.
        let (_, scale) = self.price.normalized().as_bigint_and_exponent();
        if scale > 2 {
            return Err(DomainError::InvalidRequest(
                "price must have at most 2 decimal places".to_string(),
            ));
        }
        if self.stock < 0 {
            return Err(DomainError::InvalidRequest(
                "stock must not be negative".to_string(),
            ));
        }
        Ok(NewProduct {
            id: Uuid::new_v4(),
            name,
            price: self.price,
            stock: self.stock,
            active: self.active,
        })
    }
}
