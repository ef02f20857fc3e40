//! Domain records accepted and returned by the gateway.

use crate::core::{CoffeeError, Result};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

pub type StoreId = i64;
pub type CoffeeId = i64;
pub type PromotionId = i64;
pub type MemberLevelId = i64;
pub type CustomerId = i64;
pub type PurchaseId = i64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewStore {
    pub name: String,
    pub address: String,
    pub store_type: String,
    pub gps_long: f64,
    pub gps_lat: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCoffee {
    pub name: String,
    pub description: String,
    pub intensity: i32,
    pub price: f64,
    /// Points earned per unit bought
    pub reward_points: f64,
    /// Points spent per unit redeemed
    pub redeem_points: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPromotion {
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewMemberLevel {
    pub name: String,
    pub booster_factor: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCustomer {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub member_level_id: MemberLevelId,
    pub total_points: f64,
}

/// A stored customer row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub member_level_id: MemberLevelId,
    pub total_points: f64,
}

/// One coffee within a purchase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub coffee_id: CoffeeId,
    pub purchase_quantity: i32,
    pub redeem_quantity: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPurchase {
    pub customer_id: CustomerId,
    pub store_id: StoreId,
    pub purchase_time: NaiveDateTime,
    pub items: Vec<LineItem>,
}

impl NewPurchase {
    pub fn new(
        customer_id: CustomerId,
        store_id: StoreId,
        purchase_time: NaiveDateTime,
        items: Vec<LineItem>,
    ) -> Self {
        NewPurchase {
            customer_id,
            store_id,
            purchase_time,
            items,
        }
    }

    /// Builds a purchase from three parallel lists of coffee ids, purchase
    /// quantities and redeem quantities.
    ///
    /// # Errors
    ///
    /// Returns `CoffeeError::Validation` when the lists differ in length.
    pub fn from_columns(
        customer_id: CustomerId,
        store_id: StoreId,
        purchase_time: NaiveDateTime,
        coffee_ids: &[CoffeeId],
        purchase_quantities: &[i32],
        redeem_quantities: &[i32],
    ) -> Result<Self> {
        if coffee_ids.len() != purchase_quantities.len()
            || coffee_ids.len() != redeem_quantities.len()
        {
            return Err(CoffeeError::Validation(format!(
                "line item lists differ in length: {} coffees, {} purchase quantities, {} redeem quantities",
                coffee_ids.len(),
                purchase_quantities.len(),
                redeem_quantities.len()
            )));
        }

        let items = coffee_ids
            .iter()
            .zip(purchase_quantities)
            .zip(redeem_quantities)
            .map(|((&coffee_id, &purchase_quantity), &redeem_quantity)| LineItem {
                coffee_id,
                purchase_quantity,
                redeem_quantity,
            })
            .collect();

        Ok(Self::new(customer_id, store_id, purchase_time, items))
    }

    /// Checks the purchase before anything is written.
    pub fn validate(&self) -> Result<()> {
        if self.items.is_empty() {
            return Err(CoffeeError::Validation(
                "a purchase needs at least one line item".to_string(),
            ));
        }
        Ok(())
    }
}
