//! Sentinel-valued view of the gateway.
//!
//! [`LegacyGateway`] keeps the calling convention of the older loyalty
//! application: ids on success and `-1` on any failure, `1`/`-1` for
//! associations, empty lists for failed queries and `"Not Found"` for missing
//! names. Failures still reach the gateway's error sink. New code should use
//! [`BoutiqueCoffee`] directly; here "not found" and "failed" are
//! indistinguishable.

use crate::gateway::BoutiqueCoffee;
use crate::model::{
    CoffeeId, CustomerId, MemberLevelId, NewCoffee, NewCustomer, NewMemberLevel, NewPromotion,
    NewPurchase, NewStore, PromotionId, StoreId,
};
use chrono::{NaiveDate, NaiveDateTime};
use std::path::Path;

/// Value returned by every failed numeric operation.
pub const FAILURE: i64 = -1;

/// Value returned by name lookups for a missing customer.
pub const NOT_FOUND: &str = "Not Found";

fn id_or_sentinel(result: crate::core::Result<i64>) -> i64 {
    result.unwrap_or(FAILURE)
}

fn linked_or_sentinel(result: crate::core::Result<()>) -> i64 {
    result.map(|()| 1).unwrap_or(FAILURE)
}

pub struct LegacyGateway<'a> {
    gateway: &'a mut BoutiqueCoffee,
}

impl BoutiqueCoffee {
    /// Borrows the gateway through the sentinel-valued API.
    pub fn legacy(&mut self) -> LegacyGateway<'_> {
        LegacyGateway { gateway: self }
    }
}

impl<'a> LegacyGateway<'a> {
    pub fn add_store(
        &mut self,
        name: &str,
        address: &str,
        store_type: &str,
        gps_long: f64,
        gps_lat: f64,
    ) -> i64 {
        id_or_sentinel(self.gateway.add_store(&NewStore {
            name: name.to_string(),
            address: address.to_string(),
            store_type: store_type.to_string(),
            gps_long,
            gps_lat,
        }))
    }

    pub fn add_coffee(
        &mut self,
        name: &str,
        description: &str,
        intensity: i32,
        price: f64,
        reward_points: f64,
        redeem_points: f64,
    ) -> i64 {
        id_or_sentinel(self.gateway.add_coffee(&NewCoffee {
            name: name.to_string(),
            description: description.to_string(),
            intensity,
            price,
            reward_points,
            redeem_points,
        }))
    }

    pub fn offer_coffee(&mut self, store_id: StoreId, coffee_id: CoffeeId) -> i64 {
        linked_or_sentinel(self.gateway.offer_coffee(store_id, coffee_id))
    }

    pub fn add_promotion(&mut self, name: &str, start_date: NaiveDate, end_date: NaiveDate) -> i64 {
        id_or_sentinel(self.gateway.add_promotion(&NewPromotion {
            name: name.to_string(),
            start_date,
            end_date,
        }))
    }

    pub fn promote_for(&mut self, promotion_id: PromotionId, coffee_id: CoffeeId) -> i64 {
        linked_or_sentinel(self.gateway.promote_for(promotion_id, coffee_id))
    }

    pub fn has_promotion(&mut self, store_id: StoreId, promotion_id: PromotionId) -> i64 {
        linked_or_sentinel(self.gateway.has_promotion(store_id, promotion_id))
    }

    pub fn add_member_level(&mut self, name: &str, booster_factor: f64) -> i64 {
        id_or_sentinel(self.gateway.add_member_level(&NewMemberLevel {
            name: name.to_string(),
            booster_factor,
        }))
    }

    pub fn add_customer(
        &mut self,
        first_name: &str,
        last_name: &str,
        email: &str,
        member_level_id: MemberLevelId,
        total_points: f64,
    ) -> i64 {
        id_or_sentinel(self.gateway.add_customer(&NewCustomer {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            email: email.to_string(),
            member_level_id,
            total_points,
        }))
    }

    /// Records a purchase from three parallel lists. Mismatched lengths are
    /// reported and return -1 without touching the database.
    pub fn add_purchase(
        &mut self,
        customer_id: CustomerId,
        store_id: StoreId,
        purchase_time: NaiveDateTime,
        coffee_ids: &[CoffeeId],
        purchase_quantities: &[i32],
        redeem_quantities: &[i32],
    ) -> i64 {
        let purchase = NewPurchase::from_columns(
            customer_id,
            store_id,
            purchase_time,
            coffee_ids,
            purchase_quantities,
            redeem_quantities,
        );
        match purchase {
            Ok(purchase) => id_or_sentinel(self.gateway.add_purchase(&purchase)),
            Err(e) => {
                self.gateway.report("add_purchase", &e);
                FAILURE
            }
        }
    }

    pub fn get_coffees(&mut self) -> Vec<CoffeeId> {
        self.gateway.get_coffees().unwrap_or_default()
    }

    pub fn get_coffees_by_keywords(&mut self, keyword1: &str, keyword2: &str) -> Vec<CoffeeId> {
        self.gateway
            .get_coffees_by_keywords(keyword1, keyword2)
            .unwrap_or_default()
    }

    /// Point balance, or -1 when the customer is missing or the query fails.
    pub fn get_points_by_customer_id(&mut self, customer_id: CustomerId) -> f64 {
        match self.gateway.get_points_by_customer_id(customer_id) {
            Ok(Some(points)) => points,
            _ => FAILURE as f64,
        }
    }

    pub fn get_top_k_stores_in_past_x_month(&mut self, k: i64, months: i64) -> Vec<StoreId> {
        self.gateway
            .get_top_k_stores_in_past_x_month(k, months)
            .unwrap_or_default()
    }

    pub fn get_top_k_customers_in_past_x_month(&mut self, k: i64, months: i64) -> Vec<CustomerId> {
        self.gateway
            .get_top_k_customers_in_past_x_month(k, months)
            .unwrap_or_default()
    }

    /// The customer id itself when it exists, else -1.
    pub fn get_member_id(&mut self, customer_id: CustomerId) -> f64 {
        match self.gateway.get_customer(customer_id) {
            Ok(Some(customer)) => customer.id as f64,
            _ => FAILURE as f64,
        }
    }

    pub fn get_member_first_name(&mut self, customer_id: CustomerId) -> String {
        match self.gateway.get_customer(customer_id) {
            Ok(Some(customer)) => customer.first_name,
            _ => NOT_FOUND.to_string(),
        }
    }

    pub fn get_member_last_name(&mut self, customer_id: CustomerId) -> String {
        match self.gateway.get_customer(customer_id) {
            Ok(Some(customer)) => customer.last_name,
            _ => NOT_FOUND.to_string(),
        }
    }

    /// Runs a script; failures are reported to the sink and otherwise ignored.
    pub fn run_sql_script<P: AsRef<Path>>(&mut self, path: P) {
        let _ = self.gateway.run_sql_script(path);
    }
}
