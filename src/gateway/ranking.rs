//! Top-K rankings over a trailing window of months.
//!
//! SQLite has no stored procedures, so the two ranking procedures are named
//! statements kept here. Both rank by revenue (quantity bought times coffee
//! price) of purchases made at or after the window start, highest first,
//! ties broken by the lower id.

use super::BoutiqueCoffee;
use crate::core::{CoffeeError, Result};
use crate::model::{CustomerId, StoreId};
use chrono::{Months, NaiveDateTime};
use rusqlite::TransactionBehavior;

const TOP_STORES: &str = "SELECT p.store_id
     FROM purchase p
     JOIN buycoffee b ON b.purchase_id = p.purchase_id
     JOIN coffee c ON c.coffee_id = b.coffee_id
     WHERE p.purchase_time >= ?2
     GROUP BY p.store_id
     ORDER BY SUM(b.purchase_quantity * c.price) DESC, p.store_id ASC
     LIMIT ?1";

const TOP_CUSTOMERS: &str = "SELECT p.customer_id
     FROM purchase p
     JOIN buycoffee b ON b.purchase_id = p.purchase_id
     JOIN coffee c ON c.coffee_id = b.coffee_id
     WHERE p.purchase_time >= ?2
     GROUP BY p.customer_id
     ORDER BY SUM(b.purchase_quantity * c.price) DESC, p.customer_id ASC
     LIMIT ?1";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankingProcedure {
    TopStores,
    TopCustomers,
}

impl RankingProcedure {
    pub fn name(self) -> &'static str {
        match self {
            RankingProcedure::TopStores => "top_stores",
            RankingProcedure::TopCustomers => "top_customers",
        }
    }

    fn sql(self) -> &'static str {
        match self {
            RankingProcedure::TopStores => TOP_STORES,
            RankingProcedure::TopCustomers => TOP_CUSTOMERS,
        }
    }
}

/// Start of a window reaching `months` calendar months back from `now`.
pub fn months_before(now: NaiveDateTime, months: u32) -> Result<NaiveDateTime> {
    now.checked_sub_months(Months::new(months)).ok_or_else(|| {
        CoffeeError::Validation(format!("{} months before {} is out of range", months, now))
    })
}

impl BoutiqueCoffee {
    /// Ids of the `k` highest-revenue stores over the past `months` months.
    ///
    /// Returns fewer than `k` ids when fewer stores had purchases.
    pub fn get_top_k_stores_in_past_x_month(&mut self, k: i64, months: i64) -> Result<Vec<StoreId>> {
        let result = self.call_ranking(RankingProcedure::TopStores, k, months);
        self.observe("get_top_k_stores_in_past_x_month", result)
    }

    /// Ids of the `k` highest-spending customers over the past `months` months.
    pub fn get_top_k_customers_in_past_x_month(
        &mut self,
        k: i64,
        months: i64,
    ) -> Result<Vec<CustomerId>> {
        let result = self.call_ranking(RankingProcedure::TopCustomers, k, months);
        self.observe("get_top_k_customers_in_past_x_month", result)
    }

    fn call_ranking(&mut self, procedure: RankingProcedure, k: i64, months: i64) -> Result<Vec<i64>> {
        if k < 0 {
            return Err(CoffeeError::Validation(format!(
                "{}: k must not be negative, got {}",
                procedure.name(),
                k
            )));
        }
        let months = u32::try_from(months).map_err(|_| {
            CoffeeError::Validation(format!(
                "{}: months must be between 0 and {}, got {}",
                procedure.name(),
                u32::MAX,
                months
            ))
        })?;
        let since = months_before((self.clock)(), months)?;

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Deferred)?;
        let ids = {
            let mut stmt = tx.prepare_cached(procedure.sql())?;
            let rows = stmt.query_map((k, since), |row| row.get(0))?;
            rows.collect::<std::result::Result<Vec<i64>, _>>()?
        };
        tx.commit()?;
        Ok(ids)
    }
}
