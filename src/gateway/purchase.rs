//! Recording purchases.

use super::BoutiqueCoffee;
use crate::core::{CoffeeError, Result};
use crate::model::{NewPurchase, PurchaseId};
use rusqlite::TransactionBehavior;
use tracing::debug;

const INSERT_PURCHASE: &str =
    "INSERT INTO purchase (customer_id, store_id, purchase_time) VALUES (?1, ?2, ?3)";

const INSERT_LINE_ITEM: &str =
    "INSERT INTO buycoffee (purchase_id, coffee_id, purchase_quantity, redeem_quantity)
     VALUES (?1, ?2, ?3, ?4)";

impl BoutiqueCoffee {
    /// Records a purchase header and all of its line items atomically.
    ///
    /// The purchase is validated before any statement runs. Writes happen in
    /// an immediate (write-locked) transaction; if any insert fails, the
    /// header and every line item already written are rolled back.
    pub fn add_purchase(&mut self, purchase: &NewPurchase) -> Result<PurchaseId> {
        let result = self.insert_purchase(purchase);
        self.observe("add_purchase", result)
    }

    fn insert_purchase(&mut self, purchase: &NewPurchase) -> Result<PurchaseId> {
        purchase.validate()?;

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let rows = tx.execute(
            INSERT_PURCHASE,
            (purchase.customer_id, purchase.store_id, purchase.purchase_time),
        )?;
        if rows == 0 {
            return Err(CoffeeError::NoRowsAffected {
                operation: "Add Purchase",
            });
        }
        let purchase_id = tx.last_insert_rowid();

        {
            let mut stmt = tx.prepare_cached(INSERT_LINE_ITEM)?;
            for item in &purchase.items {
                let rows = stmt.execute((
                    purchase_id,
                    item.coffee_id,
                    item.purchase_quantity,
                    item.redeem_quantity,
                ))?;
                if rows == 0 {
                    return Err(CoffeeError::NoRowsAffected {
                        operation: "Add Purchase line item",
                    });
                }
            }
        }

        tx.commit()?;
        debug!(
            "Recorded purchase {} with {} line items",
            purchase_id,
            purchase.items.len()
        );
        Ok(purchase_id)
    }
}

#[cfg(test)]
mod tests {
    use crate::core::CoffeeError;
    use crate::model::{LineItem, NewPurchase};
    use crate::test_utils::{captured_lines, count, seeded, fixture_time};

    #[test]
    fn test_add_purchase_writes_header_and_items() {
        let mut shop = seeded();
        let purchase = NewPurchase::new(
            shop.customer,
            shop.store,
            fixture_time(9),
            vec![
                LineItem { coffee_id: shop.espresso, purchase_quantity: 2, redeem_quantity: 0 },
                LineItem { coffee_id: shop.latte, purchase_quantity: 1, redeem_quantity: 0 },
            ],
        );

        let id = shop.gateway.add_purchase(&purchase).unwrap();
        assert!(id >= 0);
        assert_eq!(count(&shop.gateway, "purchase"), 1);
        assert_eq!(count(&shop.gateway, "buycoffee"), 2);
        assert!(shop.gateway.connection().is_autocommit());
    }

    #[test]
    fn test_purchase_updates_points_through_trigger() {
        let mut shop = seeded();
        // espresso rewards 2 points per cup, latte redeems for 10
        let purchase = NewPurchase::new(
            shop.customer,
            shop.store,
            fixture_time(9),
            vec![
                LineItem { coffee_id: shop.espresso, purchase_quantity: 3, redeem_quantity: 0 },
                LineItem { coffee_id: shop.latte, purchase_quantity: 0, redeem_quantity: 1 },
            ],
        );
        shop.gateway.add_purchase(&purchase).unwrap();

        // 20 starting points + 3 * 2 * 1.5 booster - 10 redeemed
        assert_eq!(
            shop.gateway.get_points_by_customer_id(shop.customer).unwrap(),
            Some(19.0)
        );
    }

    #[test]
    fn test_unknown_coffee_rolls_back_header() {
        let mut shop = seeded();
        let (lines, sink) = captured_lines();
        shop.gateway.set_error_sink(sink);

        let purchase = NewPurchase::new(
            shop.customer,
            shop.store,
            fixture_time(9),
            vec![
                LineItem { coffee_id: shop.espresso, purchase_quantity: 1, redeem_quantity: 0 },
                LineItem { coffee_id: 9999, purchase_quantity: 1, redeem_quantity: 0 },
            ],
        );

        let result = shop.gateway.add_purchase(&purchase);
        assert!(matches!(result, Err(CoffeeError::Database(_))));
        assert_eq!(count(&shop.gateway, "purchase"), 0);
        assert_eq!(count(&shop.gateway, "buycoffee"), 0);
        assert!(shop.gateway.connection().is_autocommit());
        assert_foreign_key_failure(&lines.lock().unwrap());

        // points untouched by the rolled back line item
        assert_eq!(
            shop.gateway.get_points_by_customer_id(shop.customer).unwrap(),
            Some(20.0)
        );
    }

    #[test]
    fn test_redeeming_unknown_coffee_reports_foreign_key() {
        let mut shop = seeded();
        let (lines, sink) = captured_lines();
        shop.gateway.set_error_sink(sink);

        let purchase = NewPurchase::new(
            shop.customer,
            shop.store,
            fixture_time(9),
            vec![LineItem { coffee_id: 9999, purchase_quantity: 0, redeem_quantity: 2 }],
        );

        assert!(matches!(
            shop.gateway.add_purchase(&purchase),
            Err(CoffeeError::Database(_))
        ));
        assert_foreign_key_failure(&lines.lock().unwrap());
        assert_eq!(count(&shop.gateway, "purchase"), 0);
        assert_eq!(
            shop.gateway.get_points_by_customer_id(shop.customer).unwrap(),
            Some(20.0)
        );
    }

    fn assert_foreign_key_failure(lines: &[String]) {
        assert_eq!(lines.len(), 4, "{:?}", lines);
        assert_eq!(lines[0], "SQL ERROR");
        assert_eq!(lines[1], "FOREIGN KEY constraint failed");
        assert_eq!(lines[2], "ConstraintViolation");
        assert_eq!(lines[3], rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY.to_string());
    }

    #[test]
    fn test_unknown_customer_fails_without_writes() {
        let mut shop = seeded();
        let purchase = NewPurchase::new(
            31337,
            shop.store,
            fixture_time(9),
            vec![LineItem { coffee_id: shop.espresso, purchase_quantity: 1, redeem_quantity: 0 }],
        );

        assert!(shop.gateway.add_purchase(&purchase).is_err());
        assert_eq!(count(&shop.gateway, "purchase"), 0);
    }

    #[test]
    fn test_duplicate_coffee_in_one_purchase_rolls_back() {
        let mut shop = seeded();
        let item = LineItem { coffee_id: shop.espresso, purchase_quantity: 1, redeem_quantity: 0 };
        let purchase = NewPurchase::new(shop.customer, shop.store, fixture_time(9), vec![item, item]);

        assert!(shop.gateway.add_purchase(&purchase).is_err());
        assert_eq!(count(&shop.gateway, "purchase"), 0);
        assert_eq!(count(&shop.gateway, "buycoffee"), 0);
    }

    #[test]
    fn test_empty_purchase_is_rejected_before_writing() {
        let mut shop = seeded();
        let (lines, sink) = captured_lines();
        shop.gateway.set_error_sink(sink);

        let purchase = NewPurchase::new(shop.customer, shop.store, fixture_time(9), Vec::new());
        let result = shop.gateway.add_purchase(&purchase);

        assert!(matches!(result, Err(CoffeeError::Validation(_))));
        assert_eq!(count(&shop.gateway, "purchase"), 0);
        assert_eq!(lines.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_gateway_usable_after_failed_purchase() {
        let mut shop = seeded();
        let bad = NewPurchase::new(
            shop.customer,
            shop.store,
            fixture_time(9),
            vec![LineItem { coffee_id: 9999, purchase_quantity: 1, redeem_quantity: 0 }],
        );
        assert!(shop.gateway.add_purchase(&bad).is_err());

        let good = NewPurchase::new(
            shop.customer,
            shop.store,
            fixture_time(10),
            vec![LineItem { coffee_id: shop.latte, purchase_quantity: 1, redeem_quantity: 0 }],
        );
        assert!(shop.gateway.add_purchase(&good).is_ok());
        assert_eq!(count(&shop.gateway, "purchase"), 1);
    }
}
