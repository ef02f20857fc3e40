//! Member levels, customers and point balances.

use super::BoutiqueCoffee;
use crate::core::Result;
use crate::model::{Customer, CustomerId, MemberLevelId, NewCustomer, NewMemberLevel};
use rusqlite::OptionalExtension;

const INSERT_MEMBER_LEVEL: &str =
    "INSERT INTO memberlevel (name, booster_factor) VALUES (?1, ?2)";

const INSERT_CUSTOMER: &str =
    "INSERT INTO customer (first_name, last_name, email, memberlevel_id, total_points)
     VALUES (?1, ?2, ?3, ?4, ?5)";

const SELECT_POINTS: &str = "SELECT total_points FROM customer WHERE customer_id = ?1";

const SELECT_CUSTOMER: &str =
    "SELECT customer_id, first_name, last_name, email, memberlevel_id, total_points
     FROM customer
     WHERE customer_id = ?1";

impl BoutiqueCoffee {
    pub fn add_member_level(&self, level: &NewMemberLevel) -> Result<MemberLevelId> {
        let result = self.insert_returning_id(
            "Add Member Level",
            INSERT_MEMBER_LEVEL,
            (&level.name, level.booster_factor),
        );
        self.observe("add_member_level", result)
    }

    /// Adds a customer; the member level must already exist.
    pub fn add_customer(&self, customer: &NewCustomer) -> Result<CustomerId> {
        let result = self.insert_returning_id(
            "Add Customer",
            INSERT_CUSTOMER,
            (
                &customer.first_name,
                &customer.last_name,
                &customer.email,
                customer.member_level_id,
                customer.total_points,
            ),
        );
        self.observe("add_customer", result)
    }

    /// Current point balance, or `None` when the customer does not exist.
    pub fn get_points_by_customer_id(&self, customer_id: CustomerId) -> Result<Option<f64>> {
        let result = self.points(customer_id);
        self.observe("get_points_by_customer_id", result)
    }

    pub fn get_customer(&self, customer_id: CustomerId) -> Result<Option<Customer>> {
        let result = self.customer(customer_id);
        self.observe("get_customer", result)
    }

    pub fn customer_exists(&self, customer_id: CustomerId) -> Result<bool> {
        Ok(self.get_customer(customer_id)?.is_some())
    }

    fn points(&self, customer_id: CustomerId) -> Result<Option<f64>> {
        let mut stmt = self.conn.prepare_cached(SELECT_POINTS)?;
        let points: Option<f64> = stmt.query_row([customer_id], |row| row.get(0)).optional()?;
        Ok(points)
    }

    fn customer(&self, customer_id: CustomerId) -> Result<Option<Customer>> {
        let mut stmt = self.conn.prepare_cached(SELECT_CUSTOMER)?;
        let customer = stmt
            .query_row([customer_id], |row| {
                Ok(Customer {
                    id: row.get(0)?,
                    first_name: row.get(1)?,
                    last_name: row.get(2)?,
                    email: row.get(3)?,
                    member_level_id: row.get(4)?,
                    total_points: row.get(5)?,
                })
            })
            .optional()?;
        Ok(customer)
    }
}

#[cfg(test)]
mod tests {
    use crate::core::CoffeeError;
    use crate::model::NewMemberLevel;
    use crate::test_utils::{customer, fixture};

    #[test]
    fn test_add_member_level_and_customer() {
        let fx = fixture();
        let gold = fx
            .add_member_level(&NewMemberLevel { name: "Gold".to_string(), booster_factor: 1.5 })
            .unwrap();
        let id = fx.add_customer(&customer("Ada", gold, 42.5)).unwrap();

        let stored = fx.get_customer(id).unwrap().unwrap();
        assert_eq!(stored.id, id);
        assert_eq!(stored.first_name, "Ada");
        assert_eq!(stored.last_name, "Tester");
        assert_eq!(stored.email.as_deref(), Some("ada@example.com"));
        assert_eq!(stored.member_level_id, gold);
        assert_eq!(stored.total_points, 42.5);
    }

    #[test]
    fn test_customer_requires_existing_member_level() {
        let fx = fixture();
        let result = fx.add_customer(&customer("Ada", 77, 0.0));
        assert!(matches!(result, Err(CoffeeError::Database(_))));
    }

    #[test]
    fn test_points_for_existing_customer() {
        let fx = fixture();
        let level = fx
            .add_member_level(&NewMemberLevel { name: "Basic".to_string(), booster_factor: 1.0 })
            .unwrap();
        let id = fx.add_customer(&customer("Grace", level, 42.5)).unwrap();

        assert_eq!(fx.get_points_by_customer_id(id).unwrap(), Some(42.5));
    }

    #[test]
    fn test_points_for_missing_customer_is_none() {
        let fx = fixture();
        assert_eq!(fx.get_points_by_customer_id(12345).unwrap(), None);
        assert!(!fx.customer_exists(12345).unwrap());
    }

    #[test]
    fn test_same_customer_twice_gets_new_id() {
        let fx = fixture();
        let level = fx
            .add_member_level(&NewMemberLevel { name: "Basic".to_string(), booster_factor: 1.0 })
            .unwrap();
        let a = fx.add_customer(&customer("Linus", level, 0.0)).unwrap();
        let b = fx.add_customer(&customer("Linus", level, 0.0)).unwrap();
        assert_ne!(a, b);
        assert!(fx.customer_exists(a).unwrap());
    }
}
