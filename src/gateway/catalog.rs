//! Stores, coffees, promotions and the associations between them.

use super::BoutiqueCoffee;
use crate::core::Result;
use crate::model::{CoffeeId, NewCoffee, NewPromotion, NewStore, PromotionId, StoreId};

const INSERT_STORE: &str = "INSERT INTO store (name, address, store_type, gps_long, gps_lat)
     VALUES (?1, ?2, ?3, ?4, ?5)";

const INSERT_COFFEE: &str =
    "INSERT INTO coffee (name, description, intensity, price, reward_points, redeem_points)
     VALUES (?1, ?2, ?3, ?4, ?5, ?6)";

const INSERT_PROMOTION: &str =
    "INSERT INTO promotion (name, start_date, end_date) VALUES (?1, ?2, ?3)";

const INSERT_OFFER_COFFEE: &str = "INSERT INTO offercoffee (store_id, coffee_id) VALUES (?1, ?2)";

const INSERT_PROMOTE_FOR: &str =
    "INSERT INTO promotefor (promotion_id, coffee_id) VALUES (?1, ?2)";

const INSERT_HAS_PROMOTION: &str =
    "INSERT INTO haspromotion (store_id, promotion_id) VALUES (?1, ?2)";

const SELECT_COFFEES: &str = "SELECT coffee_id FROM coffee";

// instr() is case-sensitive and treats the keyword literally, unlike LIKE.
const SELECT_COFFEES_BY_KEYWORDS: &str =
    "SELECT coffee_id FROM coffee WHERE instr(name, ?1) > 0 AND instr(name, ?2) > 0";

impl BoutiqueCoffee {
    pub fn add_store(&self, store: &NewStore) -> Result<StoreId> {
        let result = self.insert_returning_id(
            "Add Store",
            INSERT_STORE,
            (
                &store.name,
                &store.address,
                &store.store_type,
                store.gps_long,
                store.gps_lat,
            ),
        );
        self.observe("add_store", result)
    }

    pub fn add_coffee(&self, coffee: &NewCoffee) -> Result<CoffeeId> {
        let result = self.insert_returning_id(
            "Add Coffee",
            INSERT_COFFEE,
            (
                &coffee.name,
                &coffee.description,
                coffee.intensity,
                coffee.price,
                coffee.reward_points,
                coffee.redeem_points,
            ),
        );
        self.observe("add_coffee", result)
    }

    pub fn add_promotion(&self, promotion: &NewPromotion) -> Result<PromotionId> {
        let result = self.insert_returning_id(
            "Add Promotion",
            INSERT_PROMOTION,
            (&promotion.name, promotion.start_date, promotion.end_date),
        );
        self.observe("add_promotion", result)
    }

    /// Records that a store sells a coffee.
    pub fn offer_coffee(&self, store_id: StoreId, coffee_id: CoffeeId) -> Result<()> {
        let result = self.insert_association("Offer Coffee", INSERT_OFFER_COFFEE, (store_id, coffee_id));
        self.observe("offer_coffee", result)
    }

    /// Attaches a coffee to a promotion.
    pub fn promote_for(&self, promotion_id: PromotionId, coffee_id: CoffeeId) -> Result<()> {
        let result =
            self.insert_association("Promote For", INSERT_PROMOTE_FOR, (promotion_id, coffee_id));
        self.observe("promote_for", result)
    }

    /// Records that a store runs a promotion.
    pub fn has_promotion(&self, store_id: StoreId, promotion_id: PromotionId) -> Result<()> {
        let result = self.insert_association(
            "Has Promotion",
            INSERT_HAS_PROMOTION,
            (store_id, promotion_id),
        );
        self.observe("has_promotion", result)
    }

    /// All coffee ids, in table scan order.
    pub fn get_coffees(&self) -> Result<Vec<CoffeeId>> {
        let result = self.query_ids(SELECT_COFFEES, []);
        self.observe("get_coffees", result)
    }

    /// Ids of coffees whose name contains both keywords, case-sensitively.
    ///
    /// The keywords are independent conditions; they may overlap or appear
    /// in either order within the name.
    pub fn get_coffees_by_keywords(&self, keyword1: &str, keyword2: &str) -> Result<Vec<CoffeeId>> {
        let result = self.query_ids(SELECT_COFFEES_BY_KEYWORDS, (keyword1, keyword2));
        self.observe("get_coffees_by_keywords", result)
    }
}
