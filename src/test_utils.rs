/// # Test Utilities Module
///
/// Fixtures shared by the unit tests: a schema-loaded in-memory gateway with
/// a fixed clock, a seeded shop, record builders and a capturing error sink.

use crate::error_sink::{sink_from_lines, ErrorSink};
use crate::gateway::BoutiqueCoffee;
use crate::model::{
    CoffeeId, CustomerId, MemberLevelId, NewCoffee, NewCustomer, NewMemberLevel, NewPromotion,
    NewStore, StoreId,
};
use chrono::{NaiveDate, NaiveDateTime};
use std::sync::{Arc, Mutex};

/// The instant the fixture clock always reports.
pub fn fixed_now() -> NaiveDateTime {
    fixture_time(12)
}

/// A time on the fixture day.
pub fn fixture_time(hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 6, 15)
        .and_then(|d| d.and_hms_opt(hour, 0, 0))
        .expect("valid fixture time")
}

/// In-memory gateway with the bundled schema and the fixed clock.
pub fn fixture() -> BoutiqueCoffee {
    let gateway = BoutiqueCoffee::open_in_memory()
        .expect("in-memory database")
        .with_clock(fixed_now);
    gateway.install_schema().expect("bundled schema");
    gateway
}

/// A gateway with one store, two coffees, a member level and a customer.
pub struct Shop {
    pub gateway: BoutiqueCoffee,
    pub store: StoreId,
    pub espresso: CoffeeId,
    pub latte: CoffeeId,
    pub level: MemberLevelId,
    pub customer: CustomerId,
}

/// Seeds a shop. The member level boosts rewards by 1.5 and the customer
/// starts with 20 points.
pub fn seeded() -> Shop {
    let gateway = fixture();
    let store = gateway.add_store(&store("Downtown")).expect("store");
    let espresso = gateway.add_coffee(&coffee("Espresso", 2.5)).expect("espresso");
    let latte = gateway.add_coffee(&coffee("Latte", 3.5)).expect("latte");
    let level = gateway
        .add_member_level(&NewMemberLevel {
            name: "Gold".to_string(),
            booster_factor: 1.5,
        })
        .expect("member level");
    let customer = gateway
        .add_customer(&customer("Ada", level, 20.0))
        .expect("customer");

    Shop {
        gateway,
        store,
        espresso,
        latte,
        level,
        customer,
    }
}

pub fn store(name: &str) -> NewStore {
    NewStore {
        name: name.to_string(),
        address: "1 Bean Street".to_string(),
        store_type: "kiosk".to_string(),
        gps_long: -79.95,
        gps_lat: 40.44,
    }
}

/// Coffee with intensity 7 that earns 2 points per cup and costs 10 to redeem.
pub fn coffee(name: &str, price: f64) -> NewCoffee {
    NewCoffee {
        name: name.to_string(),
        description: format!("{} from the fixture roaster", name),
        intensity: 7,
        price,
        reward_points: 2.0,
        redeem_points: 10.0,
    }
}

pub fn promotion(name: &str) -> NewPromotion {
    NewPromotion {
        name: name.to_string(),
        start_date: NaiveDate::from_ymd_opt(2024, 3, 1).expect("valid date"),
        end_date: NaiveDate::from_ymd_opt(2024, 3, 31).expect("valid date"),
    }
}

pub fn customer(first_name: &str, member_level_id: MemberLevelId, total_points: f64) -> NewCustomer {
    NewCustomer {
        first_name: first_name.to_string(),
        last_name: "Tester".to_string(),
        email: format!("{}@example.com", first_name.to_lowercase()),
        member_level_id,
        total_points,
    }
}

/// A line-logger sink together with the lines it has received.
pub fn captured_lines() -> (Arc<Mutex<Vec<String>>>, ErrorSink) {
    let lines = Arc::new(Mutex::new(Vec::new()));
    let captured = Arc::clone(&lines);
    let sink = sink_from_lines(move |line| {
        captured
            .lock()
            .expect("capture lock")
            .push(line.to_string())
    });
    (lines, sink)
}

/// Row count of `table`.
pub fn count(gateway: &BoutiqueCoffee, table: &str) -> i64 {
    gateway
        .connection()
        .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| row.get(0))
        .expect("row count")
}
