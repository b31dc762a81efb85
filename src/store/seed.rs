//! Demo fixtures loaded at startup.

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::models::delivery::{Customer, Delivery, DeliveryStatus, GeoPoint, Restaurant};
use crate::models::user::User;

pub struct SeedData {
    pub scheduled: Vec<Delivery>,
    pub history: Vec<Delivery>,
    pub riders: Vec<User>,
}

impl SeedData {
    pub fn generate(now: DateTime<Utc>) -> Self {
        Self {
            scheduled: scheduled(now),
            history: history(),
            riders: vec![primary_rider()],
        }
    }
}

fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .unwrap_or_default()
}

fn restaurant(id: &str, name: &str, address: &str, lat: f64, lng: f64) -> Restaurant {
    Restaurant {
        id: id.to_string(),
        name: name.to_string(),
        address: address.to_string(),
        location: Some(GeoPoint { lat, lng }),
    }
}

fn customer(id: &str, name: &str, address: &str, location: Option<GeoPoint>) -> Customer {
    Customer {
        id: id.to_string(),
        name: name.to_string(),
        address: address.to_string(),
        location,
    }
}

struct Trip {
    id: &'static str,
    restaurant: Restaurant,
    customer: Customer,
    items: u32,
    distance: f64,
    earnings: f64,
    payment_method: &'static str,
}

impl Trip {
    fn completed(self, completed_at: DateTime<Utc>, issues: Option<&str>) -> Delivery {
        Delivery {
            id: self.id.to_string(),
            restaurant: self.restaurant,
            customer: self.customer,
            status: DeliveryStatus::Delivered,
            items: self.items,
            distance: self.distance,
            earnings: self.earnings,
            expected_delivery_time: completed_at + Duration::minutes(5),
            completed_at: Some(completed_at),
            payment_method: self.payment_method.to_string(),
            issues: issues.map(str::to_string),
        }
    }

    fn open(self, status: DeliveryStatus, expected: DateTime<Utc>) -> Delivery {
        Delivery {
            id: self.id.to_string(),
            restaurant: self.restaurant,
            customer: self.customer,
            status,
            items: self.items,
            distance: self.distance,
            earnings: self.earnings,
            expected_delivery_time: expected,
            completed_at: None,
            payment_method: self.payment_method.to_string(),
            issues: None,
        }
    }
}

fn pizza_palace() -> Restaurant {
    restaurant("R-01", "Pizza Palace", "512 Valencia St, San Francisco, CA", 37.7641, -122.4216)
}

fn burger_barn() -> Restaurant {
    restaurant("R-02", "Burger Barn", "88 Hayes St, San Francisco, CA", 37.7770, -122.4195)
}

fn sushi_central() -> Restaurant {
    restaurant("R-03", "Sushi Central", "1737 Post St, San Francisco, CA", 37.7853, -122.4305)
}

fn taco_fiesta() -> Restaurant {
    restaurant("R-04", "Taco Fiesta", "2889 Mission St, San Francisco, CA", 37.7508, -122.4182)
}

fn green_bowl() -> Restaurant {
    restaurant("R-05", "Green Bowl", "301 Kearny St, San Francisco, CA", 37.7914, -122.4038)
}

fn scheduled(now: DateTime<Utc>) -> Vec<Delivery> {
    vec![
        Trip {
            id: "D-2001",
            restaurant: pizza_palace(),
            customer: customer(
                "C-21",
                "Maya Patel",
                "1450 Guerrero St, San Francisco, CA",
                Some(GeoPoint { lat: 37.7489, lng: -122.4228 }),
            ),
            items: 2,
            distance: 2.4,
            earnings: 6.25,
            payment_method: "Credit Card",
        }
        .completed(now - Duration::hours(3), None),
        Trip {
            id: "D-2002",
            restaurant: sushi_central(),
            customer: customer(
                "C-22",
                "Daniel Kim",
                "2100 Bush St, San Francisco, CA",
                Some(GeoPoint { lat: 37.7868, lng: -122.4341 }),
            ),
            items: 4,
            distance: 1.7,
            earnings: 7.80,
            payment_method: "Cash",
        }
        .completed(now - Duration::hours(1), None),
        Trip {
            id: "D-2003",
            restaurant: taco_fiesta(),
            customer: customer(
                "C-23",
                "Lucia Romero",
                "455 Cortland Ave, San Francisco, CA",
                Some(GeoPoint { lat: 37.7390, lng: -122.4166 }),
            ),
            items: 3,
            distance: 1.9,
            earnings: 5.60,
            payment_method: "Credit Card",
        }
        .open(DeliveryStatus::Assigned, now + Duration::minutes(25)),
        Trip {
            id: "D-2004",
            restaurant: green_bowl(),
            customer: customer(
                "C-24",
                "Omar Haddad",
                "600 Battery St, San Francisco, CA",
                None,
            ),
            items: 1,
            distance: 1.2,
            earnings: 4.40,
            payment_method: "Apple Pay",
        }
        .open(DeliveryStatus::Assigned, now + Duration::minutes(60)),
    ]
}

fn trip(
    id: &'static str,
    restaurant: Restaurant,
    customer_name: &str,
    items: u32,
    distance: f64,
    earnings: f64,
    payment_method: &'static str,
) -> Trip {
    Trip {
        id,
        restaurant,
        customer: customer(
            &id.replace("D-", "C-"),
            customer_name,
            "San Francisco, CA",
            None,
        ),
        items,
        distance,
        earnings,
        payment_method,
    }
}

fn history() -> Vec<Delivery> {
    vec![
        trip("D-1001", pizza_palace(), "Ava Thompson", 3, 4.2, 8.50, "Credit Card")
            .completed(at(2024, 3, 1, 12, 30), None),
        trip("D-1002", burger_barn(), "Liam Chen", 2, 2.1, 5.75, "Cash")
            .completed(at(2024, 3, 1, 18, 10), None),
        trip("D-1003", sushi_central(), "Sofia Garcia", 5, 6.8, 12.40, "Credit Card")
            .completed(at(2024, 3, 2, 13, 5), None),
        trip("D-1004", taco_fiesta(), "Noah Wilson", 1, 1.4, 4.25, "Apple Pay")
            .completed(at(2024, 3, 3, 19, 45), None),
        trip(
            "D-1005",
            restaurant("R-06", "Pizza Napoli", "1570 Stockton St, San Francisco, CA", 37.8006, -122.4090),
            "Emma Brown",
            4,
            5.5,
            9.80,
            "Credit Card",
        )
        .completed(at(2024, 3, 4, 20, 15), None),
        trip("D-1006", green_bowl(), "Oliver Davis", 2, 3.3, 6.10, "Cash")
            .completed(at(2024, 3, 5, 11, 50), None),
        trip(
            "D-1007",
            restaurant("R-07", "Curry House", "3201 Geary Blvd, San Francisco, CA", 37.7817, -122.4590),
            "Mia Johnson",
            3,
            7.9,
            13.75,
            "Credit Card",
        )
        .completed(
            at(2024, 3, 6, 19, 20),
            Some("Customer not reachable at the door; left with the concierge"),
        ),
        trip("D-1008", burger_barn(), "Ethan Martinez", 1, 2.1, 5.75, "Apple Pay")
            .completed(at(2024, 3, 7, 12, 40), None),
        trip(
            "D-1009",
            restaurant("R-08", "Noodle Bar", "631 Kearny St, San Francisco, CA", 37.7945, -122.4048),
            "Isabella Lee",
            2,
            4.0,
            7.20,
            "Cash",
        )
        .completed(at(2024, 3, 8, 18, 55), None),
        trip(
            "D-1010",
            restaurant("R-09", "Spizzico Deli", "2301 Fillmore St, San Francisco, CA", 37.7902, -122.4337),
            "James Anderson",
            3,
            3.8,
            7.95,
            "Credit Card",
        )
        .completed(at(2024, 3, 9, 13, 25), None),
        trip(
            "D-1011",
            restaurant("R-10", "Dumpling Den", "1200 Irving St, San Francisco, CA", 37.7640, -122.4706),
            "Charlotte Taylor",
            6,
            9.1,
            15.30,
            "Credit Card",
        )
        .completed(at(2024, 3, 10, 21, 0), None),
        trip(
            "D-1012",
            restaurant("R-11", "Falafel Stop", "1325 Polk St, San Francisco, CA", 37.7885, -122.4200),
            "Benjamin Thomas",
            1,
            0.9,
            3.90,
            "Cash",
        )
        .completed(at(2024, 3, 11, 12, 10), None),
    ]
}

fn primary_rider() -> User {
    User {
        id: "user-1".to_string(),
        first_name: "John".to_string(),
        last_name: "Doe".to_string(),
        email: "john.doe@example.com".to_string(),
        phone: "+1 (555) 123-4567".to_string(),
        status: "Active".to_string(),
        created_at: at(2023, 1, 15, 8, 30),
        license_number: "DL12345678".to_string(),
        total_deliveries: 156,
        rating: 4.8,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use chrono::Utc;

    use super::SeedData;
    use crate::models::delivery::DeliveryStatus;

    #[test]
    fn ids_are_unique_across_lanes() {
        let seed = SeedData::generate(Utc::now());
        let mut seen = HashSet::new();
        for delivery in seed.scheduled.iter().chain(seed.history.iter()) {
            assert!(seen.insert(delivery.id.clone()), "duplicate {}", delivery.id);
        }
    }

    #[test]
    fn completed_at_matches_delivered_status() {
        let seed = SeedData::generate(Utc::now());
        for delivery in seed.scheduled.iter().chain(seed.history.iter()) {
            assert_eq!(
                delivery.completed_at.is_some(),
                delivery.status == DeliveryStatus::Delivered,
                "{}",
                delivery.id
            );
        }
    }
}
