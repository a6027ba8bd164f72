use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::features::categories::models::{Category, CategoryId};

/// (id, parent, name)
const VEHICLES: [(i32, Option<i32>, &str); 21] = [
    (0, None, "Top"),
    (1000, Some(0), "Transportation"),
    (1001, Some(1000), "Bikes"),
    (1002, Some(1000), "Automobiles"),
    (1003, Some(1001), "Road Bikes"),
    (1004, Some(1001), "Mountain Bikes"),
    (1005, Some(1003), "Trek Road"),
    (1006, Some(1003), "Cannondale Road"),
    (1007, Some(1004), "Trek Mountain"),
    (1008, Some(1004), "Schwinn Mountain"),
    (1009, Some(1002), "Cars"),
    (1010, Some(1002), "Trucks"),
    (1011, Some(1002), "SUVs"),
    (1012, Some(1009), "Ford Cars"),
    (1013, Some(1010), "Ford Trucks"),
    (1014, Some(1011), "Ford SUVs"),
    (1015, Some(1009), "Toyota Cars"),
    (1016, Some(1010), "Toyota Trucks"),
    (1017, Some(1011), "Toyota SUVs"),
    (1018, Some(1009), "Audi"),
    (1019, Some(1011), "Jeep SUVs"),
];

/// Creation timestamp shared by every seeded category
pub fn seeded_at() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2002, 1, 1)
        .unwrap_or_default()
        .and_time(NaiveTime::MIN)
}

/// The vehicles catalog loaded when `SEED_CATALOG` is set. Ordered by id,
/// parents before children.
pub fn catalog() -> Vec<Category> {
    let created_at = seeded_at();

    VEHICLES
        .iter()
        .map(|&(id, parent, name)| Category {
            id: CategoryId::new(id),
            name: name.to_string(),
            visible: true,
            header: Some("header".to_string()),
            image_path: Some("n/a".to_string()),
            parent_id: parent.map(CategoryId::new),
            created_at,
        })
        .collect()
}
