use serde::Serialize;
use std::collections::BTreeMap;

/// Flat record with three scalar fields
#[allow(dead_code)]
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct Person {
    pub name: String,
    pub age: u32,
    pub city: String,
}

/// Create a person with the given fields
#[allow(dead_code)]
pub fn person(name: &str, age: u32, city: &str) -> Person {
    Person {
        name: name.to_string(),
        age,
        city: city.to_string(),
    }
}

/// Record with composite field values
#[allow(dead_code)]
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Profile {
    pub id: u64,
    pub tags: Vec<String>,
    pub address: Address,
    pub scores: BTreeMap<String, f64>,
}

#[allow(dead_code)]
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Address {
    pub street: String,
    pub zip: String,
}

/// Create a profile with a fresh set of owned composite values
#[allow(dead_code)]
pub fn profile() -> Profile {
    let mut scores = BTreeMap::new();
    scores.insert("math".to_string(), 91.5);
    scores.insert("art".to_string(), 78.0);
    Profile {
        id: 7,
        tags: vec!["admin".to_string(), "beta".to_string()],
        address: Address {
            street: "1 Main St".to_string(),
            zip: "10001".to_string(),
        },
        scores,
    }
}

/// Record whose optional field disappears from the view when unset
#[allow(dead_code)]
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Account {
    pub login: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
}
