// Test fixtures: small dictionaries and texts with known expected matches
// WHY: Property tests need deterministic entity sets shared across test files

#![allow(dead_code)]

use lexmatch::{Alias, Entity};

/// Two states sharing the abbreviation "MS"
pub const MS_TEXT: &str = "MS here could mean Mississippi or Montserrat";

/// Court names where one alias is a prefix of another
pub const COURT_TEXT: &str = "The case moved from the Supreme Court of Texas to the district court.";

/// Uppercase header followed by mixed-case body
pub const HEADER_TEXT: &str = "MOTION TO DISMISS OR TRANSFER VENUE TO THE NORTHERN DISTRICT\nThe defendant in OR filed a response.";

/// Clock times next to registered AM/PM abbreviations
pub const TIME_TEXT: &str = "Hearing at 10:45 am, recess at 12.150 pm; the AM radio station from PM county.";

pub fn mississippi() -> Entity {
    Entity::new(1, "Mississippi")
        .with_priority(1)
        .with_alias(Alias::new("Mississippi").with_language("en"))
        .with_alias(Alias::abbreviation("MS").with_language("en"))
}

pub fn montserrat() -> Entity {
    Entity::new(2, "Montserrat")
        .with_priority(5)
        .with_alias(Alias::new("Montserrat").with_language("en"))
        .with_alias(Alias::abbreviation("MS").with_language("en"))
}

pub fn oregon() -> Entity {
    Entity::new(3, "Oregon")
        .with_alias(Alias::new("Oregon").with_language("en"))
        .with_alias(Alias::abbreviation("OR").with_language("en"))
}

pub fn texas() -> Entity {
    Entity::new(4, "Texas")
        .with_alias(Alias::new("Texas").with_language("en"))
        .with_alias(Alias::new("Texas").with_language("es"))
        .with_alias(Alias::abbreviation("TX"))
}

pub fn supreme_court_of_texas() -> Entity {
    Entity::new(10, "Supreme Court of Texas")
        .with_alias(Alias::new("Supreme Court of Texas").with_language("en"))
}

pub fn supreme_court() -> Entity {
    Entity::new(11, "Supreme Court").with_alias(Alias::new("Supreme Court").with_language("en"))
}

pub fn district_court() -> Entity {
    Entity::new(12, "District Court").with_alias(Alias::new("district court").with_language("en"))
}

/// Entities whose abbreviations collide with clock suffixes
pub fn time_collisions() -> Vec<Entity> {
    vec![
        Entity::new(20, "Amplitude Modulation").with_alias(Alias::abbreviation("AM")),
        Entity::new(21, "Amplitude (lower)").with_alias(Alias::new("am")),
        Entity::new(22, "Prime Minister").with_alias(Alias::abbreviation("PM")),
        Entity::new(23, "Post Meridiem").with_alias(Alias::new("pm")),
    ]
}

pub fn states() -> Vec<Entity> {
    vec![mississippi(), montserrat(), oregon(), texas()]
}

pub fn courts() -> Vec<Entity> {
    vec![supreme_court(), supreme_court_of_texas(), district_court(), texas()]
}

/// Dictionary JSON equivalent to `states()`
pub const STATES_JSON: &str = r#"[
    {"id": 1, "name": "Mississippi", "priority": 1,
     "aliases": [{"text": "Mississippi", "language": "en"},
                 {"text": "MS", "language": "en", "is_abbreviation": true}]},
    {"id": 2, "name": "Montserrat", "priority": 5,
     "aliases": [{"text": "Montserrat", "language": "en"},
                 {"text": "MS", "language": "en", "is_abbreviation": true}]},
    {"id": 3, "name": "Oregon",
     "aliases": [{"text": "Oregon", "language": "en"},
                 {"text": "OR", "language": "en", "is_abbreviation": true}]},
    {"id": 4, "name": "Texas",
     "aliases": [{"text": "Texas", "language": "en"},
                 {"text": "Texas", "language": "es"},
                 {"text": "TX", "is_abbreviation": true}]}
]"#;
