//! The blank character sheet.

use crate::types::Sheet;
use serde_json::{json, Value};

/// A fresh sheet: empty identity fields, zeroed scores, empty lists.
pub fn blank_sheet() -> Sheet {
    let sheet = json!({
        "name": "",
        "race": "",
        "class": "",
        "background": "",
        "level": 0,
        "xp": 0,
        "abilities": {
            "STR": 0,
            "DEX": 0,
            "CON": 0,
            "INT": 0,
            "WIS": 0,
            "CHA": 0
        },
        "proficiencies": {
            "armor": [],
            "weapons": [],
            "saving_throws": [],
            "skills": [],
            "expertise": []
        },
        "features": {},
        "equipment": [],
        "misc": {
            "wealth": {
                "gold": 0
            },
            "titles": [],
            "achievements": []
        }
    });

    match sheet {
        Value::Object(map) => map,
        _ => Sheet::new(),
    }
}
