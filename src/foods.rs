//! Food database: the items the board offers per category.
//!
//! A compiled-in default database is always available. A JSON file with the
//! same shape can replace it at startup and is hot-reloaded while the
//! server runs.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::{FoodCategory, FoodItem};
use crate::error::FoodDbError;

/// All board foods, by category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodDatabase {
    pub proteins: Vec<FoodItem>,
    pub carbs: Vec<FoodItem>,
    pub vegetables: Vec<FoodItem>,
    pub fruits: Vec<FoodItem>,
    pub snacks: Vec<FoodItem>,
}

impl FoodDatabase {
    /// Returns the items of one category.
    pub fn category(&self, category: FoodCategory) -> &[FoodItem] {
        match category {
            FoodCategory::Proteins => &self.proteins,
            FoodCategory::Carbs => &self.carbs,
            FoodCategory::Vegetables => &self.vegetables,
            FoodCategory::Fruits => &self.fruits,
            FoodCategory::Snacks => &self.snacks,
        }
    }

    /// Finds an item by name anywhere in the database (case-insensitive).
    pub fn find(&self, name: &str) -> Option<&FoodItem> {
        FoodCategory::all()
            .iter()
            .flat_map(|c| self.category(*c))
            .find(|item| item.name.eq_ignore_ascii_case(name))
    }

    /// Finds an item by name within one category (case-insensitive).
    pub fn find_in(&self, category: FoodCategory, name: &str) -> Option<&FoodItem> {
        self.category(category)
            .iter()
            .find(|item| item.name.eq_ignore_ascii_case(name))
    }

    /// Total number of items across all categories.
    pub fn total_count(&self) -> usize {
        FoodCategory::all()
            .iter()
            .map(|c| self.category(*c).len())
            .sum()
    }

    fn validate(&self) -> Result<(), FoodDbError> {
        for category in FoodCategory::all() {
            let items = self.category(*category);
            if items.is_empty() {
                return Err(FoodDbError::EmptyCategory(category.key()));
            }
            if items.iter().any(|i| i.name.trim().is_empty()) {
                return Err(FoodDbError::UnnamedItem {
                    category: category.key(),
                });
            }
        }
        Ok(())
    }
}

impl Default for FoodDatabase {
    fn default() -> Self {
        Self {
            proteins: vec![
                FoodItem::with_macros("Chicken Breast", 165, 31, 0, 4),
                FoodItem::with_macros("Salmon Fillet", 208, 20, 0, 13),
                FoodItem::with_macros("Scrambled Eggs", 156, 12, 2, 10),
                FoodItem::with_macros("Greek Yogurt", 100, 17, 6, 1),
                FoodItem::with_macros("Tofu", 144, 16, 4, 8),
                FoodItem::with_macros("Lean Beef", 176, 20, 0, 10),
            ],
            carbs: vec![
                FoodItem::with_macros("Brown Rice", 216, 5, 45, 2),
                FoodItem::with_macros("Oatmeal", 150, 5, 27, 3),
                FoodItem::with_macros("Whole Wheat Toast", 138, 6, 24, 2),
                FoodItem::with_macros("Sweet Potato", 112, 2, 26, 0),
                FoodItem::with_macros("Quinoa", 222, 8, 39, 4),
            ],
            vegetables: vec![
                FoodItem::new("Broccoli", 55),
                FoodItem::new("Spinach", 23),
                FoodItem::new("Mixed Salad", 33),
                FoodItem::new("Asparagus", 27),
                FoodItem::new("Green Beans", 31),
            ],
            fruits: vec![
                FoodItem::new("Banana", 105),
                FoodItem::new("Apple", 95),
                FoodItem::new("Mixed Berries", 85),
                FoodItem::new("Orange", 62),
            ],
            snacks: vec![
                FoodItem::with_macros("Mixed Nuts", 170, 6, 6, 15),
                FoodItem::with_macros("Almond Butter", 98, 3, 3, 9),
                FoodItem::with_macros("Protein Bar", 200, 20, 21, 6),
                FoodItem::new("Hummus & Carrots", 150),
                FoodItem::new("Rice Cakes", 70),
            ],
        }
    }
}

/// Loads and validates a food database from a JSON file.
pub fn load_food_database(path: &Path) -> Result<FoodDatabase, FoodDbError> {
    if !path.exists() {
        return Err(FoodDbError::FileNotFound(path.to_path_buf()));
    }

    let contents = std::fs::read_to_string(path)?;
    let db: FoodDatabase = serde_json::from_str(&contents)?;
    db.validate()?;
    Ok(db)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_database_is_valid() {
        let db = FoodDatabase::default();
        assert!(db.validate().is_ok());
        assert!(db.total_count() >= 20);
    }

    #[test]
    fn test_find_case_insensitive() {
        let db = FoodDatabase::default();
        assert!(db.find("chicken breast").is_some());
        assert!(db.find("CHICKEN BREAST").is_some());
        assert!(db.find("unobtainium").is_none());
    }

    #[test]
    fn test_find_in_category() {
        let db = FoodDatabase::default();
        assert!(db.find_in(FoodCategory::Proteins, "Chicken Breast").is_some());
        assert!(db.find_in(FoodCategory::Fruits, "Chicken Breast").is_none());
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_food_database(Path::new("/nonexistent/foods.json")).unwrap_err();
        assert!(matches!(err, FoodDbError::FileNotFound(_)));
    }

    #[test]
    fn test_load_round_trip() {
        let db = FoodDatabase::default();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(serde_json::to_string(&db).unwrap().as_bytes())
            .unwrap();

        let loaded = load_food_database(file.path()).unwrap();
        assert_eq!(loaded.total_count(), db.total_count());
    }

    #[test]
    fn test_load_rejects_empty_category() {
        let mut db = FoodDatabase::default();
        db.fruits.clear();

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(serde_json::to_string(&db).unwrap().as_bytes())
            .unwrap();

        let err = load_food_database(file.path()).unwrap_err();
        assert!(matches!(err, FoodDbError::EmptyCategory("fruits")));
    }

    #[test]
    fn test_load_rejects_invalid_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{ not json").unwrap();

        let err = load_food_database(file.path()).unwrap_err();
        assert!(matches!(err, FoodDbError::InvalidJson(_)));
    }
}
