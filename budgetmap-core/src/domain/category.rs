//! Budget categories

/// Categories used when no category list has been saved yet
pub const DEFAULT_CATEGORIES: [&str; 15] = [
    "Food & Dining",
    "Groceries",
    "Transportation",
    "Shopping",
    "Clothing",
    "Bills & Utilities",
    "Entertainment",
    "Travel",
    "Healthcare",
    "Education",
    "Personal Care",
    "Gifts & Donations",
    "Business",
    "Income",
    "Other",
];

pub fn default_categories() -> Vec<String> {
    DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect()
}

/// Case-insensitive lookup, returning the stored spelling
pub fn find_known<'a>(categories: &'a [String], name: &str) -> Option<&'a str> {
    let name = name.trim().to_lowercase();
    categories
        .iter()
        .find(|c| c.to_lowercase() == name)
        .map(|c| c.as_str())
}
