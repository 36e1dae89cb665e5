use std::collections::BTreeMap;

/// Language code to display name, ordered by code.
pub type LanguageCatalog = BTreeMap<String, String>;

pub fn from_table(table: &[(&str, &str)]) -> LanguageCatalog {
    table
        .iter()
        .map(|(code, name)| (code.to_string(), name.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_table_orders_by_code() {
        let catalog = from_table(&[("fr", "french"), ("de", "german"), ("en", "english")]);
        let codes: Vec<&str> = catalog.keys().map(String::as_str).collect();
        assert_eq!(codes, vec!["de", "en", "fr"]);
        assert_eq!(catalog["fr"], "french");
    }
}
