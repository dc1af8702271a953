/// Collapses spelling variants of a unit onto one canonical token.
///
/// No conversion happens here: "cup" and "ml" stay different units and
/// their quantities are never summed together.
pub fn canonical(unit: &str) -> Option<&'static str> {
    let unit = unit.trim().trim_end_matches('.').to_lowercase();

    let canonical = match unit.as_str() {
        "cup" | "cups" | "c" => "cup",
        "tbsp" | "tbs" | "tablespoon" | "tablespoons" | "tbl" => "tbsp",
        "tsp" | "teaspoon" | "teaspoons" => "tsp",
        "ml" | "milliliter" | "milliliters" | "millilitre" | "millilitres" => "ml",
        "l" | "liter" | "liters" | "litre" | "litres" => "l",
        "g" | "gr" | "gram" | "grams" => "g",
        "kg" | "kilogram" | "kilograms" | "kilo" | "kilos" => "kg",
        "oz" | "ounce" | "ounces" => "oz",
        "lb" | "lbs" | "pound" | "pounds" => "lb",
        "pinch" | "pinches" => "pinch",
        "dash" | "dashes" => "dash",
        "clove" | "cloves" => "clove",
        "can" | "cans" | "tin" | "tins" => "can",
        "package" | "packages" | "pkg" | "pack" | "packs" => "package",
        "bunch" | "bunches" => "bunch",
        "slice" | "slices" => "slice",
        "stick" | "sticks" => "stick",
        "head" | "heads" => "head",
        "sprig" | "sprigs" => "sprig",
        "handful" | "handfuls" => "handful",
        "piece" | "pieces" | "pc" | "pcs" => "piece",
        "jar" | "jars" => "jar",
        "bottle" | "bottles" => "bottle",
        _ => return None,
    };

    Some(canonical)
}

pub fn is_known(unit: &str) -> bool {
    canonical(unit).is_some()
}

/// Comparison key for a unit; unknown units compare by their lowercase text.
pub fn key(unit: Option<&str>) -> Option<String> {
    let unit = unit.map(str::trim).filter(|u| !u.is_empty())?;

    Some(
        canonical(unit)
            .map(str::to_owned)
            .unwrap_or_else(|| unit.to_lowercase()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aliases_share_a_key() {
        assert_eq!(key(Some("Cups")), key(Some("cup")));
        assert_eq!(key(Some("tablespoons")), key(Some("Tbsp.")));
        assert_eq!(key(Some("  ")), None);
        assert_eq!(key(None), None);
    }

    #[test]
    fn test_no_cross_unit_conversion() {
        assert_ne!(key(Some("cup")), key(Some("ml")));
        assert_ne!(key(Some("g")), key(Some("kg")));
    }

    #[test]
    fn test_unknown_units_compare_lowercase() {
        assert!(!is_known("sachet"));
        assert_eq!(key(Some("Sachet")), Some("sachet".to_owned()));
    }
}
