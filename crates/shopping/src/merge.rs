//! Quantity arithmetic over the loosely typed `quantity` column.
//!
//! A quantity is a `" + "` separated list of parts. Parts that read as
//! `<amount> [unit]` are summed per unit; every other part is kept as text in
//! the order it was first seen.

use fraction::Fraction;
use regex::Regex;
use std::sync::LazyLock;

use crate::{ParsedQuantity, parse_amount, quantity::display, unit};

static RE_QUANTITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<amount>\d+\s+\d+/\d+|\d+/\d+|\d+(?:[.,]\d+)?)\s*(?P<unit>[A-Za-z]+\.?)?$")
        .unwrap()
});

pub const SEPARATOR: &str = " + ";

/// Splits a stored quantity made of exactly one amount and an optional unit.
pub fn split_quantity(text: &str) -> Option<(Fraction, Option<String>)> {
    let caps = RE_QUANTITY.captures(text.trim())?;
    let amount = parse_amount(&caps["amount"])?;
    let unit = caps
        .name("unit")
        .map(|u| u.as_str().trim_end_matches('.').to_owned());

    Some((amount, unit))
}

enum Part {
    Sum { total: Fraction, unit: Option<String> },
    Text(String),
}

#[derive(Default)]
struct Tally {
    parts: Vec<Part>,
}

impl Tally {
    fn add_amount(&mut self, amount: Fraction, unit: Option<&str>) {
        let key = unit::key(unit);
        let existing = self.parts.iter_mut().find_map(|part| match part {
            Part::Sum { total, unit: seen } if unit::key(seen.as_deref()) == key => Some(total),
            _ => None,
        });

        match existing {
            Some(total) => *total += amount,
            None => self.parts.push(Part::Sum {
                total: amount,
                unit: unit.map(str::to_owned),
            }),
        }
    }

    fn add_text(&mut self, text: &str) {
        for part in text.split(SEPARATOR.trim()).map(str::trim).filter(|p| !p.is_empty()) {
            match split_quantity(part) {
                Some((amount, unit)) => self.add_amount(amount, unit.as_deref()),
                None => self.parts.push(Part::Text(part.to_owned())),
            }
        }
    }

    fn finish(self) -> Option<String> {
        if self.parts.is_empty() {
            return None;
        }

        let parts: Vec<String> = self
            .parts
            .into_iter()
            .map(|part| match part {
                Part::Sum { total, unit } => display(&total, unit.as_deref()),
                Part::Text(text) => text,
            })
            .collect();

        Some(parts.join(SEPARATOR))
    }
}

/// New quantity for an existing item topped up by a parsed ingredient.
pub fn merge_quantities(existing: Option<&str>, incoming: &ParsedQuantity) -> Option<String> {
    let existing = existing.map(str::trim).filter(|q| !q.is_empty());
    let Some(addition) = incoming.stored_quantity() else {
        return existing.map(str::to_owned);
    };

    let mut tally = Tally::default();
    tally.add_text(existing.unwrap_or_default());

    match &incoming.amount {
        Some(amount) => tally.add_amount(amount.clone(), incoming.unit.as_deref()),
        None => tally.parts.push(Part::Text(addition)),
    }

    tally.finish()
}

/// Collapses several stored quantities into one.
///
/// Missing quantities add nothing. Amounts sharing a unit are summed and
/// rounded to two decimals. Parts that cannot be summed are all kept, so no
/// false total is produced and nothing is lost.
pub fn sum_quantities<'a>(quantities: impl IntoIterator<Item = Option<&'a str>>) -> Option<String> {
    let mut tally = Tally::default();
    for text in quantities.into_iter().flatten() {
        tally.add_text(text);
    }

    tally.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Amount, Ingredient, OnUnparsable, StructuredIngredient, parse_quantity};

    fn parsed(amount: f64, unit: Option<&str>) -> ParsedQuantity {
        parse_quantity(&Ingredient::structured("x y", amount, unit), OnUnparsable::Null)
    }

    fn frac(numerator: u64, denominator: u64) -> Fraction {
        Fraction::new(numerator, denominator)
    }

    #[test]
    fn test_split_quantity() {
        assert_eq!(split_quantity("2"), Some((frac(2, 1), None)));
        assert_eq!(
            split_quantity(" 1 1/2 cups "),
            Some((frac(3, 2), Some("cups".to_owned())))
        );
        assert_eq!(split_quantity("2 cups + 1 cup"), None);
        assert_eq!(split_quantity("a pinch"), None);
    }

    #[test]
    fn test_merge_sums_same_unit() {
        assert_eq!(merge_quantities(Some("2"), &parsed(3.0, None)).as_deref(), Some("5"));
        assert_eq!(
            merge_quantities(Some("1 cup"), &parsed(2.0, Some("cups"))).as_deref(),
            Some("3 cup")
        );
        assert_eq!(
            merge_quantities(Some("0.1"), &parsed(0.2, None)).as_deref(),
            Some("0.3")
        );
    }

    #[test]
    fn test_merge_falls_back_to_text() {
        assert_eq!(
            merge_quantities(Some("2 cups"), &parsed(100.0, Some("ml"))).as_deref(),
            Some("2 cups + 100 ml")
        );
        assert_eq!(
            merge_quantities(Some("a bag"), &parsed(1.0, None)).as_deref(),
            Some("a bag + 1")
        );
        assert_eq!(
            merge_quantities(Some("2"), &parsed(1.0, Some("kg"))).as_deref(),
            Some("2 + 1 kg")
        );
        assert_eq!(
            merge_quantities(Some("2 cups + 100 ml"), &parsed(1.0, Some("cup"))).as_deref(),
            Some("3 cups + 100 ml")
        );

        let pinch = parse_quantity(
            &Ingredient::Structured(StructuredIngredient {
                name: "Salt".to_owned(),
                amount: Some(Amount::Text("a pinch".to_owned())),
                ..Default::default()
            }),
            OnUnparsable::Null,
        );
        assert_eq!(
            merge_quantities(Some("a pinch"), &pinch).as_deref(),
            Some("a pinch + a pinch")
        );
    }

    #[test]
    fn test_merge_with_missing_sides() {
        assert_eq!(merge_quantities(None, &parsed(2.0, Some("g"))).as_deref(), Some("2 g"));
        assert_eq!(merge_quantities(Some("  "), &parsed(2.0, None)).as_deref(), Some("2"));

        let nothing = parse_quantity(&Ingredient::Text("salt".to_owned()), OnUnparsable::Null);
        assert_eq!(merge_quantities(Some("3"), &nothing).as_deref(), Some("3"));
        assert_eq!(merge_quantities(None, &nothing), None);
    }

    #[test]
    fn test_sum_quantities() {
        assert_eq!(sum_quantities([Some("1"), Some("2")]).as_deref(), Some("3"));
        assert_eq!(
            sum_quantities([Some("1"), Some("2"), Some("1")]).as_deref(),
            Some("4")
        );
        assert_eq!(
            sum_quantities([Some("0.333"), Some("0.333")]).as_deref(),
            Some("0.67")
        );
        assert_eq!(sum_quantities([Some("2"), None, Some("")]).as_deref(), Some("2"));
        assert_eq!(sum_quantities([None, None]), None);
        assert_eq!(
            sum_quantities([Some("1 cup"), Some("2 Cups")]).as_deref(),
            Some("3 cup")
        );
    }

    #[test]
    fn test_sum_quantities_never_invents_a_total() {
        assert_eq!(
            sum_quantities([Some("1 cup"), Some("200 g")]).as_deref(),
            Some("1 cup + 200 g")
        );
        assert_eq!(
            sum_quantities([Some("2"), Some("a handful"), Some("a handful")]).as_deref(),
            Some("2 + a handful + a handful")
        );
        assert_eq!(
            sum_quantities([Some("a pinch"), Some("a pinch")]).as_deref(),
            Some("a pinch + a pinch")
        );
    }

    #[test]
    fn test_sum_quantities_keeps_summable_part_beside_text() {
        assert_eq!(
            sum_quantities([Some("1"), Some("2"), Some("a handful")]).as_deref(),
            Some("3 + a handful")
        );
        assert_eq!(
            sum_quantities([Some("2"), Some("2"), Some("a pinch")]).as_deref(),
            Some("4 + a pinch")
        );
        assert_eq!(
            sum_quantities([Some("6"), Some("6"), Some("a dozen")]).as_deref(),
            Some("12 + a dozen")
        );
        assert_eq!(
            sum_quantities([Some("a dozen"), Some("1 cup"), Some("200 g"), Some("2 cups")]).as_deref(),
            Some("a dozen + 3 cup + 200 g")
        );
        assert_eq!(
            sum_quantities([Some("2 cups + 100 ml"), Some("1 cup")]).as_deref(),
            Some("3 cups + 100 ml")
        );
    }
}
