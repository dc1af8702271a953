use fraction::Fraction;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use crate::{Amount, Ingredient, StructuredIngredient, unit};

static RE_LEADING_AMOUNT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<amount>\d+\s+\d+/\d+|\d+/\d+|\d+(?:[.,]\d+)?)\s*(?P<rest>.*)$").unwrap()
});

/// What to report as the amount when none can be read from the input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OnUnparsable {
    Null,
    #[default]
    DefaultOne,
}

impl OnUnparsable {
    fn fallback(self) -> Option<Fraction> {
        match self {
            OnUnparsable::Null => None,
            OnUnparsable::DefaultOne => Some(Fraction::new(1u64, 1u64)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedQuantity {
    pub name: String,
    pub amount: Option<Fraction>,
    pub unit: Option<String>,
    pub original_text: String,
}

impl ParsedQuantity {
    /// Value written to an item's quantity column.
    pub fn stored_quantity(&self) -> Option<String> {
        if self.amount.is_some() {
            return Some(self.original_text.to_owned());
        }

        let text = self.original_text.trim();
        if text.is_empty() || text.eq_ignore_ascii_case(self.name.trim()) {
            return None;
        }

        Some(text.to_owned())
    }
}

pub fn parse_quantity(ingredient: &Ingredient, on_unparsable: OnUnparsable) -> ParsedQuantity {
    match ingredient {
        Ingredient::Text(text) => parse_text(text, on_unparsable),
        Ingredient::Structured(structured) => parse_structured(structured, on_unparsable),
    }
}

/// Display name of an ingredient, with the single-letter name correction applied.
pub fn extract_name(ingredient: &Ingredient) -> String {
    parse_quantity(ingredient, OnUnparsable::DefaultOne).name
}

fn parse_structured(ingredient: &StructuredIngredient, on_unparsable: OnUnparsable) -> ParsedQuantity {
    let name = ingredient.name.trim();
    let unit = ingredient
        .unit
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty());

    // importer defect: the real name lands in `unit` and `name` holds one letter
    if let Some(real_name) = unit.filter(|u| name.chars().count() == 1 && u.chars().count() > 1) {
        return ParsedQuantity {
            name: real_name.to_owned(),
            amount: Some(Fraction::new(1u64, 1u64)),
            unit: None,
            original_text: "1".to_owned(),
        };
    }

    let (parsed, raw) = match &ingredient.amount {
        Some(Amount::Number(n)) => (parse_amount(&n.to_string()), Some(n.to_string())),
        Some(Amount::Text(text)) => (parse_amount(text), Some(text.trim().to_owned())),
        None => (None, None),
    };

    let amount = parsed.or_else(|| on_unparsable.fallback());
    let original_text = match &amount {
        Some(amount) => display(amount, unit),
        None => [raw.as_deref(), unit]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" "),
    };

    ParsedQuantity {
        name: name.to_owned(),
        amount,
        unit: unit.map(str::to_owned),
        original_text,
    }
}

fn parse_text(raw: &str, on_unparsable: OnUnparsable) -> ParsedQuantity {
    let text = raw.trim();

    let leading = RE_LEADING_AMOUNT
        .captures(text)
        .and_then(|caps| Some((parse_amount(&caps["amount"])?, caps["rest"].trim().to_owned())));

    let Some((amount, rest)) = leading else {
        let amount = on_unparsable.fallback();

        return ParsedQuantity {
            name: text.to_owned(),
            amount,
            unit: None,
            original_text: match &amount {
                Some(amount) => display(amount, None),
                None => text.to_owned(),
            },
        };
    };

    // a lone word after the amount is the thing to buy ("2 eggs", "1 clove")
    let (unit, name) = match rest.split_once(char::is_whitespace) {
        Some((head, tail)) if unit::is_known(head) => {
            (Some(head.trim_end_matches('.').to_owned()), tail.trim())
        }
        _ => (None, rest.as_str()),
    };

    let name = name.strip_prefix("of ").unwrap_or(name).trim();

    ParsedQuantity {
        name: name.to_owned(),
        original_text: display(&amount, unit.as_deref()),
        amount: Some(amount),
        unit,
    }
}

/// Reads "2", "1.5", "1,5", "1/2" and "1 1/2" as an exact fraction.
pub fn parse_amount(text: &str) -> Option<Fraction> {
    let text = text.trim().replace(',', ".");

    match text.split_once(char::is_whitespace) {
        Some((whole, fraction)) => {
            let mut amount = Fraction::new(whole.parse::<u64>().ok()?, 1u64);
            amount += parse_fraction(fraction.trim())?;
            Some(amount)
        }
        None if text.contains('/') => parse_fraction(&text),
        None => parse_decimal(&text),
    }
}

fn parse_fraction(text: &str) -> Option<Fraction> {
    let (numerator, denominator) = text.split_once('/')?;
    let numerator = numerator.trim().parse::<u64>().ok()?;
    let denominator = denominator.trim().parse::<u64>().ok()?;

    if denominator == 0 {
        return None;
    }

    Some(Fraction::new(numerator, denominator))
}

/// `"1.25"` becomes 125/100; signs and exponents are rejected.
fn parse_decimal(text: &str) -> Option<Fraction> {
    let (whole, decimals) = text.split_once('.').unwrap_or((text, ""));
    if whole.is_empty() || !whole.chars().chain(decimals.chars()).all(|c| c.is_ascii_digit()) {
        return None;
    }

    let denominator = 10u64.checked_pow(u32::try_from(decimals.len()).ok()?)?;
    let numerator = format!("{whole}{decimals}").parse::<u64>().ok()?;

    Some(Fraction::new(numerator, denominator))
}

/// Rounds half up to two decimals and drops trailing zeros:
/// `5 -> "5"`, `1/8 -> "0.13"`, `5/2 -> "2.5"`.
pub fn format_amount(amount: &Fraction) -> String {
    let (Some(numer), Some(denom)) = (amount.numer(), amount.denom()) else {
        return "0".to_owned();
    };
    let (numer, denom) = (u128::from(*numer), u128::from(*denom));
    if denom == 0 {
        return "0".to_owned();
    }

    let cents = (numer * 200 + denom) / (2 * denom);
    let (whole, rest) = (cents / 100, cents % 100);

    match rest {
        0 => whole.to_string(),
        r if r % 10 == 0 => format!("{whole}.{}", r / 10),
        r => format!("{whole}.{r:02}"),
    }
}

pub(crate) fn display(amount: &Fraction, unit: Option<&str>) -> String {
    match unit {
        Some(unit) => format!("{} {}", format_amount(amount), unit.trim())
            .trim()
            .to_owned(),
        None => format_amount(amount),
    }
}
