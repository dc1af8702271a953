//! Ingredient name canonicalisation used only when matching items.
//!
//! This is a fixed rule list, not a stemmer. It lowercases, drops
//! parenthetical notes, peels descriptive modifiers off either end and
//! applies a naive depluralisation. Known misses ("asparagus", "niches")
//! are accepted.

/// Modifiers stripped from the start or end of a name.
pub const DEFAULT_MODIFIERS: &[&str] = &[
    "fresh", "dried", "chopped", "diced", "minced", "ground", "whole", "canned", "frozen",
    "organic", "unsalted", "salted",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameNormalizer {
    modifiers: Vec<String>,
}

impl Default for NameNormalizer {
    fn default() -> Self {
        Self::new(DEFAULT_MODIFIERS.iter().copied())
    }
}

impl NameNormalizer {
    pub fn new(modifiers: impl IntoIterator<Item = impl Into<String>>) -> Self {
        let mut modifiers: Vec<String> = modifiers
            .into_iter()
            .map(|m| collapse_whitespace(&m.into().to_lowercase()))
            .filter(|m| !m.is_empty())
            .collect();

        // longest first so "ground" never shadows a longer multi-word modifier
        modifiers.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        modifiers.dedup();

        Self { modifiers }
    }

    pub fn modifiers(&self) -> &[String] {
        &self.modifiers
    }

    /// Canonical matching key for a free-text ingredient name.
    ///
    /// Pure and total: empty or whitespace input yields an empty string, and
    /// the result is a fixed point (`normalize(normalize(x)) == normalize(x)`).
    pub fn normalize(&self, raw: &str) -> String {
        let mut name = collapse_whitespace(&strip_parentheticals(&raw.to_lowercase()));

        loop {
            let next = depluralize(&self.strip_modifiers(&name));
            if next == name {
                return name;
            }
            name = next;
        }
    }

    fn strip_modifiers(&self, name: &str) -> String {
        let mut name = trim_punctuation(name).to_owned();

        'outer: loop {
            for modifier in &self.modifiers {
                let stripped = name
                    .strip_prefix(modifier.as_str())
                    .and_then(|rest| rest.strip_prefix(' '))
                    .or_else(|| {
                        name.strip_suffix(modifier.as_str())
                            .and_then(|rest| rest.strip_suffix(' '))
                    })
                    .map(trim_punctuation);

                if let Some(rest) = stripped.filter(|rest| !rest.is_empty()) {
                    name = rest.to_owned();
                    continue 'outer;
                }
            }

            return name;
        }
    }
}

/// Normalizes with the default modifier list.
pub fn normalize(raw: &str) -> String {
    NameNormalizer::default().normalize(raw)
}

fn collapse_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn trim_punctuation(value: &str) -> &str {
    value.trim_matches(|c: char| c.is_whitespace() || c == ',' || c == ';' || c == '-')
}

/// Removes every `( ... )` group; an unclosed `(` cuts the rest of the string.
fn strip_parentheticals(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut depth = 0usize;

    for c in value.chars() {
        match c {
            '(' => depth += 1,
            ')' if depth > 0 => {
                depth -= 1;
                out.push(' ');
            }
            _ if depth == 0 => out.push(c),
            _ => {}
        }
    }

    out
}

fn depluralize(name: &str) -> String {
    if name.len() < 3 || name.ends_with("ss") || name.ends_with("us") || name.ends_with("is") {
        return name.to_owned();
    }

    if let Some(stem) = name.strip_suffix("ies").filter(|stem| stem.len() > 1) {
        return format!("{stem}y");
    }

    for suffix in ["oes", "ches", "shes", "xes", "zes"] {
        if name.ends_with(suffix) {
            return name[..name.len() - 2].to_owned();
        }
    }

    match name.strip_suffix('s') {
        Some(stem) => stem.to_owned(),
        None => name.to_owned(),
    }
}
