//! Text helpers shared by header matching and the name-based detectors.

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

/// Upper-case a string and fold Turkish letters onto their ASCII base.
///
/// `"Sigara Ürünleri"` becomes `"SIGARA URUNLERI"`. Spreadsheets from
/// different sources spell the same group with and without diacritics, so
/// every textual comparison goes through this fold.
pub fn fold_turkish(text: &str) -> String {
    text.to_uppercase()
        .chars()
        .map(|c| match c {
            'İ' | 'ı' => 'I',
            'Ş' => 'S',
            'Ğ' => 'G',
            'Ü' => 'U',
            'Ö' => 'O',
            'Ç' => 'C',
            other => other,
        })
        .collect()
}

/// First two whitespace-separated words, upper-cased.
///
/// Names with fewer than two words are returned whole (trimmed, upper-cased).
pub fn first_two_words(text: &str) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() >= 2 {
        words[..2].join(" ").to_uppercase()
    } else {
        text.trim().to_uppercase()
    }
}

/// Last whitespace-separated word, upper-cased. Used as the brand token.
pub fn last_word(text: &str) -> String {
    text.split_whitespace()
        .last()
        .map(|w| w.to_uppercase())
        .unwrap_or_default()
}

/// Normalized unit of a pack size.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum QuantityUnit {
    Milliliter,
    Gram,
    Milligram,
}

/// Pack size parsed from a product name, normalized to ML / G / MG.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Quantity {
    pub value: f64,
    pub unit: QuantityUnit,
}

fn quantity_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(\d+[.,]?\d*)\s*(ML|LT|L|G|GR|KG|MG)\b").expect("quantity pattern is valid")
    })
}

/// Extract the pack size from a product name.
///
/// `"COLA 1,5 LT"` yields 1500 ML, `"PEYNIR 1 KG"` yields 1000 G.
pub fn extract_quantity(text: &str) -> Option<Quantity> {
    let upper = text.to_uppercase();
    let caps = quantity_pattern().captures(&upper)?;
    let raw: f64 = caps[1].replace(',', ".").parse().ok()?;

    let quantity = match &caps[2] {
        "LT" | "L" => Quantity { value: raw * 1000.0, unit: QuantityUnit::Milliliter },
        "ML" => Quantity { value: raw, unit: QuantityUnit::Milliliter },
        "KG" => Quantity { value: raw * 1000.0, unit: QuantityUnit::Gram },
        "G" | "GR" => Quantity { value: raw, unit: QuantityUnit::Gram },
        _ => Quantity { value: raw, unit: QuantityUnit::Milligram },
    };
    Some(quantity)
}

/// Max/min ratio above which two pack sizes never belong to one family.
const MAX_SIZE_RATIO: f64 = 3.0;

#[derive(PartialEq, Eq)]
enum SizeBand {
    Small,
    Medium,
    Large,
}

fn size_band(q: &Quantity) -> SizeBand {
    match q.unit {
        QuantityUnit::Milliliter if q.value <= 400.0 => SizeBand::Small,
        QuantityUnit::Milliliter if q.value <= 1000.0 => SizeBand::Medium,
        QuantityUnit::Milliliter => SizeBand::Large,
        QuantityUnit::Gram if q.value <= 100.0 => SizeBand::Small,
        QuantityUnit::Gram if q.value <= 400.0 => SizeBand::Medium,
        QuantityUnit::Gram => SizeBand::Large,
        QuantityUnit::Milligram => SizeBand::Medium,
    }
}

/// Whether two pack sizes are close enough to be variants of one product.
///
/// A missing size on either side never rules a pair out.
pub fn is_quantity_similar(a: Option<Quantity>, b: Option<Quantity>) -> bool {
    let (a, b) = match (a, b) {
        (Some(a), Some(b)) => (a, b),
        _ => return true,
    };
    if a.unit != b.unit {
        return false;
    }
    if a.value == 0.0 || b.value == 0.0 {
        return true;
    }
    if a.value.max(b.value) / a.value.min(b.value) > MAX_SIZE_RATIO {
        return false;
    }
    size_band(&a) == size_band(&b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fold_handles_turkish_letters() {
        assert_eq!(fold_turkish("Sigara ürünleri"), "SIGARA URUNLERI");
        assert_eq!(fold_turkish("İçecek Şişe Çay Ğ Ö ı"), "ICECEK SISE CAY G O I");
        assert_eq!(fold_turkish("Tütün"), "TUTUN");
    }

    #[test]
    fn words_are_upper_cased() {
        assert_eq!(first_two_words("  coca cola 1 lt  "), "COCA COLA");
        assert_eq!(first_two_words("ekmek"), "EKMEK");
        assert_eq!(first_two_words(""), "");
        assert_eq!(last_word("Deterjan 3 kg omo"), "OMO");
        assert_eq!(last_word("   "), "");
    }

    #[test]
    fn quantity_units_are_normalized() {
        let q = extract_quantity("Kola 1,5 LT").unwrap();
        assert_eq!(q.unit, QuantityUnit::Milliliter);
        assert!((q.value - 1500.0).abs() < 0.01);

        let q = extract_quantity("peynir 1 kg").unwrap();
        assert_eq!(q.unit, QuantityUnit::Gram);
        assert!((q.value - 1000.0).abs() < 0.01);

        let q = extract_quantity("CIPS 150GR").unwrap();
        assert_eq!(q.unit, QuantityUnit::Gram);
        assert!((q.value - 150.0).abs() < 0.01);

        let q = extract_quantity("SU 500 ML").unwrap();
        assert_eq!(q.unit, QuantityUnit::Milliliter);
        assert!((q.value - 500.0).abs() < 0.01);

        assert!(extract_quantity("EKMEK BUYUK").is_none());
        // Unit glued to a word is not a pack size.
        assert!(extract_quantity("MODEL 5 GLASS").is_none());
    }

    #[test]
    fn similarity_uses_bands_and_ratio() {
        let ml = |v| Some(Quantity { value: v, unit: QuantityUnit::Milliliter });
        let g = |v| Some(Quantity { value: v, unit: QuantityUnit::Gram });

        assert!(is_quantity_similar(ml(500.0), ml(750.0)));
        assert!(!is_quantity_similar(ml(330.0), ml(1000.0)));
        assert!(!is_quantity_similar(ml(200.0), ml(1000.0)), "ratio above 3");
        assert!(!is_quantity_similar(ml(500.0), g(500.0)), "unit mismatch");
        assert!(is_quantity_similar(None, g(500.0)));
        assert!(is_quantity_similar(g(0.0), g(500.0)));
        assert!(is_quantity_similar(g(50.0), g(100.0)));
        assert!(!is_quantity_similar(g(100.0), g(150.0)));
    }
}
