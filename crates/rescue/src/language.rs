use serde::{Deserialize, Serialize};

/// Supported query languages. Detection is deterministic and script-based rather than
/// statistical: the catalog only needs to distinguish a handful of scripts, and a fixed
/// rule gives the same answer for the same input forever, which a seeded statistical
/// model can only approximate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    Hi,
    Bn,
    Mr,
}

impl Language {
    pub fn as_str(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Hi => "hi",
            Language::Bn => "bn",
            Language::Mr => "mr",
        }
    }
}

/// Marathi function words that disambiguate Marathi from Hindi when both share the
/// Devanagari block — Marathi text routinely contains these even in short queries.
const MARATHI_MARKERS: &[&str] = &["आहे", "आणि", "करण्यासाठी", "यांनी", "मध्ये"];

/// Detects the query's language by Unicode script block, falling back to English for
/// ASCII/Latin text.
pub fn detect_language(text: &str) -> Language {
    let mut has_devanagari = false;
    let mut has_bengali = false;

    for c in text.chars() {
        let code = c as u32;
        if (0x0900..=0x097F).contains(&code) {
            has_devanagari = true;
        } else if (0x0980..=0x09FF).contains(&code) {
            has_bengali = true;
        }
    }

    if has_bengali {
        return Language::Bn;
    }
    if has_devanagari {
        if MARATHI_MARKERS.iter().any(|m| text.contains(m)) {
            return Language::Mr;
        }
        return Language::Hi;
    }
    Language::En
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_text_is_english() {
        assert_eq!(detect_language("gas welder"), Language::En);
    }

    #[test]
    fn devanagari_text_without_marathi_markers_is_hindi() {
        assert_eq!(detect_language("दर्जी"), Language::Hi);
    }

    #[test]
    fn devanagari_text_with_marathi_marker_is_marathi() {
        assert_eq!(detect_language("शिंपी आहे"), Language::Mr);
    }

    #[test]
    fn bengali_text_is_bengali() {
        assert_eq!(detect_language("দর্জি"), Language::Bn);
    }

    #[test]
    fn mixed_empty_input_defaults_to_english() {
        assert_eq!(detect_language(""), Language::En);
    }
}
