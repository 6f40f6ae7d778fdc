/// Locales shown in the table, in display order.
pub const LOCALES: &[&str] = &[
    "en-US",
    "en-GB",
    "en-AU",
    "en-CA",
    "en-IN",
    "fr-FR",
    "fr-CA",
    "de-DE",
    "de-CH",
    "it-IT",
    "es-ES",
    "es-MX",
    "pt-BR",
    "pt-PT",
    "nl-NL",
    "sv-SE",
    "da-DK",
    "fi-FI",
    "nb-NO",
    "pl-PL",
    "cs-CZ",
    "ru-RU",
    "uk-UA",
    "tr-TR",
    "el-GR",
    "he-IL",
    "ar-EG",
    "hi-IN",
    "th-TH",
    "vi-VN",
    "id-ID",
    "ja-JP",
    "ko-KR",
    "zh-CN",
    "zh-TW",
    "sw",
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intl::describe_locale;

    #[test]
    fn every_locale_parses_and_has_a_language_name() {
        for locale in LOCALES {
            let desc = describe_locale(locale).unwrap();
            assert!(!desc.language.is_empty(), "{locale}");
        }
    }

    #[test]
    fn no_duplicates() {
        let mut seen = std::collections::HashSet::new();
        for locale in LOCALES {
            assert!(seen.insert(*locale), "duplicate {locale}");
        }
    }
}
