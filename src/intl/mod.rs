mod datetimeformat;
mod displaynames;

pub use datetimeformat::format;
pub use displaynames::{LocaleDescription, describe_locale};

use icu::locale::Locale as IcuLocale;
use thiserror::Error;

/// Failures reported by the ICU formatting facility.
///
/// These are passed through as-is: nothing here substitutes a fallback.
#[derive(Debug, Error)]
pub enum IntlError {
    #[error("invalid locale identifier {locale:?}: {detail}")]
    InvalidLocale { locale: String, detail: String },
    #[error("no {what} data for locale {locale}: {detail}")]
    Load {
        what: &'static str,
        locale: String,
        detail: String,
    },
    #[error("instant {instant} is outside the supported calendar range: {detail}")]
    OutOfRange { instant: String, detail: String },
}

pub type Result<T> = std::result::Result<T, IntlError>;

pub(crate) fn parse_locale(locale_str: &str) -> Result<IcuLocale> {
    locale_str
        .parse::<IcuLocale>()
        .map_err(|e| IntlError::InvalidLocale {
            locale: locale_str.to_string(),
            detail: format!("{e:?}"),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_well_formed_locales() {
        let locale = parse_locale("en-US").unwrap();
        assert_eq!(locale.id.language.as_str(), "en");
        assert_eq!(locale.id.region.map(|r| r.as_str().to_string()), Some("US".to_string()));
        assert!(parse_locale("sr-Latn-RS").is_ok());
    }

    #[test]
    fn malformed_locale_is_reported() {
        let err = parse_locale("en_US!").unwrap_err();
        assert!(matches!(err, IntlError::InvalidLocale { ref locale, .. } if locale == "en_US!"));
        assert!(err.to_string().contains("en_US!"));
    }
}
