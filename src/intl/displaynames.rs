use icu::experimental::displaynames::{
    DisplayNamesOptions as IcuDisplayNamesOptions, LocaleDisplayNamesFormatter,
    RegionDisplayNames,
};
use icu::locale::{Locale as IcuLocale, locale};
use serde::Serialize;

use super::{IntlError, Result, parse_locale};

/// English names for a locale's language and region subtags.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LocaleDescription {
    pub language: String,
    /// `None` for identifiers without a region subtag, or when the data has no
    /// name for the region.
    pub region: Option<String>,
}

pub fn describe_locale(locale_str: &str) -> Result<LocaleDescription> {
    let target = parse_locale(locale_str)?;
    let english: IcuLocale = locale!("en");

    let languages =
        LocaleDisplayNamesFormatter::try_new((&english).into(), IcuDisplayNamesOptions::default())
            .map_err(|e| load_error("language name", &e))?;
    // Only the language subtag: the region gets its own column.
    let language_only = parse_locale(target.id.language.as_str())?;
    let language = languages.of(&language_only).into_owned();

    let region = match target.id.region {
        Some(region) => {
            let regions = RegionDisplayNames::try_new(
                (&english).into(),
                IcuDisplayNamesOptions::default(),
            )
            .map_err(|e| load_error("region name", &e))?;
            regions.of(region).map(str::to_string)
        }
        None => None,
    };

    Ok(LocaleDescription { language, region })
}

fn load_error(what: &'static str, e: &impl std::fmt::Debug) -> IntlError {
    IntlError::Load {
        what,
        locale: "en".to_string(),
        detail: format!("{e:?}"),
    }
}

impl LocaleDescription {
    /// `English (United States)`, or just the language when there is no region.
    pub fn display_name(&self) -> String {
        match &self.region {
            Some(region) => format!("{} ({})", self.language, region),
            None => self.language.clone(),
        }
    }
}
