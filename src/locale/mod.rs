//! Localized month & weekday labels.
//!
//! Names come from a pluggable [`LocaleBackend`].  Lookups for a tag such as
//! `fr-CA` try the full tag, then its bare language, then English.
mod builtin;
mod bundle;
pub use self::builtin::BuiltinLocales;
pub use self::bundle::{FluentLocales, LocaleError};
use crate::calendar::util::{MONTHS, WEEKDAYS};
use time::{Date, Weekday};
use tracing::debug;
use unic_langid::{langid, LanguageIdentifier};

/// Source of localized calendar names
pub trait LocaleBackend {
    /// Full ("standalone") name of the month containing `date`
    fn month_name(&self, locale: &LanguageIdentifier, date: Date) -> Option<String>;

    /// Abbreviated weekday name
    fn weekday_name(&self, locale: &LanguageIdentifier, weekday: Weekday) -> Option<String>;
}

impl<T: LocaleBackend + ?Sized> LocaleBackend for &T {
    fn month_name(&self, locale: &LanguageIdentifier, date: Date) -> Option<String> {
        (**self).month_name(locale, date)
    }

    fn weekday_name(&self, locale: &LanguageIdentifier, weekday: Weekday) -> Option<String> {
        (**self).weekday_name(locale, weekday)
    }
}

impl<T: LocaleBackend + ?Sized> LocaleBackend for Box<T> {
    fn month_name(&self, locale: &LanguageIdentifier, date: Date) -> Option<String> {
        (**self).month_name(locale, date)
    }

    fn weekday_name(&self, locale: &LanguageIdentifier, weekday: Weekday) -> Option<String> {
        (**self).weekday_name(locale, weekday)
    }
}

pub fn fallback_locale() -> LanguageIdentifier {
    langid!("en")
}

/// Parses a BCP-47 tag, falling back to English if it is malformed
pub fn parse_locale(tag: &str) -> LanguageIdentifier {
    tag.parse().unwrap_or_else(|e| {
        debug!(tag, error = %e, "unparseable locale tag; using English");
        fallback_locale()
    })
}

/// Candidate identifiers to try, most specific first
fn lookup_chain(locale: &LanguageIdentifier) -> Vec<LanguageIdentifier> {
    let mut chain = vec![locale.clone()];
    let bare = LanguageIdentifier::from_parts(locale.language, None, None, &[]);
    if bare != *locale {
        chain.push(bare);
    }
    let fallback = fallback_locale();
    if !chain.contains(&fallback) {
        chain.push(fallback);
    }
    chain
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LocalizationProvider<B = BuiltinLocales> {
    backend: B,
    reference_year: i32,
}

impl LocalizationProvider<BuiltinLocales> {
    pub fn builtin(reference_year: i32) -> Self {
        LocalizationProvider::new(BuiltinLocales, reference_year)
    }
}

impl<B: LocaleBackend> LocalizationProvider<B> {
    /// `reference_year` is the year whose months are named by
    /// [`month_names()`][LocalizationProvider::month_names]; normally the year
    /// of the calendar's start date.
    pub fn new(backend: B, reference_year: i32) -> Self {
        LocalizationProvider {
            backend,
            reference_year,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn reference_year(&self) -> i32 {
        self.reference_year
    }

    /// The twelve month names of the reference year, January first
    pub fn month_names(&self, locale: &str) -> [String; 12] {
        let chain = lookup_chain(&parse_locale(locale));
        MONTHS.map(|month| {
            match Date::from_calendar_date(self.reference_year, month, 1) {
                Ok(date) => self.month_name_in(&chain, date),
                Err(_) => month.to_string(),
            }
        })
    }

    pub fn month_name(&self, date: Date, locale: &str) -> String {
        self.month_name_in(&lookup_chain(&parse_locale(locale)), date)
    }

    /// Short weekday names, Monday first
    pub fn weekday_names(&self, locale: &str) -> [String; 7] {
        let chain = lookup_chain(&parse_locale(locale));
        WEEKDAYS.map(|wd| {
            chain
                .iter()
                .find_map(|id| self.backend.weekday_name(id, wd))
                .unwrap_or_else(|| wd.to_string().chars().take(3).collect())
        })
    }

    fn month_name_in(&self, chain: &[LanguageIdentifier], date: Date) -> String {
        chain
            .iter()
            .find_map(|id| self.backend.month_name(id, date))
            .unwrap_or_else(|| date.month().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[derive(Debug)]
    struct NullBackend;

    impl LocaleBackend for NullBackend {
        fn month_name(&self, _locale: &LanguageIdentifier, _date: Date) -> Option<String> {
            None
        }

        fn weekday_name(&self, _locale: &LanguageIdentifier, _weekday: Weekday) -> Option<String> {
            None
        }
    }

    #[test]
    fn test_english_month_names() {
        let provider = LocalizationProvider::builtin(2024);
        assert_eq!(
            provider.month_names("en"),
            [
                "January",
                "February",
                "March",
                "April",
                "May",
                "June",
                "July",
                "August",
                "September",
                "October",
                "November",
                "December",
            ]
        );
    }

    #[test]
    fn test_english_weekday_names() {
        let provider = LocalizationProvider::builtin(2024);
        assert_eq!(
            provider.weekday_names("en"),
            ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"]
        );
    }

    #[test]
    fn test_weekday_names_ignore_reference_year() {
        assert_eq!(
            LocalizationProvider::builtin(1999).weekday_names("fr"),
            LocalizationProvider::builtin(2031).weekday_names("fr"),
        );
    }

    #[test]
    fn test_turkish_names() {
        let provider = LocalizationProvider::builtin(2025);
        let months = provider.month_names("tr");
        assert_eq!(months[1], "Şubat");
        assert_eq!(months[11], "Aralık");
        assert_eq!(
            provider.weekday_names("tr"),
            ["Pzt", "Sal", "Çar", "Per", "Cum", "Cmt", "Paz"]
        );
    }

    #[test]
    fn test_french_names() {
        let provider = LocalizationProvider::builtin(2025);
        assert_eq!(provider.month_names("fr")[7], "août");
        assert_eq!(provider.weekday_names("fr")[0], "lun.");
    }

    #[test]
    fn test_region_falls_back_to_language() {
        let provider = LocalizationProvider::builtin(2025);
        assert_eq!(provider.month_name(date!(2025 - 03 - 09), "de-AT"), "März");
    }

    #[test]
    fn test_unknown_locale_falls_back_to_english() {
        let provider = LocalizationProvider::builtin(2025);
        assert_eq!(provider.month_name(date!(2025 - 03 - 09), "xx"), "March");
        assert_eq!(provider.month_name(date!(2025 - 03 - 09), "not a tag!"), "March");
    }

    #[test]
    fn test_backend_without_names() {
        let provider = LocalizationProvider::new(NullBackend, 2025);
        assert_eq!(provider.month_names("en")[0], "January");
        assert_eq!(provider.weekday_names("en")[6], "Sun");
    }

    #[test]
    fn test_lookup_chain() {
        let chain = lookup_chain(&parse_locale("pt-BR"));
        assert_eq!(
            chain,
            [langid!("pt-BR"), langid!("pt"), langid!("en")]
        );
        assert_eq!(lookup_chain(&parse_locale("en")), [langid!("en")]);
    }
}
