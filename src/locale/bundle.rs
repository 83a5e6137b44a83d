use super::{BuiltinLocales, LocaleBackend};
use crate::calendar::util::{MonthExt, WeekdayExt};
use ::fluent::{FluentBundle, FluentResource};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;
use time::{Date, Weekday};
use tracing::{debug, trace};
use unic_langid::LanguageIdentifier;

/// Month & weekday names read from Fluent resources.
///
/// A resource supplies messages `month-1` … `month-12` (full month names) and
/// `weekday-1` … `weekday-7` (short weekday names, Monday first).  Anything a
/// bundle lacks is looked up in the fallback backend.
///
/// ```text
/// month-1 = tammikuu
/// weekday-1 = ma
/// ```
pub struct FluentLocales<F = BuiltinLocales> {
    bundles: HashMap<LanguageIdentifier, FluentBundle<FluentResource>>,
    fallback: F,
}

impl FluentLocales<BuiltinLocales> {
    pub fn new() -> Self {
        FluentLocales::with_fallback(BuiltinLocales)
    }
}

impl Default for FluentLocales<BuiltinLocales> {
    fn default() -> Self {
        FluentLocales::new()
    }
}

impl<F> FluentLocales<F> {
    pub fn with_fallback(fallback: F) -> Self {
        FluentLocales {
            bundles: HashMap::new(),
            fallback,
        }
    }

    /// Parses `source` as Fluent and adds its messages to the bundle for
    /// `locale`
    pub fn add_resource(
        &mut self,
        locale: LanguageIdentifier,
        source: &str,
    ) -> Result<(), LocaleError> {
        let resource = FluentResource::try_new(source.to_owned()).map_err(|(_, errors)| {
            LocaleError::Parse {
                locale: locale.to_string(),
                errors: errors.len(),
            }
        })?;
        let tag = locale.to_string();
        let bundle = self.bundles.entry(locale).or_insert_with_key(|locale| {
            let mut bundle = FluentBundle::new(vec![locale.clone()]);
            bundle.set_use_isolating(false);
            bundle
        });
        bundle
            .add_resource(resource)
            .map_err(|errors| LocaleError::Conflict {
                locale: tag,
                errors: errors.len(),
            })
    }

    pub fn with_resource(
        mut self,
        locale: LanguageIdentifier,
        source: &str,
    ) -> Result<Self, LocaleError> {
        self.add_resource(locale, source)?;
        Ok(self)
    }

    pub fn has_locale(&self, locale: &LanguageIdentifier) -> bool {
        self.bundles.contains_key(locale)
    }

    fn message(&self, locale: &LanguageIdentifier, id: &str) -> Option<String> {
        let bundle = self.bundles.get(locale)?;
        let pattern = bundle.get_message(id)?.value()?;
        let mut errors = Vec::new();
        let text = bundle.format_pattern(pattern, None, &mut errors);
        if !errors.is_empty() {
            debug!(%locale, id, ?errors, "errors while formatting Fluent message");
        }
        trace!(%locale, id, %text, "resolved Fluent message");
        Some(text.into_owned())
    }
}

impl<F: LocaleBackend> LocaleBackend for FluentLocales<F> {
    fn month_name(&self, locale: &LanguageIdentifier, date: Date) -> Option<String> {
        let id = format!("month-{}", date.month().index0() + 1);
        self.message(locale, &id)
            .or_else(|| self.fallback.month_name(locale, date))
    }

    fn weekday_name(&self, locale: &LanguageIdentifier, weekday: Weekday) -> Option<String> {
        let id = format!("weekday-{}", weekday.iso_number());
        self.message(locale, &id)
            .or_else(|| self.fallback.weekday_name(locale, weekday))
    }
}

impl<F: fmt::Debug> fmt::Debug for FluentLocales<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut locales = self.bundles.keys().map(ToString::to_string).collect::<Vec<_>>();
        locales.sort_unstable();
        f.debug_struct("FluentLocales")
            .field("locales", &locales)
            .field("fallback", &self.fallback)
            .finish()
    }
}

#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum LocaleError {
    #[error("failed to parse Fluent resource for {locale}: {errors} error(s)")]
    Parse { locale: String, errors: usize },
    #[error("Fluent resource for {locale} redefines {errors} existing message(s)")]
    Conflict { locale: String, errors: usize },
}
