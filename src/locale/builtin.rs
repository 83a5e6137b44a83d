use super::LocaleBackend;
use crate::calendar::util::{MonthExt, WeekdayExt};
use time::{Date, Weekday};
use unic_langid::LanguageIdentifier;

struct LocaleTable {
    language: &'static str,
    months: [&'static str; 12],
    weekdays: [&'static str; 7],
}

static TABLES: &[LocaleTable] = &[
    LocaleTable {
        language: "en",
        months: [
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
        ],
        weekdays: ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"],
    },
    LocaleTable {
        language: "tr",
        months: [
            "Ocak", "Şubat", "Mart", "Nisan", "Mayıs", "Haziran", "Temmuz", "Ağustos", "Eylül",
            "Ekim", "Kasım", "Aralık",
        ],
        weekdays: ["Pzt", "Sal", "Çar", "Per", "Cum", "Cmt", "Paz"],
    },
    LocaleTable {
        language: "fr",
        months: [
            "janvier",
            "février",
            "mars",
            "avril",
            "mai",
            "juin",
            "juillet",
            "août",
            "septembre",
            "octobre",
            "novembre",
            "décembre",
        ],
        weekdays: ["lun.", "mar.", "mer.", "jeu.", "ven.", "sam.", "dim."],
    },
    LocaleTable {
        language: "de",
        months: [
            "Januar",
            "Februar",
            "März",
            "April",
            "Mai",
            "Juni",
            "Juli",
            "August",
            "September",
            "Oktober",
            "November",
            "Dezember",
        ],
        weekdays: ["Mo.", "Di.", "Mi.", "Do.", "Fr.", "Sa.", "So."],
    },
    LocaleTable {
        language: "es",
        months: [
            "enero",
            "febrero",
            "marzo",
            "abril",
            "mayo",
            "junio",
            "julio",
            "agosto",
            "septiembre",
            "octubre",
            "noviembre",
            "diciembre",
        ],
        weekdays: ["lun", "mar", "mié", "jue", "vie", "sáb", "dom"],
    },
    LocaleTable {
        language: "ja",
        months: [
            "1月", "2月", "3月", "4月", "5月", "6月", "7月", "8月", "9月", "10月", "11月", "12月",
        ],
        weekdays: ["月", "火", "水", "木", "金", "土", "日"],
    },
    LocaleTable {
        language: "zh",
        months: [
            "一月",
            "二月",
            "三月",
            "四月",
            "五月",
            "六月",
            "七月",
            "八月",
            "九月",
            "十月",
            "十一月",
            "十二月",
        ],
        weekdays: ["周一", "周二", "周三", "周四", "周五", "周六", "周日"],
    },
];

/// Month & weekday names compiled into the crate, keyed by language subtag
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct BuiltinLocales;

impl BuiltinLocales {
    /// Language subtags for which names are available
    pub fn languages() -> impl Iterator<Item = &'static str> {
        TABLES.iter().map(|t| t.language)
    }

    fn table(locale: &LanguageIdentifier) -> Option<&'static LocaleTable> {
        let language = locale.language.as_str();
        TABLES.iter().find(|t| t.language == language)
    }
}

impl LocaleBackend for BuiltinLocales {
    fn month_name(&self, locale: &LanguageIdentifier, date: Date) -> Option<String> {
        let table = BuiltinLocales::table(locale)?;
        table
            .months
            .get(date.month().index0())
            .map(|&s| s.to_owned())
    }

    fn weekday_name(&self, locale: &LanguageIdentifier, weekday: Weekday) -> Option<String> {
        let table = BuiltinLocales::table(locale)?;
        table
            .weekdays
            .get(weekday.iso_number() - 1)
            .map(|&s| s.to_owned())
    }
}
