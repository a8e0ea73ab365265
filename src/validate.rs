//! Closed input domains and the predicates the facade checks them with.
//!
//! Matching is exact and case-sensitive: `"na"` is a region, `"NA"` is not.

use regex::{Regex, RegexBuilder};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $what:literal {
            $($(#[$vmeta:meta])* $variant:ident => $value:literal,)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($(#[$vmeta])* $variant,)+
        }

        impl $name {
            /// Every value, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant,)+];

            /// The wire representation.
            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $value,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownValue;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($value => Ok($name::$variant),)+
                    _ => Err(UnknownValue {
                        kind: $what,
                        value: s.to_string(),
                    }),
                }
            }
        }
    };
}

/// A string outside one of the closed domains.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown {kind} \"{value}\"")]
pub struct UnknownValue {
    kind: &'static str,
    value: String,
}

string_enum! {
    /// Game server region.
    Region, "region" {
        Ap => "ap",
        Eu => "eu",
        Kr => "kr",
        Na => "na",
    }
}

string_enum! {
    /// Locale used by the website articles endpoint.
    CountryCode, "country code" {
        PtBr => "pt-br",
        DeDe => "de-de",
        EsEs => "es-es",
        FrFr => "fr-fr",
        EnGb => "en-gb",
        ItIt => "it-it",
        JaJp => "ja-jp",
        KoKr => "ko-kr",
        EsMx => "es-mx",
        RuRu => "ru-ru",
        TrTr => "tr-tr",
        EnUs => "en-us",
    }
}

string_enum! {
    /// Competitive act accepted as an MMR filter.
    Act, "act" {
        E3A1 => "e3a1",
        E2A3 => "e2a3",
        E2A2 => "e2a2",
        E2A1 => "e2a1",
        E1A3 => "e1a3",
        E1A2 => "e1a2",
        E1A1 => "e1a1",
    }
}

string_enum! {
    /// Category filter for website articles.
    ArticleFilter, "article filter" {
        GameUpdates => "game_updates",
        Dev => "dev",
        Esports => "esports",
        Announcements => "announcements",
    }
}

static PUUID: LazyLock<Regex> = LazyLock::new(|| {
    RegexBuilder::new(
        r"^[0-9a-f]{8}-[0-9a-f]{4}-[0-5][0-9a-f]{3}-[89ab][0-9a-f]{3}-[0-9a-f]{12}$",
    )
    .case_insensitive(true)
    .build()
    .expect("PUUID pattern is valid")
});

/// Whether `region` is one of the [`Region`] codes, lowercase.
pub fn is_valid_region(region: &str) -> bool {
    region.parse::<Region>().is_ok()
}

/// Whether `country_code` is one of the supported [`CountryCode`] locales.
pub fn is_valid_country_code(country_code: &str) -> bool {
    country_code.parse::<CountryCode>().is_ok()
}

/// An absent filter is valid.
pub fn is_valid_act_filter(filter: Option<&str>) -> bool {
    filter.map_or(true, |f| f.parse::<Act>().is_ok())
}

/// Checks the `xxxxxxxx-xxxx-Vxxx-Nxxx-xxxxxxxxxxxx` layout, with the version
/// nibble `V` in `0-5` and the variant nibble `N` in `8, 9, a, b`.
pub fn is_valid_puuid(puuid: &str) -> bool {
    PUUID.is_match(puuid)
}
