//! Locale decomposition: `lang[_COUNTRY][.codeset][@modifier]`.

/// Language, country and modifier taken from a POSIX locale string.
/// The codeset is parsed but never kept.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Locale {
    pub language: Option<String>,
    pub country: Option<String>,
    pub modifier: Option<String>,
}

impl Locale {
    /// Decompose a locale string such as `sr_RS.UTF-8@latin`.
    ///
    /// Each component must be made of ASCII letters. The first component that
    /// is not leaves itself and everything after it unset, so `"xx-YY"` gives
    /// an empty locale.
    pub fn parse(locale: &str) -> Self {
        let mut parsed = Locale::default();

        let (rest, modifier) = match locale.split_once('@') {
            Some((rest, modifier)) => (rest, Some(modifier)),
            None => (locale, None),
        };
        let rest = rest.split_once('.').map_or(rest, |(rest, _codeset)| rest);
        let (language, country) = match rest.split_once('_') {
            Some((language, country)) => (language, Some(country)),
            None => (rest, None),
        };

        if !is_letters(language) {
            return parsed;
        }
        parsed.language = Some(language.to_string());

        if let Some(country) = country {
            if !is_letters(country) {
                return parsed;
            }
            parsed.country = Some(country.to_string());
        }

        if let Some(modifier) = modifier.filter(|m| is_letters(m)) {
            parsed.modifier = Some(modifier.to_string());
        }

        parsed
    }

    /// Localized key names to try for `key`, most specific first.
    /// The unlocalized key itself is not included.
    pub fn localized_keys(&self, key: &str) -> Vec<String> {
        let Some(lang) = &self.language else {
            return Vec::new();
        };

        let mut keys = Vec::with_capacity(4);
        if let Some(country) = &self.country {
            if let Some(modifier) = &self.modifier {
                keys.push(format!("{key}[{lang}_{country}@{modifier}]"));
            }
            keys.push(format!("{key}[{lang}_{country}]"));
        }
        if let Some(modifier) = &self.modifier {
            keys.push(format!("{key}[{lang}@{modifier}]"));
        }
        keys.push(format!("{key}[{lang}]"));
        keys
    }
}

/// The message locale string from `LC_ALL`, `LC_MESSAGES` or `LANG`.
pub fn env_locale() -> Option<String> {
    ["LC_ALL", "LC_MESSAGES", "LANG"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find(|value| !value.is_empty())
}

fn is_letters(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_alphabetic())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_locale() {
        let locale = Locale::parse("sr_RS.UTF-8@latin");
        assert_eq!(locale.language.as_deref(), Some("sr"));
        assert_eq!(locale.country.as_deref(), Some("RS"));
        assert_eq!(locale.modifier.as_deref(), Some("latin"));
    }

    #[test]
    fn test_parse_language_only() {
        let locale = Locale::parse("de");
        assert_eq!(locale.language.as_deref(), Some("de"));
        assert_eq!(locale.country, None);
        assert_eq!(locale.modifier, None);
    }

    #[test]
    fn test_parse_modifier_without_country() {
        let locale = Locale::parse("ca@valencia");
        assert_eq!(locale.language.as_deref(), Some("ca"));
        assert_eq!(locale.country, None);
        assert_eq!(locale.modifier.as_deref(), Some("valencia"));
    }

    #[test]
    fn test_parse_rejects_non_letters() {
        assert_eq!(Locale::parse("xx-YY"), Locale::default());
        assert_eq!(Locale::parse(""), Locale::default());

        let locale = Locale::parse("en_U5.UTF-8");
        assert_eq!(locale.language.as_deref(), Some("en"));
        assert_eq!(locale.country, None);
    }

    #[test]
    fn test_localized_keys_order() {
        let locale = Locale::parse("sr_RS@latin");
        assert_eq!(
            locale.localized_keys("Name"),
            vec![
                "Name[sr_RS@latin]",
                "Name[sr_RS]",
                "Name[sr@latin]",
                "Name[sr]",
            ]
        );
        assert!(Locale::default().localized_keys("Name").is_empty());
    }
}
