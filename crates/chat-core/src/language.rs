//! Supported language table.

/// Fallback language when detection fails or a preference is missing.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Languages the service accepts as user preferences and translation targets,
/// as `(code, native name)` pairs.
pub const SUPPORTED_LANGUAGES: &[(&str, &str)] = &[
    ("en", "English"),
    ("fr", "Français"),
    ("es", "Español"),
    ("zh", "中文"),
    ("hi", "हिन्दी"),
    ("ar", "العربية"),
    ("pt", "Português"),
    ("bn", "বাংলা"),
    ("ru", "Русский"),
    ("ja", "日本語"),
    ("de", "Deutsch"),
    ("ko", "한국어"),
    ("it", "Italiano"),
    ("tr", "Türkçe"),
    ("vi", "Tiếng Việt"),
    ("th", "ไทย"),
    ("pl", "Polski"),
    ("nl", "Nederlands"),
    ("sv", "Svenska"),
    ("fa", "فارسی"),
];

/// Whether `code` is a supported language code.
pub fn is_supported(code: &str) -> bool {
    SUPPORTED_LANGUAGES.iter().any(|(c, _)| *c == code)
}

/// Native name for a language code, if supported.
pub fn language_name(code: &str) -> Option<&'static str> {
    SUPPORTED_LANGUAGES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_supported() {
        assert!(is_supported(DEFAULT_LANGUAGE));
    }

    #[test]
    fn test_unknown_code() {
        assert!(!is_supported("xx"));
        assert!(language_name("xx").is_none());
    }

    #[test]
    fn test_language_name() {
        assert_eq!(language_name("fr"), Some("Français"));
        assert_eq!(language_name("ja"), Some("日本語"));
    }

    #[test]
    fn test_codes_are_unique() {
        for (i, (code, _)) in SUPPORTED_LANGUAGES.iter().enumerate() {
            assert!(
                !SUPPORTED_LANGUAGES[i + 1..].iter().any(|(c, _)| c == code),
                "duplicate language code: {}",
                code
            );
        }
    }
}
