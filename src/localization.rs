//! Localization support for user-facing bot messages.
//!
//! Loads fluent bundles for the supported locales from `./locales/` and
//! resolves messages by the Telegram user's language code, falling back to
//! English.

use std::collections::HashMap;
use std::fs;
use std::sync::{Arc, LazyLock};

use anyhow::Result;
use fluent_bundle::concurrent::FluentBundle;
use fluent_bundle::{FluentArgs, FluentResource, FluentValue};
use unic_langid::LanguageIdentifier;

/// Locales with a bundle under `./locales/`
const SUPPORTED_LOCALES: &[&str] = &["en", "ru"];

/// Fallback locale when the user's language has no bundle
const FALLBACK_LOCALE: &str = "en";

/// Localization manager holding one fluent bundle per supported locale
pub struct LocalizationManager {
    bundles: HashMap<String, Arc<FluentBundle<FluentResource>>>,
}

impl LocalizationManager {
    /// Create a new localization manager
    pub fn new() -> Result<Self> {
        let mut bundles = HashMap::new();

        for locale in SUPPORTED_LOCALES {
            let langid: LanguageIdentifier = locale.parse()?;
            let bundle = Self::create_bundle(&langid)?;
            bundles.insert(locale.to_string(), Arc::new(bundle));
        }

        Ok(Self { bundles })
    }

    /// Create a fluent bundle for a specific locale
    fn create_bundle(locale: &LanguageIdentifier) -> Result<FluentBundle<FluentResource>> {
        let mut bundle = FluentBundle::new_concurrent(vec![locale.clone()]);

        // Load the main resource file
        let resource_path = format!("./locales/{}/main.ftl", locale);
        if let Ok(content) = fs::read_to_string(&resource_path) {
            if let Ok(resource) = FluentResource::try_new(content) {
                let _ = bundle.add_resource(resource);
            }
        }

        Ok(bundle)
    }

    /// Pick the bundle for a Telegram language code, falling back to English
    fn bundle_for(&self, language_code: Option<&str>) -> &FluentBundle<FluentResource> {
        let locale = language_code
            .map(|code| code.split('-').next().unwrap_or(code))
            .filter(|base| self.bundles.contains_key(*base))
            .unwrap_or(FALLBACK_LOCALE);
        self.bundles.get(locale).unwrap()
    }

    /// Get a localized message
    pub fn get_message(
        &self,
        key: &str,
        args: Option<&FluentArgs>,
        language_code: Option<&str>,
    ) -> String {
        let bundle = self.bundle_for(language_code);

        let msg = match bundle.get_message(key) {
            Some(msg) => msg,
            None => return format!("Missing translation: {}", key),
        };

        let pattern = match msg.value() {
            Some(pattern) => pattern,
            None => return format!("Missing value for key: {}", key),
        };

        let mut value = String::new();
        let _ = bundle.write_pattern(&mut value, pattern, args, &mut vec![]);
        value
    }
}

/// Global localization instance
static LOCALIZATION_MANAGER: LazyLock<LocalizationManager> = LazyLock::new(|| {
    LocalizationManager::new().expect("failed to initialize localization bundles")
});

/// Get a localized message for a Telegram language code
pub fn t_lang(key: &str, language_code: Option<&str>) -> String {
    LOCALIZATION_MANAGER.get_message(key, None, language_code)
}

/// Get a localized message with arguments for a Telegram language code
pub fn t_args_lang(key: &str, args: &[(&str, &str)], language_code: Option<&str>) -> String {
    let fluent_args =
        FluentArgs::from_iter(args.iter().map(|(k, v)| (*k, FluentValue::from(*v))));
    LOCALIZATION_MANAGER.get_message(key, Some(&fluent_args), language_code)
}
