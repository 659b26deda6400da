//! Localised diagnostics and step-name prefixes.
//!
//! Messages come from Fluent catalogues embedded at build time. A
//! process-wide loader starts out in English; [`ScopedLocalization`] swaps in
//! a different loader for the current thread until the guard drops.

use std::cell::RefCell;
use std::sync::{LazyLock, PoisonError, RwLock};

use fluent::FluentArgs;
use i18n_embed::fluent::{FluentLanguageLoader, fluent_language_loader};
use rust_embed::RustEmbed;
use thiserror::Error;
use unic_langid::{LanguageIdentifier, langid};

/// Fluent catalogues bundled with the crate, one directory per locale.
///
/// # Examples
/// ```
/// # use cukeplan::localization::Localizations;
/// # use i18n_embed::fluent::fluent_language_loader;
/// # use unic_langid::langid;
/// let loader = fluent_language_loader!();
/// let selected = i18n_embed::select(&loader, &Localizations, &[langid!("fr")]).unwrap();
/// assert!(selected.contains(&langid!("fr")));
/// ```
#[derive(RustEmbed)]
#[folder = "i18n"]
pub struct Localizations;

const FALLBACK_LOCALE: LanguageIdentifier = langid!("en-US");

static SHARED: LazyLock<RwLock<FluentLanguageLoader>> = LazyLock::new(|| {
    let loader = fluent_language_loader!();
    if let Err(error) = i18n_embed::select(&loader, &Localizations, &[FALLBACK_LOCALE]) {
        log::warn!("bundled {FALLBACK_LOCALE} catalogue failed to load: {error}");
    }
    RwLock::new(loader)
});

thread_local! {
    static THREAD_LOADER: RefCell<Option<FluentLanguageLoader>> = const { RefCell::new(None) };
}

/// Failures while switching or inspecting locales.
#[derive(Debug, Error)]
pub enum LocalizationError {
    /// A thread panicked while holding the shared loader.
    #[error("shared message catalogue lock is poisoned")]
    Poisoned,
    /// The requested catalogues could not be selected.
    #[error("message catalogue selection failed: {0}")]
    Loader(#[from] i18n_embed::I18nEmbedError),
}

/// Guard that keeps a thread-local locale active until dropped.
///
/// Guards nest: dropping one reinstates whatever loader it displaced.
#[must_use]
pub struct ScopedLocalization {
    displaced: Option<FluentLanguageLoader>,
}

impl ScopedLocalization {
    /// Select the best bundled match for `requested` on this thread.
    ///
    /// # Errors
    ///
    /// Returns [`LocalizationError::Loader`] if selection fails.
    pub fn new(requested: &[LanguageIdentifier]) -> Result<Self, LocalizationError> {
        let loader = fluent_language_loader!();
        i18n_embed::select(&loader, &Localizations, requested)?;
        let displaced = THREAD_LOADER.with(|slot| slot.replace(Some(loader)));
        Ok(Self { displaced })
    }
}

impl Drop for ScopedLocalization {
    fn drop(&mut self) {
        let displaced = self.displaced.take();
        THREAD_LOADER.with(|slot| slot.replace(displaced));
    }
}

/// Run `f` against the thread-local loader if one is installed, otherwise
/// against the shared one.
fn with_active<R>(
    f: impl FnOnce(&FluentLanguageLoader) -> R,
) -> Result<R, LocalizationError> {
    THREAD_LOADER.with(|slot| {
        if let Some(loader) = slot.borrow().as_ref() {
            return Ok(f(loader));
        }
        let shared = SHARED.read().map_err(|_| LocalizationError::Poisoned)?;
        Ok(f(&shared))
    })
}

/// Like [`with_active`], but reads through a poisoned lock. Message lookup
/// must always produce text.
fn with_active_lenient<R>(f: impl FnOnce(&FluentLanguageLoader) -> R) -> R {
    THREAD_LOADER.with(|slot| {
        if let Some(loader) = slot.borrow().as_ref() {
            return f(loader);
        }
        let shared = SHARED.read().unwrap_or_else(PoisonError::into_inner);
        f(&shared)
    })
}

/// Replace the shared loader used by threads without a scoped override.
///
/// # Errors
///
/// Returns [`LocalizationError::Poisoned`] when the lock is poisoned.
pub fn install_localization_loader(loader: FluentLanguageLoader) -> Result<(), LocalizationError> {
    *SHARED.write().map_err(|_| LocalizationError::Poisoned)? = loader;
    Ok(())
}

/// Re-select locales on the active loader and report the ones chosen.
///
/// # Errors
///
/// Returns [`LocalizationError::Poisoned`] when the shared lock is poisoned
/// and [`LocalizationError::Loader`] when selection fails.
pub fn select_localizations(
    requested: &[LanguageIdentifier],
) -> Result<Vec<LanguageIdentifier>, LocalizationError> {
    with_active(|loader| i18n_embed::select(loader, &Localizations, requested))?
        .map_err(LocalizationError::from)
}

/// Locales of the active loader, most preferred first.
///
/// # Errors
///
/// Returns [`LocalizationError::Poisoned`] when the shared lock is poisoned.
pub fn current_languages() -> Result<Vec<LanguageIdentifier>, LocalizationError> {
    with_active(FluentLanguageLoader::current_languages)
}

/// Text of message `id`.
///
/// # Examples
/// ```
/// # use cukeplan::localization;
/// assert_eq!(localization::message("hook-step-before"), "Before");
/// ```
#[must_use]
pub fn message(id: &str) -> String {
    with_active_lenient(|loader| loader.get(id))
}

/// Text of message `id` with placeables filled in by `configure`.
///
/// Fluent brackets each placeable with directional isolates; see
/// [`strip_directional_isolates`].
#[must_use]
pub fn message_with_args<F>(id: &str, configure: F) -> String
where
    F: FnOnce(&mut FluentArgs<'static>),
{
    let mut args = FluentArgs::new();
    configure(&mut args);
    with_active_lenient(|loader| loader.get_args_fluent(id, Some(&args)))
}

/// Drop U+2066..=U+2069 from `text`.
#[must_use]
pub fn strip_directional_isolates(text: &str) -> String {
    text.chars()
        .filter(|c| !('\u{2066}'..='\u{2069}').contains(c))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn english_is_the_default() {
        let text = strip_directional_isolates(&message_with_args("undefined-step", |args| {
            args.set("text", "a step".to_owned());
        }));
        assert_eq!(text, r#"No matching step definitions found for text "a step""#);
    }

    #[test]
    fn nested_guards_unwind_in_order() {
        {
            let _french = ScopedLocalization::new(&[langid!("fr")])
                .unwrap_or_else(|e| panic!("select fr: {e}"));
            assert_eq!(message("hook-step-after"), "Après");
            {
                let _english = ScopedLocalization::new(&[langid!("en-US")])
                    .unwrap_or_else(|e| panic!("select en-US: {e}"));
                assert_eq!(message("hook-step-after"), "After");
            }
            assert_eq!(
                current_languages()
                    .unwrap_or_else(|e| panic!("languages: {e}"))
                    .first(),
                Some(&langid!("fr"))
            );
        }
        assert_eq!(message("hook-step-before"), "Before");
    }

    #[test]
    fn isolates_are_removed() {
        assert_eq!(strip_directional_isolates("\u{2068}7\u{2069} cukes"), "7 cukes");
    }
}
