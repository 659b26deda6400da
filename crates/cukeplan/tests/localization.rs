//! Localised step names and preparation diagnostics.

mod common;

use common::{World, builder, load, pickles, plan};
use cukeplan::localization::{ScopedLocalization, current_languages};
use cukeplan::{NewTestCaseHook, PrepareError};
use unic_langid::langid;

#[test]
fn hook_prefixes_follow_the_active_locale() {
    let document = load("minimal.feature");
    let pickles = pickles(&document);
    let library = builder()
        .add_before_hook(NewTestCaseHook::new(|_, _| Ok(())))
        .add_after_hook(NewTestCaseHook::new(|_, _| Ok(())))
        .build()
        .unwrap_or_else(|e| panic!("build: {e}"));

    let _guard =
        ScopedLocalization::new(&[langid!("fr")]).unwrap_or_else(|e| panic!("load fr: {e}"));
    let plan = plan(&document, &pickles, &library);
    let prefixes: Vec<&str> = plan
        .test_cases
        .iter()
        .flat_map(|c| &c.test_steps)
        .map(|s| s.name.prefix.as_str())
        .collect();
    assert_eq!(prefixes, vec!["Avant", "Given", "Après"]);
}

#[test]
fn undefined_step_messages_are_translated() {
    let document = load("minimal.feature");
    let pickles = pickles(&document);
    let library = builder()
        .build()
        .unwrap_or_else(|e| panic!("build: {e}"));
    let plan = plan(&document, &pickles, &library);
    let Some(step) = plan.test_cases.first().and_then(|c| c.test_steps.first()) else {
        panic!("expected a step");
    };

    let mut world = World::default();
    let Err(err @ PrepareError::Undefined(_)) = step.prepare(&mut world) else {
        panic!("expected an undefined step");
    };
    assert_eq!(
        err.to_string(),
        "No matching step definitions found for text \"a step\""
    );

    let _guard =
        ScopedLocalization::new(&[langid!("fr")]).unwrap_or_else(|e| panic!("load fr: {e}"));
    assert_eq!(
        current_languages()
            .unwrap_or_else(|e| panic!("languages: {e}"))
            .first(),
        Some(&langid!("fr"))
    );
    assert_eq!(
        err.to_string(),
        "Aucune définition d'étape ne correspond au texte « a step »"
    );
}
