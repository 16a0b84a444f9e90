//! Proptest strategies for tween requests and form input.
//!
//! Drive real engines with these rather than reimplementing the engine in
//! the test:
//!
//! ```rust,ignore
//! proptest! {
//!     #[test]
//!     fn prop_final_write_is_target(easing in any_easing(), duration in duration_ms()) {
//!         let host = SimulatedHost::shared();
//!         let engine = TweenEngine::new(host.clone());
//!         // animate, run_until_idle, check the last write
//!     }
//! }
//! ```

use crate::easing::Easing;
use crate::form::ContactForm;
use crate::style::Properties;
use proptest::prelude::*;

/// Any registered easing curve
pub fn any_easing() -> impl Strategy<Value = Easing> {
    proptest::sample::select(Easing::ALL.to_vec())
}

/// Easing curves that stay within `[0, 1]`
pub fn bounded_easing() -> impl Strategy<Value = Easing> {
    proptest::sample::select(
        Easing::ALL
            .iter()
            .copied()
            .filter(|e| !e.overshoots())
            .collect::<Vec<_>>(),
    )
}

/// Positive durations from one frame to five seconds
pub fn duration_ms() -> impl Strategy<Value = f64> {
    16.0f64..5000.0
}

/// One to four numeric px properties with targets in `-2000..2000`
pub fn numeric_properties() -> impl Strategy<Value = Properties> {
    let names = prop_oneof![
        Just("width"),
        Just("height"),
        Just("left"),
        Just("top"),
        Just("opacity"),
    ];
    prop::collection::vec((names, -2000.0f64..2000.0), 1..=4)
        .prop_map(|pairs| pairs.into_iter().collect::<Properties>())
}

/// Contact forms mixing blank, padded and filled fields
pub fn contact_form() -> impl Strategy<Value = ContactForm> {
    let field = prop_oneof![
        Just(String::new()),
        Just("   ".to_string()),
        "[a-z]{1,12}",
        "[a-z]{1,8}@[a-z]{1,8}\\.[a-z]{2,3}",
    ];
    (field.clone(), field.clone(), field.clone(), field)
        .prop_map(|(name, email, subject, message)| ContactForm::new(name, email, subject, message))
}
