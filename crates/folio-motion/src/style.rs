//! Style values: what a tween reads from and writes to a surface.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// Properties that are always written as given, never interpolated.
const VERBATIM_PROPERTIES: &[&str] = &["transform"];

/// Properties written without a unit suffix.
const UNITLESS_PROPERTIES: &[&str] = &[
    "opacity",
    "z-index",
    "zIndex",
    "font-weight",
    "fontWeight",
    "line-height",
    "lineHeight",
    "flex-grow",
    "flexGrow",
    "flex-shrink",
    "flexShrink",
    "order",
    "scale",
];

/// Target value of one animated property.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    /// Interpolated from the current computed value
    Number(f64),
    /// Written as-is on every frame
    Verbatim(String),
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for PropertyValue {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        Self::Verbatim(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        Self::Verbatim(value)
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Verbatim(s) => f.write_str(s),
        }
    }
}

/// Ordered set of property targets for one animation request.
///
/// Inserting a property that is already present replaces its value in
/// place.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Properties(Vec<(String, PropertyValue)>);

impl Properties {
    /// Create an empty set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Properties::insert`]
    #[must_use]
    pub fn with(mut self, property: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.insert(property, value);
        self
    }

    /// Set a property target
    pub fn insert(&mut self, property: impl Into<String>, value: impl Into<PropertyValue>) {
        let property = property.into();
        let value = value.into();
        if let Some(slot) = self.0.iter_mut().find(|(p, _)| *p == property) {
            slot.1 = value;
        } else {
            self.0.push((property, value));
        }
    }

    /// Target for `property`
    #[must_use]
    pub fn get(&self, property: &str) -> Option<&PropertyValue> {
        self.0.iter().find(|(p, _)| p == property).map(|(_, v)| v)
    }

    /// Number of properties
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no property is set
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Property names in insertion order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(p, _)| p.as_str())
    }

    /// Entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.0.iter().map(|(p, v)| (p.as_str(), v))
    }
}

impl<K, V> FromIterator<(K, V)> for Properties
where
    K: Into<String>,
    V: Into<PropertyValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut props = Self::new();
        for (k, v) in iter {
            props.insert(k, v);
        }
        props
    }
}

/// Whether `property` is always written verbatim
#[must_use]
pub fn is_verbatim_property(property: &str) -> bool {
    VERBATIM_PROPERTIES.contains(&property)
}

/// Whether `property` is written without a `px` suffix
#[must_use]
pub fn is_unitless(property: &str) -> bool {
    UNITLESS_PROPERTIES.contains(&property)
}

/// Hyphenated CSS name of `property`; `zIndex` and `z-index` both give `z-index`.
#[must_use]
pub fn css_property_name(property: &str) -> Cow<'_, str> {
    if !property.contains(|c: char| c.is_ascii_uppercase()) {
        return Cow::Borrowed(property);
    }
    let mut name = String::with_capacity(property.len() + 2);
    for c in property.chars() {
        if c.is_ascii_uppercase() {
            name.push('-');
            name.push(c.to_ascii_lowercase());
        } else {
            name.push(c);
        }
    }
    Cow::Owned(name)
}

/// Parse the leading number of a computed style value.
///
/// Accepts the longest numeric prefix (`"12.5px"` is `12.5`, `"-3e2em"` is
/// `-300`). Returns `None` when there is no numeric prefix.
#[must_use]
pub fn parse_css_number(raw: &str) -> Option<f64> {
    let s = raw.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let int_start = end;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    let mut digits = end - int_start;
    if bytes.get(end) == Some(&b'.') {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while bytes.get(frac_end).is_some_and(u8::is_ascii_digit) {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if frac_end > frac_start || digits > 0 {
            end = frac_end;
        }
    }
    if digits == 0 {
        return None;
    }
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while bytes.get(exp_end).is_some_and(u8::is_ascii_digit) {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }
    s[..end].parse().ok()
}

/// Start value of a property, 0 when missing or unreadable.
#[must_use]
pub fn start_value(computed: Option<&str>) -> f64 {
    computed.and_then(parse_css_number).unwrap_or(0.0)
}

/// Render a number the way CSS text expects it (`-0` becomes `0`).
#[must_use]
pub fn css_number(value: f64) -> String {
    let value = if value == 0.0 { 0.0 } else { value };
    format!("{value}")
}

/// Format an interpolated value for writing to `property`.
#[must_use]
pub fn format_value(property: &str, value: f64) -> String {
    if is_unitless(property) {
        css_number(value)
    } else {
        format!("{}px", css_number(value))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_css_property_name() {
        assert_eq!(css_property_name("zIndex"), "z-index");
        assert_eq!(css_property_name("z-index"), "z-index");
        assert_eq!(css_property_name("flexGrow"), "flex-grow");
        assert_eq!(css_property_name("borderTopLeftRadius"), "border-top-left-radius");
        assert_eq!(css_property_name("WebkitTransform"), "-webkit-transform");
        assert!(matches!(css_property_name("opacity"), Cow::Borrowed("opacity")));
    }

    #[test]
    fn test_parse_css_number_prefixes() {
        assert_eq!(parse_css_number("12.5px"), Some(12.5));
        assert_eq!(parse_css_number("  0.3"), Some(0.3));
        assert_eq!(parse_css_number("-40px"), Some(-40.0));
        assert_eq!(parse_css_number(".5em"), Some(0.5));
        assert_eq!(parse_css_number("5."), Some(5.0));
        assert_eq!(parse_css_number("-3e2em"), Some(-300.0));
        assert_eq!(parse_css_number("7e"), Some(7.0));
    }

    #[test]
    fn test_parse_css_number_rejects_non_numeric() {
        assert_eq!(parse_css_number("auto"), None);
        assert_eq!(parse_css_number(""), None);
        assert_eq!(parse_css_number("-"), None);
        assert_eq!(parse_css_number("."), None);
        assert_eq!(parse_css_number("none 12px"), None);
    }

    #[test]
    fn test_start_value_degrades_to_zero() {
        assert_eq!(start_value(Some("auto")), 0.0);
        assert_eq!(start_value(None), 0.0);
        assert_eq!(start_value(Some("0.25")), 0.25);
    }

    #[test]
    fn test_format_value_units() {
        assert_eq!(format_value("width", 25.0), "25px");
        assert_eq!(format_value("opacity", 0.5), "0.5");
        assert_eq!(format_value("zIndex", 3.0), "3");
        assert_eq!(format_value("font-weight", 700.0), "700");
        assert_eq!(format_value("top", -0.0), "0px");
    }

    #[test]
    fn test_css_number() {
        assert_eq!(css_number(-0.0), "0");
        assert_eq!(css_number(1.5), "1.5");
        assert_eq!(css_number(-12.0), "-12");
    }

    #[test]
    fn test_verbatim_properties() {
        assert!(is_verbatim_property("transform"));
        assert!(!is_verbatim_property("opacity"));
    }

    #[test]
    fn test_properties_insert_replaces_in_place() {
        let props = Properties::new()
            .with("width", 100.0)
            .with("opacity", 1.0)
            .with("width", 50.0);
        assert_eq!(props.len(), 2);
        assert_eq!(props.names().collect::<Vec<_>>(), vec!["width", "opacity"]);
        assert_eq!(props.get("width"), Some(&PropertyValue::Number(50.0)));
    }

    #[test]
    fn test_properties_from_iter_and_serde() {
        let props: Properties = vec![
            ("opacity", PropertyValue::from(1.0)),
            ("transform", PropertyValue::from("translateY(0)")),
        ]
        .into_iter()
        .collect();

        let json = serde_json::to_string(&props).unwrap();
        let back: Properties = serde_json::from_str(&json).unwrap();
        assert_eq!(back, props);
        assert_eq!(
            back.get("transform"),
            Some(&PropertyValue::Verbatim("translateY(0)".into()))
        );
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_parse_formatted_px_roundtrips(v in -1.0e6f64..1.0e6) {
                let written = format_value("left", v);
                let parsed = parse_css_number(&written).unwrap();
                prop_assert!((parsed - v).abs() < 1e-9);
            }
        }
    }
}
