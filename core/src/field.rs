//! Typed destinations and textual coercion.
//!
//! Every binding writes into a caller-owned destination of one of a closed
//! set of [`Shape`]s. [`FieldValue`] is implemented for exactly the Rust
//! types that realize those shapes; [`FieldOptions`] carries the per-binding
//! configuration (help, default, choices).

use serde::{Deserialize, Serialize};

/// Value category a binding coerces tokens into.
///
/// # Examples
///
/// ```
/// use argbind_core::Shape;
///
/// assert!(Shape::StringList.is_list());
/// assert!(Shape::OptionalInt.is_implicitly_optional());
/// assert!(!Shape::Int.is_implicitly_optional());
/// assert!(Shape::OptionalString.accepts_choices());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    Int,
    Double,
    String,
    Bool,
    OptionalInt,
    OptionalDouble,
    OptionalString,
    StringList,
}

impl Shape {
    /// Consumes a run of tokens instead of exactly one.
    pub fn is_list(self) -> bool {
        matches!(self, Shape::StringList)
    }

    /// Absence of a value is not an error for these shapes.
    pub fn is_implicitly_optional(self) -> bool {
        matches!(
            self,
            Shape::Bool
                | Shape::OptionalInt
                | Shape::OptionalDouble
                | Shape::OptionalString
                | Shape::StringList
        )
    }

    /// Choice sets only apply to string-valued shapes.
    pub fn accepts_choices(self) -> bool {
        matches!(
            self,
            Shape::String | Shape::OptionalString | Shape::StringList
        )
    }

    /// Placeholder used in usage lines.
    pub fn metavar(self) -> &'static str {
        match self {
            Shape::Int | Shape::OptionalInt => "<int>",
            Shape::Double | Shape::OptionalDouble => "<number>",
            Shape::String | Shape::OptionalString => "<string>",
            Shape::Bool => "<true|false>",
            Shape::StringList => "<string>...",
        }
    }
}

/// Why a token was not accepted by a destination.
///
/// Carries no identifier; the matcher attaches the binding's identifier when
/// turning it into a [`ParseError`](crate::ParseError).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// Token is not a valid literal of the expected kind.
    Malformed { expected: &'static str, value: String },
    /// Token is not in the binding's choice set.
    NotAChoice { value: String },
}

mod sealed {
    pub trait Sealed {}
}

/// Rust types that can be bound as destinations.
///
/// Sealed: the set of shapes is closed.
pub trait FieldValue: sealed::Sealed + Sized {
    /// Shape realized by this type.
    const SHAPE: Shape;

    /// Coerces the consumed token(s). Scalar shapes receive exactly one
    /// token; [`Shape::StringList`] receives the whole run.
    fn coerce(tokens: &[&str], choices: &[String]) -> Result<Self, Rejection>;

    /// Value written when an implicitly optional binding is never observed.
    fn absent() -> Option<Self> {
        None
    }

    /// Text view used to check a declared default against its choices.
    fn as_text(&self) -> Option<&str> {
        None
    }
}

/// Shapes that accept a declared default.
pub trait ScalarValue: FieldValue {}

/// Shapes that accept a choice set.
pub trait TextValue: FieldValue {}

fn sole<'t>(tokens: &[&'t str]) -> &'t str {
    tokens.last().copied().unwrap_or_default()
}

fn check_choice(token: &str, choices: &[String]) -> Result<(), Rejection> {
    if choices.is_empty() || choices.iter().any(|choice| choice == token) {
        Ok(())
    } else {
        Err(Rejection::NotAChoice {
            value: token.to_string(),
        })
    }
}

fn malformed(expected: &'static str, token: &str) -> Rejection {
    Rejection::Malformed {
        expected,
        value: token.to_string(),
    }
}

macro_rules! int_field {
    ($ty:ty) => {
        impl sealed::Sealed for $ty {}
        impl FieldValue for $ty {
            const SHAPE: Shape = Shape::Int;

            fn coerce(tokens: &[&str], _choices: &[String]) -> Result<Self, Rejection> {
                let token = sole(tokens);
                token.parse().map_err(|_| malformed("integer", token))
            }
        }
        impl ScalarValue for $ty {}

        impl sealed::Sealed for Option<$ty> {}
        impl FieldValue for Option<$ty> {
            const SHAPE: Shape = Shape::OptionalInt;

            fn coerce(tokens: &[&str], choices: &[String]) -> Result<Self, Rejection> {
                <$ty>::coerce(tokens, choices).map(Some)
            }

            fn absent() -> Option<Self> {
                Some(None)
            }
        }
    };
}

int_field!(i32);
int_field!(i64);

impl sealed::Sealed for f64 {}
impl FieldValue for f64 {
    const SHAPE: Shape = Shape::Double;

    fn coerce(tokens: &[&str], _choices: &[String]) -> Result<Self, Rejection> {
        let token = sole(tokens);
        token.parse().map_err(|_| malformed("number", token))
    }
}
impl ScalarValue for f64 {}

impl sealed::Sealed for Option<f64> {}
impl FieldValue for Option<f64> {
    const SHAPE: Shape = Shape::OptionalDouble;

    fn coerce(tokens: &[&str], choices: &[String]) -> Result<Self, Rejection> {
        f64::coerce(tokens, choices).map(Some)
    }

    fn absent() -> Option<Self> {
        Some(None)
    }
}

impl sealed::Sealed for String {}
impl FieldValue for String {
    const SHAPE: Shape = Shape::String;

    fn coerce(tokens: &[&str], choices: &[String]) -> Result<Self, Rejection> {
        let token = sole(tokens);
        check_choice(token, choices)?;
        Ok(token.to_string())
    }

    fn as_text(&self) -> Option<&str> {
        Some(self)
    }
}
impl ScalarValue for String {}
impl TextValue for String {}

impl sealed::Sealed for Option<String> {}
impl FieldValue for Option<String> {
    const SHAPE: Shape = Shape::OptionalString;

    fn coerce(tokens: &[&str], choices: &[String]) -> Result<Self, Rejection> {
        String::coerce(tokens, choices).map(Some)
    }

    fn absent() -> Option<Self> {
        Some(None)
    }
}
impl TextValue for Option<String> {}

impl sealed::Sealed for bool {}
impl FieldValue for bool {
    const SHAPE: Shape = Shape::Bool;

    fn coerce(tokens: &[&str], _choices: &[String]) -> Result<Self, Rejection> {
        match sole(tokens) {
            "true" => Ok(true),
            "false" => Ok(false),
            other => Err(malformed("boolean", other)),
        }
    }

    fn absent() -> Option<Self> {
        Some(false)
    }
}
impl ScalarValue for bool {}

impl sealed::Sealed for Vec<String> {}
impl FieldValue for Vec<String> {
    const SHAPE: Shape = Shape::StringList;

    fn coerce(tokens: &[&str], choices: &[String]) -> Result<Self, Rejection> {
        tokens
            .iter()
            .map(|token| {
                check_choice(token, choices)?;
                Ok(token.to_string())
            })
            .collect()
    }

    fn absent() -> Option<Self> {
        Some(Vec::new())
    }
}
impl TextValue for Vec<String> {}

/// Per-binding configuration passed at declaration time.
///
/// Which options exist depends on the destination type: defaults only for
/// scalar shapes, choices only for string shapes, explicit values only for
/// booleans.
///
/// # Examples
///
/// ```
/// use argbind_core::FieldOptions;
///
/// let color = FieldOptions::<String>::new()
///     .with_help("Color to paint with")
///     .with_choices(["red", "green", "blue"])
///     .with_default("red".to_string());
/// assert_eq!(color.choices().len(), 3);
///
/// let count = FieldOptions::new().with_default(5_i32);
/// assert_eq!(count.default_value(), Some(&5));
/// ```
#[derive(Debug, Clone)]
pub struct FieldOptions<T> {
    pub(crate) help: Option<String>,
    pub(crate) default: Option<T>,
    pub(crate) choices: Vec<String>,
    pub(crate) require_value: bool,
}

impl<T> Default for FieldOptions<T> {
    fn default() -> Self {
        Self {
            help: None,
            default: None,
            choices: Vec::new(),
            require_value: false,
        }
    }
}

impl<T: FieldValue> FieldOptions<T> {
    /// Creates empty options: no help, no default, no choices.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds help text for the usage summary.
    pub fn with_help(mut self, help: &str) -> Self {
        self.help = Some(help.to_string());
        self
    }

    /// Declared choices, in declaration order.
    pub fn choices(&self) -> &[String] {
        &self.choices
    }

    /// Declared default, if any.
    pub fn default_value(&self) -> Option<&T> {
        self.default.as_ref()
    }
}

impl<T: ScalarValue> FieldOptions<T> {
    /// Value used when the binding never appears on the command line.
    pub fn with_default(mut self, default: T) -> Self {
        self.default = Some(default);
        self
    }
}

impl<T: TextValue> FieldOptions<T> {
    /// Restricts accepted values (exact, case-sensitive).
    pub fn with_choices<I, S>(mut self, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.choices = choices.into_iter().map(Into::into).collect();
        self
    }
}

impl FieldOptions<bool> {
    /// The flag must be followed by a literal `true` or `false`.
    pub fn require_value(mut self) -> Self {
        self.require_value = true;
        self
    }
}

/// Type-erased destination held by the registry.
pub(crate) trait Slot {
    /// Coerces and stores; the destination is untouched on rejection.
    fn assign(&mut self, tokens: &[&str], choices: &[String]) -> Result<(), Rejection>;

    /// Stores the declared default, or the shape's absent value.
    fn apply_default(&mut self);
}

pub(crate) struct TypedSlot<'a, T> {
    output: &'a mut T,
    default: Option<T>,
}

impl<'a, T: FieldValue> TypedSlot<'a, T> {
    pub(crate) fn new(output: &'a mut T, default: Option<T>) -> Self {
        Self { output, default }
    }
}

impl<T: FieldValue> Slot for TypedSlot<'_, T> {
    fn assign(&mut self, tokens: &[&str], choices: &[String]) -> Result<(), Rejection> {
        *self.output = T::coerce(tokens, choices)?;
        Ok(())
    }

    fn apply_default(&mut self) {
        if let Some(value) = self.default.take().or_else(T::absent) {
            *self.output = value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn choices(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_int_coercion() {
        assert_eq!(i32::coerce(&["42"], &[]), Ok(42));
        assert_eq!(i32::coerce(&["-7"], &[]), Ok(-7));
        assert_eq!(
            i32::coerce(&["4x"], &[]),
            Err(Rejection::Malformed {
                expected: "integer",
                value: "4x".into()
            })
        );
        assert!(i32::coerce(&["3000000000"], &[]).is_err());
        assert_eq!(i64::coerce(&["3000000000"], &[]), Ok(3_000_000_000));
        assert_eq!(Option::<i32>::coerce(&["1"], &[]), Ok(Some(1)));
    }

    #[test]
    fn test_double_coercion() {
        assert_eq!(f64::coerce(&["2.5"], &[]), Ok(2.5));
        assert_eq!(f64::coerce(&["1e3"], &[]), Ok(1000.0));
        assert!(matches!(
            Option::<f64>::coerce(&["abc"], &[]),
            Err(Rejection::Malformed { expected: "number", .. })
        ));
    }

    #[test]
    fn test_string_choices() {
        let colors = choices(&["red", "green", "blue"]);
        assert_eq!(String::coerce(&["red"], &colors), Ok("red".to_string()));
        assert_eq!(
            String::coerce(&["Red"], &colors),
            Err(Rejection::NotAChoice {
                value: "Red".into()
            })
        );
        assert_eq!(
            String::coerce(&["anything"], &[]),
            Ok("anything".to_string())
        );
    }

    #[test]
    fn test_bool_literals_are_case_sensitive() {
        assert_eq!(bool::coerce(&["true"], &[]), Ok(true));
        assert_eq!(bool::coerce(&["false"], &[]), Ok(false));
        assert!(bool::coerce(&["True"], &[]).is_err());
    }

    #[test]
    fn test_list_checks_every_token() {
        let allowed = choices(&["a", "b"]);
        assert_eq!(
            Vec::<String>::coerce(&["a", "b", "a"], &allowed),
            Ok(vec!["a".into(), "b".into(), "a".into()])
        );
        assert_eq!(
            Vec::<String>::coerce(&["a", "c"], &allowed),
            Err(Rejection::NotAChoice { value: "c".into() })
        );
    }

    #[test]
    fn test_slot_applies_default_then_absent_value() {
        let mut count = 0_i32;
        TypedSlot::new(&mut count, Some(5)).apply_default();
        assert_eq!(count, 5);

        let mut maybe = Some("stale".to_string());
        TypedSlot::new(&mut maybe, None).apply_default();
        assert_eq!(maybe, None);

        let mut words = vec!["stale".to_string()];
        TypedSlot::new(&mut words, None).apply_default();
        assert!(words.is_empty());

        let mut untouched = 9_i32;
        TypedSlot::new(&mut untouched, None).apply_default();
        assert_eq!(untouched, 9);
    }

    #[test]
    fn test_slot_keeps_destination_on_rejection() {
        let mut value = 3_i32;
        let mut slot = TypedSlot::new(&mut value, None);
        assert!(slot.assign(&["nope"], &[]).is_err());
        assert!(slot.assign(&["8"], &[]).is_ok());
        drop(slot);
        assert_eq!(value, 8);
    }
}
