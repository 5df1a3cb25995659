//! Populate a struct from a [`Params`] store, by naming convention.
//!
//! Rust has no runtime reflection: a destination type describes its fields once,
//! via a [`Fields`] table, by implementing the [`Imbue`] trait.
//!
//! # Example
//!
//! ```rust
//! use std::sync::LazyLock;
//! use pavex_params::{Fields, Imbue, Params, ParamsConfig};
//!
//! #[derive(Default)]
//! struct NewUser {
//!     user_name: String,
//!     age: i32,
//!     tags: Vec<String>,
//! }
//!
//! impl Imbue for NewUser {
//!     fn fields() -> &'static Fields<Self> {
//!         static FIELDS: LazyLock<Fields<NewUser>> = LazyLock::new(|| {
//!             Fields::<NewUser>::new()
//!                 .string("UserName", |u| &mut u.user_name)
//!                 .i32("Age", |u| &mut u.age)
//!                 .strings("Tags", |u| &mut u.tags)
//!         });
//!         &FIELDS
//!     }
//! }
//!
//! let mut params = Params::new();
//! params.insert("user_name", "ferris");
//! params.insert("age", "7");
//! params.insert("tags", "crab,rust");
//!
//! let mut user = NewUser::default();
//! params.imbue(&mut user, &ParamsConfig::default());
//! assert_eq!(user.user_name, "ferris");
//! assert_eq!(user.age, 7);
//! assert_eq!(user.tags, ["crab", "rust"]);
//! ```
use std::any::Any;

use jiff::Timestamp;

use crate::config::ParamsConfig;
use crate::store::Params;

use case::snake_to_camel_case;

pub mod case;

/// A type that can be populated by [`Params::imbue`].
pub trait Imbue: Sized + 'static {
    /// The table describing the fields that can be populated.
    ///
    /// It should be built once and cached, e.g. in a `static` [`LazyLock`](std::sync::LazyLock).
    fn fields() -> &'static Fields<Self>;
}

/// The fields of `T` that [`Params::imbue`] can populate, along with their kind.
///
/// Field names are expected in `UpperCamelCase` (e.g. `CreatedAt`, `UserID`).
/// `snake_case` names are accepted too, and converted on registration.
/// Incoming keys are converted from `snake_case` to `UpperCamelCase` before being
/// matched against them.
pub struct Fields<T> {
    fields: Vec<Field<T>>,
}

struct Field<T> {
    name: String,
    setter: Setter<T>,
}

enum Setter<T> {
    Bool(fn(&mut T) -> &mut bool),
    String(fn(&mut T) -> &mut String),
    I8(fn(&mut T) -> &mut i8),
    I16(fn(&mut T) -> &mut i16),
    I32(fn(&mut T) -> &mut i32),
    I64(fn(&mut T) -> &mut i64),
    U64(fn(&mut T) -> &mut u64),
    F32(fn(&mut T) -> &mut f32),
    F64(fn(&mut T) -> &mut f64),
    Strings(fn(&mut T) -> &mut Vec<String>),
    Ints(fn(&mut T) -> &mut Vec<i64>),
    U64s(fn(&mut T) -> &mut Vec<u64>),
    Floats(fn(&mut T) -> &mut Vec<f64>),
    Time(fn(&mut T) -> &mut Timestamp),
    OptionalTime(fn(&mut T) -> &mut Option<Timestamp>),
    Custom(fn(&mut T) -> &mut dyn Any),
}

macro_rules! setters {
    ($($method:ident => $variant:ident: $ty:ty),* $(,)?) => {
        impl<T> Fields<T> {
            $(
                #[doc = concat!("Register a field of type `", stringify!($ty), "`.")]
                pub fn $method(self, name: &str, field: fn(&mut T) -> &mut $ty) -> Self {
                    self.with(name, Setter::$variant(field))
                }
            )*
        }
    };
}

setters! {
    bool => Bool: bool,
    string => String: String,
    i8 => I8: i8,
    i16 => I16: i16,
    i32 => I32: i32,
    i64 => I64: i64,
    u64 => U64: u64,
    f32 => F32: f32,
    f64 => F64: f64,
    strings => Strings: Vec<String>,
    ints => Ints: Vec<i64>,
    u64s => U64s: Vec<u64>,
    floats => Floats: Vec<f64>,
    time => Time: Timestamp,
}

impl<T> Fields<T> {
    /// An empty table.
    ///
    /// Name the destination type up front, e.g. `Fields::<User>::new()`:
    /// the setters take closures, whose argument type can't be inferred otherwise.
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Register an optional timestamp.
    ///
    /// It is set to `Some` only if the stored value can be parsed as a timestamp,
    /// otherwise it is left untouched.
    pub fn optional_time(
        self,
        name: &str,
        field: fn(&mut T) -> &mut Option<Timestamp>,
    ) -> Self {
        self.with(name, Setter::OptionalTime(field))
    }

    /// Register a field of any other type.
    ///
    /// It is populated by the [`CustomTypeHandler`](crate::CustomTypeHandler) in
    /// [`ParamsConfig`], if there is one.
    pub fn custom(self, name: &str, field: fn(&mut T) -> &mut dyn Any) -> Self {
        self.with(name, Setter::Custom(field))
    }

    fn with(mut self, name: &str, setter: Setter<T>) -> Self {
        self.fields.push(Field {
            name: snake_to_camel_case(name, true),
            setter,
        });
        self
    }

    fn find(&self, name: &str) -> Option<&Field<T>> {
        self.fields.iter().find(|field| field.name == name)
    }
}

impl<T> Default for Fields<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl Params {
    /// Populate `destination` with the values in this store.
    ///
    /// Every top-level key is converted to `UpperCamelCase` and matched against the
    /// [fields](Imbue::fields) of `T`. Keys without a matching field are skipped.
    /// A matched field is set with the `*_or_default` accessor for its kind:
    /// a value that can't be coerced resets the field to its default.
    ///
    /// Nested structs are not populated recursively.
    pub fn imbue<T: Imbue>(&self, destination: &mut T, config: &ParamsConfig) {
        let fields = T::fields();
        for key in self.keys() {
            let name = snake_to_camel_case(key, true);
            let Some(field) = fields.find(&name) else {
                tracing::debug!(key, field = %name, "No field matches this parameter, skipping it");
                continue;
            };
            match field.setter {
                Setter::Bool(f) => *f(destination) = self.bool_or_default(key),
                Setter::String(f) => *f(destination) = self.string_or_default(key),
                Setter::I8(f) => *f(destination) = self.i8_or_default(key),
                Setter::I16(f) => *f(destination) = self.i16_or_default(key),
                Setter::I32(f) => *f(destination) = self.i32_or_default(key),
                Setter::I64(f) => *f(destination) = self.i64_or_default(key),
                Setter::U64(f) => *f(destination) = self.u64_or_default(key),
                Setter::F32(f) => *f(destination) = self.float_or_default(key) as f32,
                Setter::F64(f) => *f(destination) = self.float_or_default(key),
                Setter::Strings(f) => *f(destination) = self.string_list_or_default(key),
                Setter::Ints(f) => *f(destination) = self.int_list_or_default(key),
                Setter::U64s(f) => *f(destination) = self.u64_list_or_default(key),
                Setter::Floats(f) => *f(destination) = self.float_list_or_default(key),
                Setter::Time(f) => *f(destination) = self.time_or_default(key),
                Setter::OptionalTime(f) => {
                    if let Some(time) = self.get_time(key) {
                        *f(destination) = Some(time);
                    }
                }
                Setter::Custom(f) => {
                    if let (Some(handler), Some(value)) =
                        (&config.custom_type_handler, self.get(key))
                    {
                        handler.call(&field.name, f(destination), value);
                    }
                }
            }
        }
    }
}
