//! # Attribute System
//!
//! Records do not hand-write accessors. A type declares its attribute names once,
//! and the registry synthesizes the rest:
//!
//! - **Specifications**: name and default value of each attribute
//! - **Aliases**: alternative names that read and write the same attribute
//! - **Dynamic methods**: `prefix` / `suffix` / affix patterns that turn any
//!   declared attribute into a callable method (`clear_name_change`,
//!   `age_was`, ...), resolved through a single lookup
//!
//! ## Pattern Resolution
//!
//! | Pattern | Method | Attribute |
//! |---------|--------|-----------|
//! | suffix `_was` | `name_was` | `name` |
//! | prefix `clear_`, suffix `_change` | `clear_age_change` | `age` |
//!
//! When several patterns match one method name, the longest pattern wins.
//! Two patterns of equal length that could produce the same name are rejected
//! when the second one is registered.
//!
//! ## Usage
//!
//! ```
//! use modelkit::attributes::AttributeRegistry;
//! use modelkit::Value;
//!
//! struct Form { touched: Vec<String> }
//!
//! let mut registry = AttributeRegistry::<Form>::new();
//! registry.declare_all(["title", "body"]).unwrap();
//! registry
//!     .define_prefix("touch_", |form: &mut Form, attr: &str, _args: &[Value]| {
//!         form.touched.push(attr.to_string());
//!         Ok(Value::Nil)
//!     })
//!     .unwrap();
//!
//! let mut form = Form { touched: vec![] };
//! registry.resolve("touch_body").unwrap().invoke(&mut form, &[]).unwrap();
//! assert_eq!(form.touched, vec!["body"]);
//! ```

mod methods;
mod registry;
mod spec;

pub use methods::{MethodHandler, MethodMatch, MethodPattern};
pub use registry::AttributeRegistry;
pub use spec::{AttributeSpec, BASE};
