//! Dirty tracking exposed as attribute methods.
//!
//! | Method | Returns |
//! |--------|---------|
//! | `<attr>_changed?` | bool |
//! | `<attr>_change` | `[from, to]` or nil |
//! | `<attr>_was` | original value |
//! | `<attr>_previously_changed?` | bool |
//! | `<attr>_previous_change` | `[from, to]` or nil |
//! | `<attr>_previously_was` | value before the last commit, or nil |
//! | `<attr>=` | writes the single argument and returns it |
//! | `clear_<attr>_change` | nil |
//! | `restore_<attr>!` | nil |

use super::{expect_args, Record};
use crate::attributes::AttributeRegistry;
use crate::dirty::Change;
use crate::error::Result;
use crate::value::Value;

fn pair(change: &Change) -> Value {
    Value::List(vec![change.from.clone(), change.to.clone()])
}

pub(crate) fn install(registry: &mut AttributeRegistry<Record>) -> Result<()> {
    registry.define_suffix("_changed?", |record: &mut Record, attr: &str, args: &[Value]| {
        expect_args(&format!("{}_changed?", attr), args, 0)?;
        Ok(Value::Bool(record.attribute_changed(attr)))
    })?;

    registry.define_suffix("_change", |record: &mut Record, attr: &str, args: &[Value]| {
        expect_args(&format!("{}_change", attr), args, 0)?;
        Ok(record
            .attribute_change(attr)
            .map_or(Value::Nil, |change| pair(&change)))
    })?;

    registry.define_suffix("_was", |record: &mut Record, attr: &str, args: &[Value]| {
        expect_args(&format!("{}_was", attr), args, 0)?;
        record.attribute_was(attr).cloned()
    })?;

    registry.define_suffix(
        "_previously_changed?",
        |record: &mut Record, attr: &str, args: &[Value]| {
            expect_args(&format!("{}_previously_changed?", attr), args, 0)?;
            Ok(Value::Bool(record.attribute_previously_changed(attr)))
        },
    )?;

    registry.define_suffix(
        "_previous_change",
        |record: &mut Record, attr: &str, args: &[Value]| {
            expect_args(&format!("{}_previous_change", attr), args, 0)?;
            Ok(record.attribute_previous_change(attr).map_or(Value::Nil, pair))
        },
    )?;

    registry.define_suffix(
        "_previously_was",
        |record: &mut Record, attr: &str, args: &[Value]| {
            expect_args(&format!("{}_previously_was", attr), args, 0)?;
            Ok(record.attribute_previously_was(attr).cloned().unwrap_or_default())
        },
    )?;

    registry.define_suffix("=", |record: &mut Record, attr: &str, args: &[Value]| {
        expect_args(&format!("{}=", attr), args, 1)?;
        let value = args[0].clone();
        record.write(attr, value.clone())?;
        Ok(value)
    })?;

    registry.define_affix(
        "clear_",
        "_change",
        |record: &mut Record, attr: &str, args: &[Value]| {
            expect_args(&format!("clear_{}_change", attr), args, 0)?;
            record.clear_attribute_changes(&[attr])?;
            Ok(Value::Nil)
        },
    )?;

    registry.define_affix("restore_", "!", |record: &mut Record, attr: &str, args: &[Value]| {
        expect_args(&format!("restore_{}!", attr), args, 0)?;
        record.restore_attributes(&[attr])?;
        Ok(Value::Nil)
    })?;

    Ok(())
}
