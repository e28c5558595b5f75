//! Shared fixtures for integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use modelkit::validations::Presence;
use modelkit::{Flow, Hook, Humanized, Next, Record, Schema, Validatable, Value};
use once_cell::sync::Lazy;

/// `{name, age, audit}`: name is required, creating with a negative age halts,
/// and a successful create stamps `audit`.
pub static PERSON: Lazy<Arc<Schema>> = Lazy::new(|| {
    Schema::builder("Person")
        .attributes(["name", "age", "audit"])
        .validates(["name"], Presence)
        .before_hook(
            "create",
            Hook::before(|person: &mut Record| {
                let age = person.read_attribute("age").as_int().unwrap_or(0);
                Ok(if age < 0 { Flow::Halt } else { Flow::Continue })
            })
            .named("reject_negative_age"),
        )
        .after("create", |person: &mut Record| {
            person.write("audit", "created")?;
            Ok(())
        })
        .naming(Humanized::new("Person"))
        .build()
        .expect("person schema")
});

pub fn person() -> Record {
    Record::new(&PERSON)
}

/// Append `entry` to the record's `trail` list attribute.
pub fn trail(record: &mut Record, entry: &str) {
    let mut items = record
        .read_attribute("trail")
        .as_list()
        .map(<[Value]>::to_vec)
        .unwrap_or_default();
    items.push(Value::str(entry));
    record
        .write("trail", Value::List(items))
        .expect("trail is declared");
}

pub fn trail_of(record: &Record) -> Vec<String> {
    record
        .read_attribute("trail")
        .as_list()
        .unwrap_or(&[])
        .iter()
        .map(ToString::to_string)
        .collect()
}

/// Around hook that records entering and leaving under `label`.
pub fn wrap(
    label: &'static str,
) -> impl Fn(&mut Record, Next<'_, Record>) -> Result<(), modelkit::error::HookError> {
    move |record: &mut Record, next: Next<'_, Record>| {
        trail(record, &format!("{} in", label));
        next.proceed(record)?;
        trail(record, &format!("{} out", label));
        Ok(())
    }
}
