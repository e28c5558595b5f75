mod common;

use std::sync::Arc;

use common::{person, trail, trail_of, wrap};
use modelkit::validations::Presence;
use modelkit::{
    ChainOutcome, Conversion, Flow, Hook, HookKind, InnerOutcome, ModelError, Next, Record,
    Schema, SchemaBuilder, ValidationContext, ValidatorSpec, Value,
};

fn post(configure: impl FnOnce(SchemaBuilder) -> SchemaBuilder) -> Arc<Schema> {
    let builder = Schema::builder("Post")
        .attributes(["title", "trail"])
        .validates(["title"], Presence);
    configure(builder).build().unwrap()
}

#[test]
fn test_create_halted_by_before_hook() {
    let mut record = person();
    record.write("name", "bob").unwrap();
    record.write("age", -1).unwrap();

    let mut stored = false;
    let outcome = record
        .create_with(|_| {
            stored = true;
            Ok(true)
        })
        .unwrap();

    let point = outcome.halt_point().expect("halted");
    assert_eq!(point.kind, HookKind::Before);
    assert_eq!(point.name.as_deref(), Some("reject_negative_age"));
    assert!(!stored);
    assert_eq!(record.read("audit").unwrap(), &Value::Nil);
    assert!(record.changed());
    assert!(!record.persisted());
}

#[test]
fn test_create_runs_after_hooks_and_commits() {
    let mut record = person();
    record.write("name", "bob").unwrap();
    record.write("age", 30).unwrap();

    assert!(record.create().unwrap().succeeded());
    assert!(record.persisted());
    assert_eq!(record.read("audit").unwrap(), &Value::str("created"));
    // the after hook's write happened before the commit
    assert!(!record.changed());
    assert!(record.attribute_previously_changed("audit"));
}

#[test]
fn test_save_nests_create_chain() {
    let schema = post(|b| {
        b.before("save", |r: &mut Record| {
            trail(r, "save before");
            Ok(Flow::Continue)
        })
        .around("save", wrap("save around"))
        .after("save", |r: &mut Record| {
            trail(r, "save after");
            Ok(())
        })
        .before("create", |r: &mut Record| {
            trail(r, "create before");
            Ok(Flow::Continue)
        })
        .around("create", wrap("create around"))
        .after("create", |r: &mut Record| {
            trail(r, "create after");
            Ok(())
        })
        .after("update", |r: &mut Record| {
            trail(r, "update after");
            Ok(())
        })
    });

    let mut record = Record::new(&schema);
    record.write("title", "Hello").unwrap();
    let outcome = record
        .save_with(|r| {
            trail(r, "body");
            Ok(true)
        })
        .unwrap();

    assert_eq!(outcome, ChainOutcome::Completed(true));
    assert_eq!(
        trail_of(&record),
        vec![
            "save before",
            "save around in",
            "create before",
            "create around in",
            "body",
            "create around out",
            "create after",
            "save around out",
            "save after",
        ]
    );
    assert!(record.persisted());
    assert!(!record.changed());
}

#[test]
fn test_save_on_persisted_record_updates() {
    let schema = post(|b| {
        b.after("create", |r: &mut Record| {
            trail(r, "create after");
            Ok(())
        })
        .after("update", |r: &mut Record| {
            trail(r, "update after");
            Ok(())
        })
    });

    let mut record =
        Record::instantiate(&schema, [("title", Value::str("Hello"))]).unwrap();
    record.write("title", "Hello again").unwrap();
    assert!(record.save().unwrap().succeeded());
    assert_eq!(trail_of(&record), vec!["update after"]);
    assert_eq!(
        record.attribute_previous_change("title").map(|c| c.to.clone()),
        Some(Value::str("Hello again"))
    );
}

#[test]
fn test_invalid_record_unwinds_around_but_skips_after() {
    let schema = post(|b| {
        b.around("create", wrap("around"))
            .after("create", |r: &mut Record| {
                trail(r, "after");
                Ok(())
            })
    });

    let mut record = Record::new(&schema);
    let mut stored = false;
    let outcome = record
        .create_with(|_| {
            stored = true;
            Ok(true)
        })
        .unwrap();

    assert_eq!(outcome, ChainOutcome::Completed(false));
    assert!(!stored);
    assert_eq!(trail_of(&record), vec!["around in", "around out"]);
    assert_eq!(record.errors().full_messages(), vec!["title can't be blank"]);
    assert!(!record.persisted());
}

#[test]
fn test_around_hook_that_never_proceeds() {
    let schema = post(|b| {
        b.around("create", |r: &mut Record, next: Next<'_, Record>| {
            let inner = next.proceed(r)?;
            let seen = match inner {
                InnerOutcome::Ran => "outer saw ran",
                InnerOutcome::Halted(_) => "outer saw halted",
            };
            trail(r, seen);
            Ok(())
        })
        .around_hook(
            "create",
            Hook::around(|r: &mut Record, _next: Next<'_, Record>| {
                trail(r, "gate closed");
                Ok(())
            })
            .named("gate"),
        )
        .after("create", |r: &mut Record| {
            trail(r, "after");
            Ok(())
        })
    });

    let mut record = Record::new(&schema);
    record.write("title", "Hello").unwrap();
    let mut stored = false;
    let outcome = record
        .create_with(|_| {
            stored = true;
            Ok(true)
        })
        .unwrap();

    let point = outcome.halt_point().expect("halted");
    assert_eq!(point.kind, HookKind::Around);
    assert_eq!(point.index, 1);
    assert_eq!(point.name.as_deref(), Some("gate"));
    assert!(!stored);
    assert_eq!(trail_of(&record), vec!["gate closed", "outer saw halted"]);
    assert!(record.changed());
    assert!(record.previous_changes().is_empty());
}

#[test]
fn test_outer_hook_learns_soft_failure_ran() {
    let schema = post(|b| {
        b.around("create", |r: &mut Record, next: Next<'_, Record>| {
            if next.proceed(r)? == InnerOutcome::Ran {
                trail(r, "core ran");
            }
            Ok(())
        })
    });

    let mut record = Record::new(&schema);
    let outcome = record.create().unwrap();
    assert!(!outcome.succeeded());
    assert_eq!(trail_of(&record), vec!["core ran"]);
}

#[test]
fn test_hook_fault_aborts_without_commit() {
    let schema = post(|b| {
        b.around("create", wrap("outer"))
            .around("create", |_: &mut Record, _next: Next<'_, Record>| {
                Err("storage offline".into())
            })
    });

    let mut record = Record::new(&schema);
    record.write("title", "Hello").unwrap();
    let err = record.create().unwrap_err();

    match err {
        ModelError::Callback { action, hook, source } => {
            assert_eq!(action, "create");
            assert_eq!(hook, "around[1]");
            assert_eq!(source.to_string(), "storage offline");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(trail_of(&record), vec!["outer in"]);
    assert!(!record.persisted());
    assert!(record.attribute_changed("title"));
}

#[test]
fn test_conditional_hooks() {
    let schema = post(|b| {
        b.before_hook(
            "create",
            Hook::before(|r: &mut Record| {
                trail(r, "long title");
                Ok(Flow::Continue)
            })
            .when(|r: &Record| r.read("title").map_or(0, Value::length) > 5),
        )
        .before_hook(
            "create",
            Hook::before(|_: &mut Record| Ok(Flow::Halt)).unless(|r: &Record| {
                r.read("title").map_or(false, |t| t.is_present())
            }),
        )
    });

    let mut record = Record::new(&schema);
    record.write("title", "Hi").unwrap();
    assert!(record.create().unwrap().succeeded());
    assert!(trail_of(&record).is_empty());

    let mut record = Record::new(&schema);
    record.write("title", "A longer title").unwrap();
    assert!(record.create().unwrap().succeeded());
    assert_eq!(trail_of(&record), vec!["long title"]);

    let mut record = Record::new(&schema);
    assert!(record.create().unwrap().is_halted());
}

#[test]
fn test_skip_callback_removes_named_hook() {
    let schema = post(|b| {
        b.before_hook(
            "create",
            Hook::before(|_: &mut Record| Ok(Flow::Halt)).named("freeze"),
        )
        .skip_callback("create", HookKind::Before, "freeze")
    });
    let mut record = Record::new(&schema);
    record.write("title", "Hello").unwrap();
    assert!(record.create().unwrap().succeeded());
}

#[test]
fn test_update_context_validators() {
    let schema = post(|b| {
        b.attributes(["editor"]).validation(
            ValidatorSpec::new(modelkit::validations::AttributeValidator::new(
                ["editor"],
                Presence,
            ))
            .on(ValidationContext::Update),
        )
    });

    let mut record = Record::new(&schema);
    record.write("title", "Hello").unwrap();
    assert!(record.create().unwrap().succeeded());

    record.write("title", "Hello again").unwrap();
    assert_eq!(record.update().unwrap(), ChainOutcome::Completed(false));
    assert_eq!(record.errors().full_messages(), vec!["editor can't be blank"]);
    assert!(record.changed());

    record.write("editor", "ada").unwrap();
    assert!(record.update().unwrap().succeeded());
    assert!(!record.changed());
}

#[test]
fn test_halted_chain_is_repeatable() {
    let mut record = person();
    record.write("name", "bob").unwrap();
    record.write("age", -5).unwrap();
    let first = record.create().unwrap();
    let second = record.create().unwrap();
    assert_eq!(first, second);

    record.write("age", 5).unwrap();
    assert!(record.create().unwrap().succeeded());
    assert_eq!(record.to_param(), None);
}

#[test]
fn test_after_hook_fault_leaves_record_new() {
    let schema = post(|b| {
        b.after("create", |r: &mut Record| {
            if r.read("title")? == &Value::str("boom") {
                return Err("mailer offline".into());
            }
            trail(r, "create after");
            Ok(())
        })
        .after("update", |r: &mut Record| {
            trail(r, "update after");
            Ok(())
        })
    });

    let mut record = Record::new(&schema);
    record.write("title", "boom").unwrap();
    assert!(matches!(record.create(), Err(ModelError::Callback { .. })));
    assert!(!record.persisted());
    assert!(record.changed());

    assert!(matches!(record.save(), Err(ModelError::Callback { .. })));
    assert!(!record.persisted());

    record.write("title", "Hello").unwrap();
    assert!(record.save().unwrap().succeeded());
    assert_eq!(trail_of(&record), vec!["create after"]);
    assert!(record.persisted());
}
