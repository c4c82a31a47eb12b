//! Shared fixtures: foreign functions and classes built from the scriptable
//! object model, standing in for code a foreign interpreter would run.

#![allow(dead_code)]

use std::rc::Rc;

use crossway::foreign::model::{NativeFunction, ScriptClass, ScriptMethod, Visibility};
use crossway::*;

/// Install a test subscriber once; controlled by `RUST_LOG`.
pub fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("off"));
    fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init()
        .ok();
}

pub fn bridge() -> Bridge {
    init_tracing();
    Bridge::new()
}

/// `function f([&]$a) { $a = 666; }`
pub fn assign_666(by_ref: bool) -> Rc<dyn ForeignCallable> {
    let f = NativeFunction::new("f", 1, |mut args| {
        args[0].assign(ForeignValue::Int(666))?;
        Ok(ForeignValue::Null)
    });
    let f = if by_ref { f.by_ref(0) } else { f };
    f.into_callable()
}

/// `function f([&]$a) { $a .= "x"; return $a; }`
pub fn append_x(by_ref: bool) -> Rc<dyn ForeignCallable> {
    let f = NativeFunction::new("f", 1, |mut args| {
        args[0].update(|value| {
            let next = format!("{}x", value);
            *value = ForeignValue::string(next);
        })?;
        Ok(args[0].value()?)
    });
    let f = if by_ref { f.by_ref(0) } else { f };
    f.into_callable()
}

/// `function f([&]$a) { $a[] = "x"; return count($a); }`
pub fn push_x(by_ref: bool) -> Rc<dyn ForeignCallable> {
    let f = NativeFunction::new("f", 1, |mut args| {
        let len = args[0].update(|value| match value.array_mut() {
            Some(array) => array
                .push(ForeignValue::string("x"))
                .map_or(-1, |_| array.len() as i64),
            None => 0,
        })?;
        Ok(ForeignValue::Int(len))
    });
    let f = if by_ref { f.by_ref(0) } else { f };
    f.into_callable()
}

/// `function f($obj) { $obj->x = 666; }`
pub fn set_x_property() -> Rc<dyn ForeignCallable> {
    NativeFunction::new("f", 1, |args| {
        if let Some(object) = args[0].value()?.as_object() {
            object.set_property("x", ForeignValue::Int(666))?;
        }
        Ok(ForeignValue::Null)
    })
    .into_callable()
}

/// `function f($a, &$b, $c, &$d) { $b = $a . $c; $d = $c . $a; }`
pub fn mixed_params() -> Rc<dyn ForeignCallable> {
    NativeFunction::new("mixed", 4, |mut args| {
        let a = args[0].value()?.to_string();
        let c = args[2].value()?.to_string();
        args[1].assign(ForeignValue::string(format!("{}{}", a, c)))?;
        args[3].assign(ForeignValue::string(format!("{}{}", c, a)))?;
        Ok(ForeignValue::Null)
    })
    .by_ref(1)
    .by_ref(3)
    .into_callable()
}

/// `function thrower() { throw new Exception($payload); }`
pub fn thrower(class: &'static str, payload: ForeignValue) -> Rc<dyn ForeignCallable> {
    NativeFunction::new("thrower", 0, move |_| {
        Err(ForeignException::new(class, payload.clone()))
    })
    .into_callable()
}

/// A class with a constructor, public and private state, a property and
/// a method sharing the name `x`, and a few magic methods.
pub fn point_class() -> Rc<ScriptClass> {
    ScriptClass::builder("Point")
        .property("x", Visibility::Public, ForeignValue::Int(0))
        .property("y", Visibility::Public, ForeignValue::Int(0))
        .property("secret", Visibility::Private, ForeignValue::string("hidden"))
        .method(
            "__construct",
            ScriptMethod::new(2, |this, args| {
                this.set("x", args[0].value()?);
                this.set("y", args[1].value()?);
                Ok(ForeignValue::Null)
            }),
        )
        .method(
            "x",
            ScriptMethod::new(0, |_, _| Ok(ForeignValue::string("method x"))),
        )
        .method(
            "sum",
            ScriptMethod::new(0, |this, _| {
                let x = this.get("x").and_then(|v| v.as_int()).unwrap_or(0);
                let y = this.get("y").and_then(|v| v.as_int()).unwrap_or(0);
                Ok(ForeignValue::Int(x + y))
            }),
        )
        .method(
            "__toString",
            ScriptMethod::new(0, |this, _| {
                let x = this.get("x").unwrap_or(ForeignValue::Null);
                let y = this.get("y").unwrap_or(ForeignValue::Null);
                Ok(ForeignValue::string(format!("Point({}, {})", x, y)))
            }),
        )
        .method(
            "__add__",
            ScriptMethod::new(1, |this, args| {
                let x = this.get("x").and_then(|v| v.as_int()).unwrap_or(0);
                let offset = args[0].value()?.as_int().unwrap_or(0);
                Ok(ForeignValue::Int(x + offset))
            }),
        )
        .method(
            "hidden",
            ScriptMethod::new(0, |_, _| Ok(ForeignValue::Null))
                .with_visibility(Visibility::Private),
        )
        .static_property("count", Visibility::Public, ForeignValue::Int(0))
        .static_method(
            "origin",
            Visibility::Public,
            NativeFunction::new("Point::origin", 0, |_| Ok(ForeignValue::string("origin"))),
        )
        .build()
}

/// A class whose instances are callable through `__invoke(&$acc, $n)`.
pub fn accumulator_class() -> Rc<ScriptClass> {
    ScriptClass::builder("Accumulator")
        .method(
            "__invoke",
            ScriptMethod::new(2, |_, mut args| {
                let n = args[1].value()?.as_int().unwrap_or(0);
                args[0].update(|acc| {
                    let current = acc.as_int().unwrap_or(0);
                    *acc = ForeignValue::Int(current + n);
                })?;
                Ok(ForeignValue::Null)
            })
            .by_ref(0),
        )
        .build()
}
