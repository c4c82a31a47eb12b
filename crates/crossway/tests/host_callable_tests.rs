//! Host functions called from foreign code

mod common;

use std::rc::Rc;

use pretty_assertions::assert_eq;

use crossway::foreign::model::NativeFunction;
use crossway::*;

use common::*;

/// `function increment(&n)` on the host side.
fn increment() -> HostFunction {
    HostFunction::with_refs("increment", &["n"], &["n"], |args| {
        let cell = args[0].as_ref_cell().ok_or_else(|| HostException::message("not a cell"))?;
        let next = cell.get()?.as_int().unwrap_or(0) + 1;
        cell.set(&HostValue::Int(next))?;
        Ok(HostValue::None)
    })
    .unwrap()
}

/// `function call_with_local($f) { $n = 1; $f($n); return $n; }`
///
/// The foreign side passes its local by reference when `$f` declares it.
fn call_with_local() -> Rc<dyn ForeignCallable> {
    NativeFunction::new("call_with_local", 1, |args| {
        let ForeignValue::Callable(f) = args[0].value()? else {
            return Ok(ForeignValue::Null);
        };
        let local = ForeignRef::new(ForeignValue::Int(1));
        let arg = if f.needs_ref(0) {
            ForeignArg::Ref(local.clone())
        } else {
            ForeignArg::Value(local.get()?)
        };
        f.call_with_args(vec![arg])?;
        Ok(local.get()?)
    })
    .into_callable()
}

/// `function forward($f, &$x) { return $f($x); }` forwarding the caller's slot.
fn forward_ref() -> Rc<dyn ForeignCallable> {
    NativeFunction::new("forward", 2, |args| match args[0].value()? {
        ForeignValue::Callable(f) => f.call_with_args(vec![args[1].clone()]),
        _ => Ok(ForeignValue::Null),
    })
    .by_ref(1)
    .into_callable()
}

/// `function call_plain($f, $x) { return $f($x); }` passing a plain value.
fn call_plain() -> Rc<dyn ForeignCallable> {
    NativeFunction::new("call_plain", 2, |args| match args[0].value()? {
        ForeignValue::Callable(f) => f.call_with_args(vec![ForeignArg::Value(args[1].value()?)]),
        _ => Ok(ForeignValue::Null),
    })
    .into_callable()
}

#[test]
fn test_foreign_local_passed_by_reference_to_host() -> Result<()> {
    let bridge = bridge();
    let caller = bridge.wrap_callable(call_with_local());

    let result = caller.call(&[HostValue::Function(increment())])?;

    assert_eq!(result, HostValue::Int(2));
    Ok(())
}

#[test]
fn test_host_cell_forwarded_through_foreign_frame() -> Result<()> {
    let bridge = bridge();
    let forward = bridge.wrap_callable(forward_ref());
    let cell = bridge.new_reference(&HostValue::Int(41))?;

    forward.call(&[HostValue::Function(increment()), HostValue::Ref(cell.clone())])?;

    assert_eq!(cell.get()?, HostValue::Int(42));
    Ok(())
}

#[test]
fn test_value_for_host_reference_parameter_is_rejected() {
    let bridge = bridge();
    let caller = bridge.wrap_callable(call_plain());

    let err = caller
        .call(&[HostValue::Function(increment()), HostValue::Int(1)])
        .unwrap_err();

    let foreign = err.as_foreign().unwrap();
    assert_eq!(foreign.class_name, "HostException");
    assert_eq!(
        foreign.message(),
        "argument 1 of host callable 'increment' is pass by reference"
    );
}

#[test]
fn test_host_by_value_parameter_gets_a_copy() -> Result<()> {
    let bridge = bridge();
    let append = HostFunction::new("append", &["xs"], |args| {
        if let HostValue::List(items) = &args[0] {
            items.borrow_mut().push(HostValue::string("host"));
        }
        Ok(HostValue::Int(args[0].len().unwrap_or(0) as i64))
    });

    // `function count_after($f) { $a = [1]; $f($a); return count($a); }`
    let count_after = NativeFunction::new("count_after", 1, |args| {
        let ForeignValue::Callable(f) = args[0].value()? else {
            return Ok(ForeignValue::Null);
        };
        let local = ForeignValue::list([ForeignValue::Int(1)]);
        let seen = f.call_with_args(vec![ForeignArg::Value(local.clone())])?;
        let len = local.as_array().map(|a| a.len() as i64).unwrap_or(0);
        Ok(ForeignValue::list([seen, ForeignValue::Int(len)]))
    });
    let count_after = bridge.wrap_callable(count_after.into_callable());

    let result = count_after.call(&[HostValue::Function(append)])?;

    // The host saw two items, the foreign array still has one.
    assert_eq!(result, HostValue::list(vec![HostValue::Int(2), HostValue::Int(1)]));
    Ok(())
}

#[test]
fn test_foreign_slot_to_host_value_parameter_is_dereferenced() -> Result<()> {
    let bridge = bridge();
    let echo = HostFunction::new("echo", &["x"], |args| Ok(args[0].clone()));
    let forward = bridge.wrap_callable(forward_ref());
    let cell = bridge.new_reference(&HostValue::string("slot value"))?;

    let result = forward.call(&[HostValue::Function(echo), HostValue::Ref(cell)])?;

    assert_eq!(result, HostValue::string("slot value"));
    Ok(())
}

#[test]
fn test_host_exception_payload_is_converted() {
    let bridge = bridge();
    let raise = HostFunction::new("raise", &["x"], |_| {
        Err(BridgeError::Host(HostException::new(
            "ValueError",
            HostValue::list(vec![HostValue::Int(1), HostValue::Int(2)]),
        )))
    });

    // `function payload_count($f) { try { $f(0); } catch (HostException $e) { return count($e->payload); } }`
    let payload_count = NativeFunction::new("payload_count", 1, |args| match args[0].value()? {
        ForeignValue::Callable(f) => match f.call_with_args(vec![ForeignArg::Value(ForeignValue::Int(0))]) {
            Err(e) if e.is_host_exception() => Ok(ForeignValue::Int(
                e.payload.as_array().map(|a| a.len() as i64).unwrap_or(-1),
            )),
            Err(e) => Err(e),
            Ok(_) => Ok(ForeignValue::Null),
        },
        _ => Ok(ForeignValue::Null),
    });
    let payload_count = bridge.wrap_callable(payload_count.into_callable());

    let result = payload_count.call(&[HostValue::Function(raise)]);

    assert_eq!(result.ok(), Some(HostValue::Int(2)));
}

#[test]
fn test_foreign_caller_passing_too_few_arguments_gets_host_exception() -> Result<()> {
    let bridge = bridge();
    let pair = HostFunction::new("pair", &["a", "b"], |args| Ok(args[1].clone()));

    // `function call_short($f) { try { return $f(1); } catch (HostException $e) { return $e->getMessage(); } }`
    let call_short = NativeFunction::new("call_short", 1, |args| match args[0].value()? {
        ForeignValue::Callable(f) => match f.call_with_args(vec![ForeignArg::Value(ForeignValue::Int(1))]) {
            Err(e) if e.is_host_exception() => Ok(ForeignValue::string(e.message())),
            other => other,
        },
        _ => Ok(ForeignValue::Null),
    });
    let call_short = bridge.wrap_callable(call_short.into_callable());

    let result = call_short.call(&[HostValue::Function(pair)])?;

    assert_eq!(
        result,
        HostValue::string("host callable 'pair' expects at least 2 arguments, got 1")
    );
    assert_eq!(bridge.call_depth(), 0);
    Ok(())
}

#[test]
fn test_returning_a_cell_to_foreign_code_fails() -> Result<()> {
    let bridge = bridge();
    let cell = bridge.new_reference(&HostValue::Int(1))?;
    let leak = HostFunction::new("leak", &["x"], move |_| Ok(HostValue::Ref(cell.clone())));
    let caller = bridge.wrap_callable(call_plain());

    let err = caller
        .call(&[HostValue::Function(leak), HostValue::None])
        .unwrap_err();

    assert_eq!(
        err.as_foreign().unwrap().message(),
        "reference cells cannot be passed by value"
    );
    Ok(())
}

#[test]
fn test_exported_function_metadata() {
    let bridge = bridge();
    let exported = bridge.export_host_function(increment());
    let ForeignValue::Callable(callable) = exported else {
        panic!("expected a callable");
    };

    assert_eq!(callable.name(), "increment");
    assert_eq!(callable.param_count(), 1);
    assert!(callable.needs_ref(0));
    assert!(!callable.needs_ref(1));
    assert!(callable.host_function().is_some());
}
