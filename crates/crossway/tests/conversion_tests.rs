//! Structural conversion and identity preservation across the boundary

mod common;

use std::rc::Rc;

use pretty_assertions::assert_eq;

use crossway::foreign::model::NativeFunction;
use crossway::*;

use common::*;

#[test]
fn test_converted_list_is_independent_of_original() -> Result<()> {
    let bridge = bridge();
    let list = HostValue::list(vec![HostValue::Int(1)]);

    let mut foreign = bridge.to_foreign(&list)?;
    if let HostValue::List(items) = &list {
        items.borrow_mut().push(HostValue::Int(2));
    }
    if let Some(array) = foreign.array_mut() {
        assert_eq!(array.push(ForeignValue::Int(99)), Some(ArrayKey::Int(1)));
    }

    assert_eq!(list, HostValue::list(vec![HostValue::Int(1), HostValue::Int(2)]));
    assert_eq!(
        bridge.to_host(&foreign)?,
        HostValue::list(vec![HostValue::Int(1), HostValue::Int(99)])
    );
    Ok(())
}

#[test]
fn test_converted_array_is_independent_of_original() -> Result<()> {
    let bridge = bridge();
    let array = ForeignValue::list([ForeignValue::string("a")]);

    let host = bridge.to_host(&array)?;
    if let HostValue::List(items) = &host {
        items.borrow_mut().clear();
    }

    assert_eq!(array.as_array().map(|a| a.len()), Some(1));
    Ok(())
}

#[test]
fn test_nested_containers_are_deep_copied() -> Result<()> {
    let bridge = bridge();
    let inner = HostValue::list(vec![HostValue::Int(1)]);
    let outer = HostValue::dict([(HostKey::from("inner"), inner.clone())]);

    let back = bridge.to_host(&bridge.to_foreign(&outer)?)?;
    if let Some(HostValue::List(items)) = back.dict_get(&HostKey::from("inner")) {
        items.borrow_mut().push(HostValue::Int(2));
    }

    assert_eq!(inner.len(), Some(1));
    assert_eq!(back, {
        let expected_inner = HostValue::list(vec![HostValue::Int(1), HostValue::Int(2)]);
        HostValue::dict([(HostKey::from("inner"), expected_inner)])
    });
    Ok(())
}

#[test]
fn test_dict_keys_follow_foreign_normalization() -> Result<()> {
    let bridge = bridge();
    let dict = HostValue::dict([
        (HostKey::from("1"), HostValue::string("one")),
        (HostKey::from("01"), HostValue::string("zero-one")),
    ]);

    let foreign = bridge.to_foreign(&dict)?;
    let array = foreign.as_array().unwrap();

    assert_eq!(array.get(&ArrayKey::Int(1)).and_then(|v| v.as_str()), Some("one"));
    assert_eq!(array.get(&ArrayKey::from("01")).and_then(|v| v.as_str()), Some("zero-one"));
    Ok(())
}

#[test]
fn test_list_shaped_dict_comes_back_as_list() -> Result<()> {
    let bridge = bridge();
    let dict = HostValue::dict([
        (HostKey::Int(0), HostValue::string("a")),
        (HostKey::Int(1), HostValue::string("b")),
    ]);

    let back = bridge.to_host(&bridge.to_foreign(&dict)?)?;

    assert_eq!(back, HostValue::list(vec![HostValue::string("a"), HostValue::string("b")]));
    Ok(())
}

#[test]
fn test_callable_round_trip_preserves_identity() -> Result<()> {
    let bridge = bridge();
    let callable = NativeFunction::new("f", 0, |_| Ok(ForeignValue::Int(1))).into_callable();

    let host = bridge.to_host(&ForeignValue::Callable(Rc::clone(&callable)))?;
    let foreign = bridge.to_foreign(&host)?;
    let host_again = bridge.to_host(&foreign)?;

    assert!(host_again.is_identical(&host));
    assert!(foreign.is_identical(&ForeignValue::Callable(callable)));
    assert_eq!(call_value(&host_again, &[])?, HostValue::Int(1));
    Ok(())
}

#[test]
fn test_host_function_round_trip_preserves_identity() -> Result<()> {
    let bridge = bridge();
    let function = HostValue::Function(HostFunction::new("h", &[], |_| Ok(HostValue::None)));

    let back = bridge.to_host(&bridge.to_foreign(&function)?)?;

    assert!(back.is_identical(&function));
    assert_eq!(back, function);
    Ok(())
}

#[test]
fn test_class_converts_to_object_adapter() -> Result<()> {
    let bridge = bridge();
    let class = point_class();

    let host = bridge.to_host(&class.into_value())?;

    let adapter = host.as_object().unwrap();
    assert!(adapter.is_class());
    assert_eq!(adapter.describe(), "class 'Point'");
    Ok(())
}

#[test]
fn test_self_containing_list_hits_depth_limit() {
    let bridge = bridge();
    let list = HostValue::list(vec![]);
    if let HostValue::List(items) = &list {
        items.borrow_mut().push(list.clone());
    }

    let err = bridge.to_foreign(&list).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Limit);
    assert_eq!(
        err.to_string(),
        "value nesting exceeds conversion depth limit of 512"
    );

    // Break the cycle so the test does not leak
    if let HostValue::List(items) = &list {
        items.borrow_mut().clear();
    }
}

#[test]
fn test_cell_inside_container_cannot_cross_by_value() -> Result<()> {
    let bridge = bridge();
    let cell = bridge.new_reference(&HostValue::Int(1))?;
    let dict = HostValue::dict([(HostKey::from("c"), HostValue::Ref(cell))]);

    let err = bridge.to_foreign(&dict).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Usage);
    assert_eq!(err.to_string(), "reference cells cannot be passed by value");
    Ok(())
}

#[test]
fn test_floats_and_bools() -> Result<()> {
    let bridge = bridge();
    assert_eq!(bridge.to_foreign(&HostValue::Float(0.5))?.to_string(), "0.5");
    assert_eq!(bridge.to_host(&ForeignValue::Bool(false))?, HostValue::Bool(false));
    assert_eq!(bridge.to_host(&ForeignValue::Null)?, HostValue::None);
    Ok(())
}
