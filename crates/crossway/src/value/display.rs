//! Display and Debug implementations for HostValue

use std::fmt;
use std::rc::Rc;

use super::*;

impl fmt::Debug for HostValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        repr(self, f, &mut Vec::new())
    }
}

// `seen` holds the containers currently being printed; a container that
// reaches itself prints as [...] or {...}.
fn repr(value: &HostValue, f: &mut fmt::Formatter<'_>, seen: &mut Vec<*const ()>) -> fmt::Result {
    match value {
        HostValue::None => write!(f, "None"),
        HostValue::Bool(true) => write!(f, "True"),
        HostValue::Bool(false) => write!(f, "False"),
        HostValue::Int(n) => write!(f, "{}", n),
        HostValue::Float(n) => write!(f, "{:?}", n),
        HostValue::Str(s) => write!(f, "{:?}", s.as_ref()),

        HostValue::List(items) => {
            let ptr = Rc::as_ptr(items) as *const ();
            if seen.contains(&ptr) {
                return write!(f, "[...]");
            }
            seen.push(ptr);
            write!(f, "[")?;
            for (i, item) in items.borrow().iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                repr(item, f, seen)?;
            }
            seen.pop();
            write!(f, "]")
        }

        HostValue::Dict(entries) => {
            let ptr = Rc::as_ptr(entries) as *const ();
            if seen.contains(&ptr) {
                return write!(f, "{{...}}");
            }
            seen.push(ptr);
            write!(f, "{{")?;
            for (i, (key, value)) in entries.borrow().iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}: ", key)?;
                repr(value, f, seen)?;
            }
            seen.pop();
            write!(f, "}}")
        }

        HostValue::Function(func) => write!(f, "<function {}>", func.name()),
        HostValue::Object(adapter) => write!(f, "<foreign {}>", adapter.describe()),
        HostValue::Callable(adapter) => write!(f, "<foreign callable '{}'>", adapter.name()),
        HostValue::Ref(cell) => write!(f, "<reference {:?}>", cell.slot()),
    }
}

impl fmt::Display for HostValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostValue::Str(s) => write!(f, "{}", s),
            other => write!(f, "{:?}", other),
        }
    }
}
