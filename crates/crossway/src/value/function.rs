//! Host-native functions

use std::fmt;
use std::rc::Rc;

use crate::error::{BridgeError, Result};

use super::HostValue;

/// Body of a [`HostFunction`].
///
/// Parameters declared by-reference receive [`HostValue::Ref`] and write
/// back through [`ReferenceCell::set`](crate::ReferenceCell::set).
pub type HostFnBody = Rc<dyn Fn(&[HostValue]) -> Result<HostValue>>;

/// A function native to the host runtime.
///
/// Carries its parameter names and a needs-ref side table resolved once,
/// at declaration time, from the by-reference parameter names. Clones share
/// one identity.
#[derive(Clone)]
pub struct HostFunction {
    inner: Rc<FunctionInner>,
}

struct FunctionInner {
    name: String,
    params: Vec<String>,
    ref_params: Vec<bool>,
    body: HostFnBody,
}

impl HostFunction {
    /// Create a function whose parameters are all by value.
    pub fn new(
        name: impl Into<String>,
        params: &[&str],
        body: impl Fn(&[HostValue]) -> Result<HostValue> + 'static,
    ) -> Self {
        Self {
            inner: Rc::new(FunctionInner {
                name: name.into(),
                params: params.iter().map(|p| p.to_string()).collect(),
                ref_params: vec![false; params.len()],
                body: Rc::new(body),
            }),
        }
    }

    /// Create a function with the named parameters declared by-reference.
    ///
    /// # Errors
    ///
    /// Returns `UnknownParameter` if a name in `refs` is not a parameter.
    pub fn with_refs(
        name: impl Into<String>,
        params: &[&str],
        refs: &[&str],
        body: impl Fn(&[HostValue]) -> Result<HostValue> + 'static,
    ) -> Result<Self> {
        let name = name.into();
        let mut ref_params = vec![false; params.len()];
        for reference in refs {
            let position = params.iter().position(|p| p == reference).ok_or_else(|| {
                BridgeError::UnknownParameter {
                    callable: name.clone(),
                    parameter: reference.to_string(),
                }
            })?;
            ref_params[position] = true;
        }

        Ok(Self {
            inner: Rc::new(FunctionInner {
                name,
                params: params.iter().map(|p| p.to_string()).collect(),
                ref_params,
                body: Rc::new(body),
            }),
        })
    }

    /// Function name
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Parameter names in order
    pub fn params(&self) -> &[String] {
        &self.inner.params
    }

    /// Number of declared parameters
    pub fn param_count(&self) -> usize {
        self.inner.params.len()
    }

    /// Whether the parameter at `position` (0-based) is by-reference.
    pub fn needs_ref(&self, position: usize) -> bool {
        self.inner.ref_params.get(position).copied().unwrap_or(false)
    }

    /// Fail with `TooFewArguments` unless `given` covers every declared
    /// parameter. Extra arguments are allowed.
    pub fn check_arity(&self, given: usize) -> Result<()> {
        let expected = self.param_count();
        if given < expected {
            return Err(BridgeError::TooFewArguments {
                callable: self.inner.name.clone(),
                expected,
                given,
            });
        }
        Ok(())
    }

    /// Run the body directly with host arguments.
    ///
    /// # Errors
    ///
    /// Returns `TooFewArguments` before the body runs if `args` is shorter
    /// than the parameter list, otherwise whatever the body returns.
    pub fn invoke(&self, args: &[HostValue]) -> Result<HostValue> {
        self.check_arity(args.len())?;
        (self.inner.body)(args)
    }

    /// True when both handles are the same function.
    pub fn ptr_eq(&self, other: &HostFunction) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for HostFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HostFunction({}(", self.inner.name)?;
        for (i, param) in self.inner.params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            if self.inner.ref_params[i] {
                write!(f, "&")?;
            }
            write!(f, "{}", param)?;
        }
        write!(f, "))")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refs_resolve_to_positions() {
        let f = HostFunction::with_refs("f", &["a", "b", "c"], &["c", "a"], |_| {
            Ok(HostValue::None)
        })
        .unwrap();
        assert!(f.needs_ref(0));
        assert!(!f.needs_ref(1));
        assert!(f.needs_ref(2));
        assert!(!f.needs_ref(3));
    }

    #[test]
    fn test_unknown_ref_name_is_rejected() {
        let err = HostFunction::with_refs("f", &["a"], &["z"], |_| Ok(HostValue::None))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "host callable 'f' has no parameter named 'z'"
        );
    }

    #[test]
    fn test_clones_share_identity() {
        let f = HostFunction::new("f", &[], |_| Ok(HostValue::None));
        let g = HostFunction::new("f", &[], |_| Ok(HostValue::None));
        assert!(f.ptr_eq(&f.clone()));
        assert!(!f.ptr_eq(&g));
    }

    #[test]
    fn test_debug_marks_reference_params() {
        let f = HostFunction::with_refs("swap", &["x", "y"], &["y"], |_| Ok(HostValue::None))
            .unwrap();
        assert_eq!(format!("{:?}", f), "HostFunction(swap(x, &y))");
    }

    #[test]
    fn test_too_few_arguments_never_reach_the_body() {
        let f = HostFunction::new("pair", &["a", "b"], |args| Ok(args[1].clone()));
        let err = f.invoke(&[HostValue::Int(1)]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "host callable 'pair' expects at least 2 arguments, got 1"
        );
        assert_eq!(
            f.invoke(&[HostValue::Int(1), HostValue::Int(2), HostValue::Int(3)])
                .unwrap(),
            HostValue::Int(2)
        );
    }
}
