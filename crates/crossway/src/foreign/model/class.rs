//! Scriptable foreign classes and objects

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use indexmap::IndexMap;

use super::{check_arity, mark_ref, NativeFunction};
use crate::foreign::{
    ForeignArg, ForeignCallable, ForeignClass, ForeignException, ForeignObject, ForeignValue,
};

/// Member visibility. Only public members are visible to the bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    /// Visible everywhere
    #[default]
    Public,
    /// Visible to the class and its subclasses
    Protected,
    /// Visible to the declaring class only
    Private,
}

/// Body of a [`ScriptMethod`]; receives the receiver object.
pub type MethodBody =
    Rc<dyn Fn(&Rc<ScriptObject>, Vec<ForeignArg>) -> Result<ForeignValue, ForeignException>>;

/// A method declared on a [`ScriptClass`].
#[derive(Clone)]
pub struct ScriptMethod {
    param_count: usize,
    ref_params: Vec<bool>,
    visibility: Visibility,
    body: MethodBody,
}

impl ScriptMethod {
    /// Create a public method taking `param_count` by-value parameters.
    pub fn new(
        param_count: usize,
        body: impl Fn(&Rc<ScriptObject>, Vec<ForeignArg>) -> Result<ForeignValue, ForeignException>
            + 'static,
    ) -> Self {
        Self {
            param_count,
            ref_params: Vec::new(),
            visibility: Visibility::Public,
            body: Rc::new(body),
        }
    }

    /// Declare the parameter at `position` (0-based) as by-reference.
    pub fn by_ref(mut self, position: usize) -> Self {
        mark_ref(&mut self.ref_params, position);
        self.param_count = self.param_count.max(position + 1);
        self
    }

    /// Set the method's visibility.
    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }
}

type PropertyTable = IndexMap<String, (Visibility, ForeignValue)>;

/// Builder for [`ScriptClass`].
pub struct ScriptClassBuilder {
    name: String,
    properties: PropertyTable,
    methods: IndexMap<String, ScriptMethod>,
    static_properties: PropertyTable,
    static_methods: IndexMap<String, (Visibility, Rc<NativeFunction>)>,
}

impl ScriptClassBuilder {
    /// Declare an instance property with its default value.
    pub fn property(
        mut self,
        name: impl Into<String>,
        visibility: Visibility,
        default: ForeignValue,
    ) -> Self {
        self.properties.insert(name.into(), (visibility, default));
        self
    }

    /// Declare a method. A method named `__construct` runs on instantiation.
    pub fn method(mut self, name: impl Into<String>, method: ScriptMethod) -> Self {
        self.methods.insert(name.into(), method);
        self
    }

    /// Declare a static property.
    pub fn static_property(
        mut self,
        name: impl Into<String>,
        visibility: Visibility,
        value: ForeignValue,
    ) -> Self {
        self.static_properties.insert(name.into(), (visibility, value));
        self
    }

    /// Declare a static method.
    pub fn static_method(
        mut self,
        name: impl Into<String>,
        visibility: Visibility,
        function: NativeFunction,
    ) -> Self {
        self.static_methods
            .insert(name.into(), (visibility, Rc::new(function)));
        self
    }

    /// Finish the class.
    pub fn build(self) -> Rc<ScriptClass> {
        Rc::new_cyclic(|this| ScriptClass {
            name: self.name,
            properties: self.properties,
            methods: self.methods,
            static_properties: RefCell::new(self.static_properties),
            static_methods: self.static_methods,
            this: this.clone(),
        })
    }
}

/// A foreign class defined from Rust.
pub struct ScriptClass {
    name: String,
    properties: PropertyTable,
    methods: IndexMap<String, ScriptMethod>,
    static_properties: RefCell<PropertyTable>,
    static_methods: IndexMap<String, (Visibility, Rc<NativeFunction>)>,
    this: Weak<ScriptClass>,
}

impl ScriptClass {
    /// Start declaring a class.
    pub fn builder(name: impl Into<String>) -> ScriptClassBuilder {
        ScriptClassBuilder {
            name: name.into(),
            properties: IndexMap::new(),
            methods: IndexMap::new(),
            static_properties: IndexMap::new(),
            static_methods: IndexMap::new(),
        }
    }

    /// Create an instance with default property values, without running
    /// the constructor.
    pub fn new_instance(self: &Rc<Self>) -> Rc<ScriptObject> {
        let class = Rc::clone(self);
        Rc::new_cyclic(|this| ScriptObject {
            properties: RefCell::new(class.properties.clone()),
            class,
            this: this.clone(),
        })
    }

    /// Wrap as a foreign value.
    pub fn into_value(self: &Rc<Self>) -> ForeignValue {
        ForeignValue::Class(Rc::clone(self) as Rc<dyn ForeignClass>)
    }

    fn visible_method(&self, name: &str) -> Option<&ScriptMethod> {
        self.methods
            .get(name)
            .filter(|m| m.visibility == Visibility::Public)
    }
}

impl ForeignClass for ScriptClass {
    fn name(&self) -> &str {
        &self.name
    }

    fn static_property(&self, name: &str) -> Option<ForeignValue> {
        self.static_properties
            .borrow()
            .get(name)
            .filter(|(visibility, _)| *visibility == Visibility::Public)
            .map(|(_, value)| value.clone())
    }

    fn set_static_property(
        &self,
        name: &str,
        value: ForeignValue,
    ) -> Result<(), ForeignException> {
        let mut properties = self.static_properties.borrow_mut();
        match properties.get_mut(name) {
            Some((Visibility::Public, slot)) => *slot = value,
            Some((visibility, _)) => return Err(inaccessible(&self.name, name, *visibility)),
            None => {
                properties.insert(name.to_string(), (Visibility::Public, value));
            }
        }
        Ok(())
    }

    fn static_method(&self, name: &str) -> Option<Rc<dyn ForeignCallable>> {
        self.static_methods
            .get(name)
            .filter(|(visibility, _)| *visibility == Visibility::Public)
            .map(|(_, function)| Rc::clone(function) as Rc<dyn ForeignCallable>)
    }

    fn instantiate(&self, args: Vec<ForeignValue>) -> Result<ForeignValue, ForeignException> {
        let class = self.this.upgrade().ok_or_else(|| {
            ForeignException::with_message("Error", format!("Class \"{}\" not found", self.name))
        })?;
        let object = class.new_instance();

        if let Some(constructor) = self.methods.get("__construct") {
            if constructor.visibility != Visibility::Public {
                return Err(ForeignException::with_message(
                    "Error",
                    format!("Call to private {}::__construct()", self.name),
                ));
            }
            let name = format!("{}::__construct", self.name);
            check_arity(&name, constructor.param_count, args.len())?;
            let args = args.into_iter().map(ForeignArg::Value).collect();
            (constructor.body)(&object, args)?;
        }

        Ok(ForeignValue::Object(object))
    }
}

impl fmt::Debug for ScriptClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScriptClass")
            .field("name", &self.name)
            .field("properties", &self.properties.keys().collect::<Vec<_>>())
            .field("methods", &self.methods.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// An instance of a [`ScriptClass`].
pub struct ScriptObject {
    class: Rc<ScriptClass>,
    properties: RefCell<PropertyTable>,
    this: Weak<ScriptObject>,
}

impl ScriptObject {
    /// The object's class.
    pub fn class(&self) -> &Rc<ScriptClass> {
        &self.class
    }

    /// Read a property from inside the class, ignoring visibility.
    pub fn get(&self, name: &str) -> Option<ForeignValue> {
        self.properties.borrow().get(name).map(|(_, v)| v.clone())
    }

    /// Write a property from inside the class, ignoring visibility.
    /// New properties are public.
    pub fn set(&self, name: &str, value: ForeignValue) {
        let mut properties = self.properties.borrow_mut();
        match properties.get_mut(name) {
            Some((_, slot)) => *slot = value,
            None => {
                properties.insert(name.to_string(), (Visibility::Public, value));
            }
        }
    }

    /// Wrap as a foreign value.
    pub fn into_value(self: &Rc<Self>) -> ForeignValue {
        ForeignValue::Object(Rc::clone(self) as Rc<dyn ForeignObject>)
    }
}

impl ForeignObject for ScriptObject {
    fn class_name(&self) -> &str {
        &self.class.name
    }

    fn property(&self, name: &str) -> Option<ForeignValue> {
        self.properties
            .borrow()
            .get(name)
            .filter(|(visibility, _)| *visibility == Visibility::Public)
            .map(|(_, value)| value.clone())
    }

    fn set_property(&self, name: &str, value: ForeignValue) -> Result<(), ForeignException> {
        if let Some((visibility, _)) = self.properties.borrow().get(name) {
            if *visibility != Visibility::Public {
                return Err(inaccessible(&self.class.name, name, *visibility));
            }
        }
        self.set(name, value);
        Ok(())
    }

    fn method(&self, name: &str) -> Option<Rc<dyn ForeignCallable>> {
        let method = self.class.visible_method(name)?.clone();
        let receiver = self.this.upgrade()?;
        Some(Rc::new(BoundMethod {
            name: format!("{}::{}", self.class.name, name),
            receiver,
            method,
        }))
    }

    fn properties(&self) -> Vec<(String, ForeignValue)> {
        self.properties
            .borrow()
            .iter()
            .map(|(name, (_, value))| (name.clone(), value.clone()))
            .collect()
    }
}

impl fmt::Debug for ScriptObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct(&self.class.name);
        for (name, (_, value)) in self.properties.borrow().iter() {
            s.field(name, value);
        }
        s.finish()
    }
}

/// A method bound to its receiver.
struct BoundMethod {
    name: String,
    receiver: Rc<ScriptObject>,
    method: ScriptMethod,
}

impl ForeignCallable for BoundMethod {
    fn name(&self) -> &str {
        &self.name
    }

    fn param_count(&self) -> usize {
        self.method.param_count
    }

    fn needs_ref(&self, position: usize) -> bool {
        self.method.ref_params.get(position).copied().unwrap_or(false)
    }

    fn call_with_args(&self, args: Vec<ForeignArg>) -> Result<ForeignValue, ForeignException> {
        check_arity(&self.name, self.method.param_count, args.len())?;
        (self.method.body)(&self.receiver, args)
    }
}

fn inaccessible(class: &str, property: &str, visibility: Visibility) -> ForeignException {
    let kind = match visibility {
        Visibility::Private => "private",
        Visibility::Protected => "protected",
        Visibility::Public => "public",
    };
    ForeignException::with_message(
        "Error",
        format!("Cannot access {} property {}::${}", kind, class, property),
    )
}
