//! Declarative property descriptors.
//!
//! Every driver declares an ordered table of [`Property`] records. A record
//! knows how to turn a logical value into a command (validate, process, map,
//! format) and how to turn a response back into a logical value (parse, map
//! back, process). It holds no per-instrument state; the
//! [`Instrument`](crate::instruments::Instrument) performs the I/O.

use crate::{
    error::{Error, Result, ValidationError},
    format::format_command,
    validators::{Validator, Values},
    value::{parse_response, Value},
};

pub type Process = fn(Value) -> Result<Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Read-only.
    Measurement,
    /// Read/write.
    Control,
    /// Write-only.
    Setting,
}

#[derive(Clone, Copy)]
pub struct Property {
    name: &'static str,
    doc: &'static str,
    get_command: Option<&'static str>,
    set_command: Option<&'static str>,
    validator: Option<Validator>,
    values: Option<Values>,
    map_values: bool,
    get_process: Option<Process>,
    set_process: Option<Process>,
}

impl Property {
    const fn new(
        name: &'static str,
        get_command: Option<&'static str>,
        set_command: Option<&'static str>,
        doc: &'static str,
    ) -> Self {
        Self {
            name,
            doc,
            get_command,
            set_command,
            validator: None,
            values: None,
            map_values: false,
            get_process: None,
            set_process: None,
        }
    }

    pub const fn measurement(name: &'static str, get_command: &'static str, doc: &'static str) -> Self {
        Self::new(name, Some(get_command), None, doc)
    }

    pub const fn control(
        name: &'static str,
        get_command: &'static str,
        set_command: &'static str,
        doc: &'static str,
    ) -> Self {
        Self::new(name, Some(get_command), Some(set_command), doc)
    }

    pub const fn setting(name: &'static str, set_command: &'static str, doc: &'static str) -> Self {
        Self::new(name, None, Some(set_command), doc)
    }

    /// Checks every written value against `values` with `validator`.
    pub const fn validate(mut self, validator: Validator, values: Values) -> Self {
        self.validator = Some(validator);
        self.values = Some(values);
        self
    }

    /// Declares a domain without validating against it, for mapping only.
    pub const fn values(mut self, values: Values) -> Self {
        self.values = Some(values);
        self
    }

    /// Translate logical values to wire tokens on write and back on read.
    /// A `Set` domain maps each member to its index.
    pub const fn map_values(mut self) -> Self {
        self.map_values = true;
        self
    }

    pub const fn get_process(mut self, process: Process) -> Self {
        self.get_process = Some(process);
        self
    }

    pub const fn set_process(mut self, process: Process) -> Self {
        self.set_process = Some(process);
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn doc(&self) -> &'static str {
        self.doc
    }

    pub fn get_command(&self) -> Option<&'static str> {
        self.get_command
    }

    pub fn set_command(&self) -> Option<&'static str> {
        self.set_command
    }

    pub fn domain(&self) -> Option<&Values> {
        self.values.as_ref()
    }

    pub fn access(&self) -> Access {
        match (self.get_command, self.set_command) {
            (Some(_), Some(_)) => Access::Control,
            (None, Some(_)) => Access::Setting,
            _ => Access::Measurement,
        }
    }

    pub fn is_readable(&self) -> bool {
        self.get_command.is_some()
    }

    pub fn is_writable(&self) -> bool {
        self.set_command.is_some()
    }

    /// Builds the command that writes `value`. No I/O happens here, so a
    /// rejected value never reaches the transport.
    pub fn encode(&self, value: Value) -> Result<String> {
        let set_command = self.set_command.ok_or(Error::NotWritable(self.name))?;
        let mut value = value;
        if let (Some(validate), Some(values)) = (self.validator, self.values.as_ref()) {
            value = validate(value, values)?;
        }
        if let Some(process) = self.set_process {
            value = process(value)?;
        }
        if self.map_values {
            value = self.forward(value)?;
        }
        format_command(set_command, &value)
    }

    /// Interprets the response to this property's query.
    pub fn decode(&self, response: &str) -> Result<Value> {
        let mut value = parse_response(response)?;
        if self.map_values {
            value = self
                .reverse(&value)
                .ok_or_else(|| Error::UnmappedResponse(response.trim().to_string()))?;
        }
        match self.get_process {
            Some(process) => process(value),
            None => Ok(value),
        }
    }

    fn forward(&self, value: Value) -> Result<Value> {
        let token = match self.values {
            Some(Values::Map(map)) => map.forward(&value).cloned(),
            Some(Values::Set(set)) => set
                .iter()
                .position(|m| m.matches(&value))
                .map(|i| Value::Int(i as i64)),
            _ => Some(value.clone()),
        };
        token.ok_or_else(|| {
            ValidationError::NotInSet {
                value: value.to_string(),
            }
            .into()
        })
    }

    fn reverse(&self, token: &Value) -> Option<Value> {
        match self.values {
            Some(Values::Map(map)) => map.reverse(token).cloned(),
            Some(Values::Set(set)) => token
                .as_f64()
                .filter(|i| i.fract() == 0.0 && *i >= 0.0)
                .and_then(|i| set.get(i as usize))
                .cloned(),
            _ => Some(token.clone()),
        }
    }
}

impl std::fmt::Debug for Property {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Property")
            .field("name", &self.name)
            .field("get_command", &self.get_command)
            .field("set_command", &self.set_command)
            .field("values", &self.values)
            .field("map_values", &self.map_values)
            .finish()
    }
}

/// The ordered property table of one instrument model.
#[derive(Debug, Clone, Copy)]
pub struct Registry {
    properties: &'static [Property],
}

impl Registry {
    pub const fn new(properties: &'static [Property]) -> Self {
        Self { properties }
    }

    pub fn find(&self, name: &str) -> Option<&'static Property> {
        self.properties.iter().find(|p| p.name == name)
    }

    pub fn lookup(&self, name: &str) -> Result<&'static Property> {
        self.find(name)
            .ok_or_else(|| Error::UnknownProperty(name.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static Property> {
        self.properties.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> {
        self.properties.iter().map(|p| p.name)
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}
