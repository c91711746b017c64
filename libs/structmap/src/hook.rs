use crate::error::{Error, Result};
use crate::field::Field;
use crate::value::{IntoValue, Value};

const HOOK_RESULTS_TOTAL: usize = 2;

/// Raw outputs of a hook call, before validation.
///
/// A well-formed hook yields exactly `(string, value)`; anything else is
/// rejected by [`try_override`].
#[derive(Debug, Clone, PartialEq)]
pub struct HookOutputs(pub Vec<Value>);

impl HookOutputs {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Return types a hook function may have.
pub trait IntoHookOutputs {
    fn into_hook_outputs(self) -> HookOutputs;
}

impl IntoHookOutputs for HookOutputs {
    fn into_hook_outputs(self) -> HookOutputs {
        self
    }
}

impl IntoHookOutputs for Vec<Value> {
    fn into_hook_outputs(self) -> HookOutputs {
        HookOutputs(self)
    }
}

impl IntoHookOutputs for () {
    fn into_hook_outputs(self) -> HookOutputs {
        HookOutputs(Vec::new())
    }
}

// Tuple elements take anything a container element can be, std collections
// included.

impl<A: IntoValue> IntoHookOutputs for (A,) {
    fn into_hook_outputs(self) -> HookOutputs {
        HookOutputs(vec![self.0.to_value()])
    }
}

impl<A: IntoValue, B: IntoValue> IntoHookOutputs for (A, B) {
    fn into_hook_outputs(self) -> HookOutputs {
        HookOutputs(vec![self.0.to_value(), self.1.to_value()])
    }
}

impl<A: IntoValue, B: IntoValue, C: IntoValue> IntoHookOutputs for (A, B, C) {
    fn into_hook_outputs(self) -> HookOutputs {
        HookOutputs(vec![self.0.to_value(), self.1.to_value(), self.2.to_value()])
    }
}

/// Call the hook named `method` on `value` and validate its outputs.
///
/// - `Ok(None)`: hooks disabled (empty `method`) or the type has no such hook
/// - `Ok(Some((key, value)))`: hook result; an empty `key` defers to generic
///   dispatch
/// - `Err(InvalidOverrideSignature)`: the hook does not return
///   `(string, value)`
pub fn try_override(value: &dyn Field, method: &str) -> Result<Option<(String, Value)>> {
    if method.is_empty() {
        return Ok(None);
    }

    let Some(HookOutputs(outputs)) = value.hook(method) else {
        return Ok(None);
    };

    if outputs.len() != HOOK_RESULTS_TOTAL {
        return Err(Error::InvalidOverrideSignature {
            method: method.to_string(),
            reason: "should have 2 outputs: (string, value)",
        });
    }

    let mut outputs = outputs.into_iter();
    let (Some(Value::String(key)), Some(value)) = (outputs.next(), outputs.next()) else {
        return Err(Error::InvalidOverrideSignature {
            method: method.to_string(),
            reason: "first output should be string",
        });
    };

    Ok(Some((key, value)))
}
