//! Positional argument matching
//!
//! The matcher walks the schema slots once, left to right, consuming values
//! from the front of the argument list. Each step receives the pass state by
//! value and returns the next one, so the whole match is a `try_fold` over
//! the slots.
//!
//! The pass carries two things besides the bindings built so far:
//!
//! - **remaining**: the not-yet-consumed tail of the argument list. It only
//!   ever shrinks.
//! - **deferred**: the first mismatch from an optional slot that was skipped
//!   instead of failing. Any later successful slot clears it. If a later slot
//!   fails while more than one value is still unconsumed, the deferred
//!   mismatch is reported instead, since the match went wrong at the skipped
//!   optional. If it survives to the end of the pass it is reported then.
//!
//! A spread slot takes every remaining value except one per slot still to
//! come after it.
//!
//! Copyright (c) 2025 Argbind Team
//! Licensed under MIT OR Apache-2.0

mod bindings;

#[cfg(test)]
mod tests;

pub use bindings::{Binding, Bindings};

use crate::check::check_one;
use crate::error::{Error, Mismatch, Result};
use crate::json::{args_from_json, array_like_length};
use crate::registry::Registry;
use crate::schema::{Schema, Slot, SlotKind};
use crate::value::ArgValue;
use serde_json::Value;
use tracing::{debug, trace};

/// Match `args` against `schema`, returning the destructured bindings
///
/// On failure no partial bindings are returned; the error names the slot
/// that could not be satisfied.
pub fn match_args(args: &[ArgValue], schema: &Schema) -> Result<Bindings> {
    let slots = schema.slots();
    let total = slots.len();

    slots
        .iter()
        .enumerate()
        .try_fold(Pass::start(args, total), |pass, (index, slot)| {
            pass.step(slot, total - index - 1)
        })?
        .finish()
}

/// Match a JSON argument list against a JSON schema
///
/// `args` must be an array or an array-like object (`{"length": n, "0": ..}`)
/// and `schema` must be an object; both are checked before anything else.
pub fn match_json(args: &Value, schema: &Value, registry: &Registry) -> Result<Bindings> {
    if array_like_length(args).is_none() {
        return Err(Error::InvalidArgs);
    }
    let schema = Schema::from_json(schema, registry)?;
    let args = args_from_json(args, registry)?;
    match_args(&args, &schema)
}

impl Schema {
    /// Match `args` against this schema
    pub fn bind(&self, args: &[ArgValue]) -> Result<Bindings> {
        match_args(args, self)
    }
}

/// State threaded through one matching pass
#[derive(Debug)]
struct Pass<'a> {
    remaining: &'a [ArgValue],
    deferred: Option<Mismatch>,
    bindings: Bindings,
}

impl<'a> Pass<'a> {
    fn start(args: &'a [ArgValue], slots: usize) -> Self {
        Self {
            remaining: args,
            deferred: None,
            bindings: Bindings::with_capacity(slots),
        }
    }

    /// Bind one slot. `slots_after` is the number of slots still to come.
    fn step(self, slot: &Slot, slots_after: usize) -> Result<Self> {
        trace!(
            key = %slot.key,
            kind = %slot.kind,
            remaining = self.remaining.len(),
            slots_after,
            "binding slot"
        );
        match slot.kind {
            SlotKind::Required => self.bind_required(slot),
            SlotKind::Optional => Ok(self.bind_optional(slot)),
            SlotKind::SpreadRequired => self.bind_spread(slot, slots_after, false),
            SlotKind::SpreadOptional => self.bind_spread(slot, slots_after, true),
        }
    }

    fn finish(self) -> Result<Bindings> {
        match self.deferred {
            Some(mismatch) => {
                debug!(key = %mismatch.key, "reporting deferred optional mismatch");
                Err(mismatch.into())
            }
            None => Ok(self.bindings),
        }
    }

    fn bind_required(mut self, slot: &Slot) -> Result<Self> {
        let remaining: &'a [ArgValue] = self.remaining;
        let (value, rest) = remaining.split_first().ok_or_else(|| Error::Required {
            key: slot.label(),
        })?;

        if let Err(mismatch) = check_one(&slot.label(), value, &slot.validator, false) {
            return Err(self.escalate(mismatch));
        }

        self.deferred = None;
        self.remaining = rest;
        self.bindings.push(&slot.name, Binding::Value(value.clone()));
        Ok(self)
    }

    fn bind_optional(mut self, slot: &Slot) -> Self {
        let remaining: &'a [ArgValue] = self.remaining;
        let Some((value, rest)) = remaining.split_first() else {
            self.bindings.push(&slot.name, Binding::Absent);
            return self;
        };

        let accepted = !value.exists()
            || match check_one(&slot.label(), value, &slot.validator, false) {
                Ok(()) => true,
                Err(mismatch) => {
                    debug!(key = %slot.key, error = %mismatch, "skipping optional slot");
                    self.deferred.get_or_insert(mismatch);
                    false
                }
            };

        if accepted {
            self.deferred = None;
            self.remaining = rest;
            self.bindings.push(&slot.name, Binding::Value(value.clone()));
        } else {
            self.bindings.push(&slot.name, Binding::Absent);
        }
        self
    }

    fn bind_spread(mut self, slot: &Slot, slots_after: usize, optional: bool) -> Result<Self> {
        let width = self.remaining.len().saturating_sub(slots_after);
        if width == 0 && !optional {
            return Err(Error::Required { key: slot.label() });
        }

        let label = slot.label();
        let remaining: &'a [ArgValue] = self.remaining;
        let window = &remaining[..width];
        let mut collected = Vec::with_capacity(width);

        for value in window {
            if optional && !value.exists() {
                self.remaining = &self.remaining[1..];
                continue;
            }
            if let Err(mismatch) = check_one(&label, value, &slot.validator, true) {
                return Err(self.escalate(mismatch));
            }
            self.deferred = None;
            self.remaining = &self.remaining[1..];
            collected.push(value.clone());
        }

        debug!(key = %slot.key, width, bound = collected.len(), "bound spread slot");
        self.bindings.push(&slot.name, Binding::Spread(collected));
        Ok(self)
    }

    /// Pick the error to report for a failed check
    ///
    /// The deferred optional mismatch wins while more than one value is
    /// still unconsumed.
    fn escalate(self, mismatch: Mismatch) -> Error {
        match self.deferred {
            Some(deferred) if self.remaining.len() > 1 => {
                debug!(
                    key = %mismatch.key,
                    deferred = %deferred.key,
                    "reporting earlier optional mismatch instead"
                );
                deferred.into()
            }
            _ => mismatch.into(),
        }
    }
}
