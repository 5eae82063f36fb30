// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Call records, pattern matching and the call log.

use crate::arg::Matcher;
use crate::types::TypeHandle;
use crate::value::{Value, ValueComparer};
use std::fmt;

/// Generic type argument of a call record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenericArg {
    /// A concrete type.
    Type(TypeHandle),
    /// Wildcard; matches any type. Only meaningful in patterns.
    Any,
}

impl fmt::Display for GenericArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Type(ty) => f.write_str(ty.name()),
            Self::Any => f.write_str("?"),
        }
    }
}

/// Positional argument slot.
#[derive(Debug, Clone)]
pub enum Slot {
    /// A literal, compared with the dispatcher's value comparer.
    Value(Value),
    /// A predicate. Only meaningful in patterns.
    Matcher(Matcher),
}

impl Slot {
    fn matches(&self, observed: &Self, comparer: &dyn ValueComparer) -> bool {
        match (self, observed) {
            (Self::Value(expected), Self::Value(actual)) => comparer.equals(expected, actual),
            (Self::Matcher(matcher), Self::Value(actual)) => matcher.matches(actual),
            (_, Self::Matcher(_)) => false,
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(value) => fmt::Display::fmt(value, f),
            Self::Matcher(matcher) => fmt::Display::fmt(matcher, f),
        }
    }
}

/// One invocation: member name, generic arguments, positional arguments.
///
/// Observed records only hold [`GenericArg::Type`] and [`Slot::Value`].
/// Patterns may additionally hold wildcards and matchers.
#[derive(Debug, Clone)]
pub struct CallRecord {
    name: String,
    generics: Vec<GenericArg>,
    args: Vec<Slot>,
}

impl CallRecord {
    /// Pattern/record for `name` with no generics or arguments yet.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            generics: Vec::new(),
            args: Vec::new(),
        }
    }

    /// Observed record. By-reference carriers are snapshotted.
    pub fn observed(name: &str, generics: &[TypeHandle], args: &[Value]) -> Self {
        Self {
            name: name.to_owned(),
            generics: generics.iter().cloned().map(GenericArg::Type).collect(),
            args: args.iter().map(|arg| Slot::Value(arg.resolved())).collect(),
        }
    }

    /// Append a concrete generic argument.
    pub fn generic(mut self, ty: &TypeHandle) -> Self {
        self.generics.push(GenericArg::Type(ty.clone()));
        self
    }

    /// Append a generic wildcard.
    pub fn any_generic(mut self) -> Self {
        self.generics.push(GenericArg::Any);
        self
    }

    /// Append a literal argument.
    pub fn value(mut self, value: Value) -> Self {
        self.args.push(Slot::Value(value.resolved()));
        self
    }

    /// Append a boxed literal argument.
    pub fn arg<T: crate::value::DynValue>(self, value: T) -> Self {
        self.value(Value::of(value))
    }

    /// Append a matcher.
    pub fn matcher(mut self, matcher: Matcher) -> Self {
        self.args.push(Slot::Matcher(matcher));
        self
    }

    /// Member name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Generic arguments.
    pub fn generics(&self) -> &[GenericArg] {
        &self.generics
    }

    /// Positional arguments.
    pub fn args(&self) -> &[Slot] {
        &self.args
    }

    pub(crate) fn generics_mut(&mut self) -> &mut Vec<GenericArg> {
        &mut self.generics
    }

    pub(crate) fn args_mut(&mut self) -> &mut Vec<Slot> {
        &mut self.args
    }

    /// Whether this pattern matches `observed`.
    ///
    /// Names compare exactly. Generic and positional lists must have the same
    /// length; a length mismatch is a non-match, never an error.
    pub fn matches(&self, observed: &CallRecord, comparer: &dyn ValueComparer) -> bool {
        self.name == observed.name
            && self.generics.len() == observed.generics.len()
            && self.args.len() == observed.args.len()
            && self
                .generics
                .iter()
                .zip(&observed.generics)
                .all(|(pattern, actual)| match (pattern, actual) {
                    (GenericArg::Any, _) => true,
                    (GenericArg::Type(expected), GenericArg::Type(actual)) => expected == actual,
                    (GenericArg::Type(_), GenericArg::Any) => false,
                })
            && self
                .args
                .iter()
                .zip(&observed.args)
                .all(|(pattern, actual)| pattern.matches(actual, comparer))
    }
}

fn join<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    for (index, item) in items.iter().enumerate() {
        if index > 0 {
            f.write_str(", ")?;
        }
        fmt::Display::fmt(item, f)?;
    }
    Ok(())
}

impl fmt::Display for CallRecord {
    /// `name<g1, g2>(a1, a2)`; the generic list is omitted when empty.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if !self.generics.is_empty() {
            f.write_str("<")?;
            join(f, &self.generics)?;
            f.write_str(">")?;
        }
        f.write_str("(")?;
        join(f, &self.args)?;
        f.write_str(")")
    }
}

/// Ordered list of observed calls.
#[derive(Debug, Clone, Default)]
pub struct CallLog(Vec<CallRecord>);

impl CallLog {
    /// Records in call order.
    pub fn records(&self) -> &[CallRecord] {
        &self.0
    }

    /// Number of calls.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no call was observed.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate in call order.
    pub fn iter(&self) -> std::slice::Iter<'_, CallRecord> {
        self.0.iter()
    }

    /// Records matching `pattern`.
    pub fn matching(&self, pattern: &CallRecord, comparer: &dyn ValueComparer) -> CallLog {
        CallLog(
            self.0
                .iter()
                .filter(|record| pattern.matches(record, comparer))
                .cloned()
                .collect(),
        )
    }

    pub(crate) fn push(&mut self, record: CallRecord) {
        self.0.push(record);
    }

    pub(crate) fn clear(&mut self) {
        self.0.clear();
    }
}

impl From<Vec<CallRecord>> for CallLog {
    fn from(records: Vec<CallRecord>) -> Self {
        Self(records)
    }
}

impl<'a> IntoIterator for &'a CallLog {
    type Item = &'a CallRecord;
    type IntoIter = std::slice::Iter<'a, CallRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for CallLog {
    /// One record per line.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, record) in self.0.iter().enumerate() {
            if index > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{record}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::arg::Arg;
    use crate::value::StructuralComparer;

    fn calc(x: i32) -> CallRecord {
        CallRecord::observed("calc", &[], &[Value::of(x)])
    }

    #[test]
    fn literal_slots_use_value_equality() {
        let pattern = CallRecord::new("calc").arg(3_i32);
        assert!(pattern.matches(&calc(3), &StructuralComparer));
        assert!(!pattern.matches(&calc(4), &StructuralComparer));
    }

    #[test]
    fn name_and_arity_must_agree() {
        let pattern = CallRecord::new("calc").arg(3_i32);
        assert!(!pattern.matches(&CallRecord::observed("other", &[], &[Value::of(3_i32)]), &StructuralComparer));
        assert!(!pattern.matches(&CallRecord::observed("calc", &[], &[]), &StructuralComparer));
        let generic = CallRecord::new("calc").any_generic().arg(3_i32);
        assert!(!generic.matches(&calc(3), &StructuralComparer));
    }

    #[test]
    fn wildcard_generic_matches_any_type() {
        let observed = CallRecord::observed("convert", &[TypeHandle::of::<u8>()], &[]);
        assert!(CallRecord::new("convert").any_generic().matches(&observed, &StructuralComparer));
        assert!(CallRecord::new("convert")
            .generic(&TypeHandle::of::<u8>())
            .matches(&observed, &StructuralComparer));
        assert!(!CallRecord::new("convert")
            .generic(&TypeHandle::of::<u16>())
            .matches(&observed, &StructuralComparer));
    }

    #[test]
    fn any_matcher_accepts_null() {
        let pattern = CallRecord::new("put").matcher(Arg::any::<String>());
        let null = CallRecord::observed("put", &[], &[Value::Null]);
        assert!(pattern.matches(&null, &StructuralComparer));
        let strict = CallRecord::new("put").matcher(Arg::is::<String>(|s| s.is_empty()));
        assert!(!strict.matches(&null, &StructuralComparer));
    }

    #[test]
    fn observed_matchers_never_match() {
        let pattern = CallRecord::new("calc").matcher(Arg::any::<i32>());
        assert!(!pattern.matches(&pattern.clone(), &StructuralComparer));
    }

    #[test]
    fn display_renders_generics_and_null() {
        let record = CallRecord::observed(
            "convert",
            &[TypeHandle::of::<u8>(), TypeHandle::of::<String>()],
            &[Value::of(1_i32), Value::Null],
        );
        assert_eq!(
            record.to_string(),
            "convert<u8, alloc::string::String>(1, 'null')"
        );
        let log = CallLog::from(vec![calc(1), calc(2)]);
        assert_eq!(log.to_string(), "calc(1)\ncalc(2)");
    }
}
