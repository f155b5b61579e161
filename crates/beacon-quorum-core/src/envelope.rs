use std::collections::BTreeSet;

use crate::types::NodeIdentity;

/// A reconciled value together with where it came from.
///
/// `responded_by` is the node whose answer was returned. `agreement` is
/// every node that returned an equal value and always contains
/// `responded_by`. In first-success mode it holds only that node.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope<T> {
    value: T,
    responded_by: NodeIdentity,
    agreement: BTreeSet<NodeIdentity>,
}

impl<T> Envelope<T> {
    pub(crate) fn new(value: T, responded_by: NodeIdentity, agreement: BTreeSet<NodeIdentity>) -> Self {
        let mut agreement = agreement;
        agreement.insert(responded_by.clone());
        Self {
            value,
            responded_by,
            agreement,
        }
    }

    pub(crate) fn single(value: T, node: NodeIdentity) -> Self {
        Self::new(value, node, BTreeSet::new())
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn responded_by(&self) -> &NodeIdentity {
        &self.responded_by
    }

    pub fn agreement(&self) -> &BTreeSet<NodeIdentity> {
        &self.agreement
    }

    pub fn into_value(self) -> T {
        self.value
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Envelope<U> {
        Envelope {
            value: f(self.value),
            responded_by: self.responded_by,
            agreement: self.agreement,
        }
    }
}
