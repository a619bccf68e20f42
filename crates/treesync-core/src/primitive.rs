//! Primitive leaves are compared by equality and replaced whole.

use crate::diff::Diff;
use crate::model::Model;

pub(crate) fn diff<T: Clone + PartialEq>(old: &T, new: &T) -> Option<Diff<T>> {
    if old == new {
        None
    } else {
        Some(Diff::Primitive(new.clone()))
    }
}

pub(crate) fn patch<T: Clone>(value: &T) -> Model<T> {
    Model::Primitive(value.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equal_values_have_no_diff() {
        assert_eq!(diff(&"a".to_string(), &"a".to_string()), None);
    }

    #[test]
    fn test_changed_value_is_replaced() {
        assert_eq!(diff(&1, &2), Some(Diff::Primitive(2)));
        assert_eq!(patch(&2), Model::Primitive(2));
    }
}
