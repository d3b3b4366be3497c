use ndexcollapse_core::model::{Attribute, AttributeValue, Datatype, Scalar};

/// Scalar datatype to the list datatype it widens into.
const LIST_PROMOTIONS: [(Datatype, Datatype); 5] = [
    (Datatype::Boolean, Datatype::ListOfBoolean),
    (Datatype::Double, Datatype::ListOfDouble),
    (Datatype::Integer, Datatype::ListOfInteger),
    (Datatype::Long, Datatype::ListOfLong),
    (Datatype::String, Datatype::ListOfString),
];

/// Widen a datatype to its list form. Untyped values are strings; list types are kept.
pub fn promote(datatype: Option<Datatype>) -> Datatype {
    match datatype {
        None => Datatype::ListOfString,
        Some(datatype) => LIST_PROMOTIONS
            .iter()
            .find(|(scalar, _)| *scalar == datatype)
            .map_or(datatype, |(_, list)| *list),
    }
}

/// Fold `absorbed` into `survivor` in place.
///
/// Only names already on the survivor are updated, against the first attribute of
/// `absorbed` with the same name. Equal values are left alone. Otherwise the
/// datatype is promoted to its list form and the value becomes the survivor's
/// elements followed by the absorbed ones, without duplicates or falsy entries.
pub fn merge_attributes(survivor: &mut [Attribute], absorbed: &[Attribute]) {
    for attribute in survivor.iter_mut() {
        let Some(other) = absorbed.iter().find(|b| b.name == attribute.name) else {
            continue;
        };
        if attribute.value == other.value {
            continue;
        }

        let mut merged: Vec<Scalar> = Vec::new();
        for value in attribute
            .value
            .elements()
            .iter()
            .chain(other.value.elements())
        {
            if value.is_truthy() && !merged.contains(value) {
                merged.push(value.clone());
            }
        }

        attribute.datatype = Some(promote(attribute.datatype));
        attribute.value = AttributeValue::List(merged);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attr(name: &str, value: AttributeValue, datatype: Option<Datatype>) -> Attribute {
        Attribute::new(name, value, datatype)
    }

    #[test]
    fn test_promotion_table() {
        assert_eq!(promote(None), Datatype::ListOfString);
        assert_eq!(promote(Some(Datatype::String)), Datatype::ListOfString);
        assert_eq!(promote(Some(Datatype::Boolean)), Datatype::ListOfBoolean);
        assert_eq!(promote(Some(Datatype::Double)), Datatype::ListOfDouble);
        assert_eq!(promote(Some(Datatype::Integer)), Datatype::ListOfInteger);
        assert_eq!(promote(Some(Datatype::Long)), Datatype::ListOfLong);
        assert_eq!(promote(Some(Datatype::ListOfLong)), Datatype::ListOfLong);
    }

    #[test]
    fn test_divergent_scalars_widen_to_list() {
        let mut a = vec![attr("w", AttributeValue::scalar(5), Some(Datatype::Integer))];
        let b = vec![attr("w", AttributeValue::scalar(7), Some(Datatype::Integer))];

        merge_attributes(&mut a, &b);

        assert_eq!(
            a,
            vec![attr("w", AttributeValue::list([5, 7]), Some(Datatype::ListOfInteger))]
        );
    }

    #[test]
    fn test_equal_values_are_untouched() {
        let original = vec![attr("w", AttributeValue::scalar(5), Some(Datatype::Integer))];
        let mut a = original.clone();
        let b = vec![attr("w", AttributeValue::scalar(5), Some(Datatype::Integer))];

        merge_attributes(&mut a, &b);

        assert_eq!(a, original);
    }

    #[test]
    fn test_falsy_and_duplicate_elements_dropped() {
        let mut a = vec![attr(
            "w",
            AttributeValue::list([1, 0, 2]),
            Some(Datatype::ListOfInteger),
        )];
        let b = vec![attr(
            "w",
            AttributeValue::list([2, 3, 0]),
            Some(Datatype::ListOfInteger),
        )];

        merge_attributes(&mut a, &b);

        assert_eq!(a[0].value, AttributeValue::list([1, 2, 3]));
        assert_eq!(a[0].datatype, Some(Datatype::ListOfInteger));
    }

    #[test]
    fn test_untyped_attribute_becomes_list_of_string() {
        let mut a = vec![attr("citation", AttributeValue::scalar("pmid:1"), None)];
        let b = vec![attr("citation", AttributeValue::scalar("pmid:2"), None)];

        merge_attributes(&mut a, &b);

        assert_eq!(a[0].datatype, Some(Datatype::ListOfString));
        assert_eq!(a[0].value, AttributeValue::list(["pmid:1", "pmid:2"]));
    }

    #[test]
    fn test_names_only_on_absorbed_side_are_not_added() {
        let mut a = vec![attr("x", AttributeValue::scalar(1), Some(Datatype::Integer))];
        let b = vec![
            attr("y", AttributeValue::scalar("extra"), Some(Datatype::String)),
            attr("x", AttributeValue::scalar(1), Some(Datatype::Integer)),
        ];

        merge_attributes(&mut a, &b);

        assert_eq!(a.len(), 1);
        assert_eq!(a[0].name, "x");
    }

    #[test]
    fn test_names_only_on_survivor_side_are_kept() {
        let original = vec![
            attr("x", AttributeValue::scalar(true), Some(Datatype::Boolean)),
            attr("z", AttributeValue::scalar(2.5), Some(Datatype::Double)),
        ];
        let mut a = original.clone();

        merge_attributes(&mut a, &[]);

        assert_eq!(a, original);
    }

    #[test]
    fn test_first_matching_name_on_absorbed_side_wins() {
        let mut a = vec![attr("x", AttributeValue::scalar("a"), Some(Datatype::String))];
        let b = vec![
            attr("x", AttributeValue::scalar("b"), Some(Datatype::String)),
            attr("x", AttributeValue::scalar("c"), Some(Datatype::String)),
        ];

        merge_attributes(&mut a, &b);

        assert_eq!(a[0].value, AttributeValue::list(["a", "b"]));
    }

    #[test]
    fn test_false_boolean_is_dropped_when_widening() {
        let mut a = vec![attr("direct", AttributeValue::scalar(false), Some(Datatype::Boolean))];
        let b = vec![attr("direct", AttributeValue::scalar(true), Some(Datatype::Boolean))];

        merge_attributes(&mut a, &b);

        assert_eq!(a[0].datatype, Some(Datatype::ListOfBoolean));
        assert_eq!(a[0].value, AttributeValue::list([true]));
    }

    #[test]
    fn test_boolean_and_integer_one_are_duplicates() {
        let mut a = vec![attr("flag", AttributeValue::list([true]), Some(Datatype::ListOfBoolean))];
        let b = vec![attr("flag", AttributeValue::list([1, 2]), Some(Datatype::ListOfInteger))];

        merge_attributes(&mut a, &b);

        assert_eq!(a[0].datatype, Some(Datatype::ListOfBoolean));
        assert_eq!(
            a[0].value,
            AttributeValue::List(vec![Scalar::Bool(true), Scalar::Int(2)])
        );
    }

    #[test]
    fn test_left_fold_over_several_absorbed_lists() {
        let mut a = vec![attr("score", AttributeValue::scalar(0.5), Some(Datatype::Double))];
        merge_attributes(
            &mut a,
            &[attr("score", AttributeValue::scalar(0.7), Some(Datatype::Double))],
        );
        merge_attributes(
            &mut a,
            &[attr("score", AttributeValue::list([0.5, 0.9]), Some(Datatype::ListOfDouble))],
        );

        assert_eq!(a[0].value, AttributeValue::list([0.5, 0.7, 0.9]));
        assert_eq!(a[0].datatype, Some(Datatype::ListOfDouble));
    }
}
