use std::cmp::Ordering;

use bson::Document;
use catalog_query::{Sort, SortDirection};

use crate::compare::{compare_field_values, get_path};

/// Stable multi-key sort. Documents equal on every key keep their input order.
pub(crate) fn sort_documents(docs: &mut [Document], sorts: &[Sort]) {
    if sorts.is_empty() {
        return;
    }

    docs.sort_by(|a, b| {
        for sort in sorts {
            let ord = compare_field_values(get_path(a, &sort.field), get_path(b, &sort.field));
            let ord = match sort.direction {
                SortDirection::Asc => ord,
                SortDirection::Desc => ord.reverse(),
            };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    fn names(docs: &[Document]) -> Vec<&str> {
        docs.iter().map(|d| d.get_str("n").unwrap()).collect()
    }

    #[test]
    fn no_sorts_keeps_order() {
        let mut docs = vec![doc! { "n": "b" }, doc! { "n": "a" }];
        sort_documents(&mut docs, &[]);
        assert_eq!(names(&docs), ["b", "a"]);
    }

    #[test]
    fn desc_reverses() {
        let mut docs = vec![doc! { "n": "a" }, doc! { "n": "c" }, doc! { "n": "b" }];
        sort_documents(&mut docs, &[Sort::new("n", SortDirection::Desc)]);
        assert_eq!(names(&docs), ["c", "b", "a"]);
    }

    #[test]
    fn ties_are_stable_and_fall_through_to_next_key() {
        let mut docs = vec![
            doc! { "n": "x", "k": 1_i32, "j": 2_i32 },
            doc! { "n": "y", "k": 1_i32, "j": 1_i32 },
            doc! { "n": "z", "k": 0_i32, "j": 9_i32 },
        ];
        sort_documents(&mut docs, &[Sort::new("k", SortDirection::Asc)]);
        assert_eq!(names(&docs), ["z", "x", "y"]);

        sort_documents(
            &mut docs,
            &[
                Sort::new("k", SortDirection::Asc),
                Sort::new("j", SortDirection::Asc),
            ],
        );
        assert_eq!(names(&docs), ["z", "y", "x"]);
    }

    #[test]
    fn missing_field_sorts_first() {
        let mut docs = vec![doc! { "n": "a", "k": 1_i32 }, doc! { "n": "b" }];
        sort_documents(&mut docs, &[Sort::new("k", SortDirection::Asc)]);
        assert_eq!(names(&docs), ["b", "a"]);
    }

    #[test]
    fn nan_amounts_do_not_break_numeric_order() {
        let mut docs: Vec<Document> = (0..60)
            .map(|i| {
                let amount = if i % 7 == 0 {
                    f64::NAN
                } else {
                    ((i * 37) % 101) as f64 / 3.0
                };
                doc! { "n": i.to_string(), "amount": amount }
            })
            .collect();
        docs.push(doc! { "n": "int", "amount": 5_i32 });

        sort_documents(&mut docs, &[Sort::new("amount", SortDirection::Asc)]);

        let amounts: Vec<f64> = docs
            .iter()
            .map(|d| match d.get("amount") {
                Some(bson::Bson::Double(v)) => *v,
                Some(bson::Bson::Int32(v)) => f64::from(*v),
                other => panic!("unexpected amount {other:?}"),
            })
            .collect();
        let finite: Vec<f64> = amounts.iter().copied().filter(|v| !v.is_nan()).collect();
        assert!(finite.windows(2).all(|w| w[0] <= w[1]), "{finite:?}");

        let first_nan = amounts.iter().position(|v| v.is_nan()).unwrap();
        assert!(amounts[first_nan..].iter().all(|v| v.is_nan()));
    }
}
