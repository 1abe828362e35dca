//! Collection ordering.

use std::cmp::Ordering;

use chrono::NaiveDate;
use folio_core::{SortKey, SortOrder, SortPolicy};
use serde_yaml::Value;

use crate::object::CollectionObject;

/// Comparable value extracted for a sort key.
#[derive(Debug, Clone, PartialEq)]
enum SortValue {
    Date(NaiveDate),
    Number(f64),
    Text(String),
}

impl SortValue {
    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Date(a), Self::Date(b)) => a.cmp(b),
            (Self::Number(a), Self::Number(b)) => a.total_cmp(b),
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Self::Date(_) => 0,
            Self::Number(_) => 1,
            Self::Text(_) => 2,
        }
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Number(number) => number.as_f64().map(Self::Number),
            Value::String(text) => Some(Self::Text(text)),
            Value::Bool(flag) => Some(Self::Number(f64::from(u8::from(flag)))),
            _ => None,
        }
    }
}

/// Orders collections by their sort policy.
///
/// Ties on the key are broken by id in the same direction. Objects missing
/// the key come after every object that has it, whatever the direction.
#[derive(Debug, Default, Clone, Copy)]
pub struct CollectionSorter;

impl CollectionSorter {
    /// Create a sorter.
    pub fn new() -> Self {
        Self
    }

    /// Sort `objects` by `policy`.
    pub fn sort(
        &self,
        objects: Vec<CollectionObject>,
        policy: &SortPolicy,
    ) -> Vec<CollectionObject> {
        let mut keyed: Vec<(Option<SortValue>, CollectionObject)> = objects
            .into_iter()
            .map(|object| (sort_value(&object, &policy.by), object))
            .collect();

        let directed = |ordering: Ordering| match policy.order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        };

        keyed.sort_by(|(key_a, a), (key_b, b)| {
            let by_key = match (key_a, key_b) {
                (Some(x), Some(y)) => directed(x.compare(y)),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            };
            by_key.then_with(|| directed(a.id().cmp(&b.id())))
        });

        keyed.into_iter().map(|(_, object)| object).collect()
    }
}

fn sort_value(object: &CollectionObject, key: &SortKey) -> Option<SortValue> {
    match key {
        SortKey::Date => object.date().map(SortValue::Date),
        SortKey::Id => Some(SortValue::Number(object.id() as f64)),
        SortKey::Title => object.title().map(|t| SortValue::Text(t.to_string())),
        SortKey::Field(name) => object
            .field(name)
            .found()
            .and_then(SortValue::from_value),
    }
}

#[cfg(test)]
mod tests {
    use folio_core::SourceFile;
    use serde_yaml::Mapping;

    use super::*;
    use crate::object::{ObjectKind, RenderableFile};

    fn object(id: u64, date: Option<(i32, u32, u32)>, header: &str) -> CollectionObject {
        let header: Option<Mapping> = if header.is_empty() {
            None
        } else {
            Some(serde_yaml::from_str(header).unwrap())
        };
        CollectionObject::new(
            id,
            ObjectKind::Post,
            format!("post-{id}"),
            date.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d)),
            RenderableFile::from_source(SourceFile::new(format!("{id}.md"), header, "")),
        )
    }

    fn ids(objects: &[CollectionObject]) -> Vec<u64> {
        objects.iter().map(CollectionObject::id).collect()
    }

    #[test]
    fn test_default_is_newest_first() {
        let sorted = CollectionSorter::new().sort(
            vec![
                object(1, Some((2024, 1, 1)), ""),
                object(2, Some((2024, 3, 1)), ""),
                object(3, Some((2024, 2, 1)), ""),
            ],
            &SortPolicy::default(),
        );
        assert_eq!(ids(&sorted), vec![2, 3, 1]);
    }

    #[test]
    fn test_ties_broken_by_id_in_same_direction() {
        let objects = || {
            vec![
                object(1, Some((2024, 1, 1)), ""),
                object(3, Some((2024, 1, 1)), ""),
                object(2, Some((2024, 1, 1)), ""),
            ]
        };

        let desc = CollectionSorter::new().sort(objects(), &SortPolicy::default());
        assert_eq!(ids(&desc), vec![3, 2, 1]);

        let asc = CollectionSorter::new()
            .sort(objects(), &SortPolicy::new(SortKey::Date, SortOrder::Asc));
        assert_eq!(ids(&asc), vec![1, 2, 3]);
    }

    #[test]
    fn test_missing_key_sorts_last() {
        let objects = || {
            vec![
                object(1, None, ""),
                object(2, Some((2024, 1, 1)), ""),
                object(3, Some((2023, 1, 1)), ""),
            ]
        };

        let desc = CollectionSorter::new().sort(objects(), &SortPolicy::default());
        assert_eq!(ids(&desc), vec![2, 3, 1]);

        let asc = CollectionSorter::new()
            .sort(objects(), &SortPolicy::new(SortKey::Date, SortOrder::Asc));
        assert_eq!(ids(&asc), vec![3, 2, 1]);
    }

    #[test]
    fn test_sort_by_title_and_field() {
        let objects = || {
            vec![
                object(1, None, "title: Banana\nweight: 3"),
                object(2, None, "title: Apple\nweight: 10"),
                object(3, None, "title: Cherry\nweight: 1"),
            ]
        };

        let by_title = CollectionSorter::new()
            .sort(objects(), &SortPolicy::new(SortKey::Title, SortOrder::Asc));
        assert_eq!(ids(&by_title), vec![2, 1, 3]);

        let by_weight = CollectionSorter::new().sort(
            objects(),
            &SortPolicy::new(SortKey::Field("weight".to_string()), SortOrder::Asc),
        );
        assert_eq!(ids(&by_weight), vec![3, 1, 2]);
    }

    #[test]
    fn test_sort_by_id() {
        let sorted = CollectionSorter::new().sort(
            vec![object(2, None, ""), object(1, None, ""), object(3, None, "")],
            &SortPolicy::new(SortKey::Id, SortOrder::Asc),
        );
        assert_eq!(ids(&sorted), vec![1, 2, 3]);
    }
}
