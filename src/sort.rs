use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt::Debug;
use std::str::FromStr;

use crate::model::{Class, Student};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    /// Only ever reverses an already computed ordering.
    pub fn apply(self, ord: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    }
}

/// A type whose values can be ordered by a closed set of column keys.
pub trait Sortable {
    type Key: Copy + PartialEq + Debug + Serialize + FromStr<Err = String>;

    fn sort_value(&self, key: Self::Key) -> Cow<'_, str>;
}

impl<T: Sortable + ?Sized> Sortable for &T {
    type Key = T::Key;

    fn sort_value(&self, key: Self::Key) -> Cow<'_, str> {
        (**self).sort_value(key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SortState<K> {
    pub key: K,
    pub direction: SortDirection,
}

impl<K: Copy + PartialEq> SortState<K> {
    pub fn new(key: K) -> Self {
        Self {
            key,
            direction: SortDirection::Ascending,
        }
    }

    /// Same key flips the direction; a different key starts ascending.
    pub fn toggle(&mut self, key: K) {
        if self.key == key {
            self.direction = self.direction.flipped();
        } else {
            self.key = key;
            self.direction = SortDirection::Ascending;
        }
    }
}

pub fn normalize(value: &str) -> String {
    value.to_lowercase()
}

pub fn compare<T: Sortable>(a: &T, b: &T, key: T::Key, direction: SortDirection) -> Ordering {
    let left = normalize(&a.sort_value(key));
    let right = normalize(&b.sort_value(key));
    direction.apply(left.cmp(&right))
}

/// Stable sort by `state`; rows that compare equal keep their input order.
pub fn sort_rows<T: Sortable>(mut rows: Vec<T>, state: SortState<T::Key>) -> Vec<T> {
    rows.sort_by(|a, b| compare(a, b, state.key, state.direction));
    rows
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StudentSortKey {
    /// `firstName + " " + lastName`
    Name,
    FirstName,
    LastName,
    #[serde(rename = "emailId")]
    Email,
    #[serde(rename = "phoneNumber")]
    Phone,
    /// Embedded class names, comma-joined in stored order.
    Classes,
}

impl FromStr for StudentSortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(Self::Name),
            "firstName" => Ok(Self::FirstName),
            "lastName" => Ok(Self::LastName),
            "emailId" => Ok(Self::Email),
            "phoneNumber" => Ok(Self::Phone),
            "classes" => Ok(Self::Classes),
            other => Err(format!("unknown student sort key: {other}")),
        }
    }
}

impl Sortable for Student {
    type Key = StudentSortKey;

    fn sort_value(&self, key: StudentSortKey) -> Cow<'_, str> {
        match key {
            StudentSortKey::Name => Cow::Owned(self.full_name()),
            StudentSortKey::FirstName => Cow::Borrowed(&self.first_name),
            StudentSortKey::LastName => Cow::Borrowed(&self.last_name),
            StudentSortKey::Email => Cow::Borrowed(&self.email_id),
            StudentSortKey::Phone => Cow::Borrowed(&self.phone_number),
            StudentSortKey::Classes => Cow::Owned(self.class_names()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ClassSortKey {
    Name,
    Description,
}

impl FromStr for ClassSortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(Self::Name),
            "description" => Ok(Self::Description),
            other => Err(format!("unknown class sort key: {other}")),
        }
    }
}

impl Sortable for Class {
    type Key = ClassSortKey;

    fn sort_value(&self, key: ClassSortKey) -> Cow<'_, str> {
        match key {
            ClassSortKey::Name => Cow::Borrowed(&self.name),
            ClassSortKey::Description => Cow::Borrowed(&self.description),
        }
    }
}
