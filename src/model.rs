use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Class {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// A class as embedded in a student payload: the full object, or only its
/// display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClassRef {
    Full(Class),
    Name(String),
}

impl ClassRef {
    pub fn name(&self) -> &str {
        match self {
            ClassRef::Full(class) => &class.name,
            ClassRef::Name(name) => name,
        }
    }

    pub fn id(&self) -> Option<i64> {
        match self {
            ClassRef::Full(class) => Some(class.id),
            ClassRef::Name(_) => None,
        }
    }
}

impl From<Class> for ClassRef {
    fn from(class: Class) -> Self {
        ClassRef::Full(class)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email_id: String,
    pub phone_number: String,
    /// Snapshots of the associated classes as of the last fetch.
    #[serde(default)]
    pub classes: Vec<ClassRef>,
}

impl Student {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Class names joined in stored order, as shown in the table.
    pub fn class_names(&self) -> String {
        self.classes
            .iter()
            .map(ClassRef::name)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Single-student payload. The service may embed the related classes or send
/// bare ids; `class_ids()` reconciles both into one list.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRecord {
    pub id: i64,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email_id: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub classes: Option<Vec<ClassRef>>,
    #[serde(default)]
    pub class_ids: Option<Vec<i64>>,
}

impl StudentRecord {
    /// Name-only entries carry no id and are skipped.
    pub fn class_ids(&self) -> Vec<i64> {
        match (&self.classes, &self.class_ids) {
            (Some(classes), _) => classes.iter().filter_map(ClassRef::id).collect(),
            (None, Some(ids)) => ids.clone(),
            (None, None) => Vec::new(),
        }
    }

    pub fn into_draft(self) -> StudentDraft {
        let class_ids = self.class_ids();
        StudentDraft {
            first_name: self.first_name,
            last_name: self.last_name,
            email_id: self.email_id,
            phone_number: self.phone_number,
            class_ids,
        }
    }
}

/// In-progress form state; also the create/update request body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentDraft {
    pub first_name: String,
    pub last_name: String,
    pub email_id: String,
    pub phone_number: String,
    pub class_ids: Vec<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoginDraft {
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn record_with_embedded_classes_yields_their_ids_in_order() {
        let rec: StudentRecord = serde_json::from_value(json!({
            "id": 7,
            "firstName": "Ada",
            "lastName": "Lovelace",
            "emailId": "ada@example.com",
            "phoneNumber": "5551234",
            "classes": [
                { "id": 3, "name": "Math", "description": "" },
                { "id": 1, "name": "Art" }
            ]
        }))
        .expect("decode");
        assert_eq!(rec.class_ids(), vec![3, 1]);
    }

    #[test]
    fn record_with_bare_ids_uses_them() {
        let rec: StudentRecord = serde_json::from_value(json!({
            "id": 7,
            "firstName": "Ada",
            "lastName": "Lovelace",
            "emailId": "ada@example.com",
            "phoneNumber": "5551234",
            "classIds": [4, 2]
        }))
        .expect("decode");
        let draft = rec.into_draft();
        assert_eq!(draft.class_ids, vec![4, 2]);
        assert_eq!(draft.first_name, "Ada");
    }

    #[test]
    fn record_without_association_is_empty() {
        let rec: StudentRecord =
            serde_json::from_value(json!({ "id": 1, "firstName": "A" })).expect("decode");
        assert!(rec.class_ids().is_empty());
    }

    #[test]
    fn class_names_join_in_stored_order() {
        let s = Student {
            id: 1,
            first_name: "A".into(),
            last_name: "B".into(),
            email_id: String::new(),
            phone_number: String::new(),
            classes: vec![
                Class { id: 2, name: "Zoology".into(), description: String::new() }.into(),
                ClassRef::Name("Art".into()),
            ],
        };
        assert_eq!(s.class_names(), "Zoology, Art");
        assert_eq!(s.full_name(), "A B");
    }

    #[test]
    fn draft_serializes_camel_case() {
        let d = StudentDraft {
            first_name: "A".into(),
            class_ids: vec![1],
            ..StudentDraft::default()
        };
        let v = serde_json::to_value(&d).expect("encode");
        assert_eq!(v["firstName"], "A");
        assert_eq!(v["classIds"], json!([1]));
    }

    #[test]
    fn list_rows_accept_class_names() {
        let rows: Vec<Student> = serde_json::from_value(json!([{
            "id": 4,
            "firstName": "Kim",
            "lastName": "Lee",
            "emailId": "kim@example.com",
            "phoneNumber": "5550100",
            "classes": ["Math", "Art"]
        }]))
        .expect("decode");
        assert_eq!(rows[0].class_names(), "Math, Art");
        assert_eq!(rows[0].classes[0], ClassRef::Name("Math".into()));
    }

    #[test]
    fn list_rows_accept_class_objects() {
        let rows: Vec<Student> = serde_json::from_value(json!([{
            "id": 4,
            "firstName": "Kim",
            "lastName": "Lee",
            "emailId": "kim@example.com",
            "phoneNumber": "5550100",
            "classes": [{ "id": 9, "name": "History", "description": "Modern" }]
        }]))
        .expect("decode");
        assert_eq!(rows[0].class_names(), "History");
        assert_eq!(rows[0].classes[0].id(), Some(9));
    }

    #[test]
    fn record_classes_without_names_still_yield_ids() {
        let rec: StudentRecord = serde_json::from_value(json!({
            "id": 7,
            "firstName": "Ada",
            "classes": [{ "id": 5 }, { "id": 8 }]
        }))
        .expect("decode");
        assert_eq!(rec.class_ids(), vec![5, 8]);
    }

    #[test]
    fn record_with_class_names_only_has_no_ids() {
        let rec: StudentRecord = serde_json::from_value(json!({
            "id": 7,
            "classes": ["Math"]
        }))
        .expect("decode");
        assert!(rec.class_ids().is_empty());
    }
}
