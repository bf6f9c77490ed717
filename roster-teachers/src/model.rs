//! Teacher record and request body shapes

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use roster_core::ObjectId;
use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Name of the identifier attribute in documents and request bodies
pub const ID_FIELD: &str = "_id";

/// A persisted teacher document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Teacher {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teacher_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lastname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grade: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_full_time: Option<bool>,
    #[serde(
        default,
        deserialize_with = "lenient_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_on: Option<DateTime<Utc>>,
}

/// Create body. `_id` and unknown attributes are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewTeacher {
    pub teacher_id: Option<i64>,
    pub name: Option<String>,
    pub lastname: Option<String>,
    pub title: Option<String>,
    pub grade: Option<String>,
    pub age: Option<i64>,
    pub is_full_time: Option<bool>,
    #[serde(deserialize_with = "lenient_date")]
    pub updated_on: Option<DateTime<Utc>>,
}

impl NewTeacher {
    pub fn into_teacher(self, id: ObjectId) -> Teacher {
        Teacher {
            id,
            teacher_id: self.teacher_id,
            name: self.name,
            lastname: self.lastname,
            title: self.title,
            grade: self.grade,
            age: self.age,
            is_full_time: self.is_full_time,
            updated_on: self.updated_on,
        }
    }
}

/// PUT body: the fixed attribute set a full update overwrites.
///
/// A member missing from the body clears that attribute. Anything outside
/// the set (`title`, `_id`, unknown names) never reaches the record.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FullUpdate {
    pub teacher_id: Option<i64>,
    pub name: Option<String>,
    pub lastname: Option<String>,
    pub grade: Option<String>,
    pub age: Option<i64>,
    pub is_full_time: Option<bool>,
    #[serde(deserialize_with = "lenient_date")]
    pub updated_on: Option<DateTime<Utc>>,
}

impl FullUpdate {
    pub fn apply(self, teacher: &mut Teacher) {
        teacher.teacher_id = self.teacher_id;
        teacher.name = self.name;
        teacher.lastname = self.lastname;
        teacher.grade = self.grade;
        teacher.age = self.age;
        teacher.is_full_time = self.is_full_time;
        teacher.updated_on = self.updated_on;
    }
}

/// `updatedOn` accepts RFC 3339, a naive `YYYY-MM-DDTHH:MM:SS[.f]` (read as
/// UTC) or a bare `YYYY-MM-DD` (midnight UTC). It is always written as
/// RFC 3339.
fn lenient_date<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    parse_date(&raw)
        .map(Some)
        .ok_or_else(|| de::Error::custom(format!("invalid date: {raw:?}")))
}

fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Errors from request body shapes
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("request body must be a JSON object")]
    NotAnObject,

    #[error("invalid attribute value: {0}")]
    InvalidValue(#[from] serde_json::Error),
}

/// PATCH body: an arbitrary subset of attributes to overwrite
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeacherPatch {
    attributes: Map<String, Value>,
}

impl TeacherPatch {
    /// Build a patch from a body object, dropping any `_id` member
    pub fn new(mut attributes: Map<String, Value>) -> Self {
        attributes.remove(ID_FIELD);
        Self { attributes }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.attributes.keys().map(String::as_str)
    }

    /// Merge the patch into a copy of `teacher`.
    ///
    /// `null` clears an attribute; names that are not teacher attributes are
    /// ignored. A value of the wrong type rejects the whole patch.
    pub fn apply(&self, teacher: &Teacher) -> Result<Teacher, ModelError> {
        let Value::Object(mut doc) = serde_json::to_value(teacher)? else {
            return Err(ModelError::NotAnObject);
        };

        for (name, value) in &self.attributes {
            doc.insert(name.clone(), value.clone());
        }

        Ok(serde_json::from_value(Value::Object(doc))?)
    }
}

impl TryFrom<Value> for TeacherPatch {
    type Error = ModelError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(attributes) => Ok(Self::new(attributes)),
            _ => Err(ModelError::NotAnObject),
        }
    }
}

/// DELETE `/` body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeleteRequest {
    #[serde(rename = "_id", default)]
    pub id: Option<Value>,
}

impl DeleteRequest {
    /// The `_id` member, when it is a string
    pub fn id_str(&self) -> Option<&str> {
        self.id.as_ref().and_then(Value::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Teacher {
        NewTeacher {
            teacher_id: Some(4),
            name: Some("vin".to_string()),
            lastname: Some("mustillo".to_string()),
            title: Some("assistant".to_string()),
            age: Some(21),
            is_full_time: Some(true),
            ..NewTeacher::default()
        }
        .into_teacher(ObjectId::parse("5a23f72a1fb00a38f0a814a9").unwrap())
    }

    #[test]
    fn test_teacher_json_shape() {
        let json = serde_json::to_value(sample()).unwrap();

        assert_eq!(
            json,
            json!({
                "_id": "5a23f72a1fb00a38f0a814a9",
                "teacherId": 4,
                "name": "vin",
                "lastname": "mustillo",
                "title": "assistant",
                "age": 21,
                "isFullTime": true
            })
        );
    }

    #[test]
    fn test_new_teacher_ignores_id_and_unknown_fields() {
        let new: NewTeacher = serde_json::from_value(json!({
            "_id": "5a23f72a1fb00a38f0a814a9",
            "name": "ann",
            "shoeSize": 9
        }))
        .unwrap();

        assert_eq!(new.name.as_deref(), Some("ann"));
        assert_eq!(new.teacher_id, None);
    }

    #[test]
    fn test_full_update_overwrites_fixed_set_only() {
        let mut teacher = sample();
        let update: FullUpdate = serde_json::from_value(json!({
            "name": "ann",
            "grade": "5",
            "title": "professor",
            "updatedOn": "2017-12-03T10:00:00Z"
        }))
        .unwrap();

        update.apply(&mut teacher);

        assert_eq!(teacher.name.as_deref(), Some("ann"));
        assert_eq!(teacher.grade.as_deref(), Some("5"));
        assert_eq!(
            teacher.updated_on.unwrap().to_rfc3339(),
            "2017-12-03T10:00:00+00:00"
        );
        // Outside the fixed set: untouched
        assert_eq!(teacher.title.as_deref(), Some("assistant"));
        // Inside the set but missing from the body: cleared
        assert_eq!(teacher.teacher_id, None);
        assert_eq!(teacher.lastname, None);
        assert_eq!(teacher.age, None);
        assert_eq!(teacher.is_full_time, None);
    }

    #[test]
    fn test_patch_changes_only_present_attributes() {
        let teacher = sample();
        let patch = TeacherPatch::try_from(json!({ "age": 22, "title": null })).unwrap();

        let patched = patch.apply(&teacher).unwrap();

        assert_eq!(patched.age, Some(22));
        assert_eq!(patched.title, None);
        assert_eq!(patched.name, teacher.name);
        assert_eq!(patched.lastname, teacher.lastname);
        assert_eq!(patched.is_full_time, teacher.is_full_time);
        assert_eq!(patched.id, teacher.id);
    }

    #[test]
    fn test_patch_strips_id() {
        let teacher = sample();
        let patch = TeacherPatch::try_from(json!({
            "_id": "000000000000000000000000",
            "name": "ann"
        }))
        .unwrap();

        assert_eq!(patch.keys().collect::<Vec<_>>(), vec!["name"]);

        let patched = patch.apply(&teacher).unwrap();
        assert_eq!(patched.id, teacher.id);
        assert_eq!(patched.name.as_deref(), Some("ann"));
    }

    #[test]
    fn test_patch_ignores_unknown_attributes() {
        let teacher = sample();
        let patch = TeacherPatch::try_from(json!({ "shoeSize": 9 })).unwrap();

        assert_eq!(patch.apply(&teacher).unwrap(), teacher);
    }

    #[test]
    fn test_patch_rejects_wrong_type() {
        let teacher = sample();
        let patch = TeacherPatch::try_from(json!({ "age": "old" })).unwrap();

        assert!(matches!(
            patch.apply(&teacher),
            Err(ModelError::InvalidValue(_))
        ));
    }

    #[test]
    fn test_patch_requires_object() {
        assert!(matches!(
            TeacherPatch::try_from(json!([1, 2])),
            Err(ModelError::NotAnObject)
        ));
    }

    #[test]
    fn test_delete_request_id() {
        let req: DeleteRequest =
            serde_json::from_value(json!({ "_id": "5a2f1ef568f053451051ebdb" })).unwrap();
        assert_eq!(req.id_str(), Some("5a2f1ef568f053451051ebdb"));

        let req: DeleteRequest = serde_json::from_value(json!({ "_id": 7 })).unwrap();
        assert_eq!(req.id_str(), None);

        let req: DeleteRequest = serde_json::from_value(json!({})).unwrap();
        assert_eq!(req.id_str(), None);
    }

    #[test]
    fn test_updated_on_accepts_loose_dates() {
        let cases = [
            ("2017-12-03", "2017-12-03T00:00:00+00:00"),
            ("2017-12-03T10:15:30", "2017-12-03T10:15:30+00:00"),
            ("2017-12-03T10:15:30.250", "2017-12-03T10:15:30.250+00:00"),
            ("2017-12-03T10:15:30+02:00", "2017-12-03T08:15:30+00:00"),
            ("2017-12-03T10:15:30Z", "2017-12-03T10:15:30+00:00"),
        ];
        for (input, expected) in cases {
            let new: NewTeacher = serde_json::from_value(json!({ "updatedOn": input })).unwrap();
            assert_eq!(new.updated_on.unwrap().to_rfc3339(), expected, "{input}");
        }

        let update: FullUpdate =
            serde_json::from_value(json!({ "updatedOn": "2017-12-03" })).unwrap();
        assert!(update.updated_on.is_some());

        let cleared: NewTeacher = serde_json::from_value(json!({ "updatedOn": null })).unwrap();
        assert_eq!(cleared.updated_on, None);
    }

    #[test]
    fn test_updated_on_rejects_garbage() {
        assert!(serde_json::from_value::<NewTeacher>(json!({ "updatedOn": "yesterday" })).is_err());
        assert!(serde_json::from_value::<NewTeacher>(json!({ "updatedOn": 1_512_259_200 })).is_err());
    }

    #[test]
    fn test_patch_date_only_updated_on() {
        let patch = TeacherPatch::new(
            json!({ "updatedOn": "2017-12-03" })
                .as_object()
                .unwrap()
                .clone(),
        );
        let patched = patch.apply(&sample()).unwrap();

        let json = serde_json::to_value(&patched).unwrap();
        assert_eq!(json["updatedOn"], "2017-12-03T00:00:00Z");
    }
}
