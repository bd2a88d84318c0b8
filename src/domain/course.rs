use crate::domain::user::{UserSummary, required};
use serde::{Deserialize, Deserializer, Serialize};

pub const TITLE_REQUIRED: &str = "Please provide a title.";
pub const DESCRIPTION_REQUIRED: &str = "Please provide a description.";
pub const OWNER_REQUIRED: &str = "Please provide a User ID.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub estimated_time: Option<String>,
    pub materials_needed: Option<String>,
    pub user_id: i64,
}

impl Course {
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();
        if self.title.trim().is_empty() {
            errors.push(TITLE_REQUIRED.to_string());
        }
        if self.description.trim().is_empty() {
            errors.push(DESCRIPTION_REQUIRED.to_string());
        }
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// A course together with the public summary of its owner, as served by the
/// read endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseDetail {
    #[serde(flatten)]
    pub course: Course,
    #[serde(rename = "User")]
    pub owner: UserSummary,
}

#[derive(Debug, Clone)]
pub struct NewCourse {
    pub title: String,
    pub description: String,
    pub estimated_time: Option<String>,
    pub materials_needed: Option<String>,
    pub user_id: i64,
}

/// Course body for create and update.
///
/// Each field distinguishes three states:
/// - `None`: field absent, leave it alone
/// - `Some(None)`: explicit `null`
/// - `Some(Some(v))`: set to `v`
///
/// Any `userId` in the body is ignored; ownership comes from the
/// authenticated user.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoursePayload {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub title: Option<Option<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub estimated_time: Option<Option<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub materials_needed: Option<Option<String>>,
}

fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl CoursePayload {
    pub fn into_new_course(self, owner_id: i64) -> Result<NewCourse, Vec<String>> {
        let mut errors = Vec::new();
        let title = required(self.title.flatten(), TITLE_REQUIRED, &mut errors);
        let description = required(self.description.flatten(), DESCRIPTION_REQUIRED, &mut errors);

        match (title, description) {
            (Some(title), Some(description)) => Ok(NewCourse {
                title,
                description,
                estimated_time: self.estimated_time.flatten(),
                materials_needed: self.materials_needed.flatten(),
                user_id: owner_id,
            }),
            _ => Err(errors),
        }
    }

    /// Applies the present fields onto `course` and re-validates the result.
    /// `course` is left untouched when validation fails.
    pub fn apply_to(self, course: &Course) -> Result<Course, Vec<String>> {
        let mut updated = course.clone();
        if let Some(title) = self.title {
            updated.title = title.unwrap_or_default();
        }
        if let Some(description) = self.description {
            updated.description = description.unwrap_or_default();
        }
        if let Some(estimated_time) = self.estimated_time {
            updated.estimated_time = estimated_time;
        }
        if let Some(materials_needed) = self.materials_needed {
            updated.materials_needed = materials_needed;
        }
        updated.validate()?;
        Ok(updated)
    }
}
