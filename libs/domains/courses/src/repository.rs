use async_trait::async_trait;
use domain_activity_log::{DeletedBy, EntityStatus, ParentKind};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{CourseError, CourseResult};
use crate::models::{
    Course, CourseFilter, CreateCourse, CreateUnit, Unit, UnitFilter, UpdateCourse, UpdateUnit,
};

/// Repository trait for Course persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CourseRepository: Send + Sync {
    async fn create(&self, input: CreateCourse) -> CourseResult<Course>;

    async fn get_by_id(&self, id: Uuid) -> CourseResult<Option<Course>>;

    async fn list(
        &self,
        filter: &CourseFilter,
        rows_per_page: u64,
    ) -> CourseResult<(Vec<Course>, u64)>;

    async fn update(&self, id: Uuid, input: UpdateCourse) -> CourseResult<Course>;

    async fn exists_by_code(&self, code: &str) -> CourseResult<bool>;

    /// Flip status between Active/Inactive. Never touches deleted rows.
    async fn set_status(&self, id: Uuid, status: EntityStatus) -> CourseResult<bool>;

    /// Mark directly deleted. Returns false if already deleted.
    async fn soft_delete(&self, id: Uuid) -> CourseResult<bool>;

    /// Reverse a direct deletion. Returns false unless the row is
    /// exactly (Deleted, Direct).
    async fn restore(&self, id: Uuid) -> CourseResult<bool>;
}

/// Repository trait for Unit persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UnitRepository: Send + Sync {
    async fn create(&self, input: CreateUnit) -> CourseResult<Unit>;

    async fn get_by_id(&self, id: Uuid) -> CourseResult<Option<Unit>>;

    async fn list(&self, filter: &UnitFilter, rows_per_page: u64)
        -> CourseResult<(Vec<Unit>, u64)>;

    async fn update(&self, id: Uuid, input: UpdateUnit) -> CourseResult<Unit>;

    /// Ids of every unit belonging to the course, regardless of status.
    /// The course cascade reaches the sessions and events of all of
    /// them; their own conditional updates skip already-deleted rows.
    async fn ids_by_course(&self, course_id: Uuid) -> CourseResult<Vec<Uuid>>;

    async fn set_status(&self, id: Uuid, status: EntityStatus) -> CourseResult<bool>;

    async fn soft_delete(&self, id: Uuid) -> CourseResult<bool>;

    async fn restore_direct(&self, id: Uuid) -> CourseResult<bool>;

    /// Cascade-delete every live unit of the course. Returns the count.
    async fn cascade_delete_by_course(&self, course_id: Uuid) -> CourseResult<u64>;

    /// Restore every unit cascade-deleted by the course.
    async fn restore_cascaded_by_course(&self, course_id: Uuid) -> CourseResult<u64>;
}

/// In-memory implementation of CourseRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryCourseRepository {
    courses: Arc<RwLock<HashMap<Uuid, Course>>>,
}

impl InMemoryCourseRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CourseRepository for InMemoryCourseRepository {
    async fn create(&self, input: CreateCourse) -> CourseResult<Course> {
        let mut courses = self.courses.write().await;

        if courses
            .values()
            .any(|c| c.code.eq_ignore_ascii_case(&input.code))
        {
            return Err(CourseError::DuplicateCode(input.code));
        }

        let now = chrono::Utc::now();
        let course = Course {
            id: Uuid::now_v7(),
            name: input.name,
            code: input.code,
            description: input.description,
            intake: input.intake,
            status: EntityStatus::Active,
            deleted_by: DeletedBy::None,
            created_at: now,
            updated_at: now,
        };

        courses.insert(course.id, course.clone());
        Ok(course)
    }

    async fn get_by_id(&self, id: Uuid) -> CourseResult<Option<Course>> {
        Ok(self.courses.read().await.get(&id).cloned())
    }

    async fn list(
        &self,
        filter: &CourseFilter,
        rows_per_page: u64,
    ) -> CourseResult<(Vec<Course>, u64)> {
        let courses = self.courses.read().await;

        let mut result: Vec<Course> = courses
            .values()
            .filter(|c| filter.status.is_none_or(|s| c.status == s))
            .filter(|c| filter.intake.is_none_or(|i| c.intake == i))
            .cloned()
            .collect();
        result.sort_by(|a, b| b.id.cmp(&a.id));

        let total = result.len() as u64;
        let offset = (filter.page.max(1) - 1) * rows_per_page;
        let page = result
            .into_iter()
            .skip(offset as usize)
            .take(rows_per_page as usize)
            .collect();

        Ok((page, total))
    }

    async fn update(&self, id: Uuid, input: UpdateCourse) -> CourseResult<Course> {
        let mut courses = self.courses.write().await;
        let course = courses.get_mut(&id).ok_or(CourseError::CourseNotFound(id))?;

        if let Some(name) = input.name {
            course.name = name;
        }
        if let Some(description) = input.description {
            course.description = description;
        }
        course.updated_at = chrono::Utc::now();

        Ok(course.clone())
    }

    async fn exists_by_code(&self, code: &str) -> CourseResult<bool> {
        Ok(self
            .courses
            .read()
            .await
            .values()
            .any(|c| c.code.eq_ignore_ascii_case(code)))
    }

    async fn set_status(&self, id: Uuid, status: EntityStatus) -> CourseResult<bool> {
        let mut courses = self.courses.write().await;
        match courses.get_mut(&id).filter(|c| c.status.is_live()) {
            Some(course) => {
                course.status = status;
                course.updated_at = chrono::Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn soft_delete(&self, id: Uuid) -> CourseResult<bool> {
        let mut courses = self.courses.write().await;
        match courses.get_mut(&id).filter(|c| c.status.is_live()) {
            Some(course) => {
                course.status = EntityStatus::Deleted;
                course.deleted_by = DeletedBy::Direct;
                course.updated_at = chrono::Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn restore(&self, id: Uuid) -> CourseResult<bool> {
        let mut courses = self.courses.write().await;
        match courses
            .get_mut(&id)
            .filter(|c| c.status == EntityStatus::Deleted && c.deleted_by == DeletedBy::Direct)
        {
            Some(course) => {
                course.status = EntityStatus::Active;
                course.deleted_by = DeletedBy::None;
                course.updated_at = chrono::Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// In-memory implementation of UnitRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryUnitRepository {
    units: Arc<RwLock<HashMap<Uuid, Unit>>>,
}

impl InMemoryUnitRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UnitRepository for InMemoryUnitRepository {
    async fn create(&self, input: CreateUnit) -> CourseResult<Unit> {
        let now = chrono::Utc::now();
        let unit = Unit {
            id: Uuid::now_v7(),
            course_id: input.course_id,
            name: input.name,
            kind: input.kind,
            status: input.kind.initial_status(),
            deleted_by: DeletedBy::None,
            created_at: now,
            updated_at: now,
        };

        self.units.write().await.insert(unit.id, unit.clone());
        Ok(unit)
    }

    async fn get_by_id(&self, id: Uuid) -> CourseResult<Option<Unit>> {
        Ok(self.units.read().await.get(&id).cloned())
    }

    async fn list(
        &self,
        filter: &UnitFilter,
        rows_per_page: u64,
    ) -> CourseResult<(Vec<Unit>, u64)> {
        let units = self.units.read().await;

        let mut result: Vec<Unit> = units
            .values()
            .filter(|u| filter.course.is_none_or(|c| u.course_id == c))
            .filter(|u| filter.status.is_none_or(|s| u.status == s))
            .cloned()
            .collect();
        result.sort_by(|a, b| b.id.cmp(&a.id));

        let total = result.len() as u64;
        let offset = (filter.page.max(1) - 1) * rows_per_page;
        let page = result
            .into_iter()
            .skip(offset as usize)
            .take(rows_per_page as usize)
            .collect();

        Ok((page, total))
    }

    async fn update(&self, id: Uuid, input: UpdateUnit) -> CourseResult<Unit> {
        let mut units = self.units.write().await;
        let unit = units.get_mut(&id).ok_or(CourseError::UnitNotFound(id))?;

        if let Some(name) = input.name {
            unit.name = name;
        }
        unit.updated_at = chrono::Utc::now();

        Ok(unit.clone())
    }

    async fn ids_by_course(&self, course_id: Uuid) -> CourseResult<Vec<Uuid>> {
        Ok(self
            .units
            .read()
            .await
            .values()
            .filter(|u| u.course_id == course_id)
            .map(|u| u.id)
            .collect())
    }

    async fn set_status(&self, id: Uuid, status: EntityStatus) -> CourseResult<bool> {
        let mut units = self.units.write().await;
        match units.get_mut(&id).filter(|u| u.status.is_live()) {
            Some(unit) => {
                unit.status = status;
                unit.updated_at = chrono::Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn soft_delete(&self, id: Uuid) -> CourseResult<bool> {
        let mut units = self.units.write().await;
        match units.get_mut(&id).filter(|u| u.status.is_live()) {
            Some(unit) => {
                unit.status = EntityStatus::Deleted;
                unit.deleted_by = DeletedBy::Direct;
                unit.updated_at = chrono::Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn restore_direct(&self, id: Uuid) -> CourseResult<bool> {
        let mut units = self.units.write().await;
        match units
            .get_mut(&id)
            .filter(|u| u.status == EntityStatus::Deleted && u.deleted_by == DeletedBy::Direct)
        {
            Some(unit) => {
                unit.status = EntityStatus::Active;
                unit.deleted_by = DeletedBy::None;
                unit.updated_at = chrono::Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn cascade_delete_by_course(&self, course_id: Uuid) -> CourseResult<u64> {
        let mut units = self.units.write().await;
        let mut affected = 0;

        for unit in units.values_mut() {
            if unit.course_id == course_id && unit.status.is_live() {
                unit.status = EntityStatus::Deleted;
                unit.deleted_by = DeletedBy::Cascaded {
                    parent: ParentKind::Course,
                    parent_id: course_id,
                };
                unit.updated_at = chrono::Utc::now();
                affected += 1;
            }
        }

        Ok(affected)
    }

    async fn restore_cascaded_by_course(&self, course_id: Uuid) -> CourseResult<u64> {
        let mut units = self.units.write().await;
        let expected = DeletedBy::Cascaded {
            parent: ParentKind::Course,
            parent_id: course_id,
        };
        let mut affected = 0;

        for unit in units.values_mut() {
            if unit.status == EntityStatus::Deleted && unit.deleted_by == expected {
                unit.status = EntityStatus::Active;
                unit.deleted_by = DeletedBy::None;
                unit.updated_at = chrono::Utc::now();
                affected += 1;
            }
        }

        Ok(affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UnitKind;

    fn algebra() -> CreateCourse {
        CreateCourse {
            name: "Algebra I".to_string(),
            code: "ALG1".to_string(),
            description: String::new(),
            intake: false,
        }
    }

    #[tokio::test]
    async fn test_create_and_duplicate_code() {
        let repo = InMemoryCourseRepository::new();
        let course = repo.create(algebra()).await.unwrap();
        assert_eq!(course.status, EntityStatus::Active);

        let result = repo.create(algebra()).await;
        assert!(matches!(result, Err(CourseError::DuplicateCode(_))));
    }

    #[tokio::test]
    async fn test_unit_cascade_skips_directly_deleted_units() {
        let courses = InMemoryCourseRepository::new();
        let units = InMemoryUnitRepository::new();
        let course = courses.create(algebra()).await.unwrap();

        let cascade_target = units
            .create(CreateUnit {
                course_id: course.id,
                name: "Limits".to_string(),
                kind: UnitKind::Assessment,
            })
            .await
            .unwrap();
        let independently_deleted = units
            .create(CreateUnit {
                course_id: course.id,
                name: "Sets".to_string(),
                kind: UnitKind::Assessment,
            })
            .await
            .unwrap();
        units.soft_delete(independently_deleted.id).await.unwrap();

        let affected = units.cascade_delete_by_course(course.id).await.unwrap();
        assert_eq!(affected, 1);

        let restored = units.restore_cascaded_by_course(course.id).await.unwrap();
        assert_eq!(restored, 1);

        assert_eq!(
            units
                .get_by_id(cascade_target.id)
                .await
                .unwrap()
                .unwrap()
                .status,
            EntityStatus::Active
        );
        // The direct deletion keeps its own provenance and stays deleted
        assert_eq!(
            units
                .get_by_id(independently_deleted.id)
                .await
                .unwrap()
                .unwrap()
                .deleted_by,
            DeletedBy::Direct
        );
    }

    #[tokio::test]
    async fn test_draft_units_participate_in_cascade() {
        let units = InMemoryUnitRepository::new();
        let course_id = Uuid::now_v7();

        let draft = units
            .create(CreateUnit {
                course_id,
                name: "New lesson".to_string(),
                kind: UnitKind::Lesson,
            })
            .await
            .unwrap();
        assert_eq!(draft.status, EntityStatus::Draft);

        assert_eq!(units.cascade_delete_by_course(course_id).await.unwrap(), 1);
        // Restore brings drafts back as Active, matching the undo contract
        assert_eq!(units.restore_cascaded_by_course(course_id).await.unwrap(), 1);
        assert_eq!(
            units.get_by_id(draft.id).await.unwrap().unwrap().status,
            EntityStatus::Active
        );
    }
}
