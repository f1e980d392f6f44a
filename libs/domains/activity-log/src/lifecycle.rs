//! The soft-delete lifecycle shared by every deletable entity.
//!
//! Each soft-deletable table carries a `status` column plus two nullable
//! provenance columns (`deleted_parent_kind`, `deleted_parent_id`). A
//! directly deleted row has status `Deleted` and empty provenance; a row
//! deleted because its parent was deleted records which parent. The undo
//! engine restores a row only from the exact `(status, provenance)` pair
//! its deletion produced.

use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use strum::Display;
use utoipa::ToSchema;
use uuid::Uuid;

/// Lifecycle status of a soft-deletable entity.
///
/// `Draft` is only reachable for units; everything else starts `Active`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    Default,
    DeriveActiveEnum,
    EnumIter,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "entity_status")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EntityStatus {
    #[default]
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "inactive")]
    Inactive,
    #[sea_orm(string_value = "draft")]
    Draft,
    #[sea_orm(string_value = "deleted")]
    Deleted,
}

impl EntityStatus {
    /// Whether a row in this status participates in cascade deletion.
    /// Already-deleted rows keep their original provenance.
    pub fn is_live(&self) -> bool {
        !matches!(self, EntityStatus::Deleted)
    }
}

/// The kinds of parent whose deletion cascades into dependents.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    DeriveActiveEnum,
    EnumIter,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "parent_kind")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ParentKind {
    #[sea_orm(string_value = "course")]
    Course,
    #[sea_orm(string_value = "unit")]
    Unit,
    #[sea_orm(string_value = "group")]
    Group,
    #[sea_orm(string_value = "event")]
    Event,
}

/// Deletion provenance of an entity.
///
/// `None` for live rows. For deleted rows this distinguishes a direct
/// deletion from one cascaded by a parent, which is what lets undo
/// restore exactly the rows a given deletion produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case", tag = "by")]
pub enum DeletedBy {
    None,
    Direct,
    Cascaded {
        parent: ParentKind,
        parent_id: Uuid,
    },
}

impl DeletedBy {
    /// Derive provenance from the persisted columns. Direct deletions
    /// store no parent columns; status disambiguates Direct from None.
    pub fn from_columns(
        status: EntityStatus,
        parent_kind: Option<ParentKind>,
        parent_id: Option<Uuid>,
    ) -> Self {
        if status != EntityStatus::Deleted {
            return DeletedBy::None;
        }
        match (parent_kind, parent_id) {
            (Some(parent), Some(parent_id)) => DeletedBy::Cascaded { parent, parent_id },
            _ => DeletedBy::Direct,
        }
    }

    /// The `(deleted_parent_kind, deleted_parent_id)` column pair.
    pub fn to_columns(&self) -> (Option<ParentKind>, Option<Uuid>) {
        match self {
            DeletedBy::Cascaded { parent, parent_id } => (Some(*parent), Some(*parent_id)),
            _ => (None, None),
        }
    }

    pub fn is_deleted(&self) -> bool {
        !matches!(self, DeletedBy::None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_live_row_has_no_provenance() {
        let by = DeletedBy::from_columns(EntityStatus::Active, Some(ParentKind::Course), None);
        assert_eq!(by, DeletedBy::None);
    }

    #[test]
    fn test_deleted_without_parent_is_direct() {
        let by = DeletedBy::from_columns(EntityStatus::Deleted, None, None);
        assert_eq!(by, DeletedBy::Direct);
    }

    #[test]
    fn test_deleted_with_parent_is_cascaded() {
        let parent_id = Uuid::now_v7();
        let by = DeletedBy::from_columns(
            EntityStatus::Deleted,
            Some(ParentKind::Unit),
            Some(parent_id),
        );
        assert_eq!(
            by,
            DeletedBy::Cascaded {
                parent: ParentKind::Unit,
                parent_id,
            }
        );
    }

    #[test]
    fn test_columns_round_trip() {
        let parent_id = Uuid::now_v7();
        let by = DeletedBy::Cascaded {
            parent: ParentKind::Group,
            parent_id,
        };
        let (kind, id) = by.to_columns();
        assert_eq!(
            DeletedBy::from_columns(EntityStatus::Deleted, kind, id),
            by
        );
    }

    #[test]
    fn test_status_liveness() {
        assert!(EntityStatus::Active.is_live());
        assert!(EntityStatus::Inactive.is_live());
        assert!(EntityStatus::Draft.is_live());
        assert!(!EntityStatus::Deleted.is_live());
    }
}
