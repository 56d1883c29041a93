use async_trait::async_trait;
use tokio_postgres::Row;
use tracing::{debug, instrument};

use crate::auth::PermissionStore;
use crate::domain::{
    DomainError, DomainResult, PermissionRule, Role, SubjectAttributes, ALL_RESOURCES,
};
use crate::postgres::PostgresClient;

/// Permission rule row as stored in `role_permissions`
#[derive(Debug, Clone)]
pub struct RolePermissionRow {
    pub role: String,
    pub resource: String,
    pub actions: serde_json::Value,
}

impl TryFrom<RolePermissionRow> for PermissionRule {
    type Error = DomainError;

    fn try_from(row: RolePermissionRow) -> DomainResult<Self> {
        let role = row.role.parse::<Role>().map_err(|_| {
            DomainError::StoreUnavailable(format!(
                "malformed permission row: unknown role {:?}",
                row.role
            ))
        })?;

        let actions: Vec<String> = serde_json::from_value(row.actions).map_err(|e| {
            DomainError::StoreUnavailable(format!(
                "malformed permission row for {} on {}: {}",
                row.role, row.resource, e
            ))
        })?;

        Ok(PermissionRule::new(role, row.resource, actions))
    }
}

/// PostgreSQL implementation of PermissionStore trait
#[derive(Clone)]
pub struct PostgresPermissionStore {
    client: PostgresClient,
}

impl PostgresPermissionStore {
    pub fn new(client: PostgresClient) -> Self {
        Self { client }
    }
}

fn column<'a, T>(row: &'a Row, name: &str) -> DomainResult<T>
where
    T: tokio_postgres::types::FromSql<'a>,
{
    row.try_get(name).map_err(|e| {
        DomainError::StoreUnavailable(format!("malformed row, column {}: {}", name, e))
    })
}

#[async_trait]
impl PermissionStore for PostgresPermissionStore {
    #[instrument(skip(self))]
    async fn find_rules(&self, role: Role, resource_type: &str) -> DomainResult<Vec<PermissionRule>> {
        let conn = self.client.get_connection().await?;

        let rows = conn
            .query(
                "SELECT role, resource, actions
                 FROM role_permissions
                 WHERE role = $1 AND (resource = $2 OR resource = $3)
                 ORDER BY id",
                &[&role.as_str(), &resource_type, &ALL_RESOURCES],
            )
            .await
            .map_err(|e| DomainError::StoreUnavailable(format!("rule query failed: {}", e)))?;

        let rules = rows
            .iter()
            .map(|row| {
                let row = RolePermissionRow {
                    role: column(row, "role")?,
                    resource: column(row, "resource")?,
                    actions: column(row, "actions")?,
                };
                PermissionRule::try_from(row)
            })
            .collect::<DomainResult<Vec<_>>>()?;

        debug!(count = rules.len(), "fetched permission rules");
        Ok(rules)
    }

    #[instrument(skip(self))]
    async fn find_subject_attributes(&self, subject_id: &str) -> DomainResult<Option<SubjectAttributes>> {
        let conn = self.client.get_connection().await?;

        let row = conn
            .query_opt(
                "SELECT role, COALESCE(is_active, true) AS is_active, state, district, block
                 FROM users
                 WHERE id::text = $1",
                &[&subject_id],
            )
            .await
            .map_err(|e| DomainError::StoreUnavailable(format!("subject query failed: {}", e)))?;

        match row {
            Some(row) => {
                // A NULL role stays empty and is rejected when the subject is built.
                let role: Option<String> = column(&row, "role")?;
                Ok(Some(SubjectAttributes {
                    role: role.unwrap_or_default(),
                    is_active: column(&row, "is_active")?,
                    state: column(&row, "state")?,
                    district: column(&row, "district")?,
                    block: column(&row, "block")?,
                }))
            }
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_row_conversion() {
        let row = RolePermissionRow {
            role: "district_admin".to_string(),
            resource: "claims".to_string(),
            actions: json!(["read", "update"]),
        };
        let rule = PermissionRule::try_from(row).unwrap();
        assert_eq!(rule, PermissionRule::new(Role::DistrictAdmin, "claims", ["read", "update"]));
    }

    #[test]
    fn test_malformed_actions_are_store_errors() {
        let row = RolePermissionRow {
            role: "user".to_string(),
            resource: "claims".to_string(),
            actions: json!({"read": true}),
        };
        assert!(matches!(
            PermissionRule::try_from(row),
            Err(DomainError::StoreUnavailable(_))
        ));
    }

    #[test]
    fn test_unknown_role_row_is_store_error() {
        let row = RolePermissionRow {
            role: "beneficiary".to_string(),
            resource: "personal_claims".to_string(),
            actions: json!(["read"]),
        };
        assert!(matches!(
            PermissionRule::try_from(row),
            Err(DomainError::StoreUnavailable(_))
        ));
    }
}
