use entity::employees;
use platform_db::DbPool;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbErr, EntityTrait, NotSet, QueryFilter, QueryOrder, Set,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Employee already exists with given email: {0}")]
    DuplicateEmail(String),
    #[error(transparent)]
    Db(#[from] DbErr),
}

/// Employee fields before storage has assigned an identifier.
#[derive(Clone, Debug)]
pub struct NewEmployee {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// Holder of the one domain rule: emails are unique across employees.
/// Everything else is a pass-through to storage.
#[derive(Clone)]
pub struct EmployeeService {
    pool: DbPool,
}

impl EmployeeService {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Persist a new employee. Fails without writing when the email is
    /// already taken; the unique index on `email` backs this check under
    /// concurrent creates.
    pub async fn create(&self, candidate: NewEmployee) -> Result<employees::Model, ServiceError> {
        if self.find_by_email(&candidate.email).await?.is_some() {
            return Err(ServiceError::DuplicateEmail(candidate.email));
        }
        let row = employees::ActiveModel {
            id: NotSet,
            first_name: Set(candidate.first_name),
            last_name: Set(candidate.last_name),
            email: Set(candidate.email),
        };
        Ok(row.insert(&self.pool).await?)
    }

    /// All employees in insertion order.
    pub async fn list(&self) -> Result<Vec<employees::Model>, ServiceError> {
        Ok(employees::Entity::find()
            .order_by_asc(employees::Column::Id)
            .all(&self.pool)
            .await?)
    }

    /// Absence is a plain `None`, not an error.
    pub async fn find(&self, id: i64) -> Result<Option<employees::Model>, ServiceError> {
        Ok(employees::Entity::find_by_id(id).one(&self.pool).await?)
    }

    /// Overwrite every non-id column at the given identifier. Existence is
    /// the caller's responsibility.
    pub async fn update(&self, employee: employees::Model) -> Result<employees::Model, ServiceError> {
        let row = employees::ActiveModel {
            id: Set(employee.id),
            first_name: Set(employee.first_name),
            last_name: Set(employee.last_name),
            email: Set(employee.email),
        };
        Ok(row.update(&self.pool).await?)
    }

    /// Idempotent: deleting an absent id is a no-op.
    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        employees::Entity::delete_by_id(id).exec(&self.pool).await?;
        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<employees::Model>, DbErr> {
        employees::Entity::find()
            .filter(employees::Column::Email.eq(email))
            .one(&self.pool)
            .await
    }
}
