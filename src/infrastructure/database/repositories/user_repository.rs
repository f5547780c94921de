use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Cond, Expr, Query};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use tracing::debug;

use crate::domain::{
    DomainError, DomainResult, NewUser, User, UserChanges, UserRepositoryInterface, UserRole,
};
use crate::infrastructure::database::entities::user;
use crate::support::InfraError;

pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn entity_role_to_domain(role: user::UserRole) -> UserRole {
    match role {
        user::UserRole::Admin => UserRole::Admin,
        user::UserRole::User => UserRole::User,
    }
}

fn user_model_to_domain(model: user::Model) -> User {
    User {
        id: model.id,
        email: model.email,
        name: model.name,
        password_hash: model.password_hash,
        role: entity_role_to_domain(model.role),
        last_login_at: model.last_login_at,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

fn db_err(e: sea_orm::DbErr) -> DomainError {
    InfraError::from(e).into()
}

fn unique_or_db_err(e: sea_orm::DbErr) -> DomainError {
    if e.to_string().contains("UNIQUE") || e.to_string().contains("duplicate") {
        DomainError::Conflict("Email already exists".to_string())
    } else {
        db_err(e)
    }
}

// ── Repository implementation ───────────────────────────────────

#[async_trait]
impl UserRepositoryInterface for UserRepository {
    /// Single `INSERT ... SELECT` whose role is `CASE WHEN EXISTS (SELECT 1
    /// FROM users) THEN 'USER' ELSE 'ADMIN' END`, so the emptiness check and
    /// the insert are one statement.
    async fn create_user(&self, new_user: NewUser) -> DomainResult<User> {
        let now = Utc::now();
        let id = uuid::Uuid::new_v4().to_string();

        let any_user = Query::select()
            .expr(Expr::val(1))
            .from(user::Entity)
            .to_owned();

        let role = Expr::case(Cond::all().add(Expr::exists(any_user)), Expr::val("USER"))
            .finally(Expr::val("ADMIN"));

        let values = Query::select()
            .expr(Expr::val(id.clone()))
            .expr(Expr::val(new_user.email))
            .expr(Expr::val(new_user.name))
            .expr(Expr::val(new_user.password_hash))
            .expr(role)
            .expr(Expr::val(now))
            .expr(Expr::val(now))
            .expr(Expr::val(now))
            .to_owned();

        let insert = Query::insert()
            .into_table(user::Entity)
            .columns([
                user::Column::Id,
                user::Column::Email,
                user::Column::Name,
                user::Column::PasswordHash,
                user::Column::Role,
                user::Column::LastLoginAt,
                user::Column::CreatedAt,
                user::Column::UpdatedAt,
            ])
            .select_from(values)
            .map_err(|e| DomainError::Storage(format!("Failed to build insert: {}", e)))?
            .to_owned();

        let stmt = self.db.get_database_backend().build(&insert);
        self.db.execute(stmt).await.map_err(unique_or_db_err)?;

        let created = user::Entity::find_by_id(id.clone())
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or_else(|| {
                DomainError::Storage("User created but could not be retrieved".into())
            })?;

        debug!(user_id = %id, role = ?created.role, "User row inserted");
        Ok(user_model_to_domain(created))
    }

    async fn count_users(&self) -> DomainResult<u64> {
        user::Entity::find().count(&self.db).await.map_err(db_err)
    }

    async fn get_user_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        let model = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(model.map(user_model_to_domain))
    }

    async fn get_user_by_id(&self, id: &str) -> DomainResult<Option<User>> {
        let model = user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(model.map(user_model_to_domain))
    }

    async fn list_admins(&self) -> DomainResult<Vec<User>> {
        let models = user::Entity::find()
            .filter(user::Column::Role.eq(user::UserRole::Admin))
            .order_by_asc(user::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(models.into_iter().map(user_model_to_domain).collect())
    }

    async fn update_user(&self, id: &str, changes: UserChanges) -> DomainResult<Option<User>> {
        let existing = user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        let Some(existing) = existing else {
            return Ok(None);
        };

        let mut active: user::ActiveModel = existing.into();

        if let Some(email) = changes.email {
            active.email = Set(email);
        }
        if let Some(name) = changes.name {
            active.name = Set(name);
        }
        if let Some(hash) = changes.password_hash {
            active.password_hash = Set(Some(hash));
        }

        active.updated_at = Set(Utc::now());

        let updated = active.update(&self.db).await.map_err(unique_or_db_err)?;

        Ok(Some(user_model_to_domain(updated)))
    }

    async fn touch_last_login(&self, id: &str, at: DateTime<Utc>) -> DomainResult<()> {
        let result = user::Entity::update_many()
            .col_expr(user::Column::LastLoginAt, Expr::value(at))
            .filter(user::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        if result.rows_affected == 0 {
            return Err(DomainError::user_not_found("id", id));
        }

        Ok(())
    }
}
