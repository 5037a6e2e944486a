//! Account repository.

use domain::identity::suffixed_username;
use domain::models::{Account, Role, UserListQuery, UserStatusFilter};
use shared::pagination::{PageQuery, PageWindow};
use sqlx::PgPool;

use crate::entities::{AccountEntity, AccountWithRoleEntity};

/// Upper bound on username collision attempts; far above anything a real
/// email local part produces.
const MAX_USERNAME_ATTEMPTS: u32 = 1000;

/// Input for creating an account row.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    pub password_hash: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub is_staff: bool,
}

/// Repository for account identities.
#[derive(Clone)]
pub struct AccountRepository {
    pool: PgPool,
}

impl AccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts an account with the exact username given. Fails with a
    /// unique violation if the username or email is taken.
    pub async fn insert(&self, input: &NewAccount) -> Result<Account, sqlx::Error> {
        self.insert_on(&self.pool, input).await
    }

    /// Same as [`insert`](Self::insert) but inside a caller transaction.
    pub async fn insert_in_tx(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        input: &NewAccount,
    ) -> Result<Account, sqlx::Error> {
        self.insert_on(&mut **tx, input).await
    }

    async fn insert_on<'e, E>(&self, executor: E, input: &NewAccount) -> Result<Account, sqlx::Error>
    where
        E: sqlx::Executor<'e, Database = sqlx::Postgres>,
    {
        let entity = sqlx::query_as::<_, AccountEntity>(
            r#"
            INSERT INTO accounts (username, email, password_hash, first_name, last_name, is_staff)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, username, email, password_hash, first_name, last_name,
                      is_staff, is_active, date_joined, last_login
            "#,
        )
        .bind(&input.username)
        .bind(&input.email)
        .bind(&input.password_hash)
        .bind(&input.first_name)
        .bind(&input.last_name)
        .bind(input.is_staff)
        .fetch_one(executor)
        .await?;

        Ok(entity.into())
    }

    /// Finds the first free username derived from `base` by appending an
    /// incrementing numeric suffix on collision.
    pub async fn next_free_username(&self, base: &str) -> Result<String, sqlx::Error> {
        for attempt in 0..MAX_USERNAME_ATTEMPTS {
            let candidate = suffixed_username(base, attempt);
            let taken: bool =
                sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM accounts WHERE username = $1)")
                    .bind(&candidate)
                    .fetch_one(&self.pool)
                    .await?;
            if !taken {
                return Ok(candidate);
            }
        }

        // fall through to the unique constraint
        Ok(suffixed_username(base, MAX_USERNAME_ATTEMPTS))
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Account>, sqlx::Error> {
        let entity = sqlx::query_as::<_, AccountEntity>(
            r#"
            SELECT id, username, email, password_hash, first_name, last_name,
                   is_staff, is_active, date_joined, last_login
            FROM accounts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(entity.map(Into::into))
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<Account>, sqlx::Error> {
        let entity = sqlx::query_as::<_, AccountEntity>(
            r#"
            SELECT id, username, email, password_hash, first_name, last_name,
                   is_staff, is_active, date_joined, last_login
            FROM accounts
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(entity.map(Into::into))
    }

    pub async fn email_exists(&self, email: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM accounts WHERE email = $1)")
            .bind(email)
            .fetch_one(&self.pool)
            .await
    }

    pub async fn username_exists(&self, username: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM accounts WHERE username = $1)")
            .bind(username)
            .fetch_one(&self.pool)
            .await
    }

    pub async fn touch_last_login(&self, id: i64) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE accounts SET last_login = now() WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Deletes an account; candidate/citizen profiles and their children
    /// cascade away with it.
    pub async fn delete(&self, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM accounts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn count(&self) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM accounts")
            .fetch_one(&self.pool)
            .await
    }

    /// Admin user listing with search, role, and status filters. Role is
    /// resolved per row from the profile-existence flags in the same
    /// query, newest accounts first.
    pub async fn list_for_admin(
        &self,
        query: &UserListQuery,
    ) -> Result<(Vec<(Account, Role)>, i64, PageWindow), sqlx::Error> {
        let window = PageQuery { page: query.page, per_page: query.per_page }.resolve(20);

        let mut conditions: Vec<String> = Vec::new();
        let mut param_count = 0;

        let search_pattern = query.search.as_ref().map(|s| format!("%{}%", s.trim()));
        if search_pattern.is_some() {
            param_count += 1;
            conditions.push(format!(
                "(a.username ILIKE ${p} OR a.first_name ILIKE ${p} OR a.last_name ILIKE ${p} OR a.email ILIKE ${p})",
                p = param_count
            ));
        }

        match query.role {
            Some(Role::Candidate) => conditions
                .push("EXISTS(SELECT 1 FROM candidates c WHERE c.account_id = a.id)".to_string()),
            Some(Role::Citizen) => conditions.push(
                "NOT EXISTS(SELECT 1 FROM candidates c WHERE c.account_id = a.id) AND NOT a.is_staff"
                    .to_string(),
            ),
            Some(Role::Admin) => conditions.push("a.is_staff".to_string()),
            None => {}
        }

        match query.status {
            Some(UserStatusFilter::Active) => conditions.push("a.is_active".to_string()),
            Some(UserStatusFilter::Inactive) => conditions.push("NOT a.is_active".to_string()),
            None => {}
        }

        let where_clause = if conditions.is_empty() {
            String::from("TRUE")
        } else {
            conditions.join(" AND ")
        };

        let count_sql = format!("SELECT COUNT(*) FROM accounts a WHERE {}", where_clause);
        let mut count_builder = sqlx::query_scalar::<_, i64>(&count_sql);
        if let Some(ref pattern) = search_pattern {
            count_builder = count_builder.bind(pattern);
        }
        let total = count_builder.fetch_one(&self.pool).await?;

        let list_sql = format!(
            r#"
            SELECT a.id, a.username, a.email, a.password_hash, a.first_name, a.last_name,
                   a.is_staff, a.is_active, a.date_joined, a.last_login,
                   EXISTS(SELECT 1 FROM candidates c WHERE c.account_id = a.id) AS has_candidate_profile,
                   EXISTS(SELECT 1 FROM citizens z WHERE z.account_id = a.id) AS has_citizen_profile
            FROM accounts a
            WHERE {}
            ORDER BY a.date_joined DESC
            LIMIT ${} OFFSET ${}
            "#,
            where_clause,
            param_count + 1,
            param_count + 2
        );

        let mut list_builder = sqlx::query_as::<_, AccountWithRoleEntity>(&list_sql);
        if let Some(ref pattern) = search_pattern {
            list_builder = list_builder.bind(pattern);
        }
        let rows = list_builder
            .bind(window.per_page)
            .bind(window.offset)
            .fetch_all(&self.pool)
            .await?;

        let users = rows
            .into_iter()
            .map(|row| {
                let role = if row.account.is_staff {
                    Role::Admin
                } else if row.has_candidate_profile {
                    Role::Candidate
                } else {
                    Role::Citizen
                };
                (row.account.into(), role)
            })
            .collect();

        Ok((users, total, window))
    }

    /// All accounts newest first, for the users CSV export and backups.
    pub async fn list_all(&self) -> Result<Vec<Account>, sqlx::Error> {
        let entities = sqlx::query_as::<_, AccountEntity>(
            r#"
            SELECT id, username, email, password_hash, first_name, last_name,
                   is_staff, is_active, date_joined, last_login
            FROM accounts
            ORDER BY date_joined DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(entities.into_iter().map(Into::into).collect())
    }
}
