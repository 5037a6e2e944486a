//! Candidate repository.
//!
//! List statistics are aggregated in a single query over the whole
//! filtered set before the page is cut, so sorting by rating, votes, or
//! activity is consistent across pages.

use domain::models::{
    Candidate, CandidateListQuery, CandidateSearchHit, CandidateSort, CandidateStats,
    UpdateCandidateInput, CANDIDATES_PER_PAGE,
};
use sqlx::PgPool;

use crate::entities::{CandidateEntity, CandidateWithStatsEntity};

const CANDIDATE_COLUMNS: &str = "c.id, c.account_id, c.name, c.role, c.governorate_id, \
    c.constituency, c.profile_picture, c.banner_image, c.bio, c.electoral_program, \
    c.message_to_voters, c.youtube_video_url, c.facebook_url, c.twitter_url, c.website_url, \
    c.phone_number, c.is_featured, c.election_symbol, c.election_number, c.created_at, c.updated_at";

const STATS_COLUMNS: &str = "\
    (SELECT COUNT(*) FROM votes v WHERE v.candidate_id = c.id) AS total_votes, \
    (SELECT COUNT(*) FROM votes v WHERE v.candidate_id = c.id AND v.vote_type = 'approve') AS approve_votes, \
    (SELECT COUNT(*) FROM votes v WHERE v.candidate_id = c.id AND v.vote_type = 'disapprove') AS disapprove_votes, \
    COALESCE((SELECT AVG(r.stars)::float8 FROM ratings r WHERE r.candidate_id = c.id), 0) AS avg_rating, \
    (SELECT COUNT(*) FROM ratings r WHERE r.candidate_id = c.id) AS total_ratings, \
    (SELECT COUNT(*) FROM messages m WHERE m.candidate_id = c.id) AS total_messages";

/// Helper building the WHERE clause for candidate list filters.
struct CandidateFilter {
    conditions: Vec<String>,
    search_pattern: Option<String>,
    governorate_id: Option<i32>,
    param_count: i32,
}

impl CandidateFilter {
    fn build(query: &CandidateListQuery) -> Self {
        let mut conditions = Vec::new();
        let mut param_count = 0;

        let search_pattern = query
            .search
            .as_ref()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(|s| format!("%{}%", s));
        if search_pattern.is_some() {
            param_count += 1;
            conditions.push(format!(
                "(c.name ILIKE ${p} OR c.constituency ILIKE ${p} OR c.bio ILIKE ${p} OR c.electoral_program ILIKE ${p})",
                p = param_count
            ));
        }

        if query.governorate_id.is_some() {
            param_count += 1;
            conditions.push(format!("c.governorate_id = ${}", param_count));
        }

        Self {
            conditions,
            search_pattern,
            governorate_id: query.governorate_id,
            param_count,
        }
    }

    fn where_clause(&self) -> String {
        if self.conditions.is_empty() {
            String::from("TRUE")
        } else {
            self.conditions.join(" AND ")
        }
    }
}

macro_rules! bind_candidate_filters {
    ($builder:expr, $filter:expr) => {{
        let mut b = $builder;
        if let Some(ref pattern) = $filter.search_pattern {
            b = b.bind(pattern);
        }
        if let Some(governorate_id) = $filter.governorate_id {
            b = b.bind(governorate_id);
        }
        b
    }};
}

fn order_clause(sort: CandidateSort) -> &'static str {
    match sort {
        CandidateSort::Name => "t.name ASC",
        CandidateSort::Rating => "t.avg_rating DESC, t.name ASC",
        CandidateSort::Votes => "t.total_votes DESC, t.name ASC",
        CandidateSort::Activity => {
            "(t.total_votes + t.total_ratings + t.total_messages) DESC, t.name ASC"
        }
    }
}

/// Input for creating a candidate profile.
#[derive(Debug, Clone)]
pub struct NewCandidate {
    pub account_id: i64,
    pub name: String,
    pub governorate_id: i32,
    pub constituency: String,
    pub election_number: String,
    pub election_symbol: String,
}

/// Repository for candidate profiles.
#[derive(Clone)]
pub struct CandidateRepository {
    pool: PgPool,
}

impl CandidateRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert_in_tx(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        input: &NewCandidate,
    ) -> Result<Candidate, sqlx::Error> {
        let sql = format!(
            r#"
            INSERT INTO candidates AS c
                (account_id, name, governorate_id, constituency, election_number, election_symbol)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            CANDIDATE_COLUMNS
        );

        let entity = sqlx::query_as::<_, CandidateEntity>(&sql)
            .bind(input.account_id)
            .bind(&input.name)
            .bind(input.governorate_id)
            .bind(&input.constituency)
            .bind(&input.election_number)
            .bind(&input.election_symbol)
            .fetch_one(&mut **tx)
            .await?;

        Ok(entity.into())
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Candidate>, sqlx::Error> {
        let sql = format!("SELECT {} FROM candidates c WHERE c.id = $1", CANDIDATE_COLUMNS);
        let entity = sqlx::query_as::<_, CandidateEntity>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(entity.map(Into::into))
    }

    pub async fn find_by_account(&self, account_id: i64) -> Result<Option<Candidate>, sqlx::Error> {
        let sql = format!(
            "SELECT {} FROM candidates c WHERE c.account_id = $1",
            CANDIDATE_COLUMNS
        );
        let entity = sqlx::query_as::<_, CandidateEntity>(&sql)
            .bind(account_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(entity.map(Into::into))
    }

    /// Lists candidates with statistics, filtered, sorted, and paged.
    /// Returns the page rows and the total of the filtered set.
    pub async fn list_with_stats(
        &self,
        query: &CandidateListQuery,
    ) -> Result<(Vec<(Candidate, CandidateStats)>, i64), sqlx::Error> {
        let filter = CandidateFilter::build(query);
        let where_clause = filter.where_clause();

        let count_sql = format!("SELECT COUNT(*) FROM candidates c WHERE {}", where_clause);
        let count_builder = sqlx::query_scalar::<_, i64>(&count_sql);
        let count_builder = bind_candidate_filters!(count_builder, filter);
        let total = count_builder.fetch_one(&self.pool).await?;

        let page = query.page.unwrap_or(1).max(1);
        let per_page = query.per_page.unwrap_or(CANDIDATES_PER_PAGE).clamp(1, 100);
        let offset = (page - 1) * per_page;

        let list_sql = format!(
            r#"
            SELECT * FROM (
                SELECT {columns}, {stats}
                FROM candidates c
                WHERE {where_clause}
            ) t
            ORDER BY {order}
            LIMIT ${limit_p} OFFSET ${offset_p}
            "#,
            columns = CANDIDATE_COLUMNS,
            stats = STATS_COLUMNS,
            where_clause = where_clause,
            order = order_clause(query.sort),
            limit_p = filter.param_count + 1,
            offset_p = filter.param_count + 2,
        );

        let list_builder = sqlx::query_as::<_, CandidateWithStatsEntity>(&list_sql);
        let list_builder = bind_candidate_filters!(list_builder, filter);
        let rows = list_builder
            .bind(per_page)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok((rows.into_iter().map(|r| r.into_parts()).collect(), total))
    }

    /// One candidate with statistics, for the detail page.
    pub async fn find_with_stats(
        &self,
        id: i64,
    ) -> Result<Option<(Candidate, CandidateStats)>, sqlx::Error> {
        let sql = format!(
            "SELECT {}, {} FROM candidates c WHERE c.id = $1",
            CANDIDATE_COLUMNS, STATS_COLUMNS
        );
        let row = sqlx::query_as::<_, CandidateWithStatsEntity>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|r| r.into_parts()))
    }

    /// Featured candidates for the landing page, name order.
    pub async fn featured(&self, limit: i64) -> Result<Vec<Candidate>, sqlx::Error> {
        let sql = format!(
            "SELECT {} FROM candidates c WHERE c.is_featured ORDER BY c.name LIMIT $1",
            CANDIDATE_COLUMNS
        );
        let entities = sqlx::query_as::<_, CandidateEntity>(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(entities.into_iter().map(Into::into).collect())
    }

    /// Autocomplete over name and constituency.
    pub async fn search_hits(
        &self,
        query: &str,
        governorate_id: Option<i32>,
        limit: i64,
    ) -> Result<Vec<CandidateSearchHit>, sqlx::Error> {
        let pattern = format!("%{}%", query.trim());

        let sql = format!(
            r#"
            SELECT {} FROM candidates c
            WHERE (c.name ILIKE $1 OR c.constituency ILIKE $1)
              AND ($2::int IS NULL OR c.governorate_id = $2)
            ORDER BY c.name
            LIMIT $3
            "#,
            CANDIDATE_COLUMNS
        );

        let entities = sqlx::query_as::<_, CandidateEntity>(&sql)
            .bind(&pattern)
            .bind(governorate_id)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(entities
            .into_iter()
            .map(|e| {
                let candidate: Candidate = e.into();
                CandidateSearchHit {
                    id: candidate.id,
                    governorate_name: candidate.governorate_name(),
                    name: candidate.name,
                    constituency: candidate.constituency,
                }
            })
            .collect())
    }

    /// Applies a partial profile update, leaving absent fields unchanged.
    pub async fn update_profile(
        &self,
        id: i64,
        input: &UpdateCandidateInput,
    ) -> Result<Option<Candidate>, sqlx::Error> {
        let sql = format!(
            r#"
            UPDATE candidates AS c SET
                name = COALESCE($2, name),
                constituency = COALESCE($3, constituency),
                bio = COALESCE($4, bio),
                electoral_program = COALESCE($5, electoral_program),
                message_to_voters = COALESCE($6, message_to_voters),
                youtube_video_url = COALESCE($7, youtube_video_url),
                facebook_url = COALESCE($8, facebook_url),
                twitter_url = COALESCE($9, twitter_url),
                website_url = COALESCE($10, website_url),
                phone_number = COALESCE($11, phone_number),
                profile_picture = COALESCE($12, profile_picture),
                banner_image = COALESCE($13, banner_image),
                election_symbol = COALESCE($14, election_symbol),
                election_number = COALESCE($15, election_number),
                updated_at = now()
            WHERE id = $1
            RETURNING {}
            "#,
            CANDIDATE_COLUMNS
        );

        let entity = sqlx::query_as::<_, CandidateEntity>(&sql)
            .bind(id)
            .bind(&input.name)
            .bind(&input.constituency)
            .bind(&input.bio)
            .bind(&input.electoral_program)
            .bind(&input.message_to_voters)
            .bind(&input.youtube_video_url)
            .bind(&input.facebook_url)
            .bind(&input.twitter_url)
            .bind(&input.website_url)
            .bind(&input.phone_number)
            .bind(&input.profile_picture)
            .bind(&input.banner_image)
            .bind(&input.election_symbol)
            .bind(&input.election_number)
            .fetch_optional(&self.pool)
            .await?;

        Ok(entity.map(Into::into))
    }

    pub async fn count(&self) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM candidates")
            .fetch_one(&self.pool)
            .await
    }

    /// All candidates in name order, for admin management and backups.
    pub async fn list_all(&self) -> Result<Vec<Candidate>, sqlx::Error> {
        let sql = format!("SELECT {} FROM candidates c ORDER BY c.name", CANDIDATE_COLUMNS);
        let entities = sqlx::query_as::<_, CandidateEntity>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(entities.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_no_params() {
        let filter = CandidateFilter::build(&CandidateListQuery::default());
        assert_eq!(filter.where_clause(), "TRUE");
        assert_eq!(filter.param_count, 0);
    }

    #[test]
    fn test_filter_search_pattern_wraps_wildcards() {
        let query = CandidateListQuery {
            search: Some(" أحمد ".to_string()),
            ..Default::default()
        };
        let filter = CandidateFilter::build(&query);
        assert_eq!(filter.search_pattern.as_deref(), Some("%أحمد%"));
        assert!(filter.where_clause().contains("c.name ILIKE $1"));
        assert!(filter.where_clause().contains("c.electoral_program ILIKE $1"));
    }

    #[test]
    fn test_filter_blank_search_ignored() {
        let query = CandidateListQuery {
            search: Some("   ".to_string()),
            ..Default::default()
        };
        let filter = CandidateFilter::build(&query);
        assert!(filter.search_pattern.is_none());
        assert_eq!(filter.where_clause(), "TRUE");
    }

    #[test]
    fn test_filter_governorate_param_position() {
        let query = CandidateListQuery {
            search: Some("نصر".to_string()),
            governorate_id: Some(4),
            ..Default::default()
        };
        let filter = CandidateFilter::build(&query);
        assert_eq!(filter.param_count, 2);
        assert!(filter.where_clause().contains("c.governorate_id = $2"));
    }

    #[test]
    fn test_order_clauses() {
        assert_eq!(order_clause(CandidateSort::Name), "t.name ASC");
        assert!(order_clause(CandidateSort::Rating).starts_with("t.avg_rating DESC"));
        assert!(order_clause(CandidateSort::Votes).starts_with("t.total_votes DESC"));
        assert!(order_clause(CandidateSort::Activity).contains("t.total_messages"));
    }
}
