//! Repository for the `projects` table and its tag / picture children.

use crowdfund_core::search::like_pattern;
use crowdfund_core::types::{Amount, DbId};
use sqlx::PgPool;

use crate::models::project::{
    AdminProjectFilter, CreateProject, Project, ProjectPicture, ProjectWithStats,
    PublicProjectFilter, UpdateProject,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, creator_id, title, details, category_id, total_target, \
                       start_time, end_time, is_cancelled, is_featured, created_at, updated_at";

/// Project columns plus rating and donation aggregates. Callers append
/// `WHERE` / `ORDER BY` / `LIMIT` clauses.
const STATS_SELECT: &str = "SELECT \
        p.id, p.creator_id, p.title, p.details, p.category_id, p.total_target, \
        p.start_time, p.end_time, p.is_cancelled, p.is_featured, p.created_at, p.updated_at, \
        r.avg_rating, \
        COALESCE(r.rating_count, 0) AS rating_count, \
        COALESCE(d.total_donated, 0) AS total_donated \
     FROM projects p \
     LEFT JOIN ( \
        SELECT project_id, AVG(rating)::float8 AS avg_rating, COUNT(*) AS rating_count \
        FROM project_ratings GROUP BY project_id \
     ) r ON r.project_id = p.id \
     LEFT JOIN ( \
        SELECT project_id, SUM(amount) AS total_donated \
        FROM donations GROUP BY project_id \
     ) d ON d.project_id = p.id";

const PICTURE_COLUMNS: &str = "id, project_id, image_path, is_featured, created_at";

/// Build the `WHERE` clause for the public list. `$1` is always `now`.
///
/// Returns the clause and the next free bind index.
fn public_where(filter: &PublicProjectFilter) -> (String, u32) {
    let mut conditions = vec![
        "p.is_cancelled = false".to_string(),
        "p.end_time > $1".to_string(),
    ];
    let mut bind_idx = 2u32;

    if filter.category_slug.is_some() {
        conditions.push(format!(
            "p.category_id = (SELECT id FROM categories WHERE slug = ${bind_idx})"
        ));
        bind_idx += 1;
    }
    if filter.search.is_some() {
        conditions.push(format!(
            "(p.title ILIKE ${bind_idx} OR EXISTS ( \
                SELECT 1 FROM project_tags pt JOIN tags t ON t.id = pt.tag_id \
                WHERE pt.project_id = p.id AND t.name ILIKE ${bind_idx}))"
        ));
        bind_idx += 1;
    }

    (format!("WHERE {}", conditions.join(" AND ")), bind_idx)
}

/// Build the `WHERE` clause for the admin list.
fn admin_where(filter: &AdminProjectFilter) -> (String, u32) {
    let mut conditions = Vec::new();
    let mut bind_idx = 1u32;

    if filter.category_id.is_some() {
        conditions.push(format!("p.category_id = ${bind_idx}"));
        bind_idx += 1;
    }
    if filter.is_featured.is_some() {
        conditions.push(format!("p.is_featured = ${bind_idx}"));
        bind_idx += 1;
    }
    if filter.is_cancelled.is_some() {
        conditions.push(format!("p.is_cancelled = ${bind_idx}"));
        bind_idx += 1;
    }
    if filter.search.is_some() {
        conditions.push(format!(
            "(p.title ILIKE ${bind_idx} OR p.details ILIKE ${bind_idx})"
        ));
        bind_idx += 1;
    }

    let clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };
    (clause, bind_idx)
}

/// Provides CRUD and listing operations for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a project with its tags and pictures in one transaction.
    ///
    /// The first picture is marked as featured.
    pub async fn create(
        pool: &PgPool,
        creator_id: DbId,
        input: &CreateProject,
    ) -> Result<Project, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO projects
                (creator_id, title, details, category_id, total_target, start_time, end_time)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        let project = sqlx::query_as::<_, Project>(&query)
            .bind(creator_id)
            .bind(&input.title)
            .bind(&input.details)
            .bind(input.category_id)
            .bind(input.total_target)
            .bind(input.start_time)
            .bind(input.end_time)
            .fetch_one(&mut *tx)
            .await?;

        if !input.tag_ids.is_empty() {
            sqlx::query(
                "INSERT INTO project_tags (project_id, tag_id)
                 SELECT $1, UNNEST($2::bigint[])
                 ON CONFLICT DO NOTHING",
            )
            .bind(project.id)
            .bind(&input.tag_ids)
            .execute(&mut *tx)
            .await?;
        }

        if !input.pictures.is_empty() {
            sqlx::query(
                "INSERT INTO project_pictures (project_id, image_path, is_featured)
                 SELECT $1, t.path, t.ord = 1
                 FROM UNNEST($2::text[]) WITH ORDINALITY AS t(path, ord)",
            )
            .bind(project.id)
            .bind(&input.pictures)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(project)
    }

    /// Find a project by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Update a project. Only non-`None` fields in `input` are applied;
    /// `tag_ids`, when given, replaces the whole tag set.
    ///
    /// Returns `None` if no row with the given `id` exists or the project
    /// is cancelled. The cancelled check is part of the `UPDATE`, so a cancel
    /// committed after the caller's read still wins.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProject,
    ) -> Result<Option<Project>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE projects SET
                title = COALESCE($2, title),
                details = COALESCE($3, details),
                category_id = COALESCE($4, category_id),
                total_target = COALESCE($5, total_target),
                start_time = COALESCE($6, start_time),
                end_time = COALESCE($7, end_time)
             WHERE id = $1 AND is_cancelled = false
             RETURNING {COLUMNS}"
        );
        let project = sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.details)
            .bind(input.category_id)
            .bind(input.total_target)
            .bind(input.start_time)
            .bind(input.end_time)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(project) = project else {
            return Ok(None);
        };

        if let Some(ref tag_ids) = input.tag_ids {
            sqlx::query("DELETE FROM project_tags WHERE project_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            sqlx::query(
                "INSERT INTO project_tags (project_id, tag_id)
                 SELECT $1, UNNEST($2::bigint[])
                 ON CONFLICT DO NOTHING",
            )
            .bind(id)
            .bind(tag_ids)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(Some(project))
    }

    /// Set `is_cancelled` only if the project is still active and its
    /// donations are below `threshold_percent` of the target. Returns `true`
    /// if the row changed.
    ///
    /// The project row is locked `FOR UPDATE` before donations are summed,
    /// so an in-flight donation (which holds the row `FOR SHARE`) is either
    /// committed and counted, or waits and then sees the cancel.
    pub async fn mark_cancelled_below_threshold(
        pool: &PgPool,
        id: DbId,
        threshold_percent: i64,
    ) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let locked: Option<(bool, Amount)> = sqlx::query_as(
            "SELECT is_cancelled, total_target FROM projects WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
        let Some((false, target)) = locked else {
            return Ok(false);
        };

        // New statement, new snapshot: sees donations committed while waiting.
        let below: bool = sqlx::query_scalar(
            "SELECT COALESCE(SUM(amount), 0) * 100 < $2::numeric * $3
             FROM donations WHERE project_id = $1",
        )
        .bind(id)
        .bind(target)
        .bind(threshold_percent)
        .fetch_one(&mut *tx)
        .await?;
        if !below {
            return Ok(false);
        }

        sqlx::query("UPDATE projects SET is_cancelled = true WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(true)
    }

    /// Set the featured flag. Returns `None` if the project does not exist.
    pub async fn set_featured(
        pool: &PgPool,
        id: DbId,
        is_featured: bool,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query =
            format!("UPDATE projects SET is_featured = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(is_featured)
            .fetch_optional(pool)
            .await
    }

    /// Open projects (not cancelled, deadline in the future) with rating and
    /// donation aggregates, newest first.
    pub async fn list_public(
        pool: &PgPool,
        filter: &PublicProjectFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ProjectWithStats>, sqlx::Error> {
        let (where_clause, bind_idx) = public_where(filter);
        let query = format!(
            "{STATS_SELECT} {where_clause} \
             ORDER BY p.created_at DESC, p.id DESC \
             LIMIT ${bind_idx} OFFSET ${next_idx}",
            next_idx = bind_idx + 1,
        );

        let mut q = sqlx::query_as::<_, ProjectWithStats>(&query).bind(filter.now);
        if let Some(ref slug) = filter.category_slug {
            q = q.bind(slug);
        }
        if let Some(ref term) = filter.search {
            q = q.bind(like_pattern(term));
        }
        q.bind(limit).bind(offset).fetch_all(pool).await
    }

    /// Total number of rows [`Self::list_public`] would page through.
    pub async fn count_public(
        pool: &PgPool,
        filter: &PublicProjectFilter,
    ) -> Result<i64, sqlx::Error> {
        let (where_clause, _) = public_where(filter);
        let query = format!("SELECT COUNT(*) FROM projects p {where_clause}");

        let mut q = sqlx::query_scalar::<_, i64>(&query).bind(filter.now);
        if let Some(ref slug) = filter.category_slug {
            q = q.bind(slug);
        }
        if let Some(ref term) = filter.search {
            q = q.bind(like_pattern(term));
        }
        q.fetch_one(pool).await
    }

    /// Every project, including cancelled and expired ones, filtered for
    /// moderation.
    pub async fn list_admin(
        pool: &PgPool,
        filter: &AdminProjectFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ProjectWithStats>, sqlx::Error> {
        let (where_clause, bind_idx) = admin_where(filter);
        let query = format!(
            "{STATS_SELECT} {where_clause} \
             ORDER BY p.created_at DESC, p.id DESC \
             LIMIT ${bind_idx} OFFSET ${next_idx}",
            next_idx = bind_idx + 1,
        );

        let mut q = sqlx::query_as::<_, ProjectWithStats>(&query);
        if let Some(category_id) = filter.category_id {
            q = q.bind(category_id);
        }
        if let Some(is_featured) = filter.is_featured {
            q = q.bind(is_featured);
        }
        if let Some(is_cancelled) = filter.is_cancelled {
            q = q.bind(is_cancelled);
        }
        if let Some(ref term) = filter.search {
            q = q.bind(like_pattern(term));
        }
        q.bind(limit).bind(offset).fetch_all(pool).await
    }

    /// Other projects sharing at least one tag with `id`, newest first.
    pub async fn similar_by_tags(
        pool: &PgPool,
        id: DbId,
        limit: i64,
    ) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects p
             WHERE p.id <> $1
               AND EXISTS (
                   SELECT 1 FROM project_tags mine
                   JOIN project_tags theirs ON theirs.tag_id = mine.tag_id
                   WHERE mine.project_id = $1 AND theirs.project_id = p.id
               )
             ORDER BY p.created_at DESC, p.id DESC
             LIMIT $2"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Pictures for a project, featured first.
    pub async fn pictures(pool: &PgPool, project_id: DbId) -> Result<Vec<ProjectPicture>, sqlx::Error> {
        let query = format!(
            "SELECT {PICTURE_COLUMNS} FROM project_pictures
             WHERE project_id = $1
             ORDER BY is_featured DESC, id"
        );
        sqlx::query_as::<_, ProjectPicture>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }
}
