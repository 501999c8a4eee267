/*
 * Responsibility
 * - bookings CRUD
 * - 一覧は BookingScope (全件 / 自分の予約) で WHERE 句を組み立てる
 * - tourId / userId の FK (CASCADE) 前提で削除挙動を意識
 */
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::api::v1::extractors::UserId;
use crate::policy::{BookingScope, Owned};
use crate::repos::error::RepoError;

const COLUMNS: &str =
    r#""bookingId", "tourId", "userId", price, paid, "createdAt", "updatedAt""#;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BookingRow {
    #[sqlx(rename = "bookingId")]
    pub booking_id: i64,

    #[sqlx(rename = "tourId")]
    pub tour_id: i64,

    #[sqlx(rename = "userId")]
    pub user_id: Uuid,

    pub price: i64,
    pub paid: bool,

    #[sqlx(rename = "createdAt")]
    pub created_at: DateTime<Utc>,

    #[sqlx(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl Owned for BookingRow {
    const RESOURCE: &'static str = "booking";

    fn owner_id(&self) -> UserId {
        UserId::from(self.user_id)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BookingSort {
    CreatedAtAsc,
    #[default]
    CreatedAtDesc,
    PriceAsc,
    PriceDesc,
}

impl BookingSort {
    fn order_by(&self) -> &'static str {
        // "bookingId" as tie-breaker keeps pagination stable
        match self {
            BookingSort::CreatedAtAsc => r#""createdAt" ASC, "bookingId" ASC"#,
            BookingSort::CreatedAtDesc => r#""createdAt" DESC, "bookingId" DESC"#,
            BookingSort::PriceAsc => r#"price ASC, "bookingId" ASC"#,
            BookingSort::PriceDesc => r#"price DESC, "bookingId" DESC"#,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListOptions {
    pub limit: i64,
    pub offset: i64,
    pub sort: BookingSort,
    pub paid: Option<bool>,
}

fn list_query(scope: &BookingScope, opts: &ListOptions) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!("SELECT {COLUMNS} FROM bookings WHERE true"));

    if let Some(owner) = scope.owner() {
        qb.push(r#" AND "userId" = "#).push_bind(owner.as_uuid());
    }
    if let Some(tour_id) = scope.tour_id() {
        qb.push(r#" AND "tourId" = "#).push_bind(tour_id);
    }
    if let Some(paid) = opts.paid {
        qb.push(" AND paid = ").push_bind(paid);
    }

    qb.push(" ORDER BY ")
        .push(opts.sort.order_by())
        .push(" LIMIT ")
        .push_bind(opts.limit)
        .push(" OFFSET ")
        .push_bind(opts.offset);

    qb
}

pub async fn list(
    db: &PgPool,
    scope: &BookingScope,
    opts: &ListOptions,
) -> Result<Vec<BookingRow>, RepoError> {
    let mut qb = list_query(scope, opts);
    let rows = qb.build_query_as::<BookingRow>().fetch_all(db).await?;

    Ok(rows)
}

pub async fn get(db: &PgPool, booking_id: i64) -> Result<Option<BookingRow>, RepoError> {
    let row = sqlx::query_as::<_, BookingRow>(&format!(
        r#"SELECT {COLUMNS} FROM bookings WHERE "bookingId" = $1"#
    ))
    .bind(booking_id)
    .fetch_optional(db)
    .await?;

    Ok(row)
}

pub async fn create(
    db: &PgPool,
    tour_id: i64,
    user_id: Uuid,
    price: i64,
    paid: bool,
) -> Result<BookingRow, RepoError> {
    let row = sqlx::query_as::<_, BookingRow>(&format!(
        r#"
        INSERT INTO bookings ("tourId", "userId", price, paid)
        VALUES ($1, $2, $3, $4)
        RETURNING {COLUMNS}
        "#
    ))
    .bind(tour_id)
    .bind(user_id)
    .bind(price)
    .bind(paid)
    .fetch_one(db)
    .await
    .map_err(RepoError::from_sqlx)?;

    Ok(row)
}

pub async fn update(
    db: &PgPool,
    booking_id: i64,
    price: Option<i64>,
    paid: Option<bool>,
) -> Result<Option<BookingRow>, RepoError> {
    let row = sqlx::query_as::<_, BookingRow>(&format!(
        r#"
        UPDATE bookings
        SET
            price = COALESCE($2, price),
            paid = COALESCE($3, paid),
            "updatedAt" = now()
        WHERE "bookingId" = $1
        RETURNING {COLUMNS}
        "#
    ))
    .bind(booking_id)
    .bind(price)
    .bind(paid)
    .fetch_optional(db)
    .await?;

    Ok(row)
}

pub async fn delete(db: &PgPool, booking_id: i64) -> Result<bool, RepoError> {
    let result = sqlx::query(
        r#"
        DELETE FROM bookings
        WHERE "bookingId" = $1
        "#,
    )
    .bind(booking_id)
    .execute(db)
    .await?;

    Ok(result.rows_affected() > 0)
}
