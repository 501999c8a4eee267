/*
 * Responsibility
 * - Bookings の request/response DTO と一覧の query parameter
 * - 公開 ID は encode 済みの値を返す (内部 ID を漏らさない)
 * - 一覧 query に user id の項目は持たせない (自分の予約の範囲は CurrentUser からのみ決まる)
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::v1::extractors::UserId;
use crate::repos::booking_repo::{BookingSort, ListOptions};

pub const DEFAULT_PAGE_LIMIT: u32 = 100;
pub const MAX_PAGE_LIMIT: u32 = 100;

/// Unknown parameters are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct ListBookingsQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub sort: Option<String>,
    pub paid: Option<bool>,
}

impl ListBookingsQuery {
    pub fn to_options(&self) -> Result<ListOptions, &'static str> {
        let page = self.page.unwrap_or(1);
        if page == 0 {
            return Err("page must be >= 1");
        }
        let limit = self
            .limit
            .unwrap_or(DEFAULT_PAGE_LIMIT)
            .clamp(1, MAX_PAGE_LIMIT);

        let sort = match self.sort.as_deref() {
            None => BookingSort::default(),
            Some("createdAt") => BookingSort::CreatedAtAsc,
            Some("-createdAt") => BookingSort::CreatedAtDesc,
            Some("price") => BookingSort::PriceAsc,
            Some("-price") => BookingSort::PriceDesc,
            Some(_) => return Err("sort must be one of createdAt, -createdAt, price, -price"),
        };

        Ok(ListOptions {
            limit: i64::from(limit),
            offset: (i64::from(page) - 1) * i64::from(limit),
            sort,
            paid: self.paid,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub tour_id: String, // encoded
    pub user_id: UserId,
    pub price: i64,
    #[serde(default = "default_paid")]
    pub paid: bool,
}

fn default_paid() -> bool {
    true
}

impl CreateBookingRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.tour_id.trim().is_empty() {
            return Err("tourId is required");
        }
        if self.price <= 0 {
            return Err("price must be positive");
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateBookingRequest {
    pub price: Option<i64>,
    pub paid: Option<bool>,
}

impl UpdateBookingRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if let Some(price) = self.price
            && price <= 0
        {
            return Err("price must be positive");
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingResponse {
    pub id: String,      // encoded
    pub tour_id: String, // encoded
    pub user_id: UserId,
    pub price: i64,
    pub paid: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct BookingData {
    pub booking: BookingResponse,
}

#[derive(Debug, Serialize)]
pub struct BookingsData {
    pub bookings: Vec<BookingResponse>,
}
