/*
 * Responsibility
 * - 一覧取得の範囲 (全件 / 自分の予約のみ) を型で表す
 * - 自分の予約の範囲は CurrentUser からしか作れない (query の user id で上書きできない)
 */
use crate::api::v1::extractors::{CurrentUser, UserId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingScope(Inner);

#[derive(Debug, Clone, PartialEq, Eq)]
enum Inner {
    All { tour_id: Option<i64> },
    OwnedBy(UserId),
}

impl BookingScope {
    /// Staff listing, optionally narrowed to one tour by the route.
    pub fn all(tour_id: Option<i64>) -> Self {
        Self(Inner::All { tour_id })
    }

    pub fn mine(current_user: &CurrentUser) -> Self {
        Self(Inner::OwnedBy(current_user.id))
    }

    pub fn owner(&self) -> Option<UserId> {
        match &self.0 {
            Inner::OwnedBy(id) => Some(*id),
            Inner::All { .. } => None,
        }
    }

    pub fn tour_id(&self) -> Option<i64> {
        match &self.0 {
            Inner::All { tour_id } => *tour_id,
            Inner::OwnedBy(_) => None,
        }
    }
}
