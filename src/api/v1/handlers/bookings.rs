/*
 * Responsibility
 * - /bookings 系 handler
 * - ロール制限はルート側 (restrict)、単一取得の所有者チェックはここ (fetch の後)
 * - CurrentUser は extractor で明示的に受け取る
 */
use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
    http::StatusCode,
};

use crate::{
    api::v1::{
        dto::{
            bookings::{
                BookingData, BookingResponse, BookingsData, CreateBookingRequest,
                ListBookingsQuery, UpdateBookingRequest,
            },
            envelope::Success,
        },
        extractors::{
            CurrentUserExtractor,
            public_id::{PublicBookingId, PublicTourId},
        },
    },
    error::AppError,
    policy::{AccessDecision, BookingScope, check_ownership},
    repos::booking_repo::{self, BookingRow},
    state::AppState,
};

type QueryParams = Result<Query<ListBookingsQuery>, QueryRejection>;

fn row_to_response(state: &AppState, row: BookingRow) -> Result<BookingResponse, AppError> {
    Ok(BookingResponse {
        id: state.id_codec.encode(row.booking_id)?,
        tour_id: state.id_codec.encode(row.tour_id)?,
        user_id: row.user_id.into(),
        price: row.price,
        paid: row.paid,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

async fn list_in_scope(
    state: &AppState,
    scope: BookingScope,
    query: QueryParams,
) -> Result<Json<Success<BookingsData>>, AppError> {
    let Query(query) = query.map_err(|e| AppError::bad_request("INVALID_QUERY", e.body_text()))?;
    let opts = query
        .to_options()
        .map_err(|msg| AppError::bad_request("INVALID_QUERY", msg))?;

    let rows = booking_repo::list(&state.db, &scope, &opts).await?;

    let bookings = rows
        .into_iter()
        .map(|row| row_to_response(state, row))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(Success::with_results(
        bookings.len(),
        BookingsData { bookings },
    )))
}

/// Staff listing, no ownership filtering.
pub async fn list_bookings(
    State(state): State<AppState>,
    query: QueryParams,
) -> Result<Json<Success<BookingsData>>, AppError> {
    list_in_scope(&state, BookingScope::all(None), query).await
}

pub async fn list_tour_bookings(
    State(state): State<AppState>,
    tour_id: PublicTourId,
    query: QueryParams,
) -> Result<Json<Success<BookingsData>>, AppError> {
    list_in_scope(&state, BookingScope::all(Some(tour_id.id)), query).await
}

pub async fn list_my_bookings(
    State(state): State<AppState>,
    CurrentUserExtractor(current_user): CurrentUserExtractor,
    query: QueryParams,
) -> Result<Json<Success<BookingsData>>, AppError> {
    list_in_scope(&state, BookingScope::mine(&current_user), query).await
}

pub async fn get_booking(
    State(state): State<AppState>,
    CurrentUserExtractor(current_user): CurrentUserExtractor,
    booking_id: PublicBookingId,
) -> Result<Json<Success<BookingData>>, AppError> {
    let row = booking_repo::get(&state.db, booking_id.id).await?;

    match (check_ownership(row.as_ref(), &current_user), row) {
        (AccessDecision::Allow, Some(row)) => Ok(Json(Success::new(BookingData {
            booking: row_to_response(&state, row)?,
        }))),
        (AccessDecision::Deny(err), _) => {
            tracing::warn!(
                user_id = %current_user.id,
                role = %current_user.role,
                booking_id = booking_id.id,
                error = %err,
                "booking access denied"
            );
            Err(err.into())
        }
        // check_ownership never allows a missing resource
        (AccessDecision::Allow, None) => Err(AppError::not_found("booking")),
    }
}

pub async fn create_booking(
    State(state): State<AppState>,
    Json(req): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<Success<BookingData>>), AppError> {
    req.validate()
        .map_err(|msg| AppError::bad_request("INVALID_BOOKING", msg))?;

    let tour_id = state.id_codec.decode(&req.tour_id)?;

    let row = booking_repo::create(
        &state.db,
        tour_id,
        req.user_id.as_uuid(),
        req.price,
        req.paid,
    )
    .await?;
    tracing::info!(booking_id = row.booking_id, tour_id, "booking created");

    let booking = row_to_response(&state, row)?;
    Ok((StatusCode::CREATED, Json(Success::new(BookingData { booking }))))
}

pub async fn update_booking(
    State(state): State<AppState>,
    booking_id: PublicBookingId,
    Json(req): Json<UpdateBookingRequest>,
) -> Result<Json<Success<BookingData>>, AppError> {
    req.validate()
        .map_err(|msg| AppError::bad_request("INVALID_BOOKING", msg))?;

    let row = booking_repo::update(&state.db, booking_id.id, req.price, req.paid)
        .await?
        .ok_or(AppError::not_found("booking"))?;

    let booking = row_to_response(&state, row)?;
    Ok(Json(Success::new(BookingData { booking })))
}

pub async fn delete_booking(
    State(state): State<AppState>,
    booking_id: PublicBookingId,
) -> Result<StatusCode, AppError> {
    if booking_repo::delete(&state.db, booking_id.id).await? {
        tracing::info!(booking_id = booking_id.id, "booking deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("booking"))
    }
}

#[cfg(test)]
mod tests {
    use axum::http::Uri;
    use uuid::Uuid;

    use super::*;
    use crate::api::v1::extractors::{CurrentUser, UserId};
    use crate::policy::Role;

    #[test]
    fn my_bookings_scope_ignores_injected_user_ids() {
        let me = CurrentUser::new(UserId::new(Uuid::new_v4()), Role::User);
        let other = Uuid::new_v4();

        let uri: Uri = format!("/bookings/me?userId={other}&user={other}&page=2")
            .parse()
            .unwrap();
        let Query(query) = Query::<ListBookingsQuery>::try_from_uri(&uri).unwrap();

        // the query type has nowhere to carry an owner; the scope comes from CurrentUser only
        let scope = BookingScope::mine(&me);
        assert_eq!(scope.owner(), Some(me.id));
        assert_eq!(query.to_options().unwrap().offset, 100);
    }
}
