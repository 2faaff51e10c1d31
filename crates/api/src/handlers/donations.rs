//! Handlers for donations and thank-you messages.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use validator::Validate;
use wishdrop_core::donation::{
    parse_currency_amount, validate_donation_amount, validate_donation_message,
};
use wishdrop_core::error::CoreError;
use wishdrop_core::funding::{compute_progress, FundingProgress};
use wishdrop_core::types::{Cents, DbId};
use wishdrop_db::models::donation::{CreateDonation, Donation, DonationOutcome};
use wishdrop_db::models::thank_you::CreateThankYou;
use wishdrop_db::repositories::{DonationRepo, ThankYouRepo, WishRepo};
use wishdrop_events::PlatformEvent;

use crate::error::{AppError, AppResult};
use crate::handlers::profiles::ensure_profile;
use crate::handlers::wishes::ensure_visible_wish;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

/// A donation amount: an integer is taken as cents, a string as a decimal
/// amount in currency units (`"12.50"`).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AmountInput {
    Cents(Cents),
    Decimal(String),
}

impl AmountInput {
    pub fn to_cents(&self) -> Result<Cents, CoreError> {
        match self {
            AmountInput::Cents(cents) => {
                validate_donation_amount(*cents)?;
                Ok(*cents)
            }
            AmountInput::Decimal(text) => parse_currency_amount(text),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct DonateRequest {
    pub amount: AmountInput,
    /// Donations are anonymous unless the donor opts out.
    #[serde(default = "default_anonymous")]
    pub is_anonymous: bool,
    pub message: Option<String>,
}

fn default_anonymous() -> bool {
    true
}

#[derive(Debug, Serialize)]
pub struct DonationReceipt {
    pub donation: Donation,
    pub karma_awarded: i64,
    /// `true` when this donation completed the wish's goal.
    pub wish_funded: bool,
    pub progress: FundingProgress,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ThankYouRequest {
    #[validate(length(min = 1, max = 2000, message = "must be 1-2000 characters"))]
    pub message: Option<String>,
    #[validate(length(max = 2048, message = "must be at most 2048 characters"))]
    pub media_url: Option<String>,
}

// ---------------------------------------------------------------------------
// Donations
// ---------------------------------------------------------------------------

/// POST /api/v1/wishes/{id}/donations
///
/// Record a completed donation. Awards karma to the donor and flips the
/// wish to funded when the goal is reached.
pub async fn donate(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(wish_id): Path<DbId>,
    Json(input): Json<DonateRequest>,
) -> AppResult<impl IntoResponse> {
    let amount = input.amount.to_cents()?;
    let message = input
        .message
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty());
    validate_donation_message(message.as_deref())?;

    let wish = ensure_visible_wish(&state.pool, wish_id, Some(user.user_id)).await?;
    ensure_profile(&state.pool, &user).await?;

    let outcome = DonationRepo::create_completed(
        &state.pool,
        &CreateDonation {
            wish_id,
            donor_id: user.user_id,
            amount,
            is_anonymous: input.is_anonymous,
            message,
        },
    )
    .await?;

    let (donation, karma_awarded, wish_funded) = match outcome {
        DonationOutcome::Recorded {
            donation,
            karma_awarded,
            wish_funded,
        } => (donation, karma_awarded, wish_funded),
        DonationOutcome::WishClosed { status } => {
            return Err(AppError::Core(CoreError::Conflict(format!(
                "Wish is {status} and no longer accepts donations"
            ))));
        }
        DonationOutcome::WishNotFound => {
            return Err(AppError::Core(CoreError::NotFound {
                entity: "Wish",
                id: wish_id,
            }));
        }
    };

    tracing::info!(
        donation_id = %donation.id,
        wish_id = %wish_id,
        donor_id = %user.user_id,
        amount,
        karma_awarded,
        wish_funded,
        "Donation completed",
    );

    state.event_bus.publish(PlatformEvent::donation_completed(
        donation.id,
        wish_id,
        user.user_id,
        amount,
        karma_awarded,
    ));
    if wish_funded {
        state
            .event_bus
            .publish(PlatformEvent::wish_funded(wish_id, wish.user_id, wish.amount));
    }

    let amounts = DonationRepo::completed_amounts_for_wish(&state.pool, wish_id).await?;
    let progress = compute_progress(wish.amount, amounts)?;

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: DonationReceipt {
                donation,
                karma_awarded,
                wish_funded,
                progress,
            },
        }),
    ))
}

/// GET /api/v1/wishes/{id}/donations
///
/// Completed donations for a wish. Anonymous donors are not revealed.
pub async fn list_wish_donations(
    viewer: Option<AuthUser>,
    State(state): State<AppState>,
    Path(wish_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_visible_wish(&state.pool, wish_id, viewer.map(|u| u.user_id)).await?;
    let donations: Vec<Donation> = DonationRepo::list_completed_for_wish(&state.pool, wish_id)
        .await?
        .iter()
        .map(Donation::public_view)
        .collect();
    Ok(Json(DataResponse { data: donations }))
}

/// GET /api/v1/me/donations
pub async fn list_my_donations(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let donations = DonationRepo::list_by_donor(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse { data: donations }))
}

// ---------------------------------------------------------------------------
// Thank-you messages
// ---------------------------------------------------------------------------

/// Load a donation together with the owner of the wish it went to.
async fn donation_with_owner(pool: &sqlx::PgPool, donation_id: DbId) -> AppResult<(Donation, DbId)> {
    let donation = DonationRepo::find_by_id(pool, donation_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Donation",
            id: donation_id,
        }))?;
    let wish = WishRepo::find_by_id(pool, donation.wish_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Wish",
            id: donation.wish_id,
        }))?;
    Ok((donation, wish.user_id))
}

/// POST /api/v1/donations/{id}/thank-you
///
/// Only the owner of the wish that received the donation may thank.
pub async fn create_thank_you(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(donation_id): Path<DbId>,
    Json(input): Json<ThankYouRequest>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    if input.message.is_none() && input.media_url.is_none() {
        return Err(AppError::Core(CoreError::Validation(
            "A thank-you needs a message or a media_url".into(),
        )));
    }

    let (_, owner_id) = donation_with_owner(&state.pool, donation_id).await?;
    if owner_id != user.user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the wish owner can thank its donors".into(),
        )));
    }

    let thank_you = ThankYouRepo::create(
        &state.pool,
        &CreateThankYou {
            donation_id,
            message: input.message,
            media_url: input.media_url,
        },
    )
    .await?;

    tracing::info!(donation_id = %donation_id, user_id = %user.user_id, "Thank-you sent");

    Ok((StatusCode::CREATED, Json(DataResponse { data: thank_you })))
}

/// GET /api/v1/donations/{id}/thank-you
///
/// Visible to the donor and the wish owner.
pub async fn list_thank_yous(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(donation_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let (donation, owner_id) = donation_with_owner(&state.pool, donation_id).await?;
    if donation.donor_id != Some(user.user_id) && owner_id != user.user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the donor and the wish owner can read thank-you messages".into(),
        )));
    }

    let messages = ThankYouRepo::list_for_donation(&state.pool, donation_id).await?;
    Ok(Json(DataResponse { data: messages }))
}
