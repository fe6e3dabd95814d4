//! Booking, listing, editing and deleting the signed-in patient's appointments.
//!
//! Every handler starts with [`RequestContext::require_login`]. An appointment
//! that is missing or owned by someone else always ends in the same notice and
//! a redirect to the list.
//!
//! Path and body are taken as `Result`s so the login check comes before any
//! complaint about them.

use axum::extract::rejection::{FormRejection, PathRejection};
use axum::extract::Path;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Form;
use serde_json::json;

use api::appointments::{self, AppointmentForm};
use api::{Error, Patient};

use crate::context::RequestContext;
use crate::error::WebError;
use crate::flash::Level;
use crate::views;

const MY_APPOINTMENTS: &str = "/my-appointments";

fn to_list() -> Response {
    Redirect::to(MY_APPOINTMENTS).into_response()
}

/// The shared answer for a missing, foreign or malformed appointment id.
async fn not_found(ctx: &mut RequestContext) -> Result<Response, WebError> {
    ctx.flash(Level::Error, Error::NotFound.to_string()).await?;
    Ok(to_list())
}

pub async fn book_form(mut ctx: RequestContext) -> Result<Response, WebError> {
    ctx.require_login().await?;
    let form = appointments::booking_form(&mut ctx.gateway).await?;
    ctx.render(views::BOOK_APPOINTMENT, form).await
}

pub async fn book(
    mut ctx: RequestContext,
    form: Result<Form<AppointmentForm>, FormRejection>,
) -> Result<Response, WebError> {
    let patient = ctx.require_login().await?;
    let Form(form) = match form {
        Ok(form) => form,
        Err(rejection) => return Ok(rejection.into_response()),
    };

    match appointments::book(&mut ctx.gateway, &patient, &form).await {
        Ok(_) => {
            ctx.flash(Level::Success, "Appointment booked successfully!")
                .await?;
            Ok(to_list())
        }
        Err(e) if e.is_user_facing() => {
            ctx.flash(Level::Error, e.to_string()).await?;
            let form = appointments::booking_form(&mut ctx.gateway).await?;
            ctx.render(views::BOOK_APPOINTMENT, form).await
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn list_mine(mut ctx: RequestContext) -> Result<Response, WebError> {
    let patient = ctx.require_login().await?;
    let appointments = appointments::list_mine(&mut ctx.gateway, &patient).await?;
    ctx.render(views::MY_APPOINTMENTS, json!({ "appointments": appointments }))
        .await
}

pub async fn edit_form(
    mut ctx: RequestContext,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Response, WebError> {
    let patient = ctx.require_login().await?;
    let Ok(Path(id)) = id else {
        return not_found(&mut ctx).await;
    };
    show_edit_form(&mut ctx, &patient, id).await
}

pub async fn edit(
    mut ctx: RequestContext,
    id: Result<Path<i64>, PathRejection>,
    form: Result<Form<AppointmentForm>, FormRejection>,
) -> Result<Response, WebError> {
    let patient = ctx.require_login().await?;
    let Ok(Path(id)) = id else {
        return not_found(&mut ctx).await;
    };
    let Form(form) = match form {
        Ok(form) => form,
        Err(rejection) => return Ok(rejection.into_response()),
    };

    match appointments::edit(&mut ctx.gateway, &patient, id, &form).await {
        Ok(()) => {
            ctx.flash(Level::Success, "Appointment updated successfully!")
                .await?;
            Ok(to_list())
        }
        Err(Error::NotFound) => not_found(&mut ctx).await,
        Err(e) if e.is_user_facing() => {
            ctx.flash(Level::Error, e.to_string()).await?;
            show_edit_form(&mut ctx, &patient, id).await
        }
        Err(e) => Err(e.into()),
    }
}

async fn show_edit_form(
    ctx: &mut RequestContext,
    patient: &Patient,
    id: i64,
) -> Result<Response, WebError> {
    match appointments::edit_form(&mut ctx.gateway, patient, id).await {
        Ok(form) => ctx.render(views::EDIT_APPOINTMENT, form).await,
        Err(Error::NotFound) => not_found(ctx).await,
        Err(e) => Err(e.into()),
    }
}

pub async fn delete(
    mut ctx: RequestContext,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Response, WebError> {
    let patient = ctx.require_login().await?;
    let Ok(Path(id)) = id else {
        return not_found(&mut ctx).await;
    };

    match appointments::delete(&mut ctx.gateway, &patient, id).await {
        Ok(()) => {
            ctx.flash(Level::Success, "Appointment deleted successfully.")
                .await?
        }
        Err(Error::NotFound) => return not_found(&mut ctx).await,
        Err(e) => return Err(e.into()),
    }
    Ok(to_list())
}
