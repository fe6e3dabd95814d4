//! Home page, registration, login and logout.

use axum::response::{IntoResponse, Redirect, Response};
use axum::Form;
use serde_json::json;

use api::accounts::{self, Credentials, Registration};

use crate::context::RequestContext;
use crate::error::WebError;
use crate::flash::Level;
use crate::views;

pub async fn index(mut ctx: RequestContext) -> Result<Response, WebError> {
    ctx.render(views::INDEX, json!({})).await
}

pub async fn register_form(mut ctx: RequestContext) -> Result<Response, WebError> {
    ctx.render(views::REGISTER, json!({})).await
}

pub async fn register(
    mut ctx: RequestContext,
    Form(form): Form<Registration>,
) -> Result<Response, WebError> {
    match accounts::register(&mut ctx.gateway, &form).await {
        Ok(_) => {
            ctx.flash(Level::Success, "Registration successful! Please log in.")
                .await?;
            Ok(Redirect::to("/login").into_response())
        }
        Err(e) if e.is_user_facing() => {
            ctx.flash(Level::Error, e.to_string()).await?;
            ctx.render(views::REGISTER, json!({})).await
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn login_form(mut ctx: RequestContext) -> Result<Response, WebError> {
    ctx.render(views::LOGIN, json!({})).await
}

pub async fn login(
    mut ctx: RequestContext,
    Form(form): Form<Credentials>,
) -> Result<Response, WebError> {
    match accounts::login(&mut ctx.gateway, &form).await {
        Ok(patient) => {
            ctx.sign_in(&patient).await?;
            ctx.flash(
                Level::Success,
                format!("Welcome back, {}!", patient.first_name),
            )
            .await?;
            Ok(Redirect::to("/").into_response())
        }
        Err(e) if e.is_user_facing() => {
            ctx.flash(Level::Error, e.to_string()).await?;
            ctx.render(views::LOGIN, json!({})).await
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn logout(mut ctx: RequestContext) -> Result<Response, WebError> {
    ctx.sign_out().await;
    ctx.flash(Level::Success, "You have been logged out.").await?;
    Ok(Redirect::to("/login").into_response())
}
