use async_graphql::{Context, Object, Result};

use crate::domain::repository::EmailSender as _;
use crate::graphql::guard::{self, AuthHeader};
use crate::state::AppState;

#[derive(Default)]
pub struct EmailMutation;

#[Object]
impl EmailMutation {
    /// Send an arbitrary HTML email through the relay. Administrator only.
    async fn send_email(
        &self,
        ctx: &Context<'_>,
        to: String,
        subject: String,
        html_body: String,
    ) -> Result<bool> {
        let state = ctx.data::<AppState>()?;
        guard::require_admin(state, ctx.data::<AuthHeader>()?).await?;
        state.mailer().send(&to, &subject, &html_body).await?;
        Ok(true)
    }
}
