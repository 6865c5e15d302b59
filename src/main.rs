//! Demo walkthrough of the onboarding flow against the mocked gateway.

use anyhow::Result;
use tracing::{info, warn};

use onboard_core::wizard::WizardState;
use onboard_lib::{build_context, init_tracing, InfraConfig};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = InfraConfig::load()?;
    let ctx = build_context(&config)?;

    // Sign in with the mock credentials (password "success").
    let user = ctx
        .sign_in()
        .execute("demo@example.com", "success", true)
        .await?;
    info!(user_id = ?user.id, "signed in");

    // Step 1: pick a username. An even character count reads as available.
    let state = ctx.wizard.submit_username("demo_user_42").await;
    info!(?state, "username submitted");
    ctx.wizard.wait_for_check().await;

    let state = ctx.wizard.confirm_username().await;
    match &state {
        WizardState::ProfilePicture { .. } => info!("username claimed"),
        other => warn!(state = ?other, "username not claimed"),
    }

    // Step 2: skip the profile picture and finish.
    let state = ctx.wizard.skip_picture().await;
    info!(?state, "wizard finished");

    let session = ctx.session.current().await;
    info!(?session, "session after onboarding");

    ctx.teardown().await?;
    Ok(())
}
