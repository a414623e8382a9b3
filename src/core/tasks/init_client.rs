//! "Initialize client" step

use crate::adapters::space::models::environment_path;
use crate::adapters::space::{ContentApi, HttpContentApi};
use crate::config::SpaceConfig;
use crate::core::pipeline::{ExportContext, Step, StepAction, StepIo, StepOutcome};
use crate::domain::Result;
use async_trait::async_trait;
use std::sync::Arc;

pub const TITLE: &str = "Initialize client";

/// Builds the management client, and the delivery client when a delivery
/// token is configured, after checking the environment is reachable
pub fn step(space: SpaceConfig) -> Step {
    Step::action(TITLE, InitClient { space })
}

struct InitClient {
    space: SpaceConfig,
}

#[async_trait]
impl StepAction for InitClient {
    async fn run(&self, ctx: &mut ExportContext, io: &StepIo) -> Result<StepOutcome> {
        let management = HttpContentApi::management(&self.space)?;
        io.output(format!("Connecting to {}", management.base_url()));

        management
            .fetch_one(&environment_path(&self.space.environment_id))
            .await?;

        let delivery = HttpContentApi::delivery(&self.space)?
            .map(|client| Arc::new(client) as Arc<dyn ContentApi>);

        tracing::info!(
            space_id = %self.space.space_id,
            environment_id = %self.space.environment_id,
            delivery = delivery.is_some(),
            "API clients initialized"
        );

        ctx.set_clients(Arc::new(management), delivery);
        Ok(StepOutcome::Done)
    }
}
