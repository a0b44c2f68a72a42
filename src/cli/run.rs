use anyhow::Result;
use clap::Args;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};

use dialog_stack::scenario::{Player, Scenario, Step};
use dialog_stack::Config;

/// Replay a scenario file
#[derive(Args)]
pub struct RunCommand {
    /// Scenario file (YAML, or JSON with a .json extension)
    pub scenario: PathBuf,

    /// Sleep through `wait` steps instead of only advancing the clock
    #[arg(short = 'r', long = "realtime")]
    pub realtime: bool,

    /// Only print the final stack
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,
}

impl RunCommand {
    pub async fn execute(&self, config: Config) -> Result<()> {
        debug!("Executing run command");

        let scenario = Scenario::load(&self.scenario).await?;
        info!(
            "Replaying {} step(s) from {}",
            scenario.steps.len(),
            self.scenario.display()
        );

        let mut player = Player::new(&scenario, config)?;

        for step in &scenario.steps {
            if self.realtime {
                if let Step::Wait { ms } = step {
                    tokio::time::sleep(Duration::from_millis(*ms)).await;
                }
            }

            let line = player.apply(step)?;
            if !self.quiet {
                println!("{}", line);
            }
        }

        if self.quiet {
            for layer in player.manager().layers() {
                println!("{}", layer);
            }
        }

        Ok(())
    }
}
