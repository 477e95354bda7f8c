use crate::config::Config;
use crate::error::Result;
use crate::events::PointerSender;
use tokio::time::Duration;

/// Trait for pointer trackers that can run in different modes
#[async_trait::async_trait]
pub trait PointerTrackerTrait {
    /// Run the pointer tracker
    async fn run(self: Box<Self>) -> Result<()>;
}

/// Factory function to create an appropriate pointer tracker based on the dry_run flag
pub fn create_pointer_tracker(
    config: &Config,
    sender: PointerSender,
    dry_run: bool,
) -> Box<dyn PointerTrackerTrait + Send> {
    if dry_run {
        Box::new(super::dry_run::DryRunPointerTracker::new(sender))
    } else {
        Box::new(super::xdotool::XdotoolPointerTracker::new(
            sender,
            Duration::from_millis(config.pointer.polling_interval_ms),
        ))
    }
}
