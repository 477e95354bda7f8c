use crate::error::Result;
use crate::events::{PointerPosition, PointerSender};
use tokio::time::{interval, Duration};
use tracing::info;

use super::r#trait::PointerTrackerTrait;

pub struct DryRunPointerTracker {
    sender: PointerSender,
}

impl DryRunPointerTracker {
    pub fn new(sender: PointerSender) -> Self {
        Self { sender }
    }

    async fn run_impl(self) -> Result<()> {
        info!("Dry-run режим - PointerTracker работает в режиме эмуляции");

        // Центр экрана DRY-1 чередуется с его углами
        let path = [
            ("центр", PointerPosition::new(960, 540)),
            ("topLeft", PointerPosition::new(2, 2)),
            ("центр", PointerPosition::new(960, 540)),
            ("topRight", PointerPosition::new(1917, 2)),
            ("центр", PointerPosition::new(960, 540)),
            ("bottomRight", PointerPosition::new(1917, 1077)),
            ("центр", PointerPosition::new(960, 540)),
            ("bottomLeft", PointerPosition::new(2, 1077)),
        ];

        let mut step = 0;
        let mut interval = interval(Duration::from_secs(3));

        loop {
            interval.tick().await;

            let (label, position) = path[step];
            info!("Dry-run: эмулируем курсор в {} {}", label, position);
            self.sender.send_replace(Some(position));

            step = (step + 1) % path.len();
        }
    }
}

#[async_trait::async_trait]
impl PointerTrackerTrait for DryRunPointerTracker {
    async fn run(self: Box<Self>) -> Result<()> {
        (*self).run_impl().await
    }
}
