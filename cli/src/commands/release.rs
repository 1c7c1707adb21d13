use hostalias_common::AliasConfig;
use hostalias_core::AliasCoordinator;
use tracing::info;

use crate::commands::with_root_hint;

pub fn release(cfg: &AliasConfig) -> anyhow::Result<()> {
    let coordinator = AliasCoordinator::new(cfg).map_err(with_root_hint)?;
    let entry_removed = coordinator.release().map_err(with_root_hint)?;
    if entry_removed {
        info!("Removed hosts entry and alias for {}", coordinator.host());
    } else {
        info!("Removed alias for {}; no hosts entry was left", coordinator.host());
    }
    Ok(())
}
