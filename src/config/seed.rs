//! First-run seeding of the persisted activation gesture.

use tracing::info;

use super::defaults::SHORTCUT_STORAGE_KEY;
use super::store::{ConfigStore, StoreError};
use crate::shortcuts::{is_truthy, ActivationGesture};

/// Why the extension lifecycle hook fired.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InstallReason {
    Install,
    Update,
    BrowserUpdate,
}

/// On a fresh install, write the default gesture unless a truthy value is already stored.
///
/// Returns whether a value was written.
pub fn seed_default_shortcut<S: ConfigStore + ?Sized>(
    store: &S,
    reason: InstallReason,
) -> Result<bool, StoreError> {
    if reason != InstallReason::Install {
        return Ok(false);
    }

    let present = store
        .get(SHORTCUT_STORAGE_KEY)?
        .is_some_and(|value| is_truthy(&value));
    if present {
        return Ok(false);
    }

    store.set(
        SHORTCUT_STORAGE_KEY,
        ActivationGesture::default().to_value(),
    )?;
    info!(event_type = "app_lifecycle", action = "installed", "Seeded default shortcut");
    Ok(true)
}
