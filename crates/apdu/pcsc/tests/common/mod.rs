//! Common test utilities

use ultralight_apdu_transport_pcsc::{PcscDeviceManager, PcscReader};

/// Try to get a device manager, `None` when PC/SC is not running
pub fn get_manager() -> Option<PcscDeviceManager> {
    PcscDeviceManager::new().ok()
}

/// Try to get a real reader with a card for tests
pub fn get_reader_with_card(manager: &PcscDeviceManager) -> Option<PcscReader> {
    manager
        .list_readers()
        .ok()?
        .into_iter()
        .find(PcscReader::has_card)
}
