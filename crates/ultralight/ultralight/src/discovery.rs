//! Locating an Ultralight-C card through PC/SC

use std::time::Duration;

use tracing::info;
use ultralight_apdu_transport_pcsc::{
    AtrPattern, CardRequest, PcscConfig, PcscDeviceManager, PcscTransport, ShareMode,
};

use crate::{Result, constants::ULTRALIGHT_C_ATR};

/// Request for an Ultralight-C on any reader
pub fn ultralight_c_request(timeout: Duration) -> CardRequest {
    CardRequest::new(AtrPattern::exact(ULTRALIGHT_C_ATR.to_vec())).with_timeout(timeout)
}

/// Connection settings for a session: the card is held exclusively
pub fn session_config() -> PcscConfig {
    PcscConfig::default().with_share_mode(ShareMode::Exclusive)
}

/// Wait for a matching card and connect to it exclusively
///
/// # Errors
///
/// [`Error::CardNotPresent`](crate::Error::CardNotPresent) when nothing
/// appears within the timeout, [`Error::CardMismatch`](crate::Error::CardMismatch)
/// when only other card types were presented.
pub fn connect(manager: &PcscDeviceManager, request: &CardRequest) -> Result<PcscTransport> {
    info!(timeout = ?request.timeout, "Waiting for card");
    let transport = manager.wait_for_card(request, session_config())?;
    info!(reader = transport.reader_name(), "Connected to card");
    Ok(transport)
}
