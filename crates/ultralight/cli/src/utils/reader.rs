use std::error::Error;

use ultralight_apdu_transport_pcsc::PcscDeviceManager;
use ultralight_c::constants::ULTRALIGHT_C_ATR;

/// List all available readers
pub fn list_readers(manager: &PcscDeviceManager) -> Result<(), Box<dyn Error>> {
    let readers = manager.list_readers()?;

    if readers.is_empty() {
        println!("No readers found!");
        return Ok(());
    }

    println!("Available readers:");
    for (i, reader) in readers.iter().enumerate() {
        let status = match reader.atr() {
            Some(atr) if atr == ULTRALIGHT_C_ATR => "Ultralight-C present".to_string(),
            Some(atr) => format!("other card, ATR {}", hex::encode_upper(atr)),
            None => "no card".to_string(),
        };
        println!("{}. {} ({})", i + 1, reader.name(), status);
    }

    Ok(())
}
