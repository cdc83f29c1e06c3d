//! Received packet container handed to the mesh layer.

/// Signal quality attached to a received packet
///
/// `None` means the chip could not report the value for this packet.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RxMetadata {
    /// Signal-to-noise ratio in dB
    pub snr_db: Option<f32>,
    /// Received signal strength in dBm, rounded
    pub rssi_dbm: Option<i16>,
}

impl RxMetadata {
    pub fn is_known(&self) -> bool {
        self.snr_db.is_some() && self.rssi_dbm.is_some()
    }
}

/// A LoRa frame read from the chip's receive buffer
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReceivedPacket {
    pub payload: Vec<u8>,
    pub metadata: RxMetadata,
}

impl ReceivedPacket {
    pub fn new(payload: Vec<u8>) -> Self {
        Self {
            payload,
            metadata: RxMetadata::default(),
        }
    }

    pub fn len(&self) -> usize {
        self.payload.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }
}
