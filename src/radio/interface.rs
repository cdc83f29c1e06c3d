//! # LR11x0 Radio Interface
//!
//! [`Lr11x0Interface`] adapts one LR11x0 chip to the lifecycle and interrupt
//! contract expected by the mesh stack's base radio interface. It owns the chip
//! driver, tracks the radio mode, and decides which driver commands are legal next.
//!
//! ## Mode Transitions
//!
//! ```text
//!                 init()                start_receive()
//! Uninitialized ─────────► Standby ───────────────────► Receiving ◄──┐
//!                            ▲  ▲ ◄─────── set_standby() ────┘  │    │ serviced /
//!                            │  │                              ▼    │ false detection
//!        service_irq(TX_DONE)│  │ init() / reconfigure()   ActivelyReceiving
//!                            │  │
//!               Transmitting ┘  └─── Sleeping ◄── sleep() (Standby / Receiving)
//!                  ▲
//!                  └── start_transmit() (Standby only)
//! ```
//!
//! ## Locking and Interrupts
//!
//! Every driver call that touches the bus runs while a guard from
//! [`Hal::lock_bus`] is alive. The interrupt callback installed through
//! [`Lr11x0Interface::enable_interrupt`] only signals; flag reads and packet
//! reads happen later from [`Lr11x0Interface::service_irq`] in normal context.
//! The line is detached before any operation that reprograms or powers down
//! the chip.

use crate::config::LoRaConfig;
use crate::constants::{MAX_PAYLOAD_LEN, PREAMBLE_LENGTH_2G4};
use crate::error::RadioError;
use crate::radio::cad::CadParams;
use crate::radio::chip::{ChipDriver, ChipError, PaSelection, Variant};
use crate::radio::hal::{Hal, PinAssignments};
use crate::radio::irq::{IrqCallback, IrqFlags, IrqLine};
use crate::radio::packet::ReceivedPacket;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Radio operating mode tracked by the adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RadioMode {
    /// Constructed, `init()` not yet successful
    Uninitialized,
    /// Idle, configuration retained
    Standby,
    /// Continuous receive, nothing detected
    Receiving,
    /// Continuous receive with a preamble or header in flight
    ActivelyReceiving,
    /// Transmit command accepted, waiting for TX_DONE
    Transmitting,
    /// Chip asleep, power enable released
    Sleeping,
}

impl RadioMode {
    pub fn is_receiving(self) -> bool {
        matches!(self, RadioMode::Receiving | RadioMode::ActivelyReceiving)
    }

    /// Whether the chip can answer on the bus
    pub fn is_powered(self) -> bool {
        !matches!(self, RadioMode::Uninitialized | RadioMode::Sleeping)
    }
}

fn no_signal() {}

/// Interrupt-context glue supplied by the base radio interface
#[derive(Debug, Clone, Copy)]
pub struct IsrHandlers {
    /// Installed while receiving
    pub rx: IrqCallback,
    /// Installed while transmitting
    pub tx: IrqCallback,
}

impl Default for IsrHandlers {
    fn default() -> Self {
        Self {
            rx: no_signal,
            tx: no_signal,
        }
    }
}

/// Outcome of servicing an interrupt
#[derive(Debug, Clone, PartialEq)]
pub enum RadioEvent {
    /// A packet passed CRC and carries SNR/RSSI metadata
    PacketReceived(ReceivedPacket),
    /// Header or payload CRC failed; the frame was discarded
    CorruptPacket { flags: IrqFlags },
    TransmitDone,
    /// The chip gave up on the transmission
    TransmitTimeout,
}

/// Adapter for one LR11x0 transceiver
pub struct Lr11x0Interface<C: ChipDriver, H: Hal> {
    lora: C,
    hal: Arc<H>,
    pins: PinAssignments,
    config: LoRaConfig,
    isr: IsrHandlers,
    mode: RadioMode,
    /// First time a preamble or header was seen in the current receive
    active_receive_start: Option<Instant>,
    preamble_timeout: Duration,
    max_packet_time: Duration,
    tx_power_dbm: i8,
    preamble_length: u16,
}

impl<C: ChipDriver, H: Hal> Lr11x0Interface<C, H> {
    /// Create the adapter. The chip is not touched until [`init`](Self::init).
    pub fn new(lora: C, hal: Arc<H>, pins: PinAssignments, config: LoRaConfig) -> Self {
        let mut radio = Self {
            lora,
            hal,
            pins,
            tx_power_dbm: clamp_power::<C::Variant>(&config),
            preamble_length: effective_preamble(&config),
            config,
            isr: IsrHandlers::default(),
            mode: RadioMode::Uninitialized,
            active_receive_start: None,
            preamble_timeout: Duration::ZERO,
            max_packet_time: Duration::ZERO,
        };
        radio.update_timing();
        log::debug!(
            "{} adapter created (cs {}, irq {}, busy {})",
            C::Variant::NAME,
            pins.cs,
            pins.irq,
            pins.busy
        );
        radio
    }

    pub fn set_isr_handlers(&mut self, rx: IrqCallback, tx: IrqCallback) {
        self.isr = IsrHandlers { rx, tx };
    }

    pub fn mode(&self) -> RadioMode {
        self.mode
    }

    pub fn config(&self) -> &LoRaConfig {
        &self.config
    }

    pub fn pins(&self) -> &PinAssignments {
        &self.pins
    }

    pub fn driver(&self) -> &C {
        &self.lora
    }

    /// Output power actually programmed, after clamping
    pub fn effective_tx_power(&self) -> i8 {
        self.tx_power_dbm
    }

    /// Preamble length actually programmed
    pub fn preamble_length(&self) -> u16 {
        self.preamble_length
    }

    pub fn irq_line(&self) -> &IrqLine {
        self.lora.irq_line()
    }

    // ========================== LIFECYCLE ==========================

    /// Bring the chip from reset to Standby and apply the full configuration
    ///
    /// Valid from Uninitialized and Sleeping. On failure the mode is unchanged.
    pub fn init(&mut self) -> Result<(), RadioError> {
        self.require("init", &[RadioMode::Uninitialized, RadioMode::Sleeping])?;
        self.config.validate_for::<C::Variant>()?;

        self.disable_interrupt();
        self.set_power_enable(true)?;

        let pins = self.pins;
        let version = self.with_bus(|lora| {
            lora.attach(&pins)
                .and_then(|_| lora.reset())
                .and_then(|_| lora.identify())
                .map_err(RadioError::Communication)
        })?;

        if version.chip_type != C::Variant::CHIP_TYPE {
            log::error!(
                "Expected {} (type 0x{:02X}), chip reports type 0x{:02X}",
                C::Variant::NAME,
                C::Variant::CHIP_TYPE,
                version.chip_type
            );
            return Err(RadioError::WrongChip {
                variant: C::Variant::NAME,
                expected: C::Variant::CHIP_TYPE,
                found: version.chip_type,
            });
        }

        self.apply_config(true)?;

        self.active_receive_start = None;
        self.mode = RadioMode::Standby;
        log::info!(
            "{} initialized: hw 0x{:02X}, fw 0x{:04X}, {} Hz, {:?}/{:?}/{:?}, {} dBm",
            C::Variant::NAME,
            version.hardware,
            version.firmware,
            self.config.frequency_hz,
            self.config.spreading_factor,
            self.config.bandwidth,
            self.config.coding_rate,
            self.tx_power_dbm
        );
        Ok(())
    }

    /// Store a new configuration; it reaches the chip on the next
    /// [`reconfigure`](Self::reconfigure) or [`init`](Self::init)
    pub fn set_config(&mut self, config: LoRaConfig) -> Result<(), RadioError> {
        config.validate_for::<C::Variant>()?;
        self.config = config;
        Ok(())
    }

    /// Reapply the stored configuration to an initialized chip
    ///
    /// Receive is restarted afterwards if the radio was receiving, even when the
    /// chip rejected a parameter, so the node keeps listening on its old settings.
    pub fn reconfigure(&mut self) -> Result<(), RadioError> {
        self.require(
            "reconfigure",
            &[
                RadioMode::Standby,
                RadioMode::Receiving,
                RadioMode::ActivelyReceiving,
                RadioMode::Sleeping,
            ],
        )?;
        self.config.validate_for::<C::Variant>()?;

        let was_receiving = self.mode.is_receiving();
        self.set_standby()?;
        let applied = self.apply_config(false);

        if was_receiving {
            let restarted = self.start_receive();
            applied?;
            restarted?;
        } else {
            applied?;
        }

        log::info!(
            "{} reconfigured: {} Hz, {:?}/{:?}/{:?}, {} dBm",
            C::Variant::NAME,
            self.config.frequency_hz,
            self.config.spreading_factor,
            self.config.bandwidth,
            self.config.coding_rate,
            self.tx_power_dbm
        );
        Ok(())
    }

    /// Put the chip into its lowest power state
    ///
    /// The interrupt is detached before anything else happens. If the sleep
    /// command fails the chip is left in Standby. Once the chip is asleep a
    /// failure to drop the power enable pin is only logged.
    pub fn sleep(&mut self) -> Result<(), RadioError> {
        self.require(
            "sleep",
            &[
                RadioMode::Standby,
                RadioMode::Receiving,
                RadioMode::ActivelyReceiving,
            ],
        )?;
        self.disable_interrupt();
        self.set_standby()?;

        let retain = self.config.sleep_retain_config;
        self.with_bus(|lora| lora.sleep(retain).map_err(RadioError::SleepFailed))?;

        self.mode = RadioMode::Sleeping;
        if let Err(e) = self.set_power_enable(false) {
            log::warn!("Chip asleep but power enable still driven: {e}");
        }
        log::info!(
            "{} entered sleep (retain config: {})",
            C::Variant::NAME,
            retain
        );
        Ok(())
    }

    /// Abort any receive or transmit and return to Standby
    ///
    /// From Sleeping the chip is powered up again; after a sleep without
    /// retention the full configuration is reapplied.
    pub fn set_standby(&mut self) -> Result<(), RadioError> {
        if self.mode == RadioMode::Uninitialized {
            return Err(RadioError::InvalidMode {
                op: "set_standby",
                mode: self.mode,
            });
        }
        self.disable_interrupt();
        let waking = self.mode == RadioMode::Sleeping;
        if waking {
            self.set_power_enable(true)?;
        }
        self.with_bus(|lora| Ok(lora.set_standby()?))?;
        // Cold sleep drops the chip configuration
        if waking && !self.config.sleep_retain_config {
            self.apply_config(true)?;
        }

        if self.mode == RadioMode::Transmitting {
            log::warn!("Transmission aborted by standby");
        }
        if self.mode != RadioMode::Standby {
            log::debug!("Radio mode: {:?} -> Standby", self.mode);
        }
        self.active_receive_start = None;
        self.mode = RadioMode::Standby;
        Ok(())
    }

    // ========================== INTERRUPT GLUE ==========================

    /// Read the chip's IRQ register; true if any flag is set
    pub fn is_irq_pending(&mut self) -> Result<bool, RadioError> {
        self.require(
            "is_irq_pending",
            &[
                RadioMode::Standby,
                RadioMode::Receiving,
                RadioMode::ActivelyReceiving,
                RadioMode::Transmitting,
            ],
        )?;
        let flags = self.with_bus(|lora| Ok(lora.read_irq_flags()?))?;
        Ok(flags.has_any())
    }

    /// Install `callback` on the IRQ line, replacing the previous one
    pub fn enable_interrupt(&mut self, callback: IrqCallback) {
        if self.lora.irq_line().attach(callback).is_some() {
            log::trace!("IRQ callback replaced");
        }
    }

    /// Detach the callback and mask the line. No-op when already disabled.
    pub fn disable_interrupt(&mut self) {
        self.lora.irq_line().detach();
    }

    /// Consume the "event occurred" signal left by the interrupt callback
    pub fn take_irq_event(&self) -> bool {
        self.lora.irq_line().take_pending()
    }

    // ========================== RECEIVE / TRANSMIT ==========================

    /// Enter continuous receive
    ///
    /// The receive front end and preamble length are restored on every call,
    /// whether the radio comes from a transmit, a CAD or a wake-up.
    pub fn start_receive(&mut self) -> Result<(), RadioError> {
        self.require("start_receive", &[RadioMode::Standby])?;
        self.disable_interrupt();
        self.set_rf_switch(false)?;

        let preamble = self.preamble_length;
        self.with_bus(|lora| {
            lora.set_preamble_length(preamble)?;
            lora.clear_irq_flags(IrqFlags::all())?;
            lora.start_receive(IrqFlags::RX_MASK)?;
            Ok(())
        })?;

        self.active_receive_start = None;
        self.mode = RadioMode::Receiving;
        let rx = self.isr.rx;
        self.enable_interrupt(rx);
        log::debug!("Radio mode: Standby -> Receiving");

        self.check_rx_done_irq_flag();
        Ok(())
    }

    /// A packet that landed before the line was armed produced no edge
    fn check_rx_done_irq_flag(&mut self) {
        match self.with_bus(|lora| Ok(lora.read_irq_flags()?)) {
            Ok(flags) if flags.rx_done() => {
                log::debug!("RX_DONE already set after starting receive, re-signalling");
                self.lora.irq_line().on_edge();
            }
            Ok(_) => {}
            Err(err) => log::warn!("Could not check RX_DONE after starting receive: {err}"),
        }
    }

    /// Listen-before-talk check
    ///
    /// True while a LoRa signal is on the channel. In receive mode a signal
    /// already being demodulated answers directly; otherwise a CAD is run and
    /// receive is resumed afterwards, so the mode is unchanged on return. A
    /// finished packet waiting for service answers false without a scan.
    pub fn is_channel_active(&mut self) -> Result<bool, RadioError> {
        self.require(
            "is_channel_active",
            &[
                RadioMode::Standby,
                RadioMode::Receiving,
                RadioMode::ActivelyReceiving,
            ],
        )?;
        if self.mode == RadioMode::ActivelyReceiving {
            return Ok(true);
        }

        let resume_receive = self.mode == RadioMode::Receiving;
        if resume_receive {
            let (detected, flags) = self.detect_activity()?;
            if detected {
                return Ok(true);
            }
            // A CAD would restart receive and drop the finished packet
            if flags.rx_done() {
                log::debug!("Packet waiting for service, CAD skipped");
                return Ok(false);
            }
            self.set_standby()?;
        } else {
            self.disable_interrupt();
        }

        let params =
            CadParams::listen_before_talk(self.config.spreading_factor, self.config.bandwidth);
        let scan = self.with_bus(|lora| Ok(lora.scan_channel(&params)?));

        if resume_receive {
            self.start_receive()?;
        }
        let active = scan?;
        log::debug!(
            "CAD ({} symbols): channel {}",
            params.symbol_num,
            if active { "busy" } else { "clear" }
        );
        Ok(active)
    }

    /// Whether a packet is currently being demodulated
    ///
    /// Only a preamble or valid header counts; a finished packet is left to
    /// [`service_irq`](Self::service_irq). Reads the IRQ flags fresh on every
    /// call. A preamble without a valid header after twice the preamble time,
    /// or a header without RX_DONE after the longest possible packet, is
    /// treated as a false detection: the flags are cleared and the radio falls
    /// back to Receiving.
    pub fn is_actively_receiving(&mut self) -> Result<bool, RadioError> {
        self.require(
            "is_actively_receiving",
            &[RadioMode::Receiving, RadioMode::ActivelyReceiving],
        )?;
        Ok(self.detect_activity()?.0)
    }

    fn detect_activity(&mut self) -> Result<(bool, IrqFlags), RadioError> {
        let flags = self.with_bus(|lora| Ok(lora.read_irq_flags()?))?;

        let detected = if !flags.signal_detected() {
            false
        } else if flags.contains(IrqFlags::HEADER_VALID) {
            self.within_detection_window(self.preamble_timeout + self.max_packet_time, "header")?
        } else {
            self.within_detection_window(self.preamble_timeout, "preamble")?
        };

        if !detected {
            self.active_receive_start = None;
        }
        let mode = if detected {
            RadioMode::ActivelyReceiving
        } else {
            RadioMode::Receiving
        };
        if mode != self.mode {
            log::trace!("Radio mode: {:?} -> {:?}", self.mode, mode);
            self.mode = mode;
        }
        Ok((detected, flags))
    }

    fn within_detection_window(
        &mut self,
        window: Duration,
        what: &str,
    ) -> Result<bool, RadioError> {
        let start = *self.active_receive_start.get_or_insert_with(Instant::now);
        let elapsed = start.elapsed();
        if elapsed <= window {
            return Ok(true);
        }
        log::warn!("False {what} detection, no progress after {elapsed:?}");
        self.active_receive_start = None;
        self.with_bus(|lora| {
            Ok(lora.clear_irq_flags(IrqFlags::PREAMBLE_DETECTED | IrqFlags::HEADER_VALID)?)
        })?;
        Ok(false)
    }

    /// Switch the front end to transmit and program the PA
    ///
    /// Valid in Standby only and does not change the mode; the radio becomes
    /// Transmitting once [`start_transmit`](Self::start_transmit) is accepted.
    pub fn config_hardware_for_send(&mut self) -> Result<(), RadioError> {
        self.require("config_hardware_for_send", &[RadioMode::Standby])?;
        self.disable_interrupt();
        self.set_rf_switch(true)?;

        let power = self.tx_power_dbm;
        let pa = PaSelection::for_output(power, self.config.is_2g4());
        self.with_bus(|lora| Ok(lora.configure_pa(pa, power)?))?;
        log::debug!("Hardware ready for send: {pa:?} at {power} dBm");
        Ok(())
    }

    /// Start transmitting `payload`
    ///
    /// Returns [`RadioError::Busy`] without waiting if the chip's BUSY line is
    /// asserted; retry policy belongs to the caller.
    pub fn start_transmit(&mut self, payload: &[u8]) -> Result<(), RadioError> {
        self.require("start_transmit", &[RadioMode::Standby])?;
        if payload.is_empty() {
            return Err(RadioError::EmptyPayload);
        }
        if payload.len() > MAX_PAYLOAD_LEN {
            return Err(RadioError::PayloadTooLarge {
                len: payload.len(),
                max: MAX_PAYLOAD_LEN,
            });
        }
        if self.with_bus(|lora| Ok(lora.is_busy()?))? {
            log::debug!("BUSY asserted, transmit not issued");
            return Err(RadioError::Busy);
        }

        self.config_hardware_for_send()?;
        self.with_bus(|lora| {
            lora.clear_irq_flags(IrqFlags::all())?;
            lora.start_transmit(payload)?;
            Ok(())
        })?;

        self.mode = RadioMode::Transmitting;
        let tx = self.isr.tx;
        self.enable_interrupt(tx);
        log::debug!(
            "Transmit started: {} bytes, ~{} us on air",
            payload.len(),
            self.config.time_on_air().packet_us(payload.len())
        );
        Ok(())
    }

    /// Handle the chip event behind an interrupt, from normal context
    ///
    /// Returns `Ok(None)` when the flags hold nothing to report for the
    /// current mode.
    pub fn service_irq(&mut self) -> Result<Option<RadioEvent>, RadioError> {
        self.require(
            "service_irq",
            &[
                RadioMode::Receiving,
                RadioMode::ActivelyReceiving,
                RadioMode::Transmitting,
            ],
        )?;
        self.lora.irq_line().take_pending();
        let flags = self.with_bus(|lora| Ok(lora.read_irq_flags()?))?;

        if self.mode == RadioMode::Transmitting {
            return self.service_transmit(flags);
        }
        // Header errors and RX timeouts end a reception without RX_DONE
        let failed =
            flags.is_corrupt() || (flags.contains(IrqFlags::TIMEOUT) && !flags.rx_done());
        if !flags.rx_done() && !failed {
            return Ok(None);
        }

        self.active_receive_start = None;
        self.mode = RadioMode::Receiving;

        if failed {
            self.with_bus(|lora| Ok(lora.clear_irq_flags(IrqFlags::all())?))?;
            log::warn!("Dropping failed reception, IRQ flags {flags:?}");
            return Ok(Some(RadioEvent::CorruptPacket { flags }));
        }

        let mut buf = [0u8; MAX_PAYLOAD_LEN];
        let len = self.with_bus(|lora| {
            let len = lora.read_packet(&mut buf)?;
            lora.clear_irq_flags(IrqFlags::all())?;
            Ok(len)
        })?;

        let mut packet = ReceivedPacket::new(buf[..len.min(MAX_PAYLOAD_LEN)].to_vec());
        self.add_receive_metadata(&mut packet);
        log::debug!(
            "Packet received: {} bytes, SNR {:?} dB, RSSI {:?} dBm",
            packet.len(),
            packet.metadata.snr_db,
            packet.metadata.rssi_dbm
        );
        Ok(Some(RadioEvent::PacketReceived(packet)))
    }

    fn service_transmit(&mut self, flags: IrqFlags) -> Result<Option<RadioEvent>, RadioError> {
        let event = if flags.tx_done() {
            RadioEvent::TransmitDone
        } else if flags.contains(IrqFlags::TIMEOUT) {
            log::warn!("Transmit timed out");
            RadioEvent::TransmitTimeout
        } else {
            return Ok(None);
        };

        // The chip falls back to standby on its own after TX_DONE or a timeout
        self.disable_interrupt();
        self.with_bus(|lora| Ok(lora.clear_irq_flags(IrqFlags::TX_MASK)?))?;
        self.mode = RadioMode::Standby;
        log::debug!("Radio mode: Transmitting -> Standby");
        Ok(Some(event))
    }

    // ========================== METADATA ==========================

    /// Attach SNR and RSSI of the last packet
    ///
    /// Never fails: a value the chip cannot report is left as `None`.
    pub fn add_receive_metadata(&mut self, packet: &mut ReceivedPacket) {
        if !self.mode.is_powered() {
            log::debug!("Chip not powered in {:?}, metadata left unknown", self.mode);
            return;
        }

        let reading = self
            .hal
            .lock_bus()
            .map(|_bus| (self.lora.read_snr(), self.lora.read_rssi()));

        match reading {
            Ok((snr, rssi)) => {
                packet.metadata.snr_db = match snr {
                    Ok(snr) => Some(snr),
                    Err(err) => {
                        log::warn!("SNR read failed: {err}");
                        None
                    }
                };
                packet.metadata.rssi_dbm = match rssi {
                    Ok(rssi) => Some(rssi.round() as i16),
                    Err(err) => {
                        log::warn!("RSSI read failed: {err}");
                        None
                    }
                };
            }
            Err(err) => {
                log::warn!("Bus unavailable for receive metadata: {err}");
                packet.metadata.snr_db = None;
                packet.metadata.rssi_dbm = None;
            }
        }
    }

    // ========================== INTERNALS ==========================

    fn require(&self, op: &'static str, allowed: &[RadioMode]) -> Result<(), RadioError> {
        if allowed.contains(&self.mode) {
            Ok(())
        } else {
            Err(RadioError::InvalidMode {
                op,
                mode: self.mode,
            })
        }
    }

    /// Run driver calls while holding the bus lock
    fn with_bus<R>(
        &mut self,
        op: impl FnOnce(&mut C) -> Result<R, RadioError>,
    ) -> Result<R, RadioError> {
        let _bus = self.hal.lock_bus()?;
        op(&mut self.lora)
    }

    fn apply_config(&mut self, base_setup: bool) -> Result<(), RadioError> {
        let config = self.config.clone();
        let power = clamp_power::<C::Variant>(&config);
        let preamble = effective_preamble(&config);
        if power != config.tx_power_dbm {
            log::warn!(
                "TX power {} dBm above {} limit, using {} dBm",
                config.tx_power_dbm,
                C::Variant::NAME,
                power
            );
        }

        let programmed = {
            let _bus = self.hal.lock_bus()?;
            program(&mut self.lora, &config, base_setup, power, preamble)
        };
        programmed.map_err(|err| match err {
            ChipError::InvalidParameter { .. } | ChipError::Rejected { .. } => {
                RadioError::InvalidParameter(err)
            }
            other => RadioError::Communication(other),
        })?;

        self.tx_power_dbm = power;
        self.preamble_length = preamble;
        self.update_timing();
        Ok(())
    }

    fn update_timing(&mut self) {
        let mut toa = self.config.time_on_air();
        toa.preamble_symbols = self.preamble_length;
        self.preamble_timeout = Duration::from_micros(2 * toa.preamble_us());
        self.max_packet_time = Duration::from_micros(toa.packet_us(MAX_PAYLOAD_LEN));
    }

    fn set_power_enable(&self, on: bool) -> Result<(), RadioError> {
        if let Some(pin) = self.pins.power_enable {
            self.hal.gpio_write(pin, on)?;
        }
        Ok(())
    }

    /// Drive the external RF switch, releasing the inactive path first
    fn set_rf_switch(&self, transmit: bool) -> Result<(), RadioError> {
        let (off, on) = if transmit {
            (self.pins.rx_enable, self.pins.tx_enable)
        } else {
            (self.pins.tx_enable, self.pins.rx_enable)
        };
        if let Some(pin) = off {
            self.hal.gpio_write(pin, false)?;
        }
        if let Some(pin) = on {
            self.hal.gpio_write(pin, true)?;
        }
        Ok(())
    }
}

impl<C: ChipDriver, H: Hal> Drop for Lr11x0Interface<C, H> {
    fn drop(&mut self) {
        self.disable_interrupt();
    }
}

fn program<C: ChipDriver>(
    lora: &mut C,
    config: &LoRaConfig,
    base_setup: bool,
    power: i8,
    preamble: u16,
) -> Result<(), ChipError> {
    if base_setup {
        if let Some(mv) = config.tcxo_voltage_mv {
            lora.set_tcxo(mv)?;
        }
        lora.set_regulator_dcdc(config.use_dcdc)?;
        lora.set_crc(config.crc_enabled)?;
        lora.set_rx_boosted_gain(config.rx_boosted_gain)?;
    }
    lora.set_frequency(config.frequency_hz)?;
    lora.set_bandwidth(config.bandwidth)?;
    lora.set_spreading_factor(config.spreading_factor)?;
    lora.set_coding_rate(config.coding_rate)?;
    lora.set_sync_word(config.sync_word)?;
    lora.set_preamble_length(preamble)?;
    lora.configure_pa(PaSelection::for_output(power, config.is_2g4()), power)
}

fn clamp_power<V: Variant>(config: &LoRaConfig) -> i8 {
    config.tx_power_dbm.min(V::max_power_dbm(config.is_2g4()))
}

fn effective_preamble(config: &LoRaConfig) -> u16 {
    if config.is_2g4() {
        PREAMBLE_LENGTH_2G4
    } else {
        config.preamble_length
    }
}
