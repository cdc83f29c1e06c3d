//! Simulated LR11x0 hardware shared by the integration tests
//!
//! `SimHal` tracks whether the bus lock is held; `SimChip` records every driver
//! command, flags any that arrive without the lock, and exposes its internal
//! state so tests can inject IRQ flags, failures and packets.

#![allow(dead_code)]

use lr11x0_radio::radio::cad::CadParams;
use lr11x0_radio::{
    BusLock, ChipDriver, ChipError, ChipVersion, Bandwidth, CodingRate, Hal, HalError, IrqFlags,
    IrqLine, LoRaConfig, Lr1121, Lr11x0Interface, ModemPreset, PaSelection, Pin, PinAssignments,
    SpreadingFactor, Variant,
};
use std::cell::Cell;
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

pub const PIN_CS: Pin = 8;
pub const PIN_IRQ: Pin = 24;
pub const PIN_RESET: Pin = 22;
pub const PIN_BUSY: Pin = 25;
pub const PIN_TX_EN: Pin = 5;
pub const PIN_RX_EN: Pin = 6;
pub const PIN_POWER: Pin = 26;

pub fn test_pins() -> PinAssignments {
    PinAssignments::new(PIN_CS, PIN_IRQ, PIN_RESET, PIN_BUSY)
        .with_rf_switch(PIN_TX_EN, PIN_RX_EN)
        .with_power_enable(PIN_POWER)
}

/// Mock HAL: a real mutex plus a flag mirroring whether it is held
#[derive(Debug, Default)]
pub struct SimHal {
    bus: BusLock,
    locked: AtomicBool,
    lock_count: AtomicUsize,
    fail_lock: AtomicBool,
    fail_gpio: AtomicBool,
    gpio: Mutex<HashMap<Pin, bool>>,
    writes: Mutex<Vec<(Pin, bool)>>,
}

pub struct SimBusGuard<'a> {
    _inner: MutexGuard<'a, ()>,
    locked: &'a AtomicBool,
}

impl Drop for SimBusGuard<'_> {
    fn drop(&mut self) {
        self.locked.store(false, Ordering::SeqCst);
    }
}

impl SimHal {
    pub fn is_locked(&self) -> bool {
        self.locked.load(Ordering::SeqCst)
    }

    pub fn lock_count(&self) -> usize {
        self.lock_count.load(Ordering::SeqCst)
    }

    pub fn set_fail_lock(&self, fail: bool) {
        self.fail_lock.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_gpio(&self, fail: bool) {
        self.fail_gpio.store(fail, Ordering::SeqCst);
    }

    pub fn pin(&self, pin: Pin) -> Option<bool> {
        self.gpio.lock().unwrap().get(&pin).copied()
    }

    pub fn writes(&self) -> Vec<(Pin, bool)> {
        self.writes.lock().unwrap().clone()
    }
}

impl Hal for SimHal {
    type BusGuard<'a> = SimBusGuard<'a>;

    fn lock_bus(&self) -> Result<Self::BusGuard<'_>, HalError> {
        if self.fail_lock.load(Ordering::SeqCst) {
            return Err(HalError::Timeout);
        }
        let inner = self.bus.acquire()?;
        self.locked.store(true, Ordering::SeqCst);
        self.lock_count.fetch_add(1, Ordering::SeqCst);
        Ok(SimBusGuard {
            _inner: inner,
            locked: &self.locked,
        })
    }

    fn gpio_read(&self, pin: Pin) -> Result<bool, HalError> {
        Ok(self.pin(pin).unwrap_or(false))
    }

    fn gpio_write(&self, pin: Pin, high: bool) -> Result<(), HalError> {
        if self.fail_gpio.load(Ordering::SeqCst) {
            return Err(HalError::Gpio(pin));
        }
        self.gpio.lock().unwrap().insert(pin, high);
        self.writes.lock().unwrap().push((pin, high));
        Ok(())
    }
}

/// Observable and injectable chip state
#[derive(Debug)]
pub struct SimState {
    pub chip_type: u8,
    pub fail_identify: bool,
    pub reject_param: Option<&'static str>,
    pub fail_sleep: bool,
    pub reject_receive: bool,
    pub reject_transmit: bool,
    /// A packet completes in the window between clearing flags and arming the line
    pub packet_on_start: bool,
    pub fail_snr: bool,
    pub fail_rssi: bool,
    pub busy: bool,
    pub cad_result: bool,

    pub flags: IrqFlags,
    pub snr: f32,
    pub rssi: f32,
    pub rx_payload: Vec<u8>,

    pub calls: Vec<&'static str>,
    pub unlocked_calls: Vec<&'static str>,

    pub frequency_hz: Option<u32>,
    pub bandwidth: Option<Bandwidth>,
    pub spreading_factor: Option<SpreadingFactor>,
    pub coding_rate: Option<CodingRate>,
    pub sync_word: Option<u8>,
    pub preamble_length: Option<u16>,
    pub tcxo_mv: Option<u16>,
    pub pa: Option<(PaSelection, i8)>,
    pub rx_mask: Option<IrqFlags>,
    pub last_cad: Option<CadParams>,
    pub tx_payload: Vec<u8>,
    pub sleeping: bool,
    pub sleep_retain: Option<bool>,
    pub irq_attached_at_sleep: Option<bool>,
}

impl SimState {
    fn new(chip_type: u8) -> Self {
        Self {
            chip_type,
            fail_identify: false,
            reject_param: None,
            fail_sleep: false,
            reject_receive: false,
            reject_transmit: false,
            packet_on_start: false,
            fail_snr: false,
            fail_rssi: false,
            busy: false,
            cad_result: false,
            flags: IrqFlags::empty(),
            snr: 0.0,
            rssi: -120.0,
            rx_payload: Vec::new(),
            calls: Vec::new(),
            unlocked_calls: Vec::new(),
            frequency_hz: None,
            bandwidth: None,
            spreading_factor: None,
            coding_rate: None,
            sync_word: None,
            preamble_length: None,
            tcxo_mv: None,
            pa: None,
            rx_mask: None,
            last_cad: None,
            tx_payload: Vec::new(),
            sleeping: false,
            sleep_retain: None,
            irq_attached_at_sleep: None,
        }
    }

    pub fn count(&self, call: &str) -> usize {
        self.calls.iter().filter(|c| **c == call).count()
    }
}

/// Mock chip driver for variant `V`
pub struct SimChip<V: Variant> {
    state: Arc<Mutex<SimState>>,
    hal: Arc<SimHal>,
    line: Arc<IrqLine>,
    _variant: PhantomData<V>,
}

impl<V: Variant> SimChip<V> {
    pub fn new(hal: Arc<SimHal>) -> Self {
        Self {
            state: Arc::new(Mutex::new(SimState::new(V::CHIP_TYPE))),
            hal,
            line: Arc::new(IrqLine::new()),
            _variant: PhantomData,
        }
    }

    pub fn state(&self) -> Arc<Mutex<SimState>> {
        Arc::clone(&self.state)
    }

    pub fn line(&self) -> Arc<IrqLine> {
        Arc::clone(&self.line)
    }

    fn record(&self, call: &'static str) -> MutexGuard<'_, SimState> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call);
        if !self.hal.is_locked() {
            state.unlocked_calls.push(call);
        }
        state
    }

    fn check_param(state: &SimState, param: &'static str, value: i64) -> Result<(), ChipError> {
        if state.reject_param == Some(param) {
            return Err(ChipError::InvalidParameter { param, value });
        }
        Ok(())
    }
}

impl<V: Variant> ChipDriver for SimChip<V> {
    type Variant = V;

    fn attach(&mut self, _pins: &PinAssignments) -> Result<(), ChipError> {
        self.record("attach");
        Ok(())
    }

    fn reset(&mut self) -> Result<(), ChipError> {
        let mut state = self.record("reset");
        state.sleeping = false;
        state.flags = IrqFlags::empty();
        Ok(())
    }

    fn identify(&mut self) -> Result<ChipVersion, ChipError> {
        let state = self.record("identify");
        if state.fail_identify {
            return Err(ChipError::Timeout);
        }
        Ok(ChipVersion {
            hardware: 0x22,
            chip_type: state.chip_type,
            firmware: 0x0103,
        })
    }

    fn set_standby(&mut self) -> Result<(), ChipError> {
        let mut state = self.record("set_standby");
        state.sleeping = false;
        Ok(())
    }

    fn set_tcxo(&mut self, millivolts: u16) -> Result<(), ChipError> {
        let mut state = self.record("set_tcxo");
        state.tcxo_mv = Some(millivolts);
        Ok(())
    }

    fn set_regulator_dcdc(&mut self, _enabled: bool) -> Result<(), ChipError> {
        self.record("set_regulator_dcdc");
        Ok(())
    }

    fn set_crc(&mut self, _enabled: bool) -> Result<(), ChipError> {
        self.record("set_crc");
        Ok(())
    }

    fn set_rx_boosted_gain(&mut self, _enabled: bool) -> Result<(), ChipError> {
        self.record("set_rx_boosted_gain");
        Ok(())
    }

    fn set_frequency(&mut self, frequency_hz: u32) -> Result<(), ChipError> {
        let mut state = self.record("set_frequency");
        Self::check_param(&state, "frequency", i64::from(frequency_hz))?;
        state.frequency_hz = Some(frequency_hz);
        Ok(())
    }

    fn set_bandwidth(&mut self, bandwidth: Bandwidth) -> Result<(), ChipError> {
        let mut state = self.record("set_bandwidth");
        state.bandwidth = Some(bandwidth);
        Ok(())
    }

    fn set_spreading_factor(&mut self, sf: SpreadingFactor) -> Result<(), ChipError> {
        let mut state = self.record("set_spreading_factor");
        Self::check_param(&state, "spreading_factor", i64::from(sf.value()))?;
        state.spreading_factor = Some(sf);
        Ok(())
    }

    fn set_coding_rate(&mut self, cr: CodingRate) -> Result<(), ChipError> {
        let mut state = self.record("set_coding_rate");
        state.coding_rate = Some(cr);
        Ok(())
    }

    fn set_sync_word(&mut self, sync_word: u8) -> Result<(), ChipError> {
        let mut state = self.record("set_sync_word");
        state.sync_word = Some(sync_word);
        Ok(())
    }

    fn set_preamble_length(&mut self, symbols: u16) -> Result<(), ChipError> {
        let mut state = self.record("set_preamble_length");
        state.preamble_length = Some(symbols);
        Ok(())
    }

    fn configure_pa(&mut self, pa: PaSelection, power_dbm: i8) -> Result<(), ChipError> {
        let mut state = self.record("configure_pa");
        Self::check_param(&state, "power", i64::from(power_dbm))?;
        state.pa = Some((pa, power_dbm));
        Ok(())
    }

    fn start_receive(&mut self, irq_mask: IrqFlags) -> Result<(), ChipError> {
        let mut state = self.record("start_receive");
        if state.reject_receive {
            return Err(ChipError::Rejected { code: -2 });
        }
        state.rx_mask = Some(irq_mask);
        if state.packet_on_start {
            state.flags |= IrqFlags::RX_DONE;
        }
        Ok(())
    }

    fn start_transmit(&mut self, payload: &[u8]) -> Result<(), ChipError> {
        let mut state = self.record("start_transmit");
        if state.reject_transmit {
            return Err(ChipError::Rejected { code: -1 });
        }
        state.tx_payload = payload.to_vec();
        Ok(())
    }

    fn read_irq_flags(&mut self) -> Result<IrqFlags, ChipError> {
        let state = self.record("read_irq_flags");
        Ok(state.flags)
    }

    fn clear_irq_flags(&mut self, flags: IrqFlags) -> Result<(), ChipError> {
        let mut state = self.record("clear_irq_flags");
        state.flags.remove(flags);
        Ok(())
    }

    fn read_packet(&mut self, buf: &mut [u8]) -> Result<usize, ChipError> {
        let state = self.record("read_packet");
        let len = state.rx_payload.len().min(buf.len());
        buf[..len].copy_from_slice(&state.rx_payload[..len]);
        Ok(len)
    }

    fn read_snr(&mut self) -> Result<f32, ChipError> {
        let state = self.record("read_snr");
        if state.fail_snr {
            return Err(ChipError::Bus("SNR register read failed".into()));
        }
        Ok(state.snr)
    }

    fn read_rssi(&mut self) -> Result<f32, ChipError> {
        let state = self.record("read_rssi");
        if state.fail_rssi {
            return Err(ChipError::Bus("RSSI register read failed".into()));
        }
        Ok(state.rssi)
    }

    fn scan_channel(&mut self, params: &CadParams) -> Result<bool, ChipError> {
        let mut state = self.record("scan_channel");
        state.last_cad = Some(*params);
        Ok(state.cad_result)
    }

    fn is_busy(&mut self) -> Result<bool, ChipError> {
        let state = self.record("is_busy");
        Ok(state.busy)
    }

    fn sleep(&mut self, retain_config: bool) -> Result<(), ChipError> {
        let attached = self.line.is_attached();
        let mut state = self.record("sleep");
        state.irq_attached_at_sleep = Some(attached);
        if state.fail_sleep {
            return Err(ChipError::Timeout);
        }
        state.sleeping = true;
        state.sleep_retain = Some(retain_config);
        Ok(())
    }

    fn irq_line(&self) -> &IrqLine {
        &self.line
    }
}

pub type SimRadio<V = Lr1121> = Lr11x0Interface<SimChip<V>, SimHal>;

/// Adapter plus handles on its simulated hardware
pub struct Rig<V: Variant = Lr1121> {
    pub radio: SimRadio<V>,
    pub state: Arc<Mutex<SimState>>,
    pub hal: Arc<SimHal>,
    pub line: Arc<IrqLine>,
}

impl<V: Variant> Rig<V> {
    pub fn for_variant(config: LoRaConfig) -> Self {
        let hal = Arc::new(SimHal::default());
        let chip = SimChip::<V>::new(Arc::clone(&hal));
        let state = chip.state();
        let line = chip.line();
        let radio = Lr11x0Interface::new(chip, Arc::clone(&hal), test_pins(), config);
        Self {
            radio,
            state,
            hal,
            line,
        }
    }

    pub fn sim(&self) -> MutexGuard<'_, SimState> {
        self.state.lock().unwrap()
    }

    pub fn call_count(&self) -> usize {
        self.sim().calls.len()
    }

    /// Chip finished receiving `payload`; the IRQ pin rises
    pub fn deliver_packet(&self, payload: &[u8], snr: f32, rssi: f32) {
        {
            let mut state = self.sim();
            state.rx_payload = payload.to_vec();
            state.snr = snr;
            state.rssi = rssi;
            state.flags |= IrqFlags::PREAMBLE_DETECTED | IrqFlags::HEADER_VALID | IrqFlags::RX_DONE;
        }
        self.line.on_edge();
    }

    /// Chip finished transmitting; the IRQ pin rises
    pub fn complete_transmit(&self) {
        self.sim().flags |= IrqFlags::TX_DONE;
        self.line.on_edge();
    }
}

impl Rig<Lr1121> {
    pub fn new() -> Self {
        Self::with_config(LoRaConfig::default())
    }

    pub fn with_config(config: LoRaConfig) -> Self {
        Self::for_variant(config)
    }

    /// Short symbols so false-detection windows expire within a test
    pub fn fast() -> Self {
        Self::with_config(LoRaConfig::from_preset(ModemPreset::ShortTurbo, 915_000_000))
    }
}

/// Initialized rig in Standby
pub fn ready_rig() -> Rig<Lr1121> {
    let mut rig = Rig::new();
    rig.radio.init().expect("init");
    rig
}

// Per-thread callback counters; each #[test] runs on its own thread.
thread_local! {
    static HITS_A: Cell<u32> = Cell::new(0);
    static HITS_B: Cell<u32> = Cell::new(0);
}

pub fn callback_a() {
    HITS_A.with(|hits| hits.set(hits.get() + 1));
}

pub fn callback_b() {
    HITS_B.with(|hits| hits.set(hits.get() + 1));
}

pub fn hits_a() -> u32 {
    HITS_A.with(|hits| hits.get())
}

pub fn hits_b() -> u32 {
    HITS_B.with(|hits| hits.get())
}
