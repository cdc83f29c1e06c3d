//! # LR11x0 Radio Support
//!
//! Layering used by the adapter:
//! ```text
//! ┌─────────────────────────────────┐
//! │   Mesh stack / base interface   │
//! ├─────────────────────────────────┤
//! │  Lr11x0Interface (interface.rs) │
//! ├─────────────────────────────────┤
//! │   ChipDriver  +  IrqLine (irq)  │
//! ├─────────────────────────────────┤
//! │ HAL: bus lock + board GPIO      │
//! └─────────────────────────────────┘
//! ```

pub mod cad;
pub mod chip;
pub mod hal;
pub mod interface;
pub mod irq;
pub mod modulation;
pub mod packet;
