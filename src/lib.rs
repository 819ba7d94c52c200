// NES core modules
pub mod nes;

// Re-exports
pub use nes::NES;
pub use nes::cartridge::{Rom, RomError};
pub use nes::controller::{Buttons, InputSource, Joypad};
pub use nes::cpu::CpuError;
pub use nes::video::{DisplaySink, Frame, NullSink};
