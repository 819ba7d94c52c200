pub mod cartridge;
pub mod controller;
pub mod cpu;
pub mod ppu;
pub mod video;

#[cfg(test)]
mod nes_tests;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use cartridge::{Rom, RomError};
use controller::InputSource;
use cpu::{CPU, CpuBus, CpuError};
use ppu::{PPU, TickEvent};
use video::DisplaySink;

/// The picture core advances three dots for every processor cycle.
/// This ratio is the NTSC timing approximation and must hold exactly;
/// drift compounds across frames.
pub const PPU_TICKS_PER_CPU_CYCLE: u64 = 3;

/// Cloneable cooperative stop flag. Hand one to the host (e.g. a signal
/// handler); the core polls it once per executed instruction.
#[derive(Clone)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    fn new() -> Self {
        StopSignal(Arc::new(AtomicBool::new(false)))
    }

    pub fn request_stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn stop_requested(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

pub struct NES {
    pub cpu: CPU,
    pub ppu: PPU,
    input_1: Box<dyn InputSource>,
    input_2: Box<dyn InputSource>,
    sink: Box<dyn DisplaySink>,
    stop: StopSignal,
}

impl NES {
    pub fn new(
        sink: Box<dyn DisplaySink>,
        input_1: Box<dyn InputSource>,
        input_2: Box<dyn InputSource>,
    ) -> Self {
        NES {
            cpu: CPU::new(),
            ppu: PPU::new(),
            input_1,
            input_2,
            sink,
            stop: StopSignal::new(),
        }
    }

    /// Boot sequencing: copy the cartridge streams into both address
    /// spaces, latch the vectors, then reset every component.
    pub fn insert_cartridge(&mut self, rom: &Rom) {
        self.cpu.clear_memory();
        self.cpu.load_prg_rom(rom);
        self.cpu.load_vector_table();
        self.cpu.reset();

        self.ppu.clear_memory();
        self.ppu.load_chr_rom(rom);
        self.ppu.reset();

        self.input_1.reset();
        self.input_2.reset();
    }

    /// Parse a raw cartridge image and boot from it.
    pub fn load_rom(&mut self, raw: &[u8]) -> Result<(), RomError> {
        let rom = Rom::parse(raw)?;
        self.insert_cartridge(&rom);
        Ok(())
    }

    pub fn stop_handle(&self) -> StopSignal {
        self.stop.clone()
    }

    /// Run until the picture core finishes the current frame, then
    /// composite sprites and hand the frame to the display sink.
    ///
    /// One iteration executes exactly one instruction and then ticks the
    /// picture core up to three dots per consumed processor cycle,
    /// dispatching the vblank interrupt at (scanline 241, dot 1) when
    /// enabled.
    pub fn run_frame(&mut self) -> Result<(), CpuError> {
        loop {
            if self.stop.stop_requested() {
                return Ok(());
            }

            self.cpu.cycles = 0;
            self.ppu.cycles = 0;

            {
                let mut bus = CpuBus {
                    ppu: &mut self.ppu,
                    input_1: self.input_1.as_mut(),
                    input_2: self.input_2.as_mut(),
                };
                self.cpu.execute_instruction(&mut bus)?;
            }

            let mut frame_done = false;
            while self.ppu.cycles < self.cpu.cycles * PPU_TICKS_PER_CPU_CYCLE {
                match self.ppu.tick() {
                    TickEvent::VblankStart => {
                        if self.ppu.nmi_enabled() {
                            let vector = self.cpu.vectors.nmi;
                            self.cpu.trigger_interrupt(vector);
                        }
                    }
                    TickEvent::FrameEnd => {
                        frame_done = true;
                        break;
                    }
                    TickEvent::None => {}
                }
            }

            if frame_done {
                break;
            }
        }

        self.ppu.composite_frame();
        self.sink.present(self.ppu.frame());
        Ok(())
    }

    /// Frame loop: `run_frame` until the stop signal is raised, yielding
    /// to `on_frame` after each presented frame. The host owns the
    /// re-arm cadence.
    pub fn run<F: FnMut()>(&mut self, mut on_frame: F) -> Result<(), CpuError> {
        while !self.stop.stop_requested() {
            self.run_frame()?;
            on_frame();
        }
        log::info!("stop requested, leaving frame loop");
        Ok(())
    }
}
