use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::cartridge::{CHR_ROM_BANK_SIZE, PRG_ROM_BANK_SIZE};
use super::cpu::CpuBus;
use super::ppu::{PpuStatus, TickEvent};
use super::video::{DisplaySink, Frame, NullSink};
use super::*;
use crate::nes::controller::Joypad;

struct CountingSink(Arc<AtomicUsize>);

impl DisplaySink for CountingSink {
    fn present(&mut self, _frame: &Frame) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

/// Build a bootable single-bank image: the reset handler spins at $C000
/// and the NMI handler counts interrupts in $10.
fn test_image(prg_banks: u8) -> Vec<u8> {
    let mut prg = vec![0u8; prg_banks as usize * PRG_ROM_BANK_SIZE];

    // Reset target: JMP $C000
    prg[0x0000] = 0x4C;
    prg[0x0001] = 0x00;
    prg[0x0002] = 0xC0;

    // NMI handler at $C020: INC $10; RTI
    prg[0x0020] = 0xE6;
    prg[0x0021] = 0x10;
    prg[0x0022] = 0x40;

    // Vectors live in the last bank
    let vectors = prg.len() - 6;
    prg[vectors] = 0x20; // NMI  -> $C020
    prg[vectors + 1] = 0xC0;
    prg[vectors + 2] = 0x00; // reset -> $C000
    prg[vectors + 3] = 0xC0;

    let mut raw = Vec::new();
    raw.extend_from_slice(b"NES\x1A");
    raw.extend_from_slice(&[prg_banks, 1]);
    raw.resize(16, 0);
    raw.extend_from_slice(&prg);

    let mut chr = vec![0u8; CHR_ROM_BANK_SIZE];
    chr[0] = 0xAB;
    raw.extend_from_slice(&chr);
    raw
}

fn test_nes(sink: Box<dyn DisplaySink>) -> NES {
    NES::new(sink, Box::new(Joypad::new()), Box::new(Joypad::new()))
}

#[test]
fn test_boot_single_bank_loads_prg_at_c000() {
    let mut nes = test_nes(Box::new(NullSink));
    nes.load_rom(&test_image(1)).unwrap();

    assert_eq!(nes.cpu.fetch_byte(0xC000), 0x4C);
    assert_eq!(nes.cpu.fetch_byte(0x8000), 0x00);
    assert_eq!(nes.cpu.program_counter, 0xC000);
    assert_eq!(nes.cpu.vectors.nmi, 0xC020);
}

#[test]
fn test_boot_double_bank_loads_prg_at_8000() {
    let mut nes = test_nes(Box::new(NullSink));
    // With two banks the stream starts at $8000; the reset vector at the
    // top of the space still points into it
    let mut image = test_image(2);
    // Vector bytes sit at the end of the 32KB stream -> $8000 base
    let len = image.len();
    let chr_len = CHR_ROM_BANK_SIZE;
    image[len - chr_len - 4] = 0x00; // reset -> $8000
    image[len - chr_len - 3] = 0x80;
    nes.load_rom(&image).unwrap();

    assert_eq!(nes.cpu.fetch_byte(0x8000), 0x4C);
    assert_eq!(nes.cpu.program_counter, 0x8000);
}

#[test]
fn test_boot_copies_chr_into_picture_memory() {
    let mut nes = test_nes(Box::new(NullSink));
    nes.load_rom(&test_image(1)).unwrap();
    assert_eq!(nes.ppu.read_memory(0x0000), 0xAB);
}

#[test]
fn test_bad_image_is_rejected() {
    let mut nes = test_nes(Box::new(NullSink));
    let mut image = test_image(1);
    image[0] = b'X';
    assert!(nes.load_rom(&image).is_err());
}

#[test]
fn test_run_frame_presents_exactly_once() {
    let presented = Arc::new(AtomicUsize::new(0));
    let mut nes = test_nes(Box::new(CountingSink(presented.clone())));
    nes.load_rom(&test_image(1)).unwrap();

    nes.run_frame().unwrap();
    assert_eq!(presented.load(Ordering::SeqCst), 1);
    nes.run_frame().unwrap();
    assert_eq!(presented.load(Ordering::SeqCst), 2);
}

#[test]
fn test_nmi_fires_once_per_frame_when_enabled() {
    let mut nes = test_nes(Box::new(NullSink));
    nes.load_rom(&test_image(1)).unwrap();
    nes.ppu.write_register(0x2000, 0x80); // enable the vblank interrupt

    // The frame in flight after reset ends before vblank is reached
    nes.run_frame().unwrap();
    assert_eq!(nes.cpu.fetch_byte(0x0010), 0);

    nes.run_frame().unwrap();
    assert_eq!(nes.cpu.fetch_byte(0x0010), 1);

    nes.run_frame().unwrap();
    assert_eq!(nes.cpu.fetch_byte(0x0010), 2);
}

#[test]
fn test_nmi_does_not_fire_when_disabled() {
    let mut nes = test_nes(Box::new(NullSink));
    nes.load_rom(&test_image(1)).unwrap();

    for _ in 0..3 {
        nes.run_frame().unwrap();
    }
    assert_eq!(nes.cpu.fetch_byte(0x0010), 0);
}

#[test]
fn test_vblank_flag_rises_at_scanline_241_dot_1() {
    let mut nes = test_nes(Box::new(NullSink));
    nes.load_rom(&test_image(1)).unwrap();
    nes.ppu.write_register(0x2000, 0x80);

    // Drive the interleaving by hand to observe the vblank edge
    let mut pad_1 = Joypad::new();
    let mut pad_2 = Joypad::new();
    let mut saw_vblank_start = false;
    'outer: for _ in 0..100_000 {
        nes.cpu.cycles = 0;
        nes.ppu.cycles = 0;
        {
            let mut bus = CpuBus {
                ppu: &mut nes.ppu,
                input_1: &mut pad_1,
                input_2: &mut pad_2,
            };
            nes.cpu.execute_instruction(&mut bus).unwrap();
        }
        while nes.ppu.cycles < nes.cpu.cycles * PPU_TICKS_PER_CPU_CYCLE {
            match nes.ppu.tick() {
                TickEvent::VblankStart => {
                    saw_vblank_start = true;
                    break 'outer;
                }
                TickEvent::FrameEnd => break,
                TickEvent::None => {}
            }
        }
    }

    assert!(saw_vblank_start);
    assert_eq!((nes.ppu.scanline, nes.ppu.dot), (241, 1));
    assert!(nes.ppu.status.contains(PpuStatus::VBLANK));
}

#[test]
fn test_unknown_opcode_surfaces_from_run_frame() {
    let mut nes = test_nes(Box::new(NullSink));
    let mut image = test_image(1);
    image[16] = 0xFF; // reset target now holds an undecodable byte
    nes.load_rom(&image).unwrap();

    assert!(nes.run_frame().is_err());
}

#[test]
fn test_stop_signal_ends_run_loop() {
    let presented = Arc::new(AtomicUsize::new(0));
    let mut nes = test_nes(Box::new(CountingSink(presented.clone())));
    nes.load_rom(&test_image(1)).unwrap();

    let stop = nes.stop_handle();
    let mut frames = 0;
    nes.run(|| {
        frames += 1;
        if frames == 3 {
            stop.request_stop();
        }
    })
    .unwrap();

    assert_eq!(frames, 3);
    assert_eq!(presented.load(Ordering::SeqCst), 3);
}

#[test]
fn test_stop_requested_before_run_is_immediate() {
    let mut nes = test_nes(Box::new(NullSink));
    nes.load_rom(&test_image(1)).unwrap();

    nes.stop_handle().request_stop();
    nes.run(|| panic!("frame callback should not run")).unwrap();
}
