use bitflags::bitflags;
use thiserror::Error;

use crate::nes::cartridge::Rom;
use crate::nes::controller::InputSource;
use crate::nes::ppu::PPU;

mod instruction_handlers;
pub mod opcodes;


const CPU_MEMORY_SIZE: usize = 0x10000;
const CPU_STACK_BASE: u16 = 0x0100;
const CPU_STACK_RESET: u8 = 0xFF;

const NMI_VECTOR: u16 = 0xFFFA;
const RESET_VECTOR: u16 = 0xFFFC;
const IRQ_VECTOR: u16 = 0xFFFE;

const PRG_ROM_LOW_BANK: usize = 0x8000;
const PRG_ROM_HIGH_BANK: usize = 0xC000;

bitflags! {
    /* https://www.nesdev.org/wiki/Status_flags
            7  bit  0
        ---- ----
        NV1B DIZC
        |||| ||||
        |||| |||+- Carry
        |||| ||+-- Zero
        |||| |+--- Interrupt Disable
        |||| +---- Decimal
        |||+------ (No CPU effect; see: the B flag)
        ||+------- (No CPU effect; always pushed as 1)
        |+-------- Overflow
        +--------- Negative
     */
    #[derive(Debug, Clone, Copy)]
    pub struct Flags: u8 {
        const CARRY             = 1 << 0;
        const ZERO              = 1 << 1;
        const INTERRUPT_DISABLE = 1 << 2;
        const DECIMAL_MODE      = 1 << 3;
        const BREAK             = 1 << 4;
        const BREAK2            = 1 << 5;
        const OVERFLOW          = 1 << 6;
        const NEGATIVE          = 1 << 7;
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AddressingMode {
    Immediate,
    ZeroPage,
    ZeroPageX,
    ZeroPageY,
    Absolute,
    AbsoluteX,
    AbsoluteY,
    Indirect,  // Only JMP supports this mode
    IndirectX,
    IndirectY,
    Relative,    // The branch instructions exclusively use this mode
    Accumulator, // Shift/rotate register variants
    None,
}

#[derive(Debug, Error)]
pub enum CpuError {
    #[error("unknown opcode {opcode:#04x} at pc {pc:#06x}")]
    UnknownOpcode { opcode: u8, pc: u16 },
}

/// Interrupt vectors, latched from the fixed vector addresses at boot.
#[derive(Debug, Default, Copy, Clone)]
pub struct VectorTable {
    pub nmi: u16,
    pub reset: u16,
    pub irq: u16,
}

/// Mutable peripheral borrows for one instruction: the picture core and
/// the two serial input sources reachable through memory-mapped I/O.
pub struct CpuBus<'a> {
    pub ppu: &'a mut PPU,
    pub input_1: &'a mut dyn InputSource,
    pub input_2: &'a mut dyn InputSource,
}

pub struct CPU {
    pub register_a: u8,
    pub register_x: u8,
    pub register_y: u8,
    pub stack_pointer: u8,
    pub status: Flags,
    pub program_counter: u16,
    pub cycles: u64,
    pub vectors: VectorTable,

    memory: Box<[u8; CPU_MEMORY_SIZE]>,
    skip_pc_advance: bool,
}

impl CPU {
    pub fn new() -> CPU {
        CPU {
            register_a: 0,
            register_x: 0,
            register_y: 0,
            stack_pointer: CPU_STACK_RESET,
            status: Flags::BREAK2,
            program_counter: 0,
            cycles: 0,
            vectors: VectorTable::default(),
            memory: Box::new([0; CPU_MEMORY_SIZE]),
            skip_pc_advance: false,
        }
    }

    pub fn clear_memory(&mut self) {
        self.memory.fill(0);
    }

    /// Copy the PRG stream into the address space: 0x8000 when the
    /// cartridge carries more than one bank, else 0xC000.
    pub fn load_prg_rom(&mut self, rom: &Rom) {
        let start = if rom.prg_banks > 1 {
            PRG_ROM_LOW_BANK
        } else {
            PRG_ROM_HIGH_BANK
        };
        let len = rom.prg_rom.len().min(CPU_MEMORY_SIZE - start);
        self.memory[start..start + len].copy_from_slice(&rom.prg_rom[..len]);
    }

    /// Latch the NMI/reset/IRQ vectors from their fixed addresses.
    pub fn load_vector_table(&mut self) {
        self.vectors.nmi = self.fetch_u16(NMI_VECTOR);
        self.vectors.reset = self.fetch_u16(RESET_VECTOR);
        self.vectors.irq = self.fetch_u16(IRQ_VECTOR);
        log::info!(
            "vectors: nmi={:#06x} reset={:#06x} irq={:#06x}",
            self.vectors.nmi,
            self.vectors.reset,
            self.vectors.irq
        );
    }

    pub fn reset(&mut self) {
        self.register_a = 0;
        self.register_x = 0;
        self.register_y = 0;
        self.stack_pointer = CPU_STACK_RESET;
        self.status = Flags::BREAK2;
        self.program_counter = self.vectors.reset;
        self.cycles = 0;
        self.skip_pc_advance = false;
    }

    /// Copy a raw program into memory. Test scaffolding for driving the
    /// CPU without a cartridge.
    pub fn load_program_at(&mut self, program: &[u8], address: u16) {
        let start = address as usize;
        self.memory[start..start + program.len()].copy_from_slice(program);
    }

    pub fn fetch_byte(&self, address: u16) -> u8 {
        self.memory[address as usize]
    }

    pub fn fetch_u16(&self, address: u16) -> u16 {
        let lo = self.fetch_byte(address) as u16;
        let hi = self.fetch_byte(address.wrapping_add(1)) as u16;
        hi << 8 | lo
    }

    /// Fetch, decode and execute the instruction at the program counter.
    /// Returns the instruction's base cycle cost; the cycle counter also
    /// absorbs side costs such as OAM DMA.
    pub fn execute_instruction(&mut self, bus: &mut CpuBus) -> Result<u8, CpuError> {
        use opcodes::Operation::*;

        let code = self.fetch_byte(self.program_counter);
        let opcode = *opcodes::OPCODES_MAP
            .get(&code)
            .ok_or(CpuError::UnknownOpcode {
                opcode: code,
                pc: self.program_counter,
            })?;

        self.skip_pc_advance = false;
        let mut cycles = opcode.cycles;

        match opcode.op {
            Adc => self.adc(opcode, bus),
            And => self.and(opcode, bus),
            Asl => self.asl(opcode, bus),
            Bit => self.bit(opcode, bus),
            Brk => self.brk(),
            Clc => self.clc(),
            Cld => self.cld(),
            Cli => self.cli(),
            Clv => self.clv(),
            Cmp => self.cmp(opcode, bus),
            Cpx => self.cpx(opcode, bus),
            Cpy => self.cpy(opcode, bus),
            Dec => self.dec(opcode, bus),
            Dex => self.dex(),
            Dey => self.dey(),
            Eor => self.eor(opcode, bus),
            Inc => self.inc(opcode, bus),
            Inx => self.inx(),
            Iny => self.iny(),
            Jmp => self.jmp(opcode),
            Jsr => self.jsr(opcode),
            Lda => self.lda(opcode, bus),
            Ldx => self.ldx(opcode, bus),
            Ldy => self.ldy(opcode, bus),
            Lsr => self.lsr(opcode, bus),
            Nop => {}
            Ora => self.ora(opcode, bus),
            Pha => self.pha(),
            Php => self.php(),
            Pla => self.pla(),
            Plp => self.plp(),
            Rol => self.rol(opcode, bus),
            Ror => self.ror(opcode, bus),
            Rti => self.rti(),
            Rts => self.rts(),
            Sbc => self.sbc(opcode, bus),
            Sec => self.sec(),
            Sed => self.sed(),
            Sei => self.sei(),
            Sta => self.sta(opcode, bus),
            Stx => self.stx(opcode, bus),
            Sty => self.sty(opcode, bus),
            Tax => self.tax(),
            Tay => self.tay(),
            Tsx => self.tsx(),
            Txa => self.txa(),
            Txs => self.txs(),
            Tya => self.tya(),

            Bcc => cycles = self.branch(!self.status.contains(Flags::CARRY)),
            Bcs => cycles = self.branch(self.status.contains(Flags::CARRY)),
            Beq => cycles = self.branch(self.status.contains(Flags::ZERO)),
            Bmi => cycles = self.branch(self.status.contains(Flags::NEGATIVE)),
            Bne => cycles = self.branch(!self.status.contains(Flags::ZERO)),
            Bpl => cycles = self.branch(!self.status.contains(Flags::NEGATIVE)),
            Bvc => cycles = self.branch(!self.status.contains(Flags::OVERFLOW)),
            Bvs => cycles = self.branch(self.status.contains(Flags::OVERFLOW)),
        }

        if !self.skip_pc_advance {
            self.program_counter = self.program_counter.wrapping_add(opcode.len as u16);
        }
        self.cycles += cycles as u64;
        Ok(cycles)
    }

    /// Push the program counter and status, disable interrupts and jump
    /// through `vector`. Costs 7 cycles. Raised by the scheduler at
    /// vblank start.
    pub fn trigger_interrupt(&mut self, vector: u16) {
        log::trace!(
            "interrupt: pc={:#06x} -> {:#06x}",
            self.program_counter,
            vector
        );
        self.stack_push_u16(self.program_counter);
        self.stack_push(self.status.bits());
        self.status.insert(Flags::INTERRUPT_DISABLE);
        self.program_counter = vector;
        self.cycles += 7;
    }

    // Memory access
    //////////////////

    /// Read through the memory-mapped peripheral table; plain memory
    /// everywhere else.
    fn mem_read(&mut self, address: u16, bus: &mut CpuBus) -> u8 {
        let value = match address {
            0x2002 | 0x2004 | 0x2007 => bus.ppu.read_register(address),
            0x4016 => bus.input_1.read(),
            0x4017 => bus.input_2.read(),
            _ => return self.memory[address as usize],
        };
        self.memory[address as usize] = value;
        value
    }

    /// Write memory and forward peripheral addresses. An OAM DMA write
    /// copies a full page into the picture core and costs 512 cycles.
    fn mem_write(&mut self, address: u16, value: u8, bus: &mut CpuBus) {
        self.memory[address as usize] = value;
        match address {
            0x2000..=0x2007 => bus.ppu.write_register(address, value),
            0x4014 => {
                let page = (value as usize) << 8;
                for offset in 0..=0xFF {
                    bus.ppu.write_register(0x4014, self.memory[page + offset]);
                }
                self.cycles += 512;
            }
            0x4016 => {
                bus.input_1.write(value);
                bus.input_2.write(value);
            }
            _ => {}
        }
    }

    /// Resolve the memory operand address for the instruction at the
    /// program counter.
    fn get_parameter_address(&self, mode: AddressingMode) -> u16 {
        let operand = self.program_counter.wrapping_add(1);
        match mode {
            AddressingMode::Immediate => operand,
            AddressingMode::ZeroPage => self.fetch_byte(operand) as u16,
            AddressingMode::ZeroPageX => {
                self.fetch_byte(operand).wrapping_add(self.register_x) as u16
            }
            AddressingMode::ZeroPageY => {
                self.fetch_byte(operand).wrapping_add(self.register_y) as u16
            }
            AddressingMode::Absolute => self.fetch_u16(operand),
            AddressingMode::AbsoluteX => {
                self.fetch_u16(operand).wrapping_add(self.register_x as u16)
            }
            AddressingMode::AbsoluteY => {
                self.fetch_u16(operand).wrapping_add(self.register_y as u16)
            }
            AddressingMode::Indirect => {
                /* An original 6502 does not correctly fetch the target
                   address if the indirect vector falls on a page boundary
                   ($xxFF): the LSB comes from $xxFF as expected but the
                   MSB is taken from $xx00. */
                let pointer = self.fetch_u16(operand);
                let lo = self.fetch_byte(pointer) as u16;
                let hi = if pointer & 0x00FF == 0x00FF {
                    self.fetch_byte(pointer & 0xFF00) as u16
                } else {
                    self.fetch_byte(pointer.wrapping_add(1)) as u16
                };
                hi << 8 | lo
            }
            AddressingMode::IndirectX => {
                let base = self.fetch_byte(operand).wrapping_add(self.register_x);
                let lo = self.fetch_byte(base as u16) as u16;
                let hi = self.fetch_byte(base.wrapping_add(1) as u16) as u16;
                hi << 8 | lo
            }
            AddressingMode::IndirectY => {
                let base = self.fetch_byte(operand);
                let lo = self.fetch_byte(base as u16) as u16;
                let hi = self.fetch_byte(base.wrapping_add(1) as u16) as u16;
                (hi << 8 | lo).wrapping_add(self.register_y as u16)
            }
            mode => unreachable!("no memory operand for {:?}", mode),
        }
    }

    // Register / flag helpers
    ////////////////////////////

    fn set_register_a(&mut self, value: u8) {
        self.register_a = value;
        self.update_zero_and_negative_flags(value);
    }

    fn set_register_x(&mut self, value: u8) {
        self.register_x = value;
        self.update_zero_and_negative_flags(value);
    }

    fn set_register_y(&mut self, value: u8) {
        self.register_y = value;
        self.update_zero_and_negative_flags(value);
    }

    fn set_program_counter(&mut self, address: u16) {
        self.program_counter = address;
        self.skip_pc_advance = true;
    }

    fn update_zero_and_negative_flags(&mut self, result: u8) {
        self.status.set(Flags::ZERO, result == 0);
        self.status.set(Flags::NEGATIVE, result & 0x80 != 0);
    }

    // Stack
    //////////

    fn stack_push(&mut self, value: u8) {
        let address = CPU_STACK_BASE.wrapping_add(self.stack_pointer as u16);
        self.memory[address as usize] = value;
        self.stack_pointer = self.stack_pointer.wrapping_sub(1);
    }

    fn stack_push_u16(&mut self, value: u16) {
        self.stack_push((value >> 8) as u8);
        self.stack_push(value as u8);
    }

    fn stack_pop(&mut self) -> u8 {
        self.stack_pointer = self.stack_pointer.wrapping_add(1);
        self.fetch_byte(CPU_STACK_BASE.wrapping_add(self.stack_pointer as u16))
    }

    fn stack_pop_u16(&mut self) -> u16 {
        let lo = self.stack_pop() as u16;
        let hi = self.stack_pop() as u16;
        hi << 8 | lo
    }
}

impl Default for CPU {
    fn default() -> Self {
        Self::new()
    }
}
