use super::AddressingMode;
use once_cell::sync::Lazy;
use std::collections::HashMap;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Operation {
    Adc, And, Asl, Bcc, Bcs, Beq, Bit, Bmi, Bne, Bpl, Brk, Bvc, Bvs,
    Clc, Cld, Cli, Clv, Cmp, Cpx, Cpy, Dec, Dex, Dey, Eor, Inc, Inx,
    Iny, Jmp, Jsr, Lda, Ldx, Ldy, Lsr, Nop, Ora, Pha, Php, Pla, Plp,
    Rol, Ror, Rti, Rts, Sbc, Sec, Sed, Sei, Sta, Stx, Sty, Tax, Tay,
    Tsx, Txa, Txs, Tya,
}

pub struct Opcode {
    pub code: u8,
    pub op: Operation,
    pub mode: AddressingMode,
    pub len: u8,
    pub cycles: u8,
}

impl Opcode {
    pub const fn new(code: u8, op: Operation, mode: AddressingMode, len: u8, cycles: u8) -> Self {
        Self {
            code,
            op,
            mode,
            len,
            cycles,
        }
    }
}

use AddressingMode::*;
use Operation::*;

#[rustfmt::skip]
pub const OPCODES: &[Opcode] = &[
    Opcode::new(0x00, Brk, None,        2, 7),
    Opcode::new(0xEA, Nop, None,        1, 2),

    // Loads
    Opcode::new(0xA9, Lda, Immediate,   2, 2),
    Opcode::new(0xA5, Lda, ZeroPage,    2, 3),
    Opcode::new(0xB5, Lda, ZeroPageX,   2, 4),
    Opcode::new(0xAD, Lda, Absolute,    3, 4),
    Opcode::new(0xBD, Lda, AbsoluteX,   3, 4),
    Opcode::new(0xB9, Lda, AbsoluteY,   3, 4),
    Opcode::new(0xA1, Lda, IndirectX,   2, 6),
    Opcode::new(0xB1, Lda, IndirectY,   2, 5),

    Opcode::new(0xA2, Ldx, Immediate,   2, 2),
    Opcode::new(0xA6, Ldx, ZeroPage,    2, 3),
    Opcode::new(0xB6, Ldx, ZeroPageY,   2, 4),
    Opcode::new(0xAE, Ldx, Absolute,    3, 4),
    Opcode::new(0xBE, Ldx, AbsoluteY,   3, 4),

    Opcode::new(0xA0, Ldy, Immediate,   2, 2),
    Opcode::new(0xA4, Ldy, ZeroPage,    2, 3),
    Opcode::new(0xB4, Ldy, ZeroPageX,   2, 4),
    Opcode::new(0xAC, Ldy, Absolute,    3, 4),
    Opcode::new(0xBC, Ldy, AbsoluteX,   3, 4),

    // Stores
    Opcode::new(0x85, Sta, ZeroPage,    2, 3),
    Opcode::new(0x95, Sta, ZeroPageX,   2, 4),
    Opcode::new(0x8D, Sta, Absolute,    3, 4),
    Opcode::new(0x9D, Sta, AbsoluteX,   3, 5),
    Opcode::new(0x99, Sta, AbsoluteY,   3, 5),
    Opcode::new(0x81, Sta, IndirectX,   2, 6),
    Opcode::new(0x91, Sta, IndirectY,   2, 6),

    Opcode::new(0x86, Stx, ZeroPage,    2, 3),
    Opcode::new(0x96, Stx, ZeroPageY,   2, 4),
    Opcode::new(0x8E, Stx, Absolute,    3, 4),

    Opcode::new(0x84, Sty, ZeroPage,    2, 3),
    Opcode::new(0x94, Sty, ZeroPageX,   2, 4),
    Opcode::new(0x8C, Sty, Absolute,    3, 4),

    // Transfers
    Opcode::new(0xAA, Tax, None,        1, 2),
    Opcode::new(0xA8, Tay, None,        1, 2),
    Opcode::new(0xBA, Tsx, None,        1, 2),
    Opcode::new(0x8A, Txa, None,        1, 2),
    Opcode::new(0x9A, Txs, None,        1, 2),
    Opcode::new(0x98, Tya, None,        1, 2),

    // Stack
    Opcode::new(0x48, Pha, None,        1, 3),
    Opcode::new(0x68, Pla, None,        1, 4),
    Opcode::new(0x08, Php, None,        1, 3),
    Opcode::new(0x28, Plp, None,        1, 4),

    // Flags
    Opcode::new(0x18, Clc, None,        1, 2),
    Opcode::new(0xD8, Cld, None,        1, 2),
    Opcode::new(0x58, Cli, None,        1, 2),
    Opcode::new(0xB8, Clv, None,        1, 2),
    Opcode::new(0x38, Sec, None,        1, 2),
    Opcode::new(0xF8, Sed, None,        1, 2),
    Opcode::new(0x78, Sei, None,        1, 2),

    // Shifts
    Opcode::new(0x0A, Asl, Accumulator, 1, 2),
    Opcode::new(0x06, Asl, ZeroPage,    2, 5),
    Opcode::new(0x16, Asl, ZeroPageX,   2, 6),
    Opcode::new(0x0E, Asl, Absolute,    3, 6),
    Opcode::new(0x1E, Asl, AbsoluteX,   3, 7),

    Opcode::new(0x4A, Lsr, Accumulator, 1, 2),
    Opcode::new(0x46, Lsr, ZeroPage,    2, 5),
    Opcode::new(0x56, Lsr, ZeroPageX,   2, 6),
    Opcode::new(0x4E, Lsr, Absolute,    3, 6),
    Opcode::new(0x5E, Lsr, AbsoluteX,   3, 7),

    // Rotates
    Opcode::new(0x2A, Rol, Accumulator, 1, 2),
    Opcode::new(0x26, Rol, ZeroPage,    2, 5),
    Opcode::new(0x36, Rol, ZeroPageX,   2, 6),
    Opcode::new(0x2E, Rol, Absolute,    3, 5),
    Opcode::new(0x3E, Rol, AbsoluteX,   3, 7),

    Opcode::new(0x6A, Ror, Accumulator, 1, 2),
    Opcode::new(0x66, Ror, ZeroPage,    2, 5),
    Opcode::new(0x76, Ror, ZeroPageX,   2, 6),
    Opcode::new(0x6E, Ror, Absolute,    3, 6),
    Opcode::new(0x7E, Ror, AbsoluteX,   3, 7),

    // Increments / decrements
    Opcode::new(0xE6, Inc, ZeroPage,    2, 5),
    Opcode::new(0xF6, Inc, ZeroPageX,   2, 6),
    Opcode::new(0xEE, Inc, Absolute,    3, 6),
    Opcode::new(0xFE, Inc, AbsoluteX,   3, 7),
    Opcode::new(0xE8, Inx, None,        1, 2),
    Opcode::new(0xC8, Iny, None,        1, 2),

    Opcode::new(0xC6, Dec, ZeroPage,    2, 5),
    Opcode::new(0xD6, Dec, ZeroPageX,   2, 6),
    Opcode::new(0xCE, Dec, Absolute,    3, 6),
    Opcode::new(0xDE, Dec, AbsoluteX,   3, 7),
    Opcode::new(0xCA, Dex, None,        1, 2),
    Opcode::new(0x88, Dey, None,        1, 2),

    // Compares
    Opcode::new(0xC9, Cmp, Immediate,   2, 2),
    Opcode::new(0xC5, Cmp, ZeroPage,    2, 3),
    Opcode::new(0xD5, Cmp, ZeroPageX,   2, 4),
    Opcode::new(0xCD, Cmp, Absolute,    3, 4),
    Opcode::new(0xDD, Cmp, AbsoluteX,   3, 4),
    Opcode::new(0xD9, Cmp, AbsoluteY,   3, 4),
    Opcode::new(0xC1, Cmp, IndirectX,   2, 6),
    Opcode::new(0xD1, Cmp, IndirectY,   2, 5),

    Opcode::new(0xE0, Cpx, Immediate,   2, 2),
    Opcode::new(0xE4, Cpx, ZeroPage,    2, 3),
    Opcode::new(0xEC, Cpx, Absolute,    3, 4),

    Opcode::new(0xC0, Cpy, Immediate,   2, 2),
    Opcode::new(0xC4, Cpy, ZeroPage,    2, 3),
    Opcode::new(0xCC, Cpy, Absolute,    3, 4),

    // Arithmetic
    Opcode::new(0x69, Adc, Immediate,   2, 2),
    Opcode::new(0x65, Adc, ZeroPage,    2, 3),
    Opcode::new(0x75, Adc, ZeroPageX,   2, 4),
    Opcode::new(0x6D, Adc, Absolute,    3, 4),
    Opcode::new(0x7D, Adc, AbsoluteX,   3, 4),
    Opcode::new(0x79, Adc, AbsoluteY,   3, 4),
    Opcode::new(0x61, Adc, IndirectX,   2, 6),
    Opcode::new(0x71, Adc, IndirectY,   2, 5),

    Opcode::new(0xE9, Sbc, Immediate,   2, 2),
    Opcode::new(0xE5, Sbc, ZeroPage,    2, 3),
    Opcode::new(0xF5, Sbc, ZeroPageX,   2, 4),
    Opcode::new(0xED, Sbc, Absolute,    3, 4),
    Opcode::new(0xFD, Sbc, AbsoluteX,   3, 4),
    Opcode::new(0xF9, Sbc, AbsoluteY,   3, 4),
    Opcode::new(0xE1, Sbc, IndirectX,   2, 6),
    Opcode::new(0xF1, Sbc, IndirectY,   2, 5),

    // Logic
    Opcode::new(0x29, And, Immediate,   2, 2),
    Opcode::new(0x25, And, ZeroPage,    2, 3),
    Opcode::new(0x35, And, ZeroPageX,   2, 4),
    Opcode::new(0x2D, And, Absolute,    3, 4),
    Opcode::new(0x3D, And, AbsoluteX,   3, 4),
    Opcode::new(0x39, And, AbsoluteY,   3, 4),
    Opcode::new(0x21, And, IndirectX,   2, 6),
    Opcode::new(0x31, And, IndirectY,   2, 5),

    Opcode::new(0x49, Eor, Immediate,   2, 2),
    Opcode::new(0x45, Eor, ZeroPage,    2, 3),
    Opcode::new(0x55, Eor, ZeroPageX,   2, 4),
    Opcode::new(0x4D, Eor, Absolute,    3, 4),
    Opcode::new(0x5D, Eor, AbsoluteX,   3, 4),
    Opcode::new(0x59, Eor, AbsoluteY,   3, 4),
    Opcode::new(0x41, Eor, IndirectX,   2, 6),
    Opcode::new(0x51, Eor, IndirectY,   2, 5),

    Opcode::new(0x09, Ora, Immediate,   2, 2),
    Opcode::new(0x05, Ora, ZeroPage,    2, 3),
    Opcode::new(0x15, Ora, ZeroPageX,   2, 4),
    Opcode::new(0x0D, Ora, Absolute,    3, 4),
    Opcode::new(0x1D, Ora, AbsoluteX,   3, 4),
    Opcode::new(0x19, Ora, AbsoluteY,   3, 4),
    Opcode::new(0x01, Ora, IndirectX,   2, 6),
    Opcode::new(0x11, Ora, IndirectY,   2, 5),

    Opcode::new(0x24, Bit, ZeroPage,    2, 3),
    Opcode::new(0x2C, Bit, Absolute,    3, 4),

    // Control flow
    Opcode::new(0x4C, Jmp, Absolute,    3, 3),
    Opcode::new(0x6C, Jmp, Indirect,    3, 5),
    Opcode::new(0x20, Jsr, Absolute,    3, 6),
    Opcode::new(0x60, Rts, None,        1, 6),
    Opcode::new(0x40, Rti, None,        1, 6),

    // Branches: base cost is the not-taken case, a taken branch costs 3
    Opcode::new(0x90, Bcc, Relative,    2, 2),
    Opcode::new(0xB0, Bcs, Relative,    2, 2),
    Opcode::new(0xF0, Beq, Relative,    2, 2),
    Opcode::new(0x30, Bmi, Relative,    2, 2),
    Opcode::new(0xD0, Bne, Relative,    2, 2),
    Opcode::new(0x10, Bpl, Relative,    2, 2),
    Opcode::new(0x50, Bvc, Relative,    2, 2),
    Opcode::new(0x70, Bvs, Relative,    2, 2),
];

pub static OPCODES_MAP: Lazy<HashMap<u8, &'static Opcode>> = Lazy::new(|| {
    let mut map = HashMap::new();
    for opcode in OPCODES {
        map.insert(opcode.code, opcode);
    }
    map
});
