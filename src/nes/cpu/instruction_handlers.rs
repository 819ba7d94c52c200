use super::opcodes::Opcode;
use super::{AddressingMode, CPU, CpuBus, Flags};

impl CPU {
    //
    // Loads
    //////////

    pub(super) fn lda(&mut self, opcode: &Opcode, bus: &mut CpuBus) {
        let address = self.get_parameter_address(opcode.mode);
        let value = self.mem_read(address, bus);
        self.set_register_a(value);
    }

    pub(super) fn ldx(&mut self, opcode: &Opcode, bus: &mut CpuBus) {
        let address = self.get_parameter_address(opcode.mode);
        let value = self.mem_read(address, bus);
        self.set_register_x(value);
    }

    pub(super) fn ldy(&mut self, opcode: &Opcode, bus: &mut CpuBus) {
        let address = self.get_parameter_address(opcode.mode);
        let value = self.mem_read(address, bus);
        self.set_register_y(value);
    }

    //
    // Stores
    //////////

    pub(super) fn sta(&mut self, opcode: &Opcode, bus: &mut CpuBus) {
        let address = self.get_parameter_address(opcode.mode);
        self.mem_write(address, self.register_a, bus);
    }

    pub(super) fn stx(&mut self, opcode: &Opcode, bus: &mut CpuBus) {
        let address = self.get_parameter_address(opcode.mode);
        self.mem_write(address, self.register_x, bus);
    }

    pub(super) fn sty(&mut self, opcode: &Opcode, bus: &mut CpuBus) {
        let address = self.get_parameter_address(opcode.mode);
        self.mem_write(address, self.register_y, bus);
    }

    //
    // Transfers
    //////////////

    pub(super) fn tax(&mut self) {
        self.set_register_x(self.register_a);
    }

    pub(super) fn tay(&mut self) {
        self.set_register_y(self.register_a);
    }

    pub(super) fn tsx(&mut self) {
        self.set_register_x(self.stack_pointer);
    }

    pub(super) fn txa(&mut self) {
        self.set_register_a(self.register_x);
    }

    pub(super) fn txs(&mut self) {
        self.stack_pointer = self.register_x;
    }

    pub(super) fn tya(&mut self) {
        self.set_register_a(self.register_y);
    }

    //
    // Flags
    //////////

    pub(super) fn clc(&mut self) {
        self.status.remove(Flags::CARRY);
    }

    pub(super) fn cld(&mut self) {
        self.status.remove(Flags::DECIMAL_MODE);
    }

    pub(super) fn cli(&mut self) {
        self.status.remove(Flags::INTERRUPT_DISABLE);
    }

    pub(super) fn clv(&mut self) {
        self.status.remove(Flags::OVERFLOW);
    }

    pub(super) fn sec(&mut self) {
        self.status.insert(Flags::CARRY);
    }

    pub(super) fn sed(&mut self) {
        self.status.insert(Flags::DECIMAL_MODE);
    }

    pub(super) fn sei(&mut self) {
        self.status.insert(Flags::INTERRUPT_DISABLE);
    }

    //
    // Stack
    //////////

    /// Push accumulator onto stack
    pub(super) fn pha(&mut self) {
        self.stack_push(self.register_a);
    }

    /// Pop stack into accumulator
    pub(super) fn pla(&mut self) {
        let value = self.stack_pop();
        self.set_register_a(value);
    }

    /// Push processor status onto stack
    pub(super) fn php(&mut self) {
        // The B flag is pushed as 1, but not affected on the CPU
        let mut status_copy = Flags::from_bits_truncate(self.status.bits());
        status_copy.insert(Flags::BREAK);
        self.stack_push(status_copy.bits());
    }

    /// Pop stack into processor status
    pub(super) fn plp(&mut self) {
        self.status = Flags::from_bits_truncate(self.stack_pop());
        self.status.insert(Flags::BREAK2); // This flag is supposed to always be 1 on CPU
        self.status.remove(Flags::BREAK);
    }

    //
    // Arithmetic
    ///////////////

    pub(super) fn adc(&mut self, opcode: &Opcode, bus: &mut CpuBus) {
        let address = self.get_parameter_address(opcode.mode);
        let value = self.mem_read(address, bus);
        self.add_to_register_a(value);
    }

    pub(super) fn sbc(&mut self, opcode: &Opcode, bus: &mut CpuBus) {
        let address = self.get_parameter_address(opcode.mode);
        let value = self.mem_read(address, bus);
        self.sub_from_register_a(value);
    }

    fn add_to_register_a(&mut self, value: u8) {
        let carry_in = self.status.contains(Flags::CARRY) as u16;
        let sum = self.register_a as u16 + value as u16 + carry_in;
        let result = sum as u8;

        // Signed overflow: the operands share a sign and the result
        // doesn't match it
        let signed_overflow =
            (self.register_a ^ result) & 0x80 != 0 && (self.register_a ^ value) & 0x80 == 0;

        self.status.set(Flags::CARRY, sum > 0xFF);
        self.status.set(Flags::OVERFLOW, signed_overflow);
        self.update_zero_and_negative_flags(result);
        self.register_a = result;
    }

    fn sub_from_register_a(&mut self, value: u8) {
        let carry_in = self.status.contains(Flags::CARRY) as i16;
        let diff = self.register_a as i16 - value as i16 - (1 - carry_in);
        let result = diff as u8;

        // Carry doubles as the inverted borrow flag
        self.status.set(Flags::CARRY, diff >= 0);
        // Only the negative-accumulator -> positive-result transition is
        // tracked; the symmetric overflow case is not modeled
        self.status
            .set(Flags::OVERFLOW, self.register_a & 0x80 != 0 && result & 0x80 == 0);
        self.update_zero_and_negative_flags(result);
        self.register_a = result;
    }

    //
    // Logic
    //////////

    pub(super) fn and(&mut self, opcode: &Opcode, bus: &mut CpuBus) {
        let address = self.get_parameter_address(opcode.mode);
        let value = self.mem_read(address, bus);
        self.set_register_a(self.register_a & value);
    }

    pub(super) fn eor(&mut self, opcode: &Opcode, bus: &mut CpuBus) {
        let address = self.get_parameter_address(opcode.mode);
        let value = self.mem_read(address, bus);
        self.set_register_a(self.register_a ^ value);
    }

    pub(super) fn ora(&mut self, opcode: &Opcode, bus: &mut CpuBus) {
        let address = self.get_parameter_address(opcode.mode);
        let value = self.mem_read(address, bus);
        self.set_register_a(self.register_a | value);
    }

    /// Bit Test: Z from A AND operand, V/N straight from operand bits 6/7
    pub(super) fn bit(&mut self, opcode: &Opcode, bus: &mut CpuBus) {
        let address = self.get_parameter_address(opcode.mode);
        let value = self.mem_read(address, bus);
        self.status.set(Flags::ZERO, self.register_a & value == 0);
        self.status.set(Flags::OVERFLOW, value & 1 << 6 != 0);
        self.status.set(Flags::NEGATIVE, value & 1 << 7 != 0);
    }

    //
    // Shifts and rotates
    ///////////////////////

    /// Arithmetic Shift Left into carry
    pub(super) fn asl(&mut self, opcode: &Opcode, bus: &mut CpuBus) {
        match opcode.mode {
            AddressingMode::Accumulator => {
                let carry = self.register_a & 0x80 != 0;
                self.set_register_a(self.register_a << 1);
                self.status.set(Flags::CARRY, carry);
            }
            _ => {
                let address = self.get_parameter_address(opcode.mode);
                let value = self.mem_read(address, bus);
                let carry = value & 0x80 != 0;
                let result = value << 1;
                self.mem_write(address, result, bus);
                self.update_zero_and_negative_flags(result);
                self.status.set(Flags::CARRY, carry);
            }
        }
    }

    /// Logical Shift Right into carry
    pub(super) fn lsr(&mut self, opcode: &Opcode, bus: &mut CpuBus) {
        match opcode.mode {
            AddressingMode::Accumulator => {
                let carry = self.register_a & 1 != 0;
                self.set_register_a(self.register_a >> 1);
                self.status.set(Flags::CARRY, carry);
            }
            _ => {
                let address = self.get_parameter_address(opcode.mode);
                let value = self.mem_read(address, bus);
                let carry = value & 1 != 0;
                let result = value >> 1;
                self.mem_write(address, result, bus);
                self.update_zero_and_negative_flags(result);
                self.status.set(Flags::CARRY, carry);
            }
        }
    }

    /// Rotate Left through carry flag
    pub(super) fn rol(&mut self, opcode: &Opcode, bus: &mut CpuBus) {
        let curr_carry = self.status.contains(Flags::CARRY);
        match opcode.mode {
            AddressingMode::Accumulator => {
                let (value, new_carry) = rotate_value_left(self.register_a, curr_carry);
                self.set_register_a(value);
                self.status.set(Flags::CARRY, new_carry);
            }
            _ => {
                let address = self.get_parameter_address(opcode.mode);
                let value = self.mem_read(address, bus);
                let (result, new_carry) = rotate_value_left(value, curr_carry);
                self.mem_write(address, result, bus);
                self.update_zero_and_negative_flags(result);
                self.status.set(Flags::CARRY, new_carry);
            }
        }
    }

    /// Rotate Right through carry flag
    pub(super) fn ror(&mut self, opcode: &Opcode, bus: &mut CpuBus) {
        let curr_carry = self.status.contains(Flags::CARRY);
        match opcode.mode {
            AddressingMode::Accumulator => {
                let (value, new_carry) = rotate_value_right(self.register_a, curr_carry);
                self.set_register_a(value);
                self.status.set(Flags::CARRY, new_carry);
            }
            _ => {
                let address = self.get_parameter_address(opcode.mode);
                let value = self.mem_read(address, bus);
                let (result, new_carry) = rotate_value_right(value, curr_carry);
                self.mem_write(address, result, bus);
                self.update_zero_and_negative_flags(result);
                self.status.set(Flags::CARRY, new_carry);
            }
        }
    }

    //
    // Increments / decrements
    ////////////////////////////

    pub(super) fn inc(&mut self, opcode: &Opcode, bus: &mut CpuBus) {
        let address = self.get_parameter_address(opcode.mode);
        let value = self.mem_read(address, bus).wrapping_add(1);
        self.mem_write(address, value, bus);
        self.update_zero_and_negative_flags(value);
    }

    pub(super) fn dec(&mut self, opcode: &Opcode, bus: &mut CpuBus) {
        let address = self.get_parameter_address(opcode.mode);
        let value = self.mem_read(address, bus).wrapping_sub(1);
        self.mem_write(address, value, bus);
        self.update_zero_and_negative_flags(value);
    }

    pub(super) fn inx(&mut self) {
        self.set_register_x(self.register_x.wrapping_add(1));
    }

    pub(super) fn iny(&mut self) {
        self.set_register_y(self.register_y.wrapping_add(1));
    }

    pub(super) fn dex(&mut self) {
        self.set_register_x(self.register_x.wrapping_sub(1));
    }

    pub(super) fn dey(&mut self) {
        self.set_register_y(self.register_y.wrapping_sub(1));
    }

    //
    // Compares
    /////////////

    pub(super) fn cmp(&mut self, opcode: &Opcode, bus: &mut CpuBus) {
        self.compare(opcode, bus, self.register_a);
    }

    pub(super) fn cpx(&mut self, opcode: &Opcode, bus: &mut CpuBus) {
        self.compare(opcode, bus, self.register_x);
    }

    pub(super) fn cpy(&mut self, opcode: &Opcode, bus: &mut CpuBus) {
        self.compare(opcode, bus, self.register_y);
    }

    fn compare(&mut self, opcode: &Opcode, bus: &mut CpuBus, compare_value: u8) {
        let address = self.get_parameter_address(opcode.mode);
        let value = self.mem_read(address, bus);
        self.status.set(Flags::CARRY, compare_value >= value);
        self.update_zero_and_negative_flags(compare_value.wrapping_sub(value));
    }

    //
    // Control flow
    /////////////////

    pub(super) fn jmp(&mut self, opcode: &Opcode) {
        let address = self.get_parameter_address(opcode.mode);
        self.set_program_counter(address);
    }

    /// Jump to Subroutine: the pushed return address is the last byte of
    /// this instruction, RTS adds one
    pub(super) fn jsr(&mut self, opcode: &Opcode) {
        let jump_address = self.get_parameter_address(opcode.mode);
        let return_address = self.program_counter.wrapping_add(2);
        self.stack_push_u16(return_address);
        self.set_program_counter(jump_address);
    }

    pub(super) fn rts(&mut self) {
        let return_address_minus_one = self.stack_pop_u16();
        self.set_program_counter(return_address_minus_one.wrapping_add(1));
    }

    /// Return from Interrupt: status first, then the actual return
    /// address (no RTS-style off-by-one)
    pub(super) fn rti(&mut self) {
        self.status = Flags::from_bits_truncate(self.stack_pop());
        self.status.insert(Flags::BREAK2);
        let return_address = self.stack_pop_u16();
        self.set_program_counter(return_address);
    }

    /// Software break: only the break flag is recorded; no vector is
    /// taken
    pub(super) fn brk(&mut self) {
        self.status.insert(Flags::BREAK);
    }

    /// Shared branch body. Taken branches apply the signed displacement
    /// after the 2-byte advance and cost one extra cycle.
    pub(super) fn branch(&mut self, condition: bool) -> u8 {
        if condition {
            let offset = self.fetch_byte(self.program_counter.wrapping_add(1)) as i8;
            let target = self
                .program_counter
                .wrapping_add(2)
                .wrapping_add(offset as i16 as u16);
            self.set_program_counter(target);
            3
        } else {
            2
        }
    }
}

fn rotate_value_left(value: u8, current_carry: bool) -> (u8, bool) {
    let new_carry = value & 0b1000_0000 != 0;
    let shifted = value << 1 | current_carry as u8;
    (shifted, new_carry)
}

fn rotate_value_right(value: u8, current_carry: bool) -> (u8, bool) {
    let new_carry = value & 0b0000_0001 != 0;
    let shifted = value >> 1 | (current_carry as u8) << 7;
    (shifted, new_carry)
}
