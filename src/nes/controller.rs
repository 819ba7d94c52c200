// See: https://www.nesdev.org/wiki/Controller_reading

use bitflags::bitflags;

bitflags! {
    #[derive(Copy, Clone, Debug)]
    pub struct Buttons: u8 {
        const BUTTON_A = 0b0000_0001;
        const BUTTON_B = 0b0000_0010;
        const SELECT   = 0b0000_0100;
        const START    = 0b0000_1000;
        const UP       = 0b0001_0000;
        const DOWN     = 0b0010_0000;
        const LEFT     = 0b0100_0000;
        const RIGHT    = 0b1000_0000;
    }
}

/// Serial-read input source mapped at $4016/$4017.
///
/// Writing a truthy strobe latches button state and resets the read
/// counter; each read then returns the next bit in the order A, B,
/// Select, Start, Up, Down, Left, Right. Reads past the eighth return 1,
/// matching a standard controller.
pub trait InputSource {
    fn reset(&mut self);
    fn write(&mut self, strobe: u8);
    fn read(&mut self) -> u8;
}

/// Reference input source: a host pushes button state in through
/// [`Joypad::set_button`] and the emulated program shifts it out serially.
pub struct Joypad {
    buttons: Buttons,
    button_index: u8,
    strobe: bool,
}

impl Joypad {
    pub fn new() -> Self {
        Self {
            buttons: Buttons::empty(),
            button_index: 0,
            strobe: false,
        }
    }

    pub fn set_button(&mut self, button: Buttons, pressed: bool) {
        self.buttons.set(button, pressed);
    }
}

impl Default for Joypad {
    fn default() -> Self {
        Self::new()
    }
}

impl InputSource for Joypad {
    fn reset(&mut self) {
        self.buttons = Buttons::empty();
        self.button_index = 0;
        self.strobe = false;
    }

    fn write(&mut self, strobe: u8) {
        self.strobe = strobe & 1 == 1;
        if self.strobe {
            self.button_index = 0;
        }
    }

    fn read(&mut self) -> u8 {
        if self.button_index > 7 {
            return 1;
        }
        let status = (self.buttons.bits() >> self.button_index) & 1;
        if !self.strobe {
            self.button_index += 1;
        }
        status
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strobe_resets_read_counter() {
        let mut joypad = Joypad::new();
        joypad.set_button(Buttons::BUTTON_A, true);

        joypad.write(1);
        // While strobed, every read re-reads button A
        for _ in 0..4 {
            assert_eq!(joypad.read(), 1);
        }

        joypad.write(0);
        assert_eq!(joypad.read(), 1); // A
        assert_eq!(joypad.read(), 0); // B
    }

    #[test]
    fn reads_eight_bits_in_order() {
        let mut joypad = Joypad::new();
        joypad.set_button(Buttons::BUTTON_B, true);
        joypad.set_button(Buttons::START, true);
        joypad.set_button(Buttons::LEFT, true);

        joypad.write(1);
        joypad.write(0);

        let bits: Vec<u8> = (0..8).map(|_| joypad.read()).collect();
        assert_eq!(bits, vec![0, 1, 0, 1, 0, 0, 1, 0]);
    }

    #[test]
    fn reads_past_the_eighth_return_one() {
        let mut joypad = Joypad::new();
        joypad.write(1);
        joypad.write(0);

        for _ in 0..8 {
            joypad.read();
        }
        assert_eq!(joypad.read(), 1);
        assert_eq!(joypad.read(), 1);
    }

    #[test]
    fn reset_clears_state() {
        let mut joypad = Joypad::new();
        joypad.set_button(Buttons::RIGHT, true);
        joypad.write(1);
        joypad.reset();

        joypad.write(1);
        joypad.write(0);
        for _ in 0..8 {
            assert_eq!(joypad.read(), 0);
        }
    }
}
