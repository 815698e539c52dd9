use std::fmt;

/// Every instruction understood by the LS-8.
///
/// The top two bits of an opcode byte hold its operand count, which is how
/// [`Opcode::width`] is derived.
#[allow(clippy::upper_case_acronyms)]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[repr(u8)]
pub enum Opcode {
    /// Stop the machine
    Hlt = 0b0000_0001,
    /// Load immediate value into register
    Ldi = 0b1000_0010,
    /// Print register as decimal
    Prn = 0b0100_0111,
    Mul = 0b1010_0010,
    Add = 0b1010_0000,
    Push = 0b0100_0101,
    Pop = 0b0100_0110,
    /// Push return address and jump to address held in register
    Call = 0b0101_0000,
    Ret = 0b0001_0001,
    Cmp = 0b1010_0111,
    Jmp = 0b0101_0100,
    Jeq = 0b0101_0101,
    Jne = 0b0101_0110,
}

impl Opcode {
    pub const ALL: [Opcode; 13] = [
        Opcode::Hlt,
        Opcode::Ldi,
        Opcode::Prn,
        Opcode::Mul,
        Opcode::Add,
        Opcode::Push,
        Opcode::Pop,
        Opcode::Call,
        Opcode::Ret,
        Opcode::Cmp,
        Opcode::Jmp,
        Opcode::Jeq,
        Opcode::Jne,
    ];

    pub fn byte(self) -> u8 {
        self as u8
    }

    /// Number of operand bytes following the opcode.
    pub fn operands(self) -> u8 {
        self.byte() >> 6
    }

    /// Instruction size in bytes, including the opcode itself.
    pub fn width(self) -> u8 {
        1 + self.operands()
    }

    /// Instruction assigns PC itself rather than stepping over its operands.
    pub fn sets_pc(self) -> bool {
        matches!(
            self,
            Opcode::Call | Opcode::Ret | Opcode::Jmp | Opcode::Jeq | Opcode::Jne
        )
    }

    pub fn mnemonic(self) -> &'static str {
        match self {
            Opcode::Hlt => "HLT",
            Opcode::Ldi => "LDI",
            Opcode::Prn => "PRN",
            Opcode::Mul => "MUL",
            Opcode::Add => "ADD",
            Opcode::Push => "PUSH",
            Opcode::Pop => "POP",
            Opcode::Call => "CALL",
            Opcode::Ret => "RET",
            Opcode::Cmp => "CMP",
            Opcode::Jmp => "JMP",
            Opcode::Jeq => "JEQ",
            Opcode::Jne => "JNE",
        }
    }
}

impl TryFrom<u8> for Opcode {
    /// The unrecognised byte.
    type Error = u8;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        Opcode::ALL
            .into_iter()
            .find(|op| op.byte() == byte)
            .ok_or(byte)
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_every_opcode() {
        for op in Opcode::ALL {
            assert_eq!(Opcode::try_from(op.byte()), Ok(op));
        }
    }

    #[test]
    fn rejects_unknown_bytes() {
        assert_eq!(Opcode::try_from(0x00), Err(0x00));
        assert_eq!(Opcode::try_from(0xFF), Err(0xFF));
        // SUB exists on the real LS-8 but is not implemented here
        assert_eq!(Opcode::try_from(0b1010_0001), Err(0b1010_0001));
    }

    #[test]
    fn widths() {
        assert_eq!(Opcode::Hlt.width(), 1);
        assert_eq!(Opcode::Ret.width(), 1);
        assert_eq!(Opcode::Prn.width(), 2);
        assert_eq!(Opcode::Push.width(), 2);
        assert_eq!(Opcode::Jeq.width(), 2);
        assert_eq!(Opcode::Ldi.width(), 3);
        assert_eq!(Opcode::Cmp.width(), 3);
    }

    #[test]
    fn control_flow() {
        let jumps: Vec<_> = Opcode::ALL.into_iter().filter(|op| op.sets_pc()).collect();
        assert_eq!(
            jumps,
            [Opcode::Call, Opcode::Ret, Opcode::Jmp, Opcode::Jeq, Opcode::Jne]
        );
        assert_eq!(Opcode::Push.to_string(), "PUSH");
    }
}
