use std::cmp::Ordering;

use miette::Diagnostic;
use thiserror::Error;

use crate::loader::Program;
use crate::opcode::Opcode;
use crate::output::Console;

/// The LS-8 addresses 256 bytes of memory.
pub const MEMORY_SIZE: usize = 0x100;
/// Number of general purpose registers.
pub const REGISTER_COUNT: usize = 8;
/// Stack grows downwards from here.
pub const STACK_START: u8 = 0xF4;

#[derive(Error, Diagnostic, Debug, PartialEq, Eq)]
pub enum Error {
    #[error("Unsupported instruction {opcode:#010b} at address {pc:#04x}")]
    #[diagnostic(
        code(runtime::unsupported_opcode),
        help("the program may have run past its last instruction without a HLT")
    )]
    UnsupportedOpcode { opcode: u8, pc: u8 },
    #[error("Unsupported ALU operation: {0}")]
    #[diagnostic(code(runtime::unsupported_alu_op))]
    UnsupportedAluOp(Opcode),
    #[error("Register R{register} does not exist (at address {pc:#04x})")]
    #[diagnostic(code(runtime::bad_register), help("registers are numbered 0 to 7"))]
    InvalidRegister { register: u8, pc: u8 },
    #[error("{opcode} at address {pc:#04x} runs past the end of memory")]
    #[diagnostic(code(runtime::truncated))]
    TruncatedInstruction { opcode: Opcode, pc: u8 },
    #[error("Stack overflow at address {pc:#04x}")]
    #[diagnostic(code(runtime::stack_overflow), help("check for unbounded recursion"))]
    StackOverflow { pc: u8 },
    #[error("Stack underflow at address {pc:#04x}")]
    #[diagnostic(
        code(runtime::stack_underflow),
        help("every POP and RET needs a matching PUSH or CALL")
    )]
    StackUnderflow { pc: u8 },
    #[error("Program is {0} bytes long and cannot fit in memory")]
    #[diagnostic(code(runtime::too_long))]
    ProgramTooLong(usize),
}

/// Outcome of a `CMP`. Exactly one flag is set after every comparison.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub struct Flags {
    pub equal: bool,
    pub less: bool,
    pub greater: bool,
}

impl From<Ordering> for Flags {
    fn from(ordering: Ordering) -> Self {
        Flags {
            equal: ordering == Ordering::Equal,
            less: ordering == Ordering::Less,
            greater: ordering == Ordering::Greater,
        }
    }
}

/// Where PC goes once an instruction has executed.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Next {
    /// Step over this many bytes
    Advance(u8),
    /// Control transferred to an address
    Jump(u8),
}

/// Represents complete machine state during runtime.
pub struct Machine<C: Console> {
    /// 256 bytes holding program, data and stack
    mem: [u8; MEMORY_SIZE],
    /// 8x 8-bit registers
    reg: [u8; REGISTER_COUNT],
    /// Program counter
    pc: u8,
    /// Address of the most recently pushed byte
    sp: u8,
    flags: Flags,
    running: bool,
    trace: bool,
    console: C,
}

impl<C: Console> Machine<C> {
    pub fn new(console: C) -> Self {
        Machine {
            mem: [0; MEMORY_SIZE],
            reg: [0; REGISTER_COUNT],
            pc: 0,
            sp: STACK_START,
            flags: Flags::default(),
            running: true,
            trace: false,
            console,
        }
    }

    pub fn with_program(program: &Program, console: C) -> Result<Self, Error> {
        let mut machine = Machine::new(console);
        machine.load(program.bytes())?;
        Ok(machine)
    }

    /// Copy `bytes` into memory starting at address 0.
    pub fn load(&mut self, bytes: &[u8]) -> Result<(), Error> {
        if bytes.len() > MEMORY_SIZE {
            return Err(Error::ProgramTooLong(bytes.len()));
        }
        self.mem[..bytes.len()].copy_from_slice(bytes);
        Ok(())
    }

    pub fn set_trace(&mut self, trace: bool) {
        self.trace = trace;
    }

    /// Run until `HLT` or an error.
    pub fn run(&mut self) -> Result<(), Error> {
        while self.running {
            self.step()?;
        }
        Ok(())
    }

    /// Perform a single fetch-decode-execute cycle.
    ///
    /// A halted machine stays put: PC is reported as the jump target and
    /// nothing is fetched.
    pub fn step(&mut self) -> Result<Next, Error> {
        if !self.running {
            return Ok(Next::Jump(self.pc));
        }
        let pc = self.pc;
        let ir = self.ram_read(pc);
        // Operands are fetched whether or not the instruction uses them.
        // Reads wrap at the top of memory, but see the width check below.
        let operand_a = self.ram_read(pc.wrapping_add(1));
        let operand_b = self.ram_read(pc.wrapping_add(2));

        if self.trace {
            let line = self.trace_line();
            self.console.trace(&line);
        }

        let op = Opcode::try_from(ir).map_err(|opcode| Error::UnsupportedOpcode { opcode, pc })?;
        if pc as usize + op.width() as usize > MEMORY_SIZE {
            return Err(Error::TruncatedInstruction { opcode: op, pc });
        }

        let next = self.execute(op, operand_a, operand_b)?;
        debug_assert!(op.sets_pc() || matches!(next, Next::Advance(_)));
        self.pc = match next {
            Next::Advance(width) => {
                debug_assert_eq!(width, op.width());
                // Checked above, except when stepping off the last byte
                pc.wrapping_add(width)
            }
            Next::Jump(addr) => addr,
        };
        Ok(next)
    }

    fn execute(&mut self, op: Opcode, a: u8, b: u8) -> Result<Next, Error> {
        let width = op.width();
        match op {
            Opcode::Hlt => {
                self.running = false;
            }
            Opcode::Ldi => {
                *self.reg_mut(a)? = b;
            }
            Opcode::Prn => {
                let value = *self.reg(a)?;
                self.console.print_value(value);
            }
            Opcode::Add | Opcode::Mul | Opcode::Cmp => {
                self.alu(op, a, b)?;
            }
            Opcode::Push => {
                let value = *self.reg(a)?;
                self.push_val(value)?;
            }
            Opcode::Pop => {
                let value = self.pop_val()?;
                *self.reg_mut(a)? = value;
            }
            Opcode::Call => {
                let target = *self.reg(a)?;
                self.push_val(self.pc.wrapping_add(width))?;
                return Ok(Next::Jump(target));
            }
            Opcode::Ret => {
                return Ok(Next::Jump(self.pop_val()?));
            }
            Opcode::Jmp => {
                return Ok(Next::Jump(*self.reg(a)?));
            }
            Opcode::Jeq => {
                if self.flags.equal {
                    return Ok(Next::Jump(*self.reg(a)?));
                }
            }
            Opcode::Jne => {
                if !self.flags.equal {
                    return Ok(Next::Jump(*self.reg(a)?));
                }
            }
        }
        Ok(Next::Advance(width))
    }

    /// Arithmetic and comparison between two registers.
    ///
    /// Results wrap at 8 bits. `CMP` leaves exactly one of the flags set.
    pub fn alu(&mut self, op: Opcode, a: u8, b: u8) -> Result<(), Error> {
        let lhs = *self.reg(a)?;
        let rhs = *self.reg(b)?;
        match op {
            Opcode::Add => *self.reg_mut(a)? = lhs.wrapping_add(rhs),
            Opcode::Mul => *self.reg_mut(a)? = lhs.wrapping_mul(rhs),
            Opcode::Cmp => self.flags = Flags::from(lhs.cmp(&rhs)),
            other => return Err(Error::UnsupportedAluOp(other)),
        }
        Ok(())
    }

    fn push_val(&mut self, val: u8) -> Result<(), Error> {
        self.sp = self
            .sp
            .checked_sub(1)
            .ok_or(Error::StackOverflow { pc: self.pc })?;
        self.ram_write(self.sp, val);
        Ok(())
    }

    fn pop_val(&mut self) -> Result<u8, Error> {
        // Nothing was pushed below the reserved area
        if self.sp >= STACK_START {
            return Err(Error::StackUnderflow { pc: self.pc });
        }
        let val = self.ram_read(self.sp);
        self.sp += 1;
        Ok(val)
    }

    #[inline]
    fn reg(&self, index: u8) -> Result<&u8, Error> {
        self.reg.get(index as usize).ok_or(Error::InvalidRegister {
            register: index,
            pc: self.pc,
        })
    }

    #[inline]
    fn reg_mut(&mut self, index: u8) -> Result<&mut u8, Error> {
        let pc = self.pc;
        self.reg.get_mut(index as usize).ok_or(Error::InvalidRegister {
            register: index,
            pc,
        })
    }

    /// Memory address register in, memory data register out.
    #[inline]
    pub fn ram_read(&self, mar: u8) -> u8 {
        self.mem[mar as usize]
    }

    #[inline]
    pub fn ram_write(&mut self, mar: u8, mdr: u8) {
        self.mem[mar as usize] = mdr;
    }

    /// `TRACE: PC | IR A B | R0 R1 R2 R3 R4 R5 R6 R7`, all in hex.
    pub fn trace_line(&self) -> String {
        let mut line = format!(
            "TRACE: {:02X} | {:02X} {:02X} {:02X} |",
            self.pc,
            self.ram_read(self.pc),
            self.ram_read(self.pc.wrapping_add(1)),
            self.ram_read(self.pc.wrapping_add(2)),
        );
        for reg in self.reg {
            line.push_str(&format!(" {reg:02X}"));
        }
        line
    }

    /// `None` if there is no such register.
    pub fn register(&self, index: u8) -> Option<u8> {
        self.reg.get(index as usize).copied()
    }

    pub fn registers(&self) -> &[u8; REGISTER_COUNT] {
        &self.reg
    }

    pub fn memory(&self) -> &[u8; MEMORY_SIZE] {
        &self.mem
    }

    pub fn pc(&self) -> u8 {
        self.pc
    }

    pub fn sp(&self) -> u8 {
        self.sp
    }

    pub fn flags(&self) -> Flags {
        self.flags
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn console(&self) -> &C {
        &self.console
    }
}
