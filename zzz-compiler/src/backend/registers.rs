//! The physical MIPS register set used by the target generator.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Register {
    Zero,
    T0,
    T1,
    T2,
    T3,
    T4,
    T5,
    T6,
    T7,
    T8,
    T9,
    F0,
    F2,
    F4,
    F6,
    F8,
    F10,
    F12,
    F14,
    F16,
    F18,
    F20,
    F22,
    F24,
    F26,
    F28,
    F30,
    StackPointer,
    FramePointer,
    ReturnAddress,
    ReturnValue,
    DivisionRemainder,
    DivisionQuotient,
}

impl Register {
    pub const ALL: [Register; 33] = [
        Register::Zero,
        Register::T0,
        Register::T1,
        Register::T2,
        Register::T3,
        Register::T4,
        Register::T5,
        Register::T6,
        Register::T7,
        Register::T8,
        Register::T9,
        Register::F0,
        Register::F2,
        Register::F4,
        Register::F6,
        Register::F8,
        Register::F10,
        Register::F12,
        Register::F14,
        Register::F16,
        Register::F18,
        Register::F20,
        Register::F22,
        Register::F24,
        Register::F26,
        Register::F28,
        Register::F30,
        Register::StackPointer,
        Register::FramePointer,
        Register::ReturnAddress,
        Register::ReturnValue,
        Register::DivisionRemainder,
        Register::DivisionQuotient,
    ];

    /// Allocatable scratch registers, as opposed to the pinned special ones.
    pub fn is_temporary(self) -> bool {
        use Register::*;
        matches!(
            self,
            T0 | T1
                | T2
                | T3
                | T4
                | T5
                | T6
                | T7
                | T8
                | T9
                | F0
                | F2
                | F4
                | F6
                | F8
                | F10
                | F12
                | F14
                | F16
                | F18
                | F20
                | F22
                | F24
                | F26
                | F28
                | F30
        )
    }

    pub fn is_float(self) -> bool {
        use Register::*;
        matches!(
            self,
            F0 | F2 | F4 | F6 | F8 | F10 | F12 | F14 | F16 | F18 | F20 | F22 | F24 | F26 | F28
                | F30
        )
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Register::*;
        let name = match self {
            Zero => "$zero",
            T0 => "$t0",
            T1 => "$t1",
            T2 => "$t2",
            T3 => "$t3",
            T4 => "$t4",
            T5 => "$t5",
            T6 => "$t6",
            T7 => "$t7",
            T8 => "$t8",
            T9 => "$t9",
            F0 => "$f0",
            F2 => "$f2",
            F4 => "$f4",
            F6 => "$f6",
            F8 => "$f8",
            F10 => "$f10",
            F12 => "$f12",
            F14 => "$f14",
            F16 => "$f16",
            F18 => "$f18",
            F20 => "$f20",
            F22 => "$f22",
            F24 => "$f24",
            F26 => "$f26",
            F28 => "$f28",
            F30 => "$f30",
            StackPointer => "$sp",
            FramePointer => "$fp",
            ReturnAddress => "$ra",
            ReturnValue => "$v0",
            DivisionRemainder => "$hi",
            DivisionQuotient => "$lo",
        };
        write!(f, "{name}")
    }
}
