//! Components representing a MIPS instruction at each point of the pipeline.
//!
//! - [`Reg`]: a general-purpose register, resolved from its `$` name
//! - [`ParsedOperands`]: the operands of an instruction after parsing
//! - [`Fields`]: the named bit fields of an encoded instruction

use std::fmt::Write as _;

/// A general-purpose register. Must be between 0 and 31.
///
/// A `Reg` is constructed from its assembly name with [`str::parse`]
/// or from its number with [`Reg::try_from`].
///
/// ## Examples
///
/// ```text
/// add $t0, $s1, $s2
///     ~~~  ~~~  ~~~
/// lw $t0, 4($sp)
///    ~~~    ~~~
/// ```
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct Reg(pub(crate) u8);

/// Every accepted register name, with the register it refers to.
///
/// Each register appears once under its conventional name,
/// plus the aliases `$0` (`$zero`) and `$s8` (`$fp`).
const REGISTER_NAMES: [(&str, u8); 34] = [
    ("$zero", 0), ("$0", 0),
    ("$at", 1),
    ("$v0", 2), ("$v1", 3),
    ("$a0", 4), ("$a1", 5), ("$a2", 6), ("$a3", 7),
    ("$t0", 8), ("$t1", 9), ("$t2", 10), ("$t3", 11),
    ("$t4", 12), ("$t5", 13), ("$t6", 14), ("$t7", 15),
    ("$s0", 16), ("$s1", 17), ("$s2", 18), ("$s3", 19),
    ("$s4", 20), ("$s5", 21), ("$s6", 22), ("$s7", 23),
    ("$t8", 24), ("$t9", 25),
    ("$k0", 26), ("$k1", 27),
    ("$gp", 28),
    ("$sp", 29),
    ("$fp", 30), ("$s8", 30),
    ("$ra", 31),
];

impl Reg {
    /// Gets the register number of this [`Reg`]. This is always between 0 and 31.
    pub fn reg_no(self) -> u8 {
        self.0
    }

    /// The conventional name of this register (e.g., `$t0`).
    pub fn name(self) -> &'static str {
        REGISTER_NAMES.iter()
            .find(|&&(_, n)| n == self.0)
            .map_or_else(|| unreachable!("register {} should have a name", self.0), |&(name, _)| name)
    }
}
impl std::fmt::Display for Reg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
impl From<Reg> for u8 {
    fn from(value: Reg) -> Self {
        value.0
    }
}
impl TryFrom<u8> for Reg {
    type Error = RegNameErr;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0..=31 => Ok(Reg(value)),
            _      => Err(RegNameErr),
        }
    }
}
impl std::str::FromStr for Reg {
    type Err = RegNameErr;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        REGISTER_NAMES.iter()
            .find(|&&(name, _)| name == s)
            .map(|&(_, n)| Reg(n))
            .ok_or(RegNameErr)
    }
}

/// The error raised when a string or number does not name a register.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct RegNameErr;
impl std::fmt::Display for RegNameErr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("not a register")
    }
}
impl std::error::Error for RegNameErr {}

/// The operands of an instruction, decoded according to its operand template.
///
/// Only the fields used by the instruction's template are populated.
/// An unset field means the instruction does not take that operand.
///
/// ## Examples
///
/// ```text
/// add $t0, $s1, $s2    =>  rd = $t0, rs = $s1, rt = $s2
/// sll $t0, $t1, 4      =>  rd = $t0, rt = $t1, shamt = 4
/// lw $t0, -8($sp)      =>  rt = $t0, immediate = -8, rs = $sp
/// beq $t0, $t1, 3      =>  rs = $t0, rt = $t1, label = "3"
/// j 0x400020           =>  label = "0x400020"
/// ```
#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub struct ParsedOperands {
    /// The destination register of an R-type instruction.
    pub rd: Option<Reg>,
    /// The first source register (or base register of a memory access).
    pub rs: Option<Reg>,
    /// The second source register (or target register of an I-type instruction).
    pub rt: Option<Reg>,
    /// The shift amount, always within `0..=31`.
    pub shamt: Option<u8>,
    /// An immediate value or memory offset.
    ///
    /// This is not range checked until encoding.
    pub immediate: Option<i32>,
    /// The raw text of a branch or jump target.
    ///
    /// This is either a numeric literal or a symbolic label.
    pub label: Option<String>,
}

/// The bit fields of an encoded instruction.
///
/// Each field is a binary string of its fixed width:
///
/// | field       | bits |
/// |-------------|------|
/// | `opcode`    | 6    |
/// | `rs`        | 5    |
/// | `rt`        | 5    |
/// | `rd`        | 5    |
/// | `shamt`     | 5    |
/// | `funct`     | 6    |
/// | `immediate` | 16   |
/// | `address`   | 26   |
///
/// Only the fields belonging to the instruction's format are present.
#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub struct Fields {
    #[allow(missing_docs)]
    pub opcode: String,
    #[allow(missing_docs)]
    pub rs: Option<String>,
    #[allow(missing_docs)]
    pub rt: Option<String>,
    #[allow(missing_docs)]
    pub rd: Option<String>,
    #[allow(missing_docs)]
    pub shamt: Option<String>,
    #[allow(missing_docs)]
    pub funct: Option<String>,
    #[allow(missing_docs)]
    pub immediate: Option<String>,
    #[allow(missing_docs)]
    pub address: Option<String>,
}
impl Fields {
    /// Iterates over the present fields in machine order (most significant first),
    /// as pairs of field name and binary string.
    pub fn iter(&self) -> impl Iterator<Item=(&'static str, &str)> + '_ {
        [
            ("opcode", Some(&self.opcode)),
            ("rs", self.rs.as_ref()),
            ("rt", self.rt.as_ref()),
            ("rd", self.rd.as_ref()),
            ("shamt", self.shamt.as_ref()),
            ("funct", self.funct.as_ref()),
            ("immediate", self.immediate.as_ref()),
            ("address", self.address.as_ref()),
        ]
        .into_iter()
        .filter_map(|(name, m_bits)| Some((name, m_bits?.as_str())))
    }

    /// Concatenates the present fields into one binary string.
    pub fn concat(&self) -> String {
        self.iter().map(|(_, bits)| bits).collect()
    }

    /// The binary string, with each field separated by a space.
    pub fn grouped(&self) -> String {
        let mut buf = String::new();
        for (i, (_, bits)) in self.iter().enumerate() {
            if i != 0 { buf.push(' '); }
            let _ = write!(buf, "{bits}");
        }
        buf
    }
}
