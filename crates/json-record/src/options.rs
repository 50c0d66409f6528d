//! Codec switches shared by [`Decoder`](crate::Decoder) and [`Encoder`](crate::Encoder).

/// Overflow handling for one codec.
///
/// Both switches default to on, which gives lossless round-trips of unknown
/// keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecOptions {
    /// Keep undeclared input keys in the overflow map; otherwise drop them.
    pub capture_overflow: bool,
    /// Append overflow entries after the declared fields on output.
    pub emit_overflow: bool,
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self {
            capture_overflow: true,
            emit_overflow: true,
        }
    }
}

impl CodecOptions {
    /// Declared fields only, in both directions.
    pub fn strict() -> Self {
        Self {
            capture_overflow: false,
            emit_overflow: false,
        }
    }
}
